/// Reversible keyed byte transform applied to encrypted transports.
///
/// Each byte is XOR-ed with the key byte at the same position (modulo key
/// length), so applying the transform twice yields the input. It only hides
/// payloads from casual inspection and offers no confidentiality.
#[derive(Debug, Clone)]
pub struct Cipher {
    key: Vec<u8>,
}

impl Cipher {
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        let key = key.as_ref().to_vec();
        // An empty key would make the transform the identity
        let key = if key.is_empty() { vec![0x5a] } else { key };
        Self { key }
    }

    pub fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        self.apply(data)
    }

    pub fn decrypt(&self, data: &[u8]) -> Vec<u8> {
        self.apply(data)
    }

    fn apply(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.key.iter().cycle())
            .map(|(b, k)| b ^ k)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrypt_reverses_encrypt() {
        let cipher = Cipher::new("secret");
        let plain = "{\"status\":\"SUCCESS\",\"msg\":\"模块\"}".as_bytes();
        let hidden = cipher.encrypt(plain);
        assert_ne!(hidden, plain);
        assert_eq!(cipher.decrypt(&hidden), plain);
    }

    #[test]
    fn empty_key_still_transforms() {
        let cipher = Cipher::new("");
        assert_ne!(cipher.encrypt(b"abc"), b"abc");
    }
}
