use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::error::TransformError;

/// Gzip-compress a complete payload.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, TransformError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 16), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inflate a gzip payload produced by [`compress`] (or any gzip stream).
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, TransformError> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::with_capacity(data.len() * 2);
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_compressed_payload() {
        let payload = br#"{"records":[],"total":0}"#.repeat(20);
        let packed = compress(&payload).unwrap();
        assert!(packed.len() < payload.len());
        assert_eq!(&packed[..2], &[0x1f, 0x8b]);
        assert_eq!(decompress(&packed).unwrap(), payload);
    }

    #[test]
    fn rejects_non_gzip_input() {
        assert!(decompress(b"plain text").is_err());
    }
}
