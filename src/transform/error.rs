use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("gzip failed: {0}")]
    Gzip(#[from] std::io::Error),

    #[error("cannot encode character U+{:04X} as {}", u32::from(*.0), .1)]
    Unmappable(char, &'static str),

    #[error("payload is not valid {0}: {1}")]
    InvalidText(&'static str, String),
}
