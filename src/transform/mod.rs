pub mod cipher;
pub mod error;
pub mod gzip;

pub use cipher::Cipher;
pub use error::TransformError;
