pub mod encoding;
pub mod envelope;
pub mod format;
pub mod writer;

pub use encoding::Encoding;
pub use envelope::{JsonStore, Message, Outcome, Status};
pub use writer::{ResponseWriter, WriteError};
