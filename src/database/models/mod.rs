pub mod module;

pub use module::{ModuleCondition, ModuleRecord, ROOT_PARENT_ID};
