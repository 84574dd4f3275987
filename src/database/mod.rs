pub mod manager;
pub mod memory;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use models::{ModuleCondition, ModuleRecord, ROOT_PARENT_ID};
pub use repository::Repository;
pub use store::ModuleStore;
