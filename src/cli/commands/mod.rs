pub mod migrate;
pub mod purge;
pub mod serve;
