// handlers/mod.rs
//
// module:  tree-structured module CRUD under the configured base path
// service: root banner and health probe
pub mod module;
pub mod service;
