//! Durable client storage adapters

pub mod file_storage;

pub use file_storage::JsonFileStorage;
