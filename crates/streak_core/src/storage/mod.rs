pub mod json_store;

pub use json_store::{CacheStore, shared_dir};
