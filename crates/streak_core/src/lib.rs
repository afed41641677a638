pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod model;
pub mod series;
pub mod signal;
pub mod storage;
pub mod sync;
pub mod timeline;
