//! Infrastructure layer for filesystem and environment interactions.

pub mod paths;

pub use paths::{config_file, data_dir, expand_tilde, store_file};
