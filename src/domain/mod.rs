pub mod error;
pub mod import_config;

// Product import types
pub mod product;
