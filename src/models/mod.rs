pub mod config;
pub mod edit;
pub mod error;
