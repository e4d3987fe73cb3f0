pub mod edit;
pub mod health;
pub mod models;
