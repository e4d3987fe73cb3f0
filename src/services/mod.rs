mod download;

pub mod hub;
pub mod inference;
pub mod object_store;
pub mod presets;
pub mod provisioner;
