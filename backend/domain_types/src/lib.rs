pub mod connector_types;
pub mod errors;
pub mod types;
