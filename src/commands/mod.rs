// The provisioning command
pub mod up;

// Introspection commands
pub mod doctor;
pub mod env;
pub mod plan;
