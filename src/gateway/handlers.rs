//! HTTP handlers, one submodule per resource

pub mod account;
pub mod health;
pub mod movement;
pub mod transfer;

pub use account::{activate_account, create_account, deactivate_account};
pub use health::{HealthResponse, health_check};
pub use movement::create_movement;
pub use transfer::create_transfer;
