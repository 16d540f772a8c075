pub mod clock;
pub mod snapshot;
pub mod truthy;
