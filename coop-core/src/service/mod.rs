pub mod chicken_service;
pub mod error;
pub mod farm_service;
pub mod guest_service;
