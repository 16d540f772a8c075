pub mod chicken;
pub mod farm;
pub mod guest;
pub mod macros;
pub mod page;
pub mod user;
