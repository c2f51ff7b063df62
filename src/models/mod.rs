pub mod cart;
pub mod config;
pub mod errors;
pub mod order;
