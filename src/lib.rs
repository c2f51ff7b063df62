pub mod app;
pub mod cart;
pub mod checkout;
pub mod identity;
pub mod models;
pub mod store;
