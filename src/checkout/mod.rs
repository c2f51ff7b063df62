mod credits;
pub mod main;
mod pay;

pub use main::{Checkout, CheckoutArgs};
