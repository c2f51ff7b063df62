mod add_to_cart;
mod clear_cart;
mod decrement_item;
mod increment_item;
pub mod main;
pub mod reducer;
mod remove_item;
pub mod state;
mod sync;
#[cfg(test)]
pub(crate) mod test_support;

pub use main::{Cart, CartArgs, Outcome};
pub use state::CartView;
