use std::sync::Arc;

use crate::{
  cart::Cart,
  identity::User,
  models::errors::CheckoutError,
  store::database::CartStore,
};

/// Credit balance and payment for the signed-in user's cart.
pub struct Checkout {
  pub(crate) cart: Arc<Cart>,
  pub(crate) store: Arc<dyn CartStore>,
}

pub struct CheckoutArgs {
  pub cart: Arc<Cart>,
  pub store: Arc<dyn CartStore>,
}

impl Checkout {
  pub fn new(args: CheckoutArgs) -> Self {
    Self { cart: args.cart, store: args.store }
  }

  pub(crate) fn user(&self) -> Result<User, CheckoutError> {
    self.cart.identity.current_user().ok_or(CheckoutError::SignedOut)
  }
}
