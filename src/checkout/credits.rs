use rust_decimal::Decimal;
use tracing::info;

use crate::{checkout::main::Checkout, models::errors::CheckoutError};

impl Checkout {
  pub async fn credits(&self) -> Result<Decimal, CheckoutError> {
    let user = self.user()?;
    Ok(self.store.credits_get(&user.id).await?)
  }

  /// Adds `amount` whole credits and returns the new balance.
  pub async fn load_credits(&self, amount: u32) -> Result<Decimal, CheckoutError> {
    let user = self.user()?;
    if amount < 1 {
      return Err(CheckoutError::InvalidAmount);
    }

    let credits = self.store.credits_get(&user.id).await? + Decimal::from(amount);
    self.store.credits_set(&user.id, credits).await?;

    info!(user_id = %user.id, amount, %credits, "credits loaded");
    Ok(credits)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use testresult::TestResult;

  use crate::{
    cart::{Cart, CartArgs},
    checkout::CheckoutArgs,
    identity::{SessionIdentity, User},
    store::database::memstore::{MemoryStoreImpl, MemoryStoreImplArgs},
  };

  use super::*;

  fn checkout(identity: Arc<SessionIdentity>) -> (Checkout, Arc<MemoryStoreImpl>) {
    let store = Arc::new(MemoryStoreImpl::new(MemoryStoreImplArgs::default()));
    let cart = Arc::new(Cart::start(CartArgs { store: store.clone(), identity }));
    (Checkout::new(CheckoutArgs { cart, store: store.clone() }), store)
  }

  #[tokio::test]
  async fn test_load_credits_accumulates() -> TestResult {
    let identity = Arc::new(SessionIdentity::new());
    identity.sign_in(User::new("u1"));
    let (checkout, _store) = checkout(identity);

    assert_eq!(checkout.credits().await?, Decimal::ZERO);
    assert_eq!(checkout.load_credits(5).await?, Decimal::from(5));
    assert_eq!(checkout.load_credits(20).await?, Decimal::from(25));
    assert_eq!(checkout.credits().await?, Decimal::from(25));
    Ok(())
  }

  #[tokio::test]
  async fn test_load_credits_rejects_zero() {
    let identity = Arc::new(SessionIdentity::new());
    identity.sign_in(User::new("u1"));
    let (checkout, store) = checkout(identity);

    assert!(matches!(checkout.load_credits(0).await, Err(CheckoutError::InvalidAmount)));
    assert_eq!(store.calls("credits_set"), 0);
  }

  #[tokio::test]
  async fn test_credits_require_user() {
    let (checkout, store) = checkout(Arc::new(SessionIdentity::new()));

    assert!(matches!(checkout.credits().await, Err(CheckoutError::SignedOut)));
    assert!(matches!(checkout.load_credits(3).await, Err(CheckoutError::SignedOut)));
    assert_eq!(store.calls("credits_get"), 0);
  }
}
