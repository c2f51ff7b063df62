use crate::{
  cart::{
    main::{Cart, Outcome, remote_failure},
    reducer::CartAction,
  },
  models::{cart::CartLine, errors::CartError},
};

impl Cart {
  /// Removes one unit. Taking the last unit removes the line; no remote document is ever left at
  /// zero.
  pub async fn decrement_item(&self, line: &CartLine) -> Result<Outcome, CartError> {
    if line.qty <= 1 {
      return self.remove_item(line).await;
    }

    let op = "decrement_item";
    let Some(session) = self.session() else {
      return Ok(Outcome::SignedOut);
    };

    self
      .store
      .cart_line_qty_set(&session.user_id, &line.id, line.qty - 1)
      .await
      .map_err(|e| remote_failure(op, &line.product_id, e))?;

    Ok(self.shared.dispatch(session.generation, CartAction::Dec(line.product_id.clone())))
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal::Decimal;
  use testresult::TestResult;

  use crate::{
    cart::test_support::{product, seeded_store, settled, signed_in_cart},
    store::database::CartStore,
  };

  use super::*;

  #[tokio::test]
  async fn test_decrement_to_remove() -> TestResult {
    let store = seeded_store();
    let (cart, _identity) = signed_in_cart(store.clone(), "u1").await;
    cart.add_to_cart(&product("p1")).await?;
    let line = cart.lines()[0].clone();
    assert_eq!(line.qty, 1);

    cart.decrement_item(&line).await?;

    assert!(cart.lines().is_empty());
    assert_eq!(cart.total_qty(), 0);
    assert_eq!(cart.total_price(), Decimal::ZERO);
    assert_eq!(store.calls("cart_line_delete"), 1);
    assert_eq!(store.calls("cart_line_qty_set"), 0);
    assert!(store.cart_line_find("u1", "p1").await?.is_none());

    let view = settled(&cart, |v| v.lines.is_empty()).await;
    assert_eq!(view.total_qty, 0);
    Ok(())
  }

  #[tokio::test]
  async fn test_decrement_failure_keeps_quantity() -> TestResult {
    let store = seeded_store();
    let (cart, _identity) = signed_in_cart(store.clone(), "u1").await;
    cart.add_to_cart(&product("p2")).await?;
    cart.add_to_cart(&product("p2")).await?;
    let line = cart.lines()[0].clone();

    store.fail_next("cart_line_qty_set");
    assert!(cart.decrement_item(&line).await.is_err());
    assert_eq!(cart.total_qty(), 2);
    Ok(())
  }
}
