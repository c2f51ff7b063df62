use tracing::info;

use crate::{
  cart::{
    main::{Cart, Outcome, remote_failure},
    reducer::CartAction,
  },
  models::{cart::CartLine, errors::CartError},
};

impl Cart {
  pub async fn remove_item(&self, line: &CartLine) -> Result<Outcome, CartError> {
    let op = "remove_item";
    let Some(session) = self.session() else {
      return Ok(Outcome::SignedOut);
    };

    self
      .store
      .cart_line_delete(&session.user_id, &line.id)
      .await
      .map_err(|e| remote_failure(op, &line.product_id, e))?;

    info!(op, product_id = %line.product_id, "cart line deleted");
    Ok(self.shared.dispatch(session.generation, CartAction::Delete(line.product_id.clone())))
  }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
  };

  use parking_lot::Mutex;
  use serde_json::json;
  use testresult::TestResult;
  use tokio::sync::{mpsc::unbounded_channel, watch};

  use crate::{
    cart::{
      CartArgs, CartView,
      test_support::{product, seeded_store, settled, signed_in_cart},
    },
    identity::{SessionIdentity, User},
    store::database::{MockCartStore, RemoteDoc},
  };

  use super::*;

  #[tokio::test]
  async fn test_remove_keeps_other_lines() -> TestResult {
    let store = seeded_store();
    let (cart, _identity) = signed_in_cart(store.clone(), "u1").await;
    cart.add_to_cart(&product("p1")).await?;
    cart.add_to_cart(&product("p2")).await?;
    cart.add_to_cart(&product("p2")).await?;

    let p2 = cart.view().line("p2").cloned().ok_or("p2 missing")?;
    cart.remove_item(&p2).await?;

    let view = cart.view();
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].product_id, "p1");
    assert_eq!(view.total_qty, 1);
    Ok(())
  }

  // The delete lands only after the user has switched, so the old session must not be touched.
  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn test_remove_finishing_after_user_switch_is_stale() -> TestResult {
    let identity = Arc::new(SessionIdentity::new());
    identity.sign_in(User::new("u1"));
    let views: Arc<Mutex<Option<watch::Receiver<CartView>>>> = Arc::default();

    let mut mock = MockCartStore::new();
    mock.expect_cart_watch().withf(|user| user == "u1").times(1).returning(|_| {
      let (tx, rx) = unbounded_channel();
      let _ = tx.send(Ok(vec![RemoteDoc {
        id: "l1".into(),
        fields: json!({"productId": "p1", "storeId": "s1", "price": 40, "qty": 1}),
      }]));
      Ok(rx)
    });
    mock.expect_cart_watch().withf(|user| user == "u2").times(1).returning(|_| {
      let (tx, rx) = unbounded_channel();
      let _ = tx.send(Ok(vec![]));
      Ok(rx)
    });

    let (switcher, switch_views) = (identity.clone(), views.clone());
    mock
      .expect_cart_line_delete()
      .withf(|user, line| user == "u1" && line == "l1")
      .times(1)
      .returning(move |_, _| {
        switcher.sign_in(User::new("u2"));
        if let Some(rx) = switch_views.lock().as_ref() {
          let deadline = Instant::now() + Duration::from_secs(2);
          while rx.borrow().user_id.as_deref() != Some("u2") {
            assert!(Instant::now() < deadline, "cart never picked up u2");
            thread::sleep(Duration::from_millis(5));
          }
        }
        Ok(())
      });

    let cart = Cart::start(CartArgs { store: Arc::new(mock), identity: identity.clone() });
    settled(&cart, |v| v.user_id.as_deref() == Some("u1") && v.total_qty == 1).await;
    *views.lock() = Some(cart.subscribe());

    let line = cart.lines()[0].clone();
    assert_eq!(cart.remove_item(&line).await?, Outcome::Stale);

    let view = settled(&cart, |v| v.user_id.as_deref() == Some("u2") && !v.loading).await;
    assert!(view.lines.is_empty());
    Ok(())
  }
}
