use std::{collections::HashSet, sync::Arc};

use tokio::{spawn, sync::watch, task::JoinHandle};
use tracing::{debug, error, warn};

use crate::{
  cart::main::{Cart, Outcome, Shared},
  identity::User,
  models::{cart::CartLine, errors::CartError},
  store::database::{CartStore, RemoteDoc, SnapshotStream},
};

/// A live cart-collection subscription. Dropping it detaches the listener.
#[derive(Debug)]
pub(crate) struct Subscription {
  handle: JoinHandle<()>,
}

impl Drop for Subscription {
  fn drop(&mut self) {
    self.handle.abort();
  }
}

impl Cart {
  pub(super) fn spawn_auth_listener(
    shared: Arc<Shared>,
    store: Arc<dyn CartStore>,
    auth: watch::Receiver<Option<User>>,
  ) -> JoinHandle<()> {
    spawn(auth_listener(shared, store, auth))
  }
}

async fn auth_listener(
  shared: Arc<Shared>,
  store: Arc<dyn CartStore>,
  mut auth: watch::Receiver<Option<User>>,
) {
  let mut subscription: Option<Subscription> = None;
  let mut active: Option<String> = None;

  loop {
    let user_id = auth.borrow_and_update().as_ref().map(|u| u.id.clone());

    match &user_id {
      Some(id) if active.as_deref() == Some(id.as_str()) && subscription.is_some() => {}
      Some(id) => {
        // The previous user's listener must be gone before the next one attaches.
        drop(subscription.take());
        subscription = attach(&shared, &store, id);
      }
      None => {
        drop(subscription.take());
        shared.end_session();
      }
    }
    active = user_id;

    if auth.changed().await.is_err() {
      debug!("identity provider closed, cart stops following it");
      break;
    }
  }
}

fn attach(shared: &Arc<Shared>, store: &Arc<dyn CartStore>, user_id: &str) -> Option<Subscription> {
  let generation = shared.begin_session(user_id);

  match store.cart_watch(user_id) {
    Ok(stream) => {
      debug!(user_id, generation, "cart subscription attached");
      let handle = spawn(consume(shared.clone(), generation, user_id.to_string(), stream));
      Some(Subscription { handle })
    }
    Err(err) => {
      error!(user_id, error = %err, "failed to attach cart subscription");
      shared.settle(generation);
      None
    }
  }
}

async fn consume(
  shared: Arc<Shared>,
  generation: u64,
  user_id: String,
  mut stream: SnapshotStream,
) {
  while let Some(event) = stream.recv().await {
    let docs = match event {
      Ok(docs) => docs,
      Err(err) => {
        error!(user_id = %user_id, error = %err, "cart subscription error, keeping last lines");
        shared.settle(generation);
        continue;
      }
    };

    match lines_from_snapshot(&docs) {
      Ok(lines) => {
        if shared.apply_snapshot(generation, lines) == Outcome::Stale {
          break;
        }
      }
      Err(err) => {
        error!(user_id = %user_id, error = %err, "discarding cart snapshot");
        shared.settle(generation);
      }
    }
  }
  debug!(user_id = %user_id, generation, "cart subscription closed");
}

/// Maps a snapshot to cart lines. Any malformed document rejects the whole snapshot; a second
/// document for an already seen product is skipped.
pub(crate) fn lines_from_snapshot(docs: &[RemoteDoc]) -> Result<Vec<CartLine>, CartError> {
  let mut seen = HashSet::new();
  let mut lines = Vec::with_capacity(docs.len());

  for doc in docs {
    let line = CartLine::try_from(doc)?;
    if !seen.insert(line.product_id.clone()) {
      warn!(line_id = %line.id, product_id = %line.product_id, "duplicate cart line in snapshot");
      continue;
    }
    lines.push(line);
  }

  Ok(lines)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use serde_json::json;
  use testresult::TestResult;

  use crate::{
    cart::test_support::{product, seeded_store, settled, signed_in_cart},
    identity::{SessionIdentity, User},
    store::database::{CartStore, errors::DBError, memstore::MemoryStoreImpl},
  };

  use super::*;

  fn doc(id: &str, product_id: &str, qty: u64) -> RemoteDoc {
    RemoteDoc {
      id: id.into(),
      fields: json!({"productId": product_id, "storeId": "s1", "price": 10, "qty": qty}),
    }
  }

  #[test]
  fn test_snapshot_skips_duplicate_products() {
    let lines = lines_from_snapshot(&[doc("a", "p1", 1), doc("b", "p1", 4), doc("c", "p2", 2)]);
    let lines = lines.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].id, "a");
  }

  #[test]
  fn test_snapshot_rejects_bad_document() {
    assert!(lines_from_snapshot(&[doc("a", "p1", 1), doc("b", "p2", 0)]).is_err());
  }

  #[tokio::test]
  async fn test_sign_in_loads_remote_cart() -> TestResult {
    let store = seeded_store();
    store.cart_line_create("u1", &(&product("p1")).into()).await?;

    let (cart, _identity) = signed_in_cart(store.clone(), "u1").await;

    assert!(!cart.loading());
    assert_eq!(cart.total_qty(), 1);
    assert_eq!(cart.lines()[0].product_id, "p1");
    Ok(())
  }

  #[tokio::test]
  async fn test_starts_loading_and_settles_signed_out() {
    let store = seeded_store();
    let identity = Arc::new(SessionIdentity::new());
    let cart = Cart::start(crate::cart::CartArgs { store, identity });

    let view = settled(&cart, |v| v.user_id.is_none() && !v.loading).await;
    assert!(view.lines.is_empty());
  }

  #[tokio::test]
  async fn test_sign_out_clears_cart() -> TestResult {
    let store = seeded_store();
    let (cart, identity) = signed_in_cart(store.clone(), "u1").await;
    cart.add_to_cart(&product("p1")).await?;
    cart.add_to_cart(&product("p2")).await?;
    assert_eq!(cart.lines().len(), 2);

    identity.sign_out();
    let view = settled(&cart, |v| v.user_id.is_none()).await;

    assert!(view.lines.is_empty());
    assert!(!view.loading);
    assert_eq!(view.total_qty, 0);

    // The remote cart survives sign-out.
    assert_eq!(store.cart_lines_list("u1").await?.len(), 2);
    Ok(())
  }

  #[tokio::test]
  async fn test_switching_users_never_leaks_lines() -> TestResult {
    let store = seeded_store();
    let (cart, identity) = signed_in_cart(store.clone(), "u1").await;
    cart.add_to_cart(&product("p1")).await?;

    identity.sign_in(User::new("u2"));
    let view = settled(&cart, |v| v.user_id.as_deref() == Some("u2") && !v.loading).await;
    assert!(view.lines.is_empty());

    // u1's cart changing must no longer reach this session.
    store.cart_line_create("u1", &(&product("p2")).into()).await?;
    tokio::task::yield_now().await;
    assert!(cart.lines().is_empty());

    wait_for_watchers(&store, "u1", 0).await;
    assert_eq!(store.watchers("u2"), 1);
    Ok(())
  }

  #[tokio::test]
  async fn test_remote_changes_are_pushed() -> TestResult {
    let store = seeded_store();
    let (cart, _identity) = signed_in_cart(store.clone(), "u1").await;

    // Another device adds to the same cart.
    store.cart_line_create("u1", &(&product("p3")).into()).await?;
    let view = settled(&cart, |v| v.total_qty == 1).await;
    assert_eq!(view.lines[0].product_id, "p3");
    Ok(())
  }

  #[tokio::test]
  async fn test_subscription_error_keeps_lines() -> TestResult {
    let store = seeded_store();
    let (cart, _identity) = signed_in_cart(store.clone(), "u1").await;
    cart.add_to_cart(&product("p1")).await?;
    settled(&cart, |v| v.total_qty == 1).await;

    store.cart_watch_fail("u1", || DBError::unavailable("test"));
    tokio::task::yield_now().await;

    assert_eq!(cart.total_qty(), 1);
    assert!(!cart.loading());
    Ok(())
  }

  #[tokio::test]
  async fn test_malformed_snapshot_keeps_lines() -> TestResult {
    let store = seeded_store();
    let (cart, _identity) = signed_in_cart(store.clone(), "u1").await;
    cart.add_to_cart(&product("p1")).await?;
    settled(&cart, |v| v.total_qty == 1).await;

    let mut broken: crate::models::cart::NewCartLine = (&product("p2")).into();
    broken.qty = 0;
    store.cart_line_create("u1", &broken).await?;
    tokio::task::yield_now().await;

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].product_id, "p1");
    Ok(())
  }

  #[tokio::test]
  async fn test_attach_failure_resolves_loading() {
    let store = seeded_store();
    store.fail_next("cart_watch");
    let identity = Arc::new(SessionIdentity::new());
    identity.sign_in(User::new("u1"));
    let cart = Cart::start(crate::cart::CartArgs { store, identity });

    let view = settled(&cart, |v| v.user_id.is_some() && !v.loading).await;
    assert!(view.lines.is_empty());
  }

  #[tokio::test]
  async fn test_shutdown_detaches_subscription() {
    let store = seeded_store();
    let (cart, _identity) = signed_in_cart(store.clone(), "u1").await;
    assert_eq!(store.watchers("u1"), 1);

    cart.shutdown();
    wait_for_watchers(&store, "u1", 0).await;
  }

  async fn wait_for_watchers(store: &MemoryStoreImpl, user: &str, n: usize) {
    for _ in 0..100 {
      if store.watchers(user) == n {
        return;
      }
      tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("expected {n} watchers for {user}, found {}", store.watchers(user));
  }
}
