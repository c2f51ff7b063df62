mod accounts;
mod cart_lines;
mod cart_watch;
mod orders;
mod products;
mod router;

use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::{
  models::config::CatalogEntry,
  store::database::{RemoteDoc, errors::DBError},
};

type SnapshotSender = UnboundedSender<Result<Vec<RemoteDoc>, DBError>>;

#[derive(Debug, Default)]
pub(crate) struct Collections {
  pub(crate) products: HashMap<(String, String), Value>,
  pub(crate) carts: HashMap<String, BTreeMap<String, Value>>,
  pub(crate) users: HashMap<String, Value>,
  pub(crate) orders: BTreeMap<String, Value>,
  pub(crate) store_orders: HashMap<String, BTreeMap<String, Value>>,
  pub(crate) watchers: HashMap<String, Vec<SnapshotSender>>,
}

impl Collections {
  pub(crate) fn cart_snapshot(&self, user_id: &str) -> Vec<RemoteDoc> {
    self
      .carts
      .get(user_id)
      .map(|lines| {
        lines.iter().map(|(id, f)| RemoteDoc { id: id.clone(), fields: f.clone() }).collect()
      })
      .unwrap_or_default()
  }

  /// Pushes the user's current cart to every live watcher, dropping detached ones.
  pub(crate) fn notify(&mut self, user_id: &str) {
    let snapshot = self.cart_snapshot(user_id);
    if let Some(watchers) = self.watchers.get_mut(user_id) {
      watchers.retain(|tx| tx.send(Ok(snapshot.clone())).is_ok());
    }
  }
}

/// In-process implementation of the remote document store.
///
/// Backs the development console and the tests. Documents are kept as JSON values so they go
/// through the same decoding the cart applies to real remote documents.
#[derive(Debug, Default)]
pub struct MemoryStoreImpl {
  pub(crate) data: Mutex<Collections>,
  pub(crate) failures: Mutex<HashSet<&'static str>>,
  pub(crate) calls: Mutex<HashMap<&'static str, usize>>,
}

#[derive(Debug, Default)]
pub struct MemoryStoreImplArgs {
  pub catalog: Vec<CatalogEntry>,
}

impl MemoryStoreImpl {
  pub fn new(args: MemoryStoreImplArgs) -> Self {
    let store = Self::default();
    for entry in &args.catalog {
      store.product_put(
        &entry.store_id,
        &entry.product_id,
        json!({
          "name": entry.name,
          "price": entry.price,
          "imageUrl": entry.image_url,
          "stock": entry.stock,
        }),
      );
    }
    debug!(products = args.catalog.len(), "memory store seeded");
    store
  }

  pub fn product_put(&self, store_id: &str, product_id: &str, fields: Value) {
    self.data.lock().products.insert((store_id.to_string(), product_id.to_string()), fields);
  }

  /// Makes the next call of `op` fail as if the backend were unreachable.
  pub fn fail_next(&self, op: &'static str) {
    self.failures.lock().insert(op);
  }

  /// How many times `op` has been called, failed calls included.
  pub fn calls(&self, op: &'static str) -> usize {
    self.calls.lock().get(op).copied().unwrap_or(0)
  }

  /// Number of live cart subscriptions for a user.
  pub fn watchers(&self, user_id: &str) -> usize {
    let data = self.data.lock();
    data.watchers.get(user_id).map_or(0, |w| w.iter().filter(|tx| !tx.is_closed()).count())
  }

  pub(crate) fn begin(&self, op: &'static str) -> Result<(), DBError> {
    *self.calls.lock().entry(op).or_insert(0) += 1;
    if self.failures.lock().remove(op) {
      return Err(DBError::unavailable(&format!("cart.store.{op}")));
    }
    Ok(())
  }
}
