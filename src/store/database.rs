pub mod errors;
pub mod memstore;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
  models::{
    cart::NewCartLine,
    order::{NewOrder, StoreOrder},
  },
  store::database::errors::DBError,
};

/// A document as the remote store returns it: its id plus untyped fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteDoc {
  pub id: String,
  pub fields: Value,
}

/// Full snapshots of one user's cart collection, pushed on every change.
pub type SnapshotStream = UnboundedReceiver<Result<Vec<RemoteDoc>, DBError>>;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CartStore: Send + Sync {
  /// Point read of a product record under `stores/{store_id}/products/{product_id}`.
  async fn product_get(&self, store_id: &str, product_id: &str) -> Result<RemoteDoc, DBError>;

  async fn product_stock_set(
    &self,
    store_id: &str,
    product_id: &str,
    stock: u32,
  ) -> Result<(), DBError>;

  async fn cart_line_get(&self, user_id: &str, line_id: &str) -> Result<RemoteDoc, DBError>;

  /// Equality query on `productId`; at most one line matches.
  async fn cart_line_find(
    &self,
    user_id: &str,
    product_id: &str,
  ) -> Result<Option<RemoteDoc>, DBError>;

  /// Creates a cart line and returns the id the store assigned to it.
  async fn cart_line_create(&self, user_id: &str, line: &NewCartLine) -> Result<String, DBError>;

  async fn cart_line_qty_set(&self, user_id: &str, line_id: &str, qty: u32)
  -> Result<(), DBError>;

  async fn cart_line_delete(&self, user_id: &str, line_id: &str) -> Result<(), DBError>;

  async fn cart_lines_list(&self, user_id: &str) -> Result<Vec<RemoteDoc>, DBError>;

  /// Live query on the user's cart collection. The current snapshot is delivered first;
  /// dropping the stream detaches the listener.
  fn cart_watch(&self, user_id: &str) -> Result<SnapshotStream, DBError>;

  /// The user's credit balance; a user without a profile document has none.
  async fn credits_get(&self, user_id: &str) -> Result<Decimal, DBError>;

  async fn credits_set(&self, user_id: &str, credits: Decimal) -> Result<(), DBError>;

  async fn order_create(&self, order: &NewOrder) -> Result<String, DBError>;

  async fn store_order_create(&self, store_id: &str, order: &StoreOrder)
  -> Result<String, DBError>;
}

/// Reads the `stock` field of a product document.
pub fn product_stock(doc: &RemoteDoc, path: &str) -> Result<u32, DBError> {
  doc.fields.get("stock").and_then(Value::as_u64).and_then(|s| u32::try_from(s).ok()).ok_or_else(
    || {
      DBError::new(
        errors::DBErrorType::Decode,
        None,
        "product has no valid stock field",
        path,
        format!("product: {}", doc.id),
      )
    },
  )
}
