use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
  models::{
    cart::NewCartLine,
    order::{NewOrder, StoreOrder},
  },
  store::database::{
    CartStore, RemoteDoc, SnapshotStream,
    errors::DBError,
    memstore::{
      MemoryStoreImpl,
      accounts::{credits_get, credits_set},
      cart_lines::{
        cart_line_create, cart_line_delete, cart_line_find, cart_line_get, cart_line_qty_set,
        cart_lines_list,
      },
      cart_watch::cart_watch,
      orders::{order_create, store_order_create},
      products::{product_get, product_stock_set},
    },
  },
};

#[async_trait]
impl CartStore for MemoryStoreImpl {
  async fn product_get(&self, store_id: &str, product_id: &str) -> Result<RemoteDoc, DBError> {
    product_get(self, store_id, product_id).await
  }

  async fn product_stock_set(
    &self,
    store_id: &str,
    product_id: &str,
    stock: u32,
  ) -> Result<(), DBError> {
    product_stock_set(self, store_id, product_id, stock).await
  }

  async fn cart_line_get(&self, user_id: &str, line_id: &str) -> Result<RemoteDoc, DBError> {
    cart_line_get(self, user_id, line_id).await
  }

  async fn cart_line_find(
    &self,
    user_id: &str,
    product_id: &str,
  ) -> Result<Option<RemoteDoc>, DBError> {
    cart_line_find(self, user_id, product_id).await
  }

  async fn cart_line_create(&self, user_id: &str, line: &NewCartLine) -> Result<String, DBError> {
    cart_line_create(self, user_id, line).await
  }

  async fn cart_line_qty_set(
    &self,
    user_id: &str,
    line_id: &str,
    qty: u32,
  ) -> Result<(), DBError> {
    cart_line_qty_set(self, user_id, line_id, qty).await
  }

  async fn cart_line_delete(&self, user_id: &str, line_id: &str) -> Result<(), DBError> {
    cart_line_delete(self, user_id, line_id).await
  }

  async fn cart_lines_list(&self, user_id: &str) -> Result<Vec<RemoteDoc>, DBError> {
    cart_lines_list(self, user_id).await
  }

  fn cart_watch(&self, user_id: &str) -> Result<SnapshotStream, DBError> {
    cart_watch(self, user_id)
  }

  async fn credits_get(&self, user_id: &str) -> Result<Decimal, DBError> {
    credits_get(self, user_id).await
  }

  async fn credits_set(&self, user_id: &str, credits: Decimal) -> Result<(), DBError> {
    credits_set(self, user_id, credits).await
  }

  async fn order_create(&self, order: &NewOrder) -> Result<String, DBError> {
    order_create(self, order).await
  }

  async fn store_order_create(
    &self,
    store_id: &str,
    order: &StoreOrder,
  ) -> Result<String, DBError> {
    store_order_create(self, store_id, order).await
  }
}
