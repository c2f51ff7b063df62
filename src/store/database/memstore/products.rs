use serde_json::Value;

use crate::store::database::{RemoteDoc, errors::DBError, memstore::MemoryStoreImpl};

pub(super) async fn product_get(
  s: &MemoryStoreImpl,
  store_id: &str,
  product_id: &str,
) -> Result<RemoteDoc, DBError> {
  let path = "cart.store.product_get";
  s.begin("product_get")?;

  let data = s.data.lock();
  data
    .products
    .get(&(store_id.to_string(), product_id.to_string()))
    .map(|fields| RemoteDoc { id: product_id.to_string(), fields: fields.clone() })
    .ok_or_else(|| DBError::not_found(path, format!("stores/{store_id}/products/{product_id}")))
}

pub(super) async fn product_stock_set(
  s: &MemoryStoreImpl,
  store_id: &str,
  product_id: &str,
  stock: u32,
) -> Result<(), DBError> {
  let path = "cart.store.product_stock_set";
  s.begin("product_stock_set")?;

  let mut data = s.data.lock();
  let product = data
    .products
    .get_mut(&(store_id.to_string(), product_id.to_string()))
    .ok_or_else(|| DBError::not_found(path, format!("stores/{store_id}/products/{product_id}")))?;

  if let Some(fields) = product.as_object_mut() {
    fields.insert("stock".into(), Value::from(stock));
  }
  Ok(())
}
