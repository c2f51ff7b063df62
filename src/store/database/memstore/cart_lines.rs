use serde_json::{Value, to_value};
use ulid::Ulid;

use crate::{
  models::cart::NewCartLine,
  store::database::{
    RemoteDoc,
    errors::{DBError, handle_json_error},
    memstore::MemoryStoreImpl,
  },
};

pub(super) async fn cart_line_get(
  s: &MemoryStoreImpl,
  user_id: &str,
  line_id: &str,
) -> Result<RemoteDoc, DBError> {
  let path = "cart.store.cart_line_get";
  s.begin("cart_line_get")?;

  let data = s.data.lock();
  data
    .carts
    .get(user_id)
    .and_then(|lines| lines.get(line_id))
    .map(|fields| RemoteDoc { id: line_id.to_string(), fields: fields.clone() })
    .ok_or_else(|| DBError::not_found(path, format!("users/{user_id}/cart/{line_id}")))
}

pub(super) async fn cart_line_find(
  s: &MemoryStoreImpl,
  user_id: &str,
  product_id: &str,
) -> Result<Option<RemoteDoc>, DBError> {
  s.begin("cart_line_find")?;

  let data = s.data.lock();
  let found = data.carts.get(user_id).and_then(|lines| {
    lines
      .iter()
      .find(|(_, fields)| fields.get("productId").and_then(Value::as_str) == Some(product_id))
      .map(|(id, fields)| RemoteDoc { id: id.clone(), fields: fields.clone() })
  });

  Ok(found)
}

pub(super) async fn cart_line_create(
  s: &MemoryStoreImpl,
  user_id: &str,
  line: &NewCartLine,
) -> Result<String, DBError> {
  let path = "cart.store.cart_line_create";
  s.begin("cart_line_create")?;

  let id = Ulid::new().to_string();
  let mut fields = to_value(line).map_err(|e| handle_json_error(e, path))?;
  if let Some(obj) = fields.as_object_mut() {
    obj.insert("id".into(), Value::from(id.clone()));
  }

  let mut data = s.data.lock();
  data.carts.entry(user_id.to_string()).or_default().insert(id.clone(), fields);
  data.notify(user_id);

  Ok(id)
}

pub(super) async fn cart_line_qty_set(
  s: &MemoryStoreImpl,
  user_id: &str,
  line_id: &str,
  qty: u32,
) -> Result<(), DBError> {
  let path = "cart.store.cart_line_qty_set";
  s.begin("cart_line_qty_set")?;

  let mut data = s.data.lock();
  let fields = data
    .carts
    .get_mut(user_id)
    .and_then(|lines| lines.get_mut(line_id))
    .ok_or_else(|| DBError::not_found(path, format!("users/{user_id}/cart/{line_id}")))?;

  if let Some(obj) = fields.as_object_mut() {
    obj.insert("qty".into(), Value::from(qty));
  }
  data.notify(user_id);

  Ok(())
}

pub(super) async fn cart_line_delete(
  s: &MemoryStoreImpl,
  user_id: &str,
  line_id: &str,
) -> Result<(), DBError> {
  s.begin("cart_line_delete")?;

  // Deleting a missing document succeeds, as it does on the hosted store.
  let mut data = s.data.lock();
  if let Some(lines) = data.carts.get_mut(user_id) {
    lines.remove(line_id);
  }
  data.notify(user_id);

  Ok(())
}

pub(super) async fn cart_lines_list(
  s: &MemoryStoreImpl,
  user_id: &str,
) -> Result<Vec<RemoteDoc>, DBError> {
  s.begin("cart_lines_list")?;
  Ok(s.data.lock().cart_snapshot(user_id))
}
