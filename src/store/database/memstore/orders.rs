use serde_json::{Value, to_value};
use ulid::Ulid;

use crate::{
  models::order::{NewOrder, StoreOrder},
  store::database::{
    RemoteDoc,
    errors::{DBError, handle_json_error},
    memstore::MemoryStoreImpl,
  },
};

pub(super) async fn order_create(s: &MemoryStoreImpl, order: &NewOrder) -> Result<String, DBError> {
  let path = "cart.store.order_create";
  s.begin("order_create")?;

  let id = Ulid::new().to_string();
  let mut fields = to_value(order).map_err(|e| handle_json_error(e, path))?;
  if let Some(obj) = fields.as_object_mut() {
    obj.insert("id".into(), Value::from(id.clone()));
  }
  s.data.lock().orders.insert(id.clone(), fields);

  Ok(id)
}

pub(super) async fn store_order_create(
  s: &MemoryStoreImpl,
  store_id: &str,
  order: &StoreOrder,
) -> Result<String, DBError> {
  let path = "cart.store.store_order_create";
  s.begin("store_order_create")?;

  let id = Ulid::new().to_string();
  let fields = to_value(order).map_err(|e| handle_json_error(e, path))?;
  s.data.lock().store_orders.entry(store_id.to_string()).or_default().insert(id.clone(), fields);

  Ok(id)
}

impl MemoryStoreImpl {
  pub fn orders(&self) -> Vec<RemoteDoc> {
    let data = self.data.lock();
    data.orders.iter().map(|(id, f)| RemoteDoc { id: id.clone(), fields: f.clone() }).collect()
  }

  pub fn store_orders(&self, store_id: &str) -> Vec<RemoteDoc> {
    let data = self.data.lock();
    data
      .store_orders
      .get(store_id)
      .map(|o| o.iter().map(|(id, f)| RemoteDoc { id: id.clone(), fields: f.clone() }).collect())
      .unwrap_or_default()
  }
}
