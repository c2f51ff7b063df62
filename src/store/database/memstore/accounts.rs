use rust_decimal::Decimal;
use serde_json::{Value, from_value, json, to_value};

use crate::store::database::{
  errors::{DBError, DBErrorType, handle_json_error},
  memstore::MemoryStoreImpl,
};

pub(super) async fn credits_get(s: &MemoryStoreImpl, user_id: &str) -> Result<Decimal, DBError> {
  let path = "cart.store.credits_get";
  s.begin("credits_get")?;

  let data = s.data.lock();
  match data.users.get(user_id).and_then(|u| u.get("credits")) {
    None | Some(Value::Null) => Ok(Decimal::ZERO),
    Some(v) => from_value(v.clone()).map_err(|e| {
      DBError::new(DBErrorType::Decode, Some(Box::new(e)), "invalid credits field", path, user_id)
    }),
  }
}

pub(super) async fn credits_set(
  s: &MemoryStoreImpl,
  user_id: &str,
  credits: Decimal,
) -> Result<(), DBError> {
  let path = "cart.store.credits_set";
  s.begin("credits_set")?;

  let value = to_value(credits).map_err(|e| handle_json_error(e, path))?;
  let mut data = s.data.lock();
  let user = data.users.entry(user_id.to_string()).or_insert_with(|| json!({}));
  if let Some(obj) = user.as_object_mut() {
    obj.insert("credits".into(), value);
  }

  Ok(())
}
