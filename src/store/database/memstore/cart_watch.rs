use tokio::sync::mpsc::unbounded_channel;

use crate::store::database::{SnapshotStream, errors::DBError, memstore::MemoryStoreImpl};

pub(super) fn cart_watch(s: &MemoryStoreImpl, user_id: &str) -> Result<SnapshotStream, DBError> {
  s.begin("cart_watch")?;

  let (tx, rx) = unbounded_channel();
  let mut data = s.data.lock();
  let snapshot = data.cart_snapshot(user_id);
  if tx.send(Ok(snapshot)).is_ok() {
    data.watchers.entry(user_id.to_string()).or_default().push(tx);
  }

  Ok(rx)
}

impl MemoryStoreImpl {
  /// Reports `err` to every live cart subscription of the user. The subscriptions stay open.
  pub fn cart_watch_fail(&self, user_id: &str, err: impl Fn() -> DBError) {
    let mut data = self.data.lock();
    if let Some(watchers) = data.watchers.get_mut(user_id) {
      watchers.retain(|tx| tx.send(Err(err())).is_ok());
    }
  }
}
