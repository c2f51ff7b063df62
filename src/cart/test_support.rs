use std::{sync::Arc, time::Duration};

use rust_decimal::Decimal;
use tokio::time::timeout;

use crate::{
  cart::{Cart, CartArgs, state::CartView},
  identity::{SessionIdentity, User},
  models::{cart::ProductRef, config::CatalogEntry},
  store::database::memstore::{MemoryStoreImpl, MemoryStoreImplArgs},
};

// (product, name, price in cents, stock), all sold by store s1.
const CATALOG: [(&str, &str, i64, u32); 3] =
  [("p1", "Mug", 40_00, 5), ("p2", "Plate", 15_00, 5), ("p3", "Spoon", 2_50, 2)];

pub(crate) fn product(product_id: &str) -> ProductRef {
  let (id, name, cents, _) = CATALOG
    .iter()
    .find(|(id, ..)| *id == product_id)
    .copied()
    .unwrap_or((product_id, "X", 1_00, 0));
  ProductRef {
    product_id: id.into(),
    store_id: "s1".into(),
    name: name.into(),
    price: Decimal::new(cents, 2),
    image_url: format!("https://img.test/{id}.png"),
  }
}

pub(crate) fn catalog() -> Vec<CatalogEntry> {
  CATALOG
    .iter()
    .map(|&(id, name, cents, stock)| CatalogEntry {
      store_id: "s1".into(),
      product_id: id.into(),
      name: name.into(),
      price: Decimal::new(cents, 2),
      image_url: String::new(),
      stock,
    })
    .collect()
}

pub(crate) fn seeded_store() -> Arc<MemoryStoreImpl> {
  Arc::new(MemoryStoreImpl::new(MemoryStoreImplArgs { catalog: catalog() }))
}

/// Waits until the published cart view satisfies `pred`.
pub(crate) async fn settled(cart: &Cart, pred: impl FnMut(&CartView) -> bool) -> CartView {
  let mut rx = cart.subscribe();
  let view = timeout(Duration::from_secs(2), rx.wait_for(pred))
    .await
    .expect("cart view did not settle")
    .expect("cart view channel closed");
  view.clone()
}

pub(crate) async fn signed_in_cart(
  store: Arc<MemoryStoreImpl>,
  user_id: &str,
) -> (Cart, Arc<SessionIdentity>) {
  let identity = Arc::new(SessionIdentity::new());
  identity.sign_in(User::new(user_id));
  let cart = Cart::start(CartArgs { store, identity: identity.clone() });
  settled(&cart, |v| v.user_id.as_deref() == Some(user_id) && !v.loading).await;
  (cart, identity)
}
