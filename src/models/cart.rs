use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  models::{config::CatalogEntry, errors::CartError},
  store::database::RemoteDoc,
};

/// One product's quantity entry in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
  pub id: String,
  pub product_id: String,
  pub store_id: String,
  pub name: String,
  pub image_url: String,
  pub price: Decimal,
  pub qty: u32,
}

impl CartLine {
  pub fn total_product_price(&self) -> Decimal {
    self.price * Decimal::from(self.qty)
  }

  /// Builds the local line for a product that was just written remotely under `id`.
  pub fn from_product(id: impl Into<String>, product: &ProductRef) -> Self {
    Self {
      id: id.into(),
      product_id: product.product_id.clone(),
      store_id: product.store_id.clone(),
      name: product.name.clone(),
      image_url: product.image_url.clone(),
      price: product.price,
      qty: 1,
    }
  }
}

/// The product fields copied into a cart line when it is first added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
  pub product_id: String,
  pub store_id: String,
  pub name: String,
  pub price: Decimal,
  pub image_url: String,
}

impl From<&CatalogEntry> for ProductRef {
  fn from(entry: &CatalogEntry) -> Self {
    Self {
      product_id: entry.product_id.clone(),
      store_id: entry.store_id.clone(),
      name: entry.name.clone(),
      price: entry.price,
      image_url: entry.image_url.clone(),
    }
  }
}

/// Create payload for a remote cart-line document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartLine {
  pub product_id: String,
  pub store_id: String,
  pub name: String,
  pub price: Decimal,
  pub qty: u32,
  pub image_url: String,
}

impl From<&ProductRef> for NewCartLine {
  fn from(p: &ProductRef) -> Self {
    Self {
      product_id: p.product_id.clone(),
      store_id: p.store_id.clone(),
      name: p.name.clone(),
      price: p.price,
      qty: 1,
      image_url: p.image_url.clone(),
    }
  }
}

// Fields a cart document must carry. Anything else in the document (a persisted
// totalProductPrice included) is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartLineRecord {
  product_id: String,
  store_id: String,
  #[serde(default)]
  name: String,
  #[serde(default)]
  image_url: String,
  price: Decimal,
  qty: u32,
}

impl TryFrom<&RemoteDoc> for CartLine {
  type Error = CartError;

  fn try_from(doc: &RemoteDoc) -> Result<Self, Self::Error> {
    let invalid = |reason: String| CartError::InvalidLine { id: doc.id.clone(), reason };

    let rec: CartLineRecord =
      serde_json::from_value(doc.fields.clone()).map_err(|e| invalid(e.to_string()))?;

    if rec.qty < 1 {
      return Err(invalid("qty must be at least 1".into()));
    }
    if rec.price.is_sign_negative() {
      return Err(invalid(format!("negative price {}", rec.price)));
    }

    Ok(CartLine {
      id: doc.id.clone(),
      product_id: rec.product_id,
      store_id: rec.store_id,
      name: rec.name,
      image_url: rec.image_url,
      price: rec.price,
      qty: rec.qty,
    })
  }
}

/// Reads the integer `qty` field of a cart document, failing closed like the full mapping.
pub fn doc_qty(doc: &RemoteDoc) -> Result<u32, CartError> {
  doc
    .fields
    .get("qty")
    .and_then(Value::as_u64)
    .and_then(|q| u32::try_from(q).ok())
    .filter(|q| *q >= 1)
    .ok_or_else(|| CartError::InvalidLine { id: doc.id.clone(), reason: "qty must be >= 1".into() })
}
