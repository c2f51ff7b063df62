use chrono::{DateTime, Utc};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  #[display("pending")]
  Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub product_id: String,
  pub name: String,
  pub price: Decimal,
  pub qty: u32,
  pub total: Decimal,
  pub store_id: String,
  pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
  pub user_id: String,
  pub items: Vec<OrderItem>,
  pub total: Decimal,
  pub created_at: DateTime<Utc>,
}

/// The per-seller copy of an order line, written under the seller's store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOrder {
  pub order_id: String,
  pub product_id: String,
  pub qty: u32,
  pub status: OrderStatus,
  pub purchased_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
  pub order_id: String,
  pub total: Decimal,
  pub credits: Decimal,
}
