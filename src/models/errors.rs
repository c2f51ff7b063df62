use std::error::Error;

use derive_more::Display;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::database::errors::DBError;

pub type BoxedErr = Box<dyn Error + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Display)]
pub enum ErrorType {
  #[display("config")]
  Config,
  #[display("io")]
  Io,
  #[display("internal")]
  Internal,
}

#[derive(Debug, Display)]
#[display("InternalError: {} {} {} {} {}", err_type, temp, err, msg, path)]
pub struct InternalError {
  pub err_type: ErrorType,
  pub temp: bool,
  pub err: BoxedErr,
  pub msg: String,
  pub path: String,
}

impl Error for InternalError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(&*self.err)
  }
}

/// Failures surfaced by the cart operations.
///
/// None of these leave a partial local mutation behind: the local cart is only touched after the
/// remote write it mirrors has succeeded.
#[derive(Debug, Error)]
pub enum CartError {
  #[error("not enough stock for {product_id}: {stock} available, {in_cart} in cart")]
  StockExceeded { product_id: String, stock: u32, in_cart: u32 },

  #[error("{op} failed for {product_id}: {source}")]
  RemoteUnavailable {
    op: &'static str,
    product_id: String,
    #[source]
    source: DBError,
  },

  #[error("invalid cart line document {id}: {reason}")]
  InvalidLine { id: String, reason: String },
}

impl CartError {
  pub(crate) fn remote(op: &'static str, product_id: &str, source: DBError) -> Self {
    Self::RemoteUnavailable { op, product_id: product_id.to_string(), source }
  }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
  #[error("no user is signed in")]
  SignedOut,

  #[error("the cart is empty")]
  EmptyCart,

  #[error("credit amount must be at least 1")]
  InvalidAmount,

  #[error("insufficient credits: {available} available, {required} required")]
  InsufficientCredits { available: Decimal, required: Decimal },

  #[error("product {name} no longer exists")]
  ProductMissing { name: String },

  #[error("not enough stock for {name}. available: {available}, in cart: {in_cart}")]
  OutOfStock { name: String, available: u32, in_cart: u32 },

  #[error(transparent)]
  Remote(#[from] DBError),

  #[error(transparent)]
  Cart(#[from] CartError),
}
