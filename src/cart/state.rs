use rust_decimal::Decimal;

use crate::{
  cart::reducer::{CartAction, reduce},
  models::cart::CartLine,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
  pub lines: Vec<CartLine>,
  pub loading: bool,
}

impl Default for CartState {
  fn default() -> Self {
    Self { lines: vec![], loading: true }
  }
}

impl CartState {
  pub fn dispatch(&mut self, action: CartAction) {
    self.lines = reduce(std::mem::take(&mut self.lines), action);
  }

  pub fn total_price(&self) -> Decimal {
    self.lines.iter().map(CartLine::total_product_price).sum()
  }

  pub fn total_qty(&self) -> u32 {
    self.lines.iter().map(|l| l.qty).sum()
  }
}

/// Read-only view of the cart published to the presentation layer after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
  pub user_id: Option<String>,
  pub lines: Vec<CartLine>,
  pub total_price: Decimal,
  pub total_qty: u32,
  pub loading: bool,
}

impl CartView {
  pub(crate) fn new(user_id: Option<String>, state: &CartState) -> Self {
    Self {
      user_id,
      lines: state.lines.clone(),
      total_price: state.total_price(),
      total_qty: state.total_qty(),
      loading: state.loading,
    }
  }

  pub fn line(&self, product_id: &str) -> Option<&CartLine> {
    self.lines.iter().find(|l| l.product_id == product_id)
  }
}
