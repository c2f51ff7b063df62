use crate::models::cart::CartLine;

#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
  /// Replace every line with an authoritative snapshot.
  SetLines(Vec<CartLine>),
  /// Add one unit, creating the line with `qty = 1` when the product is not in the cart yet.
  Add(CartLine),
  Inc(String),
  /// Remove one unit. A line at `qty == 1` is left alone; removal goes through `Delete`.
  Dec(String),
  Delete(String),
}

pub fn reduce(mut lines: Vec<CartLine>, action: CartAction) -> Vec<CartLine> {
  match action {
    CartAction::SetLines(payload) => payload,
    CartAction::Add(item) => {
      match lines.iter_mut().find(|l| l.product_id == item.product_id) {
        Some(line) => line.qty += 1,
        None => lines.push(CartLine { qty: 1, ..item }),
      }
      lines
    }
    CartAction::Inc(product_id) => {
      if let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id) {
        line.qty += 1;
      }
      lines
    }
    CartAction::Dec(product_id) => {
      if let Some(line) = lines.iter_mut().find(|l| l.product_id == product_id && l.qty > 1) {
        line.qty -= 1;
      }
      lines
    }
    CartAction::Delete(product_id) => {
      lines.retain(|l| l.product_id != product_id);
      lines
    }
  }
}
