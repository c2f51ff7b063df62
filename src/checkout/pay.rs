use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
  checkout::main::Checkout,
  models::{
    cart::CartLine,
    errors::CheckoutError,
    order::{NewOrder, OrderItem, OrderStatus, Receipt, StoreOrder},
  },
  store::database::product_stock,
};

impl Checkout {
  /// Pays for the whole cart with credits.
  ///
  /// Quantities are re-read from the remote cart, so the order reflects what was persisted rather
  /// than what the local view last showed. The stock checks and the writes that follow are
  /// separate calls, not a transaction.
  pub async fn pay(&self) -> Result<Receipt, CheckoutError> {
    let path = "checkout.pay";
    let user = self.user()?;

    let local = self.cart.lines();
    if local.is_empty() {
      return Err(CheckoutError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(local.len());
    for line in &local {
      let doc = self.store.cart_line_get(&user.id, &line.id).await?;
      lines.push(CartLine::try_from(&doc)?);
    }
    let total: Decimal = lines.iter().map(CartLine::total_product_price).sum();

    let available = self.store.credits_get(&user.id).await?;
    if available < total {
      warn!(path, user_id = %user.id, %available, %total, "insufficient credits");
      return Err(CheckoutError::InsufficientCredits { available, required: total });
    }

    for line in &lines {
      let stock = self.line_stock(line, path).await?;
      if line.qty > stock {
        return Err(out_of_stock(line, stock));
      }
    }

    let credits = available - total;
    self.store.credits_set(&user.id, credits).await?;

    let now = Utc::now();
    let order = NewOrder {
      user_id: user.id.clone(),
      items: lines.iter().map(order_item).collect(),
      total,
      created_at: now,
    };
    let order_id = self.store.order_create(&order).await?;

    for line in &lines {
      let store_order = StoreOrder {
        order_id: order_id.clone(),
        product_id: line.product_id.clone(),
        qty: line.qty,
        status: OrderStatus::Pending,
        purchased_at: now,
      };
      self.store.store_order_create(&line.store_id, &store_order).await?;

      // Stock may have moved since the check; decrement what is there now.
      let stock = self.line_stock(line, path).await?;
      let left = stock.checked_sub(line.qty).ok_or_else(|| out_of_stock(line, stock))?;
      self.store.product_stock_set(&line.store_id, &line.product_id, left).await?;
    }

    self.cart.clear_cart().await?;

    info!(path, user_id = %user.id, order_id = %order_id, %total, "order placed");
    Ok(Receipt { order_id, total, credits })
  }
}

impl Checkout {
  async fn line_stock(&self, line: &CartLine, path: &str) -> Result<u32, CheckoutError> {
    let doc = match self.store.product_get(&line.store_id, &line.product_id).await {
      Ok(doc) => doc,
      Err(e) if e.is_not_found() => {
        return Err(CheckoutError::ProductMissing { name: line.name.clone() });
      }
      Err(e) => return Err(e.into()),
    };
    Ok(product_stock(&doc, path)?)
  }
}

fn out_of_stock(line: &CartLine, available: u32) -> CheckoutError {
  CheckoutError::OutOfStock { name: line.name.clone(), available, in_cart: line.qty }
}

fn order_item(line: &CartLine) -> OrderItem {
  OrderItem {
    product_id: line.product_id.clone(),
    name: line.name.clone(),
    price: line.price,
    qty: line.qty,
    total: line.total_product_price(),
    store_id: line.store_id.clone(),
    status: OrderStatus::Pending,
  }
}
