use tracing::warn;

use crate::{
  cart::{
    main::{Cart, Outcome, remote_failure},
    reducer::CartAction,
  },
  models::{cart::CartLine, errors::CartError},
  store::database::product_stock,
};

impl Cart {
  pub async fn increment_item(&self, line: &CartLine) -> Result<Outcome, CartError> {
    let op = "increment_item";
    let Some(session) = self.session() else {
      return Ok(Outcome::SignedOut);
    };
    let product_id = line.product_id.as_str();
    let fail = |e| remote_failure(op, product_id, e);

    let doc = self.store.product_get(&line.store_id, product_id).await.map_err(fail)?;
    let stock = product_stock(&doc, "cart.increment_item").map_err(fail)?;

    if line.qty >= stock {
      warn!(op, product_id, stock, in_cart = line.qty, "stock exceeded");
      return Err(CartError::StockExceeded {
        product_id: product_id.to_string(),
        stock,
        in_cart: line.qty,
      });
    }

    self.store.cart_line_qty_set(&session.user_id, &line.id, line.qty + 1).await.map_err(fail)?;

    Ok(self.shared.dispatch(session.generation, CartAction::Inc(line.product_id.clone())))
  }
}
