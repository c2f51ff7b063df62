use tracing::{error, info, warn};

use crate::{
  cart::{
    main::{Cart, Outcome, remote_failure},
    reducer::CartAction,
  },
  models::{
    cart::{CartLine, NewCartLine, ProductRef, doc_qty},
    errors::CartError,
  },
  store::database::product_stock,
};

impl Cart {
  /// Adds one unit of `product`, creating the remote line on first add.
  ///
  /// Stock and the existing quantity are read before writing, outside any transaction: two
  /// devices adding concurrently can overshoot the stock by a unit or two.
  pub async fn add_to_cart(&self, product: &ProductRef) -> Result<Outcome, CartError> {
    let op = "add_to_cart";
    let Some(session) = self.session() else {
      return Ok(Outcome::SignedOut);
    };
    let product_id = product.product_id.as_str();
    let fail = |e| remote_failure(op, product_id, e);

    let doc = self.store.product_get(&product.store_id, product_id).await.map_err(fail)?;
    let stock = product_stock(&doc, "cart.add_to_cart").map_err(fail)?;

    let existing = self.store.cart_line_find(&session.user_id, product_id).await.map_err(fail)?;
    let in_cart = match &existing {
      Some(doc) => doc_qty(doc).inspect_err(|e| {
        error!(op, product_id, error = %e, "cart line document rejected");
      })?,
      None => 0,
    };

    if in_cart >= stock {
      warn!(op, product_id, stock, in_cart, "stock exceeded");
      return Err(CartError::StockExceeded { product_id: product_id.to_string(), stock, in_cart });
    }

    let line_id = match existing {
      Some(doc) => {
        self.store.cart_line_qty_set(&session.user_id, &doc.id, in_cart + 1).await.map_err(fail)?;
        doc.id
      }
      None => {
        let line = NewCartLine::from(product);
        self.store.cart_line_create(&session.user_id, &line).await.map_err(fail)?
      }
    };

    info!(op, product_id, qty = in_cart + 1, "cart line written");
    let line = CartLine::from_product(line_id, product);
    Ok(self.shared.dispatch(session.generation, CartAction::Add(line)))
  }
}
