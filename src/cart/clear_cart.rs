use tokio::task::JoinSet;
use tracing::info;

use crate::{
  cart::{
    main::{Cart, Outcome, remote_failure},
    reducer::CartAction,
  },
  models::errors::CartError,
  store::database::errors::{DBError, DBErrorType},
};

impl Cart {
  /// Deletes every remote line of the user's cart, concurrently. The local cart is emptied only
  /// when all deletes succeeded; on failure the next snapshot shows what is left.
  pub async fn clear_cart(&self) -> Result<Outcome, CartError> {
    let op = "clear_cart";
    let Some(session) = self.session() else {
      return Ok(Outcome::SignedOut);
    };

    let docs =
      self.store.cart_lines_list(&session.user_id).await.map_err(|e| remote_failure(op, "", e))?;
    let count = docs.len();

    let mut deletes = JoinSet::new();
    for doc in docs {
      let store = self.store.clone();
      let user_id = session.user_id.clone();
      deletes.spawn(async move {
        let product_id =
          doc.fields.get("productId").and_then(|v| v.as_str()).unwrap_or_default().to_string();
        (product_id, store.cart_line_delete(&user_id, &doc.id).await)
      });
    }

    let mut failure: Option<(String, DBError)> = None;
    while let Some(joined) = deletes.join_next().await {
      let res = match joined {
        Ok((_, Ok(()))) => continue,
        Ok((product_id, Err(e))) => (product_id, e),
        Err(e) => {
          let err = DBError::new(
            DBErrorType::Internal,
            Some(Box::new(e)),
            "delete task failed",
            "cart.clear_cart",
            "",
          );
          (String::new(), err)
        }
      };
      failure.get_or_insert(res);
    }

    if let Some((product_id, err)) = failure {
      return Err(remote_failure(op, &product_id, err));
    }

    info!(op, user_id = %session.user_id, count, "cart cleared");
    Ok(self.shared.dispatch(session.generation, CartAction::SetLines(vec![])))
  }
}
