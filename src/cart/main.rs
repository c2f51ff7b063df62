use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::{sync::watch, task::JoinHandle};
use tracing::error;

use crate::{
  cart::{
    reducer::CartAction,
    state::{CartState, CartView},
  },
  identity::IdentityProvider,
  models::{cart::CartLine, errors::CartError},
  store::database::{CartStore, errors::DBError},
};

/// What a cart operation did locally once its remote part succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Applied,
  /// No user was signed in; nothing was read or written.
  SignedOut,
  /// The remote write landed after the issuing session ended, so the local state was not touched.
  Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Session {
  pub(crate) user_id: String,
  pub(crate) generation: u64,
}

#[derive(Debug, Default)]
pub(crate) struct CartInner {
  pub(crate) state: CartState,
  pub(crate) session: Option<Session>,
  pub(crate) generation: u64,
}

/// State shared by the cart handle, the auth listener and the snapshot subscription.
#[derive(Debug)]
pub(crate) struct Shared {
  inner: Mutex<CartInner>,
  view: watch::Sender<CartView>,
}

impl Shared {
  fn new() -> Self {
    let inner = CartInner::default();
    let (view, _) = watch::channel(CartView::new(None, &inner.state));
    Self { inner: Mutex::new(inner), view }
  }

  fn publish(&self, inner: &CartInner) {
    let user_id = inner.session.as_ref().map(|s| s.user_id.clone());
    self.view.send_replace(CartView::new(user_id, &inner.state));
  }

  pub(crate) fn session(&self, user_id: &str) -> Option<Session> {
    self.inner.lock().session.clone().filter(|s| s.user_id == user_id)
  }

  /// Applies `action` if `generation` is still the live session.
  pub(crate) fn dispatch(&self, generation: u64, action: CartAction) -> Outcome {
    let mut inner = self.inner.lock();
    if inner.generation != generation {
      return Outcome::Stale;
    }
    inner.state.dispatch(action);
    self.publish(&inner);
    Outcome::Applied
  }

  pub(crate) fn apply_snapshot(&self, generation: u64, lines: Vec<CartLine>) -> Outcome {
    let mut inner = self.inner.lock();
    if inner.generation != generation {
      return Outcome::Stale;
    }
    inner.state.dispatch(CartAction::SetLines(lines));
    inner.state.loading = false;
    self.publish(&inner);
    Outcome::Applied
  }

  /// Resolves `loading` without touching the lines.
  pub(crate) fn settle(&self, generation: u64) {
    let mut inner = self.inner.lock();
    if inner.generation == generation && inner.state.loading {
      inner.state.loading = false;
      self.publish(&inner);
    }
  }

  /// Starts a fresh, empty, loading session for `user_id` and returns its generation.
  pub(crate) fn begin_session(&self, user_id: &str) -> u64 {
    let mut inner = self.inner.lock();
    inner.generation += 1;
    let generation = inner.generation;
    inner.session = Some(Session { user_id: user_id.to_string(), generation });
    inner.state = CartState::default();
    self.publish(&inner);
    generation
  }

  pub(crate) fn end_session(&self) {
    let mut inner = self.inner.lock();
    inner.generation += 1;
    inner.session = None;
    inner.state.dispatch(CartAction::SetLines(vec![]));
    inner.state.loading = false;
    self.publish(&inner);
  }
}

/// The signed-in user's shopping cart, kept in step with the remote cart collection.
pub struct Cart {
  pub(crate) store: Arc<dyn CartStore>,
  pub(crate) identity: Arc<dyn IdentityProvider>,
  pub(crate) shared: Arc<Shared>,
  listener: Mutex<Option<JoinHandle<()>>>,
}

pub struct CartArgs {
  pub store: Arc<dyn CartStore>,
  pub identity: Arc<dyn IdentityProvider>,
}

impl fmt::Debug for Cart {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Cart").field("view", &*self.shared.view.borrow()).finish_non_exhaustive()
  }
}

impl Cart {
  /// Creates the cart and starts following the identity provider. Must be called inside a
  /// tokio runtime.
  pub fn start(args: CartArgs) -> Self {
    let shared = Arc::new(Shared::new());
    let listener = Cart::spawn_auth_listener(
      shared.clone(),
      args.store.clone(),
      args.identity.on_auth_state_changed(),
    );

    Self {
      store: args.store,
      identity: args.identity,
      shared,
      listener: Mutex::new(Some(listener)),
    }
  }

  /// Stops following the identity provider and detaches the live cart subscription.
  pub fn shutdown(&self) {
    if let Some(listener) = self.listener.lock().take() {
      listener.abort();
    }
  }

  pub fn subscribe(&self) -> watch::Receiver<CartView> {
    self.shared.view.subscribe()
  }

  pub fn view(&self) -> CartView {
    self.shared.view.borrow().clone()
  }

  pub fn lines(&self) -> Vec<CartLine> {
    self.shared.view.borrow().lines.clone()
  }

  pub fn total_price(&self) -> Decimal {
    self.shared.view.borrow().total_price
  }

  pub fn total_qty(&self) -> u32 {
    self.shared.view.borrow().total_qty
  }

  pub fn loading(&self) -> bool {
    self.shared.view.borrow().loading
  }

  /// The live session of the provider's current user, if the cart has picked it up.
  pub(crate) fn session(&self) -> Option<Session> {
    let user = self.identity.current_user()?;
    self.shared.session(&user.id)
  }
}

impl Drop for Cart {
  fn drop(&mut self) {
    self.shutdown();
  }
}

pub(super) fn remote_failure(op: &'static str, product_id: &str, err: DBError) -> CartError {
  error!(op, product_id, error = %err, "remote store call failed");
  CartError::remote(op, product_id, err)
}
