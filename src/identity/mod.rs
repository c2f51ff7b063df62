mod session;

pub use session::SessionIdentity;

use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub id: String,
}

impl User {
  pub fn new(id: impl Into<String>) -> Self {
    Self { id: id.into() }
  }
}

/// Source of the signed-in user.
pub trait IdentityProvider: Send + Sync {
  fn current_user(&self) -> Option<User>;

  /// Auth state changes. The receiver holds the current state when it is returned and is
  /// notified on every sign-in and sign-out; dropping it unsubscribes.
  fn on_auth_state_changed(&self) -> watch::Receiver<Option<User>>;
}
