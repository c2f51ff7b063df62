use tokio::sync::watch;
use tracing::info;

use crate::identity::{IdentityProvider, User};

/// In-process identity provider driven by explicit sign-in and sign-out calls.
#[derive(Debug)]
pub struct SessionIdentity {
  state: watch::Sender<Option<User>>,
}

impl Default for SessionIdentity {
  fn default() -> Self {
    let (state, _) = watch::channel(None);
    Self { state }
  }
}

impl SessionIdentity {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn sign_in(&self, user: User) {
    info!(user_id = %user.id, "signed in");
    self.state.send_replace(Some(user));
  }

  pub fn sign_out(&self) {
    if let Some(prev) = self.state.send_replace(None) {
      info!(user_id = %prev.id, "signed out");
    }
  }
}

impl IdentityProvider for SessionIdentity {
  fn current_user(&self) -> Option<User> {
    self.state.borrow().clone()
  }

  fn on_auth_state_changed(&self) -> watch::Receiver<Option<User>> {
    self.state.subscribe()
  }
}
