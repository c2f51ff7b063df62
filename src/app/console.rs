use std::{fmt::Write as _, str::FromStr, sync::Arc};

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::{
  cart::{Cart, Outcome},
  checkout::Checkout,
  identity::{SessionIdentity, User},
  models::{
    cart::{CartLine, ProductRef},
    config::Config,
    errors::BoxedErr,
  },
};

const HELP: &str = "commands: signin <user> | signout | add <store> <product> | inc <product> | \
dec <product> | rm <product> | clear | cart | credits [amount] | pay | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  SignIn(String),
  SignOut,
  Add { store_id: String, product_id: String },
  Inc(String),
  Dec(String),
  Remove(String),
  Clear,
  Show,
  Credits(Option<u32>),
  Pay,
  Help,
  Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
  #[error("unknown command: {0}")]
  Unknown(String),

  #[error("usage: {0}")]
  Usage(&'static str),

  #[error("not a whole number: {0}")]
  InvalidNumber(String),
}

impl FromStr for Command {
  type Err = CommandError;

  fn from_str(line: &str) -> Result<Self, Self::Err> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let product = |usage| match words.as_slice() {
      [_, product_id] => Ok(product_id.to_string()),
      _ => Err(CommandError::Usage(usage)),
    };

    match words.first().copied().unwrap_or_default() {
      "signin" => match words.as_slice() {
        [_, user_id] => Ok(Command::SignIn(user_id.to_string())),
        _ => Err(CommandError::Usage("signin <user>")),
      },
      "signout" => Ok(Command::SignOut),
      "add" => match words.as_slice() {
        [_, store_id, product_id] => {
          Ok(Command::Add { store_id: store_id.to_string(), product_id: product_id.to_string() })
        }
        _ => Err(CommandError::Usage("add <store> <product>")),
      },
      "inc" => product("inc <product>").map(Command::Inc),
      "dec" => product("dec <product>").map(Command::Dec),
      "rm" => product("rm <product>").map(Command::Remove),
      "clear" => Ok(Command::Clear),
      "cart" => Ok(Command::Show),
      "credits" => match words.as_slice() {
        [_] => Ok(Command::Credits(None)),
        [_, amount] => amount
          .parse()
          .map(|a| Command::Credits(Some(a)))
          .map_err(|_| CommandError::InvalidNumber(amount.to_string())),
        _ => Err(CommandError::Usage("credits [amount]")),
      },
      "pay" => Ok(Command::Pay),
      "help" | "" => Ok(Command::Help),
      "quit" | "exit" => Ok(Command::Quit),
      other => Err(CommandError::Unknown(other.to_string())),
    }
  }
}

/// Line-oriented driver for the cart, reading commands and printing results.
pub struct Console {
  config: Config,
  identity: Arc<SessionIdentity>,
  cart: Arc<Cart>,
  checkout: Checkout,
}

impl Console {
  pub fn new(
    config: Config,
    identity: Arc<SessionIdentity>,
    cart: Arc<Cart>,
    checkout: Checkout,
  ) -> Self {
    Self { config, identity, cart, checkout }
  }

  pub async fn run<R: AsyncBufRead + Unpin>(&self, input: R) -> Result<(), BoxedErr> {
    println!("{HELP}");
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
      let cmd = match line.parse::<Command>() {
        Ok(Command::Quit) => break,
        Ok(cmd) => cmd,
        Err(e) => {
          println!("{e}");
          continue;
        }
      };

      debug!(?cmd, "console command");
      match self.execute(cmd).await {
        Ok(out) => println!("{out}"),
        Err(e) => println!("error: {e}"),
      }
    }

    Ok(())
  }

  pub async fn execute(&self, cmd: Command) -> Result<String, BoxedErr> {
    let out = match cmd {
      Command::SignIn(user_id) => {
        self.identity.sign_in(User::new(user_id.as_str()));
        self
          .cart
          .subscribe()
          .wait_for(|v| v.user_id.as_deref() == Some(user_id.as_str()) && !v.loading)
          .await?;
        format!("signed in as {user_id}")
      }
      Command::SignOut => {
        self.identity.sign_out();
        self.cart.subscribe().wait_for(|v| v.user_id.is_none()).await?;
        "signed out".to_string()
      }
      Command::Add { store_id, product_id } => {
        let entry = self
          .config
          .catalog_entry(&store_id, &product_id)
          .ok_or_else(|| format!("no product {product_id} in store {store_id}"))?;
        outcome(self.cart.add_to_cart(&ProductRef::from(entry)).await?)
      }
      Command::Inc(product_id) => {
        let line = self.line(&product_id)?;
        outcome(self.cart.increment_item(&line).await?)
      }
      Command::Dec(product_id) => {
        let line = self.line(&product_id)?;
        outcome(self.cart.decrement_item(&line).await?)
      }
      Command::Remove(product_id) => {
        let line = self.line(&product_id)?;
        outcome(self.cart.remove_item(&line).await?)
      }
      Command::Clear => outcome(self.cart.clear_cart().await?),
      Command::Show => self.render(),
      Command::Credits(None) => format!("credits: {}", self.checkout.credits().await?),
      Command::Credits(Some(amount)) => {
        format!("credits: {}", self.checkout.load_credits(amount).await?)
      }
      Command::Pay => {
        let receipt = self.checkout.pay().await?;
        format!(
          "order {} placed, paid {}, credits left {}",
          receipt.order_id, receipt.total, receipt.credits
        )
      }
      Command::Help | Command::Quit => HELP.to_string(),
    };

    Ok(out)
  }

  fn line(&self, product_id: &str) -> Result<CartLine, BoxedErr> {
    self
      .cart
      .view()
      .line(product_id)
      .cloned()
      .ok_or_else(|| format!("{product_id} is not in the cart").into())
  }

  fn render(&self) -> String {
    let view = self.cart.view();
    let Some(user_id) = view.user_id.as_deref() else {
      return "not signed in".to_string();
    };

    let mut out = format!("cart of {user_id}");
    if view.loading {
      out.push_str(" (loading)");
    }
    for l in &view.lines {
      let _ = write!(
        out,
        "\n  {} {} x{} @ {} = {}",
        l.product_id,
        l.name,
        l.qty,
        l.price,
        l.total_product_price()
      );
    }
    let _ = write!(out, "\ntotal: {} items, {}", view.total_qty, view.total_price);
    out
  }
}

fn outcome(outcome: Outcome) -> String {
  match outcome {
    Outcome::Applied => "ok".to_string(),
    Outcome::SignedOut => "sign in first".to_string(),
    Outcome::Stale => "the session changed, the cart was not updated".to_string(),
  }
}
