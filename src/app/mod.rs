mod config;
mod console;
mod logging;

use std::{error::Error, path::PathBuf, sync::Arc};

use tokio::{
  io::{BufReader, stdin},
  spawn,
  sync::{
    Mutex,
    mpsc::{self, Receiver},
  },
};
use tracing::{error, info, warn};

pub use console::{Command, CommandError, Console};
pub use logging::init_logging;

use crate::{
  cart::{Cart, CartArgs},
  checkout::{Checkout, CheckoutArgs},
  identity::SessionIdentity,
  models::{config::Config, errors::InternalError},
  store::database::memstore::{MemoryStoreImpl, MemoryStoreImplArgs},
};

pub struct App {
  pub(crate) errors: mpsc::Sender<InternalError>,
  pub(crate) config: Arc<Mutex<Config>>,
  pub(crate) config_path: PathBuf,
}

#[derive(Debug)]
pub struct AppArgs {
  pub config_path: PathBuf,
}

impl App {
  pub async fn new(args: AppArgs) -> Result<Self, Box<dyn Error>> {
    let (tx, rx) = mpsc::channel::<InternalError>(100);
    spawn(async move {
      App::errors_listener(rx).await;
    });

    let app = Self {
      errors: tx,
      config: Arc::new(Mutex::new(Config::default())),
      config_path: args.config_path,
    };

    app.init_service_config().await;
    Ok(app)
  }

  pub async fn run(&self) -> Result<(), Box<dyn Error>> {
    let config = self.config.lock().await.clone();
    info!(
      env = %config.service.env,
      name = %config.service.name,
      products = config.catalog.len(),
      "starting cart console"
    );

    let store_args = MemoryStoreImplArgs { catalog: config.catalog.clone() };
    let store = Arc::new(MemoryStoreImpl::new(store_args));
    let identity = Arc::new(SessionIdentity::new());

    let cart_args = CartArgs { store: store.clone(), identity: identity.clone() };
    let cart = Arc::new(Cart::start(cart_args));
    let checkout = Checkout::new(CheckoutArgs { cart: cart.clone(), store });

    let console = Console::new(config, identity, cart.clone(), checkout);
    let res = console.run(BufReader::new(stdin())).await;

    cart.shutdown();
    info!("cart console stopped");
    res.map_err(|e| e as Box<dyn Error>)
  }

  async fn errors_listener(mut receiver: Receiver<InternalError>) {
    while let Some(err) = receiver.recv().await {
      if err.temp {
        warn!(path = %err.path, err_type = %err.err_type, error = %err.err, "{}", err.msg);
      } else {
        error!(path = %err.path, err_type = %err.err_type, error = %err.err, "{}", err.msg);
      }
    }
  }
}
