use std::{env, error::Error};

use megacommerce_cart::app::{App, AppArgs, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
  init_logging().map_err(|e| e as Box<dyn Error>)?;

  let config_path = env::args().nth(1).unwrap_or_else(|| "config.yaml".to_string());
  let args = AppArgs { config_path: config_path.into() };

  let app = App::new(args).await?;
  app.run().await
}
