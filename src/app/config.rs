use std::{fs, path::Path};

use crate::{
  app::App,
  models::{
    config::Config,
    errors::{BoxedErr, ErrorType, InternalError},
  },
};

impl App {
  /// Loads the service config. A missing or malformed file is reported on the errors channel and
  /// the defaults stay in place.
  pub async fn init_service_config(&self) {
    match load_config(&self.config_path) {
      Ok(parsed) => {
        let mut config = self.config.lock().await;
        *config = parsed;
      }
      Err(err) => {
        let _ = self.errors.send(err).await;
      }
    }
  }
}

pub(crate) fn load_config(path: &Path) -> Result<Config, InternalError> {
  let mk_err = |err_type: ErrorType, msg: &str, err: BoxedErr| InternalError {
    err_type,
    temp: false,
    err,
    msg: msg.into(),
    path: "cart.app.load_config".into(),
  };

  let yaml_string = fs::read_to_string(path)
    .map_err(|e| mk_err(ErrorType::Io, "failed to load service config file", Box::new(e)))?;

  serde_yaml::from_str(&yaml_string)
    .map_err(|e| mk_err(ErrorType::Config, "failed to parse config data", Box::new(e)))
}

#[cfg(test)]
mod tests {
  use std::{env, path::PathBuf, process};

  use testresult::TestResult;

  use crate::app::AppArgs;

  use super::*;

  fn temp_file(name: &str, contents: &str) -> TestResult<PathBuf> {
    let path = env::temp_dir().join(format!("cart-{}-{name}.yaml", process::id()));
    fs::write(&path, contents)?;
    Ok(path)
  }

  #[test]
  fn test_load_config() -> TestResult {
    let path = temp_file(
      "ok",
      "service:\n  env: test\n  name: cart\ncatalog:\n  \
       - {store_id: s1, product_id: p1, name: Mug, price: 40, stock: 5}\n",
    )?;

    let config = load_config(&path)?;
    assert_eq!(config.service.env, "test");
    assert_eq!(config.catalog.len(), 1);
    fs::remove_file(path)?;
    Ok(())
  }

  #[test]
  fn test_load_config_errors() -> TestResult {
    let missing = load_config(Path::new("/nonexistent/cart.yaml")).unwrap_err();
    assert_eq!(missing.err_type, ErrorType::Io);

    let path = temp_file("bad", "service: [")?;
    let malformed = load_config(&path).unwrap_err();
    assert_eq!(malformed.err_type, ErrorType::Config);
    fs::remove_file(path)?;
    Ok(())
  }

  #[tokio::test]
  async fn test_missing_config_keeps_defaults() -> TestResult {
    let app = App::new(AppArgs { config_path: "/nonexistent/cart.yaml".into() }).await?;
    let config = app.config.lock().await;
    assert_eq!(config.service.name, "megacommerce-cart");
    assert!(config.catalog.is_empty());
    Ok(())
  }
}
