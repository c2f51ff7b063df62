use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
  pub service: ServiceConfig,
  #[serde(default)]
  pub catalog: Vec<CatalogEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServiceConfig {
  pub env: String,
  pub name: String,
}

/// A product seeded into the development backend at startup.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogEntry {
  pub store_id: String,
  pub product_id: String,
  pub name: String,
  pub price: Decimal,
  #[serde(default)]
  pub image_url: String,
  pub stock: u32,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      service: ServiceConfig { env: "dev".to_string(), name: "megacommerce-cart".to_string() },
      catalog: vec![],
    }
  }
}

impl Config {
  pub fn catalog_entry(&self, store_id: &str, product_id: &str) -> Option<&CatalogEntry> {
    self.catalog.iter().find(|e| e.store_id == store_id && e.product_id == product_id)
  }
}
