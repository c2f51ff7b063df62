use std::error::Error;
use std::fmt;

use crate::models::errors::BoxedErr;

#[derive(Debug, Clone, PartialEq)]
pub enum DBErrorType {
  NotFound,
  Unavailable,
  Decode,
  Internal,
}

impl fmt::Display for DBErrorType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DBErrorType::NotFound => write!(f, "not_found"),
      DBErrorType::Unavailable => write!(f, "unavailable"),
      DBErrorType::Decode => write!(f, "decode"),
      DBErrorType::Internal => write!(f, "internal_error"),
    }
  }
}

#[derive(Debug)]
pub struct DBError {
  pub err_type: DBErrorType,
  pub err: Option<BoxedErr>,
  pub msg: String,
  pub path: String,
  pub details: String,
}

impl fmt::Display for DBError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut parts = Vec::new();

    if !self.path.is_empty() {
      parts.push(format!("path: {}", self.path));
    }

    parts.push(format!("err_type: {}", self.err_type));

    if !self.msg.is_empty() {
      parts.push(format!("msg: {}", self.msg));
    }

    if !self.details.is_empty() {
      parts.push(format!("details: {}", self.details));
    }

    if let Some(ref err) = self.err {
      parts.push(format!("err: {}", err));
    }

    write!(f, "{}", parts.join(", "))
  }
}

impl Error for DBError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    self.err.as_ref().map(|e| &**e as &dyn Error)
  }
}

impl DBError {
  pub fn new(
    err_type: DBErrorType,
    err: Option<BoxedErr>,
    msg: impl Into<String>,
    path: impl Into<String>,
    details: impl Into<String>,
  ) -> Self {
    Self { err_type, err, msg: msg.into(), path: path.into(), details: details.into() }
  }

  pub fn not_found(path: &str, details: impl Into<String>) -> Self {
    Self::new(DBErrorType::NotFound, None, "the requested document is not found", path, details)
  }

  pub fn unavailable(path: &str) -> Self {
    Self::new(DBErrorType::Unavailable, None, "the remote store is unavailable", path, "")
  }

  pub fn is_not_found(&self) -> bool {
    self.err_type == DBErrorType::NotFound
  }
}

pub fn handle_json_error(err: serde_json::Error, path: &str) -> DBError {
  DBError::new(DBErrorType::Decode, Some(Box::new(err)), "failed to encode document", path, "")
}
