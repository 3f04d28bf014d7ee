pub mod cli;
pub mod config;
pub mod credentials;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod provisioning;
pub mod runtime;
pub mod secret;

pub use error::{Error, Result};
