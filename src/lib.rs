pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliArgs;
pub use crate::config::{toml_config::ReplayConfig, HandlerConfig};

pub use crate::adapters::local::{LocalObjectStore, OutboxNotifier, StaticSecretStore};
#[cfg(feature = "lambda")]
pub use crate::adapters::aws::{S3ObjectStore, SecretsManagerStore, SnsNotifier};

pub use crate::core::handler::ScanResultHandler;
pub use crate::domain::model::{HandlerResponse, Outcome, Plan, ScanEvent};
pub use crate::utils::error::{Result, ScanTransferError};
