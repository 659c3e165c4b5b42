pub mod handler;
pub mod routing;

pub use crate::domain::model::{
    HandlerResponse, Outcome, Plan, ScanEvent, ScanResultStatus, ScanStatus, Threat,
};
pub use crate::domain::ports::{CopyAcl, Notifier, ObjectStore, SecretStore};
pub use crate::utils::error::Result;
