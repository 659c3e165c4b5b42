// Adapters layer: concrete implementations of the domain ports.

#[cfg(feature = "lambda")]
pub mod aws;
pub mod local;
