//! Signal generation entry points and the hybrid aggregation layer.

pub mod error;
pub mod generator;

pub use error::SignalError;
pub use generator::{
    FundamentalConfig, HybridConfig, SignalGenerator, TechnicalConfig,
};
