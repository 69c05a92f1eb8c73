//! Decision strategies that consume indicator evaluations and emit signals.

pub mod compound;
pub mod single;

pub use compound::{CompoundConfig, IndicatorWeight};
pub use single::StrategyKind;
