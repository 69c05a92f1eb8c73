use crate::models::indicators::IndicatorKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("{kind} needs at least {required} candles, got {got}")]
    InsufficientData {
        kind: IndicatorKind,
        required: usize,
        got: usize,
    },
}
