//! Error type shared by the numeric core.
use thiserror::Error;

/// Failures raised by forward/backward propagation, training and evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetError {
    #[error("shape mismatch in {op}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("numeric instability in {op}: {detail}")]
    NumericInstability { op: &'static str, detail: String },
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("unrecognized activation '{0}', expected 'relu' or 'sigmoid'")]
    UnrecognizedActivation(String),
    #[error("dataset is empty")]
    EmptyDataset,
}

pub type NetResult<T> = Result<T, NetError>;

impl NetError {
    pub(crate) fn shape(op: &'static str, expected: &[usize], found: &[usize]) -> Self {
        NetError::ShapeMismatch {
            op,
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}
