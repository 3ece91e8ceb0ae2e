use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    InvalidConfig(String),
    NonHermitian(String),
    TraceViolation { trace: f64 },
    DimensionMismatch { expected: usize, actual: usize },
    EmptyState,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            CoreError::NonHermitian(name) => write!(f, "matrix '{name}' is not Hermitian"),
            CoreError::TraceViolation { trace } => {
                write!(f, "state matrix trace must be 1, got {trace}")
            }
            CoreError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            CoreError::EmptyState => write!(f, "state vector must have at least one component"),
        }
    }
}

impl std::error::Error for CoreError {}

pub type Result<T> = std::result::Result<T, CoreError>;
