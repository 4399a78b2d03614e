use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlowError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("vertex {vertex} out of range for a network of {vertices} vertices")]
    OutOfRange { vertex: usize, vertices: usize },
    #[error("precondition violated: {0}")]
    PreconditionViolated(&'static str),
    #[error("arithmetic overflow while accumulating {0}")]
    ArithmeticOverflow(&'static str),
    #[error("infeasible network: {0}")]
    InfeasibleNetwork(&'static str),
}
