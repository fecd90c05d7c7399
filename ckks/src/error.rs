use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building parameters, keys or evaluation contexts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstructionError {
    #[error(
        "secret key does not match the parameters: key degree {key_degree} (ring degree {ring_degree}), key level {key_level} (required {required_level})"
    )]
    KeyMismatch {
        key_degree: usize,
        ring_degree: usize,
        key_level: usize,
        required_level: usize,
    },
    #[error("insufficient depth: {required} levels required but only {available} available")]
    InsufficientDepth { required: usize, available: usize },
    #[error("invalid depth: {0}")]
    InvalidDepth(String),
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("not enough NTT-friendly primes of {bits} bits")]
    PrimeGeneration { bits: usize },
}

/// Errors raised when an operand does not satisfy the requirements of an operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PreconditionViolation {
    #[error("level mismatch: expected {expected}, found {found}")]
    LevelMismatch { expected: usize, found: usize },
    #[error("degree mismatch: expected {expected}, found {found}")]
    DegreeMismatch { expected: usize, found: usize },
    #[error("ring degree mismatch: expected {expected}, found {found}")]
    RingDegreeMismatch { expected: usize, found: usize },
    #[error("scale {scale} out of range (bound {bound})")]
    ScaleOutOfRange { scale: f64, bound: f64 },
    #[error("insufficient levels: {required} required, {available} available")]
    InsufficientLevels { required: usize, available: usize },
    #[error("missing rotation key for galois element {0}")]
    MissingRotationKey(usize),
    #[error("missing conjugation key")]
    MissingConjugationKey,
    #[error("too many slots: {slots} > {max}")]
    TooManySlots { slots: usize, max: usize },
    #[error("parameters mismatch: {0} differs")]
    ParametersMismatch(&'static str),
    #[error("value at index {index} is not finite")]
    NonFiniteValue { index: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Construction(#[from] ConstructionError),
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
}
