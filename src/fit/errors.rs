//! Fit-layer error types: the expected-and-recoverable tier.
//!
//! A single replicate's fit can fail for statistical or numerical reasons;
//! that is an ordinary outcome of the study, recorded per replicate and
//! excluded from summarization, never fatal to the batch. Every failure
//! mode is a typed variant so the failure marker stays diagnosable.
use argmin::core::{ArgminError, Error};

/// Result alias for the fitting and inference layer.
pub type FitResult<T> = Result<T, FitError>;

#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    // ---- Input series ----
    /// At least two periods are needed for an intercept-and-slope model.
    SeriesTooShort { len: usize },

    /// All counts are zero: the intercept MLE diverges to -infinity.
    DegenerateSeries,

    // ---- Likelihood evaluation ----
    /// Log-likelihood evaluated to a non-finite value.
    NonFiniteCost { value: f64 },

    /// Implies that finite differences should be used.
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient elements need to be finite.
    InvalidGradient { index: usize, value: f64 },

    // ---- Options ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad { tol: f64 },

    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost { tol: f64 },

    /// Maximum iterations needs to be positive.
    InvalidMaxIter,

    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch { name: String },

    /// L-BFGS memory needs to be at least 1.
    InvalidLbfgsMem { mem: usize },

    // ---- Optimizer outcome ----
    /// The solver finished without a best parameter vector.
    MissingThetaHat,

    /// Estimated parameters must be finite.
    InvalidThetaHat { index: usize, value: f64 },

    // ---- Inference ----
    /// Observed information has no usable eigenvalue; no covariance exists.
    SingularInformation,

    /// A standard error came out non-finite or non-positive.
    InvalidStandardError { index: usize, value: f64 },

    // ---- Solver backend ----
    /// Line search could not make progress.
    LineSearchFailed { text: String },

    /// Any other hard error reported by the solver backend.
    Solver { text: String },
}

impl std::error::Error for FitError {}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::SeriesTooShort { len } => {
                write!(f, "Count series too short for a trend fit: {len} periods, need >= 2")
            }
            FitError::DegenerateSeries => {
                write!(f, "Degenerate count series: all counts are zero, intercept MLE diverges")
            }
            FitError::NonFiniteCost { value } => {
                write!(f, "Non-finite log-likelihood value: {value}")
            }
            FitError::GradientNotImplemented => {
                write!(f, "Analytic gradient not implemented")
            }
            FitError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            FitError::InvalidGradient { index, value } => {
                write!(f, "Invalid gradient at index {index}: {value}, must be finite")
            }
            FitError::InvalidTolGrad { tol } => {
                write!(f, "Invalid gradient tolerance {tol}: must be finite and positive")
            }
            FitError::InvalidTolCost { tol } => {
                write!(f, "Invalid cost-change tolerance {tol}: must be finite and positive")
            }
            FitError::InvalidMaxIter => {
                write!(f, "Maximum iterations must be greater than zero")
            }
            FitError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            FitError::InvalidLineSearch { name } => {
                write!(
                    f,
                    "Invalid line searcher '{name}': valid options are case-insensitive \
                     'MoreThuente' or 'HagerZhang'"
                )
            }
            FitError::InvalidLbfgsMem { mem } => {
                write!(f, "Invalid L-BFGS memory {mem}: must be at least 1")
            }
            FitError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }
            FitError::InvalidThetaHat { index, value } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}, must be finite")
            }
            FitError::SingularInformation => {
                write!(f, "Observed information matrix is numerically singular")
            }
            FitError::InvalidStandardError { index, value } => {
                write!(
                    f,
                    "Invalid standard error at index {index}: {value}, must be finite and positive"
                )
            }
            FitError::LineSearchFailed { text } => {
                write!(f, "Line search failed: {text}")
            }
            FitError::Solver { text } => {
                write!(f, "Solver error: {text}")
            }
        }
    }
}

impl From<Error> for FitError {
    fn from(original_err: Error) -> Self {
        // A FitError raised inside the adapter round-trips through argmin's
        // error wrapper; unwrap it before classifying backend errors.
        let original_err = match original_err.downcast::<FitError>() {
            Ok(fit_err) => return fit_err,
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::ConditionViolated { text } => FitError::LineSearchFailed { text },
                ArgminError::InvalidParameter { text }
                | ArgminError::NotImplemented { text }
                | ArgminError::NotInitialized { text }
                | ArgminError::CheckpointNotFound { text }
                | ArgminError::PotentialBug { text }
                | ArgminError::ImpossibleError { text } => FitError::Solver { text },
                _ => FitError::Solver { text: "unknown solver error".to_string() },
            },
            Err(err) => FitError::Solver { text: err.to_string() },
        }
    }
}
