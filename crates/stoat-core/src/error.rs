use crate::dtype::DType;

/// All errors that can occur while describing tensors or building graphs.
///
/// Two of these are the deliberate failure modes of the layer core:
/// [`Error::NotOnHost`] is a precondition violation (host-side
/// initialization of a descriptor whose storage is not host-resident),
/// and [`Error::UnsupportedInit`] is an unsupported configuration
/// (random initialization of an integer dtype). Both return before any
/// state is mutated, so a caller can never mistake them for success.
///
/// Shape or inner-dimension mismatches in an assembled graph are *not*
/// represented here — the builder defers those to the external compile
/// step by design.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operation requires a minimum rank (e.g. transposing a vector).
    #[error("rank mismatch: expected rank >= {expected}, got {got}")]
    RankMismatch { expected: usize, got: usize },

    /// Dimension index out of range for the shape's rank.
    #[error("dimension out of range: dim {dim} for shape with {rank} dimensions")]
    DimOutOfRange { dim: usize, rank: usize },

    /// Host-side access to a descriptor whose storage is not host-resident.
    #[error("tensor '{name}' must be host-resident for this operation")]
    NotOnHost { name: String },

    /// Random initialization of a dtype it has no meaning for.
    #[error("cannot draw normal samples into {dtype} storage")]
    UnsupportedInit { dtype: DType },

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }
}

/// Convenience Result type used throughout Stoat.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted error message.
/// Usage: `bail!("something went wrong: {}", detail)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}
