use std::fmt;

// DType — Supported element data types
//
// Every tensor descriptor carries a DType that determines the width and
// numeric behavior of its elements. The set is deliberately closed:
//
//   F32 — 32-bit float, the default training dtype
//   F64 — 64-bit float, for high-precision work
//   I32 — signed 32-bit int, for labels/indices
//
// Keeping the set closed and matching exhaustively everywhere means that
// adding a dtype is a compile-checked decision, not a silent fallthrough
// in some forgotten dispatch branch.

/// Enum of all supported element data types.
///
/// Stored inside every [`crate::TensorDesc`] so operations can be
/// dispatched to the correct typed implementation at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    F32,
    F64,
    I32,
}

impl DType {
    /// Size of one element in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DType::F32 => 4,
            DType::F64 => 8,
            DType::I32 => 4,
        }
    }

    /// Whether this dtype is a floating-point type.
    ///
    /// Only float dtypes can be the target of random initialization —
    /// a normal draw has no meaning over integers.
    pub fn is_float(&self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I32 => "i32",
        };
        write!(f, "{}", s)
    }
}

// WithDType — Trait that connects Rust scalar types to the DType enum
//
// The bridge between Rust's type system and the runtime DType tag. By
// implementing it for f32, f64, and i32, generic code can recover the
// DType of a concrete buffer element type at compile time.

/// Trait implemented by Rust types that can back a tensor descriptor's
/// host storage.
pub trait WithDType: Copy + Send + Sync + 'static + num_traits::NumCast + std::fmt::Debug {
    /// The corresponding DType enum variant.
    const DTYPE: DType;

    /// Convert this value to f64 (for generic numeric code).
    fn to_f64(self) -> f64;

    /// Create a value of this type from f64.
    fn from_f64(v: f64) -> Self;

    /// The zero value.
    fn zero() -> Self {
        Self::from_f64(0.0)
    }
}

impl WithDType for f32 {
    const DTYPE: DType = DType::F32;
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl WithDType for f64 {
    const DTYPE: DType = DType::F64;
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl WithDType for i32 {
    const DTYPE: DType = DType::I32;
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(v: f64) -> Self {
        v as i32
    }
}
