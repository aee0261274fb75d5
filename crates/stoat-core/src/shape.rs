use std::fmt;

// Shape — N-dimensional shape representation
//
// A Shape is the ordered sequence of dimension sizes of a tensor:
//   - Vector: Shape([5])         — 1 dimension, 5 elements
//   - Matrix: Shape([3, 4])      — 2 dimensions, 12 elements
//   - Batch:  Shape([2, 3, 4])   — 3 dimensions, 24 elements
//
// In a symbolic graph the shape carries all the geometry there is — no
// strides, no offsets — because descriptors are never backed by memory
// until an external engine binds them. The one geometric operation the
// graph builder needs is the logical transpose: swapping the last two
// dimensions without touching any data.

/// N-dimensional shape of a tensor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<usize>);

impl Shape {
    /// Create a new shape from a vector of dimension sizes.
    pub fn new(dims: Vec<usize>) -> Self {
        Shape(dims)
    }

    /// The dimension sizes as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Number of dimensions (0 for scalar, 1 for vector, 2 for matrix, etc.).
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements (product of all dimensions).
    /// A scalar shape [] has 1 element.
    pub fn elem_count(&self) -> usize {
        self.0.iter().product::<usize>().max(1)
    }

    /// Size of a specific dimension.
    pub fn dim(&self, d: usize) -> crate::Result<usize> {
        self.0.get(d).copied().ok_or(crate::Error::DimOutOfRange {
            dim: d,
            rank: self.rank(),
        })
    }

    /// A new shape with the last two dimensions swapped — the logical
    /// transpose used for matmul operands.
    ///
    /// Only the last two dimensions participate in a transpose; any
    /// leading batch dimensions are preserved. Requires rank >= 2.
    pub fn transposed(&self) -> crate::Result<Shape> {
        let rank = self.rank();
        if rank < 2 {
            return Err(crate::Error::RankMismatch {
                expected: 2,
                got: rank,
            });
        }
        let mut dims = self.0.clone();
        dims.swap(rank - 1, rank - 2);
        Ok(Shape(dims))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

// Convenient From implementations
// These let you write Shape::from((3, 4)) instead of Shape::new(vec![3, 4]),
// and let APIs accept `impl Into<Shape>`.

impl From<()> for Shape {
    /// Scalar shape (0 dimensions).
    fn from(_: ()) -> Self {
        Shape(vec![])
    }
}

impl From<usize> for Shape {
    /// 1-D shape.
    fn from(d: usize) -> Self {
        Shape(vec![d])
    }
}

impl From<(usize,)> for Shape {
    fn from((d0,): (usize,)) -> Self {
        Shape(vec![d0])
    }
}

impl From<(usize, usize)> for Shape {
    fn from((d0, d1): (usize, usize)) -> Self {
        Shape(vec![d0, d1])
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((d0, d1, d2): (usize, usize, usize)) -> Self {
        Shape(vec![d0, d1, d2])
    }
}

impl From<(usize, usize, usize, usize)> for Shape {
    fn from((d0, d1, d2, d3): (usize, usize, usize, usize)) -> Self {
        Shape(vec![d0, d1, d2, d3])
    }
}

impl From<Vec<usize>> for Shape {
    fn from(v: Vec<usize>) -> Self {
        Shape(v)
    }
}

impl From<&[usize]> for Shape {
    fn from(s: &[usize]) -> Self {
        Shape(s.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_shape() {
        let s = Shape::from(());
        assert_eq!(s.rank(), 0);
        assert_eq!(s.elem_count(), 1);
    }

    #[test]
    fn test_matrix_shape() {
        let s = Shape::from((3, 4));
        assert_eq!(s.rank(), 2);
        assert_eq!(s.elem_count(), 12);
        assert_eq!(s.dims(), &[3, 4]);
    }

    #[test]
    fn test_transposed_swaps_last_two() {
        let s = Shape::from((8, 4));
        assert_eq!(s.transposed().unwrap().dims(), &[4, 8]);

        // Batch dimensions are preserved.
        let s = Shape::from((2, 8, 4));
        assert_eq!(s.transposed().unwrap().dims(), &[2, 4, 8]);
    }

    #[test]
    fn test_transposed_is_self_inverse() {
        let s = Shape::from((2, 8, 4));
        assert_eq!(s.transposed().unwrap().transposed().unwrap(), s);
    }

    #[test]
    fn test_transposed_requires_rank_two() {
        assert!(Shape::from(5).transposed().is_err());
        assert!(Shape::from(()).transposed().is_err());
    }

    #[test]
    fn test_dim_out_of_range() {
        let s = Shape::from((3, 4));
        assert_eq!(s.dim(1).unwrap(), 4);
        assert!(s.dim(2).is_err());
    }

    #[test]
    fn test_display() {
        let s = Shape::from((3, 4));
        assert_eq!(format!("{}", s), "[3, 4]");
    }
}
