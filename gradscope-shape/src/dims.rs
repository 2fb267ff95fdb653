use smallvec::SmallVec;

/// Vec fits into 3 usizes, but 4 dimensions are fairly common in convolutions
/// so we're taking the hit. Most shapes never spill to the heap.
pub type Dim = SmallVec<[usize; 4]>;

/// A dimension type for a tensor
pub trait Dimension: AsRef<[usize]> + AsMut<[usize]> + Clone {
    /// Number of elements described by this shape. A rank 0 shape holds one element.
    fn size(&self) -> usize {
        self.as_ref().iter().product()
    }

    fn ndim(&self) -> usize {
        self.as_ref().len()
    }
}

impl<const N: usize> Dimension for [usize; N] {}
impl Dimension for std::vec::Vec<usize> {}
impl Dimension for Dim {}

/// Reduce an axis from a dimension
pub trait RemoveDim: Dimension {
    type Smaller: Dimension;

    /// # Panics
    /// If `axis` is not less than the rank
    fn remove(&self, axis: usize) -> (Self::Smaller, usize);
}

impl RemoveDim for std::vec::Vec<usize> {
    type Smaller = Self;
    fn remove(&self, axis: usize) -> (Self::Smaller, usize) {
        let mut new = self.clone();
        let n = std::vec::Vec::remove(&mut new, axis);
        (new, n)
    }
}

impl RemoveDim for Dim {
    type Smaller = Self;
    fn remove(&self, axis: usize) -> (Self::Smaller, usize) {
        assert!(axis < self.ndim(), "axis {axis} out of bounds for rank {}", self.ndim());
        let mut new = self.clone();
        let n = SmallVec::remove(&mut new, axis);
        (new, n)
    }
}

/// Insert an axis into a dimension
pub trait InsertDim: Dimension {
    type Larger: Dimension;

    /// # Panics
    /// If `axis` is greater than the rank
    fn insert(&self, axis: usize, n: usize) -> Self::Larger;
}

impl InsertDim for std::vec::Vec<usize> {
    type Larger = Self;
    fn insert(&self, axis: usize, n: usize) -> Self::Larger {
        let mut new = self.clone();
        std::vec::Vec::insert(&mut new, axis, n);
        new
    }
}

impl InsertDim for Dim {
    type Larger = Self;
    fn insert(&self, axis: usize, n: usize) -> Self::Larger {
        assert!(axis <= self.ndim(), "axis {axis} out of bounds for rank {}", self.ndim());
        let mut new = self.clone();
        SmallVec::insert(&mut new, axis, n);
        new
    }
}
