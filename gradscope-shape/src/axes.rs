use eyre::{ensure, Result};
use smallvec::SmallVec;

/// Axis indices after normalisation. Always sorted and free of duplicates.
pub type AxisArray = SmallVec<[usize; 4]>;

/// The axes a reduction was performed over.
///
/// Negative entries count from the back, so `-1` is the last axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Axes {
    /// Reduce over every axis
    All,
    Some(SmallVec<[isize; 4]>),
}

impl Default for Axes {
    fn default() -> Self {
        Self::All
    }
}

impl Axes {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Resolve the axes against a shape of rank `ndim`.
    ///
    /// # Errors
    /// If an axis lies outside `-ndim..ndim`, or the same axis is named twice.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn normalize(&self, ndim: usize) -> Result<AxisArray> {
        let axes = match self {
            Self::All => return Ok((0..ndim).collect()),
            Self::Some(axes) => axes,
        };

        let rank = ndim as isize;

        let mut out = AxisArray::with_capacity(axes.len());
        for &axis in axes {
            ensure!(
                (-rank..rank).contains(&axis),
                "axis {} is out of bounds for a shape of rank {}",
                axis,
                ndim
            );
            let axis = if axis < 0 { axis + rank } else { axis };
            out.push(axis as usize);
        }

        out.sort_unstable();
        let before = out.len();
        out.dedup();
        ensure!(out.len() == before, "duplicate value in axes {:?}", axes);

        Ok(out)
    }
}

impl From<isize> for Axes {
    fn from(axis: isize) -> Self {
        Self::Some(smallvec::smallvec![axis])
    }
}

impl From<i32> for Axes {
    fn from(axis: i32) -> Self {
        Self::from(axis as isize)
    }
}

impl From<usize> for Axes {
    #[allow(clippy::cast_possible_wrap)]
    fn from(axis: usize) -> Self {
        Self::from(axis as isize)
    }
}

impl<const N: usize> From<[isize; N]> for Axes {
    fn from(axes: [isize; N]) -> Self {
        Self::Some(axes.iter().copied().collect())
    }
}

impl From<&[isize]> for Axes {
    fn from(axes: &[isize]) -> Self {
        Self::Some(SmallVec::from_slice(axes))
    }
}

impl From<Vec<isize>> for Axes {
    fn from(axes: Vec<isize>) -> Self {
        Self::Some(SmallVec::from_vec(axes))
    }
}

impl<T: Into<Axes>> From<Option<T>> for Axes {
    fn from(axes: Option<T>) -> Self {
        axes.map_or(Self::All, Into::into)
    }
}
