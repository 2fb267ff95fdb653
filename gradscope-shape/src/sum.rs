use eyre::{ensure, Result, WrapErr};
use log::trace;

use crate::{
    axes::Axes,
    dims::{Dim, InsertDim, RemoveDim},
};

/// A gradient value that can be reinterpreted under a new shape.
///
/// Implemented by the autodiff engine's own variable type; gradscope never
/// looks at the data.
pub trait Reshape {
    type Output;

    fn shape(&self) -> Dim;

    /// Reinterpret the value with `shape`. The element count is unchanged.
    fn reshape(&self, shape: &[usize]) -> Result<Self::Output>;
}

/// The shape produced by summing an array of `x_shape` over `axis`.
///
/// With `keepdims` the reduced axes are kept with extent 1, otherwise they are dropped.
pub fn sum_output_shape(x_shape: &[usize], axis: impl Into<Axes>, keepdims: bool) -> Result<Dim> {
    let axes = axis.into().normalize(x_shape.len())?;
    let mut shape = Dim::from_slice(x_shape);

    if keepdims {
        for &a in &axes {
            shape[a] = 1;
        }
    } else {
        for &a in axes.iter().rev() {
            shape = RemoveDim::remove(&shape, a).0;
        }
    }

    Ok(shape)
}

/// The shape the upstream gradient of a sum must take so that it broadcasts
/// back onto the summed input.
///
/// When the sum collapsed specific axes without `keepdims`, those axes are
/// re-inserted with extent 1. In every other case (scalar input, a sum over
/// all axes, or `keepdims`) the gradient already broadcasts and its shape is
/// returned unchanged.
///
/// # Errors
/// If an axis is out of range or repeated, or `gy_shape` does not have the
/// rank a sum of `x_shape` over `axis` would produce.
pub fn sum_backward_shape(
    gy_shape: &[usize],
    x_shape: &[usize],
    axis: impl Into<Axes>,
    keepdims: bool,
) -> Result<Dim> {
    let axis = axis.into();
    let ndim = x_shape.len();

    if ndim == 0 || axis.is_all() || keepdims {
        return Ok(Dim::from_slice(gy_shape));
    }

    let axes = axis.normalize(ndim)?;
    ensure!(
        gy_shape.len() + axes.len() == ndim,
        "gradient of shape {:?} cannot come from summing {:?} over {:?}",
        gy_shape,
        x_shape,
        axes
    );

    let mut shape = Dim::from_slice(gy_shape);
    for &a in &axes {
        shape = InsertDim::insert(&shape, a, 1);
    }

    Ok(shape)
}

/// Reshape the gradient of a sum so it can be broadcast to `x_shape`.
///
/// `axis` and `keepdims` are the arguments the forward sum was called with.
pub fn reshape_sum_backward<G: Reshape>(
    gy: &G,
    x_shape: &[usize],
    axis: impl Into<Axes>,
    keepdims: bool,
) -> Result<G::Output> {
    let gy_shape = gy.shape();
    let shape = sum_backward_shape(&gy_shape, x_shape, axis, keepdims)?;
    trace!("sum backward: reshaping gradient {gy_shape:?} -> {shape:?}");

    gy.reshape(&shape)
        .wrap_err_with(|| format!("could not reshape sum gradient {gy_shape:?} to {shape:?}"))
}
