use ndarray::{Array, ArrayD, Axis, Dimension};
use num_traits::ToPrimitive;
use paste::paste;
use serde::{Deserialize, Serialize};

/// Concrete storage type of a `Values` array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DType {
    I32,
    I64,
    F32,
    F64,
}

/// An n-dimensional array of numbers in whatever storage type the loader chose.
///
/// Loaders don't agree on storage types: one might produce `i32` points where another produces
/// `f64` for the same coordinate. Equality therefore compares values promoted to `f64` (and
/// shape), never the storage type itself.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Values {
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

macro_rules! dispatch {
    ($values:expr, $array:ident => $body:expr) => {
        match $values {
            Values::I32($array) => $body,
            Values::I64($array) => $body,
            Values::F32($array) => $body,
            Values::F64($array) => $body,
        }
    };
}

macro_rules! Values {
    ($type:ident) => {
        paste! {
            impl<D> From<Array<$type, D>> for Values
            where
                D: Dimension,
            {
                fn from(array: Array<$type, D>) -> Self {
                    Values::[<$type:upper>](array.into_dyn())
                }
            }

            impl From<Vec<$type>> for Values {
                fn from(values: Vec<$type>) -> Self {
                    Values::[<$type:upper>](Array::from_vec(values).into_dyn())
                }
            }
        }
    };
}

Values!(i32);
Values!(i64);
Values!(f32);
Values!(f64);

impl Values {
    pub fn dtype(&self) -> DType {
        match self {
            Values::I32(_) => DType::I32,
            Values::I64(_) => DType::I64,
            Values::F32(_) => DType::F32,
            Values::F64(_) => DType::F64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        dispatch!(self, array => array.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    pub fn len(&self) -> usize {
        dispatch!(self, array => array.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Promote to `f64`.
    ///
    /// `i64` values beyond 2^53 lose precision, same as they would in any other numeric library.
    ///
    pub fn to_f64(&self) -> ArrayD<f64> {
        dispatch!(self, array => array.mapv(|value| value.to_f64().unwrap_or(f64::NAN)))
    }

    /// Reverse the order of values along `axis`.
    ///
    /// Panics if `axis` is out of bounds.
    ///
    pub fn invert_axis(&mut self, axis: usize) {
        dispatch!(self, array => array.invert_axis(Axis(axis)))
    }

    /// Reorder axes so that new axis `i` is old axis `order[i]`.
    ///
    /// Panics if `order` isn't a permutation of the axes.
    ///
    pub fn permute_axes(&mut self, order: &[usize]) {
        dispatch!(self, array => {
            let owned = std::mem::take(array);
            *array = owned.permuted_axes(order.to_vec());
        })
    }
}

impl PartialEq for Values {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.to_f64() == other.to_f64()
    }
}
