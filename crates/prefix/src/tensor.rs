//! N-dimensional rectangular arrays of values.

use std::fmt;

use smallvec::SmallVec;

use crate::value::Value;

/// Dimension/stride storage; tensors rarely exceed four axes.
type Shape = SmallVec<[usize; 4]>;

/// A rectangular n-dimensional array of [`Value`]s with row-major strides.
///
/// Tensors are shared by handle (`Rc<RefCell<Tensor>>`) but deep-copied when
/// assigned into a binding, so from the language surface they behave as
/// values. Extensions mint tensors and hand them to the language; the core
/// itself only copies, compares by identity, and displays them.
#[derive(Debug, Clone)]
pub struct Tensor {
    dims: Shape,
    strides: Shape,
    data: Vec<Value>,
}

impl Tensor {
    /// Creates a tensor of the given dimensions with every element set to
    /// `fill`. Zero-length dimension lists produce a scalar-shaped tensor
    /// holding one element.
    #[must_use]
    pub fn new(dims: &[usize], fill: &Value) -> Self {
        let dims: Shape = dims.iter().copied().collect();
        let strides = row_major_strides(&dims);
        let len = dims.iter().product::<usize>().max(usize::from(dims.is_empty()));
        let data = (0..len).map(|_| fill.clone()).collect();
        Self { dims, strides, data }
    }

    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[must_use]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat offset of a full index tuple, or `None` when the tuple has the
    /// wrong rank or an index is out of range.
    fn offset(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.dims.len() {
            return None;
        }
        let mut offset = 0;
        for ((&index, &dim), &stride) in indices.iter().zip(&self.dims).zip(&self.strides) {
            if index >= dim {
                return None;
            }
            offset += index * stride;
        }
        Some(offset)
    }

    #[must_use]
    pub fn get(&self, indices: &[usize]) -> Option<&Value> {
        self.offset(indices).map(|o| &self.data[o])
    }

    /// Stores `value` at the given index tuple. Returns false when the tuple
    /// does not address an element.
    pub fn set(&mut self, indices: &[usize], value: Value) -> bool {
        match self.offset(indices) {
            Some(o) => {
                self.data[o] = value;
                true
            }
            None => false,
        }
    }

    /// A structurally independent copy: nested tensor elements are deep-
    /// copied as well, exactly as assignment into a binding requires.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        Self {
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            data: self.data.iter().map(Value::copy_for_binding).collect(),
        }
    }

    /// Formats one axis of the tensor as a bracketed list, recursing into
    /// the remaining axes.
    fn fmt_axis(&self, f: &mut fmt::Formatter<'_>, axis: usize, offset: usize) -> fmt::Result {
        if axis == self.dims.len() {
            return write!(f, "{}", self.data[offset]);
        }
        f.write_str("[")?;
        for i in 0..self.dims[axis] {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.fmt_axis(f, axis + 1, offset + i * self.strides[axis])?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.is_empty() {
            return f.write_str("[]");
        }
        self.fmt_axis(f, 0, 0)
    }
}

/// Row-major strides for the given dimensions.
fn row_major_strides(dims: &[usize]) -> Shape {
    let mut strides: Shape = SmallVec::with_capacity(dims.len());
    let mut stride = 1;
    for &dim in dims.iter().rev() {
        strides.push(stride);
        stride *= dim;
    }
    strides.reverse();
    strides
}
