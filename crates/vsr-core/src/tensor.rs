//! Dense `f32` tensors with an image-oriented shape.
//!
//! Images flow through the callbacks as `[H, W, C]` or `[N, H, W, C]`
//! arrays stored row-major, channels interleaved:
//!
//! ```text
//! Memory: [c0 c1 c2 c0 c1 c2 ...]  <- row 0 of item 0
//!         [c0 c1 c2 c0 c1 c2 ...]  <- row 1 of item 0
//!         ...
//! ```
//!
//! Samples are always held as `f32`; [`DType`] records the logical element
//! type the array came from so later stages (normalization) can tell a
//! unit-range float image from an 8-bit one.
//!
//! # Example
//!
//! ```rust
//! use vsr_core::Tensor;
//!
//! let t = Tensor::new(vec![1, 2, 2, 1], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(t.squeeze().shape(), &[2, 2]);
//! ```

use crate::{Error, Result};
use std::ops::Range;

/// Logical element type of a [`Tensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DType {
    /// 8-bit unsigned samples (decoded images).
    U8,
    /// 32-bit float samples.
    #[default]
    F32,
}

/// Dense row-major array of `f32` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f32>,
    shape: Vec<usize>,
    dtype: DType,
}

impl Tensor {
    /// Creates a float tensor, validating that `data` fills `shape`.
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(Error::buffer_size(expected, data.len()));
        }
        Ok(Self {
            data,
            shape,
            dtype: DType::F32,
        })
    }

    /// Creates a [`DType::U8`] tensor from 8-bit samples.
    pub fn from_u8(shape: Vec<usize>, data: &[u8]) -> Result<Self> {
        let t = Self::new(shape, data.iter().map(|&v| v as f32).collect())?;
        Ok(t.with_dtype(DType::U8))
    }

    /// Builds a tensor whose length the caller has already checked.
    pub(crate) fn from_parts(shape: Vec<usize>, data: Vec<f32>, dtype: DType) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { data, shape, dtype }
    }

    /// Creates a zero-filled float tensor.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self {
            data: vec![0.0; len],
            shape,
            dtype: DType::F32,
        }
    }

    /// Returns the same samples tagged with another logical type.
    #[inline]
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    /// Shape of the tensor.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when the tensor holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Logical element type.
    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Raw samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the tensor, returning its samples.
    #[inline]
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Length of the last axis (1 for rank 0).
    #[inline]
    pub fn channels(&self) -> usize {
        self.shape.last().copied().unwrap_or(1)
    }

    /// Largest sample, `f32::NEG_INFINITY` for an empty tensor.
    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Interprets a rank 3 or rank 4 tensor as `(n, h, w, c)`.
    pub fn as_nhwc(&self) -> Result<(usize, usize, usize, usize)> {
        match *self.shape.as_slice() {
            [h, w, c] => Ok((1, h, w, c)),
            [n, h, w, c] => Ok((n, h, w, c)),
            _ => Err(Error::invalid_image(format!(
                "expected [H, W, C] or [N, H, W, C], got {:?}",
                self.shape
            ))),
        }
    }

    /// Removes every axis of length 1.
    pub fn squeeze(&self) -> Tensor {
        Tensor {
            data: self.data.clone(),
            shape: self.shape.iter().copied().filter(|&d| d != 1).collect(),
            dtype: self.dtype,
        }
    }

    /// Applies `f` to every sample.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Tensor {
        Tensor {
            data: self.data.iter().map(|&v| f(v)).collect(),
            shape: self.shape.clone(),
            dtype: self.dtype,
        }
    }

    /// Combines two tensors of identical shape elementwise.
    pub fn zip_map(&self, other: &Tensor, f: impl Fn(f32, f32) -> f32) -> Result<Tensor> {
        if self.shape != other.shape {
            return Err(Error::shape_mismatch(&self.shape, &other.shape));
        }
        Ok(Tensor {
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
            shape: self.shape.clone(),
            dtype: DType::F32,
        })
    }

    /// Clamps every sample into `[lo, hi]`.
    pub fn clip(&self, lo: f32, hi: f32) -> Tensor {
        self.map(|v| v.clamp(lo, hi))
    }

    /// Selects item `index` along the first axis, dropping that axis.
    pub fn batch_item(&self, index: usize) -> Result<Tensor> {
        let Some((&n, rest)) = self.shape.split_first() else {
            return Err(Error::AxisOutOfRange { axis: 0, rank: 0 });
        };
        if index >= n {
            return Err(Error::IndexOutOfRange { index, len: n });
        }
        let item: usize = rest.iter().product();
        Ok(Tensor {
            data: self.data[index * item..(index + 1) * item].to_vec(),
            shape: rest.to_vec(),
            dtype: self.dtype,
        })
    }

    /// Stacks equally shaped tensors along a new leading axis.
    pub fn stack(items: &[Tensor]) -> Result<Tensor> {
        let Some(first) = items.first() else {
            return Err(Error::Other("cannot stack an empty list".into()));
        };
        let mut data = Vec::with_capacity(first.len() * items.len());
        for item in items {
            if item.shape != first.shape {
                return Err(Error::shape_mismatch(&first.shape, &item.shape));
            }
            data.extend_from_slice(&item.data);
        }
        let mut shape = Vec::with_capacity(first.ndim() + 1);
        shape.push(items.len());
        shape.extend_from_slice(&first.shape);
        Ok(Tensor {
            data,
            shape,
            dtype: first.dtype,
        })
    }

    /// Copies channels `range` of the last axis (`x[..., a:b]`).
    pub fn slice_channels(&self, range: Range<usize>) -> Result<Tensor> {
        let c = self.channels();
        if self.ndim() == 0 || c == 0 || range.start > range.end || range.end > c {
            return Err(Error::IndexOutOfRange {
                index: range.end,
                len: c,
            });
        }
        let width = range.end - range.start;
        let mut data = Vec::with_capacity(self.len() / c.max(1) * width);
        for px in self.data.chunks_exact(c) {
            data.extend_from_slice(&px[range.clone()]);
        }
        let mut shape = self.shape.clone();
        if let Some(last) = shape.last_mut() {
            *last = width;
        }
        Ok(Tensor {
            data,
            shape,
            dtype: self.dtype,
        })
    }

    /// Concatenates tensors along the last axis.
    ///
    /// All parts must agree on every axis except the last.
    pub fn concat_channels(parts: &[&Tensor]) -> Result<Tensor> {
        let Some(first) = parts.first() else {
            return Err(Error::Other("cannot concatenate an empty list".into()));
        };
        let lead = &first.shape[..first.ndim().saturating_sub(1)];
        for p in parts {
            if p.ndim() != first.ndim() || &p.shape[..p.ndim().saturating_sub(1)] != lead {
                return Err(Error::shape_mismatch(&first.shape, &p.shape));
            }
        }
        let total_c: usize = parts.iter().map(|p| p.channels()).sum();
        let pixels: usize = lead.iter().product();
        let mut data = Vec::with_capacity(pixels * total_c);
        for i in 0..pixels {
            for p in parts {
                let c = p.channels();
                data.extend_from_slice(&p.data[i * c..(i + 1) * c]);
            }
        }
        let mut shape = lead.to_vec();
        shape.push(total_c);
        Ok(Tensor {
            data,
            shape,
            dtype: DType::F32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(shape: Vec<usize>) -> Tensor {
        let n: usize = shape.iter().product();
        Tensor::new(shape, (0..n).map(|v| v as f32).collect()).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_size() {
        let err = Tensor::new(vec![2, 2], vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, Error::BufferSize { expected: 4, got: 3 }));
    }

    #[test]
    fn test_squeeze_all_unit_axes() {
        let t = ramp(vec![1, 4, 3, 1]);
        assert_eq!(t.squeeze().shape(), &[4, 3]);
        assert_eq!(ramp(vec![1, 1, 1]).squeeze().shape(), &[] as &[usize]);
    }

    #[test]
    fn test_slice_channels() {
        // 2 pixels, 3 channels
        let t = ramp(vec![1, 2, 3]);
        let y = t.slice_channels(0..1).unwrap();
        assert_eq!(y.shape(), &[1, 2, 1]);
        assert_eq!(y.data(), &[0.0, 3.0]);
        let uv = t.slice_channels(1..3).unwrap();
        assert_eq!(uv.data(), &[1.0, 2.0, 4.0, 5.0]);
        assert!(t.slice_channels(2..4).is_err());
    }

    #[test]
    fn test_concat_channels() {
        let y = Tensor::new(vec![2, 1], vec![10.0, 20.0]).unwrap();
        let uv = Tensor::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let out = Tensor::concat_channels(&[&y, &uv]).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(out.data(), &[10.0, 1.0, 2.0, 20.0, 3.0, 4.0]);

        let bad = Tensor::zeros(vec![3, 2]);
        assert!(Tensor::concat_channels(&[&y, &bad]).is_err());
    }

    #[test]
    fn test_batch_item_and_stack() {
        let t = ramp(vec![2, 2, 1]);
        let second = t.batch_item(1).unwrap();
        assert_eq!(second.data(), &[2.0, 3.0]);
        assert!(t.batch_item(2).is_err());

        let stacked = Tensor::stack(&[t.batch_item(0).unwrap(), second]).unwrap();
        assert_eq!(stacked, t);
    }

    #[test]
    fn test_zip_map_shape_check() {
        let a = ramp(vec![2, 2]);
        let b = ramp(vec![4]);
        assert!(matches!(
            a.zip_map(&b, |x, y| x - y),
            Err(Error::ShapeMismatch { .. })
        ));
        let d = a.zip_map(&a, |x, y| x - y).unwrap();
        assert!(d.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_u8_dtype_and_extrema() {
        let t = Tensor::from_u8(vec![3], &[5, 250, 7]).unwrap();
        assert_eq!(t.dtype(), DType::U8);
        assert_eq!(t.max(), 250.0);
        assert_eq!(t.clip(6.0, 100.0).data(), &[6.0, 100.0, 7.0]);
    }

    #[test]
    fn test_as_nhwc() {
        assert_eq!(ramp(vec![4, 5, 3]).as_nhwc().unwrap(), (1, 4, 5, 3));
        assert_eq!(ramp(vec![2, 4, 5, 1]).as_nhwc().unwrap(), (2, 4, 5, 1));
        assert!(ramp(vec![4, 5]).as_nhwc().is_err());
    }
}
