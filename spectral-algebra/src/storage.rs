//! Owning split-complex storage.
//!
//! A `ComplexVec<T>` holds its `N` complex values as one 32-byte-aligned
//! allocation of `2 * ceil_lanes(N)` reals: all real parts first, all
//! imaginary parts second. Rounding the half length up to a whole number of
//! SIMD lanes keeps both halves independently aligned; the padding lanes are
//! zeroed on allocation and may be read or overwritten by the vector kernels.

use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::mem::size_of;
use std::ptr::NonNull;

use spectral_core::util::ceil_align;

use crate::complex::{Complex, Split, SplitMut};
use crate::traits::Real;
use crate::view::{ConstView, MutView};

const MAX_DIMS: usize = 3;

/// Aligned, zero-initialized allocation of `len` reals.
struct RawBuf<T: Real> {
    ptr: NonNull<T>,
    len: usize,
}

impl<T: Real> RawBuf<T> {
    fn new(len: usize) -> Self {
        if len == 0 {
            return Self {
                ptr: NonNull::dangling(),
                len: 0,
            };
        }
        let layout = Self::layout(len);
        let raw = unsafe { alloc_zeroed(layout) } as *mut T;
        let Some(ptr) = NonNull::new(raw) else {
            handle_alloc_error(layout);
        };
        Self { ptr, len }
    }

    fn layout(len: usize) -> Layout {
        Layout::from_size_align(len * size_of::<T>(), T::ALIGN).unwrap()
    }

    fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T: Real> Drop for RawBuf<T> {
    fn drop(&mut self) {
        if self.len != 0 {
            unsafe {
                dealloc(self.ptr.as_ptr() as *mut u8, Self::layout(self.len));
            }
        }
    }
}

unsafe impl<T: Real + Send> Send for RawBuf<T> {}
unsafe impl<T: Real + Sync> Sync for RawBuf<T> {}

/// Split-complex container; see the module docs for the layout.
pub struct ComplexVec<T: Real> {
    buf: RawBuf<T>,
    dims: [usize; MAX_DIMS],
    ndim: usize,
    len: usize,
    half: usize,
}

impl<T: Real> ComplexVec<T> {
    /// One-dimensional container of `n` complex values.
    pub fn new(n: usize) -> Self {
        Self::with_dims(&[n])
    }

    /// Multi-dimensional container; the first dimension counts complex
    /// entries and is padded to whole SIMD lanes.
    pub fn with_dims(dims: &[usize]) -> Self {
        assert!(dims.len() <= MAX_DIMS, "too many dimensions");
        let mut stored = [0usize; MAX_DIMS];
        stored[..dims.len()].copy_from_slice(dims);
        let len: usize = dims.iter().product::<usize>() * usize::from(!dims.is_empty());
        let rest: usize = dims.iter().skip(1).product();
        let half = if dims.is_empty() {
            0
        } else {
            ceil_align(dims[0], T::LANES) * rest
        };
        Self {
            buf: RawBuf::new(2 * half),
            dims: stored,
            ndim: dims.len(),
            len,
            half,
        }
    }

    /// Builds a one-dimensional container from a generator.
    pub fn from_fn(n: usize, mut f: impl FnMut(usize) -> Complex<T>) -> Self {
        let mut vec = Self::new(n);
        let (re, im) = vec.lanes_mut();
        for i in 0..n {
            let c = f(i);
            re[i] = c.re;
            im[i] = c.im;
        }
        vec
    }

    /// Number of complex values (logical; padding is not observable here).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn ndim(&self) -> usize {
        self.ndim
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims[..self.ndim]
    }

    /// Distance between consecutive first-dimension entries.
    pub fn stride(&self) -> usize {
        self.dims[..self.ndim].iter().skip(1).product()
    }

    pub fn re(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    pub fn im(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr().wrapping_add(self.half), self.len) }
    }

    pub fn re_mut(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    pub fn im_mut(&mut self) -> &mut [T] {
        let half = self.half;
        unsafe { std::slice::from_raw_parts_mut(self.buf.as_mut_ptr().wrapping_add(half), self.len) }
    }

    /// Both lanes at once, for writers that fill real and imaginary parts
    /// in the same pass.
    pub fn lanes_mut(&mut self) -> (&mut [T], &mut [T]) {
        let half = self.half;
        let len = self.len;
        let base = self.buf.as_mut_ptr();
        unsafe {
            (
                std::slice::from_raw_parts_mut(base, len),
                std::slice::from_raw_parts_mut(base.wrapping_add(half), len),
            )
        }
    }

    pub fn split_ptr(&self) -> Split<T> {
        Split {
            re: self.buf.as_ptr(),
            im: self.buf.as_ptr().wrapping_add(self.half),
        }
    }

    pub fn split_ptr_mut(&mut self) -> SplitMut<T> {
        let half = self.half;
        let base = self.buf.as_mut_ptr();
        SplitMut {
            re: base,
            im: base.wrapping_add(half),
        }
    }

    pub fn get(&self, i: usize) -> Complex<T> {
        Complex::new(self.re()[i], self.im()[i])
    }

    pub fn set(&mut self, i: usize, value: Complex<T>) {
        self.re_mut()[i] = value.re;
        self.im_mut()[i] = value.im;
    }

    /// Zeroes the whole allocation, padding included.
    pub fn zero(&mut self) {
        let total = 2 * self.half;
        unsafe {
            std::ptr::write_bytes(self.buf.as_mut_ptr(), 0, total);
        }
    }

    pub fn view(&self) -> ConstView<'_, T> {
        unsafe { ConstView::from_raw_parts(self.split_ptr(), self.len) }
    }

    pub fn view_mut(&mut self) -> MutView<'_, T> {
        let len = self.len;
        unsafe { MutView::from_raw_parts(self.split_ptr_mut(), len) }
    }
}

impl<'a, T: Real> From<&'a ComplexVec<T>> for ConstView<'a, T> {
    fn from(vec: &'a ComplexVec<T>) -> Self {
        vec.view()
    }
}

impl<'a, T: Real> From<&'a mut ComplexVec<T>> for MutView<'a, T> {
    fn from(vec: &'a mut ComplexVec<T>) -> Self {
        vec.view_mut()
    }
}

impl<T: Real> Clone for ComplexVec<T> {
    fn clone(&self) -> Self {
        let mut buf = RawBuf::new(self.buf.len);
        unsafe {
            std::ptr::copy_nonoverlapping(self.buf.as_ptr(), buf.as_mut_ptr(), self.buf.len);
        }
        Self {
            buf,
            dims: self.dims,
            ndim: self.ndim,
            len: self.len,
            half: self.half,
        }
    }
}

impl<T: Real> Default for ComplexVec<T> {
    fn default() -> Self {
        Self::with_dims(&[])
    }
}

impl<T: Real> std::fmt::Debug for ComplexVec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplexVec")
            .field("dims", &self.dims())
            .field("len", &self.len)
            .finish()
    }
}

/// Plain real container with the same alignment and dims metadata.
pub struct RealVec<T: Real> {
    buf: RawBuf<T>,
    dims: [usize; MAX_DIMS],
    ndim: usize,
    len: usize,
}

impl<T: Real> RealVec<T> {
    pub fn new(n: usize) -> Self {
        Self::with_dims(&[n])
    }

    pub fn with_dims(dims: &[usize]) -> Self {
        assert!(dims.len() <= MAX_DIMS, "too many dimensions");
        let mut stored = [0usize; MAX_DIMS];
        stored[..dims.len()].copy_from_slice(dims);
        let len: usize = dims.iter().product::<usize>() * usize::from(!dims.is_empty());
        let rest: usize = dims.iter().skip(1).product();
        let padded = if dims.is_empty() {
            0
        } else {
            ceil_align(dims[0], T::LANES) * rest
        };
        Self {
            buf: RawBuf::new(padded),
            dims: stored,
            ndim: dims.len(),
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn ndim(&self) -> usize {
        self.ndim
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims[..self.ndim]
    }

    pub fn stride(&self) -> usize {
        self.dims[..self.ndim].iter().skip(1).product()
    }

    pub fn data(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        let len = self.len;
        unsafe { std::slice::from_raw_parts_mut(self.buf.as_mut_ptr(), len) }
    }

    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    pub fn zero(&mut self) {
        let total = self.buf.len;
        unsafe {
            std::ptr::write_bytes(self.buf.as_mut_ptr(), 0, total);
        }
    }
}

impl<T: Real> Clone for RealVec<T> {
    fn clone(&self) -> Self {
        let mut buf = RawBuf::new(self.buf.len);
        unsafe {
            std::ptr::copy_nonoverlapping(self.buf.as_ptr(), buf.as_mut_ptr(), self.buf.len);
        }
        Self {
            buf,
            dims: self.dims,
            ndim: self.ndim,
            len: self.len,
        }
    }
}

impl<T: Real> Default for RealVec<T> {
    fn default() -> Self {
        Self::with_dims(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_dims() {
        let empty = ComplexVec::<f32>::default();
        assert_eq!(empty.ndim(), 0);
        assert_eq!(empty.len(), 0);

        let one = ComplexVec::<f64>::new(16);
        assert_eq!(one.ndim(), 1);
        assert_eq!(one.len(), 16);
        assert_eq!(one.stride(), 1);

        let two = ComplexVec::<f64>::with_dims(&[16, 8]);
        assert_eq!(two.ndim(), 2);
        assert_eq!(two.len(), 128);
        assert_eq!(two.stride(), 8);
    }

    #[test]
    fn test_alignment_of_both_halves() {
        for n in [1usize, 2, 3, 5, 30, 32, 100] {
            let v = ComplexVec::<f64>::new(n);
            let p = v.split_ptr();
            assert_eq!(p.re as usize % 32, 0, "re half misaligned for n={}", n);
            assert_eq!(p.im as usize % 32, 0, "im half misaligned for n={}", n);
        }
    }

    #[test]
    fn test_allocation_is_zeroed() {
        let v = ComplexVec::<f64>::new(9);
        assert!(v.re().iter().all(|&x| x == 0.0));
        assert!(v.im().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_deep_copy() {
        let mut orig = ComplexVec::<f64>::new(8);
        for i in 0..8 {
            orig.set(i, Complex::new(i as f64, 2.0 * i as f64));
        }
        let copy = orig.clone();
        orig.set(0, Complex::new(-1.0, -1.0));

        assert_eq!(copy.get(0), Complex::new(0.0, 0.0));
        assert_eq!(copy.get(7), Complex::new(7.0, 14.0));
        assert_eq!(copy.len(), orig.len());
    }

    #[test]
    fn test_zero() {
        let mut v = ComplexVec::<f64>::new(4);
        v.set(2, Complex::new(5.0, 6.0));
        v.zero();
        assert_eq!(v.get(2), Complex::new(0.0, 0.0));
    }

    #[test]
    fn test_from_fn() {
        let v = ComplexVec::<f64>::from_fn(4, |i| Complex::new(i as f64, -(i as f64)));
        assert_eq!(v.get(3), Complex::new(3.0, -3.0));
    }

    #[test]
    fn test_real_vec() {
        let mut v = RealVec::<f32>::new(10);
        assert_eq!(v.len(), 10);
        assert_eq!(v.as_ptr() as usize % 32, 0);
        v.data_mut()[9] = 3.0;
        let c = v.clone();
        v.data_mut()[9] = 4.0;
        assert_eq!(c.data()[9], 3.0);
        v.zero();
        assert_eq!(v.data()[9], 0.0);
    }
}
