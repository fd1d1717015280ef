//! Radix-2 decimation-in-time transform over split-complex views.

use num_complex::Complex;

use spectral_algebra::{MutView, SplitMut};
use spectral_core::util;
use spectral_core::{Result, SpectralError};

use crate::shuffle::Shuffle;
use crate::twiddle::{Precision, TwiddleStore};

pub struct Fft<T: Precision> {
    size: usize,
    forward: bool,
    shuffle: Shuffle,
    twiddles: TwiddleStore<T>,
}

impl<T: Precision> Fft<T> {
    pub fn new(n: usize, forward: bool) -> Result<Self> {
        if !util::is_pow2(n) {
            return Err(SpectralError::InvalidParameter(format!(
                "FFT size {} is not a power of two",
                n
            )));
        }
        Ok(Self {
            size: n,
            forward,
            shuffle: Shuffle::new(n)?,
            twiddles: TwiddleStore::new(n),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    /// Forward transform, in place.
    pub fn fft(&self, x: &mut MutView<T>) {
        debug_assert!(x.len() >= self.size);
        self.shuffle.apply(x);
        let mut m = 2;
        while m <= self.size {
            self.forward_layer(x, m);
            m *= 2;
        }
    }

    /// Inverse transform, in place: the exact time reversal of `fft`
    /// followed by the 1/n normalization.
    pub fn ifft(&self, x: &mut MutView<T>) {
        debug_assert!(x.len() >= self.size);
        let mut m = self.size;
        while m >= 2 {
            self.inverse_layer(x, m);
            m /= 2;
        }
        self.shuffle.apply(x);
        *x *= Complex::new(T::from_f64(1.0 / self.size as f64), T::from_f64(0.0));
    }

    /// Dispatches on the direction the engine was constructed with.
    pub fn apply(&self, x: &mut MutView<T>) {
        if self.forward {
            self.fft(x);
        } else {
            self.ifft(x);
        }
    }

    fn forward_layer(&self, x: &mut MutView<T>, m: usize) {
        debug_assert!(m > 1);
        let half = m / 2;
        let twid = self.twiddles.layer(m);
        let base = x.data();
        for j in 0..self.size / m {
            let even = base.offset(j * m);
            let odd = even.offset(half);
            unsafe {
                match m {
                    2 => butterfly_2(even, odd),
                    4 => forward_butterfly_4(even, odd),
                    _ => T::fused_addsub_prod(
                        even,
                        odd,
                        even.as_const(),
                        odd.as_const(),
                        twid.data(),
                        half,
                    ),
                }
            }
        }
    }

    fn inverse_layer(&self, x: &mut MutView<T>, m: usize) {
        debug_assert!(m > 1);
        let half = m / 2;
        let twid = self.twiddles.layer(m);
        let base = x.data();
        for j in 0..self.size / m {
            let even = base.offset(j * m);
            let odd = even.offset(half);
            unsafe {
                match m {
                    2 => butterfly_2(even, odd),
                    4 => inverse_butterfly_4(even, odd),
                    _ => T::fused_addsub_mul_conj(
                        even,
                        odd,
                        even.as_const(),
                        odd.as_const(),
                        twid.data(),
                        half,
                    ),
                }
            }
        }
    }
}

impl<T: Precision> std::fmt::Debug for Fft<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft")
            .field("size", &self.size)
            .field("forward", &self.forward)
            .finish()
    }
}

/// W = 1, so the forward and inverse size-2 butterflies coincide.
unsafe fn butterfly_2<T: Precision>(even: SplitMut<T>, odd: SplitMut<T>) {
    let r0 = *even.re;
    let i0 = *even.im;
    *even.re = r0 + *odd.re;
    *even.im = i0 + *odd.im;
    *odd.re = r0 - *odd.re;
    *odd.im = i0 - *odd.im;
}

/// Two butterflies with W0 = 1 and W1 = -i; the -i rotation is a lane swap
/// with a sign flip, so no table lookup is involved.
unsafe fn forward_butterfly_4<T: Precision>(even: SplitMut<T>, odd: SplitMut<T>) {
    let rt = *even.re;
    let it = *even.im;
    *even.re = rt + *odd.re;
    *even.im = it + *odd.im;
    *odd.re = rt - *odd.re;
    *odd.im = it - *odd.im;

    // -i * (x + jy) = y - jx
    let rt = *even.re.add(1);
    let it = *even.im.add(1);
    *even.re.add(1) = rt + *odd.im.add(1);
    *even.im.add(1) = it - *odd.re.add(1);
    let odd_re = rt - *odd.im.add(1);
    *odd.im.add(1) = it + *odd.re.add(1);
    *odd.re.add(1) = odd_re;
}

/// conj(W1) = i: (x + jy) * i = -y + jx.
unsafe fn inverse_butterfly_4<T: Precision>(even: SplitMut<T>, odd: SplitMut<T>) {
    let rt = *even.re;
    let it = *even.im;
    *even.re = rt + *odd.re;
    *even.im = it + *odd.im;
    *odd.re = rt - *odd.re;
    *odd.im = it - *odd.im;

    let rt = *even.re.add(1);
    let it = *even.im.add(1);
    *even.re.add(1) = rt + *odd.re.add(1);
    *even.im.add(1) = it + *odd.im.add(1);
    let dr = rt - *odd.re.add(1);
    let di = it - *odd.im.add(1);
    *odd.re.add(1) = -di;
    *odd.im.add(1) = dr;
}
