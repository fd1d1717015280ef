//! Circular convolution by a fixed kernel.

use spectral_algebra::{ComplexVec, MutView};
use spectral_core::Result;

use crate::fft::Fft;
use crate::twiddle::Precision;

/// Convolves inputs with a kernel supplied in the signal domain. The
/// kernel's spectrum is computed once at construction; application is
/// `ifft(fft(x) * kernel_hat)`.
pub struct Convolution<T: Precision> {
    fft: Fft<T>,
    kernel_hat: ComplexVec<T>,
}

impl<T: Precision> Convolution<T> {
    pub fn new(mut kernel: ComplexVec<T>) -> Result<Self> {
        let fft = Fft::new(kernel.len(), true)?;
        fft.fft(&mut kernel.view_mut());
        Ok(Self {
            fft,
            kernel_hat: kernel,
        })
    }

    pub fn size(&self) -> usize {
        self.fft.size()
    }

    pub fn kernel_hat(&self) -> &ComplexVec<T> {
        &self.kernel_hat
    }

    pub fn apply(&self, x: &mut MutView<T>) {
        debug_assert_eq!(x.len(), self.fft.size());
        self.fft.fft(x);
        *x *= self.kernel_hat.view();
        self.fft.ifft(x);
    }
}

impl<T: Precision> std::fmt::Debug for Convolution<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Convolution")
            .field("size", &self.size())
            .finish()
    }
}
