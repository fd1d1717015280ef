//! Fourier-dual composition.
//!
//! The engine maintains two composite operators, `u` over the signal domain
//! and `v` over the frequency domain, with the invariant
//! `DFT(u(x)) = v(DFT(x))` for every signal `x`. Composing an operator into
//! one chain derives its dual and appends to the other, so either side of a
//! transform pair can be manipulated and the engine keeps them consistent.

use std::f64::consts::PI;

use num_complex::Complex;

use spectral_algebra::{ComplexVec, MutView};
use spectral_core::{Result, SpectralError};

use crate::convolution::Convolution;
use crate::fft::Fft;
use crate::function::SignalOp;
use crate::twiddle::Precision;

pub struct FourierDual<T: Precision> {
    size: usize,
    time_func: Vec<SignalOp<T>>,
    freq_func: Vec<SignalOp<T>>,
}

impl<T: Precision> FourierDual<T> {
    pub fn new(n: usize) -> Self {
        Self {
            size: n,
            time_func: Vec::new(),
            freq_func: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Replaces both chains, treating `func` as the signal-domain
    /// composition. On error neither chain changes.
    pub fn set_time_func(&mut self, func: SignalOp<T>) -> Result<()> {
        let (time, freq) = Self::expand_time(self.size, func)?;
        self.time_func = time;
        self.freq_func = freq;
        Ok(())
    }

    /// Replaces both chains, treating `func` as the frequency-domain
    /// composition. On error neither chain changes.
    pub fn set_freq_func(&mut self, func: SignalOp<T>) -> Result<()> {
        let (freq, time) = Self::expand_freq(self.size, func)?;
        self.time_func = time;
        self.freq_func = freq;
        Ok(())
    }

    /// Appends `op` to the signal-domain chain and its dual to the
    /// frequency-domain chain. On error neither chain changes.
    pub fn compose_time(&mut self, op: SignalOp<T>) -> Result<()> {
        let (mut time, mut freq) = Self::expand_time(self.size, op)?;
        self.time_func.append(&mut time);
        self.freq_func.append(&mut freq);
        Ok(())
    }

    /// Appends `op` to the frequency-domain chain and its dual to the
    /// signal-domain chain. On error neither chain changes.
    pub fn compose_freq(&mut self, op: SignalOp<T>) -> Result<()> {
        let (mut freq, mut time) = Self::expand_freq(self.size, op)?;
        self.time_func.append(&mut time);
        self.freq_func.append(&mut freq);
        Ok(())
    }

    /// Runs the signal-domain composition.
    pub fn u(&self, x: &mut MutView<T>) {
        for op in &self.time_func {
            op.apply(x);
        }
    }

    /// Runs the frequency-domain composition.
    pub fn v(&self, x: &mut MutView<T>) {
        for op in &self.freq_func {
            op.apply(x);
        }
    }

    fn expand_time(
        size: usize,
        op: SignalOp<T>,
    ) -> Result<(Vec<SignalOp<T>>, Vec<SignalOp<T>>)> {
        let mut primal = Vec::new();
        let mut dual = Vec::new();
        Self::expand(size, op, Self::time_dual, &mut primal, &mut dual)?;
        Ok((primal, dual))
    }

    fn expand_freq(
        size: usize,
        op: SignalOp<T>,
    ) -> Result<(Vec<SignalOp<T>>, Vec<SignalOp<T>>)> {
        let mut primal = Vec::new();
        let mut dual = Vec::new();
        Self::expand(size, op, Self::freq_dual, &mut primal, &mut dual)?;
        Ok((primal, dual))
    }

    fn expand(
        size: usize,
        op: SignalOp<T>,
        derive: fn(usize, &SignalOp<T>) -> Result<SignalOp<T>>,
        primal: &mut Vec<SignalOp<T>>,
        dual: &mut Vec<SignalOp<T>>,
    ) -> Result<()> {
        match op {
            SignalOp::Composite(ops) => {
                for inner in ops {
                    Self::expand(size, inner, derive, primal, dual)?;
                }
            }
            leaf => {
                let d = derive(size, &leaf)?;
                primal.push(leaf);
                dual.push(d);
            }
        }
        Ok(())
    }

    /// Frequency-domain dual of a signal-domain operator.
    fn time_dual(size: usize, op: &SignalOp<T>) -> Result<SignalOp<T>> {
        match op {
            SignalOp::Identity => Ok(SignalOp::Identity),
            // The DFT is linear.
            SignalOp::Scale(c) => Ok(SignalOp::Scale(*c)),
            SignalOp::AddSignal(a) => {
                let mut ahat = a.clone();
                Fft::new(ahat.len(), true)?.fft(&mut ahat.view_mut());
                Ok(SignalOp::AddSignal(ahat))
            }
            // A time shift modulates the spectrum.
            SignalOp::Shift(k) => Ok(SignalOp::MultSignal(modulation(size, *k, -1.0))),
            // Conjugation in time reverses and conjugates the spectrum.
            SignalOp::Conjugate => Ok(SignalOp::composite(vec![
                SignalOp::CircularReverse,
                SignalOp::Conjugate,
            ])),
            // Pointwise multiplication becomes circular convolution by the
            // multiplier's spectrum, normalized by 1/n. The convolution
            // operator expects its kernel in the domain it runs in, so the
            // spectrum is what gets handed over.
            SignalOp::MultSignal(g) => {
                let mut ghat = g.clone();
                Fft::new(ghat.len(), true)?.fft(&mut ghat.view_mut());
                let conv = Convolution::new(ghat)?;
                Ok(SignalOp::composite(vec![
                    SignalOp::Convolution(conv),
                    SignalOp::Scale(Complex::new(T::from_f64(1.0 / size as f64), T::from_f64(0.0))),
                ]))
            }
            other => Err(SpectralError::NoDual(other.kind())),
        }
    }

    /// Signal-domain dual of a frequency-domain operator.
    fn freq_dual(size: usize, op: &SignalOp<T>) -> Result<SignalOp<T>> {
        match op {
            SignalOp::Identity => Ok(SignalOp::Identity),
            SignalOp::Scale(c) => Ok(SignalOp::Scale(*c)),
            SignalOp::AddSignal(a) => {
                let mut atime = a.clone();
                Fft::new(atime.len(), false)?.ifft(&mut atime.view_mut());
                Ok(SignalOp::AddSignal(atime))
            }
            SignalOp::Shift(k) => Ok(SignalOp::MultSignal(modulation(size, *k, 1.0))),
            // No 1/n here: the inverse transform already normalizes.
            SignalOp::MultSignal(g) => {
                let mut gtime = g.clone();
                Fft::new(gtime.len(), false)?.ifft(&mut gtime.view_mut());
                Ok(SignalOp::Convolution(Convolution::new(gtime)?))
            }
            other => Err(SpectralError::NoDual(other.kind())),
        }
    }
}

/// `e[j] = exp(sign * 2*pi*i * k * j / n)`.
fn modulation<T: Precision>(n: usize, k: i64, sign: f64) -> ComplexVec<T> {
    ComplexVec::from_fn(n, |j| {
        let angle = sign * 2.0 * PI * k as f64 * j as f64 / n as f64;
        Complex::new(T::from_f64(angle.cos()), T::from_f64(angle.sin()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_dual_reports_operator() {
        let mut dual = FourierDual::<f64>::new(16);
        let err = dual.compose_time(SignalOp::CircularReverse).unwrap_err();
        match err {
            SpectralError::NoDual(name) => assert_eq!(name, "CircularReverse"),
            other => panic!("unexpected error {:?}", other),
        }
        // Strong exception safety: nothing was appended.
        assert!(dual.time_func.is_empty());
        assert!(dual.freq_func.is_empty());

        let err = dual.compose_freq(SignalOp::Conjugate).unwrap_err();
        match err {
            SpectralError::NoDual(name) => assert_eq!(name, "Conjugate"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_composite_failure_leaves_chains_unchanged() {
        let mut dual = FourierDual::<f64>::new(16);
        dual.compose_time(SignalOp::Scale(Complex::new(2.0, 0.0)))
            .unwrap();

        let bad = SignalOp::composite(vec![
            SignalOp::Shift(3),
            SignalOp::AddConstant(Complex::new(1.0, 0.0)),
        ]);
        assert!(dual.compose_time(bad).is_err());
        assert_eq!(dual.time_func.len(), 1);
        assert_eq!(dual.freq_func.len(), 1);
    }
}
