//! Signal-domain operators.
//!
//! Operators are a closed set of tagged variants rather than a trait-object
//! hierarchy: the dual engine pattern-matches on them, and the compiler
//! checks the match for exhaustiveness.

use num_complex::Complex;

use spectral_algebra::{ComplexVec, MutView};

use crate::convolution::Convolution;
use crate::twiddle::Precision;

#[derive(Debug)]
pub enum SignalOp<T: Precision> {
    /// Returns the input unchanged.
    Identity,
    /// In-place multiply by a complex scalar.
    Scale(Complex<T>),
    /// In-place add of a complex scalar to every element.
    AddConstant(Complex<T>),
    /// Elementwise add of an owned signal.
    AddSignal(ComplexVec<T>),
    /// Elementwise multiply by an owned signal.
    MultSignal(ComplexVec<T>),
    /// Circular rotation by `k` positions to the right:
    /// `out[i] = in[(i - k) mod n]`.
    Shift(i64),
    /// Negates the imaginary lane.
    Conjugate,
    /// Reverses indices `1..n`, leaving index 0 in place.
    CircularReverse,
    /// Applies the inner operators in declared order.
    Composite(Vec<SignalOp<T>>),
    /// Circular convolution by a fixed kernel.
    Convolution(Convolution<T>),
}

impl<T: Precision> SignalOp<T> {
    /// Builds a composite, inlining the children of nested composites.
    pub fn composite(ops: Vec<SignalOp<T>>) -> Self {
        let mut flat = Vec::with_capacity(ops.len());
        for op in ops {
            match op {
                SignalOp::Composite(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        SignalOp::Composite(flat)
    }

    pub fn apply(&self, x: &mut MutView<T>) {
        match self {
            SignalOp::Identity => {}
            SignalOp::Scale(c) => *x *= *c,
            SignalOp::AddConstant(c) => *x += *c,
            SignalOp::AddSignal(a) => {
                debug_assert_eq!(x.len(), a.len());
                *x += a.view();
            }
            SignalOp::MultSignal(m) => {
                debug_assert_eq!(x.len(), m.len());
                *x *= m.view();
            }
            SignalOp::Shift(k) => {
                let n = x.len() as i64;
                if n == 0 {
                    return;
                }
                let s = (-k).rem_euclid(n) as usize;
                x.rotate_left(s);
            }
            SignalOp::Conjugate => {
                for v in x.im_mut() {
                    *v = -*v;
                }
            }
            SignalOp::CircularReverse => {
                if x.len() > 2 {
                    let (re, im) = x.lanes_mut();
                    re[1..].reverse();
                    im[1..].reverse();
                }
            }
            SignalOp::Composite(seq) => {
                for op in seq {
                    op.apply(x);
                }
            }
            SignalOp::Convolution(conv) => conv.apply(x),
        }
    }

    /// Variant name, for error reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            SignalOp::Identity => "Identity",
            SignalOp::Scale(_) => "Scale",
            SignalOp::AddConstant(_) => "AddConstant",
            SignalOp::AddSignal(_) => "AddSignal",
            SignalOp::MultSignal(_) => "MultSignal",
            SignalOp::Shift(_) => "Shift",
            SignalOp::Conjugate => "Conjugate",
            SignalOp::CircularReverse => "CircularReverse",
            SignalOp::Composite(_) => "Composite",
            SignalOp::Convolution(_) => "Convolution",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> ComplexVec<f64> {
        ComplexVec::from_fn(n, |i| Complex::new(i as f64, -(i as f64)))
    }

    #[test]
    fn test_identity() {
        let mut x = ramp(8);
        SignalOp::Identity.apply(&mut x.view_mut());
        assert_eq!(x.get(5), Complex::new(5.0, -5.0));
    }

    #[test]
    fn test_scale() {
        let mut x = ramp(8);
        SignalOp::Scale(Complex::new(5.0, 0.0)).apply(&mut x.view_mut());
        assert_eq!(x.get(3), Complex::new(15.0, -15.0));
    }

    #[test]
    fn test_add_constant() {
        let mut x = ramp(8);
        SignalOp::AddConstant(Complex::new(1.0, 2.0)).apply(&mut x.view_mut());
        assert_eq!(x.get(3), Complex::new(4.0, -1.0));
    }

    #[test]
    fn test_add_and_mult_signal() {
        let mut x = ramp(8);
        SignalOp::AddSignal(ramp(8)).apply(&mut x.view_mut());
        assert_eq!(x.get(2), Complex::new(4.0, -4.0));

        SignalOp::MultSignal(ComplexVec::from_fn(8, |_| Complex::new(0.0, 1.0)))
            .apply(&mut x.view_mut());
        assert_eq!(x.get(2), Complex::new(4.0, 4.0));
    }

    #[test]
    fn test_shift_right() {
        let mut x = ramp(8);
        SignalOp::Shift(3).apply(&mut x.view_mut());
        for i in 0..8usize {
            let src = (i + 8 - 3) % 8;
            assert_eq!(x.get(i), Complex::new(src as f64, -(src as f64)));
        }
    }

    #[test]
    fn test_shift_negative_and_wrapping() {
        let mut x = ramp(8);
        SignalOp::Shift(-3).apply(&mut x.view_mut());
        for i in 0..8usize {
            let src = (i + 3) % 8;
            assert_eq!(x.get(i).re, src as f64);
        }

        // A full extra revolution lands in the same place.
        let mut y = ramp(8);
        SignalOp::Shift(11).apply(&mut y.view_mut());
        let mut z = ramp(8);
        SignalOp::Shift(3).apply(&mut z.view_mut());
        for i in 0..8 {
            assert_eq!(y.get(i), z.get(i));
        }
    }

    #[test]
    fn test_conjugate() {
        let mut x = ramp(8);
        SignalOp::Conjugate.apply(&mut x.view_mut());
        assert_eq!(x.get(3), Complex::new(3.0, 3.0));
    }

    #[test]
    fn test_circular_reverse() {
        let mut x = ramp(8);
        SignalOp::CircularReverse.apply(&mut x.view_mut());
        assert_eq!(x.get(0).re, 0.0);
        for i in 1..8usize {
            assert_eq!(x.get(i).re, (8 - i) as f64);
        }
    }

    #[test]
    fn test_composite_applies_in_order() {
        let mut x = ramp(8);
        let comp = SignalOp::composite(vec![
            SignalOp::Scale(Complex::new(2.0, 0.0)),
            SignalOp::Shift(1),
        ]);
        comp.apply(&mut x.view_mut());
        // Scaled first, then rotated right by one.
        assert_eq!(x.get(1), Complex::new(0.0, 0.0));
        assert_eq!(x.get(2), Complex::new(2.0, -2.0));
    }

    #[test]
    fn test_composite_flattens() {
        let inner = SignalOp::composite(vec![
            SignalOp::<f64>::Identity,
            SignalOp::Conjugate,
        ]);
        let outer = SignalOp::composite(vec![inner, SignalOp::CircularReverse]);
        match outer {
            SignalOp::Composite(ops) => {
                assert_eq!(ops.len(), 3);
                assert!(matches!(ops[0], SignalOp::Identity));
                assert!(matches!(ops[1], SignalOp::Conjugate));
                assert!(matches!(ops[2], SignalOp::CircularReverse));
            }
            _ => panic!("expected composite"),
        }
    }
}
