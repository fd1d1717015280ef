//! Vector arithmetic kernels over aligned real arrays and split-complex
//! pointer pairs.
//!
//! Every kernel is an `unsafe fn`: callers guarantee that the pointed-to
//! ranges are live, 32-byte aligned on the SIMD path, and that `n` elements
//! (rounded up to whole lanes on the SIMD path) are writable. The fused
//! kernels tolerate `outa` aliasing `a` and `outb` aliasing `b`; every input
//! lane is read before any output lane is written.

use crate::complex::{Complex, Split, SplitMut};
use crate::traits::Real;

#[inline]
pub fn is_aligned<T: Real>(ptr: *const T) -> bool {
    ptr as usize % T::ALIGN == 0
}

/// Arithmetic provider: scalar fallback for any precision, with an AVX2/FMA
/// fast path substituted for f64 at compile time.
#[allow(clippy::missing_safety_doc)]
pub trait VectorArith: Real {
    unsafe fn add_vec(c: *mut Self, a: *const Self, b: *const Self, n: usize) {
        for i in 0..n {
            let v = *a.add(i) + *b.add(i);
            *c.add(i) = v;
        }
    }

    unsafe fn sub_vec(c: *mut Self, a: *const Self, b: *const Self, n: usize) {
        for i in 0..n {
            let v = *a.add(i) - *b.add(i);
            *c.add(i) = v;
        }
    }

    unsafe fn mul_vec(c: *mut Self, a: *const Self, b: *const Self, n: usize) {
        for i in 0..n {
            let v = *a.add(i) * *b.add(i);
            *c.add(i) = v;
        }
    }

    unsafe fn div_vec(c: *mut Self, a: *const Self, b: *const Self, n: usize) {
        for i in 0..n {
            let v = *a.add(i) / *b.add(i);
            *c.add(i) = v;
        }
    }

    unsafe fn add_scalar(c: *mut Self, a: *const Self, s: Self, n: usize) {
        for i in 0..n {
            *c.add(i) = *a.add(i) + s;
        }
    }

    unsafe fn sub_scalar(c: *mut Self, a: *const Self, s: Self, n: usize) {
        for i in 0..n {
            *c.add(i) = *a.add(i) - s;
        }
    }

    unsafe fn mul_scalar(c: *mut Self, a: *const Self, s: Self, n: usize) {
        for i in 0..n {
            *c.add(i) = *a.add(i) * s;
        }
    }

    unsafe fn div_scalar(c: *mut Self, a: *const Self, s: Self, n: usize) {
        for i in 0..n {
            *c.add(i) = *a.add(i) / s;
        }
    }

    unsafe fn cadd_vec(out: SplitMut<Self>, a: Split<Self>, b: Split<Self>, n: usize) {
        for i in 0..n {
            let re = *a.re.add(i) + *b.re.add(i);
            let im = *a.im.add(i) + *b.im.add(i);
            *out.re.add(i) = re;
            *out.im.add(i) = im;
        }
    }

    unsafe fn csub_vec(out: SplitMut<Self>, a: Split<Self>, b: Split<Self>, n: usize) {
        for i in 0..n {
            let re = *a.re.add(i) - *b.re.add(i);
            let im = *a.im.add(i) - *b.im.add(i);
            *out.re.add(i) = re;
            *out.im.add(i) = im;
        }
    }

    unsafe fn cmul_vec(out: SplitMut<Self>, a: Split<Self>, b: Split<Self>, n: usize) {
        for i in 0..n {
            let ar = *a.re.add(i);
            let ai = *a.im.add(i);
            let br = *b.re.add(i);
            let bi = *b.im.add(i);
            *out.re.add(i) = ar * br - ai * bi;
            *out.im.add(i) = ar * bi + ai * br;
        }
    }

    unsafe fn cdiv_vec(out: SplitMut<Self>, a: Split<Self>, b: Split<Self>, n: usize) {
        for i in 0..n {
            let ar = *a.re.add(i);
            let ai = *a.im.add(i);
            let br = *b.re.add(i);
            let bi = *b.im.add(i);
            let den = br * br + bi * bi;
            *out.re.add(i) = (ar * br + ai * bi) / den;
            *out.im.add(i) = (ai * br - ar * bi) / den;
        }
    }

    unsafe fn cadd_scalar(out: SplitMut<Self>, a: Split<Self>, s: Complex<Self>, n: usize) {
        for i in 0..n {
            *out.re.add(i) = *a.re.add(i) + s.re;
            *out.im.add(i) = *a.im.add(i) + s.im;
        }
    }

    unsafe fn cmul_scalar(out: SplitMut<Self>, a: Split<Self>, s: Complex<Self>, n: usize) {
        for i in 0..n {
            let ar = *a.re.add(i);
            let ai = *a.im.add(i);
            *out.re.add(i) = ar * s.re - ai * s.im;
            *out.im.add(i) = ar * s.im + ai * s.re;
        }
    }

    /// `outa = a + b*c`, `outb = a - b*c`, with `b*c` computed once.
    unsafe fn fused_addsub_prod(
        outa: SplitMut<Self>,
        outb: SplitMut<Self>,
        a: Split<Self>,
        b: Split<Self>,
        c: Split<Self>,
        n: usize,
    ) {
        for i in 0..n {
            let ar = *a.re.add(i);
            let ai = *a.im.add(i);
            let br = *b.re.add(i);
            let bi = *b.im.add(i);
            let cr = *c.re.add(i);
            let ci = *c.im.add(i);
            let pr = br * cr - bi * ci;
            let pi = br * ci + bi * cr;
            *outa.re.add(i) = ar + pr;
            *outa.im.add(i) = ai + pi;
            *outb.re.add(i) = ar - pr;
            *outb.im.add(i) = ai - pi;
        }
    }

    /// `outa = a + b`, `outb = (a - b) * conj(c)`.
    unsafe fn fused_addsub_mul_conj(
        outa: SplitMut<Self>,
        outb: SplitMut<Self>,
        a: Split<Self>,
        b: Split<Self>,
        c: Split<Self>,
        n: usize,
    ) {
        for i in 0..n {
            let ar = *a.re.add(i);
            let ai = *a.im.add(i);
            let br = *b.re.add(i);
            let bi = *b.im.add(i);
            let cr = *c.re.add(i);
            let ci = *c.im.add(i);
            let sr = ar + br;
            let si = ai + bi;
            let dr = ar - br;
            let di = ai - bi;
            *outb.re.add(i) = dr * cr + di * ci;
            *outb.im.add(i) = di * cr - dr * ci;
            *outa.re.add(i) = sr;
            *outa.im.add(i) = si;
        }
    }
}

impl VectorArith for f32 {}

impl VectorArith for f64 {
    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn add_vec(c: *mut f64, a: *const f64, b: *const f64, n: usize) {
        crate::arith_avx2::add_vec(c, a, b, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn sub_vec(c: *mut f64, a: *const f64, b: *const f64, n: usize) {
        crate::arith_avx2::sub_vec(c, a, b, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn mul_vec(c: *mut f64, a: *const f64, b: *const f64, n: usize) {
        crate::arith_avx2::mul_vec(c, a, b, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn div_vec(c: *mut f64, a: *const f64, b: *const f64, n: usize) {
        crate::arith_avx2::div_vec(c, a, b, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn add_scalar(c: *mut f64, a: *const f64, s: f64, n: usize) {
        crate::arith_avx2::add_scalar(c, a, s, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn sub_scalar(c: *mut f64, a: *const f64, s: f64, n: usize) {
        crate::arith_avx2::sub_scalar(c, a, s, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn mul_scalar(c: *mut f64, a: *const f64, s: f64, n: usize) {
        crate::arith_avx2::mul_scalar(c, a, s, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn div_scalar(c: *mut f64, a: *const f64, s: f64, n: usize) {
        crate::arith_avx2::div_scalar(c, a, s, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn cadd_vec(out: SplitMut<f64>, a: Split<f64>, b: Split<f64>, n: usize) {
        crate::arith_avx2::cadd_vec(out, a, b, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn csub_vec(out: SplitMut<f64>, a: Split<f64>, b: Split<f64>, n: usize) {
        crate::arith_avx2::csub_vec(out, a, b, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn cmul_vec(out: SplitMut<f64>, a: Split<f64>, b: Split<f64>, n: usize) {
        crate::arith_avx2::cmul_vec(out, a, b, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn cdiv_vec(out: SplitMut<f64>, a: Split<f64>, b: Split<f64>, n: usize) {
        crate::arith_avx2::cdiv_vec(out, a, b, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn cadd_scalar(out: SplitMut<f64>, a: Split<f64>, s: Complex<f64>, n: usize) {
        crate::arith_avx2::cadd_scalar(out, a, s, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn cmul_scalar(out: SplitMut<f64>, a: Split<f64>, s: Complex<f64>, n: usize) {
        crate::arith_avx2::cmul_scalar(out, a, s, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn fused_addsub_prod(
        outa: SplitMut<f64>,
        outb: SplitMut<f64>,
        a: Split<f64>,
        b: Split<f64>,
        c: Split<f64>,
        n: usize,
    ) {
        crate::arith_avx2::fused_addsub_prod(outa, outb, a, b, c, n)
    }

    #[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
    unsafe fn fused_addsub_mul_conj(
        outa: SplitMut<f64>,
        outb: SplitMut<f64>,
        a: Split<f64>,
        b: Split<f64>,
        c: Split<f64>,
        n: usize,
    ) {
        crate::arith_avx2::fused_addsub_mul_conj(outa, outb, a, b, c, n)
    }
}
