//! AVX2/FMA kernels for f64: four lanes per 32-byte register.
//!
//! All loads and stores are aligned. Lengths are rounded up to whole
//! registers; containers pad and zero their tails so the extra lanes are
//! harmless. Inputs of the fused kernels are loaded before either output is
//! stored, which is what permits the in-place butterfly aliasing.

use core::arch::x86_64::*;

use crate::arith::is_aligned;
use crate::complex::{Complex, Split, SplitMut};
use crate::traits::Real;

const LANES: usize = <f64 as Real>::LANES;

#[inline]
fn num_chunks(n: usize) -> usize {
    (n + LANES - 1) / LANES
}

macro_rules! binary_vec_kernel {
    ($name:ident, $intrin:ident) => {
        #[target_feature(enable = "avx2")]
        pub unsafe fn $name(c: *mut f64, a: *const f64, b: *const f64, n: usize) {
            debug_assert!(is_aligned(a) && is_aligned(b) && is_aligned(c as *const f64));
            for i in 0..num_chunks(n) {
                let off = LANES * i;
                let va = _mm256_load_pd(a.add(off));
                let vb = _mm256_load_pd(b.add(off));
                _mm256_store_pd(c.add(off), $intrin(va, vb));
            }
        }
    };
}

binary_vec_kernel!(add_vec, _mm256_add_pd);
binary_vec_kernel!(sub_vec, _mm256_sub_pd);
binary_vec_kernel!(mul_vec, _mm256_mul_pd);
binary_vec_kernel!(div_vec, _mm256_div_pd);

macro_rules! scalar_kernel {
    ($name:ident, $intrin:ident) => {
        #[target_feature(enable = "avx2")]
        pub unsafe fn $name(c: *mut f64, a: *const f64, s: f64, n: usize) {
            debug_assert!(is_aligned(a) && is_aligned(c as *const f64));
            let vs = _mm256_set1_pd(s);
            for i in 0..num_chunks(n) {
                let off = LANES * i;
                let va = _mm256_load_pd(a.add(off));
                _mm256_store_pd(c.add(off), $intrin(va, vs));
            }
        }
    };
}

scalar_kernel!(add_scalar, _mm256_add_pd);
scalar_kernel!(sub_scalar, _mm256_sub_pd);
scalar_kernel!(mul_scalar, _mm256_mul_pd);
scalar_kernel!(div_scalar, _mm256_div_pd);

#[inline]
fn assert_split_aligned(p: Split<f64>) {
    debug_assert!(is_aligned(p.re) && is_aligned(p.im));
}

#[target_feature(enable = "avx2")]
pub unsafe fn cadd_vec(out: SplitMut<f64>, a: Split<f64>, b: Split<f64>, n: usize) {
    assert_split_aligned(out.as_const());
    assert_split_aligned(a);
    assert_split_aligned(b);
    for i in 0..num_chunks(n) {
        let off = LANES * i;
        let re = _mm256_add_pd(_mm256_load_pd(a.re.add(off)), _mm256_load_pd(b.re.add(off)));
        let im = _mm256_add_pd(_mm256_load_pd(a.im.add(off)), _mm256_load_pd(b.im.add(off)));
        _mm256_store_pd(out.re.add(off), re);
        _mm256_store_pd(out.im.add(off), im);
    }
}

#[target_feature(enable = "avx2")]
pub unsafe fn csub_vec(out: SplitMut<f64>, a: Split<f64>, b: Split<f64>, n: usize) {
    assert_split_aligned(out.as_const());
    assert_split_aligned(a);
    assert_split_aligned(b);
    for i in 0..num_chunks(n) {
        let off = LANES * i;
        let re = _mm256_sub_pd(_mm256_load_pd(a.re.add(off)), _mm256_load_pd(b.re.add(off)));
        let im = _mm256_sub_pd(_mm256_load_pd(a.im.add(off)), _mm256_load_pd(b.im.add(off)));
        _mm256_store_pd(out.re.add(off), re);
        _mm256_store_pd(out.im.add(off), im);
    }
}

// c_re = a_re*b_re - a_im*b_im, c_im = a_re*b_im + a_im*b_re: two FMAs and
// two multiplies per register pair.
#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn cmul_vec(out: SplitMut<f64>, a: Split<f64>, b: Split<f64>, n: usize) {
    assert_split_aligned(out.as_const());
    assert_split_aligned(a);
    assert_split_aligned(b);
    for i in 0..num_chunks(n) {
        let off = LANES * i;
        let ar = _mm256_load_pd(a.re.add(off));
        let ai = _mm256_load_pd(a.im.add(off));
        let br = _mm256_load_pd(b.re.add(off));
        let bi = _mm256_load_pd(b.im.add(off));
        let re = _mm256_fmsub_pd(ar, br, _mm256_mul_pd(ai, bi));
        let im = _mm256_fmadd_pd(ar, bi, _mm256_mul_pd(ai, br));
        _mm256_store_pd(out.re.add(off), re);
        _mm256_store_pd(out.im.add(off), im);
    }
}

#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn cdiv_vec(out: SplitMut<f64>, a: Split<f64>, b: Split<f64>, n: usize) {
    assert_split_aligned(out.as_const());
    assert_split_aligned(a);
    assert_split_aligned(b);
    for i in 0..num_chunks(n) {
        let off = LANES * i;
        let ar = _mm256_load_pd(a.re.add(off));
        let ai = _mm256_load_pd(a.im.add(off));
        let br = _mm256_load_pd(b.re.add(off));
        let bi = _mm256_load_pd(b.im.add(off));
        let den = _mm256_fmadd_pd(br, br, _mm256_mul_pd(bi, bi));
        let re = _mm256_fmadd_pd(ar, br, _mm256_mul_pd(ai, bi));
        let im = _mm256_fmsub_pd(ai, br, _mm256_mul_pd(ar, bi));
        _mm256_store_pd(out.re.add(off), _mm256_div_pd(re, den));
        _mm256_store_pd(out.im.add(off), _mm256_div_pd(im, den));
    }
}

#[target_feature(enable = "avx2")]
pub unsafe fn cadd_scalar(out: SplitMut<f64>, a: Split<f64>, s: Complex<f64>, n: usize) {
    assert_split_aligned(out.as_const());
    assert_split_aligned(a);
    let sr = _mm256_set1_pd(s.re);
    let si = _mm256_set1_pd(s.im);
    for i in 0..num_chunks(n) {
        let off = LANES * i;
        let re = _mm256_add_pd(_mm256_load_pd(a.re.add(off)), sr);
        let im = _mm256_add_pd(_mm256_load_pd(a.im.add(off)), si);
        _mm256_store_pd(out.re.add(off), re);
        _mm256_store_pd(out.im.add(off), im);
    }
}

#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn cmul_scalar(out: SplitMut<f64>, a: Split<f64>, s: Complex<f64>, n: usize) {
    assert_split_aligned(out.as_const());
    assert_split_aligned(a);
    let sr = _mm256_set1_pd(s.re);
    let si = _mm256_set1_pd(s.im);
    for i in 0..num_chunks(n) {
        let off = LANES * i;
        let ar = _mm256_load_pd(a.re.add(off));
        let ai = _mm256_load_pd(a.im.add(off));
        let re = _mm256_fmsub_pd(ar, sr, _mm256_mul_pd(ai, si));
        let im = _mm256_fmadd_pd(ar, si, _mm256_mul_pd(ai, sr));
        _mm256_store_pd(out.re.add(off), re);
        _mm256_store_pd(out.im.add(off), im);
    }
}

/// `outa = a + b*c`, `outb = a - b*c`; the butterfly keeps both halves in
/// registers so the product is computed once per chunk.
#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn fused_addsub_prod(
    outa: SplitMut<f64>,
    outb: SplitMut<f64>,
    a: Split<f64>,
    b: Split<f64>,
    c: Split<f64>,
    n: usize,
) {
    assert_split_aligned(outa.as_const());
    assert_split_aligned(outb.as_const());
    assert_split_aligned(a);
    assert_split_aligned(b);
    assert_split_aligned(c);
    for i in 0..num_chunks(n) {
        let off = LANES * i;
        let ar = _mm256_load_pd(a.re.add(off));
        let ai = _mm256_load_pd(a.im.add(off));
        let br = _mm256_load_pd(b.re.add(off));
        let bi = _mm256_load_pd(b.im.add(off));
        let cr = _mm256_load_pd(c.re.add(off));
        let ci = _mm256_load_pd(c.im.add(off));
        let pr = _mm256_fmsub_pd(br, cr, _mm256_mul_pd(bi, ci));
        let pi = _mm256_fmadd_pd(br, ci, _mm256_mul_pd(bi, cr));
        _mm256_store_pd(outa.re.add(off), _mm256_add_pd(ar, pr));
        _mm256_store_pd(outa.im.add(off), _mm256_add_pd(ai, pi));
        _mm256_store_pd(outb.re.add(off), _mm256_sub_pd(ar, pr));
        _mm256_store_pd(outb.im.add(off), _mm256_sub_pd(ai, pi));
    }
}

/// `outa = a + b`, `outb = (a - b) * conj(c)`.
///
/// (x + jy) * (u - jv) = xu + yv + j(yu - xv)
#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn fused_addsub_mul_conj(
    outa: SplitMut<f64>,
    outb: SplitMut<f64>,
    a: Split<f64>,
    b: Split<f64>,
    c: Split<f64>,
    n: usize,
) {
    assert_split_aligned(outa.as_const());
    assert_split_aligned(outb.as_const());
    assert_split_aligned(a);
    assert_split_aligned(b);
    assert_split_aligned(c);
    for i in 0..num_chunks(n) {
        let off = LANES * i;
        let ar = _mm256_load_pd(a.re.add(off));
        let ai = _mm256_load_pd(a.im.add(off));
        let br = _mm256_load_pd(b.re.add(off));
        let bi = _mm256_load_pd(b.im.add(off));
        let cr = _mm256_load_pd(c.re.add(off));
        let ci = _mm256_load_pd(c.im.add(off));
        let sr = _mm256_add_pd(ar, br);
        let si = _mm256_add_pd(ai, bi);
        let dr = _mm256_sub_pd(ar, br);
        let di = _mm256_sub_pd(ai, bi);
        _mm256_store_pd(outb.re.add(off), _mm256_fmadd_pd(dr, cr, _mm256_mul_pd(di, ci)));
        _mm256_store_pd(outb.im.add(off), _mm256_fmsub_pd(di, cr, _mm256_mul_pd(dr, ci)));
        _mm256_store_pd(outa.re.add(off), sr);
        _mm256_store_pd(outa.im.add(off), si);
    }
}
