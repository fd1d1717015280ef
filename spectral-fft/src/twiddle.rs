//! Precomputed twiddle factors, shared process-wide per precision.
//!
//! All radix-2 layers for a transform of size `n` live in one buffer of `n`
//! complex values, concatenated in halves. For n = 8:
//!
//! ```text
//! [0]: (unused sentinel)
//! [1]: W0(2)
//! [2]: W0(4) W1(4)
//! [4]: W0(8) W1(8) W2(8) W3(8)
//! ```
//!
//! The layer for size `m` starts at offset `m/2` and holds `m/2` factors
//! `Wk(m) = exp(-2*pi*i*k/m)`. Coarser layers are stride-2 subsamples of the
//! finer ones, so only the top layer needs trigonometry.

use std::f64::consts::PI;
use std::sync::{Arc, Mutex, OnceLock, Weak};

use spectral_algebra::{ComplexVec, ConstView, VectorArith};
use spectral_core::util;

/// Precision usable with the FFT engine: vector kernels plus a process-wide
/// twiddle cache slot.
pub trait Precision: VectorArith {
    #[doc(hidden)]
    fn twiddle_cache() -> &'static Mutex<Weak<TwiddleTable<Self>>>;
}

impl Precision for f32 {
    fn twiddle_cache() -> &'static Mutex<Weak<TwiddleTable<f32>>> {
        static CACHE: OnceLock<Mutex<Weak<TwiddleTable<f32>>>> = OnceLock::new();
        CACHE.get_or_init(Mutex::default)
    }
}

impl Precision for f64 {
    fn twiddle_cache() -> &'static Mutex<Weak<TwiddleTable<f64>>> {
        static CACHE: OnceLock<Mutex<Weak<TwiddleTable<f64>>>> = OnceLock::new();
        CACHE.get_or_init(Mutex::default)
    }
}

/// Fully populated layered table; immutable once built.
pub struct TwiddleTable<T: VectorArith> {
    factors: ComplexVec<T>,
}

impl<T: VectorArith> TwiddleTable<T> {
    fn build(n: usize) -> Self {
        debug_assert!(util::is_pow2(n));
        let mut factors = ComplexVec::new(n);
        {
            let (re, im) = factors.lanes_mut();
            // Top layer: n/2 factors at offset n/2, filled from trigonometry.
            for k in 0..n / 2 {
                let angle = -2.0 * PI * k as f64 / n as f64;
                re[n / 2 + k] = T::from_f64(angle.cos());
                im[n / 2 + k] = T::from_f64(angle.sin());
            }
            // Every coarser layer subsamples the next finer one at stride 2.
            let mut lsize = n / 2;
            while lsize >= 2 {
                for i in 0..lsize / 2 {
                    re[lsize / 2 + i] = re[lsize + 2 * i];
                    im[lsize / 2 + i] = im[lsize + 2 * i];
                }
                lsize /= 2;
            }
        }
        Self { factors }
    }

    pub fn size(&self) -> usize {
        self.factors.len()
    }

    /// The `m/2` factors of the size-`m` layer.
    pub fn layer(&self, m: usize) -> ConstView<'_, T> {
        debug_assert!(util::is_pow2(m) && m >= 2 && m <= self.size());
        self.factors.view().subview(m / 2, m / 2)
    }
}

/// Handle on the shared table. Engines hold one of these; the table is freed
/// when the last handle drops and rebuilt larger when a bigger transform
/// comes along.
pub struct TwiddleStore<T: Precision> {
    table: Arc<TwiddleTable<T>>,
}

impl<T: Precision> TwiddleStore<T> {
    pub fn new(n: usize) -> Self {
        debug_assert!(util::is_pow2(n));
        let mut slot = T::twiddle_cache().lock().unwrap();
        if let Some(table) = slot.upgrade() {
            if table.size() >= n {
                return Self { table };
            }
        }
        log::debug!("building twiddle table for size {}", n);
        let table = Arc::new(TwiddleTable::build(n));
        *slot = Arc::downgrade(&table);
        Self { table }
    }

    pub fn size(&self) -> usize {
        self.table.size()
    }

    pub fn layer(&self, m: usize) -> ConstView<'_, T> {
        self.table.layer(m)
    }
}
