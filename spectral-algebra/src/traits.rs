use num_traits::float::{Float, FloatConst};
use std::fmt::Debug;

/// Floating-point precision the library is instantiated over.
///
/// `LANES` is the SIMD capacity at 32-byte register width; storage rounds
/// logical lengths up to a multiple of it so that both halves of a
/// split-complex buffer stay independently aligned.
pub trait Real: Float + FloatConst + Debug + Default + Send + Sync + 'static {
    const LANES: usize;
    const ALIGN: usize = 32;

    fn from_f64(x: f64) -> Self;

    fn from_usize(n: usize) -> Self {
        Self::from_f64(n as f64)
    }
}

impl Real for f32 {
    const LANES: usize = 8;

    fn from_f64(x: f64) -> Self {
        x as f32
    }
}

impl Real for f64 {
    const LANES: usize = 4;

    fn from_f64(x: f64) -> Self {
        x
    }
}
