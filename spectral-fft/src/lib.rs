pub mod convolution;
pub mod dual;
pub mod fft;
pub mod function;
pub mod shuffle;
pub mod twiddle;

pub use convolution::*;
pub use dual::*;
pub use fft::*;
pub use function::*;
pub use shuffle::*;
pub use twiddle::*;
