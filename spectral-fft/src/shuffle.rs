//! In-place bit-reversal permutation.
//!
//! Small inputs use the trivial swap loop. Past the point where the input
//! outgrows L1, the permutation runs blocked through a scratch buffer of
//! `2^(2Q)` elements (Carter & Gatlin, "Towards an Optimal Bit-Reversal
//! Permutation Program"): the index is split `i = a*2^(k-Q) + b*2^Q + c`
//! with `a, c` of `Q` bits, and whole `(a, c)` tiles are gathered, swapped
//! against the partner block `rev(b)`, and written back.

use spectral_algebra::{ComplexVec, MutView, Real};
use spectral_core::util;
use spectral_core::{Result, SpectralError};

// Q = 5 puts the scratch buffer at 2^10 complex values: 16 kB of f64, half a
// typical L1, leaving room for the two input blocks in flight.
const Q: u32 = 5;

/// Reverses the low `bits` bits of `i`.
#[inline]
pub fn rev(i: usize, bits: u32) -> usize {
    debug_assert!(bits > 0);
    i.reverse_bits() >> (usize::BITS - bits)
}

pub struct Shuffle {
    size: usize,
    bits: u32,
}

impl Shuffle {
    pub fn new(n: usize) -> Result<Self> {
        if !util::is_pow2(n) {
            return Err(SpectralError::InvalidParameter(format!(
                "shuffle size {} is not a power of two",
                n
            )));
        }
        let bits = util::log2(n);
        log::debug!(
            "bit-reversal of size {} via {}",
            n,
            if bits <= 2 * Q { "trivial swaps" } else { "cobra" }
        );
        Ok(Self { size: n, bits })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn apply<T: Real>(&self, x: &mut MutView<T>) {
        debug_assert!(x.len() >= self.size);
        if self.bits == 0 {
            return;
        }
        if self.bits <= 2 * Q {
            self.trivial(x);
        } else {
            self.cobra(x);
        }
    }

    fn trivial<T: Real>(&self, x: &mut MutView<T>) {
        for i in 0..self.size {
            let j = rev(i, self.bits);
            if i < j {
                x.swap(i, j);
            }
        }
    }

    fn cobra<T: Real>(&self, x: &mut MutView<T>) {
        let b_bits = self.bits - 2 * Q;
        let high = self.bits - Q;
        let mut scratch = ComplexVec::<T>::new(1 << (2 * Q));

        for b in 0..1usize << b_bits {
            let bp = rev(b, b_bits);
            if b > bp {
                // The partner pass already exchanged this pair.
                continue;
            }

            // Gather block b into scratch, a-component bit-reversed.
            for a in 0..1usize << Q {
                let ap = rev(a, Q);
                for c in 0..1usize << Q {
                    scratch.set(ap << Q | c, x.get(a << high | b << Q | c));
                }
            }

            // Swap scratch against the partner block b', c-component reversed.
            // Scratch leaves this loop holding block b' in (a, c') order.
            for c in 0..1usize << Q {
                let cp = rev(c, Q);
                for ap in 0..1usize << Q {
                    let t = ap << Q | c;
                    let dst = cp << high | bp << Q | ap;
                    let tmp = x.get(dst);
                    x.set(dst, scratch.get(t));
                    scratch.set(t, tmp);
                }
            }

            // Self-paired blocks were permuted in place by the swap.
            if b != bp {
                for a in 0..1usize << Q {
                    let ap = rev(a, Q);
                    for c in 0..1usize << Q {
                        x.set(a << high | b << Q | c, scratch.get(ap << Q | c));
                    }
                }
            }
        }
    }
}
