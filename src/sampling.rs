//! Distribution samplers over the RNS polynomial ring.
//!
//! Every sampler fills an `L * N` destination buffer with a polynomial in
//! coefficient form, one stripe of canonical residues per modulus. A signed
//! draw is stored per stripe as its two's-complement lift: `x` when `x >= 0`,
//! `q_j - |x|` otherwise.
//!
//! Rejection loops (the clipped Gaussian and the uniform sampler) are the
//! only data-dependent branches in the crate.

use rand::Rng;
use rand_distr::{Distribution, Normal, uniform::Uniform};
use thiserror::Error;

use crate::params::EncryptionParameters;
use crate::random::RandomToStandardAdapter;
use crate::rings::set_zero_poly;

/// The centered binomial approximation is only tuned for one width.
const CBD_STANDARD_DEVIATION: f64 = 3.2;

pub type SamplingResult<T> = Result<T, SamplingError>;

#[derive(Debug, Error)]
pub enum SamplingError {
    #[error(
        "centered binomial sampling requires standard deviation \
         {CBD_STANDARD_DEVIATION}, got {sigma}; use the clipped Gaussian instead"
    )]
    UnsupportedStandardDeviation { sigma: f64 },
}

fn are_close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-13
}

/// A normal distribution rejected outside `[-max_deviation, max_deviation]`.
#[derive(Debug, Clone, Copy)]
struct ClippedNormal {
    normal: Normal<f64>,
    max_deviation: f64,
}

impl ClippedNormal {
    fn new(standard_deviation: f64, max_deviation: f64) -> Self {
        Self {
            normal: Normal::new(0.0, standard_deviation)
                .expect("standard deviation was validated by the parameter builder"),
            max_deviation,
        }
    }
}

impl Distribution<f64> for ClippedNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        loop {
            let sample = self.normal.sample(rng);
            if sample.abs() <= self.max_deviation {
                break sample;
            }
        }
    }
}

/// Writes a signed draw into every stripe of coefficient position `i`.
#[inline]
fn store_signed(destination: &mut [u64], moduli: &[u64], coeff_count: usize, i: usize, value: i64) {
    for (j, &q) in moduli.iter().enumerate() {
        destination[j * coeff_count + i] = if value < 0 {
            q - value.unsigned_abs()
        } else {
            value as u64
        };
    }
}

/// Samples `u <- R_3`: each coefficient is -1, 0, or 1 with equal
/// probability.
pub fn sample_poly_ternary<R: Rng + ?Sized>(
    rng: &mut R,
    parms: &EncryptionParameters,
    destination: &mut [u64],
) {
    let moduli = parms.coeff_modulus();
    let coeff_count = parms.poly_modulus_degree();
    debug_assert_eq!(destination.len(), parms.poly_word_count());

    let dist = Uniform::new_inclusive(0u64, 2).expect("constant range is valid");
    for i in 0..coeff_count {
        let draw = dist.sample(rng);
        for (j, &q) in moduli.iter().enumerate() {
            destination[j * coeff_count + i] = match draw {
                0 => q - 1,
                1 => 0,
                _ => 1,
            };
        }
    }
}

/// Samples an error polynomial from the clipped Gaussian `N(0, sigma^2)`
/// restricted to `[-B, B]`, truncating each real draw toward zero.
///
/// A zero clipping bound short-circuits to the zero polynomial.
pub fn sample_poly_normal<R: Rng + ?Sized>(
    rng: &mut R,
    parms: &EncryptionParameters,
    destination: &mut [u64],
) {
    let moduli = parms.coeff_modulus();
    let coeff_count = parms.poly_modulus_degree();
    debug_assert_eq!(destination.len(), parms.poly_word_count());

    if are_close(parms.noise_max_deviation(), 0.0) {
        set_zero_poly(destination);
        return;
    }

    let dist = ClippedNormal::new(
        parms.noise_standard_deviation(),
        parms.noise_max_deviation(),
    );
    for i in 0..coeff_count {
        let noise = dist.sample(rng) as i64;
        store_signed(destination, moduli, coeff_count, i, noise);
    }
}

/// Samples an error polynomial from a centered binomial distribution with
/// standard deviation 3.2.
///
/// Each coefficient consumes six random bytes; bytes 2 and 5 are masked to
/// five bits so each side contributes at most 21 set bits, giving support
/// `[-21, 21]`.
pub fn sample_poly_cbd<R: Rng + ?Sized>(
    rng: &mut R,
    parms: &EncryptionParameters,
    destination: &mut [u64],
) -> SamplingResult<()> {
    let moduli = parms.coeff_modulus();
    let coeff_count = parms.poly_modulus_degree();
    debug_assert_eq!(destination.len(), parms.poly_word_count());

    let sigma = parms.noise_standard_deviation();
    if sigma != CBD_STANDARD_DEVIATION {
        return Err(SamplingError::UnsupportedStandardDeviation { sigma });
    }

    if are_close(parms.noise_max_deviation(), 0.0) {
        set_zero_poly(destination);
        return Ok(());
    }

    for i in 0..coeff_count {
        let mut draw = [0u8; 6];
        rng.fill_bytes(&mut draw);
        draw[2] &= 0x1f;
        draw[5] &= 0x1f;
        let positive = draw[0].count_ones() + draw[1].count_ones() + draw[2].count_ones();
        let negative = draw[3].count_ones() + draw[4].count_ones() + draw[5].count_ones();
        let noise = positive as i64 - negative as i64;
        store_signed(destination, moduli, coeff_count, i, noise);
    }
    Ok(())
}

/// Samples a polynomial uniform over the ring.
///
/// Per stripe, 64-bit draws from the adapter are rejected at or above
/// `2^64 - (2^64 mod q_j)`, the largest multiple of `q_j` representable,
/// so the accepted range reduces to `[0, q_j)` without bias.
pub fn sample_poly_uniform<R: Rng + ?Sized>(
    rng: &mut R,
    parms: &EncryptionParameters,
    destination: &mut [u64],
) {
    let moduli = parms.coeff_modulus();
    let coeff_count = parms.poly_modulus_degree();
    debug_assert_eq!(destination.len(), parms.poly_word_count());

    let mut adapter = RandomToStandardAdapter::new(rng);
    for (j, &q) in moduli.iter().enumerate() {
        // q is an odd prime, so 2^64 mod q lands in [1, q - 1].
        let threshold = 0u64.wrapping_sub(u64::MAX % q + 1);
        for i in 0..coeff_count {
            let draw = loop {
                let candidate = adapter.next_u64();
                if candidate < threshold {
                    break candidate;
                }
            };
            destination[j * coeff_count + i] = draw % q;
        }
    }
}

/// Samples from the build-selected error distribution: the clipped Gaussian
/// with the `gaussian-noise` feature, the centered binomial otherwise.
pub fn sample_poly_noise<R: Rng + ?Sized>(
    rng: &mut R,
    parms: &EncryptionParameters,
    destination: &mut [u64],
) -> SamplingResult<()> {
    #[cfg(feature = "gaussian-noise")]
    {
        sample_poly_normal(rng, parms, destination);
        return Ok(());
    }

    #[cfg(not(feature = "gaussian-noise"))]
    sample_poly_cbd(rng, parms, destination)
}
