//! Negacyclic number-theoretic transform over a single RNS stripe.
//!
//! A table holds the powers of a primitive `2N`-th root of unity in
//! bit-reversed order, which lets both butterflies walk the table linearly.
//! The forward transform leaves values in bit-reversed order and the inverse
//! transform consumes that order, so a forward/inverse pair is the identity
//! and dyadic products between forward outputs are well defined.

use thiserror::Error;

use crate::math::modular::{add_mod, mod_inverse, mod_pow, mul_mod, sub_mod};
use crate::math::primes::is_ntt_friendly_prime;

pub type NttResult<T> = Result<T, NttError>;

#[derive(Debug, Error)]
pub enum NttError {
    #[error("transform degree {degree} is not a power of two")]
    InvalidDegree { degree: usize },

    #[error("modulus {modulus} is not an NTT-friendly prime for degree {degree}")]
    NonNttFriendlyModulus { modulus: u64, degree: usize },
}

/// Precomputed transform table for one modulus.
#[derive(Debug, Clone)]
pub struct NttTable {
    root_powers: Vec<u64>,
    inv_root_powers: Vec<u64>,
    degree_inv: u64,
    degree: usize,
    modulus: u64,
}

impl NttTable {
    pub fn new(degree: usize, modulus: u64) -> NttResult<Self> {
        if !degree.is_power_of_two() || degree < 2 {
            return Err(NttError::InvalidDegree { degree });
        }
        if !is_ntt_friendly_prime(modulus, degree as u64) {
            return Err(NttError::NonNttFriendlyModulus { modulus, degree });
        }

        let root = find_primitive_root(modulus, 2 * degree as u64);
        let root_inv = mod_inverse(root, modulus);
        let bits = degree.trailing_zeros() as usize;

        let mut root_powers = vec![1u64; degree];
        let mut inv_root_powers = vec![1u64; degree];
        for index in 1..degree {
            let rev = reverse_bits(index, bits) as u64;
            root_powers[index] = mod_pow(root, rev, modulus);
            inv_root_powers[index] = mod_pow(root_inv, rev, modulus);
        }

        Ok(Self {
            root_powers,
            inv_root_powers,
            degree_inv: mod_inverse(degree as u64, modulus),
            degree,
            modulus,
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// In-place forward transform of one stripe (Cooley–Tukey butterflies).
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the table degree.
    pub fn forward(&self, values: &mut [u64]) {
        assert_eq!(values.len(), self.degree, "stripe length mismatch");
        let q = self.modulus;

        let mut half = self.degree;
        let mut m = 1;
        while m < self.degree {
            half >>= 1;
            for i in 0..m {
                let w = self.root_powers[m + i];
                let base = 2 * i * half;
                for j in base..base + half {
                    let lo = values[j];
                    let hi = mul_mod(values[j + half], w, q);
                    values[j] = add_mod(lo, hi, q);
                    values[j + half] = sub_mod(lo, hi, q);
                }
            }
            m <<= 1;
        }
    }

    /// In-place inverse transform of one stripe (Gentleman–Sande butterflies),
    /// including the final scaling by `N^{-1}`.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the table degree.
    pub fn inverse(&self, values: &mut [u64]) {
        assert_eq!(values.len(), self.degree, "stripe length mismatch");
        let q = self.modulus;

        let mut half = 1;
        let mut m = self.degree;
        while m > 1 {
            let rows = m >> 1;
            let mut base = 0;
            for i in 0..rows {
                let w = self.inv_root_powers[rows + i];
                for j in base..base + half {
                    let lo = values[j];
                    let hi = values[j + half];
                    values[j] = add_mod(lo, hi, q);
                    values[j + half] = mul_mod(sub_mod(lo, hi, q), w, q);
                }
                base += 2 * half;
            }
            half <<= 1;
            m = rows;
        }

        for value in values.iter_mut() {
            *value = mul_mod(*value, self.degree_inv, q);
        }
    }
}

/// Finds a primitive `order`-th root of unity modulo `modulus`.
///
/// `order` is a power of two here, so primitivity reduces to checking that
/// the half-order power is not 1.
fn find_primitive_root(modulus: u64, order: u64) -> u64 {
    let exponent = (modulus - 1) / order;
    for candidate in 2..modulus {
        let root = mod_pow(candidate, exponent, modulus);
        if root != 1 && mod_pow(root, order / 2, modulus) != 1 {
            return root;
        }
    }
    unreachable!("no primitive root for NTT-friendly modulus {modulus}");
}

fn reverse_bits(value: usize, bits: usize) -> usize {
    value.reverse_bits() >> (usize::BITS as usize - bits)
}
