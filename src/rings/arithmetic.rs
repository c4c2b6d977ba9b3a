//! Stripe-level polynomial arithmetic.
//!
//! Every function operates on a single RNS stripe of canonical residues in
//! `[0, q)`. Pointwise addition and negation are representation-agnostic;
//! the dyadic product is only meaningful when both operands are in NTT form.

use crate::math::modular::{add_mod, mul_mod, neg_mod};

/// `result[i] = a[i] * b[i] mod modulus`.
///
/// # Panics
///
/// Panics when the three stripes differ in length.
pub fn dyadic_product_coeffmod(a: &[u64], b: &[u64], modulus: u64, result: &mut [u64]) {
    assert_eq!(a.len(), b.len(), "stripe length mismatch");
    assert_eq!(a.len(), result.len(), "stripe length mismatch");
    for ((out, &x), &y) in result.iter_mut().zip(a).zip(b) {
        *out = mul_mod(x, y, modulus);
    }
}

/// `operand[i] = operand[i] * rhs[i] mod modulus`.
///
/// # Panics
///
/// Panics when the stripes differ in length.
pub fn dyadic_product_assign(operand: &mut [u64], rhs: &[u64], modulus: u64) {
    assert_eq!(operand.len(), rhs.len(), "stripe length mismatch");
    for (out, &y) in operand.iter_mut().zip(rhs) {
        *out = mul_mod(*out, y, modulus);
    }
}

/// `operand[i] = operand[i] + rhs[i] mod modulus`.
///
/// # Panics
///
/// Panics when the stripes differ in length.
pub fn add_poly_coeffmod(operand: &mut [u64], rhs: &[u64], modulus: u64) {
    assert_eq!(operand.len(), rhs.len(), "stripe length mismatch");
    for (out, &y) in operand.iter_mut().zip(rhs) {
        *out = add_mod(*out, y, modulus);
    }
}

/// `operand[i] = -operand[i] mod modulus`.
pub fn negate_poly_coeffmod(operand: &mut [u64], modulus: u64) {
    for out in operand.iter_mut() {
        *out = neg_mod(*out, modulus);
    }
}

/// Clears a whole `L * N` polynomial buffer.
pub fn set_zero_poly(destination: &mut [u64]) {
    destination.fill(0);
}
