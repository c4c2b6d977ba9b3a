//! Decryption, used to close the loop on the encryptors.

use thiserror::Error;

use crate::ciphertext::Ciphertext;
use crate::context::{Context, ContextData};
use crate::keys::SecretKey;
use crate::math::crt_center_coeff;
use crate::memory::{AllocationError, SecretPoly};
use crate::params::ParmsId;
use crate::rings::{PolyForm, RnsPoly, add_poly_coeffmod, dyadic_product_assign};

pub type DecryptResult<T> = Result<T, DecryptError>;

#[derive(Debug, Error)]
pub enum DecryptError {
    #[error("no context data for parms id {0}")]
    UnknownParmsId(ParmsId),

    #[error("ciphertext is seed-compressed; expand the seed first")]
    SeedCompressed,

    #[error("secret key is not valid for the encryption context")]
    InvalidKey,

    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// Computes `sum_t c_t * s^t` and returns it in coefficient form.
///
/// For a zero encryption the result is the accumulated noise; rescaling it
/// to a plaintext modulus yields the zero plaintext as long as its infinity
/// norm stays far below `Q / 2`.
pub fn decrypt(
    ciphertext: &Ciphertext,
    secret_key: &SecretKey,
    context: &Context,
) -> DecryptResult<RnsPoly> {
    if ciphertext.is_seed_compressed() {
        return Err(DecryptError::SeedCompressed);
    }
    #[cfg(debug_assertions)]
    if !secret_key.is_valid_for(context) {
        return Err(DecryptError::InvalidKey);
    }

    let parms_id = ciphertext.parms_id();
    let context_data = context
        .get_context_data(parms_id)
        .ok_or(DecryptError::UnknownParmsId(parms_id))?;
    let parms = context_data.parms();
    let moduli = parms.coeff_modulus();
    let coeff_count = parms.poly_modulus_degree();
    let ntt_tables = context_data.ntt_tables();
    let size = ciphertext.size();

    // Horner in the NTT domain: acc = (...(c_{k-1} * s + c_{k-2}) * s ...)
    // * s + c_0. Intermediates correlate with the key, so they live in
    // zeroizing scratch.
    let mut acc = SecretPoly::allocate(coeff_count, moduli.len())?;
    let mut operand = SecretPoly::allocate(coeff_count, moduli.len())?;

    acc.copy_from_slice(ciphertext.poly(size - 1));
    if !ciphertext.is_ntt_form() {
        for (j, table) in ntt_tables.iter().enumerate() {
            table.forward(acc.stripe_mut(j, coeff_count));
        }
    }

    for t in (0..size - 1).rev() {
        operand.copy_from_slice(ciphertext.poly(t));
        if !ciphertext.is_ntt_form() {
            for (j, table) in ntt_tables.iter().enumerate() {
                table.forward(operand.stripe_mut(j, coeff_count));
            }
        }
        for (j, &q) in moduli.iter().enumerate() {
            dyadic_product_assign(
                acc.stripe_mut(j, coeff_count),
                secret_key.stripe(j),
                q,
            );
            add_poly_coeffmod(
                acc.stripe_mut(j, coeff_count),
                operand.stripe(j, coeff_count),
                q,
            );
        }
    }

    let mut result = RnsPoly::zero(coeff_count, moduli.len());
    result.as_mut_slice().copy_from_slice(&acc);
    for (j, table) in ntt_tables.iter().enumerate() {
        table.inverse(result.stripe_mut(j));
    }
    result.set_form(PolyForm::Coefficient);
    Ok(result)
}

/// Infinity norm of a coefficient-form polynomial after centered CRT
/// reconstruction; the yardstick for how much noise an encryption carries.
pub fn noise_infinity_norm(poly: &RnsPoly, context_data: &ContextData) -> u128 {
    let moduli = context_data.parms().coeff_modulus();
    let coeff_count = poly.coeff_count();
    debug_assert_eq!(poly.form(), PolyForm::Coefficient);
    debug_assert_eq!(poly.modulus_count(), moduli.len());

    let mut residues = vec![0u64; moduli.len()];
    let mut max = 0u128;
    for i in 0..coeff_count {
        for (j, residue) in residues.iter_mut().enumerate() {
            *residue = poly.stripe(j)[i];
        }
        max = max.max(crt_center_coeff(&residues, moduli).unsigned_abs());
    }
    max
}
