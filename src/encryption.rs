//! Fresh encryptions of zero.
//!
//! Everything else the library does starts here: an encryption of a message
//! is a zero encryption with the encoded message added to its first
//! polynomial, and key-switching keys are zero encryptions with key material
//! folded in. The two entry points differ in which key drives the sampling.
//!
//! The symmetric path runs two generators. A private bootstrap generator
//! from the parameter factory produces the error polynomial and a fresh
//! public seed; a second generator expanded from that seed produces the
//! uniform `a`. Because `a` depends only on the seed, a caller may ask for
//! `c_1` to be stored as the seed itself (`save_seed`), shrinking the
//! ciphertext by almost half.

use rand::RngCore;
use thiserror::Error;

use crate::ciphertext::{Ciphertext, CiphertextError};
use crate::context::Context;
use crate::keys::{PublicKey, SecretKey};
use crate::memory::{AllocationError, SecretPoly};
use crate::params::ParmsId;
use crate::random::{RandomError, RandomSeed, SEED_WORD_COUNT, public_rng};
use crate::rings::{
    add_poly_coeffmod, dyadic_product_coeffmod, negate_poly_coeffmod,
};
use crate::sampling::{
    SamplingError, sample_poly_noise, sample_poly_ternary, sample_poly_uniform,
};

pub type EncryptResult<T> = Result<T, EncryptError>;

#[derive(Debug, Error)]
pub enum EncryptError {
    #[error("no context data for parms id {0}")]
    UnknownParmsId(ParmsId),

    #[error("{key} is not valid for the encryption context")]
    InvalidKey { key: &'static str },

    #[error(transparent)]
    Random(#[from] RandomError),

    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Ciphertext(#[from] CiphertextError),
}

/// Fills `destination` with `(c_0, …, c_{k-1})` where
/// `c_t = pk_t * u + e_t`, `u` ternary and each `e_t` from the error
/// distribution, all drawn from one fresh generator.
///
/// The output is in the representation requested by `is_ntt_form` and has
/// `scale == 1`. On error the destination holds no usable ciphertext and
/// must be discarded.
pub fn encrypt_zero_asymmetric(
    public_key: &PublicKey,
    context: &Context,
    parms_id: ParmsId,
    is_ntt_form: bool,
    destination: &mut Ciphertext,
) -> EncryptResult<()> {
    #[cfg(debug_assertions)]
    if !public_key.is_valid_for(context) {
        return Err(EncryptError::InvalidKey { key: "public key" });
    }

    let context_data = context
        .get_context_data(parms_id)
        .ok_or(EncryptError::UnknownParmsId(parms_id))?;
    let parms = context_data.parms();
    let moduli = parms.coeff_modulus();
    let coeff_count = parms.poly_modulus_degree();
    let ntt_tables = context_data.ntt_tables();
    let encrypted_size = public_key.size();

    destination.resize(context, parms_id, encrypted_size)?;
    destination.set_is_ntt_form(is_ntt_form);
    destination.set_scale(1.0);

    // u and the errors share one generator.
    let mut rng = parms.random_generator().create()?;

    let mut scratch = SecretPoly::allocate(coeff_count, moduli.len())?;
    sample_poly_ternary(&mut *rng, parms, &mut scratch);

    // c_t = pk_t * u, with the dyadic product taken in the NTT domain.
    for (j, (&q, table)) in moduli.iter().zip(ntt_tables).enumerate() {
        table.forward(scratch.stripe_mut(j, coeff_count));
        for t in 0..encrypted_size {
            let stripe =
                &mut destination.poly_mut(t)[j * coeff_count..][..coeff_count];
            dyadic_product_coeffmod(
                scratch.stripe(j, coeff_count),
                public_key.component(t, j),
                q,
                stripe,
            );
            if !is_ntt_form {
                table.inverse(stripe);
            }
        }
    }

    // u is consumed; its buffer now carries the errors. c_t += e_t in the
    // output representation.
    for t in 0..encrypted_size {
        sample_poly_noise(&mut *rng, parms, &mut scratch)?;
        for (j, (&q, table)) in moduli.iter().zip(ntt_tables).enumerate() {
            if is_ntt_form {
                table.forward(scratch.stripe_mut(j, coeff_count));
            }
            add_poly_coeffmod(
                &mut destination.poly_mut(t)[j * coeff_count..][..coeff_count],
                scratch.stripe(j, coeff_count),
                q,
            );
        }
    }
    Ok(())
}

/// Fills `destination` with `(c_0, c_1) = (-(a*s + e), a)`.
///
/// With `save_seed`, `c_1` is stored as a seed record from which `a` can be
/// regenerated; the request is silently dropped when the polynomial is too
/// small to hold the record. The output representation and scale behave as
/// in [`encrypt_zero_asymmetric`].
pub fn encrypt_zero_symmetric(
    secret_key: &SecretKey,
    context: &Context,
    parms_id: ParmsId,
    is_ntt_form: bool,
    save_seed: bool,
    destination: &mut Ciphertext,
) -> EncryptResult<()> {
    #[cfg(debug_assertions)]
    if !secret_key.is_valid_for(context) {
        return Err(EncryptError::InvalidKey { key: "secret key" });
    }

    let context_data = context
        .get_context_data(parms_id)
        .ok_or(EncryptError::UnknownParmsId(parms_id))?;
    let parms = context_data.parms();
    let moduli = parms.coeff_modulus();
    let coeff_count = parms.poly_modulus_degree();
    let ntt_tables = context_data.ntt_tables();

    // One extra word for the sentinel.
    let save_seed = save_seed && parms.poly_word_count() >= SEED_WORD_COUNT + 1;

    destination.resize(context, parms_id, 2)?;
    destination.set_is_ntt_form(is_ntt_form);
    destination.set_scale(1.0);

    let mut bootstrap_rng = parms.random_generator().create()?;
    let mut public_seed = RandomSeed::default();
    bootstrap_rng.fill_bytes(&mut public_seed);
    let mut ciphertext_rng = public_rng(public_seed);

    // c_1 = a. The sampler writes raw residues; because uniformity is
    // preserved by the transform, the buffer is read as already being in NTT
    // form. When a coefficient-form ciphertext must stay reconstructible
    // from the seed, the NTT-domain value is pinned down by transforming
    // here, and the inverse transform below is skipped since the seed record
    // overwrites c_1 anyway.
    sample_poly_uniform(&mut ciphertext_rng, parms, destination.poly_mut(1));
    if !is_ntt_form && save_seed {
        for (j, table) in ntt_tables.iter().enumerate() {
            table.forward(
                &mut destination.poly_mut(1)[j * coeff_count..][..coeff_count],
            );
        }
    }

    let mut noise = SecretPoly::allocate(coeff_count, moduli.len())?;
    sample_poly_noise(&mut *bootstrap_rng, parms, &mut noise)?;

    // c_0 = -(a*s + e), stripe by stripe.
    let (c0, c1) = destination.poly_pair_mut(0, 1);
    for (j, (&q, table)) in moduli.iter().zip(ntt_tables).enumerate() {
        let c0_stripe = &mut c0[j * coeff_count..][..coeff_count];
        let c1_stripe = &c1[j * coeff_count..][..coeff_count];
        dyadic_product_coeffmod(secret_key.stripe(j), c1_stripe, q, c0_stripe);
        if is_ntt_form {
            table.forward(noise.stripe_mut(j, coeff_count));
        } else {
            table.inverse(c0_stripe);
        }
        add_poly_coeffmod(c0_stripe, noise.stripe(j, coeff_count), q);
        negate_poly_coeffmod(c0_stripe, q);
    }

    if !is_ntt_form && !save_seed {
        for (j, table) in ntt_tables.iter().enumerate() {
            table.inverse(&mut c1[j * coeff_count..][..coeff_count]);
        }
    }

    if save_seed {
        destination.write_seed(&public_seed);
    }
    Ok(())
}

/// Replaces a seed-compressed `c_1` by the full polynomial it stands for,
/// regenerating `a` from the stored public seed. Ciphertexts that carry no
/// seed record pass through untouched.
pub fn expand_seed(
    context: &Context,
    destination: &mut Ciphertext,
) -> EncryptResult<()> {
    let Some(seed) = destination.seed() else {
        return Ok(());
    };
    let parms_id = destination.parms_id();
    let context_data = context
        .get_context_data(parms_id)
        .ok_or(EncryptError::UnknownParmsId(parms_id))?;
    let parms = context_data.parms();

    // Regenerating the raw sampler output is enough in both representations:
    // an NTT-form ciphertext reads it as the NTT-domain value directly, and
    // a coefficient-form ciphertext needs the inverse transform of the
    // pinned-down NTT value, which is the raw output again.
    let mut rng = public_rng(seed);
    sample_poly_uniform(&mut rng, parms, destination.poly_mut(1));
    Ok(())
}
