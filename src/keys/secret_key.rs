//! Secret key: a small ternary polynomial, held in NTT form.

use crate::context::Context;
use crate::memory::SecretPoly;
use crate::params::ParmsId;
use crate::sampling::sample_poly_ternary;

use super::KeyError;

/// The secret half of an RLWE key pair.
///
/// Coefficients are sampled from {-1, 0, 1} and stored stripe by stripe in
/// NTT form at the key parameter level. The backing buffer zeroizes itself
/// on drop.
pub struct SecretKey {
    data: SecretPoly,
    coeff_count: usize,
    parms_id: ParmsId,
}

impl SecretKey {
    pub fn generate(context: &Context) -> Result<Self, KeyError> {
        let context_data = context.key_context_data();
        let parms = context_data.parms();
        let coeff_count = parms.poly_modulus_degree();
        let modulus_count = parms.coeff_modulus().len();

        let mut rng = parms.random_generator().create()?;
        let mut data = SecretPoly::allocate(coeff_count, modulus_count)?;
        sample_poly_ternary(&mut *rng, parms, &mut data);
        for (j, table) in context_data.ntt_tables().iter().enumerate() {
            table.forward(data.stripe_mut(j, coeff_count));
        }

        Ok(Self {
            data,
            coeff_count,
            parms_id: context.key_parms_id(),
        })
    }

    pub fn parms_id(&self) -> ParmsId {
        self.parms_id
    }

    /// Stripe `j` of the key polynomial, in NTT form.
    pub fn stripe(&self, j: usize) -> &[u64] {
        self.data.stripe(j, self.coeff_count)
    }

    pub fn is_valid_for(&self, context: &Context) -> bool {
        self.parms_id == context.key_parms_id()
    }
}
