//! Public key: a ciphertext-shaped encryption of zero under the secret key.

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::encryption::encrypt_zero_symmetric;
use crate::params::ParmsId;

use super::{KeyError, SecretKey};

/// The public half of an RLWE key pair: `(pk_0, pk_1) = (-(a*s + e), a)` at
/// the key parameter level, always in NTT form, never seed-compressed.
pub struct PublicKey {
    data: Ciphertext,
}

impl PublicKey {
    pub fn generate(
        secret_key: &SecretKey,
        context: &Context,
    ) -> Result<Self, KeyError> {
        let mut data = Ciphertext::new();
        encrypt_zero_symmetric(
            secret_key,
            context,
            context.key_parms_id(),
            true,
            false,
            &mut data,
        )?;
        Ok(Self { data })
    }

    pub fn as_ciphertext(&self) -> &Ciphertext {
        &self.data
    }

    /// Number of polynomials `k`; asymmetric encryptions inherit this size.
    pub fn size(&self) -> usize {
        self.data.size()
    }

    pub fn parms_id(&self) -> ParmsId {
        self.data.parms_id()
    }

    /// Stripe `j` of key polynomial `t`, in NTT form.
    pub fn component(&self, t: usize, j: usize) -> &[u64] {
        self.data.component(t, j)
    }

    pub fn is_valid_for(&self, context: &Context) -> bool {
        self.data.parms_id() == context.key_parms_id()
            && self.data.size() >= 2
            && self.data.is_ntt_form()
            && !self.data.is_seed_compressed()
    }
}
