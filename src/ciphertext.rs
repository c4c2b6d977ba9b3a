//! Ciphertexts over the RNS polynomial ring.

use thiserror::Error;

use crate::context::Context;
use crate::memory::AllocationError;
use crate::params::ParmsId;
use crate::random::{RandomSeed, SEED_WORD_COUNT};

/// Marker word distinguishing a seed-compressed `c_1` from polynomial data.
/// No residue can collide with it: every stripe modulus is below 2^61.
pub const SEED_SENTINEL: u64 = u64::MAX;

#[derive(Debug, Error)]
pub enum CiphertextError {
    #[error("no context data for parms id {0}")]
    UnknownParmsId(ParmsId),

    #[error("ciphertext size {size} is below the minimum of 2")]
    InvalidSize { size: usize },

    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// An ordered tuple of `size >= 2` RNS polynomials sharing one parameter
/// level, stored back to back in a single buffer.
///
/// When `c_1` has been replaced by a seed record (see [`Ciphertext::seed`]),
/// the ciphertext is not directly usable for arithmetic; expanding the seed
/// restores the full polynomial.
#[derive(Debug, Clone, Default)]
pub struct Ciphertext {
    data: Vec<u64>,
    size: usize,
    coeff_count: usize,
    modulus_count: usize,
    parms_id: ParmsId,
    is_ntt_form: bool,
    scale: f64,
}

impl Ciphertext {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            ..Self::default()
        }
    }

    /// Reshapes the buffer for `size` polynomials at the given parameter
    /// level. Existing contents are discarded.
    pub fn resize(
        &mut self,
        context: &Context,
        parms_id: ParmsId,
        size: usize,
    ) -> Result<(), CiphertextError> {
        let context_data = context
            .get_context_data(parms_id)
            .ok_or(CiphertextError::UnknownParmsId(parms_id))?;
        if size < 2 {
            return Err(CiphertextError::InvalidSize { size });
        }
        let parms = context_data.parms();
        let words = size * parms.poly_word_count();

        self.data.clear();
        self.data
            .try_reserve_exact(words)
            .map_err(|_| AllocationError::new(words))?;
        self.data.resize(words, 0);

        self.size = size;
        self.coeff_count = parms.poly_modulus_degree();
        self.modulus_count = parms.coeff_modulus().len();
        self.parms_id = parms_id;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn coeff_count(&self) -> usize {
        self.coeff_count
    }

    pub fn modulus_count(&self) -> usize {
        self.modulus_count
    }

    pub fn parms_id(&self) -> ParmsId {
        self.parms_id
    }

    pub fn is_ntt_form(&self) -> bool {
        self.is_ntt_form
    }

    pub fn set_is_ntt_form(&mut self, is_ntt_form: bool) {
        self.is_ntt_form = is_ntt_form;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn poly_word_count(&self) -> usize {
        self.coeff_count * self.modulus_count
    }

    /// Polynomial `t` as one `L * N` slice.
    pub fn poly(&self, t: usize) -> &[u64] {
        let words = self.poly_word_count();
        &self.data[t * words..][..words]
    }

    pub fn poly_mut(&mut self, t: usize) -> &mut [u64] {
        let words = self.poly_word_count();
        &mut self.data[t * words..][..words]
    }

    /// Two distinct polynomials borrowed mutably at once.
    ///
    /// # Panics
    ///
    /// Panics unless `first < second < self.size()`.
    pub fn poly_pair_mut(
        &mut self,
        first: usize,
        second: usize,
    ) -> (&mut [u64], &mut [u64]) {
        assert!(first < second && second < self.size);
        let words = self.poly_word_count();
        let (head, tail) = self.data.split_at_mut(second * words);
        (
            &mut head[first * words..][..words],
            &mut tail[..words],
        )
    }

    /// Stripe `j` of polynomial `t`.
    pub fn component(&self, t: usize, j: usize) -> &[u64] {
        &self.poly(t)[j * self.coeff_count..][..self.coeff_count]
    }

    /// Whether `c_1` carries a seed record instead of polynomial data.
    pub fn is_seed_compressed(&self) -> bool {
        self.size >= 2 && self.poly(1)[0] == SEED_SENTINEL
    }

    /// Extracts the public seed from a seed-compressed `c_1`.
    pub fn seed(&self) -> Option<RandomSeed> {
        if !self.is_seed_compressed() {
            return None;
        }
        let mut seed = RandomSeed::default();
        let words = &self.poly(1)[1..=SEED_WORD_COUNT];
        for (chunk, &word) in seed.chunks_exact_mut(8).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        Some(seed)
    }

    /// Overwrites `c_1` with the sentinel followed by the packed seed.
    /// The remaining words of `c_1` keep whatever values they held.
    pub(crate) fn write_seed(&mut self, seed: &RandomSeed) {
        debug_assert!(self.poly_word_count() > SEED_WORD_COUNT);
        let c1 = self.poly_mut(1);
        c1[0] = SEED_SENTINEL;
        for (word, chunk) in c1[1..=SEED_WORD_COUNT]
            .iter_mut()
            .zip(seed.chunks_exact(8))
        {
            *word = u64::from_le_bytes(chunk.try_into().expect("8-byte chunk"));
        }
    }
}
