//! Scratch allocation for secret material.
//!
//! Every buffer that ever holds secret-dependent values (ephemeral secrets,
//! error polynomials, decryption intermediates) comes from here so that its
//! contents are wiped on every exit path, including early returns through
//! `?`. The wipe uses volatile writes so the optimizer cannot elide it.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{Ordering, compiler_fence};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("allocation of {words} words failed")]
pub struct AllocationError {
    words: usize,
}

impl AllocationError {
    pub(crate) fn new(words: usize) -> Self {
        Self { words }
    }
}

/// A polynomial-sized scratch buffer that zeroizes itself on drop.
pub struct SecretPoly {
    data: Vec<u64>,
}

impl SecretPoly {
    /// Allocates a zero-filled `modulus_count * coeff_count` buffer,
    /// reporting exhaustion instead of aborting.
    pub fn allocate(
        coeff_count: usize,
        modulus_count: usize,
    ) -> Result<Self, AllocationError> {
        let words = coeff_count
            .checked_mul(modulus_count)
            .ok_or(AllocationError { words: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(words)
            .map_err(|_| AllocationError { words })?;
        data.resize(words, 0);
        Ok(Self { data })
    }

    pub fn stripe(&self, index: usize, coeff_count: usize) -> &[u64] {
        &self.data[index * coeff_count..][..coeff_count]
    }

    pub fn stripe_mut(&mut self, index: usize, coeff_count: usize) -> &mut [u64] {
        &mut self.data[index * coeff_count..][..coeff_count]
    }
}

impl Deref for SecretPoly {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        &self.data
    }
}

impl DerefMut for SecretPoly {
    fn deref_mut(&mut self) -> &mut [u64] {
        &mut self.data
    }
}

impl Drop for SecretPoly {
    fn drop(&mut self) {
        for word in self.data.iter_mut() {
            // Volatile so the wipe survives dead-store elimination.
            unsafe { std::ptr::write_volatile(word, 0) };
        }
        compiler_fence(Ordering::SeqCst);
    }
}
