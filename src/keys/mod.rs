//! RLWE key pair.

pub mod public_key;
pub mod secret_key;

use thiserror::Error;

use crate::encryption::EncryptError;
use crate::memory::AllocationError;
use crate::random::RandomError;

pub use public_key::PublicKey;
pub use secret_key::SecretKey;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error(transparent)]
    Random(#[from] RandomError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Encrypt(#[from] EncryptError),
}
