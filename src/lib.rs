//! Fresh zero-ciphertext sampling for RNS-based RLWE schemes.
//!
//! The crate produces encryptions of the zero plaintext in asymmetric form
//! (`pk * u + e`) and symmetric form (`(-(a*s + e), a)`, optionally with the
//! uniform `a` compressed down to the seed that generated it). Encryptions
//! of messages, key-switching keys, and the rest of a BFV/CKKS-style scheme
//! are thin layers over these two operations.

pub mod ciphertext;
pub mod context;
pub mod decryption;
pub mod encryption;
pub mod keys;
pub mod math;
pub mod memory;
pub mod params;
pub mod random;
pub mod rings;
pub mod sampling;

pub use ciphertext::{Ciphertext, CiphertextError, SEED_SENTINEL};
pub use context::{Context, ContextData};
pub use decryption::{DecryptError, decrypt, noise_infinity_norm};
pub use encryption::{
    EncryptError, EncryptResult, encrypt_zero_asymmetric, encrypt_zero_symmetric,
    expand_seed,
};
pub use keys::{KeyError, PublicKey, SecretKey};
pub use params::{
    EncryptionParameters, EncryptionParametersBuilder, ParameterError, ParmsId,
};
pub use random::{
    OsSeededFactory, RandomGeneratorFactory, RandomSeed, SeededFactory,
};
pub use rings::{NttTable, PolyForm, RnsPoly};
pub use sampling::{
    SamplingError, sample_poly_cbd, sample_poly_noise, sample_poly_normal,
    sample_poly_ternary, sample_poly_uniform,
};
