//! Randomness plumbing.
//!
//! Two kinds of generator feed the encryptors: a *bootstrap* generator from
//! the parameter-held factory (secret material: errors, ephemeral secrets,
//! and the public seed itself), and a *public* generator expanded from that
//! seed, which regenerates the uniform `a` component of seed-compressed
//! ciphertexts. Both are ChaCha20 streams; only the seeding differs.

use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng, TryRngCore};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

/// Byte width of a generator seed (the ChaCha20 key size).
pub const RANDOM_SEED_BYTES: usize = 32;

/// Seed width in 64-bit words, as packed into a ciphertext seed record.
pub const SEED_WORD_COUNT: usize = RANDOM_SEED_BYTES / 8;

pub type RandomSeed = [u8; RANDOM_SEED_BYTES];

#[derive(Debug, Error)]
pub enum RandomError {
    #[error("entropy source failure: {0}")]
    EntropySource(#[from] rand::rand_core::OsError),
}

/// Adapts a byte-oriented generator into a uniform 32/64-bit integer source.
///
/// Each 32-bit draw consumes exactly four bytes, interpreted little-endian;
/// a 64-bit draw concatenates two 32-bit draws, high word first. Keeping the
/// byte interpretation fixed here makes seed-expanded output independent of
/// the generator's own word conventions.
pub struct RandomToStandardAdapter<'a, R: RngCore + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: RngCore + ?Sized> RandomToStandardAdapter<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.rng.fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }
}

/// Spawns fresh cryptographic generators for the encryptors.
///
/// Implementations must return independent streams from consecutive `create`
/// calls unless determinism is the point (see [`SeededFactory`]).
pub trait RandomGeneratorFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn RngCore>, RandomError>;
}

/// Default factory: every generator is keyed from OS entropy.
#[derive(Debug, Clone, Default)]
pub struct OsSeededFactory;

impl RandomGeneratorFactory for OsSeededFactory {
    fn create(&self) -> Result<Box<dyn RngCore>, RandomError> {
        let mut seed = RandomSeed::default();
        OsRng.try_fill_bytes(&mut seed)?;
        Ok(Box::new(ChaCha20Rng::from_seed(seed)))
    }
}

/// Deterministic factory: every generator replays the same fixed seed.
/// Intended for reproducible tests, not production encryption.
#[derive(Debug, Clone)]
pub struct SeededFactory {
    seed: RandomSeed,
}

impl SeededFactory {
    pub fn new(seed: RandomSeed) -> Self {
        Self { seed }
    }

    /// Convenience for tests: expands a word into a full seed.
    pub fn from_u64(seed: u64) -> Self {
        let mut bytes = RandomSeed::default();
        bytes[..8].copy_from_slice(&seed.to_le_bytes());
        Self { seed: bytes }
    }
}

impl RandomGeneratorFactory for SeededFactory {
    fn create(&self) -> Result<Box<dyn RngCore>, RandomError> {
        Ok(Box::new(ChaCha20Rng::from_seed(self.seed)))
    }
}

/// The seed-derivable generator that expands the public `a` polynomial.
pub fn public_rng(seed: RandomSeed) -> ChaCha20Rng {
    ChaCha20Rng::from_seed(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Emits the byte sequence 0, 1, 2, … so word assembly is observable.
    struct CountingBytes {
        next: u8,
    }

    impl RngCore for CountingBytes {
        fn next_u32(&mut self) -> u32 {
            let mut bytes = [0u8; 4];
            self.fill_bytes(&mut bytes);
            u32::from_le_bytes(bytes)
        }

        fn next_u64(&mut self) -> u64 {
            let mut bytes = [0u8; 8];
            self.fill_bytes(&mut bytes);
            u64::from_le_bytes(bytes)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for byte in dest {
                *byte = self.next;
                self.next = self.next.wrapping_add(1);
            }
        }
    }

    #[test]
    fn adapter_reads_four_bytes_little_endian() {
        let mut source = CountingBytes { next: 0 };
        let mut adapter = RandomToStandardAdapter::new(&mut source);
        assert_eq!(adapter.next_u32(), u32::from_le_bytes([0, 1, 2, 3]));
        assert_eq!(adapter.next_u32(), u32::from_le_bytes([4, 5, 6, 7]));
    }

    #[test]
    fn adapter_concatenates_high_word_first() {
        let mut source = CountingBytes { next: 0 };
        let mut adapter = RandomToStandardAdapter::new(&mut source);
        let value = adapter.next_u64();
        let high = u32::from_le_bytes([0, 1, 2, 3]) as u64;
        let low = u32::from_le_bytes([4, 5, 6, 7]) as u64;
        assert_eq!(value, (high << 32) | low);
    }

    #[test]
    fn seeded_factory_replays_the_same_stream() {
        let factory = SeededFactory::from_u64(99);
        let mut a = factory.create().unwrap();
        let mut b = factory.create().unwrap();
        for _ in 0..64 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn os_factory_produces_distinct_streams() {
        let factory = OsSeededFactory;
        let mut a = factory.create().unwrap();
        let mut b = factory.create().unwrap();
        let words_a: Vec<u64> = (0..8).map(|_| a.next_u64()).collect();
        let words_b: Vec<u64> = (0..8).map(|_| b.next_u64()).collect();
        assert_ne!(words_a, words_b);
    }

    #[test]
    fn public_rng_is_deterministic_in_the_seed() {
        let seed = [7u8; RANDOM_SEED_BYTES];
        let mut a = public_rng(seed);
        let mut b = public_rng(seed);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }
}
