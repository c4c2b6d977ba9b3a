//! Encryption parameters.
//!
//! A parameter set fixes the ring degree `N`, the ordered RNS coefficient
//! modulus, the two noise constants, and the factory used to spawn fresh
//! cryptographic generators. The noise constants travel with the parameters
//! instead of living in process globals so that different parameter sets can
//! coexist in one process and tests can tweak them freely.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use thiserror::Error;

use crate::random::{OsSeededFactory, RandomGeneratorFactory};
use crate::rings::NttError;

/// Smallest accepted ring degree. Degrees below 1024 carry no security and
/// exist for tests only.
pub const POLY_MODULUS_DEGREE_MIN: usize = 2;
pub const POLY_MODULUS_DEGREE_MAX: usize = 32768;

/// Widest accepted stripe modulus. Keeping every modulus below 2^61 also
/// guarantees the ciphertext seed sentinel can never equal a residue.
pub const COEFF_MODULUS_BIT_MAX: u32 = 61;

const DEFAULT_NOISE_STANDARD_DEVIATION: f64 = 3.2;
const DEFAULT_NOISE_MAX_DEVIATION_MULTIPLIER: f64 = 6.0;

pub type ParameterResult<T> = Result<T, ParameterError>;

#[derive(Debug, Error)]
pub enum ParameterError {
    #[error(
        "poly_modulus_degree {degree} must be a power of two in \
         [{POLY_MODULUS_DEGREE_MIN}, {POLY_MODULUS_DEGREE_MAX}]"
    )]
    InvalidPolyModulusDegree { degree: usize },

    #[error("coeff_modulus must contain at least one prime")]
    EmptyCoeffModulus,

    #[error("coeff_modulus entry {modulus} exceeds {COEFF_MODULUS_BIT_MAX} bits")]
    ModulusTooWide { modulus: u64 },

    #[error("coeff_modulus entry {modulus} is not prime")]
    ModulusNotPrime { modulus: u64 },

    #[error("coeff_modulus entry {modulus} appears more than once")]
    DuplicateModulus { modulus: u64 },

    #[error("noise standard deviation {sigma} must be positive and finite")]
    InvalidNoiseStandardDeviation { sigma: f64 },

    #[error("noise max deviation {bound} must be non-negative and finite")]
    InvalidNoiseMaxDeviation { bound: f64 },

    #[error(transparent)]
    Ntt(#[from] NttError),
}

/// Tag identifying one parameter set (degree plus modulus chain level).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ParmsId(u64);

impl fmt::Display for ParmsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

fn compute_parms_id(degree: usize, moduli: &[u64]) -> ParmsId {
    let mut hasher = DefaultHasher::new();
    degree.hash(&mut hasher);
    moduli.hash(&mut hasher);
    ParmsId(hasher.finish())
}

#[derive(Clone)]
pub struct EncryptionParameters {
    poly_modulus_degree: usize,
    coeff_modulus: Vec<u64>,
    noise_standard_deviation: f64,
    noise_max_deviation: f64,
    random_generator: Arc<dyn RandomGeneratorFactory>,
    parms_id: ParmsId,
}

impl fmt::Debug for EncryptionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionParameters")
            .field("poly_modulus_degree", &self.poly_modulus_degree)
            .field("coeff_modulus", &self.coeff_modulus)
            .field("noise_standard_deviation", &self.noise_standard_deviation)
            .field("noise_max_deviation", &self.noise_max_deviation)
            .field("parms_id", &self.parms_id)
            .finish_non_exhaustive()
    }
}

impl EncryptionParameters {
    pub fn builder() -> EncryptionParametersBuilder {
        EncryptionParametersBuilder::new()
    }

    pub fn poly_modulus_degree(&self) -> usize {
        self.poly_modulus_degree
    }

    pub fn coeff_modulus(&self) -> &[u64] {
        &self.coeff_modulus
    }

    pub fn noise_standard_deviation(&self) -> f64 {
        self.noise_standard_deviation
    }

    pub fn noise_max_deviation(&self) -> f64 {
        self.noise_max_deviation
    }

    pub fn random_generator(&self) -> &Arc<dyn RandomGeneratorFactory> {
        &self.random_generator
    }

    pub fn parms_id(&self) -> ParmsId {
        self.parms_id
    }

    /// Number of 64-bit words in one polynomial under these parameters.
    pub fn poly_word_count(&self) -> usize {
        self.poly_modulus_degree * self.coeff_modulus.len()
    }

    /// Same parameters restricted to the first `len` moduli; used to derive
    /// the modulus-switching chain.
    pub(crate) fn truncated(&self, len: usize) -> Self {
        debug_assert!(len >= 1 && len <= self.coeff_modulus.len());
        let coeff_modulus = self.coeff_modulus[..len].to_vec();
        let parms_id = compute_parms_id(self.poly_modulus_degree, &coeff_modulus);
        Self {
            poly_modulus_degree: self.poly_modulus_degree,
            coeff_modulus,
            noise_standard_deviation: self.noise_standard_deviation,
            noise_max_deviation: self.noise_max_deviation,
            random_generator: Arc::clone(&self.random_generator),
            parms_id,
        }
    }
}

pub struct EncryptionParametersBuilder {
    poly_modulus_degree: usize,
    coeff_modulus: Vec<u64>,
    noise_standard_deviation: f64,
    noise_max_deviation: Option<f64>,
    random_generator: Option<Arc<dyn RandomGeneratorFactory>>,
}

impl EncryptionParametersBuilder {
    pub fn new() -> Self {
        Self {
            poly_modulus_degree: 0,
            coeff_modulus: Vec::new(),
            noise_standard_deviation: DEFAULT_NOISE_STANDARD_DEVIATION,
            noise_max_deviation: None,
            random_generator: None,
        }
    }

    pub fn poly_modulus_degree(mut self, degree: usize) -> Self {
        self.poly_modulus_degree = degree;
        self
    }

    pub fn coeff_modulus(mut self, moduli: Vec<u64>) -> Self {
        self.coeff_modulus = moduli;
        self
    }

    pub fn noise_standard_deviation(mut self, sigma: f64) -> Self {
        self.noise_standard_deviation = sigma;
        self
    }

    /// Hard clipping bound for the Gaussian sampler. Defaults to six standard
    /// deviations when not set explicitly.
    pub fn noise_max_deviation(mut self, bound: f64) -> Self {
        self.noise_max_deviation = Some(bound);
        self
    }

    pub fn random_generator(
        mut self,
        factory: Arc<dyn RandomGeneratorFactory>,
    ) -> Self {
        self.random_generator = Some(factory);
        self
    }

    pub fn build(self) -> ParameterResult<EncryptionParameters> {
        let degree = self.poly_modulus_degree;
        if !degree.is_power_of_two()
            || !(POLY_MODULUS_DEGREE_MIN..=POLY_MODULUS_DEGREE_MAX).contains(&degree)
        {
            return Err(ParameterError::InvalidPolyModulusDegree { degree });
        }
        if self.coeff_modulus.is_empty() {
            return Err(ParameterError::EmptyCoeffModulus);
        }

        let sigma = self.noise_standard_deviation;
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(ParameterError::InvalidNoiseStandardDeviation { sigma });
        }
        let bound = self
            .noise_max_deviation
            .unwrap_or(DEFAULT_NOISE_MAX_DEVIATION_MULTIPLIER * sigma);
        if !bound.is_finite() || bound < 0.0 {
            return Err(ParameterError::InvalidNoiseMaxDeviation { bound });
        }

        let parms_id = compute_parms_id(degree, &self.coeff_modulus);
        Ok(EncryptionParameters {
            poly_modulus_degree: degree,
            coeff_modulus: self.coeff_modulus,
            noise_standard_deviation: sigma,
            noise_max_deviation: bound,
            random_generator: self
                .random_generator
                .unwrap_or_else(|| Arc::new(OsSeededFactory)),
            parms_id,
        })
    }
}

impl Default for EncryptionParametersBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_noise_defaults() {
        let parms = EncryptionParameters::builder()
            .poly_modulus_degree(1024)
            .coeff_modulus(vec![0x7e00001])
            .build()
            .unwrap();
        assert_eq!(parms.noise_standard_deviation(), 3.2);
        assert_eq!(parms.noise_max_deviation(), 19.2);
        assert_eq!(parms.poly_word_count(), 1024);
    }

    #[test]
    fn rejects_bad_degrees() {
        for degree in [0usize, 3, 1000, 65536] {
            let result = EncryptionParameters::builder()
                .poly_modulus_degree(degree)
                .coeff_modulus(vec![0x7e00001])
                .build();
            assert!(matches!(
                result,
                Err(ParameterError::InvalidPolyModulusDegree { .. })
            ));
        }
    }

    #[test]
    fn rejects_empty_modulus() {
        let result = EncryptionParameters::builder()
            .poly_modulus_degree(1024)
            .build();
        assert!(matches!(result, Err(ParameterError::EmptyCoeffModulus)));
    }

    #[test]
    fn rejects_degenerate_noise() {
        let result = EncryptionParameters::builder()
            .poly_modulus_degree(1024)
            .coeff_modulus(vec![0x7e00001])
            .noise_standard_deviation(0.0)
            .build();
        assert!(matches!(
            result,
            Err(ParameterError::InvalidNoiseStandardDeviation { .. })
        ));
    }

    #[test]
    fn parms_id_tracks_degree_and_modulus() {
        let a = EncryptionParameters::builder()
            .poly_modulus_degree(1024)
            .coeff_modulus(vec![0x7e00001])
            .build()
            .unwrap();
        let b = EncryptionParameters::builder()
            .poly_modulus_degree(2048)
            .coeff_modulus(vec![0x7e00001])
            .build()
            .unwrap();
        let c = EncryptionParameters::builder()
            .poly_modulus_degree(1024)
            .coeff_modulus(vec![0x7e00001])
            .build()
            .unwrap();
        assert_ne!(a.parms_id(), b.parms_id());
        assert_eq!(a.parms_id(), c.parms_id());
    }

    #[test]
    fn truncation_changes_the_tag() {
        let parms = EncryptionParameters::builder()
            .poly_modulus_degree(1024)
            .coeff_modulus(vec![0x7e00001, 0x3e00001])
            .build()
            .unwrap();
        let level = parms.truncated(1);
        assert_eq!(level.coeff_modulus(), &[0x7e00001]);
        assert_ne!(level.parms_id(), parms.parms_id());
    }
}
