//! Validated parameter context.
//!
//! `Context::new` checks the number-theoretic requirements on the modulus
//! chain, precomputes one NTT table per stripe, and derives the chain of
//! parameter levels obtained by dropping moduli from the end. Lookups by
//! `ParmsId` hand out shared `ContextData` so keys, ciphertexts, and
//! encryptors all agree on the tables they use.

use std::collections::HashMap;
use std::sync::Arc;

use crate::math::primes::is_prime;
use crate::params::{
    COEFF_MODULUS_BIT_MAX, EncryptionParameters, ParameterError, ParameterResult,
    ParmsId,
};
use crate::rings::NttTable;

/// Everything precomputed for one chain level.
#[derive(Debug)]
pub struct ContextData {
    parms: EncryptionParameters,
    ntt_tables: Vec<Arc<NttTable>>,
}

impl ContextData {
    pub fn parms(&self) -> &EncryptionParameters {
        &self.parms
    }

    pub fn parms_id(&self) -> ParmsId {
        self.parms.parms_id()
    }

    /// One table per RNS stripe, in modulus order.
    pub fn ntt_tables(&self) -> &[Arc<NttTable>] {
        &self.ntt_tables
    }
}

#[derive(Debug)]
pub struct Context {
    data: HashMap<ParmsId, Arc<ContextData>>,
    key_parms_id: ParmsId,
    last_parms_id: ParmsId,
}

impl Context {
    pub fn new(parms: EncryptionParameters) -> ParameterResult<Self> {
        let degree = parms.poly_modulus_degree();
        let moduli = parms.coeff_modulus();

        for (index, &modulus) in moduli.iter().enumerate() {
            if modulus >> COEFF_MODULUS_BIT_MAX != 0 {
                return Err(ParameterError::ModulusTooWide { modulus });
            }
            if !is_prime(modulus) {
                return Err(ParameterError::ModulusNotPrime { modulus });
            }
            if moduli[..index].contains(&modulus) {
                return Err(ParameterError::DuplicateModulus { modulus });
            }
        }

        // NTT friendliness (q ≡ 1 mod 2N) is verified by table construction.
        let tables: Vec<Arc<NttTable>> = moduli
            .iter()
            .map(|&q| NttTable::new(degree, q).map(Arc::new))
            .collect::<Result<_, _>>()?;

        let key_parms_id = parms.parms_id();
        let mut data = HashMap::new();
        let mut last_parms_id = key_parms_id;
        for len in (1..=moduli.len()).rev() {
            let level_parms = if len == moduli.len() {
                parms.clone()
            } else {
                parms.truncated(len)
            };
            last_parms_id = level_parms.parms_id();
            data.insert(
                last_parms_id,
                Arc::new(ContextData {
                    parms: level_parms,
                    ntt_tables: tables[..len].to_vec(),
                }),
            );
        }

        Ok(Self {
            data,
            key_parms_id,
            last_parms_id,
        })
    }

    pub fn get_context_data(&self, parms_id: ParmsId) -> Option<Arc<ContextData>> {
        self.data.get(&parms_id).cloned()
    }

    /// The level holding the full coefficient modulus; keys live here.
    pub fn key_context_data(&self) -> Arc<ContextData> {
        self.data[&self.key_parms_id].clone()
    }

    pub fn key_parms_id(&self) -> ParmsId {
        self.key_parms_id
    }

    /// The single-modulus level at the bottom of the chain.
    pub fn last_parms_id(&self) -> ParmsId {
        self.last_parms_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::generate_primes;

    fn two_level_parms() -> EncryptionParameters {
        let primes = generate_primes(30, 2, 2048);
        EncryptionParameters::builder()
            .poly_modulus_degree(2048)
            .coeff_modulus(primes)
            .build()
            .unwrap()
    }

    #[test]
    fn builds_one_level_per_prefix() {
        let parms = two_level_parms();
        let full_id = parms.parms_id();
        let context = Context::new(parms).unwrap();

        assert_eq!(context.key_parms_id(), full_id);
        assert_ne!(context.last_parms_id(), full_id);

        let key_data = context.key_context_data();
        assert_eq!(key_data.ntt_tables().len(), 2);

        let last = context.get_context_data(context.last_parms_id()).unwrap();
        assert_eq!(last.ntt_tables().len(), 1);
        assert_eq!(
            last.parms().coeff_modulus(),
            &key_data.parms().coeff_modulus()[..1]
        );
    }

    #[test]
    fn levels_share_tables() {
        let context = Context::new(two_level_parms()).unwrap();
        let key = context.key_context_data();
        let last = context.get_context_data(context.last_parms_id()).unwrap();
        assert!(Arc::ptr_eq(&key.ntt_tables()[0], &last.ntt_tables()[0]));
    }

    #[test]
    fn rejects_composite_modulus() {
        let parms = EncryptionParameters::builder()
            .poly_modulus_degree(1024)
            .coeff_modulus(vec![0x7e00001, 0x3e00001]) // second entry is 3 * 21670571
            .build()
            .unwrap();
        assert!(matches!(
            Context::new(parms),
            Err(ParameterError::ModulusNotPrime { modulus: 0x3e00001 })
        ));
    }

    #[test]
    fn rejects_duplicate_modulus() {
        let parms = EncryptionParameters::builder()
            .poly_modulus_degree(1024)
            .coeff_modulus(vec![0x7e00001, 0x7e00001])
            .build()
            .unwrap();
        assert!(matches!(
            Context::new(parms),
            Err(ParameterError::DuplicateModulus { .. })
        ));
    }

    #[test]
    fn rejects_wide_modulus() {
        let parms = EncryptionParameters::builder()
            .poly_modulus_degree(1024)
            .coeff_modulus(vec![1u64 << 62])
            .build()
            .unwrap();
        assert!(matches!(
            Context::new(parms),
            Err(ParameterError::ModulusTooWide { .. })
        ));
    }

    #[test]
    fn rejects_ntt_unfriendly_modulus() {
        // 13 is prime but 13 mod 2048 != 1.
        let parms = EncryptionParameters::builder()
            .poly_modulus_degree(1024)
            .coeff_modulus(vec![13])
            .build()
            .unwrap();
        assert!(matches!(Context::new(parms), Err(ParameterError::Ntt(_))));
    }
}
