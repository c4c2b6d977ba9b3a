//! Prime search for NTT-friendly coefficient modulus sets.
//!
//! An RNS stripe modulus must satisfy `q ≡ 1 (mod 2N)` so that a primitive
//! `2N`-th root of unity exists for the negacyclic transform. Moduli are
//! word-sized, so primality testing against a fixed witness set that decides
//! every 64-bit input is enough; nothing here is probabilistic.

use super::modular::{mod_pow, mul_mod};

/// Trial divisors that screen candidates before the witness loop and anchor
/// the tiny-input cases.
const SMALL_PRIMES: [u64; 6] = [2, 3, 5, 7, 11, 13];

/// Sinclair's base set: strong-probable-prime tests against these seven
/// witnesses decide primality for every `u64` once small factors have been
/// screened out.
const WITNESSES: [u64; 7] = [2, 325, 9375, 28178, 450775, 9780504, 1795265022];

/// Strong-probable-prime test of odd `n > 13` against one witness.
///
/// A witness that reduces to zero carries no information and passes.
fn strong_probable_prime(n: u64, witness: u64) -> bool {
    let base = witness % n;
    if base == 0 {
        return true;
    }

    let twos = (n - 1).trailing_zeros();
    let mut x = mod_pow(base, (n - 1) >> twos, n);
    if x == 1 || x == n - 1 {
        return true;
    }
    (1..twos).any(|_| {
        x = mul_mod(x, x, n);
        x == n - 1
    })
}

/// Exact primality for any `u64`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for p in SMALL_PRIMES {
        if n == p {
            return true;
        }
        if n.is_multiple_of(p) {
            return false;
        }
    }
    WITNESSES
        .into_iter()
        .all(|witness| strong_probable_prime(n, witness))
}

/// Returns `true` when `p` is prime and `p ≡ 1 (mod 2n)`.
#[inline]
pub fn is_ntt_friendly_prime(p: u64, n: u64) -> bool {
    is_prime(p) && p % (2 * n) == 1
}

/// Largest NTT-friendly prime strictly below `bound` for ring degree `n`,
/// or `None` when the search space is exhausted.
pub fn next_prime_down(bound: u64, n: u64) -> Option<u64> {
    if bound <= 2 || n == 0 {
        return None;
    }

    let step = 2 * n;
    // First candidate at or below bound - 1 that is ≡ 1 (mod 2n).
    let top = bound - 1;
    let mut candidate = top - (top - 1) % step;

    while candidate > 2 {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate = candidate.checked_sub(step)?;
    }
    None
}

/// Generate `count` distinct NTT-friendly primes of exactly `bit_size` bits
/// for ring degree `degree`, largest first.
///
/// ```
/// use rlwe_zero::math::{generate_primes, is_ntt_friendly_prime};
///
/// let primes = generate_primes(32, 3, 1024);
/// assert_eq!(primes.len(), 3);
/// for p in primes {
///     assert!(is_ntt_friendly_prime(p, 1024));
/// }
/// ```
///
/// # Panics
///
/// Panics when the bit range cannot supply `count` primes.
pub fn generate_primes(bit_size: usize, count: usize, degree: u64) -> Vec<u64> {
    assert!((4..=61).contains(&bit_size), "bit_size must be in 4..=61");
    assert!(count > 0, "prime count must be positive");
    assert!(degree > 0, "degree must be positive");

    let lower_bound = 1u64 << (bit_size - 1);
    let mut cursor = 1u64 << bit_size;
    let mut primes = Vec::with_capacity(count);

    while primes.len() < count {
        match next_prime_down(cursor, degree) {
            Some(p) if p >= lower_bound => {
                primes.push(p);
                cursor = p;
            }
            _ => panic!(
                "only {} NTT primes of {bit_size} bits exist for degree {degree}, \
                 {count} requested",
                primes.len()
            ),
        }
    }

    primes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn agrees_with_trial_division_on_a_range() {
        for n in 0..5000u64 {
            let by_trial =
                n > 1 && (2..n).take_while(|d| d * d <= n).all(|d| !n.is_multiple_of(d));
            assert_eq!(is_prime(n), by_trial, "mismatch at {n}");
        }
    }

    #[test]
    fn decides_word_sized_inputs() {
        // Mersenne primes at both ends of the supported modulus widths.
        assert!(is_prime(2_147_483_647));
        assert!(is_prime((1u64 << 61) - 1));
        assert!(!is_prime(1u64 << 61));
        assert!(!is_prime((1u64 << 61) + 1)); // divisible by 3
        assert!(is_prime(65537));
        assert!(!is_prime(65536));
    }

    #[test]
    fn ntt_friendly_condition() {
        assert!(is_ntt_friendly_prime(12289, 1024));
        assert!(is_ntt_friendly_prime(0x7e00001, 1024));
        assert!(!is_ntt_friendly_prime(2049, 1024));
        // prime, but 7681 ≡ 1 only up to 2N = 2^9
        assert!(is_ntt_friendly_prime(7681, 256));
        assert!(!is_ntt_friendly_prime(7681, 2048));
    }

    #[test]
    fn next_prime_down_descends_through_friendly_primes() {
        let first = next_prime_down(1 << 30, 1024).unwrap();
        let second = next_prime_down(first, 1024).unwrap();
        assert!(second < first);
        assert!(is_ntt_friendly_prime(first, 1024));
        assert!(is_ntt_friendly_prime(second, 1024));
    }

    #[test]
    fn next_prime_down_exhausts() {
        assert_eq!(next_prime_down(2, 1024), None);
        assert_eq!(next_prime_down(1, 1024), None);
    }

    #[test]
    fn generated_primes_are_distinct_and_in_range() {
        let primes = generate_primes(30, 4, 2048);
        assert_eq!(primes.len(), 4);
        for window in primes.windows(2) {
            assert!(window[0] > window[1]);
        }
        for &p in &primes {
            assert!(p >= 1 << 29 && p < 1 << 30);
            assert!(is_ntt_friendly_prime(p, 2048));
        }
    }

    #[test]
    #[should_panic(expected = "NTT primes")]
    fn generation_panics_when_range_too_small() {
        let _ = generate_primes(4, 10, 2);
    }

    proptest! {
        #[test]
        fn prime_down_always_friendly(bound in (1u64 << 20)..(1u64 << 40)) {
            if let Some(p) = next_prime_down(bound, 1024) {
                prop_assert!(p < bound);
                prop_assert!(is_ntt_friendly_prime(p, 1024));
            }
        }
    }
}
