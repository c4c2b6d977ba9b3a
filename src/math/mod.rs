pub mod modular;
pub mod primes;

pub use modular::{
    add_mod, crt_center_coeff, mod_inverse, mod_pow, mul_mod, neg_mod, sub_mod,
};
pub use primes::{
    generate_primes, is_ntt_friendly_prime, is_prime, next_prime_down,
};
