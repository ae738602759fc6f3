//! Alphanumeric random strings for nonces and throwaway identifiers.
//!
//! Not suitable for secrets: the default generator is the thread-local one
//! and callers may pass any `Rng`, seeded or not.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// A string of `len` characters drawn uniformly from `[0-9a-zA-Z]`.
pub fn random_string(len: usize) -> String {
    random_string_with(&mut rand::thread_rng(), len)
}

/// Like [`random_string`], drawing from the given generator.
pub fn random_string_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn has_requested_length() {
        for len in [1, 7, 32, 500] {
            assert_eq!(random_string(len).chars().count(), len);
        }
    }

    #[test]
    fn zero_length_is_empty() {
        assert_eq!(random_string(0), "");
    }

    #[test]
    fn only_alphanumeric() {
        let s = random_string(2_000);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()), "{s}");
    }

    #[test]
    fn seeded_generator_is_reproducible() {
        let a = random_string_with(&mut StdRng::seed_from_u64(7), 24);
        let b = random_string_with(&mut StdRng::seed_from_u64(7), 24);
        assert_eq!(a, b);
    }

    #[test]
    fn consecutive_calls_differ() {
        assert_ne!(random_string(32), random_string(32));
    }
}
