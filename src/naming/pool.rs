//! Offline name generation

use std::cell::RefCell;

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::error::NamingError;
use crate::naming::NameSource;

/// Draws "Given Family" names from built-in lists; never fails
pub struct NamePool {
    rng: RefCell<ChaCha8Rng>,
}

impl NamePool {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            rng: RefCell::new(rng),
        }
    }

    pub fn generate(&self) -> String {
        let mut rng = self.rng.borrow_mut();
        let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
        let family = FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())];
        format!("{} {}", given, family)
    }
}

#[async_trait(?Send)]
impl NameSource for NamePool {
    async fn fetch_name(&self) -> Result<String, NamingError> {
        Ok(self.generate())
    }
}

static GIVEN_NAMES: &[&str] = &[
    "Mochi", "Pip", "Biscuit", "Juniper", "Clover", "Maple", "Ziggy", "Nova", "Pebble", "Sprout",
    "Tofu", "Olive", "Basil", "Kiwi", "Pumpkin", "Comet",
];

static FAMILY_NAMES: &[&str] = &[
    "Whiskers", "Featherby", "Puddleton", "Snugglesworth", "Bramble", "Fizzwick", "Tumbleweed",
    "Marlow", "Quill", "Sparks",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_pools_agree() {
        let a = NamePool::new(Some(42));
        let b = NamePool::new(Some(42));
        for _ in 0..5 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn test_names_have_two_parts() {
        let pool = NamePool::new(None);
        for _ in 0..20 {
            let name = pool.generate();
            let parts: Vec<_> = name.split(' ').collect();
            assert_eq!(parts.len(), 2);
            assert!(GIVEN_NAMES.contains(&parts[0]));
            assert!(FAMILY_NAMES.contains(&parts[1]));
        }
    }

    #[tokio::test]
    async fn test_fetch_never_fails() {
        let pool = NamePool::new(Some(1));
        assert!(pool.fetch_name().await.is_ok());
    }
}
