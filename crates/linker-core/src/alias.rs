use crate::model::Alias;
use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of aliases produced by [`RandomAliasGenerator`].
pub const GENERATED_ALIAS_LENGTH: usize = 10;

/// Trait for generating aliases when the caller omits one.
///
/// Implementations are pure generators that don't interact with storage.
/// A generated alias that collides with an existing one is reported as
/// `AliasAlreadyExists`; callers never retry.
pub trait AliasGenerator: Send + Sync + 'static {
    fn generate(&self) -> Alias;
}

/// Generates aliases of [`GENERATED_ALIAS_LENGTH`] characters drawn
/// uniformly from `[A-Za-z0-9]`.
///
/// Uses the thread-local generator, which is seeded from the OS. Aliases
/// are not security tokens, so no cryptographic guarantees are needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAliasGenerator;

impl RandomAliasGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl AliasGenerator for RandomAliasGenerator {
    fn generate(&self) -> Alias {
        let alias: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(GENERATED_ALIAS_LENGTH)
            .map(char::from)
            .collect();
        Alias::new_unchecked(alias)
    }
}
