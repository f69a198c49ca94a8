//! Deterministic random streams for a game session.
//!
//! Every session derives independent streams from a single seed with
//! HMAC-SHA256 domain tags, so adding draws to one concern (say, a new deck
//! shuffle) never shifts the dice sequence of another.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::Sha256;

/// Deterministic bundle of RNG streams segregated by concern.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    dice: CountingRng<ChaCha8Rng>,
    deck: CountingRng<ChaCha8Rng>,
}

impl RngBundle {
    /// Construct the bundle from a session seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            dice: CountingRng::new(derive_stream_seed(seed, b"dice")),
            deck: CountingRng::new(derive_stream_seed(seed, b"deck")),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Movement rolls and auxiliary dice.
    pub fn dice(&mut self) -> &mut CountingRng<ChaCha8Rng> {
        &mut self.dice
    }

    /// Draw calls made against the dice stream so far.
    #[must_use]
    pub const fn dice_draws(&self) -> u64 {
        self.dice.draws
    }

    /// Shuffles and reshuffles.
    pub fn deck(&mut self) -> &mut CountingRng<ChaCha8Rng> {
        &mut self.deck
    }

    /// Seed handed to the agent in `seat`.
    #[must_use]
    pub fn agent_seed(&self, seat: usize) -> u64 {
        derive_stream_seed(self.seed, format!("agent:{seat}").as_bytes())
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha8Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Derive a sub-seed for `domain_tag` from `user_seed`.
///
/// Used for per-stream seeds inside a session and for per-game seeds inside
/// a batch (`game:<index>`).
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
