//! Engine defaults applied when a rule document or simulation config omits a value.

/// Faces on the movement die when `components.dice` is absent.
pub const DEFAULT_DIE_FACES: u8 = 6;
/// Tile every player starts on.
pub const DEFAULT_START_TILE: u16 = 1;
/// Own-turn card plays allowed per card phase.
pub const DEFAULT_CARDS_PER_TURN: u8 = 1;
/// Player turns after which a session is declared aborted.
pub const DEFAULT_MAX_TURNS: u32 = 500;
/// Seed used by the runner when none is given.
pub const DEFAULT_SEED: u64 = 1337;
/// Default batch size.
pub const DEFAULT_GAMES: usize = 100;

/// Deficit (in tiles, or points on threshold games) a winner must have
/// recovered from for the game to count as a comeback.
pub const COMEBACK_DEFICIT: u32 = 5;
/// Width of a bucket in the turn-count histogram.
pub const TURN_HISTOGRAM_BUCKET: u32 = 10;
