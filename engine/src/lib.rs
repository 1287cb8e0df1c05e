use rand::{Rng as _, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod api;
pub mod combat;
pub mod consumable;
pub mod content;
pub mod equipment;
pub mod events;
pub mod fighter;
pub mod strategy;

pub use combat::{Combat, CombatError, DEFAULT_ROUND_CAP, Party};
pub use consumable::{Consumable, Food, Potion, PotionEffect};
pub use equipment::{Armor, Boots, Quiver, Shield, Weapon};
pub use events::{CombatEvent, EffectNote, Verdict};
pub use fighter::{AttackOutcome, Fighter, OutOfRangeReason, WeaponInfo, WeaponSlot};

/// Seeded uniform generator backing every random decision in a run.
///
/// One instance per battle, seeded once. All rolls (block, dodge, unarmed
/// damage, potion healing) draw from it in a fixed order, so a seed plus a
/// fighter configuration reproduces the exact event sequence.
pub struct Roller {
    rng: ChaCha8Rng,
}

impl Roller {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `min..=max`.
    pub fn uniform(&mut self, min: i32, max: i32) -> i32 {
        self.rng.gen_range(min..=max)
    }

    /// True with `chance`% probability. Values at or below 0 never pass,
    /// values at or above 100 always do.
    pub fn percent(&mut self, chance: i32) -> bool {
        self.uniform(1, 100) <= chance
    }
}

/// Install a plain `tracing` fmt subscriber. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_target(false).try_init();
}
