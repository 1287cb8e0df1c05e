use std::fmt;

use serde::Serialize;

use crate::fighter::{OutOfRangeReason, WeaponInfo};

/// One structured effect produced by using a consumable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum EffectNote {
    Healed { amount: f64 },
    AttackBonus { percent: f64, turns: u32 },
    MovementBonus { percent: f64, turns: u32 },
    DodgeBonus { percent: f64, turns: u32 },
    AmmoRestored { amount: u32 },
    NoAmmoToRestore,
    PoisonCleansed,
    NothingToCleanse,
}

impl fmt::Display for EffectNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectNote::Healed { amount } => write!(f, "healed {amount:.1} HP"),
            EffectNote::AttackBonus { percent, turns } => {
                write!(f, "+{:.0}% attack for {turns} turns", percent * 100.0)
            }
            EffectNote::MovementBonus { percent, turns } => {
                write!(f, "+{:.0}% speed for {turns} turns", percent * 100.0)
            }
            EffectNote::DodgeBonus { percent, turns } => {
                write!(f, "+{:.0}% dodge for {turns} turns", percent * 100.0)
            }
            EffectNote::AmmoRestored { amount } => write!(f, "restored {amount} ammo"),
            EffectNote::NoAmmoToRestore => write!(f, "no ammo to restore"),
            EffectNote::PoisonCleansed => write!(f, "poison cleansed"),
            EffectNote::NothingToCleanse => write!(f, "no poison to cleanse"),
        }
    }
}

/// How a finished battle ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    Victory { team: String, survivors: Vec<String> },
    Draw,
    Stalemate { rounds: u32 },
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Victory { team, survivors } => {
                write!(f, "{team} wins (survivors: {})", survivors.join(", "))
            }
            Verdict::Draw => write!(f, "draw"),
            Verdict::Stalemate { rounds } => write!(f, "stalemate after {rounds} rounds"),
        }
    }
}

/// One observable occurrence in a battle, in emission order. The `Display`
/// impl renders the log line the CLI prints; the structured payload is what
/// downstream consumers should rely on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CombatEvent {
    RoundStarted {
        round: u32,
    },
    ConsumableUsed {
        actor: String,
        item: String,
        notes: Vec<EffectNote>,
    },
    PoisonTick {
        actor: String,
        damage: f64,
        turns_left: u32,
    },
    PoisonEnded {
        actor: String,
    },
    OutOfRange {
        actor: String,
        target: String,
        reason: OutOfRangeReason,
        distance: f64,
        weapon: Option<WeaponInfo>,
        moved: bool,
    },
    Moved {
        actor: String,
        target: String,
        before: f64,
        after: f64,
    },
    NoAmmo {
        actor: String,
        target: String,
        weapon: WeaponInfo,
        ammo_remaining: Option<u32>,
    },
    Blocked {
        actor: String,
        target: String,
        weapon: WeaponInfo,
        shield_durability: i32,
    },
    Dodged {
        actor: String,
        target: String,
        weapon: WeaponInfo,
    },
    Damage {
        actor: String,
        target: String,
        weapon: WeaponInfo,
        amount: f64,
        armor_absorbed: f64,
        boots_resisted: f64,
        target_health: f64,
        ammo_remaining: Option<u32>,
    },
    Eliminated {
        fighter: String,
        remaining: usize,
    },
    Resolved {
        verdict: Verdict,
    },
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::RoundStarted { round } => write!(f, "[ROUND] {round}"),
            CombatEvent::ConsumableUsed { actor, item, notes } => {
                write!(f, "[ITEM][{actor}] uses {item}")?;
                if !notes.is_empty() {
                    let joined = notes
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, " ({joined})")?;
                }
                Ok(())
            }
            CombatEvent::PoisonTick {
                actor,
                damage,
                turns_left,
            } => write!(
                f,
                "[POISON][{actor}] takes {damage:.1} damage ({turns_left} turns left)"
            ),
            CombatEvent::PoisonEnded { actor } => write!(f, "[POISON][{actor}] wears off"),
            CombatEvent::OutOfRange {
                actor,
                target,
                reason,
                distance,
                weapon,
                moved,
            } => {
                let label = weapon.as_ref().map_or("fists", WeaponInfo::label);
                match (reason, moved) {
                    (OutOfRangeReason::Distance, _) => write!(
                        f,
                        "[RANGE][{actor}] cannot reach {target} (distance {distance:.1})"
                    ),
                    (OutOfRangeReason::NoAmmo, true) => write!(
                        f,
                        "[RANGE][{actor}] {label} is empty, closing on {target} (distance {distance:.1})"
                    ),
                    (OutOfRangeReason::NoAmmo, false) => write!(
                        f,
                        "[RANGE][{actor}] {label} is empty, holding position (distance {distance:.1})"
                    ),
                }
            }
            CombatEvent::Moved {
                actor,
                target,
                before,
                after,
            } => write!(
                f,
                "[MOVE][{actor}] closes on {target} ({before:.1} -> {after:.1})"
            ),
            CombatEvent::NoAmmo { actor, weapon, .. } => {
                let label = weapon.label();
                write!(f, "[AMMO][{actor}] {label} is out of ammo")
            }
            CombatEvent::Blocked {
                actor,
                target,
                weapon,
                shield_durability,
            } => {
                let label = weapon.label();
                write!(
                    f,
                    "[BLOCK][{target}] blocks {actor}'s {label} (shield at {shield_durability})"
                )
            }
            CombatEvent::Dodged {
                actor,
                target,
                weapon,
            } => {
                let label = weapon.label();
                write!(f, "[DODGE][{target}] evades {actor}'s {label}")
            }
            CombatEvent::Damage {
                actor,
                target,
                weapon,
                amount,
                target_health,
                ..
            } => {
                let label = weapon.label();
                let shown = target_health.max(0.0);
                write!(
                    f,
                    "[HIT][{actor}] {label} hits {target} for {amount:.1} -> {shown:.1} HP"
                )
            }
            CombatEvent::Eliminated { fighter, remaining } => {
                write!(f, "[DOWN][{fighter}] is eliminated ({remaining} left)")
            }
            CombatEvent::Resolved { verdict } => write!(f, "[END] {verdict}"),
        }
    }
}
