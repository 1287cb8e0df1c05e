//! Rule-based consumable usage, evaluated once per fighter turn before the
//! poison tick. At most one item is spent; the first matching rule wins and
//! ties inside a rule keep the earliest inventory slot.

use tracing::trace;

use crate::Roller;
use crate::consumable::Consumable;
use crate::fighter::{ConsumableUse, Fighter};

const CRITICAL_HEALTH: f64 = 30.0;
const LOW_HEALTH: f64 = 50.0;
const LOW_AMMO: u32 = 3;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Urgency {
    Critical,
    Moderate,
}

/// Decide whether `fighter` should spend an inventory item this turn, and
/// spend it. Rules, in priority order: critical healing, antidote, ammo
/// refill, moderate healing, then attack/evasion buffs while healthy.
pub fn evaluate_and_use(fighter: &mut Fighter, roller: &mut Roller) -> Option<ConsumableUse> {
    if fighter.inventory().is_empty() {
        return None;
    }

    if fighter.health() <= CRITICAL_HEALTH {
        if let Some(index) = best_healing_item(fighter.inventory(), Urgency::Critical) {
            trace!(fighter = %fighter.name(), rule = "critical_heal", "consumable rule fired");
            return fighter.use_consumable(index, roller);
        }
    }

    if fighter.is_poisoned() {
        if let Some(index) = position(fighter.inventory(), Consumable::is_antidote) {
            trace!(fighter = %fighter.name(), rule = "antidote", "consumable rule fired");
            return fighter.use_consumable(index, roller);
        }
    }

    if fighter.total_ammo() <= LOW_AMMO {
        if let Some(index) = position(fighter.inventory(), Consumable::is_ammo_restore) {
            trace!(fighter = %fighter.name(), rule = "ammo", "consumable rule fired");
            return fighter.use_consumable(index, roller);
        }
    }

    if fighter.health() <= LOW_HEALTH {
        if let Some(index) = best_healing_item(fighter.inventory(), Urgency::Moderate) {
            trace!(fighter = %fighter.name(), rule = "moderate_heal", "consumable rule fired");
            return fighter.use_consumable(index, roller);
        }
    }

    if fighter.health() > LOW_HEALTH {
        if !fighter.has_attack_buff() {
            if let Some(index) = position(fighter.inventory(), Consumable::boosts_attack) {
                trace!(fighter = %fighter.name(), rule = "attack_buff", "consumable rule fired");
                return fighter.use_consumable(index, roller);
            }
        }
        if !fighter.has_dodge_buff() {
            if let Some(index) = position(fighter.inventory(), Consumable::boosts_evasion) {
                trace!(fighter = %fighter.name(), rule = "dodge_buff", "consumable rule fired");
                return fighter.use_consumable(index, roller);
            }
        }
    }

    None
}

fn position(items: &[Consumable], pred: impl Fn(&Consumable) -> bool) -> Option<usize> {
    items.iter().position(pred)
}

/// Healing potions beat food in an emergency; food wins once there is time
/// to chew. Only strictly higher priority displaces an earlier candidate.
fn best_healing_item(items: &[Consumable], urgency: Urgency) -> Option<usize> {
    let mut best = None;
    let mut best_priority = 0;
    for (index, item) in items.iter().enumerate() {
        let priority = match urgency {
            Urgency::Critical if item.is_healing_potion() => 100,
            Urgency::Critical if item.is_food() => 40,
            Urgency::Moderate if item.is_healing_potion() => 50,
            Urgency::Moderate if item.is_food() => 60,
            _ => 0,
        };
        if priority > best_priority {
            best_priority = priority;
            best = Some(index);
        }
    }
    best
}
