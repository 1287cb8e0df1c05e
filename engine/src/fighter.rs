use serde::Serialize;

use crate::Roller;
use crate::consumable::Consumable;
use crate::equipment::{Armor, Boots, Shield, Weapon};
use crate::events::EffectNote;

/// Reach of a bare-handed strike.
const BASE_RANGE: f64 = 1.0;
const DEFAULT_STEP: f64 = 1.0;
const UNARMED_DAMAGE_MIN: i32 = 1;
const UNARMED_DAMAGE_MAX: i32 = 5;
const BASE_DODGE_CHANCE: f64 = 5.0;
const MAX_DODGE_CHANCE: i32 = 95;

/// Temporary percent modifier. Magnitude accumulates across applications,
/// duration takes the longest; both reset to zero when the last turn is
/// spent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Buff {
    pub percent: f64,
    pub turns: u32,
}

impl Buff {
    pub fn is_active(&self) -> bool {
        self.turns > 0
    }

    fn add(&mut self, percent: f64, turns: u32) {
        self.percent += percent.max(0.0);
        self.turns = self.turns.max(turns);
    }

    fn tick(&mut self) {
        if self.turns > 0 {
            self.turns -= 1;
            if self.turns == 0 {
                self.percent = 0.0;
            }
        }
    }
}

/// Damage-over-time with a turn countdown. Does not stack: a new
/// application overwrites the old one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poison {
    pub damage_per_turn: f64,
    pub turns_left: u32,
}

/// One poison tick taken at the start of a turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoisonTick {
    pub damage: f64,
    pub turns_left: u32,
    pub expired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponSlot {
    Primary,
    Secondary,
    Unarmed,
}

/// Which weapon an outcome refers to. `name` is absent for bare fists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponInfo {
    pub name: Option<String>,
    pub slot: WeaponSlot,
}

impl WeaponInfo {
    pub fn unarmed() -> Self {
        Self {
            name: None,
            slot: WeaponSlot::Unarmed,
        }
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("fists")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangeReason {
    Distance,
    NoAmmo,
}

/// Every way an attack can resolve. None of these are errors; callers must
/// handle all of them.
#[derive(Debug, Clone, PartialEq)]
pub enum AttackOutcome {
    OutOfRange {
        reason: OutOfRangeReason,
        distance: f64,
        weapon: Option<WeaponInfo>,
        should_move: bool,
    },
    NoAmmo {
        weapon: WeaponInfo,
        ammo_remaining: Option<u32>,
    },
    Blocked {
        weapon: WeaponInfo,
        shield_durability: i32,
    },
    Dodged {
        weapon: WeaponInfo,
    },
    Damage {
        weapon: WeaponInfo,
        damage: f64,
        armor_absorbed: f64,
        boots_resisted: f64,
        ammo_remaining: Option<u32>,
    },
}

/// Result of spending an inventory item.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumableUse {
    pub item: String,
    pub notes: Vec<EffectNote>,
}

/// The mutable combat entity: position on the line, equipment, buffs,
/// poison state and inventory.
#[derive(Debug, Clone)]
pub struct Fighter {
    name: String,
    health: f64,
    max_health: f64,
    position: f64,
    primary: Option<Weapon>,
    secondary: Option<Weapon>,
    shield: Option<Shield>,
    armor: Option<Armor>,
    boots: Option<Boots>,
    inventory: Vec<Consumable>,
    attack_buff: Buff,
    dodge_buff: Buff,
    movement_buff: Buff,
    poison: Option<Poison>,
}

impl Fighter {
    pub fn new(name: impl Into<String>, health: f64) -> Self {
        Self {
            name: name.into(),
            health,
            max_health: health,
            position: 0.0,
            primary: None,
            secondary: None,
            shield: None,
            armor: None,
            boots: None,
            inventory: Vec::new(),
            attack_buff: Buff::default(),
            dodge_buff: Buff::default(),
            movement_buff: Buff::default(),
            poison: None,
        }
    }

    pub fn at(mut self, position: f64) -> Self {
        self.position = position;
        self
    }

    pub fn with_primary(mut self, weapon: Weapon) -> Self {
        self.primary = Some(weapon);
        self
    }

    pub fn with_secondary(mut self, weapon: Weapon) -> Self {
        self.secondary = Some(weapon);
        self
    }

    pub fn with_shield(mut self, shield: Shield) -> Self {
        self.shield = Some(shield);
        self
    }

    pub fn with_armor(mut self, armor: Armor) -> Self {
        self.armor = Some(armor);
        self
    }

    pub fn with_boots(mut self, boots: Boots) -> Self {
        self.boots = Some(boots);
        self
    }

    pub fn carrying(mut self, item: impl Into<Consumable>) -> Self {
        self.inventory.push(item.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn primary(&self) -> Option<&Weapon> {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> Option<&Weapon> {
        self.secondary.as_ref()
    }

    pub fn shield(&self) -> Option<&Shield> {
        self.shield.as_ref()
    }

    pub fn armor(&self) -> Option<&Armor> {
        self.armor.as_ref()
    }

    pub fn boots(&self) -> Option<&Boots> {
        self.boots.as_ref()
    }

    pub fn inventory(&self) -> &[Consumable] {
        &self.inventory
    }

    pub fn attack_buff(&self) -> Buff {
        self.attack_buff
    }

    pub fn dodge_buff(&self) -> Buff {
        self.dodge_buff
    }

    pub fn movement_buff(&self) -> Buff {
        self.movement_buff
    }

    pub fn has_attack_buff(&self) -> bool {
        self.attack_buff.is_active()
    }

    pub fn has_dodge_buff(&self) -> bool {
        self.dodge_buff.is_active()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poison.is_some()
    }

    pub fn poison(&self) -> Option<Poison> {
        self.poison
    }

    pub fn distance_to(&self, other: &Fighter) -> f64 {
        (self.position - other.position).abs()
    }

    /// Step towards `target` by one base step scaled by the movement buff
    /// (spending one of its turns) and the boots modifier. The multiplier is
    /// not clamped at zero, so extreme penalties can reverse the step.
    /// Returns the signed distance walked.
    pub fn move_towards(&mut self, target: &Fighter) -> f64 {
        self.move_towards_by(target, DEFAULT_STEP)
    }

    pub fn move_towards_by(&mut self, target: &Fighter, step: f64) -> f64 {
        let distance = self.distance_to(target);
        if distance == 0.0 {
            return 0.0;
        }
        let direction = if self.position < target.position {
            1.0
        } else {
            -1.0
        };
        let mut multiplier = 1.0;
        if self.movement_buff.is_active() {
            multiplier += self.movement_buff.percent;
            self.movement_buff.tick();
        }
        if let Some(boots) = &self.boots {
            multiplier += boots.movement();
        }
        let movement = (step * multiplier).min(distance);
        self.position += direction * movement;
        movement
    }

    /// Start-of-turn upkeep: take the poison tick if poisoned. Must run
    /// before the fighter acts; the tick can kill.
    pub fn begin_turn(&mut self) -> Option<PoisonTick> {
        let poison = self.poison.as_mut()?;
        let damage = poison.damage_per_turn;
        self.health -= damage;
        poison.turns_left = poison.turns_left.saturating_sub(1);
        let turns_left = poison.turns_left;
        let expired = turns_left == 0;
        if expired {
            self.poison = None;
        }
        Some(PoisonTick {
            damage,
            turns_left,
            expired,
        })
    }

    /// Healing is uncapped; `max_health` only records the starting value.
    /// Returns the amount actually applied.
    pub fn heal(&mut self, amount: f64) -> f64 {
        let amount = amount.max(0.0);
        self.health += amount;
        amount
    }

    pub fn add_attack_bonus(&mut self, percent: f64, turns: u32) {
        self.attack_buff.add(percent, turns);
    }

    pub fn add_dodge_bonus(&mut self, percent: f64, turns: u32) {
        self.dodge_buff.add(percent, turns);
    }

    pub fn add_movement_bonus(&mut self, percent: f64, turns: u32) {
        self.movement_buff.add(percent, turns);
    }

    pub fn apply_poison(&mut self, damage_per_turn: f64, turns: u32) {
        self.poison = Some(Poison {
            damage_per_turn,
            turns_left: turns,
        });
    }

    /// Returns true when there was poison to remove.
    pub fn cleanse_poison(&mut self) -> bool {
        self.poison.take().is_some()
    }

    /// Finite arrows across both weapon slots. Infinite quivers never count.
    pub fn total_ammo(&self) -> u32 {
        self.primary
            .iter()
            .chain(self.secondary.iter())
            .filter_map(Weapon::remaining_ammo)
            .sum()
    }

    /// Refill every finite quiver; returns the total arrows added.
    pub fn restore_ammo(&mut self, ratio: f64, flat: u32) -> u32 {
        self.primary
            .iter_mut()
            .chain(self.secondary.iter_mut())
            .map(|w| w.restore_ammo(ratio, flat))
            .sum()
    }

    /// Spend and apply the inventory item at `index` (insertion order is
    /// preserved). An invalid index is a no-op, not an error.
    pub fn use_consumable(&mut self, index: usize, roller: &mut Roller) -> Option<ConsumableUse> {
        if index >= self.inventory.len() {
            return None;
        }
        let item = self.inventory.remove(index);
        let name = item.name().to_string();
        let notes = item.apply(self, roller);
        Some(ConsumableUse { item: name, notes })
    }

    /// Resolve one attack against `target`. Weapon choice walks primary then
    /// secondary (never re-ranked by damage); mitigation runs shield, dodge,
    /// armor, boots in that order and short-circuits.
    pub fn attack(&mut self, target: &mut Fighter, roller: &mut Roller) -> AttackOutcome {
        let distance = self.distance_to(target);
        let armed = self.pick_weapon(distance, true);
        let fallback = self.pick_weapon(distance, false);

        if armed.is_none() && distance > BASE_RANGE {
            return match fallback {
                Some(slot) => {
                    // A ranged weapon that covers the distance but is dry:
                    // stepping closer would not help, so hold position.
                    let holds = self
                        .weapon_at(slot)
                        .is_some_and(|w| !w.is_melee() && w.range() >= distance);
                    AttackOutcome::OutOfRange {
                        reason: OutOfRangeReason::NoAmmo,
                        distance,
                        weapon: Some(self.weapon_info(slot)),
                        should_move: !holds,
                    }
                }
                None => AttackOutcome::OutOfRange {
                    reason: OutOfRangeReason::Distance,
                    distance,
                    weapon: None,
                    should_move: true,
                },
            };
        }

        if armed.is_none() {
            if let Some(slot) = fallback {
                return AttackOutcome::NoAmmo {
                    weapon: self.weapon_info(slot),
                    ammo_remaining: self.ammo_in(slot),
                };
            }
        }

        let (info, mut damage, ammo_remaining) = match armed {
            Some(slot) => {
                let info = self.weapon_info(slot);
                let base = self.weapon_at(slot).map_or(0.0, Weapon::damage);
                if !self.consume_ammo_in(slot) {
                    return AttackOutcome::NoAmmo {
                        weapon: info,
                        ammo_remaining: self.ammo_in(slot),
                    };
                }
                (info, base, self.ammo_in(slot))
            }
            None => (
                WeaponInfo::unarmed(),
                f64::from(roller.uniform(UNARMED_DAMAGE_MIN, UNARMED_DAMAGE_MAX)),
                None,
            ),
        };

        if self.attack_buff.is_active() {
            damage *= 1.0 + self.attack_buff.percent;
        }

        if let Some(shield) = target.shield.as_mut() {
            if !shield.is_broken() && roller.percent(shield.block_chance()) {
                shield.absorb(damage);
                self.attack_buff.tick();
                return AttackOutcome::Blocked {
                    weapon: info,
                    shield_durability: shield.durability(),
                };
            }
        }

        // The dodge buff spends a turn whenever its roll happens, made or
        // missed.
        let mut dodge_chance = BASE_DODGE_CHANCE;
        let buff_was_active = target.dodge_buff.is_active();
        if buff_was_active {
            dodge_chance += target.dodge_buff.percent * 100.0;
        }
        if let Some(boots) = &target.boots {
            dodge_chance += boots.dodge() * 100.0;
        }
        let dodged = roller.percent((dodge_chance.round() as i32).clamp(0, MAX_DODGE_CHANCE));
        if buff_was_active {
            target.dodge_buff.tick();
        }
        if dodged {
            self.attack_buff.tick();
            return AttackOutcome::Dodged { weapon: info };
        }

        let armor_absorbed = target.armor.as_mut().map_or(0.0, |a| a.absorb(damage));
        damage -= armor_absorbed;

        let boots_resisted = target
            .boots
            .as_ref()
            .map_or(0.0, |b| damage * b.resistance());
        damage -= boots_resisted;

        target.health -= damage;
        self.attack_buff.tick();

        AttackOutcome::Damage {
            weapon: info,
            damage,
            armor_absorbed,
            boots_resisted,
            ammo_remaining,
        }
    }

    /// First equipped weapon, primary before secondary, whose range covers
    /// `distance` (and which has ammo when required).
    fn pick_weapon(&self, distance: f64, require_ammo: bool) -> Option<WeaponSlot> {
        let candidates = [
            (WeaponSlot::Primary, self.primary.as_ref()),
            (WeaponSlot::Secondary, self.secondary.as_ref()),
        ];
        for (slot, weapon) in candidates {
            if let Some(w) = weapon {
                if w.range() >= distance && (!require_ammo || w.has_ammo()) {
                    return Some(slot);
                }
            }
        }
        None
    }

    fn weapon_at(&self, slot: WeaponSlot) -> Option<&Weapon> {
        match slot {
            WeaponSlot::Primary => self.primary.as_ref(),
            WeaponSlot::Secondary => self.secondary.as_ref(),
            WeaponSlot::Unarmed => None,
        }
    }

    fn weapon_info(&self, slot: WeaponSlot) -> WeaponInfo {
        WeaponInfo {
            name: self.weapon_at(slot).map(|w| w.name().to_string()),
            slot,
        }
    }

    fn ammo_in(&self, slot: WeaponSlot) -> Option<u32> {
        self.weapon_at(slot).and_then(Weapon::remaining_ammo)
    }

    fn consume_ammo_in(&mut self, slot: WeaponSlot) -> bool {
        match slot {
            WeaponSlot::Primary => self.primary.as_mut().is_some_and(Weapon::consume_ammo),
            WeaponSlot::Secondary => self.secondary.as_mut().is_some_and(Weapon::consume_ammo),
            WeaponSlot::Unarmed => true,
        }
    }
}
