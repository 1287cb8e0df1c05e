use crate::Roller;
use crate::events::EffectNote;
use crate::fighter::Fighter;

/// Potion payloads, dispatched exhaustively when the potion is drunk.
#[derive(Debug, Clone, PartialEq)]
pub enum PotionEffect {
    Heal { min: i32, max: i32 },
    Attack { percent: f64, turns: u32 },
    Evasion { percent: f64, turns: u32 },
    Endurance { ratio: f64, flat: u32 },
    Antidote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Potion {
    name: String,
    effect: PotionEffect,
}

impl Potion {
    pub fn healing(name: impl Into<String>, min: i32, max: i32) -> Self {
        Self {
            name: name.into(),
            effect: PotionEffect::Heal { min, max },
        }
    }

    pub fn attack_boost(name: impl Into<String>, percent: f64, turns: u32) -> Self {
        Self {
            name: name.into(),
            effect: PotionEffect::Attack { percent, turns },
        }
    }

    pub fn evasion_boost(name: impl Into<String>, percent: f64, turns: u32) -> Self {
        Self {
            name: name.into(),
            effect: PotionEffect::Evasion { percent, turns },
        }
    }

    pub fn endurance(name: impl Into<String>, ratio: f64, flat: u32) -> Self {
        Self {
            name: name.into(),
            effect: PotionEffect::Endurance { ratio, flat },
        }
    }

    pub fn antidote(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            effect: PotionEffect::Antidote,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effect(&self) -> &PotionEffect {
        &self.effect
    }

    fn apply(self, target: &mut Fighter, roller: &mut Roller) -> Vec<EffectNote> {
        match self.effect {
            PotionEffect::Heal { min, max } => {
                let min = min.max(1);
                let max = max.max(min);
                let healed = target.heal(f64::from(roller.uniform(min, max)));
                vec![EffectNote::Healed { amount: healed }]
            }
            PotionEffect::Attack { percent, turns } => {
                let percent = percent.max(0.0);
                let turns = turns.max(1);
                target.add_attack_bonus(percent, turns);
                vec![EffectNote::AttackBonus { percent, turns }]
            }
            PotionEffect::Evasion { percent, turns } => {
                let percent = percent.max(0.0);
                let turns = turns.max(1);
                target.add_dodge_bonus(percent, turns);
                vec![EffectNote::DodgeBonus { percent, turns }]
            }
            PotionEffect::Endurance { ratio, flat } => {
                let restored = target.restore_ammo(ratio, flat);
                if restored == 0 {
                    vec![EffectNote::NoAmmoToRestore]
                } else {
                    vec![EffectNote::AmmoRestored { amount: restored }]
                }
            }
            PotionEffect::Antidote => {
                if target.cleanse_poison() {
                    vec![EffectNote::PoisonCleansed]
                } else {
                    vec![EffectNote::NothingToCleanse]
                }
            }
        }
    }
}

/// Food always heals a fixed amount and may carry buffs on top.
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    name: String,
    heal: f64,
    attack_percent: f64,
    attack_turns: u32,
    movement_percent: f64,
    movement_turns: u32,
    dodge_percent: f64,
    dodge_turns: u32,
}

impl Food {
    pub fn plain(name: impl Into<String>, heal: f64) -> Self {
        Self {
            name: name.into(),
            heal,
            attack_percent: 0.0,
            attack_turns: 0,
            movement_percent: 0.0,
            movement_turns: 0,
            dodge_percent: 0.0,
            dodge_turns: 0,
        }
    }

    pub fn with_attack_bonus(mut self, percent: f64, turns: u32) -> Self {
        self.attack_percent = percent;
        self.attack_turns = turns;
        self
    }

    pub fn with_movement_bonus(mut self, percent: f64, turns: u32) -> Self {
        self.movement_percent = percent;
        self.movement_turns = turns;
        self
    }

    pub fn with_dodge_bonus(mut self, percent: f64, turns: u32) -> Self {
        self.dodge_percent = percent;
        self.dodge_turns = turns;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn boosts_attack(&self) -> bool {
        self.attack_percent > 0.0
    }

    pub fn boosts_dodge(&self) -> bool {
        self.dodge_percent > 0.0
    }

    fn apply(self, target: &mut Fighter) -> Vec<EffectNote> {
        let healed = target.heal(self.heal);
        let mut notes = vec![EffectNote::Healed { amount: healed }];
        if self.attack_percent > 0.0 && self.attack_turns > 0 {
            target.add_attack_bonus(self.attack_percent, self.attack_turns);
            notes.push(EffectNote::AttackBonus {
                percent: self.attack_percent,
                turns: self.attack_turns,
            });
        }
        if self.movement_percent > 0.0 && self.movement_turns > 0 {
            target.add_movement_bonus(self.movement_percent, self.movement_turns);
            notes.push(EffectNote::MovementBonus {
                percent: self.movement_percent,
                turns: self.movement_turns,
            });
        }
        if self.dodge_percent > 0.0 && self.dodge_turns > 0 {
            target.add_dodge_bonus(self.dodge_percent, self.dodge_turns);
            notes.push(EffectNote::DodgeBonus {
                percent: self.dodge_percent,
                turns: self.dodge_turns,
            });
        }
        notes
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Consumable {
    Potion(Potion),
    Food(Food),
}

impl Consumable {
    pub fn name(&self) -> &str {
        match self {
            Consumable::Potion(p) => p.name(),
            Consumable::Food(food) => food.name(),
        }
    }

    pub fn is_food(&self) -> bool {
        matches!(self, Consumable::Food(_))
    }

    pub fn is_healing_potion(&self) -> bool {
        matches!(
            self,
            Consumable::Potion(Potion {
                effect: PotionEffect::Heal { .. },
                ..
            })
        )
    }

    pub fn is_antidote(&self) -> bool {
        matches!(
            self,
            Consumable::Potion(Potion {
                effect: PotionEffect::Antidote,
                ..
            })
        )
    }

    pub fn is_ammo_restore(&self) -> bool {
        matches!(
            self,
            Consumable::Potion(Potion {
                effect: PotionEffect::Endurance { .. },
                ..
            })
        )
    }

    /// Attack potions, or any food carrying an attack bonus.
    pub fn boosts_attack(&self) -> bool {
        match self {
            Consumable::Potion(p) => matches!(p.effect(), PotionEffect::Attack { .. }),
            Consumable::Food(food) => food.boosts_attack(),
        }
    }

    /// Evasion potions, or any food carrying a dodge bonus.
    pub fn boosts_evasion(&self) -> bool {
        match self {
            Consumable::Potion(p) => matches!(p.effect(), PotionEffect::Evasion { .. }),
            Consumable::Food(food) => food.boosts_dodge(),
        }
    }

    pub fn apply(self, target: &mut Fighter, roller: &mut Roller) -> Vec<EffectNote> {
        match self {
            Consumable::Potion(potion) => potion.apply(target, roller),
            Consumable::Food(food) => food.apply(target),
        }
    }
}

impl From<Potion> for Consumable {
    fn from(potion: Potion) -> Self {
        Consumable::Potion(potion)
    }
}

impl From<Food> for Consumable {
    fn from(food: Food) -> Self {
        Consumable::Food(food)
    }
}
