//! Config-driven entry points: deserialize a scenario (JSON or YAML), build
//! the arena and run it, or fan one scenario out over many consecutive
//! seeds for a Monte Carlo summary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Roller;
use crate::combat::{Combat, DEFAULT_ROUND_CAP, Party};
use crate::consumable::{Consumable, Food, Potion};
use crate::content::builtin_scenarios;
use crate::equipment::{Armor, Boots, Quiver, Shield, Weapon};
use crate::events::{CombatEvent, Verdict};
use crate::fighter::Fighter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScenarioConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_round_cap")]
    pub round_cap: u32,
    pub parties: Vec<PartySpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartySpec {
    #[serde(default)]
    pub name: Option<String>,
    pub fighters: Vec<FighterSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FighterSpec {
    pub name: String,
    #[serde(default = "default_health")]
    pub health: f64,
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub weapon: Option<WeaponSpec>,
    #[serde(default)]
    pub secondary_weapon: Option<WeaponSpec>,
    #[serde(default)]
    pub shield: Option<ShieldSpec>,
    #[serde(default)]
    pub armor: Option<ArmorSpec>,
    #[serde(default)]
    pub boots: Option<BootsSpec>,
    #[serde(default)]
    pub poison: Option<PoisonSpec>,
    #[serde(default)]
    pub inventory: Vec<ConsumableSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WeaponSpec {
    pub name: String,
    pub damage: f64,
    #[serde(default = "default_range")]
    pub range: f64,
    #[serde(default = "default_true")]
    pub melee: bool,
    /// Finite arrow count for ranged weapons; omit for an infinite supply.
    #[serde(default)]
    pub ammo: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ShieldSpec {
    pub durability: i32,
    pub tier: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", untagged)]
pub enum ArmorSpec {
    Preset(ArmorPreset),
    Custom {
        name: String,
        durability: i32,
        reduction: f64,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorPreset {
    Light,
    Iron,
    Scale,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", untagged)]
pub enum BootsSpec {
    Preset(BootsPreset),
    Custom {
        name: String,
        #[serde(default)]
        movement: f64,
        #[serde(default)]
        resistance: f64,
        #[serde(default)]
        dodge: f64,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootsPreset {
    Running,
    Heavy,
    Silent,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PoisonSpec {
    pub damage: f64,
    pub turns: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BonusSpec {
    pub percent: f64,
    pub turns: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ConsumableSpec {
    HealingPotion {
        name: String,
        #[serde(default = "default_heal_min")]
        min: i32,
        #[serde(default = "default_heal_max")]
        max: i32,
    },
    AttackPotion {
        name: String,
        percent: f64,
        turns: u32,
    },
    EvasionPotion {
        name: String,
        percent: f64,
        turns: u32,
    },
    EndurancePotion {
        name: String,
        #[serde(default = "default_ammo_ratio")]
        ratio: f64,
        #[serde(default)]
        flat: u32,
    },
    Antidote {
        name: String,
    },
    Food {
        name: String,
        #[serde(default)]
        heal: f64,
        #[serde(default)]
        attack: Option<BonusSpec>,
        #[serde(default)]
        movement: Option<BonusSpec>,
        #[serde(default)]
        dodge: Option<BonusSpec>,
    },
}

/// Everything a presentation layer needs from one finished run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub seed: u64,
    pub teams: Vec<String>,
    pub verdict: Verdict,
    pub rounds: u32,
    pub events: Vec<CombatEvent>,
}

/// Aggregate over `run_trials`; team order follows the scenario file.
#[derive(Debug, Clone)]
pub struct TrialSummary {
    pub trials: u32,
    pub wins: IndexMap<String, u32>,
    pub draws: u32,
    pub stalemates: u32,
    pub total_rounds: u64,
}

impl TrialSummary {
    pub fn average_rounds(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.total_rounds as f64 / f64::from(self.trials)
        }
    }
}

pub fn parse_scenario(text: &str, format: ScenarioFormat) -> Result<ScenarioConfig> {
    let cfg = match format {
        ScenarioFormat::Json => {
            serde_json::from_str(text).context("failed to parse JSON scenario")?
        }
        ScenarioFormat::Yaml => {
            serde_yaml::from_str(text).context("failed to parse YAML scenario")?
        }
    };
    Ok(cfg)
}

/// Load a scenario file, picking the format from the extension
/// (`.yaml`/`.yml` vs everything else = JSON).
pub fn load_scenario(path: impl AsRef<Path>) -> Result<ScenarioConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario: {}", path.display()))?;
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => ScenarioFormat::Yaml,
        _ => ScenarioFormat::Json,
    };
    parse_scenario(&text, format)
        .with_context(|| format!("failed to parse scenario: {}", path.display()))
}

pub fn load_builtin(name: &str) -> Result<ScenarioConfig> {
    let Some(text) = builtin_scenarios().get(name).copied() else {
        bail!("unknown built-in scenario '{name}'");
    };
    parse_scenario(text, ScenarioFormat::Json)
}

pub fn run_scenario(cfg: &ScenarioConfig) -> Result<ScenarioReport> {
    run_scenario_seeded(cfg, cfg.seed)
}

pub fn run_scenario_seeded(cfg: &ScenarioConfig, seed: u64) -> Result<ScenarioReport> {
    let parties = build_parties(cfg);
    let mut combat =
        Combat::new(parties, Roller::from_seed(seed))?.with_round_cap(cfg.round_cap);
    let verdict = combat.start();
    Ok(ScenarioReport {
        seed,
        teams: combat.team_labels().to_vec(),
        verdict,
        rounds: combat.rounds(),
        events: combat.events().to_vec(),
    })
}

/// Run the scenario `trials` times with seeds `seed`, `seed + 1`, ... and
/// tally the verdicts per team.
pub fn run_trials(cfg: &ScenarioConfig, trials: u32) -> Result<TrialSummary> {
    let mut wins: IndexMap<String, u32> = IndexMap::new();
    let mut draws = 0;
    let mut stalemates = 0;
    let mut total_rounds = 0u64;

    for trial in 0..trials {
        let report = run_scenario_seeded(cfg, cfg.seed.wrapping_add(u64::from(trial)))?;
        if wins.is_empty() {
            for team in &report.teams {
                wins.insert(team.clone(), 0);
            }
        }
        total_rounds += u64::from(report.rounds);
        match report.verdict {
            Verdict::Victory { team, .. } => *wins.entry(team).or_insert(0) += 1,
            Verdict::Draw => draws += 1,
            Verdict::Stalemate { .. } => stalemates += 1,
        }
    }

    Ok(TrialSummary {
        trials,
        wins,
        draws,
        stalemates,
        total_rounds,
    })
}

fn build_parties(cfg: &ScenarioConfig) -> Vec<Party> {
    cfg.parties
        .iter()
        .map(|party| {
            let fighters = party.fighters.iter().map(build_fighter).collect();
            match &party.name {
                Some(name) => Party::named(name.clone(), fighters),
                None => Party::group(fighters),
            }
        })
        .collect()
}

fn build_fighter(spec: &FighterSpec) -> Fighter {
    let mut fighter = Fighter::new(spec.name.clone(), spec.health).at(spec.position);
    if let Some(weapon) = &spec.weapon {
        fighter = fighter.with_primary(build_weapon(weapon));
    }
    if let Some(weapon) = &spec.secondary_weapon {
        fighter = fighter.with_secondary(build_weapon(weapon));
    }
    if let Some(shield) = &spec.shield {
        fighter = fighter.with_shield(Shield::new(shield.durability, shield.tier));
    }
    if let Some(armor) = &spec.armor {
        fighter = fighter.with_armor(build_armor(armor));
    }
    if let Some(boots) = &spec.boots {
        fighter = fighter.with_boots(build_boots(boots));
    }
    for item in &spec.inventory {
        fighter = fighter.carrying(build_consumable(item));
    }
    let mut fighter = fighter;
    if let Some(poison) = &spec.poison {
        fighter.apply_poison(poison.damage, poison.turns);
    }
    fighter
}

fn build_weapon(spec: &WeaponSpec) -> Weapon {
    if spec.melee {
        Weapon::melee(spec.name.clone(), spec.damage, spec.range)
    } else {
        let quiver = spec.ammo.map_or_else(Quiver::infinite, Quiver::new);
        Weapon::ranged(spec.name.clone(), spec.damage, spec.range, quiver)
    }
}

fn build_armor(spec: &ArmorSpec) -> Armor {
    match spec {
        ArmorSpec::Preset(ArmorPreset::Light) => Armor::light(),
        ArmorSpec::Preset(ArmorPreset::Iron) => Armor::iron(),
        ArmorSpec::Preset(ArmorPreset::Scale) => Armor::scale(),
        ArmorSpec::Custom {
            name,
            durability,
            reduction,
        } => Armor::new(name.clone(), *durability, *reduction),
    }
}

fn build_boots(spec: &BootsSpec) -> Boots {
    match spec {
        BootsSpec::Preset(BootsPreset::Running) => Boots::running(),
        BootsSpec::Preset(BootsPreset::Heavy) => Boots::heavy(),
        BootsSpec::Preset(BootsPreset::Silent) => Boots::silent(),
        BootsSpec::Custom {
            name,
            movement,
            resistance,
            dodge,
        } => Boots::new(name.clone(), *movement, *resistance, *dodge),
    }
}

fn build_consumable(spec: &ConsumableSpec) -> Consumable {
    match spec {
        ConsumableSpec::HealingPotion { name, min, max } => {
            Potion::healing(name.clone(), *min, *max).into()
        }
        ConsumableSpec::AttackPotion {
            name,
            percent,
            turns,
        } => Potion::attack_boost(name.clone(), *percent, *turns).into(),
        ConsumableSpec::EvasionPotion {
            name,
            percent,
            turns,
        } => Potion::evasion_boost(name.clone(), *percent, *turns).into(),
        ConsumableSpec::EndurancePotion { name, ratio, flat } => {
            Potion::endurance(name.clone(), *ratio, *flat).into()
        }
        ConsumableSpec::Antidote { name } => Potion::antidote(name.clone()).into(),
        ConsumableSpec::Food {
            name,
            heal,
            attack,
            movement,
            dodge,
        } => {
            let mut food = Food::plain(name.clone(), *heal);
            if let Some(bonus) = attack {
                food = food.with_attack_bonus(bonus.percent, bonus.turns);
            }
            if let Some(bonus) = movement {
                food = food.with_movement_bonus(bonus.percent, bonus.turns);
            }
            if let Some(bonus) = dodge {
                food = food.with_dodge_bonus(bonus.percent, bonus.turns);
            }
            food.into()
        }
    }
}

fn default_round_cap() -> u32 {
    DEFAULT_ROUND_CAP
}

fn default_health() -> f64 {
    100.0
}

fn default_range() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_heal_min() -> i32 {
    20
}

fn default_heal_max() -> i32 {
    60
}

fn default_ammo_ratio() -> f64 {
    0.5
}
