use thiserror::Error;
use tracing::debug;

use crate::Roller;
use crate::events::{CombatEvent, Verdict};
use crate::fighter::{AttackOutcome, Fighter};
use crate::strategy;

/// Safety valve against stalemates (eternal dodging, fighters that cannot
/// close the distance). Reaching it resolves the battle as a stalemate.
pub const DEFAULT_ROUND_CAP: u32 = 1000;

/// A set of fighters that never target each other. A bare fighter converts
/// into an unnamed singleton party.
#[derive(Debug, Clone)]
pub struct Party {
    name: Option<String>,
    fighters: Vec<Fighter>,
}

impl Party {
    pub fn solo(fighter: Fighter) -> Self {
        Self {
            name: None,
            fighters: vec![fighter],
        }
    }

    pub fn group(fighters: Vec<Fighter>) -> Self {
        Self {
            name: None,
            fighters,
        }
    }

    pub fn named(name: impl Into<String>, fighters: Vec<Fighter>) -> Self {
        Self {
            name: Some(name.into()),
            fighters,
        }
    }
}

impl From<Fighter> for Party {
    fn from(fighter: Fighter) -> Self {
        Party::solo(fighter)
    }
}

#[derive(Debug, Error)]
pub enum CombatError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: &'static str },
}

/// Round orchestrator. Owns the fighters (dense arena indexed by handle,
/// with a parallel handle-to-team mapping), the RNG and the event log.
pub struct Combat {
    fighters: Vec<Fighter>,
    teams: Vec<usize>,
    team_labels: Vec<String>,
    roller: Roller,
    round: u32,
    round_cap: u32,
    events: Vec<CombatEvent>,
}

impl Combat {
    /// Flatten `parties` into the arena, assigning dense 0-based team ids in
    /// input order. At least two fighters on at least two teams are
    /// required.
    pub fn new(parties: Vec<Party>, roller: Roller) -> Result<Self, CombatError> {
        let mut fighters = Vec::new();
        let mut teams = Vec::new();
        let mut team_labels = Vec::new();

        for (team_id, party) in parties.into_iter().enumerate() {
            if party.fighters.is_empty() {
                return Err(CombatError::InvalidConfiguration {
                    reason: "a party must contain at least one fighter",
                });
            }
            let label = match (&party.name, party.fighters.as_slice()) {
                (Some(name), _) => name.clone(),
                (None, [only]) => only.name().to_string(),
                (None, _) => format!("team {}", team_id + 1),
            };
            team_labels.push(label);
            for fighter in party.fighters {
                teams.push(team_id);
                fighters.push(fighter);
            }
        }

        if fighters.len() < 2 {
            return Err(CombatError::InvalidConfiguration {
                reason: "at least two fighters are required",
            });
        }
        if team_labels.len() < 2 {
            return Err(CombatError::InvalidConfiguration {
                reason: "at least two opposing teams are required",
            });
        }

        Ok(Self {
            fighters,
            teams,
            team_labels,
            roller,
            round: 0,
            round_cap: DEFAULT_ROUND_CAP,
            events: Vec::new(),
        })
    }

    pub fn with_round_cap(mut self, cap: u32) -> Self {
        self.round_cap = cap;
        self
    }

    pub fn fighters(&self) -> &[Fighter] {
        &self.fighters
    }

    pub fn team_labels(&self) -> &[String] {
        &self.team_labels
    }

    pub fn rounds(&self) -> u32 {
        self.round
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Run rounds until one team is left standing, everyone is down, or the
    /// round cap trips. Each round walks the fighters alive at its start;
    /// dead fighters stay in the arena as non-targets.
    pub fn start(&mut self) -> Verdict {
        while self.alive_team_count() > 1 {
            if self.round >= self.round_cap {
                let verdict = Verdict::Stalemate { rounds: self.round };
                self.events.push(CombatEvent::Resolved {
                    verdict: verdict.clone(),
                });
                return verdict;
            }
            self.round += 1;
            debug!(round = self.round, "round begins");
            self.events.push(CombatEvent::RoundStarted { round: self.round });

            let snapshot: Vec<usize> = (0..self.fighters.len())
                .filter(|&i| self.fighters[i].is_alive())
                .collect();
            for index in snapshot {
                if !self.fighters[index].is_alive() {
                    continue;
                }
                if !self.take_turn(index) {
                    break;
                }
                if self.alive_team_count() <= 1 {
                    break;
                }
            }
        }

        let verdict = self.final_verdict();
        self.events.push(CombatEvent::Resolved {
            verdict: verdict.clone(),
        });
        verdict
    }

    /// Returns false when no target exists anywhere, which ends the round
    /// walk early.
    fn take_turn(&mut self, index: usize) -> bool {
        let used = {
            let Self {
                fighters, roller, ..
            } = self;
            strategy::evaluate_and_use(&mut fighters[index], roller)
        };
        if let Some(used) = used {
            let actor = self.fighters[index].name().to_string();
            self.events.push(CombatEvent::ConsumableUsed {
                actor,
                item: used.item,
                notes: used.notes,
            });
        }

        if let Some(tick) = self.fighters[index].begin_turn() {
            let actor = self.fighters[index].name().to_string();
            self.events.push(CombatEvent::PoisonTick {
                actor: actor.clone(),
                damage: tick.damage,
                turns_left: tick.turns_left,
            });
            if tick.expired {
                self.events.push(CombatEvent::PoisonEnded {
                    actor: actor.clone(),
                });
            }
            if !self.fighters[index].is_alive() {
                let remaining = self.alive_count();
                self.events.push(CombatEvent::Eliminated {
                    fighter: actor,
                    remaining,
                });
                return true;
            }
        }

        let Some(target_index) = self.closest_enemy(index) else {
            return false;
        };
        self.resolve_attack(index, target_index);
        true
    }

    fn resolve_attack(&mut self, index: usize, target_index: usize) {
        let mut target_down = false;
        {
            let Self {
                fighters,
                roller,
                events,
                ..
            } = self;
            let (attacker, target) = pair_mut(fighters, index, target_index);
            let actor = attacker.name().to_string();
            let target_name = target.name().to_string();

            match attacker.attack(target, roller) {
                AttackOutcome::OutOfRange {
                    reason,
                    distance,
                    weapon,
                    should_move,
                } => {
                    events.push(CombatEvent::OutOfRange {
                        actor: actor.clone(),
                        target: target_name.clone(),
                        reason,
                        distance,
                        weapon,
                        moved: should_move,
                    });
                    if should_move {
                        attacker.move_towards(target);
                        events.push(CombatEvent::Moved {
                            actor,
                            target: target_name,
                            before: distance,
                            after: attacker.distance_to(target),
                        });
                    }
                }
                AttackOutcome::NoAmmo {
                    weapon,
                    ammo_remaining,
                } => {
                    events.push(CombatEvent::NoAmmo {
                        actor,
                        target: target_name,
                        weapon,
                        ammo_remaining,
                    });
                }
                AttackOutcome::Blocked {
                    weapon,
                    shield_durability,
                } => {
                    events.push(CombatEvent::Blocked {
                        actor,
                        target: target_name,
                        weapon,
                        shield_durability,
                    });
                }
                AttackOutcome::Dodged { weapon } => {
                    events.push(CombatEvent::Dodged {
                        actor,
                        target: target_name,
                        weapon,
                    });
                }
                AttackOutcome::Damage {
                    weapon,
                    damage,
                    armor_absorbed,
                    boots_resisted,
                    ammo_remaining,
                } => {
                    target_down = !target.is_alive();
                    events.push(CombatEvent::Damage {
                        actor,
                        target: target_name,
                        weapon,
                        amount: damage,
                        armor_absorbed,
                        boots_resisted,
                        target_health: target.health(),
                        ammo_remaining,
                    });
                }
            }
        }

        if target_down {
            let remaining = self.alive_count();
            self.events.push(CombatEvent::Eliminated {
                fighter: self.fighters[target_index].name().to_string(),
                remaining,
            });
        }
    }

    /// Closest living fighter on another team; the first strictly smaller
    /// distance wins ties.
    fn closest_enemy(&self, index: usize) -> Option<usize> {
        let me = &self.fighters[index];
        let my_team = self.teams[index];
        let mut best: Option<(usize, f64)> = None;
        for (other_index, other) in self.fighters.iter().enumerate() {
            if other_index == index || !other.is_alive() || self.teams[other_index] == my_team {
                continue;
            }
            let distance = me.distance_to(other);
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((other_index, distance));
            }
        }
        best.map(|(other_index, _)| other_index)
    }

    fn alive_count(&self) -> usize {
        self.fighters.iter().filter(|f| f.is_alive()).count()
    }

    fn alive_team_count(&self) -> usize {
        self.alive_team_flags().iter().filter(|&&alive| alive).count()
    }

    fn alive_team_flags(&self) -> Vec<bool> {
        let mut alive = vec![false; self.team_labels.len()];
        for (fighter, &team) in self.fighters.iter().zip(&self.teams) {
            if fighter.is_alive() {
                alive[team] = true;
            }
        }
        alive
    }

    fn final_verdict(&self) -> Verdict {
        let flags = self.alive_team_flags();
        let standing: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter_map(|(team, &alive)| alive.then_some(team))
            .collect();
        match standing.as_slice() {
            [team] => Verdict::Victory {
                team: self.team_labels[*team].clone(),
                survivors: self
                    .fighters
                    .iter()
                    .zip(&self.teams)
                    .filter(|(fighter, t)| fighter.is_alive() && **t == *team)
                    .map(|(fighter, _)| fighter.name().to_string())
                    .collect(),
            },
            _ => Verdict::Draw,
        }
    }
}

fn pair_mut(fighters: &mut [Fighter], a: usize, b: usize) -> (&mut Fighter, &mut Fighter) {
    if a < b {
        let (left, right) = fighters.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = fighters.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
