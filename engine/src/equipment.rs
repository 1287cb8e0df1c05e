/// Arrow counter for a ranged weapon. `arrows == None` means an infinite
/// supply that is never decremented and never counted in ammo totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quiver {
    arrows: Option<u32>,
    capacity: Option<u32>,
}

impl Quiver {
    pub fn new(arrows: u32) -> Self {
        Self {
            arrows: Some(arrows),
            capacity: Some(arrows),
        }
    }

    pub fn infinite() -> Self {
        Self {
            arrows: None,
            capacity: None,
        }
    }

    pub fn arrows(&self) -> Option<u32> {
        self.arrows
    }

    pub fn has_arrows(&self) -> bool {
        self.arrows.is_none_or(|a| a > 0)
    }

    pub fn consume(&mut self) -> bool {
        match &mut self.arrows {
            None => true,
            Some(0) => false,
            Some(a) => {
                *a -= 1;
                true
            }
        }
    }

    /// Refill `capacity * ratio + flat` arrows, never past capacity.
    /// Returns the number actually added; infinite quivers restore nothing.
    pub fn restore(&mut self, ratio: f64, flat: u32) -> u32 {
        let (Some(arrows), Some(capacity)) = (self.arrows, self.capacity) else {
            return 0;
        };
        let refill = (f64::from(capacity) * ratio.max(0.0)).round() as u32;
        let next = arrows.saturating_add(refill).saturating_add(flat).min(capacity);
        self.arrows = Some(next);
        next - arrows
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    name: String,
    damage: f64,
    range: f64,
    melee: bool,
    quiver: Option<Quiver>,
}

impl Weapon {
    pub fn melee(name: impl Into<String>, damage: f64, range: f64) -> Self {
        Self {
            name: name.into(),
            damage,
            range,
            melee: true,
            quiver: None,
        }
    }

    pub fn ranged(name: impl Into<String>, damage: f64, range: f64, quiver: Quiver) -> Self {
        Self {
            name: name.into(),
            damage,
            range,
            melee: false,
            quiver: Some(quiver),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn damage(&self) -> f64 {
        self.damage
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn is_melee(&self) -> bool {
        self.melee
    }

    /// Melee weapons always have ammo; a missing or infinite quiver counts
    /// as an endless supply.
    pub fn has_ammo(&self) -> bool {
        self.quiver.as_ref().is_none_or(Quiver::has_arrows)
    }

    pub fn consume_ammo(&mut self) -> bool {
        match &mut self.quiver {
            None => true,
            Some(quiver) => quiver.consume(),
        }
    }

    /// `None` for an infinite supply.
    pub fn remaining_ammo(&self) -> Option<u32> {
        self.quiver.as_ref().and_then(Quiver::arrows)
    }

    pub fn restore_ammo(&mut self, ratio: f64, flat: u32) -> u32 {
        self.quiver.as_mut().map_or(0, |q| q.restore(ratio, flat))
    }
}

/// Chance-based full negation. Block probability is `20% * tier`, capped at
/// 100; a successful block soaks the whole hit into durability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shield {
    durability: i32,
    tier: u32,
}

impl Shield {
    pub fn new(durability: i32, tier: u32) -> Self {
        Self { durability, tier }
    }

    pub fn durability(&self) -> i32 {
        self.durability
    }

    pub fn tier(&self) -> u32 {
        self.tier
    }

    pub fn is_broken(&self) -> bool {
        self.durability <= 0
    }

    pub fn block_chance(&self) -> i32 {
        (20 * self.tier as i32).clamp(0, 100)
    }

    /// Soak a blocked hit. Returns false when the shield was already broken.
    pub fn absorb(&mut self, damage: f64) -> bool {
        if self.is_broken() {
            return false;
        }
        self.durability = (self.durability - damage.round() as i32).max(0);
        true
    }
}

/// Partial reduction that wears out: each absorption costs `ceil(absorbed)`
/// durability, and a broken armor passes everything through.
#[derive(Debug, Clone, PartialEq)]
pub struct Armor {
    name: String,
    durability: i32,
    reduction: f64,
}

impl Armor {
    pub fn new(name: impl Into<String>, durability: i32, reduction: f64) -> Self {
        Self {
            name: name.into(),
            durability,
            reduction,
        }
    }

    pub fn light() -> Self {
        Self::new("light armor", 40, 0.10)
    }

    pub fn iron() -> Self {
        Self::new("iron armor", 80, 0.25)
    }

    pub fn scale() -> Self {
        Self::new("scale armor", 120, 0.40)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn durability(&self) -> i32 {
        self.durability
    }

    pub fn reduction(&self) -> f64 {
        self.reduction
    }

    pub fn is_broken(&self) -> bool {
        self.durability <= 0
    }

    /// Returns the amount soaked out of `damage` (zero when broken).
    pub fn absorb(&mut self, damage: f64) -> f64 {
        if self.is_broken() {
            return 0.0;
        }
        let absorbed = damage * self.reduction;
        self.durability = (self.durability - absorbed.ceil() as i32).max(0);
        absorbed
    }
}

/// Permanent footwear modifiers; no durability. `movement` may be negative
/// (heavy boots slow the wearer down).
#[derive(Debug, Clone, PartialEq)]
pub struct Boots {
    name: String,
    movement: f64,
    resistance: f64,
    dodge: f64,
}

impl Boots {
    pub fn new(name: impl Into<String>, movement: f64, resistance: f64, dodge: f64) -> Self {
        Self {
            name: name.into(),
            movement,
            resistance,
            dodge,
        }
    }

    pub fn running() -> Self {
        Self::new("running boots", 0.50, 0.0, 0.0)
    }

    pub fn heavy() -> Self {
        Self::new("heavy boots", -0.20, 0.10, 0.0)
    }

    pub fn silent() -> Self {
        Self::new("silent boots", 0.0, 0.0, 0.20)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn movement(&self) -> f64 {
        self.movement
    }

    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    pub fn dodge(&self) -> f64 {
        self.dodge
    }
}
