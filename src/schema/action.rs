//! Skill effect descriptors as they arrive from master-data deserialization.
//!
//! Every effect kind is one variant of [`ActionDescriptor`] carrying only the
//! fields that kind reads. Composite kinds (`Sequential`, `Conditional`,
//! `RandomSkill`, `EvolvingChain`) nest further descriptors.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::IntoStaticStr;
use thiserror::Error;

use super::board::{GridOccupancy, LineChange};
use super::condition::{ChainMode, Guard};

/// Orb / monster attribute id (0 = fire … 9 = bomb).
pub type AttributeId = u32;
/// Monster type id.
pub type TypeId = u32;
/// Awoken-skill id, resolved later through a placeholder token.
pub type AwakeningId = u32;
/// Monster id used by transform effects.
pub type MonsterId = u32;

#[derive(Debug, Error)]
pub enum DescriptorLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// One orb-spawn instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbSpawn {
    pub amount: u32,
    pub orbs: Vec<AttributeId>,
    #[serde(default)]
    pub excluding_orbs: Vec<AttributeId>,
}

/// A part of a sequential skill, optionally pre-counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub action: ActionDescriptor,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

impl Part {
    pub fn once(action: ActionDescriptor) -> Self {
        Self { action, repeat: 1 }
    }
}

impl From<ActionDescriptor> for Part {
    fn from(action: ActionDescriptor) -> Self {
        Self::once(action)
    }
}

/// A single skill effect or a composition of effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ActionDescriptor {
    AttrNuke {
        mass_attack: bool,
        multiplier: f64,
        attribute: AttributeId,
    },
    FixedAttrNuke {
        mass_attack: bool,
        damage: u64,
        attribute: AttributeId,
    },
    SelfAttNuke {
        mass_attack: bool,
        multiplier: f64,
    },
    Shield {
        duration: u32,
        shield: f64,
    },
    ElementalShield {
        duration: u32,
        attribute: AttributeId,
        shield: f64,
    },
    DrainAttack {
        mass_attack: bool,
        atk_multiplier: f64,
        recover_multiplier: f64,
    },
    Poison {
        multiplier: f64,
    },
    /// Orbs can be moved freely for `seconds`.
    TimeStop {
        seconds: u32,
    },
    Gravity {
        percentage_hp: f64,
    },
    Heal {
        #[serde(default)]
        hp: u64,
        #[serde(default)]
        rcv_multiplier_as_hp: f64,
        #[serde(default)]
        percentage_max_hp: f64,
        #[serde(default)]
        team_rcv_multiplier_as_hp: f64,
        #[serde(default)]
        card_bind: u32,
        #[serde(default)]
        awoken_bind: u32,
    },
    Delay {
        turns: u32,
    },
    DefenseReduction {
        duration: u32,
        shield: f64,
    },
    DoubleOrbChange {
        from_attr: Vec<AttributeId>,
        to_attr: Vec<AttributeId>,
    },
    DamageToAttEnemy {
        enemy_attribute: AttributeId,
        attack_attribute: AttributeId,
        damage: u64,
    },
    RcvBoost {
        duration: u32,
        multiplier: f64,
    },
    AttributeAttackBoost {
        duration: u32,
        #[serde(default)]
        attributes: Vec<AttributeId>,
        #[serde(default)]
        types: Vec<TypeId>,
        multiplier: f64,
        #[serde(default)]
        rcv_boost: bool,
    },
    MassAttack {
        duration: u32,
    },
    EnhanceOrbs {
        orbs: Vec<AttributeId>,
    },
    LockOrbs {
        orbs: Vec<AttributeId>,
        count: u32,
    },
    Laser {
        mass_attack: bool,
        damage: u64,
    },
    NoSkyfall {
        duration: u32,
    },
    EnhanceSkyfall {
        duration: u32,
        percentage_increase: f64,
    },
    AutoHeal {
        duration: u32,
        #[serde(default)]
        percentage_max_hp: f64,
        #[serde(default)]
        card_bind: u32,
        #[serde(default)]
        awoken_bind: u32,
    },
    AbsorbMechanicVoid {
        duration: u32,
        #[serde(default)]
        attribute_absorb: bool,
        #[serde(default)]
        damage_absorb: bool,
    },
    VoidMechanic {
        duration: u32,
    },
    TrueGravity {
        percentage_max_hp: f64,
    },
    ExtraCombo {
        duration: u32,
        combos: u32,
    },
    AwakeningHeal {
        awakenings: Vec<AwakeningId>,
        amount_per: f64,
    },
    AwakeningAttackBoost {
        duration: u32,
        awakenings: Vec<AwakeningId>,
        amount_per: f64,
    },
    AwakeningShield {
        duration: u32,
        awakenings: Vec<AwakeningId>,
        amount_per: f64,
    },
    AwakeningStatBoost {
        duration: u32,
        awakenings: Vec<AwakeningId>,
        #[serde(default)]
        atk_per: f64,
        #[serde(default)]
        rcv_per: f64,
    },
    ChangeEnemiesAttribute {
        #[serde(default)]
        turns: Option<u32>,
        attribute: AttributeId,
    },
    Haste {
        turns: u32,
        max_turns: u32,
    },
    HpBoost {
        duration: u32,
        hp: f64,
    },
    RandomOrbChange {
        from_attr: Vec<AttributeId>,
        to_attr: Vec<AttributeId>,
    },
    AttackAttrXTeamAtk {
        mass_attack: bool,
        team_attributes: Vec<AttributeId>,
        multiplier: f64,
        attack_attribute: AttributeId,
    },
    SpawnOrb {
        amount: u32,
        orbs: Vec<AttributeId>,
        #[serde(default)]
        excluding_orbs: Vec<AttributeId>,
    },
    DoubleSpawnOrb {
        first: OrbSpawn,
        second: OrbSpawn,
    },
    /// Exactly one of `multiplier` / `seconds` may be non-zero.
    MoveTimeBuff {
        duration: u32,
        #[serde(default)]
        multiplier: f64,
        #[serde(default)]
        seconds: f64,
    },
    RowChange {
        rows: Vec<LineChange>,
    },
    ColumnChange {
        columns: Vec<LineChange>,
    },
    ChangeSkyfall {
        duration: u32,
        #[serde(default)]
        max_duration: Option<u32>,
        orbs: Vec<AttributeId>,
        percentage: f64,
    },
    NoOrbSkyfall {
        duration: u32,
        orbs: Vec<AttributeId>,
    },
    RandomNuke {
        mass_attack: bool,
        attribute: AttributeId,
        minimum_multiplier: f64,
        maximum_multiplier: f64,
    },
    Counterattack {
        duration: u32,
        multiplier: f64,
        attribute: AttributeId,
    },
    BoardChange {
        to_attr: Vec<AttributeId>,
    },
    SuicideRandomNuke {
        hp_remaining: f64,
        mass_attack: bool,
        attribute: AttributeId,
        minimum_multiplier: f64,
        maximum_multiplier: f64,
    },
    SuicideNuke {
        hp_remaining: f64,
        mass_attack: bool,
        attribute: AttributeId,
        damage: u64,
    },
    Suicide {
        hp_remaining: f64,
    },
    TypeAttackBoost {
        duration: u32,
        types: Vec<TypeId>,
        multiplier: f64,
    },
    GrudgeStrike {
        mass_attack: bool,
        attribute: AttributeId,
        low_multiplier: f64,
        high_multiplier: f64,
    },
    DrainAttrAttack {
        mass_attack: bool,
        attribute: AttributeId,
        atk_multiplier: f64,
        recover_multiplier: f64,
    },
    AttributeChange {
        duration: u32,
        attribute: AttributeId,
    },
    MultiHitLaser {
        mass_attack: bool,
        damage: u64,
    },
    HpNuke {
        mass_attack: bool,
        multiplier: f64,
        attribute: AttributeId,
    },
    /// Spawns one orb of `attribute` at each named board shape.
    FixedPositionSpawn {
        attribute: AttributeId,
        positions: GridOccupancy,
    },
    MatchDisableRecovery {
        duration: u32,
    },
    BoardRefresh,
    LeaderSwap,
    UnlockAllOrbs,
    UnlockBoardPath,
    RandomSkill {
        choices: Vec<ActionDescriptor>,
    },
    ChangeMonster {
        transform_ids: Vec<MonsterId>,
    },
    RandomChangeMonster {
        transform_ids: Vec<MonsterId>,
    },
    SkyfallLock {
        duration: u32,
        #[serde(default)]
        orbs: Vec<AttributeId>,
    },
    SpawnSpinner {
        turns: u32,
        speed: f64,
        #[serde(default)]
        random_count: u32,
        #[serde(default = "GridOccupancy::empty")]
        positions: GridOccupancy,
    },
    AllyActiveDisable {
        turns: u32,
    },
    AllyActiveDelay {
        turns: u32,
    },
    CreateUnmatchable {
        duration: u32,
        orbs: Vec<AttributeId>,
    },
    Conditional {
        guard: Guard,
        #[serde(default)]
        body: Option<Box<ActionDescriptor>>,
    },
    NailOrbSkyfall {
        duration: u32,
        chance: f64,
    },
    LeaderSwapSub {
        sub_slot: u32,
    },
    CompositionBuff {
        duration: u32,
        #[serde(default)]
        attributes: Vec<AttributeId>,
        #[serde(default)]
        types: Vec<TypeId>,
        atk_boost: f64,
        rcv_boost: f64,
    },
    /// `target` is the game's team-slot bitmask (1 self, 2 leader, 4 helper,
    /// 8 subs, 15 everyone).
    TeamTargetStatChange {
        duration: u32,
        target: u32,
        atk_mult: f64,
    },
    EvolvingChain {
        mode: ChainMode,
        stages: Vec<ActionDescriptor>,
    },
    Sequential {
        parts: Vec<Part>,
    },
    Cloud {
        duration: u32,
        width: u32,
        height: u32,
        #[serde(default)]
        origin_x: Option<u32>,
        #[serde(default)]
        origin_y: Option<u32>,
    },
    /// `damage_cap` is expressed in units of 100 million.
    DamageCapBoost {
        duration: u32,
        damage_cap: u32,
    },
    InflictEs {
        selector_type: u32,
        #[serde(default)]
        players: Vec<u32>,
    },
    OrbSeal {
        duration: u32,
        column: u32,
    },
    Tape,
    #[strum(serialize = "change_to_7x6_board")]
    ChangeTo7x6Board {
        duration: u32,
    },
    /// A raw skill type the upstream deserializer had no variant for.
    Unrecognized {
        skill_type: u32,
    },
}

impl ActionDescriptor {
    /// Snake-case tag naming this effect kind.
    pub fn kind_name(&self) -> &'static str {
        self.into()
    }

    /// Guard-only conditional: attaches to whatever part follows it.
    pub fn is_bare_guard(&self) -> bool {
        matches!(self, Self::Conditional { body: None, .. })
    }
}

/// A descriptor with a label, as stored in fixture and dump files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedDescriptor {
    pub name: String,
    pub action: ActionDescriptor,
}

/// Load a list of named descriptors from a RON file.
pub fn load_descriptors_from_ron(path: &Path) -> Result<Vec<NamedDescriptor>, DescriptorLoadError> {
    let contents = std::fs::read_to_string(path)?;
    parse_descriptors_ron(&contents)
}

/// Parse a list of named descriptors from a RON string.
pub fn parse_descriptors_ron(input: &str) -> Result<Vec<NamedDescriptor>, DescriptorLoadError> {
    Ok(ron::from_str(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(ActionDescriptor::Delay { turns: 1 }.kind_name(), "delay");
        assert_eq!(ActionDescriptor::BoardRefresh.kind_name(), "board_refresh");
        assert_eq!(
            ActionDescriptor::AttackAttrXTeamAtk {
                mass_attack: true,
                team_attributes: vec![0],
                multiplier: 1.0,
                attack_attribute: 0,
            }
            .kind_name(),
            "attack_attr_x_team_atk"
        );
        assert_eq!(
            ActionDescriptor::ChangeTo7x6Board { duration: 1 }.kind_name(),
            "change_to_7x6_board"
        );
    }

    #[test]
    fn bare_guard_detection() {
        let guard = ActionDescriptor::Conditional {
            guard: Guard::Hp { lower: 0, upper: 50 },
            body: None,
        };
        assert!(guard.is_bare_guard());
        assert!(!ActionDescriptor::LeaderSwap.is_bare_guard());
        let guarded = ActionDescriptor::Conditional {
            guard: Guard::Hp { lower: 0, upper: 50 },
            body: Some(Box::new(ActionDescriptor::LeaderSwap)),
        };
        assert!(!guarded.is_bare_guard());
    }

    #[test]
    fn heal_fields_default_to_zero() {
        let heal: ActionDescriptor = ron::from_str("Heal(percentage_max_hp: 1.0)").unwrap();
        assert_eq!(
            heal,
            ActionDescriptor::Heal {
                hp: 0,
                rcv_multiplier_as_hp: 0.0,
                percentage_max_hp: 1.0,
                team_rcv_multiplier_as_hp: 0.0,
                card_bind: 0,
                awoken_bind: 0,
            }
        );
    }

    #[test]
    fn part_repeat_defaults_to_one() {
        let parts: Vec<Part> = ron::from_str("[(action: Delay(turns: 2)), (action: LeaderSwap, repeat: 3)]").unwrap();
        assert_eq!(parts[0].repeat, 1);
        assert_eq!(parts[1].repeat, 3);
    }

    #[test]
    fn nested_descriptor_parses() {
        let input = r#"Sequential(parts: [
            (action: Conditional(guard: Hp(lower: 0, upper: 50))),
            (action: AttrNuke(mass_attack: true, multiplier: 10.0, attribute: 0)),
        ])"#;
        let action: ActionDescriptor = ron::from_str(input).unwrap();
        match action {
            ActionDescriptor::Sequential { parts } => {
                assert_eq!(parts.len(), 2);
                assert!(parts[0].action.is_bare_guard());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
