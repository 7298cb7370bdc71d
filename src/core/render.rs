//! Effect renderer: one exhaustive `match` arm per effect kind.
//!
//! Leaves format through the lookup provider, the numeric helpers and the
//! board classifier; composites recurse through [`EffectRenderer::render`]
//! and hand the rendered children to `compose`.

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{trace, warn};

use crate::core::compose::{self, Fragment};
use crate::core::context::RenderContext;
use crate::core::lookup::{LookupProvider, LookupTable};
use crate::core::numeric::{fmt_mult, fmt_percent, minmax};
use crate::core::shape::{self, AnchoredShape, BoardShape};
use crate::schema::action::{ActionDescriptor, AttributeId, AwakeningId, OrbSpawn, TypeId};
use crate::schema::board::{GridOccupancy, LineChange};

/// Emitted where no localized text exists yet.
pub const TRANSLATION_NEEDED: &str = "[TRANSLATION NEEDED]";

/// Bind counts at or above this mean "fully recovered".
const FULL_BIND_RECOVERY: u32 = 9999;
/// Lock counts at or above this cover the whole board.
const WHOLE_BOARD_ORBS: u32 = 42;
/// Number of orb kinds; a list this long names every orb.
const ORB_KIND_COUNT: usize = 10;
/// The six basic orb colours.
const BASE_COLOURS: [AttributeId; 6] = [0, 1, 2, 3, 4, 5];

const ROW_LABELS: [&str; 5] = ["最上段", "上から2行目", "上から3行目", "下から2行目", "最下段"];
const COLUMN_LABELS: [&str; 6] = [
    "最左端",
    "左から2列目",
    "左から3列目",
    "右から3列目",
    "右から2列目",
    "最右端",
];

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("no renderer for skill type {skill_type}")]
    UnknownEffectKind { skill_type: u32 },
    #[error("malformed {kind} descriptor: {reason}")]
    MalformedDescriptor { kind: &'static str, reason: String },
    #[error("no {table} entry for id {id}")]
    MissingLookupEntry { table: LookupTable, id: u32 },
    #[error("descriptor nesting exceeds depth limit {0}")]
    DepthLimit(usize),
}

fn malformed(kind: &'static str, reason: impl Into<String>) -> RenderError {
    RenderError::MalformedDescriptor {
        kind,
        reason: reason.into(),
    }
}

/// Renders descriptors using a borrowed lookup provider.
pub struct EffectRenderer<'a> {
    lookup: &'a dyn LookupProvider,
    fallback_glyph: &'a str,
}

impl<'a> EffectRenderer<'a> {
    /// `fallback_glyph` is what forward-reference placeholders and unknown
    /// team targets fall back to.
    pub fn new(lookup: &'a dyn LookupProvider, fallback_glyph: &'a str) -> Self {
        Self {
            lookup,
            fallback_glyph,
        }
    }

    /// Render one descriptor, recursing into composites.
    pub fn render(
        &self,
        action: &ActionDescriptor,
        ctx: &mut RenderContext,
    ) -> Result<String, RenderError> {
        ctx.descend()?;
        trace!(kind = action.kind_name(), depth = ctx.depth(), "rendering effect");
        let result = self.dispatch(action, ctx);
        ctx.ascend();
        result
    }

    fn dispatch(
        &self,
        action: &ActionDescriptor,
        ctx: &mut RenderContext,
    ) -> Result<String, RenderError> {
        use ActionDescriptor as A;

        let text = match action {
            A::AttrNuke {
                mass_attack,
                multiplier,
                attribute,
            } => format!(
                "{}に攻撃力ｘ{}倍の{}属性攻撃",
                target(*mass_attack),
                fmt_mult(*multiplier),
                self.attr(*attribute)?
            ),
            A::FixedAttrNuke {
                mass_attack,
                damage,
                attribute,
            } => format!(
                "{}に{}の{}属性攻撃",
                target(*mass_attack),
                self.lookup.big_number(*damage),
                self.attr(*attribute)?
            ),
            A::SelfAttNuke {
                mass_attack,
                multiplier,
            } => format!("{}に攻撃力ｘ{}倍攻撃", target(*mass_attack), fmt_mult(*multiplier)),
            A::Shield { duration, shield } => {
                format!("{}{}", fmt_duration(*duration, None), reduction_text(*shield))
            }
            A::ElementalShield {
                duration,
                attribute,
                shield,
            } => {
                let attr = self.attr(*attribute)?;
                if *shield >= 1.0 {
                    format!("{}{}属性の攻撃を無効化", fmt_duration(*duration, None), attr)
                } else {
                    format!(
                        "{}{}属性のダメージを{}％減少",
                        fmt_duration(*duration, None),
                        attr,
                        fmt_percent(*shield)
                    )
                }
            }
            A::DrainAttack {
                mass_attack,
                atk_multiplier,
                recover_multiplier,
            } => {
                let mut text = format!(
                    "{}に攻撃力ｘ{}倍で攻撃し、ダメージ",
                    target(*mass_attack),
                    fmt_mult(*atk_multiplier)
                );
                if *recover_multiplier == 1.0 {
                    text.push_str("分のHP回復");
                } else {
                    text.push_str(&format!("{}％分のHP回復", fmt_percent(*recover_multiplier)));
                }
                text
            }
            A::Poison { multiplier } => {
                format!("敵全体を毒にする（攻撃力ｘ{}倍）", fmt_mult(*multiplier))
            }
            A::TimeStop { seconds } => format!("{}秒間、時を止めてドロップを動かせる", seconds),
            A::Gravity { percentage_hp } => {
                format!("敵の現HPの{}％分のダメージ", fmt_percent(*percentage_hp))
            }
            A::Heal {
                hp,
                rcv_multiplier_as_hp,
                percentage_max_hp,
                team_rcv_multiplier_as_hp,
                card_bind,
                awoken_bind,
            } => {
                let heal = if *hp != 0 {
                    format!("HPを{}回復", self.lookup.big_number(*hp))
                } else if *rcv_multiplier_as_hp != 0.0 {
                    format!("回復力ｘ{}倍のHPを回復", fmt_mult(*rcv_multiplier_as_hp))
                } else if *percentage_max_hp == 1.0 {
                    "HPを全回復".to_string()
                } else if *percentage_max_hp > 0.0 {
                    format!("最大HP{}％分回復", fmt_percent(*percentage_max_hp))
                } else if *team_rcv_multiplier_as_hp > 0.0 {
                    format!(
                        "チームの総回復力ｘ{}倍のHPを回復",
                        fmt_mult(*team_rcv_multiplier_as_hp)
                    )
                } else {
                    String::new()
                };
                with_unbind(heal, *card_bind, *awoken_bind)
            }
            A::Delay { turns } => format!("敵の行動を{}ターン遅らせる", turns),
            A::DefenseReduction { duration, shield } => format!(
                "{}敵の防御力が{}％下がる",
                fmt_duration(*duration, None),
                fmt_percent(*shield)
            ),
            A::DoubleOrbChange { from_attr, to_attr } => {
                self.double_orb_change(action.kind_name(), from_attr, to_attr)?
            }
            A::DamageToAttEnemy {
                enemy_attribute,
                attack_attribute,
                damage,
            } => format!(
                "{}属性の敵に{}属性の{}ダメージ",
                self.attr(*enemy_attribute)?,
                self.attr(*attack_attribute)?,
                damage
            ),
            A::RcvBoost {
                duration,
                multiplier,
            } => rcv_boost_text(*duration, *multiplier),
            A::AttributeAttackBoost {
                duration,
                attributes,
                types,
                multiplier,
                rcv_boost,
            } => {
                let mut text = String::new();
                if *rcv_boost {
                    text.push_str(&rcv_boost_text(*duration, *multiplier));
                    text.push_str(compose::SENTENCE_SEPARATOR);
                }
                text.push_str(&fmt_duration(*duration, None));
                text.push_str(&self.boost_subject(attributes, types)?);
                text.push_str(&format!("の攻撃力が{}倍", fmt_mult(*multiplier)));
                text
            }
            A::MassAttack { duration } => {
                format!("{}攻撃が全体攻撃になる", fmt_duration(*duration, None))
            }
            A::EnhanceOrbs { orbs } => {
                if orbs.is_empty() {
                    String::new()
                } else if BASE_COLOURS.iter().all(|c| orbs.contains(c)) {
                    "全ドロップを強化".to_string()
                } else {
                    format!("{}ドロップを強化", self.attrs(orbs)?)
                }
            }
            A::LockOrbs { orbs, count } => {
                let amount = if *count >= WHOLE_BOARD_ORBS {
                    "全".to_string()
                } else {
                    format!("ランダムで{}個", count)
                };
                let colours = if names_every_orb(orbs) {
                    String::new()
                } else {
                    self.attrs(orbs)?
                };
                format!("{}{}ドロップをロック", amount, colours)
            }
            A::Laser {
                mass_attack,
                damage,
            } => format!(
                "{}に{}の固定ダメージ",
                target(*mass_attack),
                self.lookup.big_number(*damage)
            ),
            A::NoSkyfall { duration } => {
                format!("{}落ちコンしなくなる", fmt_duration(*duration, None))
            }
            A::EnhanceSkyfall {
                duration,
                percentage_increase,
            } => format!(
                "{}強化ドロップが{}％の確率で落ちてくる",
                fmt_duration(*duration, None),
                fmt_percent(*percentage_increase)
            ),
            A::AutoHeal {
                duration,
                percentage_max_hp,
                card_bind,
                awoken_bind,
            } => {
                let heal = if *duration > 0 {
                    format!(
                        "{}最大HPの{}％分回復",
                        fmt_duration(*duration, None),
                        fmt_percent(*percentage_max_hp)
                    )
                } else {
                    String::new()
                };
                with_unbind(heal, *card_bind, *awoken_bind)
            }
            A::AbsorbMechanicVoid {
                duration,
                attribute_absorb,
                damage_absorb,
            } => {
                let voided = match (*attribute_absorb, *damage_absorb) {
                    (true, true) => "ダメージ吸収と属性吸収を無効化する",
                    (true, false) => "属性吸収を無効化する",
                    (false, true) => "ダメージ吸収を無効化する",
                    (false, false) => return Ok(String::new()),
                };
                format!("{}{}", fmt_duration(*duration, None), voided)
            }
            A::VoidMechanic { duration } => {
                format!("{}ダメージ無効を貫通する", fmt_duration(*duration, None))
            }
            A::TrueGravity { percentage_max_hp } => {
                format!("敵の最大HPの{}％分のダメージ", fmt_percent(*percentage_max_hp))
            }
            A::ExtraCombo { duration, combos } => {
                format!("{}{}コンボ加算される", fmt_duration(*duration, None), combos)
            }
            A::AwakeningHeal {
                awakenings,
                amount_per,
            } => format!(
                "チーム内の{}の覚醒数1つにつき回復力ｘ{}倍をHP回復",
                self.awakening_list(awakenings),
                fmt_mult(*amount_per)
            ),
            A::AwakeningAttackBoost {
                duration,
                awakenings,
                amount_per,
            } => format!(
                "{}チーム内の{}の覚醒数1つにつき攻撃力が{}％上がる",
                fmt_duration(*duration, None),
                self.awakening_list(awakenings),
                fmt_percent(*amount_per)
            ),
            A::AwakeningShield {
                duration,
                awakenings,
                amount_per,
            } => format!(
                "{}チーム内の{}の覚醒数1つにつき受けるダメージを{}％減少",
                fmt_duration(*duration, None),
                self.awakening_list(awakenings),
                fmt_percent(*amount_per)
            ),
            A::AwakeningStatBoost {
                duration,
                awakenings,
                atk_per,
                rcv_per,
            } => {
                let list = self.awakening_list(awakenings);
                let mut clauses = Vec::new();
                for (per, stat) in [(*atk_per, "攻撃力"), (*rcv_per, "回復力")] {
                    if per != 0.0 {
                        clauses.push(format!(
                            "{}チーム内の{}の覚醒数1つにつき{}が{}％上がる",
                            fmt_duration(*duration, None),
                            list,
                            stat,
                            fmt_percent(per)
                        ));
                    }
                }
                clauses.join(compose::SENTENCE_SEPARATOR)
            }
            A::ChangeEnemiesAttribute { turns, attribute } => {
                let prefix = turns.map(|t| fmt_duration(t, None)).unwrap_or_default();
                format!("{}敵全体が{}属性に変化", prefix, self.attr(*attribute)?)
            }
            A::Haste { turns, max_turns } => format!(
                "自分以外の味方スキルが{}ターン溜まる",
                minmax(*turns, *max_turns)
            ),
            A::HpBoost { duration, hp } => {
                format!("{}最大HPが{}倍", fmt_duration(*duration, None), fmt_mult(*hp))
            }
            A::RandomOrbChange { from_attr, to_attr } => {
                let from = if names_every_orb(from_attr) {
                    "全".to_string()
                } else {
                    self.attrs(from_attr)?
                };
                format!("{}ドロップを{}ドロップに変化", from, self.attrs(to_attr)?)
            }
            A::AttackAttrXTeamAtk {
                mass_attack,
                team_attributes,
                multiplier,
                attack_attribute,
            } => format!(
                "{}にチームの{}属性の総攻撃力ｘ{}倍の{}属性攻撃",
                target(*mass_attack),
                self.attrs(team_attributes)?,
                fmt_mult(*multiplier),
                self.attr(*attack_attribute)?
            ),
            A::SpawnOrb {
                amount,
                orbs,
                excluding_orbs,
            } => self.spawn_text(*amount, orbs, excluding_orbs)?,
            A::DoubleSpawnOrb { first, second } => format!(
                "{}{}{}",
                self.spawn(first)?,
                compose::SENTENCE_SEPARATOR,
                self.spawn(second)?
            ),
            A::MoveTimeBuff {
                duration,
                multiplier,
                seconds,
            } => {
                let change = match (*multiplier != 0.0, *seconds != 0.0) {
                    (true, true) => {
                        return Err(malformed(
                            action.kind_name(),
                            "both multiplier and seconds are set",
                        ))
                    }
                    (_, false) => format!("{}倍", fmt_mult(*multiplier)),
                    (false, true) => format!("{}秒に延長", fmt_mult(*seconds)),
                };
                format!("{}ドロップ操作時間が{}", fmt_duration(*duration, None), change)
            }
            A::RowChange { rows } => self.line_change(action.kind_name(), rows, &ROW_LABELS)?,
            A::ColumnChange { columns } => {
                self.line_change(action.kind_name(), columns, &COLUMN_LABELS)?
            }
            A::ChangeSkyfall {
                duration,
                max_duration,
                orbs,
                percentage,
            } => {
                let rate = fmt_percent(*percentage);
                let colours = self.attrs(orbs)?;
                let change = if rate == "100" {
                    format!("{}ドロップのみ落ちてくる", colours)
                } else if orbs.iter().all(|o| BASE_COLOURS.contains(o)) {
                    format!("{}ドロップが{}％落ちやすくなる", colours, rate)
                } else {
                    format!("{}が{}％の確率で落ちてくる", colours, rate)
                };
                format!("{}{}", fmt_duration(*duration, *max_duration), change)
            }
            A::NoOrbSkyfall { duration, orbs } => {
                warn!(kind = action.kind_name(), "rendering untranslated clause");
                format!(
                    "{}no {} orbs will appear",
                    fmt_duration(*duration, None),
                    self.attrs(orbs)?
                )
            }
            A::RandomNuke {
                mass_attack,
                attribute,
                minimum_multiplier,
                maximum_multiplier,
            } => self.random_nuke(
                *mass_attack,
                *attribute,
                *minimum_multiplier,
                *maximum_multiplier,
            )?,
            A::Counterattack {
                duration,
                multiplier,
                attribute,
            } => format!(
                "{}受けたダメージｘ{}倍の{}属性反撃",
                fmt_duration(*duration, None),
                fmt_mult(*multiplier),
                self.attr(*attribute)?
            ),
            A::BoardChange { to_attr } => {
                format!("全ドロップを{}ドロップに変化", self.attrs(to_attr)?)
            }
            A::SuicideRandomNuke {
                hp_remaining,
                mass_attack,
                attribute,
                minimum_multiplier,
                maximum_multiplier,
            } => format!(
                "{}{}{}",
                suicide_text(*hp_remaining),
                compose::SENTENCE_SEPARATOR,
                self.random_nuke(
                    *mass_attack,
                    *attribute,
                    *minimum_multiplier,
                    *maximum_multiplier
                )?
            ),
            A::SuicideNuke {
                hp_remaining,
                mass_attack,
                attribute,
                damage,
            } => format!(
                "{}{}{}に{}属性の{}ダメージ",
                suicide_text(*hp_remaining),
                compose::SENTENCE_SEPARATOR,
                target(*mass_attack),
                self.attr(*attribute)?,
                self.lookup.big_number(*damage)
            ),
            A::Suicide { hp_remaining } => suicide_text(*hp_remaining),
            A::TypeAttackBoost {
                duration,
                types,
                multiplier,
            } => format!(
                "{}{}タイプの攻撃力が{}倍",
                fmt_duration(*duration, None),
                self.types(types, "と")?,
                fmt_mult(*multiplier)
            ),
            A::GrudgeStrike {
                mass_attack,
                attribute,
                low_multiplier,
                high_multiplier,
            } => format!(
                "残りHPが応じ{}に{}属性ダメージを与え（HP1のとき攻撃力ｘ{}倍、満タン{}倍）",
                target(*mass_attack),
                self.attr(*attribute)?,
                fmt_mult(*low_multiplier),
                fmt_mult(*high_multiplier)
            ),
            A::DrainAttrAttack {
                mass_attack,
                attribute,
                atk_multiplier,
                recover_multiplier,
            } => {
                let mut text = format!(
                    "{}に攻撃力ｘ{}倍の{}属性攻撃し、ダメージ",
                    target(*mass_attack),
                    fmt_mult(*atk_multiplier),
                    self.attr(*attribute)?
                );
                if *recover_multiplier == 1.0 {
                    text.push_str("分のHP回復");
                } else {
                    text.push_str(&format!("の{}％分のHP回復", fmt_percent(*recover_multiplier)));
                }
                text
            }
            A::AttributeChange {
                duration,
                attribute,
            } => format!(
                "{}自分の属性が{}属性に変化",
                fmt_duration(*duration, None),
                self.attr(*attribute)?
            ),
            A::MultiHitLaser {
                mass_attack,
                damage,
            } => format!(
                "{}に{}ダメージ",
                target(*mass_attack),
                damage
            ),
            A::HpNuke {
                mass_attack,
                multiplier,
                attribute,
            } => format!(
                "{}にチームの総HPｘ{}倍の{}属性攻撃",
                target(*mass_attack),
                fmt_mult(*multiplier),
                self.attr(*attribute)?
            ),
            A::FixedPositionSpawn {
                attribute,
                positions,
            } => {
                let attr = self.attr(*attribute)?;
                self.shape_labels(positions)
                    .iter()
                    .map(|shape| format!("{}{}ドロップを1つ生成", shape, attr))
                    .collect::<Vec<_>>()
                    .join(compose::SENTENCE_SEPARATOR)
            }
            A::MatchDisableRecovery { duration } => {
                format!("消せないドロップ状態を{}ターン回復", duration)
            }
            A::BoardRefresh => "ランダムでドロップを入れ替える".to_string(),
            A::LeaderSwap => "リーダーと入れ替わる；もう一度使うとサブに戻る".to_string(),
            A::UnlockAllOrbs => "全ドロップのロック状態を解除".to_string(),
            A::UnlockBoardPath => format!(
                "全ドロップのロック状態を解除し、{}ドロップに変化。3コンボ分のルートを表示",
                self.attrs(&BASE_COLOURS[..4])?
            ),
            A::RandomSkill { choices } => {
                let texts = self.render_all(choices, ctx)?;
                compose::compose_choice(&texts)
            }
            A::ChangeMonster { transform_ids } => match transform_ids.first() {
                Some(id) => format!("[{}]に変身する", id),
                None => return Err(malformed(action.kind_name(), "no transform target")),
            },
            A::RandomChangeMonster { transform_ids } => {
                let ids: Vec<String> = transform_ids.iter().map(|id| format!("[{}]", id)).collect();
                format!("ランダムで変身：{}", self.lookup.join_list(&ids, "か"))
            }
            A::SkyfallLock { duration, orbs } => format!(
                "{}{}ドロップがロック状態で落ちてくる",
                fmt_duration(*duration, None),
                self.attrs(orbs)?
            ),
            A::SpawnSpinner {
                turns,
                speed,
                random_count,
                positions,
            } => {
                if *random_count > 0 {
                    format!(
                        "{}ランダムで{}箇所のマスが{}秒毎に変化する",
                        fmt_duration(*turns, None),
                        random_count,
                        fmt_mult(*speed)
                    )
                } else {
                    format!(
                        "{}{}にルーレットを生成({}秒毎に変化する)",
                        fmt_duration(*turns, None),
                        self.shape_labels(positions).join("、"),
                        fmt_mult(*speed)
                    )
                }
            }
            A::AllyActiveDisable { turns } => format!("{}ターンの間、スキル使用不可", turns),
            A::AllyActiveDelay { turns } => format!("味方スキルが{}ターン減少", turns),
            A::CreateUnmatchable { duration, orbs } => format!(
                "{}{}ドロップが消せなくなる",
                fmt_duration(*duration, None),
                self.attrs(orbs)?
            ),
            A::Conditional { guard, body } => {
                let mut text = compose::guard_text(guard);
                if let Some(body) = body {
                    text.push_str(&self.render(body, ctx)?);
                }
                text
            }
            A::NailOrbSkyfall { duration, chance } => format!(
                "{}釘ドロップが{}％落ちやすくなる",
                fmt_duration(*duration, None),
                fmt_percent(*chance)
            ),
            A::LeaderSwapSub { sub_slot } => {
                format!("リーダーと左から{}番のサブを入れ替える", sub_slot)
            }
            A::CompositionBuff {
                duration,
                attributes,
                types,
                atk_boost,
                rcv_boost,
            } => {
                let members = match (attributes.is_empty(), types.is_empty()) {
                    (false, true) => format!("{}属性一体", self.attrs(attributes)?),
                    (true, false) => format!("{}タイプ一つ", self.types(types, "、")?),
                    // Both or neither: nothing sensible to count.
                    _ => return Ok(String::new()),
                };
                format!(
                    "{}チーム内の{}につき攻撃力が{}%と回復力が{}%上がる",
                    fmt_duration(*duration, None),
                    members,
                    whole_percent(*atk_boost),
                    whole_percent(*rcv_boost)
                )
            }
            A::TeamTargetStatChange {
                duration,
                target,
                atk_mult,
            } => {
                let who = match target {
                    1 => "自分",
                    2 => "リーダー",
                    4 => "助っ人",
                    8 => "サブ4体",
                    15 => "全員",
                    _ => self.fallback_glyph,
                };
                format!(
                    "{}{}の攻撃力を{}倍",
                    fmt_duration(*duration, None),
                    who,
                    fmt_mult(*atk_mult)
                )
            }
            A::EvolvingChain { mode, stages } => {
                let texts = self.render_all(stages, ctx)?;
                compose::compose_chain(*mode, &texts)
            }
            A::Sequential { parts } => {
                let mut fragments = Vec::with_capacity(parts.len());
                for part in parts {
                    fragments.push(Fragment {
                        text: self.render(&part.action, ctx)?,
                        repeat: part.repeat,
                        bare_guard: part.action.is_bare_guard(),
                    });
                }
                compose::compose_sequential(fragments)
            }
            A::Cloud {
                duration,
                width,
                height,
                origin_x,
                origin_y,
            } => cloud_text(*duration, *width, *height, *origin_x, *origin_y),
            A::DamageCapBoost {
                duration,
                damage_cap,
            } => format!(
                "{}自分のダメージ上限値が{}億になる",
                fmt_duration(*duration, None),
                damage_cap
            ),
            A::InflictEs {
                selector_type,
                players,
            } => {
                let who = match selector_type {
                    2 => {
                        let ranks: Vec<String> = players.iter().map(|p| format!("{}位", p)).collect();
                        format!("{}のプレイヤー", self.lookup.join_list(&ranks, "と"))
                    }
                    3 => "自分より上位のプレイヤーの皆様へ".to_string(),
                    _ => {
                        warn!(kind = action.kind_name(), selector_type, "rendering untranslated clause");
                        "To some other players, ".to_string()
                    }
                };
                format!("{}に意地悪をする", who)
            }
            A::OrbSeal { duration, column } => format!(
                "{}左から{}列目のドロップが操作不可",
                fmt_duration(*duration, None),
                column
            ),
            A::Tape => {
                warn!(kind = action.kind_name(), "no localized text for effect");
                TRANSLATION_NEEDED.to_string()
            }
            A::ChangeTo7x6Board { duration } => {
                format!("{}盤面を7×6マスにする", fmt_duration(*duration, None))
            }
            A::Unrecognized { skill_type } => {
                return Err(RenderError::UnknownEffectKind {
                    skill_type: *skill_type,
                })
            }
        };
        Ok(text)
    }

    fn render_all(
        &self,
        actions: &[ActionDescriptor],
        ctx: &mut RenderContext,
    ) -> Result<Vec<String>, RenderError> {
        actions.iter().map(|a| self.render(a, ctx)).collect()
    }

    fn attr(&self, id: AttributeId) -> Result<&str, RenderError> {
        self.lookup
            .attribute_name(id)
            .ok_or(RenderError::MissingLookupEntry {
                table: LookupTable::Attribute,
                id,
            })
    }

    /// Attribute names joined with `と`.
    fn attrs(&self, ids: &[AttributeId]) -> Result<String, RenderError> {
        let names = ids
            .iter()
            .map(|&id| self.attr(id).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.lookup.join_list(&names, "と"))
    }

    fn types(&self, ids: &[TypeId], conjunction: &str) -> Result<String, RenderError> {
        let names = ids
            .iter()
            .map(|&id| {
                self.lookup
                    .type_name(id)
                    .map(str::to_string)
                    .ok_or(RenderError::MissingLookupEntry {
                        table: LookupTable::Type,
                        id,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.lookup.join_list(&names, conjunction))
    }

    fn boost_subject(&self, attributes: &[AttributeId], types: &[TypeId]) -> Result<String, RenderError> {
        let mut subjects = Vec::new();
        if !attributes.is_empty() {
            subjects.push(format!("{}属性", self.attrs(attributes)?));
        }
        if !types.is_empty() {
            subjects.push(format!("{}タイプ", self.types(types, "と")?));
        }
        if subjects.is_empty() {
            return Ok("味方".to_string());
        }
        Ok(self.lookup.join_list(&subjects, "と"))
    }

    /// Awoken-skill references stay as placeholders for a later pass.
    fn awakening_list(&self, awakenings: &[AwakeningId]) -> String {
        let tokens: Vec<String> = awakenings
            .iter()
            .filter(|&&id| id != 0)
            .map(|id| {
                format!(
                    "{{{{ awoskills.id{}|default('{}') }}}}",
                    id, self.fallback_glyph
                )
            })
            .collect();
        self.lookup.join_list(&tokens, "と")
    }

    fn random_nuke(
        &self,
        mass_attack: bool,
        attribute: AttributeId,
        minimum: f64,
        maximum: f64,
    ) -> Result<String, RenderError> {
        Ok(format!(
            "{}に攻撃力ｘ{}倍の{}属性攻撃",
            target(mass_attack),
            minmax(fmt_mult(minimum), fmt_mult(maximum)),
            self.attr(attribute)?
        ))
    }

    fn double_orb_change(
        &self,
        kind: &'static str,
        from: &[AttributeId],
        to: &[AttributeId],
    ) -> Result<String, RenderError> {
        match (from, to) {
            ([a, b], [t]) => Ok(format!(
                "{}と{}ドロップを{}ドロップに変化",
                self.attr(*a)?,
                self.attr(*b)?,
                self.attr(*t)?
            )),
            ([a, b], [ta, tb]) => Ok(format!(
                "{}ドロップを{}ドロップに、{}ドロップを{}ドロップに変化",
                self.attr(*a)?,
                self.attr(*ta)?,
                self.attr(*b)?,
                self.attr(*tb)?
            )),
            _ => Err(malformed(
                kind,
                format!("expected 2 source and 1-2 target colours, got {} and {}", from.len(), to.len()),
            )),
        }
    }

    fn spawn(&self, spawn: &OrbSpawn) -> Result<String, RenderError> {
        self.spawn_text(spawn.amount, &spawn.orbs, &spawn.excluding_orbs)
    }

    fn spawn_text(
        &self,
        amount: u32,
        orbs: &[AttributeId],
        excluding: &[AttributeId],
    ) -> Result<String, RenderError> {
        let targets: FxHashSet<AttributeId> = orbs.iter().copied().collect();
        let excluded: Vec<AttributeId> = excluding
            .iter()
            .copied()
            .filter(|o| !targets.contains(o))
            .collect();
        let to = self.attrs(orbs)?;
        let plain = if orbs.len() > 1 {
            format!("ランダムで{}を{}個ずつ生成", to, amount)
        } else {
            format!("{}ドロップを{}個生成", to, amount)
        };
        if excluded.is_empty() {
            Ok(plain)
        } else {
            Ok(format!("{}以外{}", self.attrs(&excluded)?, plain))
        }
    }

    fn line_change(
        &self,
        kind: &'static str,
        lines: &[LineChange],
        labels: &[&'static str],
    ) -> Result<String, RenderError> {
        let mut described = Vec::with_capacity(lines.len());
        for line in lines {
            let label = labels
                .get(line.index as usize)
                .ok_or_else(|| malformed(kind, format!("line index {} is off the board", line.index)))?;
            described.push((*label, self.attrs(&line.attributes)?));
        }
        Ok(compose::merge_lines(&described))
    }

    fn shape_labels(&self, positions: &GridOccupancy) -> Vec<String> {
        shape::classify(positions).iter().map(shape_label).collect()
    }
}

fn target(mass_attack: bool) -> &'static str {
    if mass_attack {
        "敵全体"
    } else {
        "敵1体"
    }
}

/// `"{n}ターンの間、"`, or `"{n}~{m}ターンの間、"` when a different max is given.
fn fmt_duration(duration: u32, max_duration: Option<u32>) -> String {
    match max_duration {
        Some(max) if max != 0 && max != duration => format!("{}~{}ターンの間、", duration, max),
        _ => format!("{}ターンの間、", duration),
    }
}

fn reduction_text(shield: f64) -> String {
    if shield >= 1.0 {
        "受けるダメージを無効化".to_string()
    } else {
        format!("受けるダメージを{}％減少", fmt_percent(shield))
    }
}

fn rcv_boost_text(duration: u32, multiplier: f64) -> String {
    format!("{}回復力が{}倍", fmt_duration(duration, None), fmt_mult(multiplier))
}

fn suicide_text(hp_remaining: f64) -> String {
    if hp_remaining == 0.0 {
        "HPが1になる".to_string()
    } else {
        format!("HPが{}％減少", fmt_percent(1.0 - hp_remaining))
    }
}

/// Percent truncated toward zero, as the stored composition-buff text has it.
fn whole_percent(ratio: f64) -> i64 {
    (ratio * 100.0).trunc() as i64
}

fn names_every_orb(orbs: &[AttributeId]) -> bool {
    let distinct: FxHashSet<&AttributeId> = orbs.iter().collect();
    distinct.len() >= ORB_KIND_COUNT
}

/// Append the bind-recovery clause, separated only when a heal clause exists.
fn with_unbind(mut text: String, card_bind: u32, awoken_bind: u32) -> String {
    let clause = match (card_bind, awoken_bind) {
        (0, 0) => return text,
        (c, a) if c >= FULL_BIND_RECOVERY && a != 0 => "バインドと覚醒無効を全回復".to_string(),
        (c, a) if c != 0 && a != 0 => format!("バインドと覚醒無効を{}ターン回復", a),
        (c, _) if c >= FULL_BIND_RECOVERY => "バインドを全回復".to_string(),
        (c, _) if c != 0 => format!("バインドを{}ターン回復", c),
        (_, a) if a >= FULL_BIND_RECOVERY => "覚醒無効を全回復".to_string(),
        (_, a) => format!("覚醒無効を{}ターン回復", a),
    };
    if !text.is_empty() {
        text.push_str(compose::SENTENCE_SEPARATOR);
    }
    text.push_str(&clause);
    text
}

fn cloud_text(
    duration: u32,
    width: u32,
    height: u32,
    origin_x: Option<u32>,
    origin_y: Option<u32>,
) -> String {
    let is_row = width == 6 && height == 1;
    let is_column = width == 1 && height == 5;
    let shape = if is_row {
        "横1列".to_string()
    } else if is_column {
        "縦1列".to_string()
    } else if width == height {
        format!("{}×{}マスの正方形", width, height)
    } else {
        format!("{}×{}マスの長方形", width, height)
    };

    let mut position = Vec::new();
    if let Some(x) = origin_x.filter(|_| !is_row) {
        position.push(format!("左から{}列目", x));
    }
    if let Some(y) = origin_y.filter(|_| !is_column) {
        position.push(format!("上から{}行目", y));
    }
    if position.is_empty() {
        position.push("ランダムで".to_string());
    }
    format!(
        "{}{}の{}を雲で隠す",
        fmt_duration(duration, None),
        position.join("、"),
        shape
    )
}

fn shape_label(shape: &BoardShape) -> String {
    match shape {
        BoardShape::FourCorners => "盤面4隅に".to_string(),
        BoardShape::Border => "盤面外周を".to_string(),
        BoardShape::Seven => "7の形に".to_string(),
        BoardShape::UpperLeftRectangle => "盤面左上の3×2マスに".to_string(),
        BoardShape::Center => "盤面中央を".to_string(),
        BoardShape::Diagonal => "盤面上に斜めに".to_string(),
        BoardShape::Crescent => "三日月状に".to_string(),
        BoardShape::ZShape => "盤面上にZ字型に".to_string(),
        BoardShape::Anchored { shape, row, column } => {
            let name = match shape {
                AnchoredShape::Cross => "十字形",
                AnchoredShape::L => "L字形",
                AnchoredShape::Square => "正方形",
            };
            format!(
                "{}と{}の中心に{}の",
                ROW_LABELS[*row],
                COLUMN_LABELS[*column as usize],
                name
            )
        }
        BoardShape::Row(row) => ROW_LABELS[*row].to_string(),
        BoardShape::Column(column) => COLUMN_LABELS[*column as usize].to_string(),
    }
}
