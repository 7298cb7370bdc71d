//! Composition of rendered fragments: sequential joining, deduplication,
//! positional merging of row/column changes, ordinal enumeration and
//! conditional guard prefixes.
//!
//! Everything here works on already rendered text; fragments are compared
//! only for equality.

use rustc_hash::FxHashMap;

use crate::core::numeric::half_to_full;
use crate::schema::condition::{ChainMode, Guard, GuardBound};

/// Separator between sentences of a sequential skill.
pub const SENTENCE_SEPARATOR: &str = "。";
/// Separator between enumerated options.
pub const OPTION_SEPARATOR: &str = "；";

/// A rendered part of a sequential skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub repeat: u32,
    /// Guard-only conditional, attaches to the next part without a separator.
    pub bare_guard: bool,
}

impl Fragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            repeat: 1,
            bare_guard: false,
        }
    }
}

/// `"{text}ｘ{count}回"`.
pub fn fmt_repeated(text: &str, count: u32) -> String {
    format!("{}ｘ{}回", text, count)
}

/// Collapse fragments with identical text into their first occurrence,
/// summing repeat counts. Order of first occurrence is kept.
pub fn dedupe(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut out: Vec<Fragment> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if let Some(&pos) = index.get(&fragment.text) {
            out[pos].repeat += fragment.repeat;
        } else {
            index.insert(fragment.text.clone(), out.len());
            out.push(fragment);
        }
    }
    out
}

/// Join fragments into one text. A separator follows every fragment except
/// the last and bare guards.
pub fn join_sequential(fragments: &[Fragment]) -> String {
    let mut text = String::new();
    for (i, fragment) in fragments.iter().enumerate() {
        if fragment.repeat > 1 {
            text.push_str(&fmt_repeated(&fragment.text, fragment.repeat));
        } else {
            text.push_str(&fragment.text);
        }
        if i + 1 != fragments.len() && !fragment.bare_guard {
            text.push_str(SENTENCE_SEPARATOR);
        }
    }
    text
}

/// Fold each bare guard into the fragment after it, so a guarded part only
/// deduplicates against the same part under the same guard.
pub fn attach_guards(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let mut out: Vec<Fragment> = Vec::with_capacity(fragments.len());
    let mut pending: Option<Fragment> = None;
    for fragment in fragments {
        match pending.take() {
            Some(mut guard) => {
                guard.text.push_str(&fragment.text);
                guard.repeat = fragment.repeat;
                guard.bare_guard = fragment.bare_guard;
                if guard.bare_guard {
                    pending = Some(guard);
                } else {
                    out.push(guard);
                }
            }
            None if fragment.bare_guard => pending = Some(fragment),
            None => out.push(fragment),
        }
    }
    // A trailing guard has nothing to attach to.
    out.extend(pending);
    out
}

/// Attach guards, deduplicate, then join: the full sequential composition rule.
pub fn compose_sequential(fragments: Vec<Fragment>) -> String {
    join_sequential(&dedupe(attach_guards(fragments)))
}

/// Merge row/column changes that share a resulting colour.
///
/// `lines` pairs each position label with its colour text, in input order.
/// Adjacent entries with the same colour become one clause whose labels are
/// joined by `と`.
pub fn merge_lines(lines: &[(&str, String)]) -> String {
    let mut clauses = Vec::new();
    let mut start = 0;
    while start < lines.len() {
        let colour = &lines[start].1;
        let mut end = start + 1;
        while end < lines.len() && lines[end].1 == *colour {
            end += 1;
        }
        let labels: Vec<&str> = lines[start..end].iter().map(|(label, _)| *label).collect();
        clauses.push(format!("{}を{}に", labels.join("と"), colour));
        start = end;
    }

    let mut output = clauses.join("、");
    if output.ends_with('に') {
        output.truncate(output.len() - 'に'.len_utf8());
        output.push_str("ドロップに変化");
    }
    output
}

/// `"１、a；２、b"`.
pub fn enumerate_options(texts: &[String]) -> String {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}、{}", half_to_full(i as u64 + 1), text))
        .collect::<Vec<_>>()
        .join(OPTION_SEPARATOR)
}

/// Random-choice composite: lead-in plus enumerated options.
pub fn compose_choice(texts: &[String]) -> String {
    format!("以下のスキルからランダムで発動：{}", enumerate_options(texts))
}

/// Evolving composite: lead-in depends on what happens after the last stage.
pub fn compose_chain(mode: ChainMode, texts: &[String]) -> String {
    let lead_in = match mode {
        ChainMode::CyclesBack => {
            "スキル使うと、次の階段に変化。最終階段のスキル使うと、最初のスキル戻る："
        }
        ChainMode::Restarts => "スキル使うと、次の階段に変化：",
    };
    format!("{}{}", lead_in, enumerate_options(texts))
}

/// Prefix text for a guard; always ends with a full-width colon.
pub fn guard_text(guard: &Guard) -> String {
    match (guard, guard.bound()) {
        (Guard::Hp { .. }, GuardBound::AtMost(upper)) => format!("HP {}%以下：", upper),
        (Guard::Hp { .. }, GuardBound::AtLeast(lower)) => format!("HP {}%以上：", lower),
        (Guard::Hp { .. }, GuardBound::Between(lower, upper)) => {
            format!("HP {}%～{}%の場合：", lower, upper)
        }
        (Guard::Battle { .. }, GuardBound::AtMost(upper)) => format!("バトル{}以前：", upper),
        (Guard::Battle { .. }, GuardBound::AtLeast(lower)) => format!("バトル{}以降：", lower),
        (Guard::Battle { .. }, GuardBound::Between(lower, upper)) => {
            format!("バトル{}～{}：", lower, upper)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str) -> Fragment {
        Fragment::new(text)
    }

    fn guard(text: &str) -> Fragment {
        Fragment {
            text: text.to_string(),
            repeat: 1,
            bare_guard: true,
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        let out = dedupe(vec![frag("A"), frag("B"), frag("A")]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "A");
        assert_eq!(out[0].repeat, 2);
        assert_eq!(out[1].text, "B");
        assert_eq!(out[1].repeat, 1);
    }

    #[test]
    fn dedupe_sums_explicit_repeats() {
        let mut first = frag("A");
        first.repeat = 2;
        let mut second = frag("A");
        second.repeat = 3;
        let out = dedupe(vec![first, second]);
        assert_eq!(out[0].repeat, 5);
    }

    #[test]
    fn sequential_marks_repeats() {
        assert_eq!(
            compose_sequential(vec![frag("A"), frag("B"), frag("A")]),
            "Aｘ2回。B"
        );
    }

    #[test]
    fn bare_guard_attaches_to_next_part() {
        let text = compose_sequential(vec![frag("A"), guard("HP 50%以下："), frag("B")]);
        assert_eq!(text, "A。HP 50%以下：B");
    }

    #[test]
    fn repeated_guard_keeps_each_body() {
        let g = "HP 50%以下：";
        let text = compose_sequential(vec![guard(g), frag("A"), guard(g), frag("B")]);
        assert_eq!(text, "HP 50%以下：A。HP 50%以下：B");
    }

    #[test]
    fn guarded_and_plain_parts_stay_apart() {
        let g = "バトル3以降：";
        let text = compose_sequential(vec![guard(g), frag("A"), frag("A"), guard(g), frag("A")]);
        assert_eq!(text, "バトル3以降：Aｘ2回。A");
    }

    #[test]
    fn stacked_and_trailing_guards() {
        let out = attach_guards(vec![guard("X："), guard("Y："), frag("A"), guard("Z：")]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].text, "X：Y：A");
        assert!(!out[0].bare_guard);
        assert!(out[1].bare_guard);
    }

    #[test]
    fn single_and_empty_sequences() {
        assert_eq!(compose_sequential(vec![]), "");
        assert_eq!(compose_sequential(vec![frag("A")]), "A");
    }

    #[test]
    fn merge_lines_groups_adjacent_equal_colours() {
        let lines = vec![
            ("最上段", "火".to_string()),
            ("上から2行目", "火".to_string()),
            ("下から2行目", "水".to_string()),
        ];
        assert_eq!(
            merge_lines(&lines),
            "最上段と上から2行目を火に、下から2行目を水ドロップに変化"
        );
    }

    #[test]
    fn merge_lines_does_not_merge_separated_runs() {
        let lines = vec![
            ("最左端", "火".to_string()),
            ("左から2列目", "水".to_string()),
            ("最右端", "火".to_string()),
        ];
        assert_eq!(
            merge_lines(&lines),
            "最左端を火に、左から2列目を水に、最右端を火ドロップに変化"
        );
    }

    #[test]
    fn merge_lines_empty() {
        assert_eq!(merge_lines(&[]), "");
    }

    #[test]
    fn options_use_full_width_ordinals() {
        let texts = vec!["A".to_string(), "B".to_string()];
        assert_eq!(enumerate_options(&texts), "１、A；２、B");
        assert_eq!(compose_choice(&texts), "以下のスキルからランダムで発動：１、A；２、B");
    }

    #[test]
    fn chain_lead_ins_differ_only_in_intro() {
        let texts = vec!["A".to_string(), "B".to_string()];
        let cycles = compose_chain(ChainMode::CyclesBack, &texts);
        let restarts = compose_chain(ChainMode::Restarts, &texts);
        assert_ne!(cycles, restarts);
        assert!(cycles.ends_with("：１、A；２、B"));
        assert!(restarts.ends_with("：１、A；２、B"));
    }

    #[test]
    fn hp_guard_templates() {
        assert_eq!(guard_text(&Guard::Hp { lower: 0, upper: 50 }), "HP 50%以下：");
        assert_eq!(guard_text(&Guard::Hp { lower: 80, upper: 100 }), "HP 80%以上：");
        assert_eq!(guard_text(&Guard::Hp { lower: 20, upper: 60 }), "HP 20%～60%の場合：");
    }

    #[test]
    fn battle_guard_templates() {
        assert_eq!(guard_text(&Guard::Battle { lower: 0, upper: 3 }), "バトル3以前：");
        assert_eq!(guard_text(&Guard::Battle { lower: 4, upper: 9999 }), "バトル4以降：");
        assert_eq!(guard_text(&Guard::Battle { lower: 2, upper: 5 }), "バトル2～5：");
    }
}
