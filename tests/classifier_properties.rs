use proptest::prelude::*;
use skill_text::core::compose::{dedupe, Fragment};
use skill_text::core::pipeline::SkillTextEngine;
use skill_text::core::shape::{classify, BoardShape};
use skill_text::schema::action::ActionDescriptor;
use skill_text::schema::board::GridOccupancy;

fn occupancy() -> impl Strategy<Value = GridOccupancy> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), 6), 5).prop_map(|masks| {
        let rows: Vec<Vec<u8>> = masks
            .iter()
            .map(|mask| (0u8..6).filter(|&c| mask[c as usize]).collect())
            .collect();
        GridOccupancy::new(rows).unwrap()
    })
}

fn is_fallback(shape: &BoardShape) -> bool {
    matches!(shape, BoardShape::Row(_) | BoardShape::Column(_))
}

proptest! {
    #[test]
    fn classify_is_deterministic(grid in occupancy()) {
        prop_assert_eq!(classify(&grid), classify(&grid));
    }

    #[test]
    fn classify_leaves_input_untouched(grid in occupancy()) {
        let before = grid.clone();
        let _ = classify(&grid);
        prop_assert_eq!(grid, before);
    }

    #[test]
    fn fallback_lines_never_mix_with_shapes(grid in occupancy()) {
        let shapes = classify(&grid);
        let fallback = shapes.iter().filter(|s| is_fallback(s)).count();
        prop_assert!(fallback == 0 || fallback == shapes.len());
    }

    #[test]
    fn dedupe_preserves_total_count(texts in prop::collection::vec("[a-c]", 0..12)) {
        let fragments: Vec<Fragment> = texts.iter().map(|t| Fragment::new(t.as_str())).collect();
        let out = dedupe(fragments);
        let total: u32 = out.iter().map(|f| f.repeat).sum();
        prop_assert_eq!(total as usize, texts.len());

        let mut seen = Vec::new();
        for text in &texts {
            if !seen.contains(text) {
                seen.push(text.clone());
            }
        }
        let order: Vec<String> = out.into_iter().map(|f| f.text).collect();
        prop_assert_eq!(order, seen);
    }

    #[test]
    fn spawn_rendering_is_repeatable(grid in occupancy(), attribute in 0u32..10) {
        let engine = SkillTextEngine::builder().build().unwrap();
        let action = ActionDescriptor::FixedPositionSpawn { attribute, positions: grid };
        prop_assert_eq!(engine.render(&action), engine.render(&action));
    }
}
