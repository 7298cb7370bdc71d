/// Render fixtures example: prints the text for every named descriptor in a
/// RON file.
///
/// Run with: cargo run --example render_fixtures [path/to/skills.ron]

use skill_text::core::pipeline::SkillTextEngine;
use skill_text::schema::action::load_descriptors_from_ron;
use std::path::PathBuf;

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/skills.ron"));

    let descriptors = load_descriptors_from_ron(&path).expect("Failed to load descriptors");
    let engine = SkillTextEngine::builder()
        .build()
        .expect("Failed to build engine");

    println!("=== {} ({} skills) ===\n", path.display(), descriptors.len());
    for (name, result) in engine.render_named(&descriptors) {
        match result {
            Ok(text) => println!("{:<20} {}", name, text),
            Err(err) => println!("{:<20} <error: {}>", name, err),
        }
    }
}
