//! Skill Text: deterministic text for puzzle-RPG active skills.
//!
//! Turns structured skill effect descriptors into Japanese description
//! text: leaf effects through per-kind templates, composite skills through
//! sequencing, deduplication, enumeration and conditional guards.

pub mod core;
pub mod schema;
