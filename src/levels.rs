//! Built-in level set
//!
//! Levels ship in the packed numeric form (`[width, height, cell…]`)
//! embedded as JSON, and are decoded to character rows at startup. The
//! data is a startup invariant; validity is enforced by a test.

use serde::Deserialize;

use crate::sim::decode_packed;

/// Embedded level data
const LEVELS_JSON: &str = include_str!("levels.json");

#[derive(Debug, Deserialize)]
struct LevelSet {
    levels: Vec<Vec<u16>>,
}

/// The shipped level plans, in play order
pub fn builtin_levels() -> Vec<Vec<String>> {
    let set: LevelSet =
        serde_json::from_str(LEVELS_JSON).expect("embedded level data is valid JSON");
    set.levels
        .iter()
        .map(|packed| decode_packed(packed).expect("embedded level data decodes"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    #[test]
    fn test_builtin_levels_are_valid() {
        let levels = builtin_levels();
        assert!(!levels.is_empty());
        // Decoding produced rows with exactly one player start each
        for plan in &levels {
            assert_eq!(plan.iter().map(|r| r.matches('@').count()).sum::<usize>(), 1);
        }
        // Every shipped plan must construct (rectangular, exactly one player)
        Game::new(levels, 1).unwrap();
    }
}
