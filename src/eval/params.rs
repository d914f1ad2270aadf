//! Difficulty presets for the computer player

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseDifficultyError;

/// Selectable CPU strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    #[inline]
    pub fn params(self) -> CpuParams {
        CpuParams::preset(self)
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        })
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError { name: s.to_string() }),
        }
    }
}

/// Beam truncation: keep the first `width` ordered moves once a node has
/// more than `threshold` candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Beam {
    pub width: usize,
    pub threshold: usize,
}

/// Heuristic weights and search shape for one difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuParams {
    /// Jitter magnitude for search; selection span for easy
    pub randomness: f64,
    /// Kept with the easy preset; easy play filters dangerous moves instead
    pub danger_penalty: f64,
    pub corner_weight: f64,
    pub edge_weight: f64,
    pub flip_weight: f64,
    pub reach_block_weight: f64,
    pub bingo_bonus: f64,
    pub material_weight: f64,
    /// Plies of minimax; 0 selects the easy picker
    pub depth: u8,
    pub beam: Option<Beam>,
    pub alpha_beta: bool,
}

impl CpuParams {
    pub const EASY: CpuParams = CpuParams {
        randomness: 1.0,
        danger_penalty: 18.0,
        corner_weight: 0.0,
        edge_weight: 0.0,
        flip_weight: 0.0,
        reach_block_weight: 0.0,
        bingo_bonus: 0.0,
        material_weight: 0.0,
        depth: 0,
        beam: None,
        alpha_beta: false,
    };

    pub const NORMAL: CpuParams = CpuParams {
        randomness: 0.1,
        danger_penalty: 0.0,
        corner_weight: 8.0,
        edge_weight: 2.0,
        flip_weight: 0.9,
        reach_block_weight: 10.0,
        bingo_bonus: 12.0,
        material_weight: 0.2,
        depth: 2,
        beam: None,
        alpha_beta: false,
    };

    pub const HARD: CpuParams = CpuParams {
        randomness: 0.08,
        danger_penalty: 0.0,
        corner_weight: 10.0,
        edge_weight: 3.0,
        flip_weight: 1.2,
        reach_block_weight: 12.0,
        bingo_bonus: 14.0,
        material_weight: 0.28,
        depth: 3,
        beam: Some(Beam {
            width: 8,
            threshold: 10,
        }),
        alpha_beta: true,
    };

    pub fn preset(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Normal => Self::NORMAL,
            Difficulty::Hard => Self::HARD,
        }
    }

    /// Whether these parameters run the minimax search
    #[inline]
    pub fn uses_search(&self) -> bool {
        self.depth > 0
    }
}

impl Default for CpuParams {
    fn default() -> Self {
        Self::NORMAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse_and_display() {
        for d in Difficulty::ALL {
            assert_eq!(d.to_string().parse::<Difficulty>(), Ok(d));
        }
        assert_eq!(" Hard ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_presets() {
        assert!(!Difficulty::Easy.params().uses_search());
        assert_eq!(Difficulty::Normal.params().depth, 2);
        let hard = Difficulty::Hard.params();
        assert_eq!(hard.depth, 3);
        assert!(hard.alpha_beta);
        assert_eq!(
            hard.beam,
            Some(Beam {
                width: 8,
                threshold: 10
            })
        );
    }

    #[test]
    fn test_difficulty_serde_names() {
        #[derive(Deserialize)]
        struct Wrap {
            d: Difficulty,
        }
        let w: Wrap = toml::from_str("d = \"easy\"").unwrap();
        assert_eq!(w.d, Difficulty::Easy);
    }
}
