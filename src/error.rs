//! Error types

use derive_more::{Display, Error, From};

use crate::board::{Player, Pos};

/// A rejected mutation. The game state is unchanged when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GameError {
    #[display("the game is over")]
    GameOver,

    #[display("coordinates ({x},{y}) are off the board")]
    OutOfBounds { x: i32, y: i32 },

    #[display("{pos} is not a legal move for {player}")]
    IllegalMove { pos: Pos, player: Player },

    #[display("{pos} does not hold an opponent stone")]
    NotOpponentStone { pos: Pos },

    #[display("{player} has no reverse items")]
    NoReverseItems { player: Player },

    #[display("{player} has no lightning items")]
    NoLightningItems { player: Player },

    #[display("lightning needs both players to be out of moves")]
    NotDeadlocked,

    #[display("no cell is available for a lightning strike")]
    NoLightningTargets,

    /// Deadlock reached; only lightning or game over are accepted
    #[display("waiting for {player} to use lightning or end the game")]
    AwaitingChoice { player: Player },
}

/// Failure to load `revingo.toml`
#[derive(Debug, Display, Error, From)]
pub enum ConfigError {
    #[display("failed to read config: {_0}")]
    Io(std::io::Error),

    #[display("failed to parse config: {_0}")]
    Parse(toml::de::Error),
}

/// Unknown difficulty name
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("unknown difficulty '{name}' (expected easy, normal or hard)")]
pub struct ParseDifficultyError {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_messages() {
        let err = GameError::IllegalMove {
            pos: Pos::new(0, 0),
            player: Player::Black,
        };
        assert_eq!(err.to_string(), "(0,0) is not a legal move for Black");
        assert_eq!(
            GameError::OutOfBounds { x: 9, y: -1 }.to_string(),
            "coordinates (9,-1) are off the board"
        );
    }

    #[test]
    fn test_config_error_from_toml() {
        let parse_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(err.to_string().starts_with("failed to parse config"));
    }
}
