//! Authoritative match state and the turn pipeline
//!
//! [`GameState`] owns the board and every per-player counter. All changes go
//! through the mutators below, which run the full post-move pipeline:
//! deletions, turn switch and pass, the bonus gauge, then the deadlock rule.
//! A mutator that returns `Err` leaves the state exactly as it was.

use std::ops::{Index, IndexMut};

use tracing::{debug, instrument, warn};

use crate::board::{Board, Player, Pos};
use crate::error::GameError;
use crate::random::RandomSource;
use crate::rules::{
    apply_lightning, apply_move, apply_reverse, has_legal_move, legal_moves_for,
    lightning_targets, placement_bonus, reach_for, resolve_deletions, BonusGauge,
    BonusTransition, MoveSet, ReachInfo, Resolution, INITIAL_LIGHTNING_ITEMS, LIGHTNING_TARGETS,
    REVERSE_ITEM_CAP,
};

/// A value for each player, indexable by [`Player`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PerPlayer<T>([T; 2]);

impl<T: Copy> PerPlayer<T> {
    pub fn splat(value: T) -> Self {
        Self([value; 2])
    }
}

impl<T> Index<Player> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: Player) -> &T {
        &self.0[player.index()]
    }
}

impl<T> IndexMut<Player> for PerPlayer<T> {
    fn index_mut(&mut self, player: Player) -> &mut T {
        &mut self.0[player.index()]
    }
}

/// Where the match stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Playing,
    /// Both sides are out of moves and the side to move holds lightning.
    /// Only [`GameState::use_lightning_item`] and
    /// [`GameState::declare_game_over`] are accepted.
    AwaitingLightning,
    GameOver,
}

/// Final result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Player),
    Draw,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(p) => write!(f, "{p} wins"),
            Outcome::Draw => f.write_str("draw"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Place,
    Reverse,
    Lightning,
}

/// Most recent placement or reverse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub pos: Pos,
    pub player: Player,
    pub flips: usize,
    pub kind: ActionKind,
}

/// Everything a mutator did, for presentation.
///
/// The state is already consistent without reading this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub actor: Player,
    pub action: ActionKind,
    /// Placed, converted or struck cells
    pub placed: Vec<Pos>,
    /// Cells captured by the action
    pub flipped: Vec<Pos>,
    /// Bonus placement score
    pub bonus_gain: u32,
    pub resolution: Resolution,
    pub reverse_items_earned: u32,
    pub bonus: BonusTransition,
    /// The next player had no move and was skipped
    pub passed: bool,
    pub phase: Phase,
}

/// Full match state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    board: Board,
    turn: Player,
    scores: PerPlayer<u32>,
    lightning: PerPlayer<u32>,
    reverse: PerPlayer<u32>,
    bonus: PerPlayer<BonusGauge>,
    legal: MoveSet,
    reach: ReachInfo,
    last_move: Option<LastMove>,
    phase: Phase,
    outcome: Option<Outcome>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh match: opening board, Black to move, one lightning item each
    pub fn new() -> Self {
        let mut state = Self {
            board: Board::initial(),
            turn: Player::Black,
            scores: PerPlayer::default(),
            lightning: PerPlayer::splat(INITIAL_LIGHTNING_ITEMS),
            reverse: PerPlayer::default(),
            bonus: PerPlayer::default(),
            legal: MoveSet::default(),
            reach: ReachInfo::default(),
            last_move: None,
            phase: Phase::Playing,
            outcome: None,
        };
        state.reset_board();
        state
    }

    /// Start from an arbitrary position with fresh counters.
    ///
    /// `turn` is kept even when that side has no move; the deadlock rule
    /// still applies.
    pub fn from_position(board: Board, turn: Player) -> Self {
        let mut state = Self::new();
        state.board = board;
        state.turn = turn;
        state.recompute();
        state.settle_deadlock();
        state
    }

    /// Restart the match: board, scores, items and gauges
    pub fn reset(&mut self) {
        self.scores = PerPlayer::default();
        self.lightning = PerPlayer::splat(INITIAL_LIGHTNING_ITEMS);
        self.reverse = PerPlayer::default();
        self.bonus = PerPlayer::default();
        self.reset_board();
    }

    /// New round on the opening board. Scores, items and gauges carry over.
    pub fn reset_board(&mut self) {
        self.board = Board::initial();
        self.turn = Player::Black;
        self.last_move = None;
        self.phase = Phase::Playing;
        self.outcome = None;
        self.recompute();
        self.advance_turn_or_pass();
    }

    // ---- queries ----

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Legal placements for the side to move
    #[inline]
    pub fn legal_moves(&self) -> &MoveSet {
        &self.legal
    }

    /// Reach lines for the side to move
    #[inline]
    pub fn reach(&self) -> &ReachInfo {
        &self.reach
    }

    #[inline]
    pub fn score(&self, player: Player) -> u32 {
        self.scores[player]
    }

    #[inline]
    pub fn lightning_items(&self, player: Player) -> u32 {
        self.lightning[player]
    }

    #[inline]
    pub fn reverse_items(&self, player: Player) -> u32 {
        self.reverse[player]
    }

    #[inline]
    pub fn bonus(&self, player: Player) -> &BonusGauge {
        &self.bonus[player]
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn last_move(&self) -> Option<&LastMove> {
        self.last_move.as_ref()
    }

    /// Neither side can place a stone
    pub fn is_deadlocked(&self) -> bool {
        self.legal.is_empty() && !has_legal_move(&self.board, self.turn.opponent())
    }

    /// Whether the side to move may use lightning right now
    pub fn can_use_lightning(&self) -> bool {
        self.phase != Phase::GameOver && self.lightning[self.turn] > 0 && self.is_deadlocked()
    }

    /// Whether the side to move may use a reverse item right now
    pub fn can_use_reverse(&self) -> bool {
        self.phase == Phase::Playing && self.reverse[self.turn] > 0
    }

    // ---- turn plumbing ----

    fn recompute(&mut self) {
        self.legal = legal_moves_for(&self.board, self.turn);
        self.reach = reach_for(&self.board, self.turn);
    }

    /// Skip the side to move when it has no placement and the board still
    /// has an empty cell. Returns whether a pass happened.
    pub fn advance_turn_or_pass(&mut self) -> bool {
        if !self.legal.is_empty() || self.board.is_full() {
            return false;
        }
        debug!(player = %self.turn, "no legal move, passing");
        self.turn = self.turn.opponent();
        self.recompute();
        true
    }

    fn check_on_board(pos: Pos) -> Result<(), GameError> {
        if pos.is_on_board() {
            return Ok(());
        }
        warn!(x = pos.x, y = pos.y, "off-board target rejected");
        Err(GameError::OutOfBounds {
            x: i32::from(pos.x),
            y: i32::from(pos.y),
        })
    }

    fn check_open(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::Playing => Ok(()),
            Phase::GameOver => Err(GameError::GameOver),
            Phase::AwaitingLightning => Err(GameError::AwaitingChoice { player: self.turn }),
        }
    }

    /// Clear completed lines, crediting `player` with score and reverse
    /// items. Returns the resolution and the items actually granted.
    fn resolve_for(&mut self, player: Player) -> (Resolution, u32) {
        let resolution = resolve_deletions(&mut self.board);
        let mut earned = 0;
        for step in &resolution.steps {
            let before = self.reverse[player];
            self.reverse[player] = (before + step.line_count).min(REVERSE_ITEM_CAP);
            earned += self.reverse[player] - before;
        }
        self.scores[player] += resolution.gain;
        (resolution, earned)
    }

    /// Both sides stuck: hand the choice to whoever holds lightning, or end
    /// the game.
    fn settle_deadlock(&mut self) {
        if !self.is_deadlocked() {
            self.phase = Phase::Playing;
            return;
        }
        let current = self.turn;
        let opponent = current.opponent();
        if self.lightning[current] > 0 {
            debug!(player = %current, "deadlock, awaiting lightning choice");
            self.phase = Phase::AwaitingLightning;
        } else if self.lightning[opponent] > 0 {
            debug!(player = %opponent, "deadlock, lightning passes to opponent");
            self.turn = opponent;
            self.recompute();
            self.phase = Phase::AwaitingLightning;
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        let black = self.scores[Player::Black];
        let white = self.scores[Player::White];
        let outcome = match black.cmp(&white) {
            std::cmp::Ordering::Greater => Outcome::Winner(Player::Black),
            std::cmp::Ordering::Less => Outcome::Winner(Player::White),
            std::cmp::Ordering::Equal => Outcome::Draw,
        };
        debug!(black, white, %outcome, "game over");
        self.phase = Phase::GameOver;
        self.outcome = Some(outcome);
        self.reach = ReachInfo::default();
    }

    /// Shared tail of placement and reverse: bonus score, deletions, turn
    /// switch, gauge update, deadlock rule.
    fn finish_move(
        &mut self,
        actor: Player,
        action: ActionKind,
        pos: Pos,
        flipped: Vec<Pos>,
    ) -> TurnReport {
        self.last_move = Some(LastMove {
            pos,
            player: actor,
            flips: flipped.len(),
            kind: action,
        });

        let bonus_gain = if self.bonus[actor].is_active() {
            placement_bonus(self.board.count(actor))
        } else {
            0
        };
        self.scores[actor] += bonus_gain;

        let (resolution, earned) = self.resolve_for(actor);

        self.turn = actor.opponent();
        self.recompute();
        let passed = self.advance_turn_or_pass();

        let bonus = self.bonus[actor].after_turn(resolution.lines);
        self.settle_deadlock();

        debug!(
            player = %actor,
            ?action,
            %pos,
            flips = flipped.len(),
            lines = resolution.lines,
            gain = resolution.gain,
            bonus_gain,
            passed,
            "move resolved"
        );

        TurnReport {
            actor,
            action,
            placed: vec![pos],
            flipped,
            bonus_gain,
            resolution,
            reverse_items_earned: earned,
            bonus,
            passed,
            phase: self.phase,
        }
    }

    // ---- mutators ----

    /// Place a stone for the side to move
    #[instrument(skip(self), fields(player = %self.turn))]
    pub fn place_move(&mut self, pos: Pos) -> Result<TurnReport, GameError> {
        self.check_open()?;
        Self::check_on_board(pos)?;
        let player = self.turn;
        if !self.legal.contains(pos) {
            warn!(%pos, "illegal placement rejected");
            return Err(GameError::IllegalMove { pos, player });
        }

        let flipped = apply_move(&mut self.board, pos, player);
        Ok(self.finish_move(player, ActionKind::Place, pos, flipped))
    }

    /// [`place_move`](Self::place_move) from raw coordinates
    pub fn place_at(&mut self, x: i32, y: i32) -> Result<TurnReport, GameError> {
        let pos = Pos::try_new(x, y).ok_or(GameError::OutOfBounds { x, y })?;
        self.place_move(pos)
    }

    /// Spend a reverse item on the opponent stone at `pos`
    #[instrument(skip(self), fields(player = %self.turn))]
    pub fn use_reverse_item(&mut self, pos: Pos) -> Result<TurnReport, GameError> {
        self.check_open()?;
        Self::check_on_board(pos)?;
        let player = self.turn;
        if self.reverse[player] == 0 {
            warn!("reverse without items rejected");
            return Err(GameError::NoReverseItems { player });
        }

        let flipped = match apply_reverse(&mut self.board, pos, player) {
            Some(flipped) => flipped,
            None => {
                warn!(%pos, "reverse target is not an opponent stone");
                return Err(GameError::NotOpponentStone { pos });
            }
        };
        self.reverse[player] -= 1;
        Ok(self.finish_move(player, ActionKind::Reverse, pos, flipped))
    }

    /// [`use_reverse_item`](Self::use_reverse_item) from raw coordinates
    pub fn reverse_at(&mut self, x: i32, y: i32) -> Result<TurnReport, GameError> {
        let pos = Pos::try_new(x, y).ok_or(GameError::OutOfBounds { x, y })?;
        self.use_reverse_item(pos)
    }

    /// Strike up to five cells at mutual deadlock. The actor keeps the turn.
    #[instrument(skip(self, rng), fields(player = %self.turn))]
    pub fn use_lightning_item<R: RandomSource>(
        &mut self,
        rng: &mut R,
    ) -> Result<TurnReport, GameError> {
        if self.phase == Phase::GameOver {
            return Err(GameError::GameOver);
        }
        let player = self.turn;
        if !self.is_deadlocked() {
            warn!("lightning outside deadlock rejected");
            return Err(GameError::NotDeadlocked);
        }
        if self.lightning[player] == 0 {
            warn!("lightning without items rejected");
            return Err(GameError::NoLightningItems { player });
        }

        let targets = lightning_targets(&self.board, player, LIGHTNING_TARGETS, rng);
        if targets.is_empty() {
            warn!("no lightning target available");
            return Err(GameError::NoLightningTargets);
        }

        self.lightning[player] -= 1;
        apply_lightning(&mut self.board, player, &targets);
        let (resolution, earned) = self.resolve_for(player);

        self.recompute();
        let passed = self.advance_turn_or_pass();
        let bonus = self.bonus[player].after_turn(resolution.lines);
        self.settle_deadlock();

        debug!(
            player = %player,
            targets = targets.len(),
            lines = resolution.lines,
            gain = resolution.gain,
            passed,
            "lightning resolved"
        );

        Ok(TurnReport {
            actor: player,
            action: ActionKind::Lightning,
            placed: targets,
            flipped: Vec::new(),
            bonus_gain: 0,
            resolution,
            reverse_items_earned: earned,
            bonus,
            passed,
            phase: self.phase,
        })
    }

    /// End the match now; the winner is decided by score
    #[instrument(skip(self))]
    pub fn declare_game_over(&mut self) -> Result<Outcome, GameError> {
        if self.phase == Phase::GameOver {
            return Err(GameError::GameOver);
        }
        self.finish();
        self.outcome.ok_or(GameError::GameOver)
    }
}
