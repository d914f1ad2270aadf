//! Match session for the Revingo GUI
//!
//! Wraps the authoritative [`GameState`] with everything the front end needs
//! around it: who plays which side, the CPU worker thread, the reverse-item
//! toggle and a short log of what happened.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::{CpuAction, CpuEngine, MoveResult};
use crate::error::GameError;
use crate::eval::Difficulty;
use crate::game::{ActionKind, GameState, Phase, TurnReport};
use crate::random::RandomSource;
use crate::rules::BonusTransition;
use crate::{Player, Pos};

/// Lines kept in the message log
const MAX_MESSAGES: usize = 8;

/// Game mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Human against the CPU
    VsCpu { human: Player },
    /// Two humans on one screen
    HotSeat,
}

impl GameMode {
    fn from_config(config: &Config) -> Self {
        if config.cpu_enabled {
            GameMode::VsCpu {
                human: Player::Black,
            }
        } else {
            GameMode::HotSeat
        }
    }
}

type BoxedRandom = Box<dyn RandomSource + Send>;

/// What the worker thread hands back
struct CpuReply {
    action: Option<CpuAction>,
    stats: Option<MoveResult>,
    rng: BoxedRandom,
}

/// CPU computation state
enum CpuState {
    Idle,
    Thinking {
        receiver: Receiver<CpuReply>,
        start_time: Instant,
    },
}

pub struct Session {
    game: GameState,
    mode: GameMode,
    difficulty: Difficulty,
    /// Board clicks target an opponent stone for a reverse item
    reverse_mode: bool,
    last_cpu_result: Option<MoveResult>,
    cpu_thinking_time: Option<Duration>,
    messages: VecDeque<String>,
    cpu_state: CpuState,
    stop: Arc<AtomicBool>,
    /// Lent to the worker while the CPU thinks
    rng: Option<BoxedRandom>,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            game: GameState::new(),
            mode: GameMode::from_config(&config),
            difficulty: config.difficulty,
            reverse_mode: false,
            last_cpu_result: None,
            cpu_thinking_time: None,
            messages: VecDeque::new(),
            cpu_state: CpuState::Idle,
            stop: Arc::new(AtomicBool::new(false)),
            rng: Some(config.random_source()),
            config,
        }
    }

    #[inline]
    pub fn game(&self) -> &GameState {
        &self.game
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[inline]
    pub fn reverse_mode(&self) -> bool {
        self.reverse_mode
    }

    #[inline]
    pub fn last_cpu_result(&self) -> Option<&MoveResult> {
        self.last_cpu_result.as_ref()
    }

    #[inline]
    pub fn cpu_thinking_time(&self) -> Option<Duration> {
        self.cpu_thinking_time
    }

    /// Most recent first
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().rev().map(String::as_str)
    }

    /// Start a fresh match, abandoning any CPU search in flight
    pub fn reset(&mut self) {
        self.cancel_cpu();
        self.game.reset();
        self.reverse_mode = false;
        self.last_cpu_result = None;
        self.cpu_thinking_time = None;
        self.messages.clear();
        info!(mode = ?self.mode, difficulty = %self.difficulty, "new game");
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }

    /// Takes effect from the next CPU turn
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if difficulty == self.difficulty {
            return;
        }
        self.cancel_cpu();
        self.difficulty = difficulty;
        self.push_message(format!("Difficulty: {difficulty}"));
    }

    pub fn cpu_side(&self) -> Option<Player> {
        match self.mode {
            GameMode::VsCpu { human } => Some(human.opponent()),
            GameMode::HotSeat => None,
        }
    }

    pub fn is_cpu_turn(&self) -> bool {
        !self.game.is_game_over() && self.cpu_side() == Some(self.game.turn())
    }

    pub fn is_human_turn(&self) -> bool {
        !self.game.is_game_over() && !self.is_cpu_turn()
    }

    pub fn is_cpu_thinking(&self) -> bool {
        matches!(self.cpu_state, CpuState::Thinking { .. })
    }

    pub fn cpu_thinking_elapsed(&self) -> Option<Duration> {
        match &self.cpu_state {
            CpuState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            CpuState::Idle => None,
        }
    }

    /// Human input is accepted
    pub fn accepts_input(&self) -> bool {
        self.is_human_turn() && !self.is_cpu_thinking()
    }

    /// A board click: placement, or reverse target when the toggle is on
    pub fn click(&mut self, pos: Pos) {
        if !self.accepts_input() {
            return;
        }
        let result = if self.reverse_mode {
            self.game.use_reverse_item(pos)
        } else {
            self.game.place_move(pos)
        };
        self.reverse_mode = false;
        self.record(result);
    }

    pub fn toggle_reverse(&mut self) {
        if self.reverse_mode {
            self.reverse_mode = false;
        } else if self.accepts_input() && self.game.can_use_reverse() {
            self.reverse_mode = true;
        } else {
            self.push_message("No reverse item to use".to_string());
        }
    }

    pub fn use_lightning(&mut self) {
        if !self.accepts_input() {
            return;
        }
        let Some(rng) = self.rng.as_mut() else {
            return;
        };
        let result = self.game.use_lightning_item(rng);
        self.record(result);
    }

    pub fn declare_game_over(&mut self) {
        if !self.accepts_input() {
            return;
        }
        match self.game.declare_game_over() {
            Ok(outcome) => self.push_message(format!("Game over: {outcome}")),
            Err(err) => self.push_message(err.to_string()),
        }
    }

    fn engine(&self, side: Player) -> CpuEngine {
        CpuEngine::new(self.difficulty)
            .with_params(self.config.weights.apply(self.difficulty.params()))
            .with_side(side)
            .with_time_limit(self.config.time_limit())
            .with_stop_flag(Arc::clone(&self.stop))
    }

    /// Hand the current position to a worker thread
    pub fn start_cpu_thinking(&mut self) {
        if !self.is_cpu_turn() || self.is_cpu_thinking() {
            return;
        }
        let Some(side) = self.cpu_side() else {
            return;
        };
        let Some(mut rng) = self.rng.take() else {
            return;
        };

        let engine = self.engine(side);
        let game = self.game.clone();
        let (tx, rx) = channel();

        thread::spawn(move || {
            let reply = if game.phase() == Phase::AwaitingLightning || game.is_deadlocked() {
                CpuReply {
                    action: engine.plan(&game, &mut rng),
                    stats: None,
                    rng,
                }
            } else {
                let stats = engine.choose_move_with_stats(&game, &mut rng);
                CpuReply {
                    action: stats.best_move.map(CpuAction::Place),
                    stats: Some(stats),
                    rng,
                }
            };
            let _ = tx.send(reply);
        });

        self.cpu_state = CpuState::Thinking {
            receiver: rx,
            start_time: Instant::now(),
        };
    }

    /// Apply the CPU's action once the worker has answered
    pub fn check_cpu_result(&mut self) {
        let (reply, elapsed) = match &self.cpu_state {
            CpuState::Thinking {
                receiver,
                start_time,
            } => match receiver.try_recv() {
                Ok(reply) => (reply, start_time.elapsed()),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    warn!("cpu worker exited without a reply");
                    self.cpu_state = CpuState::Idle;
                    self.rng = Some(self.config.random_source());
                    self.push_message("CPU error".to_string());
                    return;
                }
            },
            CpuState::Idle => return,
        };

        self.cpu_state = CpuState::Idle;
        self.rng = Some(reply.rng);
        self.cpu_thinking_time = Some(elapsed);
        if reply.stats.is_some() {
            self.last_cpu_result = reply.stats;
        }
        debug!(action = ?reply.action, elapsed_ms = elapsed.as_millis() as u64, "cpu replied");

        match reply.action {
            Some(action) => self.apply_cpu_action(action),
            None => self.push_message("CPU could not find a move".to_string()),
        }
    }

    fn apply_cpu_action(&mut self, action: CpuAction) {
        match action {
            CpuAction::Place(pos) => {
                let result = self.game.place_move(pos);
                self.record(result);
            }
            CpuAction::Lightning => {
                let Some(rng) = self.rng.as_mut() else {
                    return;
                };
                let result = self.game.use_lightning_item(rng);
                self.record(result);
            }
            CpuAction::DeclareGameOver => match self.game.declare_game_over() {
                Ok(outcome) => self.push_message(format!("Game over: {outcome}")),
                Err(err) => self.push_message(err.to_string()),
            },
        }
    }

    /// Stop a running search and forget its answer
    fn cancel_cpu(&mut self) {
        if !self.is_cpu_thinking() {
            return;
        }
        self.stop.store(true, Ordering::Relaxed);
        self.stop = Arc::new(AtomicBool::new(false));
        self.cpu_state = CpuState::Idle;
        // The worker still owns the lent generator
        self.rng = Some(self.config.random_source());
        debug!("cpu search cancelled");
    }

    fn record(&mut self, result: Result<TurnReport, GameError>) {
        match result {
            Ok(report) => {
                for line in describe(&report, &self.game) {
                    self.push_message(line);
                }
            }
            Err(err) => self.push_message(err.to_string()),
        }
    }

    fn push_message(&mut self, message: String) {
        if self.messages.len() == MAX_MESSAGES {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }
}

/// Log lines for one turn, in the order things happened
fn describe(report: &TurnReport, game: &GameState) -> Vec<String> {
    let actor = report.actor;
    let mut lines = Vec::new();

    lines.push(match report.action {
        ActionKind::Place => format!(
            "{actor} plays {}, flipping {}",
            report.placed.first().map_or_else(String::new, Pos::to_string),
            report.flipped.len()
        ),
        ActionKind::Reverse => format!("{actor} reverses {} stones", report.flipped.len()),
        ActionKind::Lightning => {
            format!("{actor} strikes {} cells with lightning", report.placed.len())
        }
    });

    if report.bonus_gain > 0 {
        lines.push(format!("Bonus placement +{}", report.bonus_gain));
    }
    let resolution = &report.resolution;
    if resolution.lines > 0 {
        lines.push(format!(
            "Bingo! {} line(s), {} cells cleared, +{}",
            resolution.lines, resolution.cells, resolution.gain
        ));
    }
    if report.reverse_items_earned > 0 {
        lines.push(format!("{actor} earns {} reverse item(s)", report.reverse_items_earned));
    }
    match report.bonus {
        BonusTransition::Activated => lines.push(format!("{actor} bonus window opens")),
        BonusTransition::Expired => lines.push(format!("{actor} bonus window closes")),
        _ => {}
    }
    if report.passed {
        let passer = match report.action {
            ActionKind::Lightning => actor,
            ActionKind::Place | ActionKind::Reverse => actor.opponent(),
        };
        lines.push(format!("{passer} has no move and passes"));
    }
    match report.phase {
        Phase::AwaitingLightning => {
            lines.push(format!("Both sides stuck: {} may use lightning", game.turn()));
        }
        Phase::GameOver => {
            if let Some(outcome) = game.outcome() {
                lines.push(format!("Game over: {outcome}"));
            }
        }
        Phase::Playing => {}
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hot_seat() -> Session {
        Session::new(Config {
            cpu_enabled: false,
            seed: Some(3),
            ..Config::default()
        })
    }

    #[test]
    fn test_mode_from_config() {
        let session = hot_seat();
        assert_eq!(session.mode(), GameMode::HotSeat);
        assert_eq!(session.cpu_side(), None);
        assert!(session.accepts_input());

        let session = Session::new(Config::default());
        assert_eq!(session.cpu_side(), Some(Player::White));
        assert!(session.is_human_turn());
    }

    #[test]
    fn test_hot_seat_click() {
        let mut session = hot_seat();
        session.click(Pos::new(3, 2));
        assert_eq!(session.game().turn(), Player::White);
        assert!(session.messages().next().is_some());

        // Illegal click leaves the turn alone and logs the error
        session.click(Pos::new(0, 0));
        assert_eq!(session.game().turn(), Player::White);
        assert_eq!(session.messages().count(), 2);
    }

    #[test]
    fn test_reverse_toggle_needs_items() {
        let mut session = hot_seat();
        session.toggle_reverse();
        assert!(!session.reverse_mode());
        assert_eq!(session.messages().next(), Some("No reverse item to use"));
    }

    #[test]
    fn test_message_log_is_bounded() {
        let mut session = hot_seat();
        for _ in 0..MAX_MESSAGES + 3 {
            session.click(Pos::new(0, 0));
        }
        assert_eq!(session.messages().count(), MAX_MESSAGES);
    }

    #[test]
    fn test_cpu_replies_on_worker_thread() {
        let mut session = Session::new(Config {
            seed: Some(11),
            ..Config::default()
        });
        session.click(Pos::new(3, 2));
        assert!(session.is_cpu_turn());

        session.start_cpu_thinking();
        assert!(session.is_cpu_thinking());
        assert!(!session.accepts_input());

        let deadline = Instant::now() + Duration::from_secs(30);
        while session.is_cpu_thinking() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
            session.check_cpu_result();
        }

        assert!(!session.is_cpu_thinking());
        assert_eq!(session.game().turn(), Player::Black);
        assert!(session.last_cpu_result().is_some());
        assert!(session.cpu_thinking_time().is_some());
    }

    #[test]
    fn test_reset_cancels_cpu() {
        let mut session = Session::new(Config::default());
        session.click(Pos::new(3, 2));
        session.start_cpu_thinking();
        session.reset();
        assert!(!session.is_cpu_thinking());
        assert_eq!(session.game().turn(), Player::Black);
        assert_eq!(session.messages().count(), 0);

        // A fresh generator is ready for the next search
        session.click(Pos::new(3, 2));
        session.start_cpu_thinking();
        assert!(session.is_cpu_thinking());
    }
}
