//! Round processing: applies admitted actions and advances the stage cursor
//! until the game has to wait for somebody.

use std::collections::VecDeque;

use crate::actions::{Action, ActionKind, ActionPrototype};
use crate::constraints::validate_constraints;
use crate::errors::{ActionError, AdmissionError, ProcessingError};
use crate::game::Game;
use crate::logger::{HistoryEntry, RoundLogger};
use crate::repository::GameRepository;
use crate::stages::Stage;

/// How a `run()` ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RunStatus {
    /// Blocked on a performer; the game was checked and flushed.
    Waiting,
    /// A stop condition fired; the game was flushed without the consistency check.
    ForcedStop,
}

/// Result of evaluating the stage under the cursor.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StageOutcome {
    Waiting,
    Completed { stage: Stage, premature: bool },
}

fn not_legal(game: &Game, action: &Action) -> ActionError {
    ActionError::NotLegal {
        action: action.kind.name(),
        player: game
            .player(action.player)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| action.player.to_string()),
        stage: game.stage().to_string(),
    }
}

/// Drives one game. Not reentrant; one processor per game object at a time.
pub struct Processor<'a> {
    game: &'a mut Game,
    queue: VecDeque<Action>,
    repository: Option<&'a mut dyn GameRepository>,
    logger: Option<&'a mut RoundLogger>,
    acted: usize,
}

impl<'a> Processor<'a> {
    pub fn new(game: &'a mut Game) -> Self {
        Self {
            game,
            queue: VecDeque::new(),
            repository: None,
            logger: None,
            acted: 0,
        }
    }

    pub fn with_repository(mut self, repository: &'a mut dyn GameRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_logger(mut self, logger: &'a mut RoundLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn game(&self) -> &Game {
        self.game
    }

    /// Legal moves right now.
    pub fn possible_actions(&self) -> Vec<ActionPrototype> {
        self.game.stage().possible_actions(self.game)
    }

    /// Admits an action if one of the current prototypes matches it. An
    /// action built against another game object is a fatal error.
    pub fn add(&mut self, action: Action) -> Result<&mut Self, AdmissionError> {
        self.game
            .check_continuity(action.game)
            .map_err(ProcessingError::from)?;
        if !self.possible_actions().iter().any(|p| p.matches(&action)) {
            return Err(not_legal(self.game, &action).into());
        }
        self.queue.push_back(action);
        Ok(self)
    }

    pub fn run(&mut self) -> Result<RunStatus, ProcessingError> {
        self.acted = 0;
        loop {
            self.apply_queued()?;
            if self.try_stage()? == StageOutcome::Waiting {
                return self.finish(RunStatus::Waiting);
            }
        }
    }

    fn apply_queued(&mut self) -> Result<(), ProcessingError> {
        while let Some(action) = self.queue.pop_front() {
            self.apply(action)?;
        }
        Ok(())
    }

    /// An action that stopped being legal after admission is fatal.
    fn apply(&mut self, action: Action) -> Result<(), ProcessingError> {
        self.game.check_continuity(action.game)?;
        if !self.possible_actions().iter().any(|p| p.matches(&action)) {
            return Err(ProcessingError::IllegalQueuedAction(not_legal(self.game, &action)));
        }
        action
            .act(self.game)
            .map_err(ProcessingError::IllegalQueuedAction)?;
        self.acted += 1;
        Ok(())
    }

    /// Executes the current stage if it can run, then moves the cursor on.
    pub fn try_stage(&mut self) -> Result<StageOutcome, ProcessingError> {
        let stage = self.game.stage();
        let premature = stage.is_premature_final(self.game);
        if !premature && !stage.check_requirements(self.game) {
            self.game.status = stage.status(self.game);
            return Ok(StageOutcome::Waiting);
        }
        let message = stage.execute(self.game)?;
        tracing::debug!(game_id = self.game.id, stage = %stage, "stage executed");
        self.game
            .push_history(HistoryEntry::stage(stage.name().as_str(), message));
        match stage {
            Stage::Setup => {
                tracing::info!(game_id = self.game.id, round = self.game.rounds_counter, "round begins")
            }
            Stage::Opposing => self.record_round()?,
            Stage::TearDown => {
                tracing::info!(game_id = self.game.id, rounds = self.game.rounds_counter - 1, "round finished")
            }
            _ => {}
        }
        let next = if premature {
            tracing::info!(game_id = self.game.id, stage = %stage, "premature final, jumping to opposing");
            self.game.opposing_index()
        } else {
            self.game.stage_index() + 1
        };
        self.game.set_stage_index(next);
        Ok(StageOutcome::Completed { stage, premature })
    }

    fn record_round(&mut self) -> Result<(), ProcessingError> {
        if let Some(logger) = self.logger.as_deref_mut() {
            logger
                .record(self.game)
                .map_err(|e| ProcessingError::RoundLog(e.to_string()))?;
        }
        Ok(())
    }

    fn finish(&mut self, status: RunStatus) -> Result<RunStatus, ProcessingError> {
        if status == RunStatus::Waiting {
            validate_constraints(self.game)?;
        }
        if let Some(repository) = self.repository.as_deref_mut() {
            let pending = self.game.is_pending_save() || self.game.pending_players().next().is_some();
            if pending {
                repository.save(self.game)?;
                self.game.clear_pending();
            }
        }
        Ok(status)
    }
}

/// An action supplied to the auto processor, tried whenever the cursor is on
/// its stage until it is accepted.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScriptedAction {
    pub stage: Option<Stage>,
    pub player: String,
    pub kind: ActionKind,
    pub value: Option<u32>,
}

impl ScriptedAction {
    pub fn new(stage: Stage, player: &str, kind: ActionKind) -> Self {
        Self {
            stage: Some(stage),
            player: player.to_string(),
            kind,
            value: None,
        }
    }

    pub fn bet(stage: Stage, player: &str, value: u32) -> Self {
        Self {
            value: Some(value),
            ..Self::new(stage, player, ActionKind::PlaceBet)
        }
    }

    fn build(&self, game: &Game) -> Result<Action, ActionError> {
        let id = game
            .player_by_name(&self.player)
            .map(|p| p.id)
            .ok_or_else(|| ActionError::UnknownPlayer(self.player.clone()))?;
        match (self.kind, self.value) {
            (ActionKind::PlaceBet, Some(value)) => Action::bet(game, id, value),
            (kind, _) => Action::new(game, id, kind),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StopCondition {
    BeforeStage(Stage),
    AfterStage(Stage),
    /// Stops before applying an action the pattern covers.
    BeforeAction(ActionPrototype),
    AfterAction(ActionPrototype),
    AfterActionsAmount(usize),
    /// Stops once `rounds_counter` exceeds the given number of rounds.
    AfterRoundsAmount(u32),
}

/// Plays a game by itself: caller supplied actions first, otherwise the
/// first legal move at its smallest value.
pub struct AutoProcessor<'a> {
    inner: Processor<'a>,
    stop: Option<StopCondition>,
    scripted: Vec<ScriptedAction>,
    rounds_ceiling: Option<u32>,
}

impl<'a> AutoProcessor<'a> {
    pub fn new(game: &'a mut Game) -> Self {
        Self {
            inner: Processor::new(game),
            stop: None,
            scripted: Vec::new(),
            rounds_ceiling: None,
        }
    }

    pub fn with_repository(mut self, repository: &'a mut dyn GameRepository) -> Self {
        self.inner = self.inner.with_repository(repository);
        self
    }

    pub fn with_logger(mut self, logger: &'a mut RoundLogger) -> Self {
        self.inner = self.inner.with_logger(logger);
        self
    }

    /// Replaces the stop condition; only one is active per run.
    pub fn stop(&mut self, condition: StopCondition) -> &mut Self {
        self.stop = Some(condition);
        self
    }

    pub fn with_actions(&mut self, actions: Vec<ScriptedAction>) -> &mut Self {
        self.scripted = actions;
        self
    }

    /// Rounds one `run()` may play, counted from the round it started in.
    pub fn rounds_ceiling(&mut self, ceiling: u32) -> &mut Self {
        self.rounds_ceiling = Some(ceiling);
        self
    }

    pub fn game(&self) -> &Game {
        self.inner.game()
    }

    pub fn add(&mut self, action: Action) -> Result<&mut Self, AdmissionError> {
        self.inner.add(action)?;
        Ok(self)
    }

    fn ceiling(&self) -> u32 {
        match (self.rounds_ceiling, &self.stop) {
            (Some(ceiling), _) => ceiling,
            (None, Some(StopCondition::AfterRoundsAmount(rounds))) => *rounds,
            (None, _) => self.game().players().len().max(1) as u32,
        }
    }

    pub fn run(&mut self) -> Result<RunStatus, ProcessingError> {
        if let Some(StopCondition::AfterRoundsAmount(0)) = self.stop {
            return Err(ProcessingError::InvalidStop("rounds amount must be positive".into()));
        }
        let status = self.run_until_halt()?;
        let status = self.inner.finish(status)?;
        if !self.scripted.is_empty() {
            return Err(ProcessingError::UnconsumedActions(self.scripted.len()));
        }
        Ok(status)
    }

    fn run_until_halt(&mut self) -> Result<RunStatus, ProcessingError> {
        self.inner.acted = 0;
        let first_round = self.game().rounds_counter;
        let ceiling = self.ceiling();
        let mut moved = false;
        loop {
            self.inner.apply_queued()?;
            if let Some(StopCondition::AfterActionsAmount(amount)) = self.stop {
                if self.inner.acted >= amount {
                    return Ok(RunStatus::ForcedStop);
                }
            }
            let stage = self.game().stage();
            if moved && self.stop == Some(StopCondition::BeforeStage(stage)) {
                return Ok(RunStatus::ForcedStop);
            }
            match self.inner.try_stage()? {
                StageOutcome::Completed { stage, .. } => {
                    moved = true;
                    if self.stop == Some(StopCondition::AfterStage(stage)) {
                        return Ok(RunStatus::ForcedStop);
                    }
                    if stage == Stage::TearDown {
                        let rounds = self.game().rounds_counter;
                        if let Some(StopCondition::AfterRoundsAmount(amount)) = self.stop {
                            if rounds > amount {
                                return Ok(RunStatus::ForcedStop);
                            }
                        }
                        if rounds - first_round > ceiling {
                            return Err(ProcessingError::TooManyRounds {
                                rounds: rounds - first_round,
                                ceiling,
                            });
                        }
                    }
                }
                StageOutcome::Waiting => {
                    let Some((action, prototype)) = self.next_action()? else {
                        return Ok(RunStatus::Waiting);
                    };
                    let stage = self.game().stage();
                    if let Some(StopCondition::BeforeAction(pattern)) = &self.stop {
                        if pattern.covers(&prototype, stage) {
                            return Ok(RunStatus::ForcedStop);
                        }
                    }
                    self.inner.apply(action)?;
                    if let Some(StopCondition::AfterAction(pattern)) = &self.stop {
                        if pattern.covers(&prototype, stage) {
                            return Ok(RunStatus::ForcedStop);
                        }
                    }
                }
            }
        }
    }

    fn next_action(&mut self) -> Result<Option<(Action, ActionPrototype)>, ProcessingError> {
        let game = self.inner.game();
        let stage = game.stage();
        let prototypes = stage.possible_actions(game);
        let mut picked = None;
        for (index, scripted) in self.scripted.iter().enumerate() {
            if scripted.stage.is_some_and(|s| s != stage) {
                continue;
            }
            match scripted.build(game) {
                Ok(action) => match prototypes.iter().find(|p| p.matches(&action)) {
                    Some(prototype) => {
                        picked = Some((index, action, prototype.clone()));
                        break;
                    }
                    None => tracing::warn!(
                        game_id = game.id,
                        stage = %stage,
                        player = %scripted.player,
                        action = %scripted.kind,
                        "supplied action is not legal yet"
                    ),
                },
                Err(error) => tracing::warn!(
                    game_id = game.id,
                    stage = %stage,
                    player = %scripted.player,
                    %error,
                    "supplied action rejected, will retry"
                ),
            }
        }
        if let Some((index, action, prototype)) = picked {
            self.scripted.remove(index);
            return Ok(Some((action, prototype)));
        }
        let Some(prototype) = prototypes
            .into_iter()
            .find(|p| p.kind != ActionKind::LeaveGame)
        else {
            return Ok(None);
        };
        let action = prototype
            .to_action(game, None)
            .map_err(ProcessingError::IllegalQueuedAction)?;
        Ok(Some((action, prototype)))
    }
}
