//! Live-workout session state machine.
//!
//! A `Session` is an explicit, caller-owned context object for one training
//! run. It owns the workout/set/rest timers, the equipment configuration of
//! the exercise in progress, companion turn-taking, and the accumulators
//! that later feed the finalizer. All mutation happens synchronously inside
//! one operation call; the clock is sampled once per operation.
//!
//! States: `Idle → Configuring → ExercisePreview → SetRunning → Resting →
//! (ExercisePreview | next SetRunning)`. Finishing the workout is the
//! finalizer's job and returns the machine to `Idle`.

use crate::clock::Clock;
use crate::error::{Rejection, Result};
use crate::timer::{IntervalTimer, RestTimer};
use crate::types::{
    BarbellVariant, CompletedExercise, CompletedSet, EquipmentConfig, EquipmentKind, Exercise,
    MuscleGroup, SessionMode, SetKind, Template, TimeBreakdown,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Default rest interval between sets
pub const DEFAULT_REST_SECONDS: u32 = 90;

/// Where the session currently is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Configuring,
    ExercisePreview,
    SetRunning,
    Resting,
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Configuring => "configuring",
            SessionState::ExercisePreview => "previewing an exercise",
            SessionState::SetRunning => "running a set",
            SessionState::Resting => "resting",
        }
    }
}

/// Notifications produced by driving the session forward
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The rest countdown reached zero; the next set has started
    RestCompleted,
}

/// The single in-flight workout
pub struct Session {
    clock: Box<dyn Clock>,
    state: SessionState,
    mode: SessionMode,
    name: String,
    workout_type: String,
    rest_duration_seconds: u32,

    workout_timer: IntervalTimer,
    set_timer: IntervalTimer,
    rest_timer: RestTimer,

    series_seconds: u32,
    rest_seconds: u32,
    skipped_rest_seconds: u32,

    companion_turn: bool,
    companion_since: Option<DateTime<Utc>>,
    companion_wait_seconds: u32,

    completed: Vec<CompletedExercise>,
    current: Option<Exercise>,
    source_template: Option<Uuid>,
}

impl Session {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            state: SessionState::Idle,
            mode: SessionMode::Live,
            name: String::new(),
            workout_type: String::new(),
            rest_duration_seconds: DEFAULT_REST_SECONDS,
            workout_timer: IntervalTimer::default(),
            set_timer: IntervalTimer::default(),
            rest_timer: RestTimer::default(),
            series_seconds: 0,
            rest_seconds: 0,
            skipped_rest_seconds: 0,
            companion_turn: false,
            companion_since: None,
            companion_wait_seconds: 0,
            completed: Vec::new(),
            current: None,
            source_template: None,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Start a new workout, clearing every accumulator, timer and equipment
    /// setting. In `Plan` mode no wall-clock time will accrue.
    pub fn start(&mut self, mode: SessionMode) {
        self.reset();
        self.mode = mode;
        self.state = SessionState::Configuring;
        tracing::info!("Session started in {:?} mode", mode);
    }

    /// Name the workout and set its rest interval
    pub fn configure(
        &mut self,
        name: impl Into<String>,
        workout_type: impl Into<String>,
        rest_seconds: u32,
    ) -> Result<()> {
        self.require_state(SessionState::Configuring, "configure")?;
        self.name = name.into();
        self.workout_type = workout_type.into();
        self.rest_duration_seconds = rest_seconds;
        self.state = SessionState::ExercisePreview;
        Ok(())
    }

    /// Configure the session from a saved template. Plan-mode sessions
    /// started this way save their exercise list back into the template on
    /// finish.
    pub fn configure_from_template(&mut self, template: &Template) -> Result<()> {
        self.configure(
            template.name.clone(),
            template.workout_type.clone(),
            template.rest_seconds,
        )?;
        self.source_template = Some(template.id);
        Ok(())
    }

    /// Open a new exercise. A dangling open exercise with at least one set
    /// is auto-closed first so its equipment context is not lost; one with
    /// zero sets is discarded.
    pub fn begin_exercise(
        &mut self,
        name: impl Into<String>,
        muscle: MuscleGroup,
        equipment: Option<EquipmentConfig>,
    ) -> Result<()> {
        if !matches!(
            self.state,
            SessionState::ExercisePreview | SessionState::SetRunning | SessionState::Resting
        ) {
            return Err(Rejection::InvalidTransition {
                operation: "begin_exercise",
                state: self.state.name(),
            }
            .into());
        }

        let now = self.clock.now();
        if self.rest_timer.is_active() {
            let (rested, skipped) = self.rest_timer.skip(now);
            self.rest_seconds += rested;
            self.skipped_rest_seconds += skipped;
        }
        self.set_timer.reset();

        if let Some(open) = self.current.take() {
            if open.sets.is_empty() {
                tracing::warn!("Discarding open exercise '{}' with no sets", open.name);
            } else {
                self.completed.push(open.into());
            }
        }

        let mut equipment = equipment.unwrap_or_default();
        if equipment.kind == EquipmentKind::Barbell && equipment.barbell.is_none() {
            equipment.barbell = Some(BarbellVariant::Standard);
        }

        let name = name.into();
        tracing::info!("Beginning exercise '{}'", name);
        self.current = Some(Exercise::new(name, muscle, equipment));
        self.state = SessionState::ExercisePreview;
        Ok(())
    }

    /// Start the per-set timer and enter `SetRunning`
    pub fn begin_set(&mut self) -> Result<()> {
        self.require_state(SessionState::ExercisePreview, "begin_set")?;
        if self.current.is_none() {
            return Err(Rejection::NoOpenExercise.into());
        }

        if self.mode == SessionMode::Live {
            let now = self.clock.now();
            self.set_timer.start(now);
        }
        self.state = SessionState::SetRunning;
        Ok(())
    }

    /// Record the running set.
    ///
    /// Rejected when weight and reps are both zero. The real weight adds the
    /// bar's own weight for barbell setups. The first recorded set starts
    /// the workout-level clock. Live sessions transition to `Resting`; plan
    /// sessions bypass rest and stay ready for the next set.
    pub fn finish_set(&mut self, nominal_kg: f64, reps: u32, kind: SetKind) -> Result<&CompletedSet> {
        self.require_state(SessionState::SetRunning, "finish_set")?;
        if self.current.is_none() {
            return Err(Rejection::NoOpenExercise.into());
        }
        if nominal_kg == 0.0 && reps == 0 {
            return Err(Rejection::EmptySet.into());
        }

        let now = self.clock.now();
        let exercise = self.current.as_mut().expect("checked above");

        let real_kg = nominal_kg + exercise.equipment.fixed_weight_kg();
        let duration = self.set_timer.stop(now).max(0) as u32;
        self.set_timer.reset();
        self.series_seconds += duration;

        if self.mode == SessionMode::Live {
            self.workout_timer.start(now);
        }

        exercise.sets.push(CompletedSet {
            nominal_kg,
            real_kg,
            reps,
            duration_seconds: duration,
            kind,
            equipment: exercise.equipment.kind,
        });

        match self.mode {
            SessionMode::Live => {
                self.rest_timer.start(now, self.rest_duration_seconds);
                self.state = SessionState::Resting;
            }
            SessionMode::Plan => {
                // Plan flow skips the rest state entirely
                self.state = SessionState::SetRunning;
            }
        }

        let set = self
            .current
            .as_ref()
            .expect("checked above")
            .sets
            .last()
            .expect("just pushed");
        tracing::debug!(
            "Recorded set: {} kg x {} reps ({:?}), {}s",
            set.real_kg,
            set.reps,
            set.kind,
            set.duration_seconds
        );
        Ok(set)
    }

    /// Drive the rest countdown. On expiry the full configured duration is
    /// credited to rest time, the next set starts, and `RestCompleted` is
    /// returned.
    pub fn poll(&mut self) -> Option<SessionEvent> {
        let now = self.clock.now();
        if self.state == SessionState::Resting && self.rest_timer.is_finished(now) {
            self.rest_seconds += self.rest_timer.complete();
            self.set_timer.start(now);
            self.state = SessionState::SetRunning;
            return Some(SessionEvent::RestCompleted);
        }
        None
    }

    /// End the rest early. The elapsed portion counts as rest, the
    /// remainder as skipped rest, and the next set starts immediately.
    pub fn skip_rest(&mut self) -> Result<()> {
        self.require_state(SessionState::Resting, "skip_rest")?;

        let now = self.clock.now();
        let (rested, skipped) = self.rest_timer.skip(now);
        self.rest_seconds += rested;
        self.skipped_rest_seconds += skipped;

        self.set_timer.start(now);
        self.state = SessionState::SetRunning;
        Ok(())
    }

    /// Freeze the current exercise into a completed one. Requires at least
    /// one recorded set.
    pub fn close_exercise(&mut self) -> Result<CompletedExercise> {
        let Some(open) = self.current.as_ref() else {
            return Err(Rejection::NoOpenExercise.into());
        };
        if open.sets.is_empty() {
            return Err(Rejection::NoSetsInExercise.into());
        }

        let now = self.clock.now();
        if self.rest_timer.is_active() {
            let (rested, skipped) = self.rest_timer.skip(now);
            self.rest_seconds += rested;
            self.skipped_rest_seconds += skipped;
        }
        self.set_timer.reset();

        let closed: CompletedExercise = self.current.take().expect("checked above").into();
        self.completed.push(closed.clone());
        self.state = SessionState::ExercisePreview;
        tracing::info!("Closed exercise '{}' ({} sets)", closed.name, closed.sets.len());
        Ok(closed)
    }

    /// Stop every timer, zero every accumulator and return to `Idle`
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.mode = SessionMode::Live;
        self.name.clear();
        self.workout_type.clear();
        self.rest_duration_seconds = DEFAULT_REST_SECONDS;
        self.workout_timer.reset();
        self.set_timer.reset();
        self.rest_timer.reset();
        self.series_seconds = 0;
        self.rest_seconds = 0;
        self.skipped_rest_seconds = 0;
        self.companion_turn = false;
        self.companion_since = None;
        self.companion_wait_seconds = 0;
        self.completed.clear();
        self.current = None;
        self.source_template = None;
    }

    // ========================================================================
    // Pause domains
    // ========================================================================

    pub fn pause_workout(&mut self) {
        let now = self.clock.now();
        self.workout_timer.pause(now);
    }

    pub fn resume_workout(&mut self) {
        let now = self.clock.now();
        self.workout_timer.resume(now);
    }

    pub fn pause_set(&mut self) {
        let now = self.clock.now();
        self.set_timer.pause(now);
    }

    pub fn resume_set(&mut self) {
        let now = self.clock.now();
        self.set_timer.resume(now);
    }

    pub fn pause_rest(&mut self) {
        let now = self.clock.now();
        self.rest_timer.pause(now);
    }

    pub fn resume_rest(&mut self) {
        let now = self.clock.now();
        self.rest_timer.resume(now);
    }

    /// Toggle companion turn-taking. Handing the equipment over pauses the
    /// workout clock and starts the wait counter; taking it back resumes
    /// the clock and folds the wait into the cumulative total, so neither
    /// person's time is double-counted.
    pub fn set_companion_turn(&mut self, on: bool) {
        let now = self.clock.now();
        match (self.companion_turn, on) {
            (false, true) => {
                self.companion_turn = true;
                self.companion_since = Some(now);
                self.workout_timer.pause(now);
            }
            (true, false) => {
                self.companion_turn = false;
                if let Some(since) = self.companion_since.take() {
                    self.companion_wait_seconds += (now - since).num_seconds().max(0) as u32;
                }
                self.workout_timer.resume(now);
            }
            _ => {}
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn workout_type(&self) -> &str {
        &self.workout_type
    }

    pub fn rest_duration_seconds(&self) -> u32 {
        self.rest_duration_seconds
    }

    pub fn elapsed_workout_seconds(&self) -> u32 {
        self.workout_timer.elapsed_seconds(self.clock.now()).max(0) as u32
    }

    pub fn elapsed_set_seconds(&self) -> u32 {
        self.set_timer.elapsed_seconds(self.clock.now()).max(0) as u32
    }

    pub fn rest_remaining_seconds(&self) -> u32 {
        self.rest_timer.remaining_seconds(self.clock.now()).max(0) as u32
    }

    pub fn series_seconds(&self) -> u32 {
        self.series_seconds
    }

    pub fn rest_seconds(&self) -> u32 {
        self.rest_seconds
    }

    pub fn skipped_rest_seconds(&self) -> u32 {
        self.skipped_rest_seconds
    }

    pub fn is_companion_turn(&self) -> bool {
        self.companion_turn
    }

    pub fn companion_wait_seconds(&self) -> u32 {
        self.companion_wait_seconds
    }

    pub fn completed_exercises(&self) -> &[CompletedExercise] {
        &self.completed
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.current.as_ref()
    }

    pub fn source_template(&self) -> Option<Uuid> {
        self.source_template
    }

    pub fn time_breakdown(&self) -> TimeBreakdown {
        TimeBreakdown {
            series_seconds: self.series_seconds,
            rest_seconds: self.rest_seconds,
            skipped_rest_seconds: self.skipped_rest_seconds,
        }
    }

    // ========================================================================
    // Finalizer support
    // ========================================================================

    /// Auto-close an open exercise with at least one set. An empty open
    /// exercise stays in place, so a finish that ends up rejected loses
    /// nothing. Used by the finalizer before aggregation.
    pub(crate) fn close_open_exercise_if_any(&mut self) {
        if self.current.as_ref().is_some_and(|ex| !ex.sets.is_empty()) {
            if let Some(open) = self.current.take() {
                self.completed.push(open.into());
            }
        }
    }

    /// Stop every timer and freeze the final workout duration. Any rest in
    /// flight is split into rested/skipped so the accumulators stay
    /// conserved, and a pending companion turn is folded in.
    pub(crate) fn stop_all_timers(&mut self) -> u32 {
        let now = self.clock.now();

        if self.companion_turn {
            self.set_companion_turn(false);
        }
        if self.rest_timer.is_active() {
            let (rested, skipped) = self.rest_timer.skip(now);
            self.rest_seconds += rested;
            self.skipped_rest_seconds += skipped;
        }
        self.set_timer.stop(now);

        self.workout_timer.stop(now).max(0) as u32
    }

    /// Current instant from the session's clock
    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn require_state(&self, expected: SessionState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Rejection::InvalidTransition {
                operation,
                state: self.state.name(),
            }
            .into())
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("name", &self.name)
            .field("completed", &self.completed.len())
            .field("current", &self.current.as_ref().map(|e| &e.name))
            .finish()
    }
}
