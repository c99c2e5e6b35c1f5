//! Sequencing of descent iterations.
//!
//! The [`Controller`] is a resumable state machine. `begin_*` computes the first update and
//! starts its animation, then every call to [`Controller::advance`] emits one tick to the
//! display sink. When an animation completes the update is committed, recorded in the
//! history and, during a run, the next iteration is computed and animated. Nothing blocks
//! inside the controller; [`Controller::drive`] is the loop that waits on a [`Clock`]
//! between ticks.
//!
//! Input that would race with an animation (moving the slider, another step, a new
//! dataset) is rejected with [`Error::Busy`] unless the controller is [`Mode::Idle`].

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use common::rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::animator::{AnimationParams, Animator, CancelToken, Tick};
use crate::clock::Clock;
use crate::dataset::Dataset;
use crate::display::{DisplaySink, Frame};
use crate::metrics::mse;
use crate::optimizer;
use crate::{Error, Result};

/// Range that [`Controller::randomize`] samples from
pub const RANDOMIZE_RANGE: RangeInclusive<f64> = -10.0..=10.0;

/// State of `b` before one update
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub iteration: usize,
    pub b: f64,
    pub mse: f64,
    pub gradient: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizerState {
    current_b: f64,
    history: Vec<HistoryEntry>,
    is_running: bool,
}

impl OptimizerState {
    pub fn new(current_b: f64) -> Self {
        Self {
            current_b,
            history: Vec::new(),
            is_running: false,
        }
    }

    pub fn current_b(&self) -> f64 {
        self.current_b
    }

    /// One entry per completed iteration, oldest first
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    /// A single step is being animated
    Animating,
    /// `iteration` is 0-based
    Running { iteration: usize, total: usize },
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Animating => f.write_str("animating a step"),
            Self::Running { iteration, total } => {
                write!(f, "running (iteration {}/{total})", iteration + 1)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
    /// A run was requested while another one was in progress
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStart {
    Started,
    /// Another step or run is in progress, nothing changed
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    Ticked(Tick),
    Cancelled,
    Idle,
}

/// The update that is being animated
#[derive(Debug, Clone, Copy)]
struct Pending {
    entry: HistoryEntry,
    from_b: f64,
    new_b: f64,
}

#[derive(Debug, Clone, Copy)]
struct RunPlan {
    learning_rate: f64,
    total: usize,
}

#[derive(Debug)]
pub struct Controller {
    dataset: Dataset,
    state: OptimizerState,
    params: AnimationParams,
    animator: Animator,
    mode: Mode,
    cancel: CancelToken,
    pending: Option<Pending>,
    run: Option<RunPlan>,
}

impl Controller {
    pub fn new(dataset: Dataset, start_b: f64, params: AnimationParams) -> Self {
        Self {
            dataset,
            state: OptimizerState::new(start_b),
            params,
            animator: Animator::new(),
            mode: Mode::Idle,
            cancel: CancelToken::new(),
            pending: None,
            run: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn state(&self) -> &OptimizerState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn params(&self) -> AnimationParams {
        self.params
    }

    /// MSE at the current `b`
    pub fn current_mse(&self) -> f64 {
        mse(&self.dataset, self.state.current_b)
    }

    /// A handle that stops the current step or run before its next tick
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.mode {
            Mode::Idle => Ok(()),
            mode => {
                warn!(%mode, "rejected input");
                Err(Error::Busy(mode))
            }
        }
    }

    pub fn set_params(&mut self, params: AnimationParams) -> Result<()> {
        self.ensure_idle()?;
        self.params = params;
        Ok(())
    }

    /// Move `b` directly, like dragging a slider
    pub fn set_b(&mut self, b: f64) -> Result<()> {
        self.ensure_idle()?;
        if !b.is_finite() {
            return Err(Error::NonFiniteB(b));
        }
        self.state.current_b = b;
        Ok(())
    }

    /// Jump to a random `b` in [`RANDOMIZE_RANGE`] and forget the history
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<f64> {
        self.ensure_idle()?;
        let b = rng.gen_range(RANDOMIZE_RANGE);
        self.state.current_b = b;
        self.state.history.clear();
        debug!(b, "randomized");
        Ok(b)
    }

    /// Swap the dataset. The history refers to the old one, so it is cleared.
    pub fn replace_dataset(&mut self, dataset: Dataset) -> Result<()> {
        self.ensure_idle()?;
        self.dataset = dataset;
        self.state.history.clear();
        Ok(())
    }

    /// Start animating a single update
    pub fn begin_step(&mut self, learning_rate: f64) -> Result<()> {
        self.ensure_idle()?;
        self.cancel.reset();
        self.start_iteration(learning_rate)?;
        self.mode = Mode::Animating;
        Ok(())
    }

    /// Start a run of `iterations` updates. A run requested while another one is in
    /// progress is ignored.
    pub fn begin_run(&mut self, learning_rate: f64, iterations: usize) -> Result<RunStart> {
        if self.state.is_running || self.mode != Mode::Idle {
            warn!(mode = %self.mode, "run ignored");
            return Ok(RunStart::Ignored);
        }

        info!(learning_rate, iterations, start_b = self.state.current_b, "run started");
        self.cancel.reset();
        self.state.history.clear();
        self.state.is_running = true;

        self.run = Some(RunPlan {
            learning_rate,
            total: iterations,
        });
        // an empty run completes on the first call to `advance`
        if iterations > 0 {
            self.start_iteration(learning_rate)?;
        }
        self.mode = Mode::Running {
            iteration: 0,
            total: iterations,
        };
        Ok(RunStart::Started)
    }

    fn start_iteration(&mut self, learning_rate: f64) -> Result<()> {
        let b = self.state.current_b;
        let step = optimizer::step(&self.dataset, b, learning_rate);
        let entry = HistoryEntry {
            iteration: self.state.history.len(),
            b,
            mse: step.mse,
            gradient: step.gradient,
        };
        debug!(
            iteration = entry.iteration,
            b,
            new_b = step.new_b,
            gradient = step.gradient,
            "step computed"
        );
        self.animator.start(b, step.new_b, self.params)?;
        self.pending = Some(Pending {
            entry,
            from_b: b,
            new_b: step.new_b,
        });
        Ok(())
    }

    /// How long to wait before calling [`Controller::advance`], `None` when idle
    pub fn pending_interval(&self) -> Option<Duration> {
        self.animator.pending_interval()
    }

    /// Emit the next tick to `sink`
    pub fn advance<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) -> Result<Progress> {
        let Some(pending) = self.pending else {
            if self.run.is_some() {
                info!(b = self.state.current_b, "run finished");
                self.finish(sink, Outcome::Completed);
            }
            return Ok(Progress::Idle);
        };

        if self.cancel.is_cancelled() {
            self.abort(sink);
            return Ok(Progress::Cancelled);
        }

        let Some(tick) = self.animator.next_tick() else {
            return Ok(Progress::Idle);
        };

        sink.on_tick(&Frame {
            dataset: &self.dataset,
            state: &self.state,
            mode: self.mode,
            iteration: pending.entry.iteration,
            b: tick.b,
            mse: mse(&self.dataset, tick.b),
            from_b: pending.from_b,
            to_b: pending.new_b,
            tick: tick.index,
            step_count: self.params.step_count(),
        });

        if tick.last {
            self.commit(pending, sink)?;
        }

        Ok(Progress::Ticked(tick))
    }

    fn commit<S: DisplaySink + ?Sized>(&mut self, pending: Pending, sink: &mut S) -> Result<()> {
        self.pending = None;
        self.state.current_b = pending.new_b;
        self.state.history.push(pending.entry);
        sink.on_iteration(&pending.entry);

        match self.run {
            Some(plan) if self.state.history.len() < plan.total => {
                self.start_iteration(plan.learning_rate)?;
                self.mode = Mode::Running {
                    iteration: self.state.history.len(),
                    total: plan.total,
                };
            }
            Some(_) => {
                info!(b = self.state.current_b, "run finished");
                self.finish(sink, Outcome::Completed);
            }
            None => self.finish(sink, Outcome::Completed),
        }
        Ok(())
    }

    /// Stop between two ticks. The interrupted update is neither committed nor recorded.
    fn abort<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) {
        self.animator.stop();
        self.pending = None;
        info!(b = self.state.current_b, "cancelled");
        self.finish(sink, Outcome::Cancelled);
    }

    fn finish<S: DisplaySink + ?Sized>(&mut self, sink: &mut S, outcome: Outcome) {
        self.run = None;
        self.state.is_running = false;
        self.mode = Mode::Idle;
        sink.on_complete(&self.state, outcome);
    }

    /// Block on `clock` until the current step or run is over
    pub fn drive<C, S>(&mut self, clock: &mut C, sink: &mut S) -> Result<Outcome>
    where
        C: Clock + ?Sized,
        S: DisplaySink + ?Sized,
    {
        while self.mode != Mode::Idle {
            if let Some(interval) = self.pending_interval() {
                if !self.cancel.is_cancelled() {
                    clock.sleep(interval);
                }
            }
            match self.advance(sink)? {
                Progress::Cancelled => return Ok(Outcome::Cancelled),
                Progress::Idle => break,
                Progress::Ticked(_) => (),
            }
        }
        Ok(Outcome::Completed)
    }

    /// One animated update; `b` changes once the animation completes
    pub fn step_once<C, S>(
        &mut self,
        learning_rate: f64,
        clock: &mut C,
        sink: &mut S,
    ) -> Result<Outcome>
    where
        C: Clock + ?Sized,
        S: DisplaySink + ?Sized,
    {
        self.begin_step(learning_rate)?;
        self.drive(clock, sink)
    }

    /// `iterations` animated updates, one after another
    pub fn run<C, S>(
        &mut self,
        learning_rate: f64,
        iterations: usize,
        clock: &mut C,
        sink: &mut S,
    ) -> Result<Outcome>
    where
        C: Clock + ?Sized,
        S: DisplaySink + ?Sized,
    {
        match self.begin_run(learning_rate, iterations)? {
            RunStart::Ignored => Ok(Outcome::Ignored),
            RunStart::Started => self.drive(clock, sink),
        }
    }
}
