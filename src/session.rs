//! Line oriented interactive session.
//!
//! Every line is one action of the demo: move `b`, change the learning rate, step, run,
//! generate a new dataset or reveal the answer. Actions are executed one at a time, an
//! animated step or run finishes before the next line is read.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use common::rand::Rng;
use thiserror::Error;
use yansi::Paint;

use crate::clock::Clock;
use crate::config::{clamp_learning_rate, LEARNING_RATE_RANGE};
use crate::controller::{Controller, Outcome};
use crate::display::DisplaySink;
use crate::metrics::Solution;
use crate::practice::{self, Difficulty};
use crate::report;

const HELP: &str = "\
commands:
  b <value>       move b
  lr <value>      set the learning rate (0.001 to 1)
  iters <n>       set the number of iterations of a run
  randomize       jump to a random b in [-10, 10]
  step            one animated update
  run             `iters` animated updates
  new [level]     new practice dataset: easy, medium or hard
  reveal          show the optimal b
  history         show the updates of the last run
  plot <file>     save an SVG plot
  json <file>     save the history as JSON
  help            this message
  quit            exit
ctrl-c stops a step or a run";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetB(f64),
    LearningRate(f64),
    Iterations(usize),
    Randomize,
    Step,
    Run,
    New(Option<Difficulty>),
    Reveal,
    History,
    Plot(PathBuf),
    Json(PathBuf),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid argument for `{command}`: {value:?}")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().ok_or(ParseCommandError::Empty)?;
        let arg = words.next();

        fn number<T: FromStr>(
            command: &'static str,
            arg: Option<&str>,
        ) -> Result<T, ParseCommandError> {
            let arg = arg.ok_or(ParseCommandError::MissingArgument(command))?;
            arg.parse().map_err(|_| ParseCommandError::InvalidArgument {
                command,
                value: arg.to_owned(),
            })
        }

        fn finite(command: &'static str, arg: Option<&str>) -> Result<f64, ParseCommandError> {
            let value: f64 = number(command, arg)?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(ParseCommandError::InvalidArgument {
                    command,
                    value: value.to_string(),
                })
            }
        }

        fn path(command: &'static str, arg: Option<&str>) -> Result<PathBuf, ParseCommandError> {
            arg.map(PathBuf::from)
                .ok_or(ParseCommandError::MissingArgument(command))
        }

        Ok(match name.to_ascii_lowercase().as_str() {
            "b" | "set" => Self::SetB(finite("b", arg)?),
            "lr" => Self::LearningRate(finite("lr", arg)?),
            "iters" | "iterations" => Self::Iterations(number("iters", arg)?),
            "r" | "randomize" => Self::Randomize,
            "s" | "step" => Self::Step,
            "run" => Self::Run,
            "new" => Self::New(
                arg.map(|a| {
                    a.parse::<Difficulty>()
                        .map_err(|_| ParseCommandError::InvalidArgument {
                            command: "new",
                            value: a.to_owned(),
                        })
                })
                .transpose()?,
            ),
            "reveal" => Self::Reveal,
            "h" | "history" => Self::History,
            "plot" => Self::Plot(path("plot", arg)?),
            "json" => Self::Json(path("json", arg)?),
            "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Err(ParseCommandError::Unknown(name.to_owned())),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<C, S, R> {
    controller: Controller,
    clock: C,
    sink: S,
    rng: R,
    learning_rate: f64,
    iterations: usize,
    difficulty: Difficulty,
}

impl<C: Clock, S: DisplaySink, R: Rng> Session<C, S, R> {
    pub fn new(controller: Controller, clock: C, sink: S, rng: R) -> Self {
        Self {
            controller,
            clock,
            sink,
            rng,
            learning_rate: 0.1,
            iterations: 15,
            difficulty: Difficulty::default(),
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = clamp_learning_rate(learning_rate);
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        match command {
            Command::SetB(b) => {
                self.controller.set_b(b)?;
                self.print_summary(out)?;
            }
            Command::LearningRate(learning_rate) => {
                self.learning_rate = clamp_learning_rate(learning_rate);
                if self.learning_rate != learning_rate {
                    writeln!(
                        out,
                        "{} learning rate must be in [{}, {}], using {}",
                        Paint::yellow("note:"),
                        LEARNING_RATE_RANGE.start(),
                        LEARNING_RATE_RANGE.end(),
                        self.learning_rate
                    )?;
                }
            }
            Command::Iterations(iterations) => {
                self.iterations = iterations.max(1);
            }
            Command::Randomize => {
                self.controller.randomize(&mut self.rng)?;
                self.print_summary(out)?;
            }
            Command::Step => {
                let outcome = self.controller.step_once(
                    self.learning_rate,
                    &mut self.clock,
                    &mut self.sink,
                )?;
                self.print_outcome(outcome, out)?;
            }
            Command::Run => {
                let outcome = self.controller.run(
                    self.learning_rate,
                    self.iterations,
                    &mut self.clock,
                    &mut self.sink,
                )?;
                self.print_outcome(outcome, out)?;
            }
            Command::New(difficulty) => {
                if let Some(difficulty) = difficulty {
                    self.difficulty = difficulty;
                }
                let dataset = practice::generate(self.difficulty, &mut self.rng);
                let n = dataset.len();
                self.controller.replace_dataset(dataset)?;
                writeln!(out, "new {} dataset with {n} points", self.difficulty)?;
                self.print_summary(out)?;
            }
            Command::Reveal => {
                let solution = Solution::of(self.controller.dataset());
                writeln!(
                    out,
                    "optimal b = {} (the mean of y), mse = {:.6}",
                    Paint::green(format!("{:.6}", solution.b)),
                    solution.mse
                )?;
            }
            Command::History => {
                report::print_history(out, self.controller.state().history())?;
            }
            Command::Plot(path) => {
                report::draw_plot_svg(path, self.controller.dataset(), self.controller.state())?;
            }
            Command::Json(path) => {
                report::write_history_json(
                    &path,
                    self.controller.dataset(),
                    self.controller.state(),
                )?;
                writeln!(out, "history saved to {}", path.display())?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Read commands until `quit` or the end of `input`. Bad commands are reported and
    /// skipped.
    pub fn run_loop(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        writeln!(out, "type `help` for the list of commands")?;
        self.print_summary(out)?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "{} {e}", Paint::red("error:"))?;
                    continue;
                }
            };
            match self.execute(command, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => (),
                Err(e) => writeln!(out, "{} {e:#}", Paint::red("error:"))?,
            }
        }
        Ok(())
    }

    fn print_outcome(&self, outcome: Outcome, out: &mut impl Write) -> std::io::Result<()> {
        match outcome {
            Outcome::Completed => (),
            Outcome::Cancelled => writeln!(out, "{}", Paint::red("stopped"))?,
            Outcome::Ignored => writeln!(out, "{}", Paint::yellow("a run is already in progress"))?,
        }
        self.print_summary(out)
    }

    fn print_summary(&self, out: &mut impl Write) -> std::io::Result<()> {
        report::print_summary(
            out,
            self.controller.dataset(),
            self.controller.state().current_b(),
        )
    }
}
