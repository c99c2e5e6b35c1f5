//! An animated gradient descent demo for the terminal.
//!
//! The model is a horizontal line `y = b`. Gradient descent moves `b` towards the value
//! minimizing the mean squared error, which is the mean of the `y` values.
//!
//! Run:
//! ```bash
//! $ descent run --lr 0.2 --start-b -7
//! $ descent interactive --difficulty hard
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use common::rand::rngs::SmallRng;
use common::rand::SeedableRng;
use tracing_subscriber::EnvFilter;
use yansi::Paint;

use descent::animator::CancelToken;
use descent::clock::SystemClock;
use descent::config::Config;
use descent::controller::{Controller, Outcome};
use descent::dataset::Dataset;
use descent::display::TerminalSink;
use descent::practice::{self, Difficulty};
use descent::report;
use descent::session::Session;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate a fixed number of updates and print the history
    Run(Opts),
    /// Read commands from stdin
    Interactive(Opts),
}

#[derive(Args, Debug)]
struct Opts {
    /// TOML file with the defaults for the options below
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// TOML file with `[[point]]` entries
    #[arg(short, long)]
    data: Option<PathBuf>,
    /// Generate a practice dataset instead of using the demo points
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,
    /// Learning rate, clamped to [0.001, 1]
    #[arg(long)]
    lr: Option<f64>,
    /// Number of updates of a run
    #[arg(short = 'n', long)]
    iterations: Option<usize>,
    /// Initial value of b, random in [-10, 10] if not set
    #[arg(short = 'b', long, allow_hyphen_values = true)]
    start_b: Option<f64>,
    /// Seed for practice datasets and random starting points
    #[arg(long)]
    seed: Option<u64>,
    /// Length of one animated update
    #[arg(long)]
    duration_ms: Option<f64>,
    /// Number of frames of one animated update
    #[arg(long)]
    steps: Option<u32>,
    /// Save an SVG plot when done
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Save the history as JSON when done
    #[arg(long)]
    history_json: Option<PathBuf>,
    /// Disable colors
    #[arg(long)]
    no_color: bool,
}

impl Opts {
    /// Command line flags take precedence over the config file
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("could not load config from {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(lr) = self.lr {
            config.learning_rate = lr;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if self.start_b.is_some() {
            config.start_b = self.start_b;
        }
        if self.difficulty.is_some() {
            config.difficulty = self.difficulty;
        }
        if self.data.is_some() {
            config.data = self.data.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(duration_ms) = self.duration_ms {
            config.animation.duration_ms = duration_ms;
        }
        if let Some(steps) = self.steps {
            config.animation.step_count = steps;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let (opts, interactive) = match &cli.command {
        Command::Run(opts) => (opts, false),
        Command::Interactive(opts) => (opts, true),
    };
    if opts.no_color {
        Paint::disable();
    }

    let config = opts.config()?;
    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let dataset = match (&config.data, config.difficulty) {
        (Some(path), _) => Dataset::read_from_toml_file(path)?,
        (None, Some(difficulty)) => practice::generate(difficulty, &mut rng),
        (None, None) => Dataset::demo(),
    };
    let params = config
        .animation
        .params()
        .context("invalid animation settings")?;

    let learning_rate = config.clamped_learning_rate();
    if learning_rate != config.learning_rate {
        eprintln!(
            "{} learning rate {} is out of range, using {learning_rate}",
            Paint::yellow("warning:"),
            config.learning_rate
        );
    }

    let mut controller = Controller::new(dataset, 0.0, params);
    match config.start_b {
        Some(b) => controller.set_b(b)?,
        None => {
            controller.randomize(&mut rng)?;
        }
    }

    cancel_on_interrupt(controller.cancel_token())?;

    let sink = TerminalSink::new(io::stdout());
    let iterations = config.clamped_iterations();

    if interactive {
        let mut session = Session::new(controller, SystemClock::new(), sink, rng)
            .with_learning_rate(learning_rate)
            .with_iterations(iterations)
            .with_difficulty(config.difficulty.unwrap_or_default());
        session.run_loop(io::stdin().lock(), &mut io::stdout())?;
        session.sink_mut().take_error()?;
        finish(session.controller(), opts)
    } else {
        let controller = run(controller, sink, learning_rate, iterations)?;
        finish(&controller, opts)
    }
}

/// Ctrl-C stops the current step or run between two ticks instead of killing the process,
/// so the history, the plot and the JSON dump are still written.
fn cancel_on_interrupt(token: CancelToken) -> Result<()> {
    ctrlc::set_handler(move || token.cancel()).context("could not install the Ctrl-C handler")
}

fn run(
    mut controller: Controller,
    mut sink: TerminalSink<impl Write>,
    learning_rate: f64,
    iterations: usize,
) -> Result<Controller> {
    let mut out = io::stdout();
    report::print_summary(&mut out, controller.dataset(), controller.state().current_b())?;

    let outcome = controller.run(learning_rate, iterations, &mut SystemClock::new(), &mut sink)?;
    sink.take_error()?;

    writeln!(out)?;
    report::print_history(&mut out, controller.state().history())?;
    writeln!(out)?;
    report::print_summary(&mut out, controller.dataset(), controller.state().current_b())?;
    if outcome == Outcome::Cancelled {
        writeln!(out, "{}", Paint::red("run cancelled"))?;
    }
    Ok(controller)
}

fn finish(controller: &Controller, opts: &Opts) -> Result<()> {
    if let Some(path) = &opts.plot {
        report::draw_plot_svg(path, controller.dataset(), controller.state())?;
    }
    if let Some(path) = &opts.history_json {
        report::write_history_json(path, controller.dataset(), controller.state())?;
    }
    Ok(())
}
