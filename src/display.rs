//! Where animation frames go

use std::io::{self, Write};

use yansi::Paint;

use common::constants::{ANSI_CLEAR_LINE, ANSI_GOTO_PREV_LINE, NABLA_SYM};
use common::term_plot::curve_line;
use common::utils::padded_range;

use crate::controller::{HistoryEntry, Mode, OptimizerState, Outcome};
use crate::dataset::Dataset;
use crate::metrics::{mse, optimal_b};

/// Everything a sink needs to draw one tick
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub dataset: &'a Dataset,
    /// The state before the animated update is committed
    pub state: &'a OptimizerState,
    pub mode: Mode,
    pub iteration: usize,
    /// Interpolated `b`
    pub b: f64,
    /// MSE at the interpolated `b`
    pub mse: f64,
    pub from_b: f64,
    pub to_b: f64,
    /// 1-based
    pub tick: u32,
    pub step_count: u32,
}

pub trait DisplaySink {
    /// Called for every animation tick
    fn on_tick(&mut self, frame: &Frame<'_>);

    /// Called once an update is committed to the state
    fn on_iteration(&mut self, _entry: &HistoryEntry) {}

    /// Called when a step or a run is over
    fn on_complete(&mut self, _state: &OptimizerState, _outcome: Outcome) {}
}

/// Ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn on_tick(&mut self, _frame: &Frame<'_>) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedFrame {
    pub mode: Mode,
    pub iteration: usize,
    pub b: f64,
    pub mse: f64,
    pub from_b: f64,
    pub to_b: f64,
    pub tick: u32,
}

/// Remembers every callback
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub frames: Vec<RecordedFrame>,
    pub entries: Vec<HistoryEntry>,
    pub completions: Vec<Outcome>,
}

impl DisplaySink for RecordingSink {
    fn on_tick(&mut self, frame: &Frame<'_>) {
        self.frames.push(RecordedFrame {
            mode: frame.mode,
            iteration: frame.iteration,
            b: frame.b,
            mse: frame.mse,
            from_b: frame.from_b,
            to_b: frame.to_b,
            tick: frame.tick,
        });
    }

    fn on_iteration(&mut self, entry: &HistoryEntry) {
        self.entries.push(*entry);
    }

    fn on_complete(&mut self, _state: &OptimizerState, outcome: Outcome) {
        self.completions.push(outcome);
    }
}

/// Draws every frame on a single line which is redrawn in place while an update is being
/// animated. The last frame of every update stays on screen.
pub struct TerminalSink<W> {
    out: W,
    width: usize,
    live: bool,
    error: Option<io::Error>,
}

impl<W: Write> TerminalSink<W> {
    pub const DEFAULT_WIDTH: usize = 32;

    pub fn new(out: W) -> Self {
        Self {
            out,
            width: Self::DEFAULT_WIDTH,
            live: false,
            error: None,
        }
    }

    /// Width of the MSE curve in characters
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The first write error since the last call, if any
    pub fn take_error(&mut self) -> io::Result<()> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }

    fn write_frame(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        if self.live {
            write!(self.out, "{ANSI_GOTO_PREV_LINE}{ANSI_CLEAR_LINE}")?;
        }

        let label = match frame.mode {
            Mode::Running { total, .. } => format!("[{:>3}/{total}]", frame.iteration + 1),
            _ => format!("[step {}]", frame.iteration + 1),
        };

        let optimum = optimal_b(frame.dataset);
        let range = padded_range(
            frame
                .dataset
                .ys()
                .chain([frame.from_b, frame.to_b, optimum]),
            0.1,
        );
        let curve = curve_line(
            |b| mse(frame.dataset, b),
            range,
            self.width,
            Some(frame.b),
            Some(optimum),
        );

        writeln!(
            self.out,
            "{} b = {}  mse = {}  {}",
            Paint::new(label).dimmed(),
            Paint::yellow(format!("{:+.4}", frame.b)),
            Paint::cyan(format!("{:.4}", frame.mse)),
            curve,
        )?;
        self.out.flush()
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn on_tick(&mut self, frame: &Frame<'_>) {
        let result = self.write_frame(frame);
        self.record(result);
        self.live = true;
    }

    fn on_iteration(&mut self, entry: &HistoryEntry) {
        self.live = false;
        let result = writeln!(
            self.out,
            "{}",
            Paint::new(format!("  {NABLA_SYM}mse({:+.4}) = {:+.4}", entry.b, entry.gradient))
                .dimmed()
        );
        self.record(result);
    }

    fn on_complete(&mut self, state: &OptimizerState, outcome: Outcome) {
        self.live = false;
        if outcome == Outcome::Cancelled {
            let result = writeln!(
                self.out,
                "{} at b = {:+.4}",
                Paint::red("cancelled"),
                state.current_b()
            );
            self.record(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::AnimationParams;
    use crate::clock::ManualClock;
    use crate::controller::Controller;

    #[test]
    fn terminal_frames() {
        let mut c = Controller::new(
            Dataset::demo(),
            0.0,
            AnimationParams::new(30.0, 3).unwrap(),
        );
        let mut sink = TerminalSink::new(Vec::new()).with_width(10);
        c.step_once(0.5, &mut ManualClock::new(), &mut sink).unwrap();
        sink.take_error().unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();

        // three frames, the last two redraw the previous line
        assert_eq!(text.matches("mse = ").count(), 3);
        assert_eq!(text.matches(ANSI_GOTO_PREV_LINE).count(), 2);
        // 0.0 - 0.5 * -9.0
        assert!(text.contains("+4.5000"));
        assert!(text.contains("[step 1]"));
        assert!(text.contains(NABLA_SYM));
    }

    #[test]
    fn cancellation_is_reported() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.on_complete(&OptimizerState::new(1.25), Outcome::Cancelled);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.contains("cancelled"));
        assert!(text.contains("+1.2500"));
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_are_kept() {
        let mut sink = TerminalSink::new(Broken);
        sink.on_complete(&OptimizerState::new(0.0), Outcome::Cancelled);
        sink.on_complete(&OptimizerState::new(0.0), Outcome::Cancelled);
        let err = sink.take_error().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(sink.take_error().is_ok());
    }
}
