//! Eased transitions between two values of `b`.
//!
//! An [`Animation`] is an iterator of [`Tick`]s and knows nothing about time except for
//! the offset of every tick. The [`Animator`] owns at most one animation at a time and
//! either hands out ticks one by one, so that a caller can interleave them with other work,
//! or drives a whole animation against a [`Clock`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::{Error, Result};

/// Fixed animation configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationParams {
    duration_ms: f64,
    step_count: u32,
    interval: Duration,
}

impl AnimationParams {
    pub const DEFAULT_DURATION_MS: f64 = 400.0;
    pub const DEFAULT_STEP_COUNT: u32 = 20;

    pub fn new(duration_ms: f64, step_count: u32) -> Result<Self> {
        if !(duration_ms.is_finite() && duration_ms > 0.0) {
            return Err(Error::InvalidAnimation("duration must be positive"));
        }
        if step_count == 0 {
            return Err(Error::InvalidAnimation("at least one step is required"));
        }
        let nanos = interval_nanos(duration_ms, step_count);
        if nanos >= u64::MAX as f64 {
            return Err(Error::InvalidAnimation("duration is too long"));
        }
        let interval = Duration::from_nanos(nanos as u64);
        Ok(Self {
            duration_ms,
            step_count,
            interval,
        })
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// The wait before every tick
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            duration_ms: Self::DEFAULT_DURATION_MS,
            step_count: Self::DEFAULT_STEP_COUNT,
            interval: Duration::from_nanos(
                interval_nanos(Self::DEFAULT_DURATION_MS, Self::DEFAULT_STEP_COUNT) as u64,
            ),
        }
    }
}

/// `duration / step_count`, rounded to whole nanoseconds
fn interval_nanos(duration_ms: f64, step_count: u32) -> f64 {
    (duration_ms * 1e6 / step_count as f64).round()
}

/// Ease-out cubic: `0 -> 0`, `1 -> 1`, monotonic, flat at the end
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// 1-based
    pub index: u32,
    pub b: f64,
    /// Offset from the start of the animation
    pub at: Duration,
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    from: f64,
    to: f64,
    params: AnimationParams,
    emitted: u32,
}

impl Animation {
    pub fn new(from: f64, to: f64, params: AnimationParams) -> Self {
        Self {
            from,
            to,
            params,
            emitted: 0,
        }
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn params(&self) -> AnimationParams {
        self.params
    }

    pub fn is_finished(&self) -> bool {
        self.emitted >= self.params.step_count
    }

    /// Interpolated value at tick `index`. The last tick is exactly `to`.
    pub fn value_at(&self, index: u32) -> f64 {
        let steps = self.params.step_count;
        if index >= steps {
            self.to
        } else {
            let eased = ease_out_cubic(index as f64 / steps as f64);
            self.from + (self.to - self.from) * eased
        }
    }
}

impl Iterator for Animation {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.is_finished() {
            return None;
        }
        self.emitted += 1;
        let index = self.emitted;
        Some(Tick {
            index,
            b: self.value_at(index),
            at: self.params.interval * index,
            last: index == self.params.step_count,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.params.step_count.saturating_sub(self.emitted) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Animation {}

/// Shared flag to stop an animation or a run between two ticks
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    Completed,
    Cancelled,
}

#[derive(Debug, Default)]
pub struct Animator {
    current: Option<Animation>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Animation> {
        self.current.as_ref()
    }

    /// Start a new animation. Overlapping animations are rejected.
    pub fn start(&mut self, from: f64, to: f64, params: AnimationParams) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::AnimationInProgress);
        }
        self.current = Some(Animation::new(from, to, params));
        Ok(())
    }

    /// How long to wait before the next tick, `None` if idle
    pub fn pending_interval(&self) -> Option<Duration> {
        self.current.as_ref().map(|a| a.params.interval())
    }

    /// Emit the next tick. The animator becomes idle after the last one.
    pub fn next_tick(&mut self) -> Option<Tick> {
        let animation = self.current.as_mut()?;
        let tick = animation.next();
        if tick.map_or(true, |t| t.last) {
            self.current = None;
        }
        tick
    }

    /// Drop the current animation without emitting the remaining ticks
    pub fn stop(&mut self) -> Option<Animation> {
        self.current.take()
    }

    /// Run a whole animation from `from` to `to`.
    ///
    /// `on_tick` is called exactly `params.step_count()` times, each call preceded by a
    /// wait of `params.interval()`, then `on_complete` is called once. If `cancel` gets set,
    /// the animation stops before the next tick and `on_complete` is not called.
    #[allow(clippy::too_many_arguments)]
    pub fn animate<C, T, F>(
        &mut self,
        from: f64,
        to: f64,
        params: AnimationParams,
        clock: &mut C,
        cancel: &CancelToken,
        mut on_tick: T,
        on_complete: F,
    ) -> Result<AnimationOutcome>
    where
        C: Clock + ?Sized,
        T: FnMut(f64),
        F: FnOnce(),
    {
        self.start(from, to, params)?;

        while let Some(interval) = self.pending_interval() {
            if cancel.is_cancelled() {
                self.stop();
                return Ok(AnimationOutcome::Cancelled);
            }
            clock.sleep(interval);
            if let Some(tick) = self.next_tick() {
                on_tick(tick.b);
            }
        }

        on_complete();
        Ok(AnimationOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn params(step_count: u32) -> AnimationParams {
        AnimationParams::new(400.0, step_count).unwrap()
    }

    #[test]
    fn easing() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);

        let mut prev = 0.0;
        for i in 1..=100 {
            let e = ease_out_cubic(i as f64 / 100.0);
            assert!(e > prev);
            prev = e;
        }
    }

    #[test]
    fn params_validation() {
        assert!(AnimationParams::new(0.0, 10).is_err());
        assert!(AnimationParams::new(-1.0, 10).is_err());
        assert!(AnimationParams::new(f64::NAN, 10).is_err());
        assert!(AnimationParams::new(100.0, 0).is_err());
        assert!(AnimationParams::new(1e300, 1).is_err());

        let p = AnimationParams::new(400.0, 20).unwrap();
        assert_eq!(p.interval(), Duration::from_millis(20));
        assert_eq!(p, AnimationParams::default());
    }

    #[test]
    fn default_params_follow_the_constants() {
        let d = AnimationParams::default();
        let p = AnimationParams::new(
            AnimationParams::DEFAULT_DURATION_MS,
            AnimationParams::DEFAULT_STEP_COUNT,
        )
        .unwrap();
        assert_eq!(d, p);
        assert_eq!(
            d.interval() * d.step_count(),
            Duration::from_millis(AnimationParams::DEFAULT_DURATION_MS as u64)
        );
    }

    #[test]
    fn ticks_end_exactly_on_target() {
        let ticks: Vec<_> = Animation::new(3.0, 5.0, params(20)).collect();
        assert_eq!(ticks.len(), 20);
        assert_eq!(ticks[19].b, 5.0);
        assert!(ticks[19].last);
        assert!(ticks[..19].iter().all(|t| !t.last));

        // strictly increasing and between the ends
        assert!(ticks.windows(2).all(|w| w[0].b < w[1].b));
        assert!(ticks.iter().all(|t| t.b > 3.0 && t.b <= 5.0));

        // strictly increasing in time
        assert!(ticks.windows(2).all(|w| w[0].at < w[1].at));
        assert_eq!(ticks[19].at, Duration::from_millis(400));
    }

    #[test]
    fn decreasing_animation() {
        let ticks: Vec<_> = Animation::new(2.0, -7.0, params(7)).map(|t| t.b).collect();
        assert!(ticks.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(*ticks.last().unwrap(), -7.0);
    }

    #[test]
    fn single_step_jumps() {
        let ticks: Vec<_> = Animation::new(0.1, 0.7, params(1)).collect();
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].b, 0.7);
        assert_eq!(ticks[0].at, Duration::from_millis(400));
    }

    #[test]
    fn exact_size() {
        let mut a = Animation::new(0.0, 1.0, params(4));
        assert_eq!(a.len(), 4);
        a.next();
        assert_eq!(a.len(), 3);
        a.by_ref().for_each(drop);
        assert!(a.is_finished());
        assert_eq!(a.next(), None);
    }

    #[test]
    fn overlapping_start_is_rejected() {
        let mut animator = Animator::new();
        animator.start(0.0, 1.0, params(3)).unwrap();
        assert_eq!(
            animator.start(5.0, 6.0, params(3)),
            Err(Error::AnimationInProgress)
        );
        // the first animation is untouched
        assert_eq!(animator.current().unwrap().to(), 1.0);

        for _ in 0..3 {
            assert!(animator.next_tick().is_some());
        }
        assert!(!animator.is_active());
        assert_eq!(animator.next_tick(), None);
        animator.start(5.0, 6.0, params(3)).unwrap();
    }

    #[test]
    fn animate_contract() {
        let mut animator = Animator::new();
        let mut clock = ManualClock::new();
        let cancel = CancelToken::new();

        let mut events = Vec::new();
        let mut completed = 0;
        let outcome = animator
            .animate(
                3.0,
                5.0,
                params(20),
                &mut clock,
                &cancel,
                |b| events.push(b),
                || completed += 1,
            )
            .unwrap();

        assert_eq!(outcome, AnimationOutcome::Completed);
        assert_eq!(completed, 1);
        assert_eq!(events.len(), 20);
        assert_eq!(events[19], 5.0);
        assert_eq!(clock.sleeps(), [Duration::from_millis(20); 20]);
        assert_eq!(clock.now(), Duration::from_millis(400));
        assert!(!animator.is_active());
    }

    #[test]
    fn complete_comes_after_last_tick() {
        use std::cell::RefCell;

        let log = RefCell::new(Vec::new());
        let mut animator = Animator::new();
        animator
            .animate(
                0.0,
                1.0,
                params(5),
                &mut ManualClock::new(),
                &CancelToken::new(),
                |b| log.borrow_mut().push(format!("tick {b}")),
                || log.borrow_mut().push("complete".to_owned()),
            )
            .unwrap();

        let log = log.into_inner();
        assert_eq!(log.len(), 6);
        assert_eq!(log[4], "tick 1");
        assert_eq!(log[5], "complete");
    }

    #[test]
    fn cancelled_mid_animation() {
        let mut animator = Animator::new();
        let mut clock = ManualClock::new();
        let cancel = CancelToken::new();

        let mut ticks = 0;
        let mut completed = false;
        let outcome = animator
            .animate(
                0.0,
                10.0,
                params(10),
                &mut clock,
                &cancel,
                |_| {
                    ticks += 1;
                    if ticks == 4 {
                        cancel.cancel();
                    }
                },
                || completed = true,
            )
            .unwrap();

        assert_eq!(outcome, AnimationOutcome::Cancelled);
        assert_eq!(ticks, 4);
        assert!(!completed);
        assert!(!animator.is_active());
        assert_eq!(clock.sleeps().len(), 4);
    }
}
