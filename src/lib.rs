//! An animated, intercept-only gradient descent demo.
//!
//! The model is `y = b`. For a dataset the mean squared error `MSE(b)` is a parabola whose
//! minimum sits at the mean of `y`. Gradient descent walks `b` towards that minimum, and every
//! update is shown as a short eased animation from the old `b` to the new one.
//!
//! The engine is split into pure metric and optimizer functions, a tick based [`Animator`]
//! driven by an injected [`Clock`], and a [`Controller`] that sequences iterations and feeds
//! frames into a [`DisplaySink`].
//!
//! [`Animator`]: animator::Animator
//! [`Clock`]: clock::Clock
//! [`Controller`]: controller::Controller
//! [`DisplaySink`]: display::DisplaySink

pub mod animator;
pub mod approx_eq;
pub mod clock;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod display;
pub mod error;
pub mod metrics;
pub mod optimizer;
pub mod practice;
pub mod report;
pub mod session;

pub use error::{Error, Result};
