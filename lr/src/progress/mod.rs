//! Lesson progress
//!
//! [`ProgressState`] is the small state machine over (chapter, stage) and
//! its two flags. [`LessonSession`] is the explicit context that owns the
//! state, the live baseline and the validators, and exposes the commands a
//! host panel drives: setup, validate, advance, reset and goto.

mod session;
mod state;

pub use session::{LessonSession, StageInfo};
pub use state::{Advance, ProgressState};
