//! LessonRunner - Stage Validation and Progress Engine
//!
//! LessonRunner walks a learner through a fixed course of chapters and stages
//! inside a 3D modelling tool. For each stage it prepares the scene, captures
//! a baseline, and keeps re-checking the live scene against that baseline
//! until the stage's goal is met.
//!
//! # Core Concepts
//!
//! - **Host boundary**: all scene reads and actions go through the [`Host`] trait
//! - **Baseline**: reference values captured at stage setup, replaced wholesale on every setup
//! - **Tri-state checks**: a stage check is incomplete, complete or error, never a panic
//! - **Explicit context**: [`LessonSession`] owns the progress state; there is no global
//!
//! # Modules
//!
//! - [`catalog`] - Stage table, display text and setup plans
//! - [`host`] - Host trait, value types and the in-memory simulated host
//! - [`snapshot`] - Baseline capture
//! - [`validators`] - One acceptance rule per stage
//! - [`progress`] - Progress state machine and lesson session
//! - [`monitor`] - Time-gated poll controller
//! - [`scenario`] - Scripted replay against the simulated host
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod monitor;
pub mod progress;
pub mod scenario;
pub mod snapshot;
pub mod validators;

// Re-export commonly used types
pub use catalog::{StageDescriptor, StageKey};
pub use config::{Config, MonitorConfig, ProgressConfig};
pub use error::LessonError;
pub use host::{Host, HostAction, HostError, HostResult, SimulatedHost};
pub use monitor::{PollController, SkipReason, TickOutcome};
pub use progress::{Advance, LessonSession, ProgressState, StageInfo};
pub use scenario::{Replay, Scenario, Step, StepReport};
pub use snapshot::{BaselineSnapshot, capture};
pub use validators::{Validation, ValidationStatus, Validator, ValidatorRegistry};
