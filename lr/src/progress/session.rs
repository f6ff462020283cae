//! LessonSession - the explicit lesson context threaded through every command

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{self, StageDescriptor, StageKey};
use crate::error::LessonError;
use crate::host::Host;
use crate::snapshot::{self, BaselineSnapshot};
use crate::validators::{Validation, ValidatorRegistry};

use super::state::{Advance, ProgressState};

/// Display metadata for a stage together with its place in the course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageInfo {
    pub key: StageKey,
    /// Stages in the stage's chapter; zero for an unknown chapter
    pub stages_in_chapter: u32,
    pub descriptor: StageDescriptor,
}

/// Owns the progress state, the live baseline and the stage rules
pub struct LessonSession {
    state: ProgressState,
    /// Captured by the last setup; `None` once the position has moved on
    baseline: Option<BaselineSnapshot>,
    validators: ValidatorRegistry,
    require_completion: bool,
}

impl LessonSession {
    pub fn new(validators: ValidatorRegistry) -> Self {
        debug!(validators = validators.len(), "LessonSession::new: called");
        Self {
            state: ProgressState::new(),
            baseline: None,
            validators,
            require_completion: false,
        }
    }

    /// Session over the full course rules
    pub fn standard() -> Self {
        Self::new(ValidatorRegistry::standard())
    }

    /// Refuse to advance past a stage that has not passed
    pub fn with_require_completion(mut self, require: bool) -> Self {
        debug!(%require, "LessonSession::with_require_completion: called");
        self.require_completion = require;
        self
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Baseline of the current stage, if it has been set up
    pub fn baseline(&self) -> Option<&BaselineSnapshot> {
        self.baseline.as_ref().filter(|b| b.key == self.state.key())
    }

    pub fn display_info(&self, key: StageKey) -> StageInfo {
        StageInfo {
            key,
            stages_in_chapter: catalog::max_stages(key.chapter).unwrap_or(0),
            descriptor: catalog::describe(key),
        }
    }

    pub fn current_info(&self) -> StageInfo {
        self.display_info(self.state.key())
    }

    /// Prepare the scene for the current stage and capture a fresh baseline
    ///
    /// Runs the stage's host actions, replaces the baseline wholesale, then
    /// clears completion and arms monitoring. On a host error the previous
    /// baseline and flags are left untouched.
    pub fn setup_stage(&mut self, host: &mut dyn Host) -> Result<String, LessonError> {
        let key = self.state.key();
        debug!(%key, "LessonSession::setup_stage: called");
        if !key.is_valid() {
            return Err(LessonError::UnknownStage {
                chapter: key.chapter,
                stage: key.stage,
            });
        }

        for action in catalog::setup_actions(key) {
            host.perform(&action)?;
        }
        self.baseline = Some(snapshot::capture(key, &*host)?);
        self.state.begin_stage();

        let title = catalog::describe(key).name;
        info!(%key, %title, "Stage set up");
        Ok(format!("Stage {} ready: {}", key, title))
    }

    /// Check the current stage once
    ///
    /// A pass sets `stage_complete`; a later failure never clears it. A stage
    /// that has not been set up is reported incomplete without reading the host.
    pub fn validate_stage(&mut self, host: &dyn Host) -> Validation {
        let key = self.state.key();
        debug!(%key, "LessonSession::validate_stage: called");
        let Some(baseline) = self.baseline() else {
            debug!(%key, "LessonSession::validate_stage: no baseline for stage");
            return Validation::incomplete(format!("Set up stage {} first", key));
        };
        let validation = self.validators.validate(key, host, baseline);
        if validation.is_complete() && self.state.mark_complete() {
            info!(%key, message = %validation.message, "Stage complete");
        }
        validation
    }

    /// Move to the next stage
    ///
    /// The baseline is discarded on a move; the new stage reports incomplete
    /// until [`setup_stage`](Self::setup_stage) captures a fresh one.
    pub fn advance_stage(&mut self) -> Result<Advance, LessonError> {
        let key = self.state.key();
        debug!(%key, "LessonSession::advance_stage: called");
        if self.require_completion && !self.state.stage_complete {
            return Err(LessonError::StageIncomplete { key });
        }

        let outcome = self.state.advance();
        match outcome {
            Advance::Moved { key: next } => {
                self.baseline = None;
                info!(from = %key, to = %next, "Advanced");
            }
            Advance::Finished => info!(%key, "Course finished"),
        }
        Ok(outcome)
    }

    /// Back to the first stage
    pub fn reset_progress(&mut self) {
        debug!("LessonSession::reset_progress: called");
        self.state.reset();
        self.baseline = None;
        info!("Progress reset");
    }

    /// Jump to the first stage of a chapter
    pub fn goto_chapter(&mut self, chapter: u32) -> Result<(), LessonError> {
        debug!(%chapter, "LessonSession::goto_chapter: called");
        self.state.goto_chapter(chapter)?;
        self.baseline = None;
        info!(%chapter, "Jumped to chapter");
        Ok(())
    }
}

impl Default for LessonSession {
    fn default() -> Self {
        Self::standard()
    }
}
