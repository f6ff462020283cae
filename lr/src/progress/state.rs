//! ProgressState - position in the course plus completion/monitoring flags

use serde::Serialize;
use tracing::debug;

use crate::catalog::{self, StageKey};
use crate::error::LessonError;

/// Outcome of an advance request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Advance {
    /// Moved to a new position
    Moved { key: StageKey },
    /// Already at the last stage; nothing changed
    Finished,
}

/// Current lesson position and flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub chapter: u32,
    pub stage: u32,
    /// Set once the stage's rule has passed since the last setup/advance/reset
    pub stage_complete: bool,
    /// Whether the poll controller should keep evaluating
    pub monitoring_active: bool,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            chapter: StageKey::FIRST.chapter,
            stage: StageKey::FIRST.stage,
            stage_complete: false,
            monitoring_active: false,
        }
    }
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> StageKey {
        StageKey::new(self.chapter, self.stage)
    }

    /// Stage has been set up: clear completion and arm monitoring
    pub fn begin_stage(&mut self) {
        debug!(key = %self.key(), "ProgressState::begin_stage: called");
        self.stage_complete = false;
        self.monitoring_active = true;
    }

    /// Record a passing check; returns true only on the first pass
    pub fn mark_complete(&mut self) -> bool {
        if self.stage_complete {
            return false;
        }
        debug!(key = %self.key(), "ProgressState::mark_complete: stage now complete");
        self.stage_complete = true;
        true
    }

    /// Step to the next stage, rolling into the next chapter after its last stage
    ///
    /// Does not look at `stage_complete`. At the final stage this is a no-op
    /// and reports [`Advance::Finished`].
    pub fn advance(&mut self) -> Advance {
        debug!(key = %self.key(), "ProgressState::advance: called");
        match self.key().next() {
            Some(next) => {
                self.chapter = next.chapter;
                self.stage = next.stage;
                self.clear_flags();
                Advance::Moved { key: next }
            }
            None => {
                debug!("ProgressState::advance: at final stage");
                Advance::Finished
            }
        }
    }

    /// Back to (1, 1) with both flags cleared
    pub fn reset(&mut self) {
        debug!("ProgressState::reset: called");
        *self = Self::default();
    }

    /// Jump to stage 1 of `chapter` with both flags cleared
    pub fn goto_chapter(&mut self, chapter: u32) -> Result<(), LessonError> {
        debug!(%chapter, "ProgressState::goto_chapter: called");
        if catalog::max_stages(chapter).is_none() {
            return Err(LessonError::UnknownChapter(chapter));
        }
        self.chapter = chapter;
        self.stage = 1;
        self.clear_flags();
        Ok(())
    }

    fn clear_flags(&mut self) {
        self.stage_complete = false;
        self.monitoring_active = false;
    }
}
