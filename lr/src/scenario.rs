//! Scripted lesson replay
//!
//! A scenario is a YAML list of steps that plays the part of both the
//! learner (scene edits on a [`SimulatedHost`]) and the lesson panel
//! (setup/validate/advance commands and poll ticks), with `expect` steps to
//! assert on the resulting progress state.
//!
//! ```yaml
//! name: move the cube
//! steps:
//!   - do: advance
//!   - do: setup
//!   - do: translate
//!     by: [2.0, 0.0, 0.0]
//!   - do: poll
//!     ticks: 3
//!   - do: expect
//!     complete: true
//! ```

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use eyre::{Context, Result, bail};
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{Config, MonitorConfig};
use crate::host::{HostResult, InteractionMode, SimulatedHost};
use crate::monitor::{PollController, TickOutcome};
use crate::progress::{Advance, LessonSession, ProgressState};
use crate::validators::{Validation, ValidationStatus};

/// A named list of replay steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse scenario")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Scenario::load: called");
        let content =
            fs::read_to_string(path).context(format!("Failed to read scenario {}", path.display()))?;
        Self::from_yaml(&content).context(format!("Invalid scenario {}", path.display()))
    }
}

/// One replay step, tagged by `do:`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "do", rename_all = "kebab-case")]
pub enum Step {
    // Lesson panel commands
    Setup,
    Validate,
    Advance,
    Reset,
    Goto {
        chapter: u32,
    },
    /// Fire the poll trigger `ticks` times, one tick interval apart
    Poll {
        ticks: u32,
    },
    /// Assert on the progress state; unset fields are not checked
    Expect {
        #[serde(default)]
        complete: Option<bool>,
        #[serde(default)]
        chapter: Option<u32>,
        #[serde(default)]
        stage: Option<u32>,
        #[serde(default)]
        monitoring: Option<bool>,
    },

    // Object and view edits
    Select {
        name: String,
    },
    Deselect,
    Translate {
        by: Vec3,
    },
    Rotate {
        degrees: Vec3,
    },
    Scale {
        to: Vec3,
    },
    Pan {
        by: Vec3,
    },
    Zoom {
        by: f32,
    },
    Orbit,
    Mode {
        mode: InteractionMode,
    },

    // Mesh edits
    SelectVertices {
        count: usize,
    },
    SelectEdges {
        count: usize,
    },
    SelectFaces {
        count: usize,
    },
    Extrude,
    LoopCut,

    // Sculpting
    Sculpt {
        vertices: usize,
        strength: f32,
    },
    Brush {
        name: String,
    },

    // Materials
    NewMaterial,
    BaseColor {
        rgba: Vec4,
    },
    AddImageTexture {
        #[serde(default)]
        image: Option<String>,
    },
    Link {
        from: String,
        to: String,
    },
    Roughness {
        value: f32,
    },
    Metallic {
        value: f32,
    },

    /// Toggle the host's undo-in-progress flag
    Undo {
        active: bool,
    },
}

impl Step {
    /// The step's `do:` tag
    pub fn label(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Validate => "validate",
            Self::Advance => "advance",
            Self::Reset => "reset",
            Self::Goto { .. } => "goto",
            Self::Poll { .. } => "poll",
            Self::Expect { .. } => "expect",
            Self::Select { .. } => "select",
            Self::Deselect => "deselect",
            Self::Translate { .. } => "translate",
            Self::Rotate { .. } => "rotate",
            Self::Scale { .. } => "scale",
            Self::Pan { .. } => "pan",
            Self::Zoom { .. } => "zoom",
            Self::Orbit => "orbit",
            Self::Mode { .. } => "mode",
            Self::SelectVertices { .. } => "select-vertices",
            Self::SelectEdges { .. } => "select-edges",
            Self::SelectFaces { .. } => "select-faces",
            Self::Extrude => "extrude",
            Self::LoopCut => "loop-cut",
            Self::Sculpt { .. } => "sculpt",
            Self::Brush { .. } => "brush",
            Self::NewMaterial => "new-material",
            Self::BaseColor { .. } => "base-color",
            Self::AddImageTexture { .. } => "add-image-texture",
            Self::Link { .. } => "link",
            Self::Roughness { .. } => "roughness",
            Self::Metallic { .. } => "metallic",
            Self::Undo { .. } => "undo",
        }
    }
}

/// Outcome of one replayed step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// 1-based step number
    pub index: usize,
    pub action: &'static str,
    pub message: String,
    /// Set for steps that evaluated the stage
    pub status: Option<ValidationStatus>,
    /// Progress state after the step
    pub state: ProgressState,
}

enum Clock {
    /// Time advances only when a poll step says so
    Virtual { origin: Instant, elapsed: Duration },
    /// Poll ticks sleep for the real tick interval
    Realtime,
}

/// Replays scenarios against a simulated host
pub struct Replay {
    session: LessonSession,
    host: SimulatedHost,
    monitor: MonitorConfig,
    controller: Option<PollController>,
    clock: Clock,
}

impl Replay {
    pub fn new(config: &Config) -> Self {
        debug!("Replay::new: called");
        Self {
            session: LessonSession::standard()
                .with_require_completion(config.progress.require_completion_to_advance),
            host: SimulatedHost::new(),
            monitor: config.monitor.clone(),
            controller: None,
            clock: Clock::Virtual {
                origin: Instant::now(),
                elapsed: Duration::ZERO,
            },
        }
    }

    /// Pace poll ticks in wall-clock time instead of a virtual clock
    pub fn realtime(mut self, realtime: bool) -> Self {
        if realtime {
            self.clock = Clock::Realtime;
        }
        self
    }

    pub fn session(&self) -> &LessonSession {
        &self.session
    }

    pub fn host(&self) -> &SimulatedHost {
        &self.host
    }

    /// Run every step in order, calling `on_step` after each
    ///
    /// Stops at the first failing step; the error names its 1-based index.
    pub async fn run<F>(&mut self, scenario: &Scenario, mut on_step: F) -> Result<Vec<StepReport>>
    where
        F: FnMut(&StepReport),
    {
        info!(name = %scenario.name, steps = scenario.steps.len(), "Replaying scenario");
        let mut reports = Vec::with_capacity(scenario.steps.len());
        for (i, step) in scenario.steps.iter().enumerate() {
            let index = i + 1;
            let report = self
                .step(index, step)
                .await
                .context(format!("Step {} ({}) failed", index, step.label()))?;
            on_step(&report);
            reports.push(report);
        }
        info!(name = %scenario.name, "Scenario finished");
        Ok(reports)
    }

    async fn step(&mut self, index: usize, step: &Step) -> Result<StepReport> {
        debug!(%index, action = step.label(), "Replay::step: called");
        let mut status = None;
        let message = match step {
            Step::Setup => {
                let message = self.session.setup_stage(&mut self.host)?;
                self.controller = Some(PollController::start(&self.monitor, self.now()));
                message
            }
            Step::Validate => {
                let validation = self.session.validate_stage(&self.host);
                status = Some(validation.status);
                validation.message
            }
            Step::Advance => match self.session.advance_stage()? {
                Advance::Moved { key } => format!("Moved to stage {}", key),
                Advance::Finished => "Course complete".to_string(),
            },
            Step::Reset => {
                self.session.reset_progress();
                "Progress reset".to_string()
            }
            Step::Goto { chapter } => {
                self.session.goto_chapter(*chapter)?;
                format!("Jumped to chapter {}", chapter)
            }
            Step::Poll { ticks } => {
                let (message, last) = self.poll(*ticks).await;
                status = last;
                message
            }
            Step::Expect {
                complete,
                chapter,
                stage,
                monitoring,
            } => {
                let state = self.session.state();
                let mut mismatches = Vec::new();
                check(&mut mismatches, "complete", *complete, state.stage_complete);
                check(&mut mismatches, "chapter", *chapter, state.chapter);
                check(&mut mismatches, "stage", *stage, state.stage);
                check(&mut mismatches, "monitoring", *monitoring, state.monitoring_active);
                if !mismatches.is_empty() {
                    bail!("Expectation failed: {}", mismatches.join(", "));
                }
                "Expectation met".to_string()
            }
            edit => {
                self.edit(edit).context("Scene edit failed")?;
                format!("Scene edit: {}", edit.label())
            }
        };

        Ok(StepReport {
            index,
            action: step.label(),
            message,
            status,
            state: self.session.state(),
        })
    }

    fn edit(&mut self, step: &Step) -> HostResult<()> {
        let host = &mut self.host;
        match step {
            Step::Select { name } => host.select(name)?,
            Step::Deselect => host.deselect(),
            Step::Translate { by } => host.translate(*by)?,
            Step::Rotate { degrees } => host.rotate_degrees(*degrees)?,
            Step::Scale { to } => host.set_scale(*to)?,
            Step::Pan { by } => host.pan(*by)?,
            Step::Zoom { by } => host.zoom(*by)?,
            Step::Orbit => host.orbit()?,
            Step::Mode { mode } => host.set_mode(*mode)?,
            Step::SelectVertices { count } => host.select_vertices(*count)?,
            Step::SelectEdges { count } => host.select_edges(*count)?,
            Step::SelectFaces { count } => host.select_faces(*count)?,
            Step::Extrude => host.extrude()?,
            Step::LoopCut => host.loop_cut()?,
            Step::Sculpt { vertices, strength } => host.sculpt_stroke(*vertices, *strength)?,
            Step::Brush { name } => host.set_brush(name.as_str()),
            Step::NewMaterial => host.new_material()?,
            Step::BaseColor { rgba } => host.set_base_color(*rgba)?,
            Step::AddImageTexture { image } => host.add_image_texture(image.clone())?,
            Step::Link { from, to } => host.link_texture(from, to)?,
            Step::Roughness { value } => host.set_roughness(*value)?,
            Step::Metallic { value } => host.set_metallic(*value)?,
            Step::Undo { active } => host.set_undo_in_progress(*active),
            other => debug!(action = other.label(), "Replay::edit: not a scene edit"),
        }
        Ok(())
    }

    /// Fire the poll trigger; returns a summary and the last evaluated status
    async fn poll(&mut self, ticks: u32) -> (String, Option<ValidationStatus>) {
        let mut checks = 0;
        let mut last: Option<Validation> = None;
        let mut completed = false;

        for _ in 0..ticks {
            let now = self.advance_clock().await;
            let Some(controller) = self.controller.as_mut().filter(|c| c.is_armed()) else {
                return ("Monitoring not running".to_string(), None);
            };
            match controller.tick(now, &mut self.session, &self.host) {
                TickOutcome::Deregistered => {
                    self.controller = None;
                    return ("Monitoring stopped".to_string(), last.map(|v| v.status));
                }
                TickOutcome::Checked {
                    validation,
                    newly_complete,
                } => {
                    checks += 1;
                    completed |= newly_complete;
                    last = Some(validation);
                }
                TickOutcome::Skipped { .. } | TickOutcome::Throttled => {}
            }
        }

        let status = last.as_ref().map(|v| v.status);
        let message = match last {
            Some(v) if completed => format!("{} checks, stage complete: {}", checks, v.message),
            Some(v) => format!("{} checks, last: {}", checks, v.message),
            None => format!("{} ticks, no checks ran", ticks),
        };
        (message, status)
    }

    async fn advance_clock(&mut self) -> Instant {
        let interval = self.monitor.tick_interval();
        match &mut self.clock {
            Clock::Virtual { origin, elapsed } => {
                *elapsed += interval;
                *origin + *elapsed
            }
            Clock::Realtime => {
                tokio::time::sleep(interval).await;
                Instant::now()
            }
        }
    }

    fn now(&self) -> Instant {
        match &self.clock {
            Clock::Virtual { origin, elapsed } => *origin + *elapsed,
            Clock::Realtime => Instant::now(),
        }
    }
}

fn check<T: PartialEq + std::fmt::Display>(mismatches: &mut Vec<String>, field: &str, expected: Option<T>, actual: T) {
    if let Some(expected) = expected
        && expected != actual
    {
        mismatches.push(format!("{} expected {} but was {}", field, expected, actual));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StageKey;

    fn replay() -> Replay {
        Replay::new(&Config::default())
    }

    #[test]
    fn test_parse_steps() {
        let yaml = r#"
name: sample
steps:
  - do: setup
  - do: translate
    by: [2.0, 0.0, 0.0]
  - do: mode
    mode: edit-mesh
  - do: base-color
    rgba: [1.0, 0.0, 0.0, 1.0]
  - do: add-image-texture
  - do: expect
    complete: true
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(scenario.steps.len(), 6);
        assert_eq!(scenario.steps[0], Step::Setup);
        assert_eq!(
            scenario.steps[1],
            Step::Translate {
                by: Vec3::new(2.0, 0.0, 0.0)
            }
        );
        assert_eq!(
            scenario.steps[2],
            Step::Mode {
                mode: InteractionMode::EditMesh
            }
        );
        assert_eq!(scenario.steps[4], Step::AddImageTexture { image: None });
        assert_eq!(scenario.steps[5].label(), "expect");
    }

    #[test]
    fn test_unknown_step_rejected() {
        let yaml = "name: bad\nsteps:\n  - do: teleport\n";
        assert!(Scenario::from_yaml(yaml).is_err());
    }

    #[tokio::test]
    async fn test_poll_completes_stage() {
        let scenario = Scenario {
            name: "select".to_string(),
            description: None,
            steps: vec![
                Step::Setup,
                Step::Poll { ticks: 3 },
                Step::Expect {
                    complete: Some(true),
                    chapter: Some(1),
                    stage: Some(1),
                    monitoring: Some(true),
                },
            ],
        };
        let mut replay = replay();
        let reports = replay.run(&scenario, |_| {}).await.unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[1].status, Some(ValidationStatus::Complete));
        assert!(reports[1].message.contains("stage complete"));
    }

    #[tokio::test]
    async fn test_poll_throttles_short_bursts() {
        let mut replay = replay();
        replay.step(1, &Step::Setup).await.unwrap();
        let report = replay.step(2, &Step::Poll { ticks: 2 }).await.unwrap();
        assert_eq!(report.status, None);
        assert!(!replay.session().state().stage_complete);
    }

    #[tokio::test]
    async fn test_poll_without_setup() {
        let mut replay = replay();
        let report = replay.step(1, &Step::Poll { ticks: 5 }).await.unwrap();
        assert_eq!(report.message, "Monitoring not running");
    }

    #[tokio::test]
    async fn test_poll_stops_after_advance() {
        let mut replay = replay();
        replay.step(1, &Step::Setup).await.unwrap();
        replay.step(2, &Step::Advance).await.unwrap();
        let report = replay.step(3, &Step::Poll { ticks: 5 }).await.unwrap();
        assert_eq!(report.message, "Monitoring stopped");
        assert!(replay.controller.is_none());
    }

    #[tokio::test]
    async fn test_failed_expectation_names_step() {
        let scenario = Scenario {
            name: "fail".to_string(),
            description: None,
            steps: vec![
                Step::Setup,
                Step::Expect {
                    complete: Some(true),
                    chapter: None,
                    stage: None,
                    monitoring: None,
                },
            ],
        };
        let err = replay().run(&scenario, |_| {}).await.unwrap_err();
        let text = format!("{:?}", err);
        assert!(text.contains("Step 2 (expect) failed"));
        assert!(text.contains("complete expected true but was false"));
    }

    #[tokio::test]
    async fn test_bad_edit_is_error() {
        let mut replay = replay();
        let err = replay.step(1, &Step::Extrude).await.unwrap_err();
        assert!(format!("{:?}", err).contains("Scene edit failed"));
    }

    #[tokio::test]
    async fn test_on_step_sees_every_report() {
        let scenario = Scenario {
            name: "walk".to_string(),
            description: None,
            steps: vec![Step::Advance, Step::Advance, Step::Goto { chapter: 5 }],
        };
        let mut seen = Vec::new();
        replay()
            .run(&scenario, |report| seen.push(report.state.chapter))
            .await
            .unwrap();
        assert_eq!(seen, vec![1, 1, 5]);
    }

    #[tokio::test]
    async fn test_strict_mode_blocks_advance() {
        let mut config = Config::default();
        config.progress.require_completion_to_advance = true;
        let mut replay = Replay::new(&config);
        replay.host.deselect();
        replay.step(1, &Step::Setup).await.unwrap();
        assert!(replay.step(2, &Step::Advance).await.is_err());
        assert_eq!(replay.session().state().key(), StageKey::FIRST);
    }
}
