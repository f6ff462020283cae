//! Stage validators
//!
//! One rule per (chapter, stage). Each rule is a pure read of the current
//! host state compared against the stage's baseline snapshot. Rules may hit
//! host faults; [`ValidatorRegistry::validate`] turns those into an
//! error-status [`Validation`] so callers never see a failure.

mod mesh;
mod sculpt;
mod shading;
mod transform;
mod view;

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use crate::catalog::StageKey;
use crate::host::{Host, HostResult};
use crate::snapshot::BaselineSnapshot;

pub use mesh::{EnterEditMode, Extrude, LoopCut, SelectEdges, SelectFaces, SelectVertices};
pub use sculpt::{BrushSelected, EnterSculptMode, SculptDeform, count_moved_vertices};
pub use shading::{BaseColorChanged, CreateMaterial, ImageTextureLoaded, SurfaceFinish, TextureLinked};
pub use transform::{MoveCube, RotateCube, ScaleCube, SelectCube};
pub use view::{MasterView, OrbitView, PanView, ZoomView};

/// Outcome class of a stage check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Goal not met yet
    Incomplete,
    /// Goal met
    Complete,
    /// The check itself could not run
    Error,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete => write!(f, "incomplete"),
            Self::Complete => write!(f, "complete"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Result of checking a stage: a status plus a message for the learner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub status: ValidationStatus,
    pub message: String,
}

impl Validation {
    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Complete,
            message: message.into(),
        }
    }

    pub fn incomplete(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Incomplete,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ValidationStatus::Error,
            message: message.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == ValidationStatus::Complete
    }
}

/// Acceptance rule for a single stage
pub trait Validator {
    /// Rule name, matching the catalog's `rule` field
    fn name(&self) -> &'static str;

    /// Check the host against the baseline
    ///
    /// Unmet goals and missing host facilities are `Ok(incomplete)`;
    /// `Err` is reserved for host faults.
    fn check(&self, host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Validation>;
}

/// Lookup table from stage position to its validator
pub struct ValidatorRegistry {
    validators: HashMap<StageKey, Box<dyn Validator>>,
}

impl ValidatorRegistry {
    /// Registry with the rule for every stage of the course
    pub fn standard() -> Self {
        debug!("ValidatorRegistry::standard: called");
        let mut registry = Self::empty();

        // Chapter 1: object transform
        registry.register(StageKey::new(1, 1), Box::new(SelectCube));
        registry.register(StageKey::new(1, 2), Box::new(MoveCube));
        registry.register(StageKey::new(1, 3), Box::new(RotateCube));
        registry.register(StageKey::new(1, 4), Box::new(ScaleCube));

        // Chapter 2: camera
        registry.register(StageKey::new(2, 1), Box::new(PanView));
        registry.register(StageKey::new(2, 2), Box::new(ZoomView));
        registry.register(StageKey::new(2, 3), Box::new(OrbitView));
        registry.register(StageKey::new(2, 4), Box::new(MasterView));

        // Chapter 3: mesh editing
        registry.register(StageKey::new(3, 1), Box::new(EnterEditMode));
        registry.register(StageKey::new(3, 2), Box::new(SelectVertices));
        registry.register(StageKey::new(3, 3), Box::new(SelectEdges));
        registry.register(StageKey::new(3, 4), Box::new(SelectFaces));
        registry.register(StageKey::new(3, 5), Box::new(Extrude));
        registry.register(StageKey::new(3, 6), Box::new(LoopCut));

        // Chapter 4: sculpting
        registry.register(StageKey::new(4, 1), Box::new(EnterSculptMode));
        registry.register(StageKey::new(4, 2), Box::new(SculptDeform));
        registry.register(StageKey::new(4, 3), Box::new(BrushSelected::smooth()));
        registry.register(StageKey::new(4, 4), Box::new(BrushSelected::grab()));

        // Chapter 5: materials
        registry.register(StageKey::new(5, 1), Box::new(CreateMaterial));
        registry.register(StageKey::new(5, 2), Box::new(BaseColorChanged));
        registry.register(StageKey::new(5, 3), Box::new(ImageTextureLoaded));
        registry.register(StageKey::new(5, 4), Box::new(TextureLinked));
        registry.register(StageKey::new(5, 5), Box::new(SurfaceFinish));

        registry
    }

    /// Registry with no rules (for testing)
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// Install or replace the rule for a stage
    pub fn register(&mut self, key: StageKey, validator: Box<dyn Validator>) {
        debug!(%key, rule = %validator.name(), "ValidatorRegistry::register: called");
        self.validators.insert(key, validator);
    }

    pub fn get(&self, key: StageKey) -> Option<&dyn Validator> {
        self.validators.get(&key).map(|v| v.as_ref())
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Check a stage; never fails
    pub fn validate(&self, key: StageKey, host: &dyn Host, baseline: &BaselineSnapshot) -> Validation {
        debug!(%key, "ValidatorRegistry::validate: called");
        let Some(validator) = self.validators.get(&key) else {
            debug!(%key, "ValidatorRegistry::validate: no rule for stage");
            return Validation::error(format!("No check defined for stage {}", key));
        };

        match validator.check(host, baseline) {
            Ok(validation) => {
                debug!(%key, status = %validation.status, "ValidatorRegistry::validate: checked");
                validation
            }
            Err(e) => {
                warn!(%key, rule = %validator.name(), error = %e, "Stage check failed reading host state");
                Validation::error(format!("Could not read the scene: {}", e))
            }
        }
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
