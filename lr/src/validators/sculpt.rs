//! Chapter 4 rules: sculpt mode, deformation and brushes

use glam::Vec3;

use crate::host::{Host, HostResult, InteractionMode, ObjectInfo};
use crate::snapshot::BaselineSnapshot;

use super::{Validation, Validator};

const SPHERE_NAME: &str = "Sphere";

/// Distance a vertex must travel to count as moved
const MOVE_THRESHOLD: f32 = 0.001;

/// Moved vertices needed for a stroke to count
const MIN_MOVED_VERTICES: usize = 5;

/// Count vertices that moved further than `threshold`
///
/// Compares index `i` to index `i` over the shorter of the two slices. No
/// vertex identity is tracked, so a topology change between capture and
/// check desyncs the pairing.
pub fn count_moved_vertices(baseline: &[Vec3], current: &[Vec3], threshold: f32) -> usize {
    baseline
        .iter()
        .zip(current)
        .filter(|(before, after)| before.distance(**after) > threshold)
        .count()
}

fn sculpting_object(host: &dyn Host) -> HostResult<Option<ObjectInfo>> {
    Ok(host
        .active_object()?
        .filter(|o| o.is_mesh && o.mode == InteractionMode::Sculpt))
}

/// Active object is in sculpt mode and a sphere mesh exists
pub struct EnterSculptMode;

impl Validator for EnterSculptMode {
    fn name(&self) -> &'static str {
        "enter-sculpt-mode"
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        if sculpting_object(host)?.is_none() {
            return Ok(Validation::incomplete("Enter sculpt mode"));
        }
        match host.find_object(SPHERE_NAME)? {
            Some(_) => Ok(Validation::complete("Sculpt mode ready")),
            None => Ok(Validation::incomplete("No sphere to sculpt")),
        }
    }
}

/// More than five vertices moved away from the baseline
pub struct SculptDeform;

impl Validator for SculptDeform {
    fn name(&self) -> &'static str {
        "sculpt-deform"
    }

    fn check(&self, host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let Some(object) = sculpting_object(host)? else {
            return Ok(Validation::incomplete("Sculpt mode required"));
        };
        if !baseline.has_vertex_baseline() {
            return Ok(Validation::incomplete("No vertex baseline to compare against"));
        }

        let current = host.vertex_positions(&object.name)?;
        let moved = count_moved_vertices(&baseline.vertex_positions, &current, MOVE_THRESHOLD);
        if moved > MIN_MOVED_VERTICES {
            Ok(Validation::complete(format!("Deformed {} vertices", moved)))
        } else {
            Ok(Validation::incomplete(format!("Sculpt the mesh ({} vertices moved)", moved)))
        }
    }
}

/// Active sculpt brush name contains a given substring
pub struct BrushSelected {
    brush: &'static str,
    rule: &'static str,
}

impl BrushSelected {
    pub const fn new(brush: &'static str, rule: &'static str) -> Self {
        Self { brush, rule }
    }

    pub const fn smooth() -> Self {
        Self::new("Smooth", "smooth-brush")
    }

    pub const fn grab() -> Self {
        Self::new("Grab", "grab-brush")
    }
}

impl Validator for BrushSelected {
    fn name(&self) -> &'static str {
        self.rule
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        if sculpting_object(host)?.is_none() {
            return Ok(Validation::incomplete("Sculpt mode required"));
        }
        match host.active_sculpt_brush()? {
            Some(name) if name.contains(self.brush) => Ok(Validation::complete(format!("Using {} brush", name))),
            Some(name) => Ok(Validation::incomplete(format!(
                "Active brush: {}, switch to {}",
                name, self.brush
            ))),
            None => Ok(Validation::incomplete(format!(
                "Active brush: unselected, switch to {}",
                self.brush
            ))),
        }
    }
}
