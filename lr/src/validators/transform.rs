//! Chapter 1 rules: selecting and transforming the cube

use crate::host::{Host, HostResult, ObjectInfo};
use crate::snapshot::BaselineSnapshot;

use super::{Validation, Validator};

const CUBE_NAME: &str = "Cube";

const MOVE_TARGET_X: f32 = 2.0;
const MOVE_TOLERANCE: f32 = 0.1;
const ROTATE_TARGET_DEGREES: f32 = 45.0;
const ROTATE_TOLERANCE_DEGREES: f32 = 1.0;
const SCALE_EPSILON: f32 = 0.01;

fn active_cube(host: &dyn Host) -> HostResult<Option<ObjectInfo>> {
    Ok(host.active_object()?.filter(|o| o.name == CUBE_NAME))
}

/// The object named "Cube" is the active selection
pub struct SelectCube;

impl Validator for SelectCube {
    fn name(&self) -> &'static str {
        "select-cube"
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        match active_cube(host)? {
            Some(_) => Ok(Validation::complete("Cube selected")),
            None => Ok(Validation::incomplete("Select the cube")),
        }
    }
}

/// Cube moved +2 along X from its baseline
pub struct MoveCube;

impl Validator for MoveCube {
    fn name(&self) -> &'static str {
        "move-cube"
    }

    fn check(&self, host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let Some(cube) = active_cube(host)? else {
            return Ok(Validation::incomplete("No cube selected"));
        };
        let movement = cube.transform.location.x - baseline.position.x;
        if (movement - MOVE_TARGET_X).abs() < MOVE_TOLERANCE {
            Ok(Validation::complete("Moved +2 along X"))
        } else {
            Ok(Validation::incomplete(format!("Moved {:.2} along X, aim for +2", movement)))
        }
    }
}

/// Cube rotated 45 degrees around X from its baseline
pub struct RotateCube;

impl Validator for RotateCube {
    fn name(&self) -> &'static str {
        "rotate-cube"
    }

    fn check(&self, host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let Some(cube) = active_cube(host)? else {
            return Ok(Validation::incomplete("No cube selected"));
        };
        let rotation = cube.transform.rotation.x.to_degrees() - baseline.rotation.x.to_degrees();
        if (rotation - ROTATE_TARGET_DEGREES).abs() < ROTATE_TOLERANCE_DEGREES {
            Ok(Validation::complete("Rotated 45 degrees around X"))
        } else {
            Ok(Validation::incomplete(format!(
                "Rotated {:.1} degrees around X, aim for 45",
                rotation
            )))
        }
    }
}

/// Cube scale changed on any axis
pub struct ScaleCube;

impl Validator for ScaleCube {
    fn name(&self) -> &'static str {
        "scale-cube"
    }

    fn check(&self, host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let Some(cube) = active_cube(host)? else {
            return Ok(Validation::incomplete("No cube selected"));
        };
        let delta = (cube.transform.scale - baseline.scale).abs();
        if delta.max_element() > SCALE_EPSILON {
            Ok(Validation::complete("Scale changed"))
        } else {
            Ok(Validation::incomplete("Change the scale"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimulatedHost;
    use glam::Vec3;

    #[test]
    fn test_select_cube() {
        let mut host = SimulatedHost::new();
        let baseline = BaselineSnapshot::default();
        assert!(SelectCube.check(&host, &baseline).unwrap().is_complete());

        host.deselect();
        assert!(!SelectCube.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_select_requires_exact_name() {
        let mut host = SimulatedHost::new();
        host.scene_mut().objects[0].name = "Cube.001".to_string();
        let validation = SelectCube.check(&host, &BaselineSnapshot::default()).unwrap();
        assert!(!validation.is_complete());
    }

    #[test]
    fn test_move_within_tolerance() {
        let mut host = SimulatedHost::new();
        let baseline = BaselineSnapshot::default();
        host.translate(Vec3::new(2.05, 0.0, 0.0)).unwrap();
        assert!(MoveCube.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_move_short_of_target() {
        let mut host = SimulatedHost::new();
        let baseline = BaselineSnapshot::default();
        host.translate(Vec3::new(1.8, 0.0, 0.0)).unwrap();
        let validation = MoveCube.check(&host, &baseline).unwrap();
        assert!(!validation.is_complete());
        assert!(validation.message.contains("1.80"));
    }

    #[test]
    fn test_move_relative_to_baseline() {
        let mut host = SimulatedHost::new();
        host.translate(Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let baseline = BaselineSnapshot {
            position: Vec3::new(1.0, 0.0, 0.0),
            ..BaselineSnapshot::default()
        };
        assert!(!MoveCube.check(&host, &baseline).unwrap().is_complete());

        host.translate(Vec3::new(2.0, 0.0, 0.0)).unwrap();
        assert!(MoveCube.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_move_without_cube() {
        let host = SimulatedHost::empty();
        let validation = MoveCube.check(&host, &BaselineSnapshot::default()).unwrap();
        assert!(!validation.is_complete());
        assert_eq!(validation.message, "No cube selected");
    }

    #[test]
    fn test_rotate() {
        let mut host = SimulatedHost::new();
        let baseline = BaselineSnapshot::default();
        host.rotate_degrees(Vec3::new(30.0, 0.0, 0.0)).unwrap();
        assert!(!RotateCube.check(&host, &baseline).unwrap().is_complete());

        host.rotate_degrees(Vec3::new(15.5, 0.0, 0.0)).unwrap();
        assert!(RotateCube.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_rotate_other_axis_does_not_count() {
        let mut host = SimulatedHost::new();
        host.rotate_degrees(Vec3::new(0.0, 45.0, 0.0)).unwrap();
        let validation = RotateCube.check(&host, &BaselineSnapshot::default()).unwrap();
        assert!(!validation.is_complete());
    }

    #[test]
    fn test_scale_any_axis() {
        let mut host = SimulatedHost::new();
        let baseline = BaselineSnapshot::default();
        assert!(!ScaleCube.check(&host, &baseline).unwrap().is_complete());

        host.set_scale(Vec3::new(1.0, 1.0, 1.5)).unwrap();
        assert!(ScaleCube.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_scale_below_threshold() {
        let mut host = SimulatedHost::new();
        host.set_scale(Vec3::splat(1.005)).unwrap();
        let validation = ScaleCube.check(&host, &BaselineSnapshot::default()).unwrap();
        assert!(!validation.is_complete());
    }
}
