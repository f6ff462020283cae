//! Chapter 2 rules: viewport navigation

use crate::host::{Host, HostResult};
use crate::snapshot::BaselineSnapshot;

use super::{Validation, Validator};

const PAN_THRESHOLD: f32 = 0.1;
const ZOOM_THRESHOLD: f32 = 0.5;
const ORBIT_THRESHOLD: f32 = 0.01;

const NO_VIEW: &str = "No 3D view found";

/// How far the camera has moved from the baseline
#[derive(Debug, Clone, Copy)]
struct ViewDelta {
    /// Euclidean distance between current and baseline view location
    pan: f32,
    /// Absolute change in view distance
    zoom: f32,
}

fn view_delta(host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Option<ViewDelta>> {
    Ok(host.view_state()?.map(|view| ViewDelta {
        pan: view.location.distance(baseline.view_location),
        zoom: (view.distance - baseline.view_distance).abs(),
    }))
}

/// View location panned more than 0.1
pub struct PanView;

impl Validator for PanView {
    fn name(&self) -> &'static str {
        "pan-view"
    }

    fn check(&self, host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let Some(delta) = view_delta(host, baseline)? else {
            return Ok(Validation::incomplete(NO_VIEW));
        };
        if delta.pan > PAN_THRESHOLD {
            Ok(Validation::complete("View panned"))
        } else {
            Ok(Validation::incomplete("Pan the view"))
        }
    }
}

/// View distance changed by more than 0.5
pub struct ZoomView;

impl Validator for ZoomView {
    fn name(&self) -> &'static str {
        "zoom-view"
    }

    fn check(&self, host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let Some(delta) = view_delta(host, baseline)? else {
            return Ok(Validation::incomplete(NO_VIEW));
        };
        if delta.zoom > ZOOM_THRESHOLD {
            Ok(Validation::complete("View zoomed"))
        } else {
            Ok(Validation::incomplete("Zoom the view"))
        }
    }
}

/// Any camera movement at all; an orbit shows up as a tiny pan or zoom
pub struct OrbitView;

impl Validator for OrbitView {
    fn name(&self) -> &'static str {
        "orbit-view"
    }

    fn check(&self, host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let Some(delta) = view_delta(host, baseline)? else {
            return Ok(Validation::incomplete(NO_VIEW));
        };
        if delta.pan > ORBIT_THRESHOLD || delta.zoom > ORBIT_THRESHOLD {
            Ok(Validation::complete("View orbited"))
        } else {
            Ok(Validation::incomplete("Orbit the view"))
        }
    }
}

/// Both pan and zoom thresholds hold at once
pub struct MasterView;

impl Validator for MasterView {
    fn name(&self) -> &'static str {
        "master-view"
    }

    fn check(&self, host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let Some(delta) = view_delta(host, baseline)? else {
            return Ok(Validation::incomplete(NO_VIEW));
        };
        if delta.pan > PAN_THRESHOLD && delta.zoom > ZOOM_THRESHOLD {
            Ok(Validation::complete("All view controls mastered"))
        } else {
            Ok(Validation::incomplete("Pan and zoom the view"))
        }
    }
}
