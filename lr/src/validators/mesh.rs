//! Chapter 3 rules: edit mode, element selection and topology changes

use crate::host::{Host, HostResult, InteractionMode, MeshSelection, MeshTopology, ObjectInfo};
use crate::snapshot::BaselineSnapshot;

use super::{Validation, Validator};

const MIN_SELECTED_VERTICES: usize = 3;

fn edit_object(host: &dyn Host) -> HostResult<Option<ObjectInfo>> {
    Ok(host
        .active_object()?
        .filter(|o| o.is_mesh && o.mode == InteractionMode::EditMesh))
}

fn selection(host: &dyn Host) -> HostResult<Option<MeshSelection>> {
    match edit_object(host)? {
        Some(object) => host.mesh_selection(&object.name),
        None => Ok(None),
    }
}

fn topology(host: &dyn Host) -> HostResult<Option<MeshTopology>> {
    match edit_object(host)? {
        Some(object) => host.mesh_topology(&object.name),
        None => Ok(None),
    }
}

/// Active mesh is in edit mode
pub struct EnterEditMode;

impl Validator for EnterEditMode {
    fn name(&self) -> &'static str {
        "enter-edit-mode"
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        match edit_object(host)? {
            Some(_) => Ok(Validation::complete("Entered edit mode")),
            None => Ok(Validation::incomplete("Enter edit mode")),
        }
    }
}

/// At least three vertices selected
pub struct SelectVertices;

impl Validator for SelectVertices {
    fn name(&self) -> &'static str {
        "select-vertices"
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let Some(selection) = selection(host)? else {
            return Ok(Validation::incomplete("Edit mode required"));
        };
        if selection.vertices >= MIN_SELECTED_VERTICES {
            Ok(Validation::complete(format!("Selected {} vertices", selection.vertices)))
        } else {
            Ok(Validation::incomplete(format!(
                "Select at least {} vertices ({} selected)",
                MIN_SELECTED_VERTICES, selection.vertices
            )))
        }
    }
}

/// At least one edge selected
pub struct SelectEdges;

impl Validator for SelectEdges {
    fn name(&self) -> &'static str {
        "select-edges"
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        match selection(host)? {
            Some(s) if s.edges > 0 => Ok(Validation::complete("Edge selected")),
            _ => Ok(Validation::incomplete("Select an edge")),
        }
    }
}

/// At least one face selected
pub struct SelectFaces;

impl Validator for SelectFaces {
    fn name(&self) -> &'static str {
        "select-faces"
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        match selection(host)? {
            Some(s) if s.faces > 0 => Ok(Validation::complete("Face selected")),
            _ => Ok(Validation::incomplete("Select a face")),
        }
    }
}

/// Face count grew past the baseline
pub struct Extrude;

impl Validator for Extrude {
    fn name(&self) -> &'static str {
        "extrude"
    }

    fn check(&self, host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Validation> {
        match topology(host)? {
            Some(t) if t.faces > baseline.face_count => Ok(Validation::complete(format!(
                "Extruded: {} -> {} faces",
                baseline.face_count, t.faces
            ))),
            _ => Ok(Validation::incomplete("Extrude a face")),
        }
    }
}

/// Vertex count grew past the baseline
pub struct LoopCut;

impl Validator for LoopCut {
    fn name(&self) -> &'static str {
        "loop-cut"
    }

    fn check(&self, host: &dyn Host, baseline: &BaselineSnapshot) -> HostResult<Validation> {
        match topology(host)? {
            Some(t) if t.vertices > baseline.vertex_count => Ok(Validation::complete(format!(
                "Loop cut added: {} -> {} vertices",
                baseline.vertex_count, t.vertices
            ))),
            _ => Ok(Validation::incomplete("Add a loop cut")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StageKey;
    use crate::host::SimulatedHost;
    use crate::snapshot::capture;

    fn edit_host() -> SimulatedHost {
        let mut host = SimulatedHost::new();
        host.set_mode(InteractionMode::EditMesh).unwrap();
        host
    }

    #[test]
    fn test_enter_edit_mode() {
        let mut host = SimulatedHost::new();
        let baseline = BaselineSnapshot::default();
        assert!(!EnterEditMode.check(&host, &baseline).unwrap().is_complete());

        host.set_mode(InteractionMode::EditMesh).unwrap();
        assert!(EnterEditMode.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_select_vertices_threshold() {
        let mut host = edit_host();
        let baseline = BaselineSnapshot::default();
        host.select_vertices(2).unwrap();
        let validation = SelectVertices.check(&host, &baseline).unwrap();
        assert!(!validation.is_complete());
        assert!(validation.message.contains("2 selected"));

        host.select_vertices(3).unwrap();
        assert!(SelectVertices.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_select_vertices_outside_edit_mode() {
        let host = SimulatedHost::new();
        let validation = SelectVertices.check(&host, &BaselineSnapshot::default()).unwrap();
        assert_eq!(validation.message, "Edit mode required");
    }

    #[test]
    fn test_select_edges_and_faces() {
        let mut host = edit_host();
        let baseline = BaselineSnapshot::default();
        assert!(!SelectEdges.check(&host, &baseline).unwrap().is_complete());
        assert!(!SelectFaces.check(&host, &baseline).unwrap().is_complete());

        host.select_edges(1).unwrap();
        host.select_faces(1).unwrap();
        assert!(SelectEdges.check(&host, &baseline).unwrap().is_complete());
        assert!(SelectFaces.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_extrude_compares_face_count() {
        let mut host = edit_host();
        let baseline = capture(StageKey::new(3, 5), &host).unwrap();
        assert!(!Extrude.check(&host, &baseline).unwrap().is_complete());

        host.select_faces(1).unwrap();
        host.extrude().unwrap();
        let validation = Extrude.check(&host, &baseline).unwrap();
        assert!(validation.is_complete());
        assert!(validation.message.contains("6 -> 10"));
    }

    #[test]
    fn test_loop_cut_compares_vertex_count() {
        let mut host = edit_host();
        let baseline = capture(StageKey::new(3, 6), &host).unwrap();
        assert!(!LoopCut.check(&host, &baseline).unwrap().is_complete());

        host.loop_cut().unwrap();
        assert!(LoopCut.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_topology_rules_need_edit_mode() {
        let mut host = edit_host();
        let baseline = capture(StageKey::new(3, 6), &host).unwrap();
        host.loop_cut().unwrap();
        host.set_mode(InteractionMode::Object).unwrap();
        assert!(!LoopCut.check(&host, &baseline).unwrap().is_complete());
    }
}
