//! Host trait definition

use glam::Vec3;

use super::{
    HostAction, HostResult, MaterialInfo, MeshSelection, MeshTopology, NodeLink, ObjectInfo, PrincipalNode, ViewState,
};

/// Capabilities the lesson core consumes from the modelling tool
///
/// All calls are synchronous. Reads return `Ok(None)` (or an empty/false
/// value) when the thing asked about simply is not there, and `Err` only
/// when the host failed while answering. Objects and materials are
/// addressed by name.
pub trait Host {
    /// The currently active (selected) object
    fn active_object(&self) -> HostResult<Option<ObjectInfo>>;

    /// First mesh object whose name contains `name_fragment`
    fn find_object(&self, name_fragment: &str) -> HostResult<Option<ObjectInfo>>;

    /// 3D viewport camera state, if a 3D view is open
    fn view_state(&self) -> HostResult<Option<ViewState>>;

    /// Vertex/edge/face counts of a mesh object
    fn mesh_topology(&self, object: &str) -> HostResult<Option<MeshTopology>>;

    /// Selected element counts; only available while the object is in edit mode
    fn mesh_selection(&self, object: &str) -> HostResult<Option<MeshSelection>>;

    /// Vertex positions in mesh index order; empty for missing or non-mesh objects
    fn vertex_positions(&self, object: &str) -> HostResult<Vec<Vec3>>;

    /// Name of the active sculpt brush
    fn active_sculpt_brush(&self) -> HostResult<Option<String>>;

    /// Active material of an object
    fn active_material(&self, object: &str) -> HostResult<Option<MaterialInfo>>;

    /// Principal shading node of a node-based material
    fn principal_node(&self, material: &str) -> HostResult<Option<PrincipalNode>>;

    /// Whether the material graph holds an image texture node with a loaded image
    fn has_loaded_image_texture(&self, material: &str) -> HostResult<bool>;

    /// Whether the material graph holds exactly this link
    fn has_link(&self, material: &str, link: &NodeLink) -> HostResult<bool>;

    /// Whether an undo/redo step is currently being applied
    fn is_undo_in_progress(&self) -> HostResult<bool>;

    /// Perform a one-shot action
    fn perform(&mut self, action: &HostAction) -> HostResult<()>;
}
