//! Value types exchanged with the host
//!
//! Every type here is an owned copy. Nothing aliases host storage, since
//! the user keeps editing the scene between polls.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interaction mode of the active object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    #[default]
    Object,
    EditMesh,
    Sculpt,
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "object"),
            Self::EditMesh => write!(f, "edit-mesh"),
            Self::Sculpt => write!(f, "sculpt"),
        }
    }
}

/// Object transform; rotation is XYZ euler in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub location: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Snapshot of a scene object as seen by the lesson core
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub name: String,
    pub is_mesh: bool,
    pub transform: Transform,
    pub mode: InteractionMode,
}

/// 3D viewport camera state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Point the view orbits around
    pub location: Vec3,
    /// Distance from the orbit point
    pub distance: f32,
}

/// Element counts of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshTopology {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

/// Number of selected elements of a mesh in edit mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshSelection {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

/// Active material of an object
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialInfo {
    pub name: String,
    pub use_nodes: bool,
}

/// Inputs of the principal shading node that lessons care about
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalNode {
    pub base_color: Vec4,
    pub roughness: f32,
    pub metallic: f32,
}

impl PrincipalNode {
    pub const DEFAULT_BASE_COLOR: Vec4 = Vec4::ONE;
    pub const DEFAULT_ROUGHNESS: f32 = 0.5;
    pub const DEFAULT_METALLIC: f32 = 0.0;
}

impl Default for PrincipalNode {
    fn default() -> Self {
        Self {
            base_color: Self::DEFAULT_BASE_COLOR,
            roughness: Self::DEFAULT_ROUGHNESS,
            metallic: Self::DEFAULT_METALLIC,
        }
    }
}

/// Kind of shader graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    ImageTexture,
    PrincipalShader,
    MaterialOutput,
}

/// A link between two node sockets, identified by node kind and socket name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLink {
    pub from_kind: NodeKind,
    pub from_socket: String,
    pub to_kind: NodeKind,
    pub to_socket: String,
}

impl NodeLink {
    pub fn new(
        from_kind: NodeKind,
        from_socket: impl Into<String>,
        to_kind: NodeKind,
        to_socket: impl Into<String>,
    ) -> Self {
        Self {
            from_kind,
            from_socket: from_socket.into(),
            to_kind,
            to_socket: to_socket.into(),
        }
    }
}

/// Primitive mesh the host can create at the world origin
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Cube { name: String, size: f32 },
    UvSphere { name: String, radius: f32, segments: u32, rings: u32 },
}

impl Primitive {
    /// Default cube: size 2, named "Cube"
    pub fn cube() -> Self {
        Self::Cube {
            name: "Cube".to_string(),
            size: 2.0,
        }
    }

    /// Default UV sphere: radius 1, 32 segments, 16 rings, named "Sphere"
    pub fn uv_sphere() -> Self {
        Self::UvSphere {
            name: "Sphere".to_string(),
            radius: 1.0,
            segments: 32,
            rings: 16,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Cube { name, .. } | Self::UvSphere { name, .. } => name,
        }
    }
}

/// Side panel the host can open next to the 3D view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    ShaderEditor,
}

/// One-shot action requested from the host during stage setup
#[derive(Debug, Clone, PartialEq)]
pub enum HostAction {
    /// Delete every object in the scene
    ResetScene,
    /// Delete the active object, if any
    DeleteActive,
    /// Create a primitive at the origin and make it active
    CreatePrimitive(Primitive),
    /// Make a mesh active: the first whose name contains `name_hint`, or any
    /// mesh when no hint is given. Creates `fallback` when nothing matches.
    FocusMesh {
        name_hint: Option<String>,
        fallback: Option<Primitive>,
    },
    /// Switch the active object into an interaction mode
    EnterMode(InteractionMode),
    /// Deselect every vertex, edge and face of the mesh in edit mode
    ClearMeshSelection,
    /// Open a side panel
    OpenPanel(PanelKind),
}

impl fmt::Display for HostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResetScene => write!(f, "reset-scene"),
            Self::DeleteActive => write!(f, "delete-active"),
            Self::CreatePrimitive(p) => write!(f, "create-primitive({})", p.name()),
            Self::FocusMesh { name_hint, .. } => write!(f, "focus-mesh({})", name_hint.as_deref().unwrap_or("*")),
            Self::EnterMode(mode) => write!(f, "enter-mode({})", mode),
            Self::ClearMeshSelection => write!(f, "clear-mesh-selection"),
            Self::OpenPanel(kind) => write!(f, "open-panel({:?})", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default_has_unit_scale() {
        let t = Transform::default();
        assert_eq!(t.location, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_principal_node_defaults() {
        let node = PrincipalNode::default();
        assert_eq!(node.base_color, Vec4::ONE);
        assert_eq!(node.roughness, 0.5);
        assert_eq!(node.metallic, 0.0);
    }

    #[test]
    fn test_interaction_mode_deserialize() {
        let mode: InteractionMode = serde_yaml::from_str("edit-mesh").unwrap();
        assert_eq!(mode, InteractionMode::EditMesh);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(HostAction::ResetScene.to_string(), "reset-scene");
        assert_eq!(
            HostAction::CreatePrimitive(Primitive::uv_sphere()).to_string(),
            "create-primitive(Sphere)"
        );
        assert_eq!(
            HostAction::EnterMode(InteractionMode::Sculpt).to_string(),
            "enter-mode(sculpt)"
        );
    }
}
