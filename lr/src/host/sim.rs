//! SimulatedHost - an in-memory modelling scene
//!
//! Stands in for the real modelling tool in the CLI replay and in tests. It
//! keeps just enough scene state for every lesson rule to be exercised:
//! transforms, interaction modes, mesh vertices with edge/face counts and
//! selection counts, node materials, the viewport camera, the sculpt brush
//! and the undo flag.

use std::collections::HashSet;
use std::f32::consts::PI;

use glam::{Vec3, Vec4};
use tracing::{debug, info};

use super::{
    Host, HostAction, HostError, HostResult, InteractionMode, MaterialInfo, MeshSelection, MeshTopology, NodeKind,
    NodeLink, ObjectInfo, PanelKind, Primitive, PrincipalNode, Transform, ViewState,
};

/// Mesh geometry held by a scene object
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// Vertex positions in index order
    pub vertices: Vec<Vec3>,
    pub edge_count: usize,
    pub face_count: usize,
    /// Selection counts, meaningful in edit mode
    pub selection: MeshSelection,
}

impl MeshData {
    /// Axis-aligned cube centred on the origin
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let mut vertices = Vec::with_capacity(8);
        for x in [-h, h] {
            for y in [-h, h] {
                for z in [-h, h] {
                    vertices.push(Vec3::new(x, y, z));
                }
            }
        }
        Self {
            vertices,
            edge_count: 12,
            face_count: 6,
            selection: MeshSelection::default(),
        }
    }

    /// UV sphere: two poles plus `rings - 1` rings of `segments` vertices
    pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3) as usize;
        let rings = rings.max(2) as usize;

        let mut vertices = Vec::with_capacity(segments * (rings - 1) + 2);
        vertices.push(Vec3::new(0.0, 0.0, radius));
        for ring in 1..rings {
            let theta = PI * ring as f32 / rings as f32;
            let z = theta.cos() * radius;
            let ring_radius = theta.sin() * radius;
            for segment in 0..segments {
                let phi = 2.0 * PI * segment as f32 / segments as f32;
                vertices.push(Vec3::new(ring_radius * phi.cos(), ring_radius * phi.sin(), z));
            }
        }
        vertices.push(Vec3::new(0.0, 0.0, -radius));

        Self {
            vertices,
            // horizontal ring loops plus meridian edges
            edge_count: (rings - 1) * segments + rings * segments,
            face_count: rings * segments,
            selection: MeshSelection::default(),
        }
    }

    pub fn topology(&self) -> MeshTopology {
        MeshTopology {
            vertices: self.vertices.len(),
            edges: self.edge_count,
            faces: self.face_count,
        }
    }

    fn from_primitive(primitive: &Primitive) -> Self {
        match primitive {
            Primitive::Cube { size, .. } => Self::cube(*size),
            Primitive::UvSphere {
                radius, segments, rings, ..
            } => Self::uv_sphere(*radius, *segments, *rings),
        }
    }
}

/// Image texture node in a material graph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageTexture {
    /// Loaded image path, if any
    pub image: Option<String>,
}

/// Node-based material attached to an object
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    pub name: String,
    pub use_nodes: bool,
    pub principal: Option<PrincipalNode>,
    pub image_textures: Vec<ImageTexture>,
    pub links: Vec<NodeLink>,
}

impl MaterialData {
    /// A fresh node material: principal shader wired into the output
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            use_nodes: true,
            principal: Some(PrincipalNode::default()),
            image_textures: Vec::new(),
            links: vec![NodeLink::new(
                NodeKind::PrincipalShader,
                "BSDF",
                NodeKind::MaterialOutput,
                "Surface",
            )],
        }
    }

    fn has_node(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::ImageTexture => !self.image_textures.is_empty(),
            NodeKind::PrincipalShader => self.principal.is_some(),
            NodeKind::MaterialOutput => true,
        }
    }
}

/// Object in the simulated scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub transform: Transform,
    pub mode: InteractionMode,
    pub mesh: Option<MeshData>,
    pub material: Option<MaterialData>,
}

impl SceneObject {
    /// Mesh object at the origin in object mode
    pub fn with_mesh(name: impl Into<String>, mesh: MeshData) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            mode: InteractionMode::Object,
            mesh: Some(mesh),
            material: None,
        }
    }

    /// Object without geometry (an empty or a light)
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            mode: InteractionMode::Object,
            mesh: None,
            material: None,
        }
    }

    fn info(&self) -> ObjectInfo {
        ObjectInfo {
            name: self.name.clone(),
            is_mesh: self.mesh.is_some(),
            transform: self.transform,
            mode: self.mode,
        }
    }
}

/// Whole simulated scene
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub active: Option<usize>,
    pub view: Option<ViewState>,
    pub sculpt_brush: Option<String>,
    pub undo_in_progress: bool,
    pub open_panels: HashSet<PanelKind>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            active: None,
            view: Some(ViewState {
                location: Vec3::ZERO,
                distance: 15.0,
            }),
            sculpt_brush: Some("Draw".to_string()),
            undo_in_progress: false,
            open_panels: HashSet::new(),
        }
    }
}

/// In-memory [`Host`] implementation
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    scene: Scene,
    fault: Option<String>,
}

impl SimulatedHost {
    /// Startup scene: a single active cube and a 3D view
    pub fn new() -> Self {
        debug!("SimulatedHost::new: called");
        let mut scene = Scene::default();
        scene.objects.push(SceneObject::with_mesh("Cube", MeshData::cube(2.0)));
        scene.active = Some(0);
        Self { scene, fault: None }
    }

    /// Scene with no objects
    pub fn empty() -> Self {
        debug!("SimulatedHost::empty: called");
        Self::from_scene(Scene::default())
    }

    pub fn from_scene(scene: Scene) -> Self {
        Self { scene, fault: None }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Make every read fail with `HostError::InvalidState(reason)` until cleared
    pub fn inject_fault(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        debug!(%reason, "SimulatedHost::inject_fault: called");
        self.fault = Some(reason);
    }

    pub fn clear_fault(&mut self) {
        debug!("SimulatedHost::clear_fault: called");
        self.fault = None;
    }

    fn check_fault(&self) -> HostResult<()> {
        match &self.fault {
            Some(reason) => Err(HostError::InvalidState(reason.clone())),
            None => Ok(()),
        }
    }

    fn object(&self, name: &str) -> Option<&SceneObject> {
        self.scene.objects.iter().find(|o| o.name == name)
    }

    fn material(&self, name: &str) -> Option<&MaterialData> {
        self.scene
            .objects
            .iter()
            .filter_map(|o| o.material.as_ref())
            .find(|m| m.name == name)
    }

    fn active_mut(&mut self) -> HostResult<&mut SceneObject> {
        let index = self
            .scene
            .active
            .ok_or_else(|| HostError::InvalidState("no active object".to_string()))?;
        self.scene
            .objects
            .get_mut(index)
            .ok_or_else(|| HostError::InvalidState(format!("active index {} out of range", index)))
    }

    fn edit_mesh_mut(&mut self) -> HostResult<&mut MeshData> {
        let object = self.active_mut()?;
        if object.mode != InteractionMode::EditMesh {
            return Err(HostError::InvalidState(format!("{} is not in edit mode", object.name)));
        }
        object
            .mesh
            .as_mut()
            .ok_or_else(|| HostError::InvalidState("active object has no mesh".to_string()))
    }

    fn principal_mut(&mut self) -> HostResult<&mut PrincipalNode> {
        let object = self.active_mut()?;
        object
            .material
            .as_mut()
            .and_then(|m| m.principal.as_mut())
            .ok_or_else(|| HostError::InvalidState("active object has no principal shader".to_string()))
    }

    fn view_mut(&mut self) -> HostResult<&mut ViewState> {
        self.scene
            .view
            .as_mut()
            .ok_or_else(|| HostError::Unavailable("3D view".to_string()))
    }

    fn unique_name(&self, base: &str) -> String {
        if self.object(base).is_none() {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}.{:03}", base, n))
            .find(|candidate| self.object(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    fn leave_modes(&mut self) {
        for object in &mut self.scene.objects {
            object.mode = InteractionMode::Object;
        }
    }

    fn create(&mut self, primitive: &Primitive) {
        self.leave_modes();
        let name = self.unique_name(primitive.name());
        info!(%name, "SimulatedHost: created primitive");
        self.scene
            .objects
            .push(SceneObject::with_mesh(name, MeshData::from_primitive(primitive)));
        self.scene.active = Some(self.scene.objects.len() - 1);
    }

    // Scene editing, the way a learner would drive the tool

    /// Make the named object active
    pub fn select(&mut self, name: &str) -> HostResult<()> {
        debug!(%name, "SimulatedHost::select: called");
        let index = self
            .scene
            .objects
            .iter()
            .position(|o| o.name == name)
            .ok_or_else(|| HostError::InvalidState(format!("no object named {}", name)))?;
        self.scene.active = Some(index);
        Ok(())
    }

    pub fn deselect(&mut self) {
        debug!("SimulatedHost::deselect: called");
        self.scene.active = None;
    }

    pub fn translate(&mut self, by: Vec3) -> HostResult<()> {
        debug!(?by, "SimulatedHost::translate: called");
        self.active_mut()?.transform.location += by;
        Ok(())
    }

    /// Rotate the active object by euler angles given in degrees
    pub fn rotate_degrees(&mut self, degrees: Vec3) -> HostResult<()> {
        debug!(?degrees, "SimulatedHost::rotate_degrees: called");
        let radians = Vec3::new(degrees.x.to_radians(), degrees.y.to_radians(), degrees.z.to_radians());
        self.active_mut()?.transform.rotation += radians;
        Ok(())
    }

    pub fn set_scale(&mut self, scale: Vec3) -> HostResult<()> {
        debug!(?scale, "SimulatedHost::set_scale: called");
        self.active_mut()?.transform.scale = scale;
        Ok(())
    }

    pub fn pan(&mut self, by: Vec3) -> HostResult<()> {
        debug!(?by, "SimulatedHost::pan: called");
        self.view_mut()?.location += by;
        Ok(())
    }

    pub fn zoom(&mut self, by: f32) -> HostResult<()> {
        debug!(%by, "SimulatedHost::zoom: called");
        let view = self.view_mut()?;
        view.distance = (view.distance + by).max(0.01);
        Ok(())
    }

    /// Orbit the view: nudges the view location slightly; distance is unchanged
    pub fn orbit(&mut self) -> HostResult<()> {
        debug!("SimulatedHost::orbit: called");
        let view = self.view_mut()?;
        view.location += Vec3::new(0.02, 0.0, 0.0);
        Ok(())
    }

    pub fn set_mode(&mut self, mode: InteractionMode) -> HostResult<()> {
        self.perform(&HostAction::EnterMode(mode))
    }

    pub fn select_vertices(&mut self, count: usize) -> HostResult<()> {
        debug!(%count, "SimulatedHost::select_vertices: called");
        let mesh = self.edit_mesh_mut()?;
        mesh.selection.vertices = count.min(mesh.vertices.len());
        Ok(())
    }

    pub fn select_edges(&mut self, count: usize) -> HostResult<()> {
        debug!(%count, "SimulatedHost::select_edges: called");
        let mesh = self.edit_mesh_mut()?;
        mesh.selection.edges = count.min(mesh.edge_count);
        Ok(())
    }

    pub fn select_faces(&mut self, count: usize) -> HostResult<()> {
        debug!(%count, "SimulatedHost::select_faces: called");
        let mesh = self.edit_mesh_mut()?;
        mesh.selection.faces = count.min(mesh.face_count);
        Ok(())
    }

    /// Extrude the selected face region one unit along +Z
    pub fn extrude(&mut self) -> HostResult<()> {
        debug!("SimulatedHost::extrude: called");
        let mesh = self.edit_mesh_mut()?;
        if mesh.selection.faces == 0 {
            return Err(HostError::InvalidState("nothing selected to extrude".to_string()));
        }
        let moved: Vec<Vec3> = mesh.vertices.iter().take(4).map(|v| *v + Vec3::Z).collect();
        mesh.vertices.extend(moved);
        mesh.edge_count += 8;
        mesh.face_count += 4;
        Ok(())
    }

    /// Add one edge loop around the mesh
    pub fn loop_cut(&mut self) -> HostResult<()> {
        debug!("SimulatedHost::loop_cut: called");
        let mesh = self.edit_mesh_mut()?;
        let midpoints: Vec<Vec3> = mesh
            .vertices
            .chunks(2)
            .take(4)
            .map(|pair| pair.iter().copied().sum::<Vec3>() / pair.len() as f32)
            .collect();
        mesh.vertices.extend(midpoints);
        mesh.edge_count += 8;
        mesh.face_count += 4;
        Ok(())
    }

    /// Push the first `count` vertices outward by `strength`
    pub fn sculpt_stroke(&mut self, count: usize, strength: f32) -> HostResult<()> {
        debug!(%count, %strength, "SimulatedHost::sculpt_stroke: called");
        let object = self.active_mut()?;
        if object.mode != InteractionMode::Sculpt {
            return Err(HostError::InvalidState(format!("{} is not in sculpt mode", object.name)));
        }
        let mesh = object
            .mesh
            .as_mut()
            .ok_or_else(|| HostError::InvalidState("active object has no mesh".to_string()))?;
        for vertex in mesh.vertices.iter_mut().take(count) {
            *vertex += vertex.normalize_or_zero() * strength;
        }
        Ok(())
    }

    pub fn set_brush(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug!(%name, "SimulatedHost::set_brush: called");
        self.scene.sculpt_brush = Some(name);
    }

    pub fn clear_brush(&mut self) {
        self.scene.sculpt_brush = None;
    }

    /// Give the active object a fresh node material
    pub fn new_material(&mut self) -> HostResult<()> {
        debug!("SimulatedHost::new_material: called");
        let taken: HashSet<String> = self
            .scene
            .objects
            .iter()
            .filter_map(|o| o.material.as_ref().map(|m| m.name.clone()))
            .collect();
        let name = std::iter::once("Material".to_string())
            .chain((1..).map(|n| format!("Material.{:03}", n)))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_else(|| "Material".to_string());
        self.active_mut()?.material = Some(MaterialData::new(name));
        Ok(())
    }

    pub fn set_base_color(&mut self, rgba: Vec4) -> HostResult<()> {
        debug!(?rgba, "SimulatedHost::set_base_color: called");
        self.principal_mut()?.base_color = rgba;
        Ok(())
    }

    pub fn set_roughness(&mut self, value: f32) -> HostResult<()> {
        debug!(%value, "SimulatedHost::set_roughness: called");
        self.principal_mut()?.roughness = value;
        Ok(())
    }

    pub fn set_metallic(&mut self, value: f32) -> HostResult<()> {
        debug!(%value, "SimulatedHost::set_metallic: called");
        self.principal_mut()?.metallic = value;
        Ok(())
    }

    /// Add an image texture node, optionally with an image loaded
    pub fn add_image_texture(&mut self, image: Option<String>) -> HostResult<()> {
        debug!(?image, "SimulatedHost::add_image_texture: called");
        let material = self
            .active_mut()?
            .material
            .as_mut()
            .ok_or_else(|| HostError::InvalidState("active object has no material".to_string()))?;
        material.image_textures.push(ImageTexture { image });
        Ok(())
    }

    /// Link an image texture output into a principal shader input
    ///
    /// An input accepts one link, so an existing link into the same socket
    /// is replaced.
    pub fn link_texture(&mut self, from_socket: &str, to_socket: &str) -> HostResult<()> {
        debug!(%from_socket, %to_socket, "SimulatedHost::link_texture: called");
        let material = self
            .active_mut()?
            .material
            .as_mut()
            .ok_or_else(|| HostError::InvalidState("active object has no material".to_string()))?;
        if !material.has_node(NodeKind::ImageTexture) || !material.has_node(NodeKind::PrincipalShader) {
            return Err(HostError::InvalidState(
                "material needs an image texture and a principal shader".to_string(),
            ));
        }
        material
            .links
            .retain(|l| !(l.to_kind == NodeKind::PrincipalShader && l.to_socket == to_socket));
        material.links.push(NodeLink::new(
            NodeKind::ImageTexture,
            from_socket,
            NodeKind::PrincipalShader,
            to_socket,
        ));
        Ok(())
    }

    pub fn set_undo_in_progress(&mut self, active: bool) {
        debug!(%active, "SimulatedHost::set_undo_in_progress: called");
        self.scene.undo_in_progress = active;
    }
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for SimulatedHost {
    fn active_object(&self) -> HostResult<Option<ObjectInfo>> {
        self.check_fault()?;
        Ok(self
            .scene
            .active
            .and_then(|i| self.scene.objects.get(i))
            .map(SceneObject::info))
    }

    fn find_object(&self, name_fragment: &str) -> HostResult<Option<ObjectInfo>> {
        self.check_fault()?;
        Ok(self
            .scene
            .objects
            .iter()
            .find(|o| o.mesh.is_some() && o.name.contains(name_fragment))
            .map(SceneObject::info))
    }

    fn view_state(&self) -> HostResult<Option<ViewState>> {
        self.check_fault()?;
        Ok(self.scene.view)
    }

    fn mesh_topology(&self, object: &str) -> HostResult<Option<MeshTopology>> {
        self.check_fault()?;
        Ok(self
            .object(object)
            .and_then(|o| o.mesh.as_ref())
            .map(MeshData::topology))
    }

    fn mesh_selection(&self, object: &str) -> HostResult<Option<MeshSelection>> {
        self.check_fault()?;
        Ok(self
            .object(object)
            .filter(|o| o.mode == InteractionMode::EditMesh)
            .and_then(|o| o.mesh.as_ref())
            .map(|m| m.selection))
    }

    fn vertex_positions(&self, object: &str) -> HostResult<Vec<Vec3>> {
        self.check_fault()?;
        Ok(self
            .object(object)
            .and_then(|o| o.mesh.as_ref())
            .map(|m| m.vertices.clone())
            .unwrap_or_default())
    }

    fn active_sculpt_brush(&self) -> HostResult<Option<String>> {
        self.check_fault()?;
        Ok(self.scene.sculpt_brush.clone())
    }

    fn active_material(&self, object: &str) -> HostResult<Option<MaterialInfo>> {
        self.check_fault()?;
        Ok(self
            .object(object)
            .and_then(|o| o.material.as_ref())
            .map(|m| MaterialInfo {
                name: m.name.clone(),
                use_nodes: m.use_nodes,
            }))
    }

    fn principal_node(&self, material: &str) -> HostResult<Option<PrincipalNode>> {
        self.check_fault()?;
        Ok(self
            .material(material)
            .filter(|m| m.use_nodes)
            .and_then(|m| m.principal))
    }

    fn has_loaded_image_texture(&self, material: &str) -> HostResult<bool> {
        self.check_fault()?;
        Ok(self
            .material(material)
            .filter(|m| m.use_nodes)
            .is_some_and(|m| m.image_textures.iter().any(|t| t.image.is_some())))
    }

    fn has_link(&self, material: &str, link: &NodeLink) -> HostResult<bool> {
        self.check_fault()?;
        Ok(self.material(material).filter(|m| m.use_nodes).is_some_and(|m| {
            m.has_node(link.from_kind) && m.has_node(link.to_kind) && m.links.contains(link)
        }))
    }

    fn is_undo_in_progress(&self) -> HostResult<bool> {
        self.check_fault()?;
        Ok(self.scene.undo_in_progress)
    }

    fn perform(&mut self, action: &HostAction) -> HostResult<()> {
        debug!(%action, "SimulatedHost::perform: called");
        match action {
            HostAction::ResetScene => {
                self.scene.objects.clear();
                self.scene.active = None;
            }
            HostAction::DeleteActive => {
                if let Some(index) = self.scene.active.take()
                    && index < self.scene.objects.len()
                {
                    let removed = self.scene.objects.remove(index);
                    debug!(name = %removed.name, "SimulatedHost::perform: deleted active object");
                }
            }
            HostAction::CreatePrimitive(primitive) => self.create(primitive),
            HostAction::FocusMesh { name_hint, fallback } => {
                let found = self
                    .scene
                    .objects
                    .iter()
                    .position(|o| o.mesh.is_some() && name_hint.as_deref().is_none_or(|h| o.name.contains(h)));
                match (found, fallback) {
                    (Some(index), _) => {
                        self.leave_modes();
                        self.scene.active = Some(index);
                    }
                    (None, Some(primitive)) => self.create(primitive),
                    (None, None) => debug!(?name_hint, "SimulatedHost::perform: no mesh to focus"),
                }
            }
            HostAction::EnterMode(mode) => {
                let Some(index) = self.scene.active else {
                    debug!(%mode, "SimulatedHost::perform: no active object, mode unchanged");
                    return Ok(());
                };
                let object = self.scene.objects.get_mut(index).ok_or_else(|| {
                    HostError::action(action.to_string(), format!("active index {} out of range", index))
                })?;
                if *mode != InteractionMode::Object && object.mesh.is_none() {
                    return Err(HostError::action(
                        action.to_string(),
                        format!("{} is not a mesh", object.name),
                    ));
                }
                object.mode = *mode;
            }
            HostAction::ClearMeshSelection => {
                if let Ok(mesh) = self.edit_mesh_mut() {
                    mesh.selection = MeshSelection::default();
                }
            }
            HostAction::OpenPanel(kind) => {
                self.scene.open_panels.insert(*kind);
            }
        }
        Ok(())
    }
}
