//! Chapter 5 rules: node materials

use crate::host::{Host, HostResult, MaterialInfo, NodeKind, NodeLink, PrincipalNode};
use crate::snapshot::BaselineSnapshot;

use super::{Validation, Validator};

const CHANGE_EPSILON: f32 = 0.01;

const NO_OBJECT: &str = "Select an object";
const NO_MATERIAL: &str = "Add a material with nodes";

enum MaterialLookup {
    NoObject,
    NoMaterial,
    Found(MaterialInfo),
}

impl MaterialLookup {
    fn incomplete(&self) -> Validation {
        match self {
            Self::NoObject => Validation::incomplete(NO_OBJECT),
            _ => Validation::incomplete(NO_MATERIAL),
        }
    }
}

fn node_material(host: &dyn Host) -> HostResult<MaterialLookup> {
    let Some(object) = host.active_object()? else {
        return Ok(MaterialLookup::NoObject);
    };
    Ok(match host.active_material(&object.name)? {
        Some(material) if material.use_nodes => MaterialLookup::Found(material),
        _ => MaterialLookup::NoMaterial,
    })
}

fn principal(host: &dyn Host) -> HostResult<Result<PrincipalNode, Validation>> {
    let material = match node_material(host)? {
        MaterialLookup::Found(material) => material,
        other => return Ok(Err(other.incomplete())),
    };
    Ok(host
        .principal_node(&material.name)?
        .ok_or_else(|| Validation::incomplete("Material has no principal shader")))
}

/// Active object has a node-based material
pub struct CreateMaterial;

impl Validator for CreateMaterial {
    fn name(&self) -> &'static str {
        "create-material"
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        match node_material(host)? {
            MaterialLookup::Found(material) => Ok(Validation::complete(format!("Material {} created", material.name))),
            other => Ok(other.incomplete()),
        }
    }
}

/// Base color differs from white in any channel
pub struct BaseColorChanged;

impl Validator for BaseColorChanged {
    fn name(&self) -> &'static str {
        "base-color"
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let node = match principal(host)? {
            Ok(node) => node,
            Err(validation) => return Ok(validation),
        };
        let delta = (node.base_color - PrincipalNode::DEFAULT_BASE_COLOR).abs();
        if delta.max_element() > CHANGE_EPSILON {
            Ok(Validation::complete("Base color changed"))
        } else {
            Ok(Validation::incomplete("Change the base color"))
        }
    }
}

/// Material has an image texture node with an image loaded
pub struct ImageTextureLoaded;

impl Validator for ImageTextureLoaded {
    fn name(&self) -> &'static str {
        "image-texture"
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let material = match node_material(host)? {
            MaterialLookup::Found(material) => material,
            other => return Ok(other.incomplete()),
        };
        if host.has_loaded_image_texture(&material.name)? {
            Ok(Validation::complete("Image texture loaded"))
        } else {
            Ok(Validation::incomplete("Add an image texture node and load an image"))
        }
    }
}

/// Image texture color output feeds the principal shader's base color
pub struct TextureLinked;

impl TextureLinked {
    fn link() -> NodeLink {
        NodeLink::new(NodeKind::ImageTexture, "Color", NodeKind::PrincipalShader, "Base Color")
    }
}

impl Validator for TextureLinked {
    fn name(&self) -> &'static str {
        "texture-link"
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let material = match node_material(host)? {
            MaterialLookup::Found(material) => material,
            other => return Ok(other.incomplete()),
        };
        if host.has_link(&material.name, &Self::link())? {
            Ok(Validation::complete("Texture linked to base color"))
        } else {
            Ok(Validation::incomplete("Link the texture Color output to Base Color"))
        }
    }
}

/// Roughness or metallic moved off its default
pub struct SurfaceFinish;

impl Validator for SurfaceFinish {
    fn name(&self) -> &'static str {
        "surface-finish"
    }

    fn check(&self, host: &dyn Host, _baseline: &BaselineSnapshot) -> HostResult<Validation> {
        let node = match principal(host)? {
            Ok(node) => node,
            Err(validation) => return Ok(validation),
        };

        let mut changed = Vec::new();
        if (node.roughness - PrincipalNode::DEFAULT_ROUGHNESS).abs() > CHANGE_EPSILON {
            changed.push("roughness");
        }
        if (node.metallic - PrincipalNode::DEFAULT_METALLIC).abs() > CHANGE_EPSILON {
            changed.push("metallic");
        }

        if changed.is_empty() {
            Ok(Validation::incomplete("Adjust roughness or metallic"))
        } else {
            Ok(Validation::complete(format!("Changed {}", changed.join(" and "))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use crate::host::SimulatedHost;

    fn material_host() -> SimulatedHost {
        let mut host = SimulatedHost::new();
        host.new_material().unwrap();
        host
    }

    #[test]
    fn test_create_material() {
        let mut host = SimulatedHost::new();
        let baseline = BaselineSnapshot::default();
        let validation = CreateMaterial.check(&host, &baseline).unwrap();
        assert_eq!(validation.message, NO_MATERIAL);

        host.new_material().unwrap();
        assert!(CreateMaterial.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_material_without_nodes() {
        let mut host = material_host();
        host.scene_mut().objects[0].material.as_mut().unwrap().use_nodes = false;
        assert!(!CreateMaterial.check(&host, &BaselineSnapshot::default()).unwrap().is_complete());
    }

    #[test]
    fn test_no_active_object() {
        let host = SimulatedHost::empty();
        let baseline = BaselineSnapshot::default();
        for validator in [
            &CreateMaterial as &dyn Validator,
            &BaseColorChanged,
            &ImageTextureLoaded,
            &TextureLinked,
            &SurfaceFinish,
        ] {
            assert_eq!(validator.check(&host, &baseline).unwrap().message, NO_OBJECT);
        }
    }

    #[test]
    fn test_base_color_any_channel() {
        let mut host = material_host();
        let baseline = BaselineSnapshot::default();
        assert!(!BaseColorChanged.check(&host, &baseline).unwrap().is_complete());

        host.set_base_color(Vec4::new(1.0, 1.0, 1.0, 0.5)).unwrap();
        assert!(BaseColorChanged.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_base_color_below_threshold() {
        let mut host = material_host();
        host.set_base_color(Vec4::new(0.995, 1.0, 1.0, 1.0)).unwrap();
        assert!(!BaseColorChanged.check(&host, &BaselineSnapshot::default()).unwrap().is_complete());
    }

    #[test]
    fn test_image_texture_needs_image() {
        let mut host = material_host();
        let baseline = BaselineSnapshot::default();
        host.add_image_texture(None).unwrap();
        assert!(!ImageTextureLoaded.check(&host, &baseline).unwrap().is_complete());

        host.add_image_texture(Some("wood.png".to_string())).unwrap();
        assert!(ImageTextureLoaded.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_texture_link_exact_socket() {
        let mut host = material_host();
        let baseline = BaselineSnapshot::default();
        host.add_image_texture(Some("wood.png".to_string())).unwrap();

        host.link_texture("Color", "Roughness").unwrap();
        assert!(!TextureLinked.check(&host, &baseline).unwrap().is_complete());

        host.link_texture("Alpha", "Base Color").unwrap();
        assert!(!TextureLinked.check(&host, &baseline).unwrap().is_complete());

        host.link_texture("Color", "Base Color").unwrap();
        assert!(TextureLinked.check(&host, &baseline).unwrap().is_complete());
    }

    #[test]
    fn test_surface_finish_reports_changes() {
        let mut host = material_host();
        let baseline = BaselineSnapshot::default();
        assert!(!SurfaceFinish.check(&host, &baseline).unwrap().is_complete());

        host.set_metallic(1.0).unwrap();
        let validation = SurfaceFinish.check(&host, &baseline).unwrap();
        assert!(validation.is_complete());
        assert_eq!(validation.message, "Changed metallic");

        host.set_roughness(0.2).unwrap();
        let validation = SurfaceFinish.check(&host, &baseline).unwrap();
        assert_eq!(validation.message, "Changed roughness and metallic");
    }
}
