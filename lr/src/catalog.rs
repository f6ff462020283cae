//! Stage catalog
//!
//! Static lookup from a (chapter, stage) position to its display text, the
//! name of the rule that accepts it, and the host actions that prepare the
//! scene for it. The chapter/stage table is fixed: {1:4, 2:4, 3:6, 4:4, 5:5}.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::host::{HostAction, InteractionMode, PanelKind, Primitive};

/// Number of chapters in the course
pub const CHAPTER_COUNT: u32 = 5;

/// Stages per chapter, indexed by `chapter - 1`
const MAX_STAGES: [u32; CHAPTER_COUNT as usize] = [4, 4, 6, 4, 5];

/// Chapter whose stages measure sculpt deformation against captured vertices
pub const SCULPT_CHAPTER: u32 = 4;

/// A (chapter, stage) position, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StageKey {
    pub chapter: u32,
    pub stage: u32,
}

impl StageKey {
    pub const FIRST: StageKey = StageKey::new(1, 1);

    pub const fn new(chapter: u32, stage: u32) -> Self {
        Self { chapter, stage }
    }

    /// Whether this position exists in the stage table
    pub fn is_valid(&self) -> bool {
        max_stages(self.chapter).is_some_and(|max| (1..=max).contains(&self.stage))
    }

    /// The position after this one, or `None` at the end of the course
    pub fn next(&self) -> Option<StageKey> {
        let max = max_stages(self.chapter)?;
        if self.stage < max {
            Some(StageKey::new(self.chapter, self.stage + 1))
        } else if self.chapter < CHAPTER_COUNT {
            Some(StageKey::new(self.chapter + 1, 1))
        } else {
            None
        }
    }
}

impl Default for StageKey {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.chapter, self.stage)
    }
}

/// Display metadata for one stage
///
/// Unknown positions yield the empty descriptor (`Default`), never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StageDescriptor {
    pub title: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<&'static str>,
    /// Name of the validator that accepts this stage
    pub rule: &'static str,
}

impl StageDescriptor {
    pub fn is_empty(&self) -> bool {
        self.rule.is_empty()
    }
}

const CH1: &str = "Chapter 1: Basic Operations";
const CH2: &str = "Chapter 2: View Navigation";
const CH3: &str = "Chapter 3: Modeling Basics";
const CH4: &str = "Chapter 4: Sculpting";
const CH5: &str = "Chapter 5: Material Nodes";
const SCULPT_TIP: &str = "Tip: feel free to experiment!";

const fn entry(
    title: &'static str,
    name: &'static str,
    description: &'static str,
    control: Option<&'static str>,
    rule: &'static str,
) -> StageDescriptor {
    StageDescriptor {
        title,
        name,
        description,
        details: None,
        control,
        tip: None,
        rule,
    }
}

const fn with_tip(descriptor: StageDescriptor, tip: &'static str) -> StageDescriptor {
    StageDescriptor {
        tip: Some(tip),
        ..descriptor
    }
}

const fn with_details(descriptor: StageDescriptor, details: &'static str) -> StageDescriptor {
    StageDescriptor {
        details: Some(details),
        ..descriptor
    }
}

const CATALOG: [(StageKey, StageDescriptor); 23] = [
    (
        StageKey::new(1, 1),
        entry(CH1, "Stage 1: Select the cube", "Select the cube", None, "select-cube"),
    ),
    (
        StageKey::new(1, 2),
        entry(CH1, "Stage 2: Move the cube", "Move it +2 along the X axis", None, "move-cube"),
    ),
    (
        StageKey::new(1, 3),
        entry(CH1, "Stage 3: Rotate the cube", "Rotate it 45 degrees around the X axis", None, "rotate-cube"),
    ),
    (
        StageKey::new(1, 4),
        entry(CH1, "Stage 4: Scale the cube", "Change its size", None, "scale-cube"),
    ),
    (
        StageKey::new(2, 1),
        entry(CH2, "Stage 1: Pan the view", "Pan with Shift + middle mouse", Some("Shift + middle-drag"), "pan-view"),
    ),
    (
        StageKey::new(2, 2),
        entry(CH2, "Stage 2: Zoom", "Zoom with the scroll wheel", Some("Scroll wheel"), "zoom-view"),
    ),
    (
        StageKey::new(2, 3),
        entry(CH2, "Stage 3: Orbit the view", "Orbit with the middle mouse", Some("Middle-drag"), "orbit-view"),
    ),
    (
        StageKey::new(2, 4),
        entry(CH2, "Stage 4: Master the view", "Pan and zoom together", Some("All view controls"), "master-view"),
    ),
    (
        StageKey::new(3, 1),
        entry(CH3, "Stage 1: Edit mode", "Switch with the Tab key", Some("Tab"), "enter-edit-mode"),
    ),
    (
        StageKey::new(3, 2),
        entry(CH3, "Stage 2: Select vertices", "Select at least 3 vertices", Some("1"), "select-vertices"),
    ),
    (
        StageKey::new(3, 3),
        entry(CH3, "Stage 3: Select edges", "Select an edge", Some("2"), "select-edges"),
    ),
    (
        StageKey::new(3, 4),
        entry(CH3, "Stage 4: Select faces", "Select a face", Some("3"), "select-faces"),
    ),
    (
        StageKey::new(3, 5),
        entry(CH3, "Stage 5: Extrude", "Extrude a face with E", Some("E"), "extrude"),
    ),
    (
        StageKey::new(3, 6),
        entry(CH3, "Stage 6: Loop cut", "Add a loop cut with Ctrl+R", Some("Ctrl+R"), "loop-cut"),
    ),
    (
        StageKey::new(4, 1),
        entry(CH4, "Stage 1: Sculpt mode", "Enter sculpt mode", None, "enter-sculpt-mode"),
    ),
    (
        StageKey::new(4, 2),
        with_tip(
            entry(
                CH4,
                "Stage 2: Use the Draw brush",
                "Deform the sphere surface with the Draw brush",
                Some("Drag with the Draw brush"),
                "sculpt-deform",
            ),
            SCULPT_TIP,
        ),
    ),
    (
        StageKey::new(4, 3),
        with_tip(
            entry(
                CH4,
                "Stage 3: Switch to the Smooth brush",
                "Select the Smooth brush",
                Some("Pick the Smooth brush"),
                "smooth-brush",
            ),
            SCULPT_TIP,
        ),
    ),
    (
        StageKey::new(4, 4),
        with_tip(
            entry(
                CH4,
                "Stage 4: Switch to the Grab brush",
                "Select the Grab brush",
                Some("Pick the Grab brush"),
                "grab-brush",
            ),
            SCULPT_TIP,
        ),
    ),
    (
        StageKey::new(5, 1),
        with_details(
            entry(CH5, "Stage 1: Create a material", "Press the New button", None, "create-material"),
            "Open the Shading workspace from the top bar,\nthen press New to create a material.",
        ),
    ),
    (
        StageKey::new(5, 2),
        with_details(
            entry(CH5, "Stage 2: Change the color", "Change the Base Color", None, "base-color"),
            "Change the base color on the Principled BSDF node\nto recolor the object.",
        ),
    ),
    (
        StageKey::new(5, 3),
        with_details(
            entry(
                CH5,
                "Stage 3: Add an image texture",
                "Add > Image Texture and open an image",
                None,
                "image-texture",
            ),
            "From the menu pick\n\nAdd > Texture > Image Texture\n\nand open any image you like.",
        ),
    ),
    (
        StageKey::new(5, 4),
        with_details(
            entry(
                CH5,
                "Stage 4: Connect the nodes",
                "Connect Image Texture to Base Color",
                None,
                "texture-link",
            ),
            "Connect the Color output of the Image Texture node\nto the Base Color input of the Principled BSDF.",
        ),
    ),
    (
        StageKey::new(5, 5),
        with_details(
            entry(
                CH5,
                "Stage 5: Tune the surface",
                "Change Roughness or Metallic",
                None,
                "surface-finish",
            ),
            "Change Roughness or Metallic on the Principled BSDF\nto make the material look real.",
        ),
    ),
];

/// Number of stages in a chapter, or `None` for an unknown chapter
pub fn max_stages(chapter: u32) -> Option<u32> {
    chapter
        .checked_sub(1)
        .and_then(|i| MAX_STAGES.get(i as usize))
        .copied()
}

/// Total number of stages in the course
pub fn stage_count() -> usize {
    CATALOG.len()
}

/// Every stage position in course order
pub fn keys() -> impl Iterator<Item = StageKey> {
    CATALOG.iter().map(|(key, _)| *key)
}

/// Display metadata for a position; empty for unknown positions
pub fn describe(key: StageKey) -> StageDescriptor {
    debug!(%key, "describe: called");
    CATALOG
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, descriptor)| *descriptor)
        .unwrap_or_default()
}

/// Whether stage setup captures per-vertex positions
pub fn captures_vertices(key: StageKey) -> bool {
    key.chapter == SCULPT_CHAPTER
}

/// Host actions that prepare the scene before the baseline is captured
pub fn setup_actions(key: StageKey) -> Vec<HostAction> {
    debug!(%key, "setup_actions: called");
    match key.chapter {
        1 => vec![HostAction::ResetScene, HostAction::CreatePrimitive(Primitive::cube())],
        3 => {
            let mut actions = vec![
                // a scene left over from another chapter may have no cube to edit
                HostAction::FocusMesh {
                    name_hint: Some("Cube".to_string()),
                    fallback: Some(Primitive::cube()),
                },
                HostAction::EnterMode(InteractionMode::Object),
            ];
            // loop cut starts from a fresh cube, not whatever the extrude stage left behind
            if key.stage == 6 {
                actions.push(HostAction::DeleteActive);
                actions.push(HostAction::CreatePrimitive(Primitive::cube()));
            }
            actions.push(HostAction::EnterMode(InteractionMode::EditMesh));
            actions.push(HostAction::ClearMeshSelection);
            actions
        }
        4 => vec![
            HostAction::ResetScene,
            HostAction::CreatePrimitive(Primitive::uv_sphere()),
            HostAction::EnterMode(InteractionMode::Sculpt),
        ],
        5 => {
            let mut actions = vec![
                HostAction::EnterMode(InteractionMode::Object),
                HostAction::FocusMesh {
                    name_hint: None,
                    fallback: Some(Primitive::cube()),
                },
            ];
            if key.stage == 1 {
                actions.push(HostAction::OpenPanel(PanelKind::ShaderEditor));
            }
            actions
        }
        _ => Vec::new(),
    }
}
