//! Host capability boundary
//!
//! The lesson core never owns scene data. Everything it learns about the
//! modelling tool arrives through the [`Host`] trait: synchronous reads of
//! the live scene plus one-shot action requests issued during stage setup.
//! [`SimulatedHost`] is an in-memory implementation used by the CLI replay
//! and by tests.

mod error;
mod sim;
mod traits;
mod types;

pub use error::{HostError, HostResult};
pub use sim::{ImageTexture, MaterialData, MeshData, Scene, SceneObject, SimulatedHost};
pub use traits::Host;
pub use types::{
    HostAction, InteractionMode, MaterialInfo, MeshSelection, MeshTopology, NodeKind, NodeLink, ObjectInfo, PanelKind,
    Primitive, PrincipalNode, Transform, ViewState,
};
