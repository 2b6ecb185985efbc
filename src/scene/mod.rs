//! Scene Module
//!
//! Data-only stage consumed by a renderer:
//!
//! - [`Scene`]: static setup, the live [`Model`], shadow casters, environment
//!   and its [`Skybox`]
//! - [`Model`]: a bound character with nodes, meshes, materials and clips
//! - [`StageSetup`]: camera, lights, ground and shadow parameters

pub mod bootstrap;
pub mod environment;
pub mod model;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
    pub struct MeshKey;
}

pub use bootstrap::StageSetup;
pub use environment::{ReflectionTexture, SKYBOX_NAME, Skybox};
pub use model::{DisposeReport, Material, Mesh, Model, NodeNameIndex};
pub use node::Node;
pub use scene::{Scene, ShadowCasterRegistry, Viewport};
pub use transform::Transform;
