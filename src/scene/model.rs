use std::sync::Arc;

use glam::Affine3A;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, ClipIndex};
use crate::scene::environment::ReflectionTexture;
use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::scene::{MeshKey, NodeKey};

/// Name given to the synthetic node every imported hierarchy hangs from.
pub const MODEL_ROOT_NAME: &str = "Character";

/// Node name → node lookup, built while the model's nodes are created.
///
/// When several nodes share a name the first one created wins.
#[derive(Debug, Clone, Default)]
pub struct NodeNameIndex {
    map: FxHashMap<String, NodeKey>,
}

impl NodeNameIndex {
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NodeKey> {
        self.map.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn insert(&mut self, name: &str, key: NodeKey) {
        self.map.entry(name.to_string()).or_insert(key);
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub node: NodeKey,
    /// Index into the model's materials.
    pub material: Option<usize>,
    pub vertex_count: usize,
}

/// Reflection environment attached to a material.
#[derive(Debug, Clone)]
pub struct ReflectionBinding {
    pub texture: Arc<ReflectionTexture>,
    pub level: f32,
    pub environment_intensity: f32,
}

#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub reflection: Option<ReflectionBinding>,
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reflection: None,
        }
    }
}

/// What a disposal released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisposeReport {
    pub meshes: usize,
    pub clips: usize,
}

/// The bound character: hierarchy, meshes, materials and its clips.
#[derive(Debug)]
pub struct Model {
    name: String,
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
    name_index: NodeNameIndex,
    meshes: SlotMap<MeshKey, Mesh>,
    materials: Vec<Material>,
    mixer: AnimationMixer,
}

impl Model {
    /// Creates an empty model holding only its root node.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(MODEL_ROOT_NAME, Transform::IDENTITY));
        Self {
            name: name.into(),
            nodes,
            root,
            name_index: NodeNameIndex::default(),
            meshes: SlotMap::with_key(),
            materials: Vec::new(),
            mixer: AnimationMixer::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn root(&self) -> NodeKey {
        self.root
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a detached node and indexes it by name.
    pub fn add_node(&mut self, name: impl Into<String>, transform: Transform) -> NodeKey {
        let name = name.into();
        let key = self.nodes.insert(Node::new(name.clone(), transform));
        self.name_index.insert(&name, key);
        key
    }

    /// Re-parents `child` under `parent`.
    pub fn attach(&mut self, child: NodeKey, parent: NodeKey) {
        if child == parent || !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            return;
        }
        if let Some(old) = self.nodes[child].parent
            && let Some(old_parent) = self.nodes.get_mut(old)
        {
            old_parent.children.retain(|&c| c != child);
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<NodeKey> {
        self.name_index.get(name)
    }

    #[must_use]
    pub fn node_index(&self) -> &NodeNameIndex {
        &self.name_index
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // Meshes & Materials
    // ========================================================================

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshKey, &Mesh)> {
        self.meshes.iter()
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut [Material] {
        &mut self.materials
    }

    // ========================================================================
    // Animation
    // ========================================================================

    /// Retargets a library clip onto this model and registers its action.
    ///
    /// The clip is consumed; a clip without any matching node still gets an
    /// (inert) action so indices keep following fetch order.
    pub fn bind_clip(&mut self, clip: AnimationClip) -> ClipIndex {
        let bound = Binder::retarget(&self.name, &self.name_index, clip);
        self.mixer.add_action(AnimationAction::new(bound))
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut AnimationMixer {
        &mut self.mixer
    }

    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.mixer.len()
    }

    #[must_use]
    pub fn clip_name(&self, index: ClipIndex) -> Option<&str> {
        self.mixer.action(index).map(AnimationAction::name)
    }

    /// Advances the clips by `dt`, writes the pose and refreshes world matrices.
    pub fn animate(&mut self, dt: f32) {
        self.mixer.update(dt, &mut self.nodes);
        self.update_world_matrices();
    }

    pub fn update_world_matrices(&mut self) {
        let mut stack: Vec<(NodeKey, Affine3A)> = vec![(self.root, Affine3A::IDENTITY)];
        while let Some((key, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(key) else {
                continue;
            };
            node.world_matrix = parent_world * node.transform.local_matrix();
            let world = node.world_matrix;
            stack.extend(node.children.iter().map(|&child| (child, world)));
        }
    }

    /// Releases every mesh and clip of the model.
    pub fn dispose(mut self) -> DisposeReport {
        let report = DisposeReport {
            meshes: self.meshes.len(),
            clips: self.mixer.len(),
        };
        self.mixer.stop_all();
        log::info!(
            "Disposed model '{}' ({} meshes, {} clips)",
            self.name,
            report.meshes,
            report.clips
        );
        report
    }
}
