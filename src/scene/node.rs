use glam::Affine3A;

use crate::scene::NodeKey;
use crate::scene::transform::Transform;

/// A named transform node of a model's hierarchy.
///
/// The name is the node's identity for retargeting: clips find their
/// targets by exact name match.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub transform: Transform,
    /// Transform the node was imported with.
    pub(crate) rest: Transform,
    pub(crate) world_matrix: Affine3A,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform,
            rest: transform,
            world_matrix: Affine3A::IDENTITY,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Pose contributed by clips that do not fully cover the node.
    #[inline]
    #[must_use]
    pub fn rest_transform(&self) -> &Transform {
        &self.rest
    }

    /// World matrix as of the last [`Model::animate`](crate::scene::Model::animate).
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }
}
