use base64::Engine;
use glam::{Quat, Vec3};
use gltf::accessor::{DataType, Dimensions};
use gltf::animation::Property;
use gltf::json::validation::Checked;

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::errors::{Result, StageError};
use crate::scene::model::{Material, Mesh, Model};
use crate::scene::transform::Transform;
use crate::scene::NodeKey;

/// A parsed glTF/GLB document with its buffers resolved in memory.
///
/// Only self-contained assets are supported: buffers must come from the GLB
/// binary chunk or from base64 data URIs.
pub struct GltfImport {
    path: String,
    document: gltf::Gltf,
    buffers: Vec<Vec<u8>>,
}

impl GltfImport {
    /// Parses and validates `bytes` read from `path` (used for naming and
    /// error messages).
    ///
    /// Any structural problem (dangling indices, buffer views or accessors
    /// reaching past their data) is reported as [`StageError::MalformedAsset`]
    /// before a single keyframe is read.
    pub fn parse(bytes: &[u8], path: &str) -> Result<Self> {
        let malformed = |reason: String| StageError::MalformedAsset {
            path: path.to_string(),
            reason,
        };

        let document = gltf::Gltf::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;
        check_channels(document.as_json()).map_err(malformed)?;
        let buffers = Self::load_buffers(&document, path)?;
        check_ranges(&document, &buffers).map_err(malformed)?;

        Ok(Self {
            path: path.to_string(),
            document,
            buffers,
        })
    }

    #[must_use]
    pub fn animation_count(&self) -> usize {
        self.document.animations().count()
    }

    fn load_buffers(gltf: &gltf::Gltf, path: &str) -> Result<Vec<Vec<u8>>> {
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            match buffer.source() {
                gltf::buffer::Source::Bin => {
                    let Some(blob) = gltf.blob.as_deref() else {
                        return Err(StageError::MalformedAsset {
                            path: path.to_string(),
                            reason: "missing GLB binary chunk".to_string(),
                        });
                    };
                    buffer_data.push(blob.to_vec());
                }
                gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                    buffer_data.push(decode_data_uri(uri)?);
                }
                gltf::buffer::Source::Uri(uri) => {
                    return Err(StageError::MalformedAsset {
                        path: path.to_string(),
                        reason: format!("external buffer '{uri}' is not supported"),
                    });
                }
            }
        }
        Ok(buffer_data)
    }

    fn buffer(&self, index: usize) -> Option<&[u8]> {
        self.buffers.get(index).map(Vec::as_slice)
    }

    // ========================================================================
    // Animations
    // ========================================================================

    /// Converts every animation of the document into a clip.
    ///
    /// Unnamed animations take `fallback_name`. Channels without readable
    /// data and morph target weights are skipped.
    #[must_use]
    pub fn animations(&self, fallback_name: &str) -> Vec<AnimationClip> {
        let mut animations = Vec::new();

        for anim in self.document.animations() {
            let mut tracks = Vec::new();

            for channel in anim.channels() {
                let reader = channel.reader(|buffer| self.buffer(buffer.index()));
                let target = channel.target();
                let gltf_node = target.node();

                let node_name = gltf_node
                    .name()
                    .map_or_else(|| format!("Node_{}", gltf_node.index()), str::to_string);

                let sampler = channel.sampler();
                let output_readable = match target.property() {
                    Property::Translation | Property::Scale => {
                        is_readable(&sampler.output(), Dimensions::Vec3)
                            && sampler.output().data_type() == DataType::F32
                    }
                    Property::Rotation => {
                        is_readable(&sampler.output(), Dimensions::Vec4)
                            && sampler.output().data_type() != DataType::U32
                    }
                    Property::MorphTargetWeights => continue,
                };
                let input_readable = is_readable(&sampler.input(), Dimensions::Scalar)
                    && sampler.input().data_type() == DataType::F32;
                if !(input_readable && output_readable) {
                    log::warn!("{}: unreadable accessors on '{node_name}'", self.path);
                    continue;
                }

                let Some(inputs) = reader.read_inputs() else {
                    log::warn!("{}: channel on '{node_name}' has no keyframe times", self.path);
                    continue;
                };
                let times: Vec<f32> = inputs.collect();

                let interpolation = match sampler.interpolation() {
                    gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                    gltf::animation::Interpolation::Step => InterpolationMode::Step,
                    gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
                };

                let Some(outputs) = reader.read_outputs() else {
                    log::warn!("{}: channel on '{node_name}' has no keyframe values", self.path);
                    continue;
                };

                let (target_path, data) = match outputs {
                    gltf::animation::util::ReadOutputs::Translations(iter) => (
                        TargetPath::Translation,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::Rotations(iter) => (
                        TargetPath::Rotation,
                        TrackData::Quaternion(KeyframeTrack::new(
                            times,
                            iter.into_f32().map(Quat::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::Scales(iter) => (
                        TargetPath::Scale,
                        TrackData::Vector3(KeyframeTrack::new(
                            times,
                            iter.map(Vec3::from_array).collect(),
                            interpolation,
                        )),
                    ),
                    gltf::animation::util::ReadOutputs::MorphTargetWeights(_) => continue,
                };

                let well_formed = match &data {
                    TrackData::Vector3(t) => t.is_well_formed(),
                    TrackData::Quaternion(t) => t.is_well_formed(),
                };
                if !well_formed {
                    log::warn!("{}: dropping malformed track on '{node_name}'", self.path);
                    continue;
                }

                tracks.push(Track {
                    meta: TrackMeta {
                        node_name,
                        target: target_path,
                    },
                    data,
                });
            }

            let clip = AnimationClip::new(anim.name().unwrap_or(fallback_name), tracks);
            animations.push(clip);
        }

        animations
    }

    // ========================================================================
    // Model
    // ========================================================================

    /// Builds a model from the default scene (or the first scene).
    ///
    /// Scene roots hang from the model's synthetic root node. Every primitive
    /// becomes one mesh named after its glTF mesh.
    pub fn into_model(self, name: &str) -> Result<Model> {
        let gltf = &self.document;
        let mut model = Model::new(name);

        for material in gltf.materials() {
            let material_name = material.name().map_or_else(
                || format!("Material_{}", material.index().unwrap_or_default()),
                str::to_string,
            );
            model.add_material(Material::new(material_name));
        }

        let node_mapping: Vec<NodeKey> = gltf
            .nodes()
            .map(|node| {
                let node_name = node
                    .name()
                    .map_or_else(|| format!("Node_{}", node.index()), str::to_string);
                let (t, r, s) = node.transform().decomposed();
                let transform = Transform::from_trs(
                    Vec3::from_array(t),
                    Quat::from_array(r),
                    Vec3::from_array(s),
                );
                model.add_node(node_name, transform)
            })
            .collect();

        // Unvalidated documents may reference nodes that do not exist.
        let key_of = |index: usize| node_mapping.get(index).copied();

        for node in gltf.nodes() {
            let Some(key) = key_of(node.index()) else {
                continue;
            };
            for child in node.children() {
                if let Some(child_key) = key_of(child.index()) {
                    model.attach(child_key, key);
                }
            }

            let Some(mesh) = node.mesh() else {
                continue;
            };
            let mesh_name = mesh
                .name()
                .map_or_else(|| format!("Mesh_{}", mesh.index()), str::to_string);
            for primitive in mesh.primitives() {
                let vertex_count = primitive
                    .get(&gltf::Semantic::Positions)
                    .map_or(0, |accessor| accessor.count());
                model.add_mesh(Mesh {
                    name: mesh_name.clone(),
                    node: key,
                    material: primitive.material().index(),
                    vertex_count,
                });
            }
        }

        let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) else {
            return Err(StageError::MalformedAsset {
                path: self.path.clone(),
                reason: "document has no scene".to_string(),
            });
        };
        let root = model.root();
        for key in scene.nodes().filter_map(|node| key_of(node.index())) {
            model.attach(key, root);
        }

        model.update_world_matrices();
        Ok(model)
    }
}

/// Channel targets are not covered by document validation.
fn check_channels(root: &gltf::json::Root) -> std::result::Result<(), String> {
    for (a, animation) in root.animations.iter().enumerate() {
        for (c, channel) in animation.channels.iter().enumerate() {
            if channel.target.node.value() >= root.nodes.len() {
                return Err(format!("animation {a} channel {c} targets a missing node"));
            }
            if matches!(channel.target.path, Checked::Invalid) {
                return Err(format!("animation {a} channel {c} has an unknown target path"));
            }
        }
    }
    Ok(())
}

/// Every buffer must hold its declared length, and every view and accessor
/// must fit inside the data it points into.
fn check_ranges(document: &gltf::Document, buffers: &[Vec<u8>]) -> std::result::Result<(), String> {
    for buffer in document.buffers() {
        let available = buffers.get(buffer.index()).map_or(0, Vec::len);
        if available < buffer.length() {
            return Err(format!(
                "buffer {} holds {available} of {} bytes",
                buffer.index(),
                buffer.length()
            ));
        }
    }

    for view in document.views() {
        let end = view.offset().checked_add(view.length());
        if end.is_none_or(|end| end > view.buffer().length()) {
            return Err(format!("buffer view {} exceeds its buffer", view.index()));
        }
    }

    for accessor in document.accessors() {
        let Some(view) = accessor.view() else {
            continue;
        };
        let stride = view.stride().unwrap_or_else(|| accessor.size());
        let end = match accessor.count() {
            0 => Some(accessor.offset()),
            count => (count - 1)
                .checked_mul(stride)
                .and_then(|span| span.checked_add(accessor.size()))
                .and_then(|span| span.checked_add(accessor.offset())),
        };
        if end.is_none_or(|end| end > view.length()) {
            return Err(format!("accessor {} exceeds its buffer view", accessor.index()));
        }
    }
    Ok(())
}

/// Whether keyframes can be read from `accessor` as `dimensions` items.
fn is_readable(accessor: &gltf::Accessor<'_>, dimensions: Dimensions) -> bool {
    let Some(view) = accessor.view() else {
        return false;
    };
    accessor.sparse().is_none()
        && accessor.count() > 0
        && accessor.dimensions() == dimensions
        && view.stride().is_none_or(|stride| stride >= accessor.size())
}

/// Decodes a `data:[<mime>][;base64],<payload>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let Some(rest) = uri.strip_prefix("data:") else {
        return Err(StageError::DataUriError(format!("not a data URI: {uri}")));
    };
    let Some((header, payload)) = rest.split_once(',') else {
        return Err(StageError::DataUriError("missing ',' separator".to_string()));
    };
    if !header.ends_with(";base64") {
        return Err(StageError::DataUriError(
            "only base64 data URIs are supported".to_string(),
        ));
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}
