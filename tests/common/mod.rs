//! Shared fixtures: in-memory GLB files and an in-memory asset reader.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{Value, json};

use stage::assets::AssetReader;
use stage::errors::{Result, StageError};

const GLB_MAGIC: &[u8; 4] = b"glTF";
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;
const FLOAT: u32 = 5126;

/// Skeleton shared by the fixture model and most fixture clips.
pub const SKELETON: [&str; 3] = ["Hips", "Spine", "Head"];

// ============================================================================
// GLB Builder
// ============================================================================

#[derive(Default)]
struct GlbBuilder {
    bin: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl GlbBuilder {
    /// Appends float data and returns the accessor index.
    fn push_floats(&mut self, data: &[f32], count: usize, ty: &str) -> usize {
        let offset = self.bin.len();
        for value in data {
            self.bin.extend_from_slice(&value.to_le_bytes());
        }
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": data.len() * 4,
        }));
        self.accessors.push(json!({
            "bufferView": self.views.len() - 1,
            "componentType": FLOAT,
            "count": count,
            "type": ty,
        }));
        self.accessors.len() - 1
    }

    fn finish(self, mut document: Value) -> Vec<u8> {
        document["asset"] = json!({ "version": "2.0" });
        if !self.bin.is_empty() {
            document["buffers"] = json!([{ "byteLength": self.bin.len() }]);
            document["bufferViews"] = Value::Array(self.views);
            document["accessors"] = Value::Array(self.accessors);
        }
        encode_glb(&document, self.bin)
    }
}

fn encode_glb(document: &Value, mut bin: Vec<u8>) -> Vec<u8> {
    let mut json_chunk = serde_json::to_vec(document).unwrap();
    while json_chunk.len() % 4 != 0 {
        json_chunk.push(b' ');
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let mut total = 12 + 8 + json_chunk.len();
    if !bin.is_empty() {
        total += 8 + bin.len();
    }

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(GLB_MAGIC);
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());

    out.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json_chunk);

    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&bin);
    }
    out
}

/// A clip file animating `targets`: each target rotates a quarter turn
/// about Y over one second; the first one also rises by one unit.
pub fn animation_glb(name: Option<&str>, targets: &[&str]) -> Vec<u8> {
    let mut builder = GlbBuilder::default();
    let times = builder.push_floats(&[0.0, 1.0], 2, "SCALAR");
    let half = std::f32::consts::FRAC_PI_4;
    let rotations = builder.push_floats(
        &[0.0, 0.0, 0.0, 1.0, 0.0, half.sin(), 0.0, half.cos()],
        2,
        "VEC4",
    );
    let translations = builder.push_floats(&[0.0, 0.0, 0.0, 0.0, 1.0, 0.0], 2, "VEC3");

    let nodes: Vec<Value> = targets.iter().map(|n| json!({ "name": n })).collect();
    let mut samplers = vec![
        json!({ "input": times, "output": rotations, "interpolation": "LINEAR" }),
        json!({ "input": times, "output": translations, "interpolation": "LINEAR" }),
    ];
    let mut channels: Vec<Value> = (0..targets.len())
        .map(|i| json!({ "sampler": 0, "target": { "node": i, "path": "rotation" } }))
        .collect();
    if !targets.is_empty() {
        channels.push(json!({ "sampler": 1, "target": { "node": 0, "path": "translation" } }));
    } else {
        samplers.truncate(0);
    }

    let mut animation = json!({ "channels": channels, "samplers": samplers });
    if let Some(name) = name {
        animation["name"] = json!(name);
    }

    builder.finish(json!({
        "nodes": nodes,
        "scenes": [{ "nodes": [] }],
        "scene": 0,
        "animations": [animation],
    }))
}

/// A clip file whose rotation channel points at `VEC3` data.
pub fn mistyped_rotation_glb() -> Vec<u8> {
    let mut builder = GlbBuilder::default();
    let times = builder.push_floats(&[0.0, 1.0], 2, "SCALAR");
    let values = builder.push_floats(&[0.0; 6], 2, "VEC3");
    builder.finish(json!({
        "nodes": [{ "name": "Hips" }],
        "animations": [{
            "name": "Mistyped",
            "channels": [
                { "sampler": 0, "target": { "node": 0, "path": "rotation" } },
                { "sampler": 0, "target": { "node": 0, "path": "translation" } },
            ],
            "samplers": [{ "input": times, "output": values }],
        }],
    }))
}

/// A model file: the bones of `skeleton` chained under an `Armature` node,
/// plus one triangle mesh per entry of `meshes`.
pub fn model_glb(skeleton: &[&str], meshes: &[&str]) -> Vec<u8> {
    let mut builder = GlbBuilder::default();
    let positions = builder.push_floats(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        3,
        "VEC3",
    );
    builder.accessors[positions]["min"] = json!([0.0, 0.0, 0.0]);
    builder.accessors[positions]["max"] = json!([1.0, 1.0, 0.0]);

    let mut nodes = vec![json!({ "name": "Armature", "children": [1] })];
    for (i, bone) in skeleton.iter().enumerate() {
        let mut node = json!({ "name": bone, "translation": [0.0, 0.5, 0.0] });
        if i + 1 < skeleton.len() {
            node["children"] = json!([i + 2]);
        }
        nodes.push(node);
    }

    let mut roots = vec![0];
    let mut gltf_meshes = Vec::new();
    for (i, mesh) in meshes.iter().enumerate() {
        gltf_meshes.push(json!({
            "name": mesh,
            "primitives": [{ "attributes": { "POSITION": positions }, "material": 0 }],
        }));
        roots.push(nodes.len());
        nodes.push(json!({ "name": format!("{mesh}_node"), "mesh": i }));
    }

    if skeleton.is_empty() {
        nodes[0] = json!({ "name": "Armature" });
    }

    builder.finish(json!({
        "nodes": nodes,
        "meshes": gltf_meshes,
        "materials": [{ "name": "Skin" }],
        "scenes": [{ "nodes": roots }],
        "scene": 0,
    }))
}

/// A GLB made of `document` alone, with no binary chunk.
pub fn json_glb(mut document: Value) -> Vec<u8> {
    document["asset"] = json!({ "version": "2.0" });
    encode_glb(&document, Vec::new())
}

/// A valid GLB without any animation.
pub fn static_glb() -> Vec<u8> {
    model_glb(&SKELETON, &["Body"])
}

// ============================================================================
// Memory Reader
// ============================================================================

/// Serves files from a map and records every requested path in order.
#[derive(Default)]
pub struct MemoryReader {
    files: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    pub fn remove(&mut self, path: &str) {
        self.files.remove(path);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl AssetReader for MemoryReader {
    async fn read_bytes(&self, uri: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(uri.to_string());
        self.files
            .get(uri)
            .cloned()
            .ok_or_else(|| StageError::AssetNotFound(uri.to_string()))
    }
}
