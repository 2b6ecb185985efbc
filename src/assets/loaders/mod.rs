pub mod gltf;

pub use gltf::{GltfImport, decode_data_uri};
