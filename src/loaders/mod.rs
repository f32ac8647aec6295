pub mod gltf;

pub use gltf::{import_model, import_model_file, is_supported_model, model_name, ImportError, IMPORT_POSITION, SUPPORTED_EXTENSIONS};
