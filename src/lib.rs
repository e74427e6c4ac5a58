pub mod config;
pub mod render;
pub mod utils;

// Re-export commonly used types
pub use config::core::AppConfig;
pub use render::mesh::{TriangleMesh, Vertex};
pub use render::shaders::{
    uniform_location_of, ShaderError, ShaderProgram, ShaderSources, UNIFORM_NOT_FOUND,
};
pub use render::{GlDriver, GlInfo, ShaderDriver, ShaderStage};
pub use utils::error::{InitError, INIT_FAILURE_EXIT_CODE};
