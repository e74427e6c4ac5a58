pub mod driver;
pub mod info;
pub mod mesh;
#[cfg(test)]
pub(crate) mod mock;
pub mod shaders;
pub mod surface;

pub use driver::{GlDriver, ShaderDriver, ShaderStage};
pub use info::GlInfo;
pub use mesh::{TriangleMesh, Vertex};
pub use shaders::{
    uniform_location_of, ShaderError, ShaderProgram, ShaderSources, UNIFORM_NOT_FOUND,
};
pub use surface::pick_most_samples;
