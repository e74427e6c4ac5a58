pub mod core;
pub mod rendering;
pub mod window;

pub use self::core::{AppConfig, ShaderPaths};
pub use rendering::{GlProfileKind, RenderConfig};
pub use window::WindowConfig;
