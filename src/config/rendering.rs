use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlProfileKind {
    Core,
    Compatibility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Requested context version as `[major, minor]`.
    pub gl_version: [u8; 2],
    pub profile: GlProfileKind,
    pub clear_color: [f32; 4],
    pub vsync: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gl_version: [4, 6],
            profile: GlProfileKind::Core,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vsync: true,
        }
    }
}
