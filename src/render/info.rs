use gl::types::*;
use std::ffi::CStr;
use std::fmt;

/// Driver identification strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlInfo {
    pub version: String,
    pub glsl_version: String,
    pub renderer: String,
    pub vendor: String,
}

impl GlInfo {
    /// Queries the current context.
    pub fn query() -> Self {
        Self {
            version: get_string(gl::VERSION),
            glsl_version: get_string(gl::SHADING_LANGUAGE_VERSION),
            renderer: get_string(gl::RENDERER),
            vendor: get_string(gl::VENDOR),
        }
    }

    pub fn log(&self) {
        for line in self.to_string().lines() {
            log::info!("{}", line);
        }
    }
}

impl fmt::Display for GlInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OpenGL version: {}", self.version)?;
        writeln!(f, "GLSL version: {}", self.glsl_version)?;
        writeln!(f, "Renderer: {}", self.renderer)?;
        write!(f, "Vendor: {}", self.vendor)
    }
}

fn get_string(name: GLenum) -> String {
    let ptr = unsafe { gl::GetString(name) };
    if ptr.is_null() {
        return String::from("<unknown>");
    }
    unsafe { CStr::from_ptr(ptr as *const _) }
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let info = GlInfo {
            version: "4.6.0".into(),
            glsl_version: "4.60".into(),
            renderer: "Mesa".into(),
            vendor: "Intel".into(),
        };
        let text = info.to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("OpenGL version: 4.6.0"));
        assert!(text.ends_with("Vendor: Intel"));
    }
}
