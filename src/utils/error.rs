use thiserror::Error;

/// Process exit code for any startup failure.
pub const INIT_FAILURE_EXIT_CODE: i32 = -1;

/// Failures while bringing up the window and GL context. All of these
/// are fatal for the program.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to create window: {0}")]
    Window(String),

    #[error("Failed to create OpenGL context: {0}")]
    Context(String),

    #[error("No usable framebuffer config")]
    NoFramebufferConfig,

    #[error("Failed to load OpenGL function pointers (missing {0})")]
    Loader(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            InitError::Loader("glCreateShader").to_string(),
            "Failed to load OpenGL function pointers (missing glCreateShader)"
        );
        assert!(InitError::Context("no display".into())
            .to_string()
            .ends_with("no display"));
        assert_eq!(
            InitError::NoFramebufferConfig.to_string(),
            "No usable framebuffer config"
        );
    }
}
