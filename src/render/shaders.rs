// shaders.rs - Shader program loading

use super::driver::{GlDriver, ShaderDriver, ShaderStage};
use gl::types::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{CString, NulError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Location returned by [`ShaderProgram::uniform_location`] when the
/// uniform does not exist in the linked program.
pub const UNIFORM_NOT_FOUND: GLint = -1;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Failed to read shader file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
    #[error("Driver failed to create {0} object")]
    ObjectCreation(&'static str),
    #[error("{stage} shader compilation failed: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("Program linking failed: {0}")]
    Linking(String),
    #[error("Shader program is not loaded")]
    NotLoaded,
}

/// Source text for every stage of one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub geometry: Option<String>,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            geometry: None,
            fragment: fragment.into(),
        }
    }

    pub fn with_geometry(
        vertex: impl Into<String>,
        geometry: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            vertex: vertex.into(),
            geometry: Some(geometry.into()),
            fragment: fragment.into(),
        }
    }

    /// Reads every file before returning, so a missing file is reported
    /// before any driver work happens.
    pub fn from_files(
        vertex_path: impl AsRef<Path>,
        geometry_path: Option<&Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex = read_source(vertex_path.as_ref())?;
        let geometry = geometry_path.map(read_source).transpose()?;
        let fragment = read_source(fragment_path.as_ref())?;
        Ok(Self {
            vertex,
            geometry,
            fragment,
        })
    }

    fn stages(&self) -> impl Iterator<Item = (ShaderStage, &str)> {
        [
            Some((ShaderStage::Vertex, self.vertex.as_str())),
            self.geometry
                .as_deref()
                .map(|src| (ShaderStage::Geometry, src)),
            Some((ShaderStage::Fragment, self.fragment.as_str())),
        ]
        .into_iter()
        .flatten()
    }
}

fn read_source(path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A compiled stage object, deleted when it goes out of scope.
struct CompiledStage<'d, D: ShaderDriver> {
    driver: &'d D,
    id: GLuint,
}

impl<'d, D: ShaderDriver> CompiledStage<'d, D> {
    fn compile(driver: &'d D, stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let source = CString::new(source.as_bytes())?;

        let id = driver.create_shader(stage);
        if id == 0 {
            return Err(ShaderError::ObjectCreation("shader"));
        }
        let shader = Self { driver, id };

        driver.shader_source(id, &source);
        driver.compile_shader(id);

        if !driver.compile_status(id) {
            let log = driver.shader_info_log(id);
            log::error!("Failed to compile {} shader:\n{}", stage, log);
            return Err(ShaderError::Compilation { stage, log });
        }

        Ok(shader)
    }
}

impl<D: ShaderDriver> Drop for CompiledStage<'_, D> {
    fn drop(&mut self) {
        self.driver.delete_shader(self.id);
    }
}

/// A program object that is deleted on drop unless handed out with
/// [`PendingProgram::into_raw`].
struct PendingProgram<'d, D: ShaderDriver> {
    driver: &'d D,
    id: GLuint,
}

impl<D: ShaderDriver> PendingProgram<'_, D> {
    fn into_raw(mut self) -> GLuint {
        std::mem::replace(&mut self.id, 0)
    }
}

impl<D: ShaderDriver> Drop for PendingProgram<'_, D> {
    fn drop(&mut self) {
        if self.id != 0 {
            self.driver.delete_program(self.id);
        }
    }
}

/// A linked vertex/fragment (optionally geometry) program.
///
/// Starts unloaded (`id() == 0`). A successful load stores the program
/// handle; a failed load leaves the program unloaded with no driver
/// objects left behind. The handle is released on [`ShaderProgram::clear`]
/// or on drop.
pub struct ShaderProgram<D: ShaderDriver = GlDriver> {
    driver: D,
    id: GLuint,
    uniforms: RefCell<HashMap<String, GLint>>,
}

impl<D: ShaderDriver> ShaderProgram<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            id: 0,
            uniforms: RefCell::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn is_loaded(&self) -> bool {
        self.id != 0
    }

    pub fn load_from_source(&mut self, vertex: &str, fragment: &str) -> Result<(), ShaderError> {
        self.load(&ShaderSources::new(vertex, fragment))
    }

    pub fn load_from_source_with_geometry(
        &mut self,
        vertex: &str,
        geometry: &str,
        fragment: &str,
    ) -> Result<(), ShaderError> {
        self.load(&ShaderSources::with_geometry(vertex, geometry, fragment))
    }

    pub fn load_from_files(
        &mut self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<(), ShaderError> {
        self.clear();
        let sources = ShaderSources::from_files(vertex_path, None, fragment_path)?;
        self.load(&sources)
    }

    pub fn load_from_files_with_geometry(
        &mut self,
        vertex_path: impl AsRef<Path>,
        geometry_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<(), ShaderError> {
        self.clear();
        let sources = ShaderSources::from_files(
            vertex_path,
            Some(geometry_path.as_ref()),
            fragment_path,
        )?;
        self.load(&sources)
    }

    /// Compiles and links `sources`, replacing any previously loaded
    /// program. The old program is released before compiling starts.
    pub fn load(&mut self, sources: &ShaderSources) -> Result<(), ShaderError> {
        self.clear();
        let id = Self::compile_and_link(&self.driver, sources)?;
        log::debug!("Linked shader program {}", id);
        self.id = id;
        Ok(())
    }

    fn compile_and_link(driver: &D, sources: &ShaderSources) -> Result<GLuint, ShaderError> {
        let stages = sources
            .stages()
            .map(|(stage, src)| CompiledStage::compile(driver, stage, src))
            .collect::<Result<Vec<_>, _>>()?;

        let id = driver.create_program();
        if id == 0 {
            return Err(ShaderError::ObjectCreation("program"));
        }
        let program = PendingProgram { driver, id };

        for stage in &stages {
            driver.attach_shader(id, stage.id);
        }
        driver.link_program(id);
        for stage in &stages {
            driver.detach_shader(id, stage.id);
        }

        if !driver.link_status(id) {
            let log = driver.program_info_log(id);
            log::error!("Failed to link shader program:\n{}", log);
            return Err(ShaderError::Linking(log));
        }

        Ok(program.into_raw())
    }

    /// Makes this program current for subsequent draw calls.
    pub fn bind(&self) -> Result<(), ShaderError> {
        if !self.is_loaded() {
            return Err(ShaderError::NotLoaded);
        }
        self.driver.use_program(self.id);
        Ok(())
    }

    /// Releases the program. Safe to call on an unloaded program.
    pub fn clear(&mut self) {
        if self.id != 0 {
            self.driver.delete_program(self.id);
            self.id = 0;
        }
        self.uniforms.get_mut().clear();
    }

    pub fn uniform_location(&self, name: &str) -> GLint {
        if !self.is_loaded() {
            return UNIFORM_NOT_FOUND;
        }
        if let Some(location) = self.uniforms.borrow().get(name) {
            return *location;
        }

        let location = uniform_location_of(&self.driver, self.id, name);
        self.uniforms.borrow_mut().insert(name.to_string(), location);
        location
    }

    fn uniform_for_upload(&self, name: &str) -> Result<Option<GLint>, ShaderError> {
        self.bind()?;
        let location = self.uniform_location(name);
        if location == UNIFORM_NOT_FOUND {
            log::warn!("Uniform '{}' not found in shader", name);
            return Ok(None);
        }
        Ok(Some(location))
    }

    pub fn set_uniform_1i(&self, name: &str, value: i32) -> Result<(), ShaderError> {
        if let Some(location) = self.uniform_for_upload(name)? {
            self.driver.uniform_1i(location, value);
        }
        Ok(())
    }

    pub fn set_uniform_1f(&self, name: &str, value: f32) -> Result<(), ShaderError> {
        if let Some(location) = self.uniform_for_upload(name)? {
            self.driver.uniform_1f(location, value);
        }
        Ok(())
    }

    pub fn set_uniform_3f(&self, name: &str, x: f32, y: f32, z: f32) -> Result<(), ShaderError> {
        if let Some(location) = self.uniform_for_upload(name)? {
            self.driver.uniform_3f(location, x, y, z);
        }
        Ok(())
    }

    pub fn set_uniform_mat4(&self, name: &str, mat: &[f32; 16]) -> Result<(), ShaderError> {
        if let Some(location) = self.uniform_for_upload(name)? {
            self.driver.uniform_mat4(location, mat);
        }
        Ok(())
    }
}

/// Looks up `name` in a linked program by raw handle. Returns
/// [`UNIFORM_NOT_FOUND`] for handle 0 or a name containing NUL.
pub fn uniform_location_of<D: ShaderDriver>(driver: &D, program: GLuint, name: &str) -> GLint {
    if program == 0 {
        return UNIFORM_NOT_FOUND;
    }
    match CString::new(name) {
        Ok(cname) => driver.uniform_location(program, &cname),
        Err(_) => UNIFORM_NOT_FOUND,
    }
}

impl<D: ShaderDriver> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        self.clear();
    }
}
