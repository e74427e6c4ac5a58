//! In-memory `ShaderDriver` used by the unit tests.
//!
//! It does not understand GLSL. Compilation checks only what the tests
//! need: a `#version` line, a `void main()` entry point, and that every
//! plain statement line ends in `;`. Linking requires a vertex and a
//! fragment stage, and that each fragment `in` has a matching `out` in
//! an earlier stage.

use super::driver::{ShaderDriver, ShaderStage};
use gl::types::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ffi::CStr;

#[derive(Debug, Default)]
struct MockShader {
    stage: Option<ShaderStage>,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct MockProgram {
    attached: Vec<GLuint>,
    linked: bool,
    log: String,
    uniforms: HashMap<String, GLint>,
}

#[derive(Debug, Default)]
pub struct MockDriver {
    next_id: Cell<GLuint>,
    shaders: RefCell<HashMap<GLuint, MockShader>>,
    programs: RefCell<HashMap<GLuint, MockProgram>>,
    current: Cell<GLuint>,
    pub shaders_created: Cell<usize>,
    pub programs_deleted: Cell<usize>,
    pub detach_calls: Cell<usize>,
    pub uploads: RefCell<Vec<(GLint, String)>>,
    /// When set, the matching create call returns 0 like an out-of-memory driver.
    pub fail_create_shader: Cell<bool>,
    pub fail_create_program: Cell<bool>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.borrow().len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.borrow().len()
    }

    pub fn current_program(&self) -> GLuint {
        self.current.get()
    }

    fn alloc(&self) -> GLuint {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn check_source(source: &str) -> Result<(), String> {
        if !source.trim_start().starts_with("#version") {
            return Err("0:1: error: #version directive missing".into());
        }
        if !source.contains("void main()") {
            return Err("0:0: error: missing entry point 'main'".into());
        }
        for (idx, line) in source.lines().enumerate() {
            let line = line.trim();
            let is_statement = !(line.is_empty()
                || line.starts_with('#')
                || line.starts_with("//")
                || line.ends_with('{')
                || line.ends_with('}')
                || line.ends_with(';'));
            if is_statement {
                return Err(format!(
                    "0:{}: error: syntax error, unexpected end of line, expecting ';'",
                    idx + 1
                ));
            }
        }
        Ok(())
    }

    fn declarations<'a>(source: &'a str, qualifier: &str) -> Vec<&'a str> {
        source
            .lines()
            .filter_map(|line| {
                let line = line.trim().trim_end_matches(';');
                let line = match line.find(')') {
                    Some(pos) if line.starts_with("layout") => line[pos + 1..].trim(),
                    _ => line,
                };
                let mut words = line.split_whitespace();
                match (words.next(), words.next(), words.next()) {
                    (Some(q), Some(_ty), Some(name)) if q == qualifier => Some(name),
                    _ => None,
                }
            })
            .collect()
    }
}

impl ShaderDriver for MockDriver {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        if self.fail_create_shader.get() {
            return 0;
        }
        let id = self.alloc();
        self.shaders_created.set(self.shaders_created.get() + 1);
        self.shaders.borrow_mut().insert(
            id,
            MockShader {
                stage: Some(stage),
                ..Default::default()
            },
        );
        id
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        if let Some(s) = self.shaders.borrow_mut().get_mut(&shader) {
            s.source = source.to_string_lossy().into_owned();
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        if let Some(s) = self.shaders.borrow_mut().get_mut(&shader) {
            match Self::check_source(&s.source) {
                Ok(()) => s.compiled = true,
                Err(log) => s.log = log,
            }
        }
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        self.shaders
            .borrow()
            .get(&shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        self.shaders
            .borrow()
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: GLuint) {
        self.shaders.borrow_mut().remove(&shader);
    }

    fn create_program(&self) -> GLuint {
        if self.fail_create_program.get() {
            return 0;
        }
        let id = self.alloc();
        self.programs.borrow_mut().insert(id, MockProgram::default());
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        self.detach_calls.set(self.detach_calls.get() + 1);
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        let shaders = self.shaders.borrow();
        let mut programs = self.programs.borrow_mut();
        let Some(p) = programs.get_mut(&program) else {
            return;
        };

        let stages: Vec<&MockShader> = p
            .attached
            .iter()
            .filter_map(|id| shaders.get(id))
            .collect();
        let source_of = |stage: ShaderStage| {
            stages
                .iter()
                .find(|s| s.stage == Some(stage) && s.compiled)
                .map(|s| s.source.as_str())
        };

        let (Some(vertex), Some(fragment)) =
            (source_of(ShaderStage::Vertex), source_of(ShaderStage::Fragment))
        else {
            p.log = "error: program requires a compiled vertex and fragment shader".into();
            return;
        };
        let producer = source_of(ShaderStage::Geometry).unwrap_or(vertex);
        let outputs = Self::declarations(producer, "out");
        if let Some(missing) = Self::declarations(fragment, "in")
            .into_iter()
            .find(|input| !outputs.contains(input))
        {
            p.log = format!(
                "error: fragment shader input '{}' not written by previous stage",
                missing
            );
            return;
        }

        p.uniforms.clear();
        for source in stages.iter().map(|s| s.source.as_str()) {
            for name in Self::declarations(source, "uniform") {
                let next = p.uniforms.len() as GLint;
                p.uniforms.entry(name.to_string()).or_insert(next);
            }
        }
        p.linked = true;
    }

    fn link_status(&self, program: GLuint) -> bool {
        self.programs
            .borrow()
            .get(&program)
            .map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.programs
            .borrow()
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: GLuint) {
        self.current.set(program);
    }

    fn delete_program(&self, program: GLuint) {
        if self.programs.borrow_mut().remove(&program).is_some() {
            self.programs_deleted.set(self.programs_deleted.get() + 1);
        }
        if self.current.get() == program {
            self.current.set(0);
        }
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        let name = name.to_string_lossy();
        self.programs
            .borrow()
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.uniforms.get(name.as_ref()).copied())
            .unwrap_or(-1)
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        self.uploads.borrow_mut().push((location, format!("1i {}", value)));
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        self.uploads.borrow_mut().push((location, format!("1f {}", value)));
    }

    fn uniform_3f(&self, location: GLint, x: f32, y: f32, z: f32) {
        self.uploads
            .borrow_mut()
            .push((location, format!("3f {} {} {}", x, y, z)));
    }

    fn uniform_mat4(&self, location: GLint, mat: &[f32; 16]) {
        self.uploads
            .borrow_mut()
            .push((location, format!("mat4 {}", mat[0])));
    }
}
