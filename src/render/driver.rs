use gl::types::*;
use std::ffi::CStr;
use std::fmt;
use std::ptr;

/// A single compilable shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Geometry,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            Self::Vertex => gl::VERTEX_SHADER,
            Self::Geometry => gl::GEOMETRY_SHADER,
            Self::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Geometry => write!(f, "geometry"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

/// The graphics driver entry points used by [`ShaderProgram`](super::shaders::ShaderProgram).
///
/// Object ids follow GL conventions: `0` is never a valid shader or
/// program, and a uniform location of `-1` means "not found".
pub trait ShaderDriver {
    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &CStr);
    fn compile_shader(&self, shader: GLuint);
    fn compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    fn uniform_1i(&self, location: GLint, value: i32);
    fn uniform_1f(&self, location: GLint, value: f32);
    fn uniform_3f(&self, location: GLint, x: f32, y: f32, z: f32);
    fn uniform_mat4(&self, location: GLint, mat: &[f32; 16]);
}

impl<T: ShaderDriver + ?Sized> ShaderDriver for &T {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        (**self).create_shader(stage)
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        (**self).shader_source(shader, source)
    }

    fn compile_shader(&self, shader: GLuint) {
        (**self).compile_shader(shader)
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        (**self).compile_status(shader)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        (**self).shader_info_log(shader)
    }

    fn delete_shader(&self, shader: GLuint) {
        (**self).delete_shader(shader)
    }

    fn create_program(&self) -> GLuint {
        (**self).create_program()
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        (**self).attach_shader(program, shader)
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        (**self).detach_shader(program, shader)
    }

    fn link_program(&self, program: GLuint) {
        (**self).link_program(program)
    }

    fn link_status(&self, program: GLuint) -> bool {
        (**self).link_status(program)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        (**self).program_info_log(program)
    }

    fn use_program(&self, program: GLuint) {
        (**self).use_program(program)
    }

    fn delete_program(&self, program: GLuint) {
        (**self).delete_program(program)
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        (**self).uniform_location(program, name)
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        (**self).uniform_1i(location, value)
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        (**self).uniform_1f(location, value)
    }

    fn uniform_3f(&self, location: GLint, x: f32, y: f32, z: f32) {
        (**self).uniform_3f(location, x, y, z)
    }

    fn uniform_mat4(&self, location: GLint, mat: &[f32; 16]) {
        (**self).uniform_mat4(location, mat)
    }
}

/// Driver backed by the global `gl` function pointers.
///
/// Only valid on the thread that owns a current context, after
/// `gl::load_with` has run.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlDriver;

impl GlDriver {
    /// Reads an info log of `len` bytes (including the trailing NUL).
    fn read_log(len: GLint, fetch: impl FnOnce(GLint, *mut GLchar)) -> String {
        if len <= 0 {
            return String::new();
        }
        let mut buffer: Vec<u8> = vec![0; len as usize];
        fetch(len, buffer.as_mut_ptr() as *mut GLchar);
        let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
        String::from_utf8_lossy(&buffer[..end]).trim_end().to_string()
    }
}

impl ShaderDriver for GlDriver {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.gl_enum()) }
    }

    fn shader_source(&self, shader: GLuint, source: &CStr) {
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
        }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }
        Self::read_log(len, |len, buf| unsafe {
            gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf);
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn link_status(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }
        Self::read_log(len, |len, buf| unsafe {
            gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf);
        })
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        unsafe { gl::Uniform1i(location, value) }
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        unsafe { gl::Uniform1f(location, value) }
    }

    fn uniform_3f(&self, location: GLint, x: f32, y: f32, z: f32) {
        unsafe { gl::Uniform3f(location, x, y, z) }
    }

    fn uniform_mat4(&self, location: GLint, mat: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, mat.as_ptr()) }
    }
}
