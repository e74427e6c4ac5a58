use bytemuck::{Pod, Zeroable};
use gl::types::*;
use std::mem::{offset_of, size_of};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Mesh has no vertices")]
    Empty,
    #[error("Mesh has {0} vertices, more than a draw call can address")]
    TooLarge(usize),
}

/// Interleaved position + color vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    pub const STRIDE: usize = size_of::<Vertex>();
    pub const POSITION_OFFSET: usize = offset_of!(Vertex, position);
    pub const COLOR_OFFSET: usize = offset_of!(Vertex, color);

    pub const fn new(position: [f32; 2], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    #[rustfmt::skip]
    pub const DEFAULT_TRIANGLE: [Vertex; 3] = [
        Vertex::new([ 0.0,  0.9], [1.0, 0.0, 0.0]),
        Vertex::new([ 0.9, -0.9], [0.0, 1.0, 0.0]),
        Vertex::new([-0.9, -0.9], [0.0, 0.0, 1.0]),
    ];
}

/// A VAO + VBO pair holding non-indexed triangles.
///
/// Must be created and dropped with the GL context current.
pub struct TriangleMesh {
    vao: GLuint,
    vbo: GLuint,
    vertex_count: GLsizei,
}

impl TriangleMesh {
    pub fn new(vertices: &[Vertex]) -> Result<Self, MeshError> {
        if vertices.is_empty() {
            return Err(MeshError::Empty);
        }
        let vertex_count =
            GLsizei::try_from(vertices.len()).map_err(|_| MeshError::TooLarge(vertices.len()))?;
        let data: &[u8] = bytemuck::cast_slice(vertices);

        let mut vao = 0;
        let mut vbo = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            // Position attribute
            gl::VertexAttribPointer(
                0,
                2,
                gl::FLOAT,
                gl::FALSE,
                Vertex::STRIDE as GLsizei,
                Vertex::POSITION_OFFSET as *const _,
            );
            gl::EnableVertexAttribArray(0);

            // Color attribute
            gl::VertexAttribPointer(
                1,
                3,
                gl::FLOAT,
                gl::FALSE,
                Vertex::STRIDE as GLsizei,
                Vertex::COLOR_OFFSET as *const _,
            );
            gl::EnableVertexAttribArray(1);

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        log::debug!("Uploaded {} vertices ({} bytes)", vertex_count, data.len());
        Ok(Self {
            vao,
            vbo,
            vertex_count,
        })
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawArrays(gl::TRIANGLES, 0, self.vertex_count);
        }
    }
}

impl Drop for TriangleMesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
        }
    }
}
