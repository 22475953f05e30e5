//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Flat-colored vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Textured vertex for sprites
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl SpriteVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Colors for scene elements without a level-specific palette
pub mod colors {
    pub const INTRO_BG: [f32; 4] = [0.2, 0.59, 0.78, 1.0];
    pub const CLOUD: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    pub const CLOUD_FAR: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const WINDOW: [f32; 4] = [0.95, 0.9, 0.55, 1.0];
    pub const SCENERY_DARK: [f32; 4] = [0.25, 0.27, 0.33, 1.0];
    pub const SCENERY_LIGHT: [f32; 4] = [0.55, 0.55, 0.6, 1.0];
    pub const FOLIAGE: [f32; 4] = [0.15, 0.5, 0.2, 1.0];
    pub const TRUNK: [f32; 4] = [0.35, 0.22, 0.1, 1.0];
    pub const WATER: [f32; 4] = [0.1, 0.3, 0.55, 1.0];
    pub const MOON: [f32; 4] = [0.95, 0.95, 0.85, 1.0];
}
