//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::Color;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Color,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
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

/// Colors for game elements
pub mod colors {
    use crate::Color;

    /// `0xRRGGBB` to an opaque colour
    pub const fn hex(rgb: u32) -> Color {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub const SKY_TOP: Color = hex(0x87ceeb);
    pub const SKY_BOTTOM: Color = hex(0x98fb98);
    pub const ROAD: Color = hex(0x444444);
    pub const ROAD_MARKING: Color = hex(0xffff00);
    pub const ROAD_EDGE: Color = hex(0xffffff);
    pub const GRASS: Color = hex(0x228b22);

    pub const PLAYER: Color = hex(0x4444ff);
    pub const PLAYER_BOOSTED: Color = hex(0xff4444);
    pub const WHEEL: Color = hex(0x333333);
    pub const WINDSHIELD: Color = hex(0x87ceeb);
    pub const SHIELD_RING: Color = hex(0x00ffff);
    pub const EXHAUST: Color = hex(0xffaa00);

    pub const CONE: Color = hex(0xff6600);
    pub const CONE_STRIPE: Color = hex(0xffffff);
    pub const CAR: Color = hex(0x666666);
    pub const TRUCK: Color = hex(0x444444);
    pub const TRUCK_CAB: Color = hex(0x666666);

    pub const GOLD: Color = hex(0xffd700);
    pub const AMBER: Color = hex(0xffaa00);
    pub const COIN_RIM: Color = hex(0xff8800);

    pub const FUEL_GLOW: Color = hex(0x00ff00);
    pub const FUEL_BODY: Color = hex(0x228b22);
    pub const FUEL_CAP: Color = hex(0x333333);

    pub const BOLT: Color = hex(0xffff00);
    pub const SHIELD: Color = hex(0x00aaff);
    pub const SHIELD_RIM: Color = hex(0x0088cc);
    pub const INVINCIBLE_RIM: Color = hex(0xff6600);
    pub const INVINCIBLE_CORE: Color = hex(0xffff99);
    pub const MAGNET: Color = hex(0xc0392b);
    pub const MAGNET_RIM: Color = hex(0x922b21);
    pub const FIELD_LINE: Color = hex(0x3498db);

    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const BACKGROUND: Color = SKY_TOP;
}

#[cfg(test)]
mod tests {
    use super::colors::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex(0x00ff00), [0.0, 1.0, 0.0, 1.0]);
        assert!((ROAD[0] - 68.0 / 255.0).abs() < 1e-6);
    }
}
