//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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

/// Palette (linear RGBA, straight alpha)
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const GRID_DOT: [f32; 4] = [0.2, 0.2, 0.2, 1.0]; // #333
    pub const BAR_BACKGROUND: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
    pub const ENEMY: [f32; 4] = [1.0, 0.267, 0.267, 1.0]; // #ff4444
    pub const BOSS: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const ENEMY_BULLET: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const PLAYER_BULLET: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const PLAYER_CORE: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const PLAYER_MID: [f32; 4] = [0.0, 0.533, 1.0, 1.0]; // #0088ff
    pub const PLAYER_RIM: [f32; 4] = [0.0, 0.267, 1.0, 1.0]; // #0044ff
    pub const PLAYER_HEALTH: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const WEAPON: [f32; 4] = [0.533, 0.533, 0.533, 1.0]; // #888
    pub const TRANSPARENT_RED: [f32; 4] = [1.0, 0.0, 0.0, 0.0];

    /// Same color with alpha replaced
    pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }

    /// HSL (hue in degrees) to RGBA
    pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> [f32; 4] {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        [r + m, g + m, b + m, alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::colors::*;

    #[test]
    fn test_hsla_primaries() {
        let red = hsla(0.0, 1.0, 0.5, 1.0);
        assert!((red[0] - 1.0).abs() < 1e-5 && red[1].abs() < 1e-5);

        // Negative hues wrap (fire particles shade toward magenta)
        let wrapped = hsla(-20.0, 1.0, 0.5, 0.5);
        assert!((wrapped[0] - 1.0).abs() < 1e-5);
        assert!(wrapped[2] > 0.0);
        assert_eq!(wrapped[3], 0.5);

        let yellow = hsla(60.0, 1.0, 0.5, 1.0);
        assert!((yellow[0] - 1.0).abs() < 1e-5 && (yellow[1] - 1.0).abs() < 1e-5);
    }
}
