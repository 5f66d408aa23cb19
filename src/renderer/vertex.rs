//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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
}

/// Colors for game elements
pub mod colors {
    pub const GROUND: [f32; 4] = [0.25, 0.2, 0.15, 1.0];
    pub const WALL: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const PLATFORM: [f32; 4] = [0.45, 0.4, 0.35, 1.0];
    pub const HAZARD: [f32; 4] = [1.0, 0.35, 0.1, 0.85];
    pub const P1: [f32; 4] = [0.3, 0.55, 1.0, 1.0];
    pub const P2: [f32; 4] = [1.0, 0.35, 0.35, 1.0];
    pub const ATTACK_FLASH: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const WEAPON_REACH: [f32; 4] = [0.9, 0.85, 0.3, 0.6]; // Gold/yellow
    pub const BAR_BACK: [f32; 4] = [0.1, 0.1, 0.1, 0.8];
    pub const STAMINA: [f32; 4] = [0.3, 0.8, 1.0, 1.0];
    pub const HIT: [f32; 4] = [1.0, 0.9, 0.4, 1.0];
}

/// Health bar tint: green when full, yellow at half, red near zero
pub fn health_color(fraction: f32) -> [f32; 4] {
    let t = fraction.clamp(0.0, 1.0);
    if t > 0.5 {
        let u = (t - 0.5) / 0.5;
        [1.0 - u * 0.8, 0.85, 0.2, 1.0]
    } else {
        let u = t / 0.5;
        [1.0, 0.15 + 0.7 * u, 0.15, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_health_color_gradient() {
        let full = health_color(1.0);
        let empty = health_color(0.0);
        assert!(full[1] > full[0]);
        assert!(empty[0] > empty[1]);
        // Out of range clamps
        assert_eq!(health_color(2.0), full);
        assert_eq!(health_color(-1.0), empty);
    }
}
