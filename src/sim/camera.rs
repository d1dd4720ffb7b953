//! Scrolling camera
//!
//! The player never moves on screen; moving translates the camera and the
//! world scrolls underneath. `offset` is the world position of the viewport's
//! top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset: Vec2,
}

impl Camera {
    pub fn new(offset: Vec2) -> Self {
        Self { offset }
    }

    /// Shift the camera by `delta` world units
    pub fn translate(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    #[inline]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }

    #[inline]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.offset
    }

    /// World position of the viewport center
    pub fn view_center(&self, viewport: Vec2) -> Vec2 {
        self.offset + viewport * 0.5
    }
}
