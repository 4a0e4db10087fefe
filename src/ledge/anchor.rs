use bevy::prelude::*;

/// Marks world geometry as a grabbable ledge and describes where the
/// character hangs relative to it.
///
/// The entity also needs a collider on `GameLayer::Ledge`; its bounding box
/// top is used as the ledge height. Negative offsets are treated as zero.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct LedgeAnchor {
    /// Distance between the wall and the hanging character, along the hit normal
    pub forward_offset: f32,
    /// How far below the top of the surface the character's feet hang
    pub vertical_offset: f32,
}

impl Default for LedgeAnchor {
    fn default() -> Self {
        Self {
            forward_offset: 0.5,
            vertical_offset: 0.5,
        }
    }
}

impl LedgeAnchor {
    pub fn new(forward_offset: f32, vertical_offset: f32) -> Self {
        Self {
            forward_offset: forward_offset.max(0.0),
            vertical_offset: vertical_offset.max(0.0),
        }
    }
}

/// A ledge the controller has found or is currently holding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgeSurface {
    pub entity: Entity,
    pub anchor: LedgeAnchor,
    /// World-space height of the top of the surface
    pub top: f32,
}

impl LedgeSurface {
    /// Where the character hangs after grabbing at `point` on a wall facing `normal`.
    pub fn hang_position(&self, point: Vec3, normal: Vec3) -> Vec3 {
        let mut target = point + normal * self.anchor.forward_offset.max(0.0);
        target.y = self.top - self.anchor.vertical_offset.max(0.0);
        target
    }
}
