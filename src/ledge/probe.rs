use avian3d::prelude::*;
use bevy::prelude::*;

use super::anchor::{LedgeAnchor, LedgeSurface};

/// A single ray hit reported by a [`RayProbe`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionResult {
    /// The ledge that was hit, or `None` if the hit geometry isn't a ledge
    pub surface: Option<LedgeSurface>,
    pub point: Vec3,
    /// Unit surface normal at `point`
    pub normal: Vec3,
}

/// Casts a single ray into the world. Implementations must not keep state
/// between calls.
pub trait RayProbe {
    fn probe(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<DetectionResult>;
}

/// Grabbable geometry: anchored colliders and their world-space bounds
pub type LedgeQuery<'w, 's> = Query<'w, 's, (&'static LedgeAnchor, &'static ColliderAabb)>;

/// [`RayProbe`] backed by Avian's spatial query pipeline.
///
/// The ledge height comes from the hit collider's world-space AABB.
pub struct SpatialRayProbe<'a, 'w, 's> {
    pub spatial_query: &'a SpatialQuery<'w, 's>,
    pub ledges: &'a LedgeQuery<'w, 's>,
    /// The probing character, so the ray never hits its own collider
    pub exclude: Entity,
}

impl RayProbe for SpatialRayProbe<'_, '_, '_> {
    fn probe(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<DetectionResult> {
        let filter = SpatialQueryFilter::default()
            .with_mask(layers)
            .with_excluded_entities([self.exclude]);

        let hit = self
            .spatial_query
            .cast_ray(origin, direction, max_distance, true, &filter)?;

        let surface = self
            .ledges
            .get(hit.entity)
            .ok()
            .map(|(anchor, aabb)| LedgeSurface {
                entity: hit.entity,
                anchor: *anchor,
                top: aabb.max.y,
            });

        Some(DetectionResult {
            surface,
            point: origin + direction * hit.distance,
            normal: hit.normal.normalize_or_zero(),
        })
    }
}
