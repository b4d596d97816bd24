//! Attack shapes - which candidates an attack's area touches
//!
//! Collision itself belongs to the host. It is reached through
//! `CandidateQuery`, which hands back entities whose colliders overlap a
//! broad sphere or an oriented box. `SceneQuery` is a brute-force in-memory
//! implementation for hosts without a physics engine.

mod resolver;

pub use resolver::{AttackAim, AttackShapeResolver, ShapeHit};

use crate::types::EntityId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bitmask of collision layers an attack may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    /// Mask with only layer `n` set
    pub fn layer(n: u32) -> Self {
        LayerMask(1u32.checked_shl(n).unwrap_or(0))
    }

    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// Collider approximation reported by the physics collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Point,
    Sphere { radius: f32 },
}

impl ColliderShape {
    pub fn radius(&self) -> f32 {
        match self {
            ColliderShape::Point => 0.0,
            ColliderShape::Sphere { radius } => radius.max(0.0),
        }
    }
}

/// A potential target returned by a broad-phase query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub entity: EntityId,
    pub position: Vec3,
    pub collider: ColliderShape,
}

/// Physics collaborator used to find attack candidates
pub trait CandidateQuery {
    /// Candidates whose collider overlaps the sphere at `origin`
    fn find_candidates(&self, origin: Vec3, radius: f32, mask: LayerMask) -> Vec<Candidate>;

    /// Candidates whose collider overlaps an oriented box
    ///
    /// The box is yawed to face `forward` projected on the ground plane.
    /// The default narrows a bounding-sphere query with an exact
    /// box-vs-collider test; physics engines with a native box overlap
    /// should override it.
    fn overlap_box(&self, center: Vec3, half_extents: Vec3, forward: Vec3, mask: LayerMask) -> Vec<Candidate> {
        let bounds = half_extents.length();
        self.find_candidates(center, bounds, mask)
            .into_iter()
            .filter(|c| box_overlaps(center, half_extents, forward, c))
            .collect()
    }
}

/// Whether a candidate's collider touches an oriented box
pub fn box_overlaps(center: Vec3, half_extents: Vec3, forward: Vec3, candidate: &Candidate) -> bool {
    let Some(forward) = horizontal(forward) else {
        return false;
    };
    let right = Vec3::Y.cross(forward);

    let offset = candidate.position - center;
    let local = Vec3::new(offset.dot(right), offset.y, offset.dot(forward));
    let closest = local.clamp(-half_extents, half_extents);

    let radius = candidate.collider.radius();
    local.distance_squared(closest) <= radius * radius
}

/// Unit direction on the ground plane, if `v` has any horizontal component
pub fn horizontal(v: Vec3) -> Option<Vec3> {
    Vec3::new(v.x, 0.0, v.z).try_normalize()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SceneEntry {
    candidate: Candidate,
    layers: LayerMask,
}

/// In-memory candidate set answering queries by brute force
#[derive(Debug, Clone, Default)]
pub struct SceneQuery {
    entries: Vec<SceneEntry>,
}

impl SceneQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place or move an entity on the default layer
    pub fn insert(&mut self, entity: EntityId, position: Vec3, collider: ColliderShape) {
        self.insert_on_layers(entity, position, collider, LayerMask::layer(0));
    }

    pub fn insert_on_layers(&mut self, entity: EntityId, position: Vec3, collider: ColliderShape, layers: LayerMask) {
        let candidate = Candidate {
            entity,
            position,
            collider,
        };
        match self.entries.iter_mut().find(|e| e.candidate.entity == entity) {
            Some(entry) => {
                entry.candidate = candidate;
                entry.layers = layers;
            }
            None => self.entries.push(SceneEntry { candidate, layers }),
        }
    }

    pub fn remove(&mut self, entity: EntityId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.candidate.entity != entity);
        self.entries.len() != before
    }

    pub fn position(&self, entity: EntityId) -> Option<Vec3> {
        self.entries
            .iter()
            .find(|e| e.candidate.entity == entity)
            .map(|e| e.candidate.position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CandidateQuery for SceneQuery {
    fn find_candidates(&self, origin: Vec3, radius: f32, mask: LayerMask) -> Vec<Candidate> {
        self.entries
            .iter()
            .filter(|e| e.layers.intersects(mask))
            .filter(|e| {
                let reach = radius + e.candidate.collider.radius();
                e.candidate.position.distance_squared(origin) <= reach * reach
            })
            .map(|e| e.candidate)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(x: f32, z: f32, radius: f32) -> Candidate {
        Candidate {
            entity: EntityId(1),
            position: Vec3::new(x, 0.0, z),
            collider: ColliderShape::Sphere { radius },
        }
    }

    #[test]
    fn test_layer_mask() {
        assert!(LayerMask::ALL.intersects(LayerMask::layer(3)));
        assert!(!LayerMask::layer(1).intersects(LayerMask::layer(2)));
        assert_eq!(LayerMask::layer(40), LayerMask::NONE);
    }

    #[test]
    fn test_box_overlap_axis_aligned() {
        let half = Vec3::new(1.0, 2.0, 3.0);
        assert!(box_overlaps(Vec3::ZERO, half, Vec3::Z, &candidate(0.5, 2.5, 0.0)));
        assert!(!box_overlaps(Vec3::ZERO, half, Vec3::Z, &candidate(1.5, 0.0, 0.0)));
        // Collider radius reaches into the box
        assert!(box_overlaps(Vec3::ZERO, half, Vec3::Z, &candidate(1.5, 0.0, 0.6)));
    }

    #[test]
    fn test_box_overlap_rotated() {
        // Box facing +X: its length runs along X, its width along Z
        let half = Vec3::new(0.5, 2.0, 3.0);
        assert!(box_overlaps(Vec3::ZERO, half, Vec3::X, &candidate(2.5, 0.0, 0.0)));
        assert!(!box_overlaps(Vec3::ZERO, half, Vec3::X, &candidate(0.0, 2.5, 0.0)));
    }

    #[test]
    fn test_vertical_forward_has_no_box() {
        let half = Vec3::splat(10.0);
        assert!(!box_overlaps(Vec3::ZERO, half, Vec3::Y, &candidate(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_scene_query_respects_collider_radius() {
        let mut scene = SceneQuery::new();
        scene.insert(EntityId(1), Vec3::new(5.5, 0.0, 0.0), ColliderShape::Sphere { radius: 0.6 });
        scene.insert(EntityId(2), Vec3::new(5.5, 0.0, 0.0), ColliderShape::Point);

        let found = scene.find_candidates(Vec3::ZERO, 5.0, LayerMask::ALL);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].entity, EntityId(1));
    }

    #[test]
    fn test_scene_query_layers() {
        let mut scene = SceneQuery::new();
        scene.insert_on_layers(EntityId(1), Vec3::ZERO, ColliderShape::Point, LayerMask::layer(2));
        assert!(scene.find_candidates(Vec3::ZERO, 1.0, LayerMask::layer(0)).is_empty());
        assert_eq!(scene.find_candidates(Vec3::ZERO, 1.0, LayerMask::layer(2)).len(), 1);
    }

    #[test]
    fn test_scene_insert_moves_existing() {
        let mut scene = SceneQuery::new();
        scene.insert(EntityId(7), Vec3::ZERO, ColliderShape::Point);
        scene.insert(EntityId(7), Vec3::X, ColliderShape::Point);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.position(EntityId(7)), Some(Vec3::X));
        assert!(scene.remove(EntityId(7)));
        assert!(scene.is_empty());
    }
}
