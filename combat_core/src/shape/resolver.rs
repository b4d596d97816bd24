//! Attack shape resolution - cone, line and radial hit tests

use super::{horizontal, Candidate, CandidateQuery, LayerMask};
use crate::types::EntityId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use types_core::{AttackDefinition, AttackShape};

/// Half height of the line attack's box
const LINE_HALF_HEIGHT: f32 = 2.0;

/// Where an attack is launched from and where it points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackAim {
    /// Attack point in world space
    pub origin: Vec3,
    /// Aim direction; only its ground-plane projection is used
    pub forward: Vec3,
    /// Centre of radial attacks, defaults to `origin`
    pub target_point: Option<Vec3>,
    pub mask: LayerMask,
}

impl AttackAim {
    pub fn new(origin: Vec3, forward: Vec3) -> Self {
        AttackAim {
            origin,
            forward,
            target_point: None,
            mask: LayerMask::ALL,
        }
    }

    pub fn at(mut self, target_point: Vec3) -> Self {
        self.target_point = Some(target_point);
        self
    }

    pub fn with_mask(mut self, mask: LayerMask) -> Self {
        self.mask = mask;
        self
    }

    /// Unit aim direction on the ground plane
    pub fn horizontal_forward(&self) -> Option<Vec3> {
        horizontal(self.forward)
    }
}

/// A target touched by an attack's shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeHit {
    pub entity: EntityId,
    pub position: Vec3,
    /// Knockback direction scaled by the attack's knockback force
    pub knockback: Vec3,
}

/// Stateless hit test for the three attack shapes
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackShapeResolver;

impl AttackShapeResolver {
    pub fn new() -> Self {
        AttackShapeResolver
    }

    /// Targets hit by `attack`, excluding the attacker, each at most once
    pub fn resolve(
        &self,
        attacker: EntityId,
        attack: &AttackDefinition,
        aim: &AttackAim,
        query: &dyn CandidateQuery,
    ) -> Vec<ShapeHit> {
        let hits = match attack.shape {
            AttackShape::Cone => self.cone(attack, aim, query),
            AttackShape::Line => self.line(attack, aim, query),
            AttackShape::Radial => self.radial(attack, aim, query),
        };

        let mut seen = HashSet::new();
        hits.into_iter()
            .filter(|hit| hit.entity != attacker)
            .filter(|hit| seen.insert(hit.entity))
            .collect()
    }

    /// Candidates within range whose ground-plane bearing is less than half
    /// the arc away from the aim direction
    fn cone(&self, attack: &AttackDefinition, aim: &AttackAim, query: &dyn CandidateQuery) -> Vec<ShapeHit> {
        let Some(forward) = aim.horizontal_forward() else {
            tracing::warn!("Cone attack '{}' has no horizontal aim direction", attack.name);
            return Vec::new();
        };
        let half_arc = attack.angle_or_width / 2.0;
        let knockback = forward * attack.knockback;

        query
            .find_candidates(aim.origin, attack.range, aim.mask)
            .into_iter()
            .filter(|c| {
                // A target standing on the origin has no bearing and counts as dead ahead
                let bearing = horizontal(c.position - aim.origin)
                    .map(|dir| forward.angle_between(dir).to_degrees())
                    .unwrap_or(0.0);
                bearing < half_arc
            })
            .map(|c| hit(c, knockback))
            .collect()
    }

    /// Box of `range` length and `angle_or_width` width extending forward
    fn line(&self, attack: &AttackDefinition, aim: &AttackAim, query: &dyn CandidateQuery) -> Vec<ShapeHit> {
        let Some(forward) = aim.horizontal_forward() else {
            tracing::warn!("Line attack '{}' has no horizontal aim direction", attack.name);
            return Vec::new();
        };
        let center = aim.origin + forward * (attack.range / 2.0);
        let half_extents = Vec3::new(attack.angle_or_width / 2.0, LINE_HALF_HEIGHT, attack.range / 2.0);
        let knockback = forward * attack.knockback;

        query
            .overlap_box(center, half_extents, forward, aim.mask)
            .into_iter()
            .map(|c| hit(c, knockback))
            .collect()
    }

    /// Sphere around the target point, knocking targets away from it
    fn radial(&self, attack: &AttackDefinition, aim: &AttackAim, query: &dyn CandidateQuery) -> Vec<ShapeHit> {
        let center = aim.target_point.unwrap_or(aim.origin);

        query
            .find_candidates(center, attack.range, aim.mask)
            .into_iter()
            .map(|c| {
                let away = (c.position - center).normalize_or_zero();
                hit(c, away * attack.knockback)
            })
            .collect()
    }
}

fn hit(candidate: Candidate, knockback: Vec3) -> ShapeHit {
    ShapeHit {
        entity: candidate.entity,
        position: candidate.position,
        knockback,
    }
}
