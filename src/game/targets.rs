//! Shootable targets floating in front of the player.
//!
//! The field holds whatever is currently on screen. Spawning is driven by the
//! overlay gate: every transition to "no overlay" adds three targets, every
//! transition to "overlay" clears them. Hits resolve against the score the
//! sequencer held *before* the hit, which decides whether a replacement spawns.

use rand::Rng;

use crate::config::{INITIAL_TARGETS, TARGET_SCALE, TERMINAL_SCORE};
use crate::scene::camera::Vec3;
use crate::sequencer::milestones;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetImage {
    Bullseye,
    Cookie,
}

impl TargetImage {
    pub const ALL: [TargetImage; 2] = [TargetImage::Bullseye, TargetImage::Cookie];

    pub fn path(self) -> &'static str {
        match self {
            TargetImage::Bullseye => "/images/target.png",
            TargetImage::Cookie => "/images/cookie.png",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub position: Vec3,
    pub image: TargetImage,
}

impl Target {
    /// Half the side of the square sprite; used as the hit radius.
    pub fn radius(&self) -> f64 {
        TARGET_SCALE / 2.0
    }
}

/// What a resolved hit did to the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Ordinary hit: removed and replaced.
    Replaced,
    /// Last hit before a milestone; the overlay will clear the rest.
    Removed,
    /// Hit number one hundred: field cleared, mega-heart takes over.
    ShowMegaHeart,
}

pub struct TargetField {
    targets: Vec<Target>,
    next_id: u32,
    images: Vec<TargetImage>,
    blocked: Option<bool>,
}

impl Default for TargetField {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetField {
    pub fn new() -> Self {
        Self { targets: Vec::new(), next_id: 0, images: TargetImage::ALL.to_vec(), blocked: None }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Drop an image whose asset failed to load. With none left, spawning
    /// falls back to the full set and the renderer draws placeholders.
    pub fn mark_unavailable(&mut self, image: TargetImage) {
        self.images.retain(|i| *i != image);
        log::warn!("target image {} unavailable", image.path());
    }

    /// Apply the overlay gate. Acts only when the gate changes.
    pub fn sync(&mut self, overlay_active: bool, rng: &mut impl Rng) {
        if self.blocked == Some(overlay_active) {
            return;
        }
        self.blocked = Some(overlay_active);
        if overlay_active {
            self.targets.clear();
        } else {
            for _ in 0..INITIAL_TARGETS {
                self.spawn(rng);
            }
        }
    }

    pub fn spawn(&mut self, rng: &mut impl Rng) -> TargetId {
        let position = [
            rng.gen_range(-10.0..10.0),
            rng.gen_range(0.5..6.5),
            rng.gen_range(-20.0..-6.0),
        ];
        let pool: &[TargetImage] = if self.images.is_empty() { &TargetImage::ALL } else { &self.images };
        let image = pool[rng.gen_range(0..pool.len())];
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets.push(Target { id, position, image });
        id
    }

    pub fn remove(&mut self, id: TargetId) -> Option<Target> {
        let idx = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(idx))
    }

    /// Resolve a hit on `id`. `score_before` is the score prior to this hit.
    /// An id that is no longer on the field still counts: the caller already
    /// reported the score, so only the replacement rule applies.
    pub fn hit(&mut self, id: TargetId, score_before: u32, rng: &mut impl Rng) -> HitOutcome {
        if self.remove(id).is_none() {
            log::warn!("hit on unknown target {:?}", id);
        }
        if score_before + 1 == TERMINAL_SCORE {
            self.targets.clear();
            HitOutcome::ShowMegaHeart
        } else if milestones::is_boundary_hit(score_before) {
            HitOutcome::Removed
        } else {
            self.spawn(rng);
            HitOutcome::Replaced
        }
    }
}
