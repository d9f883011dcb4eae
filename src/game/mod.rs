//! The 3D world the player shoots at.
//!
//! [`World`] owns every object in the scene and resolves shots along the
//! camera's aim ray. It knows nothing about overlays or music: it reports what
//! happened as [`GameEvent`]s and the app forwards score and win events to the
//! sequencer. Replay throws the world away and builds a new one.

pub mod constellation;
pub mod crab;
pub mod effects;
pub mod fireworks;
pub mod mega_heart;
pub mod targets;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::audio::SoundCue;
use crate::scene::camera::Vec3;
use crate::scene::{Camera, TimeOfDay};

pub use constellation::{Constellation, StarClick};
pub use crab::Crab;
pub use effects::{HeartBurst, Plant, Tracer};
pub use fireworks::Fireworks;
pub use mega_heart::{HeartClick, MegaHeart};
pub use targets::{HitOutcome, TargetField, TargetId, TargetImage};

/// Height of the grass; clicks that reach it plant something.
pub const FLOOR_Y: f64 = -2.0;
/// Garden bounds on X and Z (centre -8.5, 70 by 53).
const FLOOR_X: (f64, f64) = (-35.0, 35.0);
const FLOOR_Z: (f64, f64) = (-35.0, 18.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A target was hit; report one score update.
    TargetHit(TargetId),
    /// The mega-heart broke.
    HeartBroken,
    ConstellationComplete,
    Cue(SoundCue),
}

/// What the aim ray hit first.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Hit {
    Target(TargetId),
    MegaHeart,
    Crab(usize),
    Star(usize),
    Floor(Vec3),
}

pub struct World {
    rng: SmallRng,
    pub targets: TargetField,
    pub mega_heart: Option<MegaHeart>,
    pub crabs: Vec<Crab>,
    pub constellation: Constellation,
    pub fireworks: Fireworks,
    pub bursts: Vec<HeartBurst>,
    pub tracers: Vec<Tracer>,
    pub plants: Vec<Plant>,
    started_ms: Option<f64>,
    last_ms: Option<f64>,
}

impl World {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: SmallRng) -> Self {
        let crabs = Crab::colony(&mut rng);
        Self {
            rng,
            targets: TargetField::new(),
            mega_heart: None,
            crabs,
            constellation: Constellation::new(),
            fireworks: Fireworks::new(),
            bursts: Vec::new(),
            tracers: Vec::new(),
            plants: Vec::new(),
            started_ms: None,
            last_ms: None,
        }
    }

    /// Apply the sequencer's overlay gate to the target field.
    pub fn sync_overlay(&mut self, overlay_active: bool) {
        self.targets.sync(overlay_active, &mut self.rng);
    }

    /// Resolve a target hit once the sequencer has counted it.
    /// `score_before` is the score prior to the hit.
    pub fn resolve_target_hit(&mut self, id: TargetId, score_before: u32, now: f64) -> HitOutcome {
        let position = self.targets.targets().iter().find(|t| t.id == id).map(|t| t.position);
        let outcome = self.targets.hit(id, score_before, &mut self.rng);
        if let Some(p) = position {
            self.bursts.push(HeartBurst::new(p, now, &mut self.rng));
        }
        if outcome == HitOutcome::ShowMegaHeart {
            log::info!("mega-heart revealed");
            self.mega_heart = Some(MegaHeart::new());
        }
        outcome
    }

    /// Fire along the camera's aim. `targets_visible` is false while an
    /// overlay hides the targets and the mega-heart; `night` enables stars.
    pub fn shoot(&mut self, camera: &Camera, targets_visible: bool, time: TimeOfDay, now: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some((hit, dist)) = self.pick(camera, targets_visible, time.is_night()) else {
            return events;
        };
        let point = camera.aim_point(dist);
        match hit {
            Hit::Target(id) => {
                events.push(GameEvent::Cue(SoundCue::Shot));
                self.tracers.push(Tracer::new(camera.position, point, now));
                events.push(GameEvent::TargetHit(id));
            }
            Hit::MegaHeart => {
                let Some(heart) = self.mega_heart.as_mut() else {
                    return events;
                };
                match heart.click() {
                    HeartClick::Ignored => {}
                    click => {
                        events.push(GameEvent::Cue(SoundCue::Shot));
                        self.tracers.push(Tracer::new(camera.position, point, now));
                        if click == HeartClick::Broke {
                            let at = heart.position();
                            self.mega_heart = None;
                            self.bursts.push(HeartBurst::new(at, now, &mut self.rng));
                            events.push(GameEvent::HeartBroken);
                        }
                    }
                }
            }
            Hit::Crab(i) => {
                if self.crabs[i].click(now) {
                    events.push(GameEvent::Cue(SoundCue::CrabWheee));
                }
            }
            Hit::Star(i) => match self.constellation.click(i) {
                StarClick::Linked { step } => events.push(GameEvent::Cue(SoundCue::StarDing { step })),
                StarClick::Completed { step } => {
                    events.push(GameEvent::Cue(SoundCue::StarDing { step }));
                    events.push(GameEvent::ConstellationComplete);
                }
                StarClick::Ignored => {}
            },
            Hit::Floor(p) => self.plants.push(Plant::random(p, now, &mut self.rng)),
        }
        events
    }

    fn pick(&self, camera: &Camera, targets_visible: bool, night: bool) -> Option<(Hit, f64)> {
        let mut best: Option<(Hit, f64)> = None;
        let mut consider = |hit: Hit, dist: Option<f64>| {
            if let Some(d) = dist {
                if best.is_none_or(|(_, b)| d < b) {
                    best = Some((hit, d));
                }
            }
        };
        if targets_visible {
            for t in self.targets.targets() {
                consider(Hit::Target(t.id), camera.aim_hit(t.position, t.radius()));
            }
            if let Some(heart) = &self.mega_heart {
                consider(Hit::MegaHeart, camera.aim_hit(heart.position(), mega_heart::MEGA_HEART_RADIUS));
            }
        }
        for (i, crab) in self.crabs.iter().enumerate() {
            consider(Hit::Crab(i), camera.aim_hit(crab.hit_center(), crab.hit_radius()));
        }
        if night {
            let radius = self.constellation.hit_radius();
            for (i, star) in self.constellation.stars().iter().enumerate() {
                consider(Hit::Star(i), camera.aim_hit(*star, radius));
            }
        }
        if let Some((p, d)) = floor_hit(camera) {
            consider(Hit::Floor(p), Some(d));
        }
        best
    }

    /// Advance animations to `now` (ms). Returns cues raised by the scene itself.
    pub fn update(&mut self, now: f64, time: TimeOfDay) -> Vec<SoundCue> {
        let started = *self.started_ms.get_or_insert(now);
        let dt = self.last_ms.map_or(0.0, |last| (now - last).max(0.0) / 1000.0);
        self.last_ms = Some(now);
        let elapsed = (now - started) / 1000.0;

        for crab in &mut self.crabs {
            crab.update(elapsed, dt);
        }
        self.bursts.retain(|b| !b.is_done(now));
        self.tracers.retain(|t| !t.is_done(now));
        self.fireworks.update(elapsed, dt, time, &mut self.rng)
    }

    /// Seconds since the first update; drives idle animations in the renderer.
    pub fn elapsed_secs(&self) -> f64 {
        match (self.started_ms, self.last_ms) {
            (Some(s), Some(l)) => (l - s) / 1000.0,
            _ => 0.0,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the aim ray meets the grass, if it points down onto it.
fn floor_hit(camera: &Camera) -> Option<(Vec3, f64)> {
    let f = camera.forward();
    if f[1] >= -1e-6 {
        return None;
    }
    let d = (FLOOR_Y - camera.position[1]) / f[1];
    let p = camera.aim_point(d);
    let inside = (FLOOR_X.0..=FLOOR_X.1).contains(&p[0]) && (FLOOR_Z.0..=FLOOR_Z.1).contains(&p[2]);
    inside.then_some((p, d))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aim_at(camera: &mut Camera, p: Vec3) {
        let d = crate::scene::camera::sub(p, camera.position);
        let horiz = (d[0] * d[0] + d[2] * d[2]).sqrt();
        camera.yaw = (-d[0]).atan2(-d[2]);
        camera.pitch = d[1].atan2(horiz);
    }

    #[test]
    fn shooting_a_visible_target_reports_a_hit() {
        let mut world = World::with_seed(5);
        world.sync_overlay(false);
        let target = world.targets.targets()[0].clone();
        let mut cam = Camera::default();
        aim_at(&mut cam, target.position);
        let events = world.shoot(&cam, true, TimeOfDay::default(), 0.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::TargetHit(_))), "{events:?}");
        assert_eq!(events[0], GameEvent::Cue(SoundCue::Shot));
        assert_eq!(world.tracers.len(), 1);
    }

    #[test]
    fn hidden_targets_cannot_be_hit() {
        let mut world = World::with_seed(5);
        world.sync_overlay(false);
        let target = world.targets.targets()[0].clone();
        let mut cam = Camera::default();
        aim_at(&mut cam, target.position);
        let events = world.shoot(&cam, false, TimeOfDay::default(), 0.0);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::TargetHit(_))));
    }

    #[test]
    fn hundredth_hit_reveals_heart_and_ten_shots_break_it() {
        let mut world = World::with_seed(6);
        world.sync_overlay(false);
        let id = world.targets.targets()[0].id;
        assert_eq!(world.resolve_target_hit(id, 99, 0.0), HitOutcome::ShowMegaHeart);
        assert!(world.targets.is_empty());

        let mut cam = Camera::default();
        aim_at(&mut cam, crate::config::MEGA_HEART_POSITION);
        let mut broken = 0;
        for i in 0..12 {
            let events = world.shoot(&cam, true, TimeOfDay::default(), i as f64);
            broken += events.iter().filter(|e| **e == GameEvent::HeartBroken).count();
        }
        assert_eq!(broken, 1);
        assert!(world.mega_heart.is_none());
    }

    #[test]
    fn looking_down_plants_a_garden() {
        let mut world = World::with_seed(7);
        let mut cam = Camera::default();
        aim_at(&mut cam, [0.0, FLOOR_Y, -6.0]);
        let events = world.shoot(&cam, true, TimeOfDay::default(), 0.0);
        assert!(events.is_empty());
        assert_eq!(world.plants.len(), 1);
    }

    #[test]
    fn stars_only_answer_at_night() {
        let mut world = World::with_seed(8);
        let mut cam = Camera::default();
        aim_at(&mut cam, world.constellation.stars()[6]);
        assert!(world.shoot(&cam, true, TimeOfDay::new(0.5), 0.0).is_empty());
        let events = world.shoot(&cam, true, TimeOfDay::new(0.9), 0.0);
        assert_eq!(events, vec![GameEvent::Cue(SoundCue::StarDing { step: 0 })]);
    }
}
