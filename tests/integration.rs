// Integration tests (native) for the `valentine-quest` crate.
// A whole session is driven the way the browser glue drives it: frame ticks,
// the overlay gate, shots along the aim ray and score/win reports, all on a
// simulated clock with no wasm APIs involved.

use valentine_quest::audio::SoundCue;
use valentine_quest::game::{GameEvent, World};
use valentine_quest::music::MusicController;
use valentine_quest::scene::camera::Vec3;
use valentine_quest::scene::{Camera, TimeOfDay};
use valentine_quest::sequencer::WinPhase;
use valentine_quest::{Effect, Overlay, Screen, Sequencer};

#[derive(Default)]
struct SilentMusic {
    level: f64,
    starts: u32,
}

impl MusicController for SilentMusic {
    fn start(&mut self) {
        self.starts += 1;
    }
    fn set_volume(&mut self, level: f64) {
        self.level = level;
    }
    fn volume(&self) -> f64 {
        self.level
    }
    fn reset(&mut self) {}
    fn fade_volume(&mut self, target: f64, _duration_ms: f64, _now: f64) {
        self.level = target;
    }
    fn tick(&mut self, _now: f64) {}
}

fn aim_at(camera: &mut Camera, p: Vec3) {
    let d = [p[0] - camera.position[0], p[1] - camera.position[1], p[2] - camera.position[2]];
    let horiz = (d[0] * d[0] + d[2] * d[2]).sqrt();
    camera.yaw = (-d[0]).atan2(-d[2]);
    camera.pitch = d[1].atan2(horiz);
}

struct Session {
    seq: Sequencer<SilentMusic>,
    world: World,
    camera: Camera,
    now: f64,
    max_targets_seen_during_overlay: usize,
}

impl Session {
    fn new(seed: u64) -> Self {
        let mut seq = Sequencer::new(SilentMusic::default());
        seq.confirm_valentine();
        seq.begin_adventure();
        Self { seq, world: World::with_seed(seed), camera: Camera::default(), now: 0.0, max_targets_seen_during_overlay: 0 }
    }

    fn targets_visible(&self) -> bool {
        self.seq.screen() == Screen::Playing && !self.seq.overlay_active()
    }

    fn frame(&mut self) {
        self.now += 50.0;
        self.seq.tick(self.now);
        for effect in self.seq.drain_effects() {
            if effect == Effect::ResetWorld {
                self.world = World::with_seed(99);
            }
        }
        self.world.sync_overlay(self.seq.overlay_active());
        self.world.update(self.now, TimeOfDay::default());
        if self.seq.overlay_active() {
            self.max_targets_seen_during_overlay =
                self.max_targets_seen_during_overlay.max(self.world.targets.len());
        }
    }

    /// Shoot at whatever is still standing; returns true if the shot landed
    /// on a target or the mega-heart.
    fn shoot(&mut self) -> bool {
        let aim = if let Some(t) = self.world.targets.targets().first() {
            t.position
        } else if let Some(h) = &self.world.mega_heart {
            h.position()
        } else {
            return false;
        };
        aim_at(&mut self.camera, aim);
        self.seq.game_clicked();
        let visible = self.targets_visible();
        let mut landed = false;
        for event in self.world.shoot(&self.camera, visible, TimeOfDay::default(), self.now) {
            match event {
                GameEvent::Cue(SoundCue::Shot) => landed = true,
                GameEvent::TargetHit(id) => {
                    let before = self.seq.score();
                    self.seq.on_score_update(self.now);
                    self.world.resolve_target_hit(id, before, self.now);
                }
                GameEvent::HeartBroken => self.seq.on_win(self.now),
                _ => {}
            }
        }
        landed
    }
}

#[test]
fn full_session_reaches_leaderboard_and_replays() {
    let mut s = Session::new(11);
    let mut thresholds_seen = Vec::new();
    let mut heart_shots = 0;

    for _ in 0..40_000 {
        s.frame();
        if let Overlay::MilestoneMessage { threshold, .. } = s.seq.overlay() {
            if thresholds_seen.last() != Some(&threshold) {
                thresholds_seen.push(threshold);
            }
        }
        if s.targets_visible() {
            let had_heart = s.world.mega_heart.is_some();
            if s.shoot() && had_heart {
                heart_shots += 1;
            }
        }
        if s.seq.is_won() {
            break;
        }
    }

    assert_eq!(thresholds_seen, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]);
    assert_eq!(s.seq.score(), 100);
    assert_eq!(heart_shots, 10, "the tenth click breaks the heart");
    assert_eq!(s.seq.screen(), Screen::Won(WinPhase::Message));
    assert_eq!(s.max_targets_seen_during_overlay, 0, "targets hidden under overlays");
    assert_eq!(s.seq.drain_effects(), vec![Effect::ReleasePointerLock]);

    for _ in 0..100 {
        s.frame();
    }
    assert_eq!(s.seq.overlay(), Overlay::WinLeaderboard);

    s.seq.replay();
    s.frame();
    assert_eq!(s.seq.score(), 0);
    assert_eq!(s.seq.overlay(), Overlay::StartScreen);
    assert!(s.world.targets.is_empty());
    assert!(s.world.mega_heart.is_none());
}

#[test]
fn field_refills_to_three_after_each_milestone() {
    let mut s = Session::new(3);
    s.frame();
    assert_eq!(s.world.targets.len(), 3);
    // A crab wandering into the line of fire can eat a shot; keep firing.
    for _ in 0..2_000 {
        if s.seq.score() == 10 {
            break;
        }
        s.shoot();
        s.frame();
    }
    assert_eq!(s.seq.score(), 10);
    assert!(s.world.targets.is_empty());
    // 7 s visible plus 0.6 s fade.
    for _ in 0..152 {
        s.frame();
    }
    assert!(!s.seq.overlay_active());
    assert_eq!(s.world.targets.len(), 3);
}

#[test]
fn music_starts_once_per_adventure() {
    let s = Session::new(1);
    assert_eq!(s.seq.music().starts, 1);
}

#[test]
fn random_memory_comes_from_the_table() {
    for _ in 0..20 {
        let m = valentine_quest::random_memory();
        assert!(valentine_quest::MEMORIES.contains(&m.as_str()));
    }
}
