//! Beach crabs behind the player.
//!
//! Each crab scuttles side to side on a sine wave. Clicking one launches a
//! 1.2s jump with a full spin and a heart bubble; clicks mid-jump are ignored.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::scene::camera::Vec3;

const CRAB_SCALE: f64 = 3.0;
const JUMP_SECS: f64 = 1.2;
const JUMP_HEIGHT: f64 = 4.0;
const HEART_BUBBLE_MS: f64 = 1_500.0;
/// Frame steps longer than this are clamped so a background tab doesn't
/// finish a jump in one frame.
const MAX_STEP_SECS: f64 = 0.1;

pub const CRAB_SPOTS: [Vec3; 7] = [
    [8.0, -2.0, 22.0],
    [-6.0, -2.0, 25.0],
    [12.0, -2.0, 28.0],
    [-10.0, -2.0, 20.0],
    [0.0, -2.0, 30.0],
    [15.0, -2.0, 24.0],
    [-12.0, -2.0, 27.0],
];

#[derive(Clone, Copy, Debug, PartialEq)]
struct Jump {
    progress: f64,
    from_x: f64,
    from_z: f64,
    from_rot: f64,
}

#[derive(Clone, Debug)]
pub struct Crab {
    home: Vec3,
    speed: f64,
    phase: f64,
    jump: Option<Jump>,
    heart_until: Option<f64>,
    pub position: Vec3,
    /// Heading around Y in radians.
    pub rotation: f64,
}

impl Crab {
    pub fn new(home: Vec3, speed: f64, phase: f64) -> Self {
        Self { home, speed, phase, jump: None, heart_until: None, position: home, rotation: 0.0 }
    }

    /// The seven crabs of the beach, with speeds cycling 0.8, 1.0, 1.2.
    pub fn colony(rng: &mut impl Rng) -> Vec<Crab> {
        CRAB_SPOTS
            .iter()
            .enumerate()
            .map(|(i, &home)| Crab::new(home, 0.8 + (i % 3) as f64 * 0.2, rng.gen_range(0.0..TAU)))
            .collect()
    }

    pub fn hit_radius(&self) -> f64 {
        0.8 * CRAB_SCALE
    }

    pub fn hit_center(&self) -> Vec3 {
        [self.position[0], self.position[1] + 0.3 * CRAB_SCALE, self.position[2]]
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    pub fn shows_heart(&self, now_ms: f64) -> bool {
        self.heart_until.is_some_and(|until| now_ms < until)
    }

    /// Returns true when the click started a jump.
    pub fn click(&mut self, now_ms: f64) -> bool {
        if self.jump.is_some() {
            return false;
        }
        self.jump = Some(Jump {
            progress: 0.0,
            from_x: self.position[0],
            from_z: self.position[2],
            from_rot: self.rotation,
        });
        self.heart_until = Some(now_ms + HEART_BUBBLE_MS);
        true
    }

    /// Advance to `elapsed_secs` since the scene started, `dt` after the last frame.
    pub fn update(&mut self, elapsed_secs: f64, dt: f64) {
        let dt = dt.min(MAX_STEP_SECS);
        if let Some(mut jump) = self.jump {
            jump.progress = (jump.progress + dt / JUMP_SECS).min(1.0);
            let height = JUMP_HEIGHT * (jump.progress * PI).sin();
            self.position = [jump.from_x, self.home[1] + height, jump.from_z];
            self.rotation = jump.from_rot + jump.progress * TAU;
            self.jump = (jump.progress < 1.0).then_some(jump);
            return;
        }
        let scuttle = (elapsed_secs * 2.0 * self.speed + self.phase).sin() * (3.0 / CRAB_SCALE);
        let bounce = (elapsed_secs * 4.0 * self.speed + self.phase).sin().abs() * 0.08;
        self.position = [self.home[0] + scuttle, self.home[1] + bounce, self.home[2]];
        self.rotation = if scuttle > 0.0 { 0.0 } else { PI };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn colony_speeds_cycle() {
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let speeds: Vec<f64> = Crab::colony(&mut rng).iter().map(|c| c.speed).collect();
        for (got, want) in speeds.iter().zip([0.8, 1.0, 1.2, 0.8, 1.0, 1.2, 0.8]) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn jump_peaks_midway_and_lands() {
        let mut crab = Crab::new([0.0, -2.0, 20.0], 1.0, 0.0);
        crab.update(0.0, 0.0);
        assert!(crab.click(0.0));
        for _ in 0..6 {
            crab.update(0.0, 0.1);
        }
        assert_abs_diff_eq!(crab.position[1], -2.0 + JUMP_HEIGHT, epsilon = 1e-9);
        for _ in 0..7 {
            crab.update(0.0, 0.1);
        }
        assert!(!crab.is_jumping());
        assert_abs_diff_eq!(crab.position[1], -2.0, epsilon = 1e-9);
    }

    #[test]
    fn clicks_mid_jump_are_ignored() {
        let mut crab = Crab::new([0.0, -2.0, 20.0], 1.0, 0.0);
        assert!(crab.click(0.0));
        crab.update(0.0, 0.05);
        assert!(!crab.click(50.0));
        assert!(crab.shows_heart(1_499.0));
        assert!(!crab.shows_heart(1_500.0));
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut crab = Crab::new([0.0, -2.0, 20.0], 1.0, 0.0);
        crab.click(0.0);
        crab.update(0.0, 5.0);
        assert!(crab.is_jumping());
    }
}
