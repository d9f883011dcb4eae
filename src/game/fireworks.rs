//! Evening fireworks.
//!
//! While the time of day is at or past dusk a rocket goes up every one to two
//! seconds, climbs to a random height and bursts into a cloud of sparks that
//! fall for two seconds. Times are in seconds since the scene started.

use std::f64::consts::{FRAC_PI_2, TAU};

use rand::Rng;

use crate::audio::SoundCue;
use crate::scene::camera::Vec3;
use crate::scene::{Rgb, TimeOfDay};

pub const FIREWORK_COLORS: [Rgb; 3] = [Rgb::hex(0xff6b9d), Rgb::hex(0xffd700), Rgb::hex(0x00d4ff)];
const SPARKS: usize = 40;
const ROCKET_SPEED: f64 = 15.0;
const GRAVITY: f64 = -8.0;
const BURST_SECS: f64 = 2.0;
const LAUNCH_Y: f64 = -5.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Rocket {
    pub position: Vec3,
    pub burst_y: f64,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    pub origin: Vec3,
    pub color: Rgb,
    pub started: f64,
    offsets: Vec<Vec3>,
    velocities: Vec<Vec3>,
}

impl Burst {
    fn new(origin: Vec3, color: Rgb, started: f64, rng: &mut impl Rng) -> Self {
        let mut offsets = Vec::with_capacity(SPARKS);
        let mut velocities = Vec::with_capacity(SPARKS);
        for _ in 0..SPARKS {
            let theta = rng.gen_range(0.0..TAU);
            let phi = rng.gen_range(0.0..FRAC_PI_2);
            let speed = rng.gen_range(3.0..9.0);
            velocities.push([
                phi.sin() * theta.cos() * speed,
                phi.cos() * speed,
                phi.sin() * theta.sin() * speed,
            ]);
            offsets.push([
                rng.gen_range(-0.25..0.25),
                rng.gen_range(-0.25..0.25),
                rng.gen_range(-0.25..0.25),
            ]);
        }
        Self { origin, color, started, offsets, velocities }
    }

    pub fn age(&self, now: f64) -> f64 {
        now - self.started
    }

    pub fn is_done(&self, now: f64) -> bool {
        self.age(now) > BURST_SECS
    }

    /// Spark positions `now`. Vertical speed decays as `GRAVITY * t / 2`.
    pub fn sparks(&self, now: f64) -> impl Iterator<Item = Vec3> + '_ {
        let t = self.age(now).clamp(0.0, BURST_SECS);
        self.offsets.iter().zip(&self.velocities).map(move |(o, v)| {
            [
                self.origin[0] + o[0] + v[0] * t,
                self.origin[1] + o[1] + v[1] * t + GRAVITY * t * t / 4.0,
                self.origin[2] + o[2] + v[2] * t,
            ]
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct Fireworks {
    next_launch: f64,
    rockets: Vec<Rocket>,
    bursts: Vec<Burst>,
}

impl Fireworks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    /// Advance the show. Returns the cues to play this frame.
    pub fn update(&mut self, now: f64, dt: f64, time: TimeOfDay, rng: &mut impl Rng) -> Vec<SoundCue> {
        let mut cues = Vec::new();
        if time.fireworks() && now >= self.next_launch {
            self.rockets.push(Rocket {
                position: [rng.gen_range(-20.0..20.0), LAUNCH_Y, rng.gen_range(-15.0..15.0)],
                burst_y: rng.gen_range(8.0..20.0),
                color: FIREWORK_COLORS[rng.gen_range(0..FIREWORK_COLORS.len())],
            });
            self.next_launch = now + rng.gen_range(1.0..2.0);
            cues.push(SoundCue::RocketLaunch);
        }

        let mut exploded = Vec::new();
        self.rockets.retain_mut(|r| {
            if r.position[1] >= r.burst_y {
                exploded.push((r.position, r.color));
                false
            } else {
                r.position[1] += ROCKET_SPEED * dt;
                true
            }
        });
        for (origin, color) in exploded {
            self.bursts.push(Burst::new(origin, color, now, rng));
            cues.push(SoundCue::FireworkBoom);
        }
        self.bursts.retain(|b| !b.is_done(now));
        cues
    }
}
