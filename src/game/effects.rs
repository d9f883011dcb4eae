// Short-lived visual effects: heart bursts, shot tracers and garden plants.
// All times are milliseconds on the frame clock.

use std::f64::consts::TAU;

use rand::Rng;

use crate::config::TRACER_MS;
use crate::scene::Rgb;
use crate::scene::camera::Vec3;

// --- Heart burst ------------------------------------------------------------

const BURST_PARTICLES: usize = 25;
const BURST_MS: f64 = 800.0;
const BURST_SPEED: f64 = 1.2;
const BURST_PARTICLE_SIZE: f64 = 0.08;

#[derive(Clone, Debug)]
pub struct HeartBurst {
    origin: Vec3,
    started: f64,
    velocities: Vec<Vec3>,
}

/// One drawn particle of a burst.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub size: f64,
    pub alpha: f64,
}

impl HeartBurst {
    pub fn new(origin: Vec3, now: f64, rng: &mut impl Rng) -> Self {
        let velocities = (0..BURST_PARTICLES)
            .map(|_| {
                let v: Vec3 = [
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-0.6..1.4),
                    rng.gen_range(-1.0..1.0),
                ];
                let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt().max(1e-6);
                let speed = BURST_SPEED * rng.gen_range(0.6..1.4);
                [v[0] / len * speed, v[1] / len * speed, v[2] / len * speed]
            })
            .collect();
        Self { origin, started: now, velocities }
    }

    pub fn progress(&self, now: f64) -> f64 {
        ((now - self.started) / BURST_MS).clamp(0.0, 1.0)
    }

    pub fn is_done(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn particles(&self, now: f64) -> impl Iterator<Item = Particle> + '_ {
        let p = self.progress(now);
        let secs = (now - self.started).max(0.0) / 1000.0;
        self.velocities.iter().map(move |v| Particle {
            position: [
                self.origin[0] + v[0] * secs,
                self.origin[1] + v[1] * secs,
                self.origin[2] + v[2] * secs,
            ],
            size: BURST_PARTICLE_SIZE * (1.0 - p),
            alpha: 1.0 - p,
        })
    }
}

// --- Tracer -----------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tracer {
    pub from: Vec3,
    pub to: Vec3,
    started: f64,
}

impl Tracer {
    pub fn new(from: Vec3, to: Vec3, now: f64) -> Self {
        Self { from, to, started: now }
    }

    pub fn alpha(&self, now: f64) -> f64 {
        (1.0 - (now - self.started) / TRACER_MS).clamp(0.0, 1.0)
    }

    pub fn is_done(&self, now: f64) -> bool {
        now - self.started >= TRACER_MS
    }
}

// --- Plants -----------------------------------------------------------------

const GROW_MS: f64 = 600.0;

pub const PLANT_COLORS: [Rgb; 20] = [
    Rgb::hex(0xffb3d9),
    Rgb::hex(0xffcce0),
    Rgb::hex(0xff9ecd),
    Rgb::hex(0xff6b9d),
    Rgb::hex(0xd4b8ff),
    Rgb::hex(0xc9a8ff),
    Rgb::hex(0xb399ff),
    Rgb::hex(0xa68bff),
    Rgb::hex(0xa8e6e6),
    Rgb::hex(0xb3f0f0),
    Rgb::hex(0x8dd9d9),
    Rgb::hex(0x7ec8c8),
    Rgb::hex(0xa8e6a1),
    Rgb::hex(0x98d4a8),
    Rgb::hex(0x88c898),
    Rgb::hex(0x7eb87e),
    Rgb::hex(0xfff4b8),
    Rgb::hex(0xffeaa7),
    Rgb::hex(0xffe08d),
    Rgb::hex(0xffd970),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlantKind {
    Tree,
    Flower,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plant {
    pub position: Vec3,
    pub kind: PlantKind,
    pub stem: Rgb,
    pub foliage: Rgb,
    pub size: f64,
    planted: f64,
}

/// Overshoots past 1 then settles.
pub fn elastic_out(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    const P: f64 = 0.3;
    2f64.powf(-10.0 * t) * ((t - P / 4.0) * TAU / P).sin() + 1.0
}

impl Plant {
    pub fn random(position: Vec3, now: f64, rng: &mut impl Rng) -> Self {
        let kind = if rng.gen_bool(0.5) { PlantKind::Tree } else { PlantKind::Flower };
        let stem = PLANT_COLORS[rng.gen_range(0..PLANT_COLORS.len())];
        let mut foliage = PLANT_COLORS[rng.gen_range(0..PLANT_COLORS.len())];
        if foliage == stem {
            foliage = PLANT_COLORS[rng.gen_range(0..PLANT_COLORS.len())];
        }
        Self { position, kind, stem, foliage, size: rng.gen_range(0.7..1.3), planted: now }
    }

    pub fn scale(&self, now: f64) -> f64 {
        elastic_out((now - self.planted) / GROW_MS) * self.size
    }
}
