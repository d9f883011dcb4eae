//! Night-sky puzzle: connect twelve stars laid out on a heart, in order.

use std::f64::consts::PI;

use crate::scene::camera::Vec3;

const CEILING_Y: f64 = 41.5;
const HEART_SCALE: f64 = 1.45;
const HEART_CENTER_Z: f64 = -8.2;
const STAR_SIZE: f64 = 0.72;
pub const STAR_COUNT: usize = 12;
pub const COMPLETION_MESSAGE: &str = "H + A";

/// Star indices in the order they must be clicked: bottom tip first, then
/// around the curve.
pub const CLICK_ORDER: [usize; STAR_COUNT] = [6, 7, 8, 9, 10, 11, 0, 1, 2, 3, 4, 5];

/// Classic heart curve, laid flat on the sky ceiling.
fn heart_point(t: f64) -> Vec3 {
    let hx = 16.0 * t.sin().powi(3);
    let hy = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    [hx * HEART_SCALE, CEILING_Y - 0.02, hy * HEART_SCALE + HEART_CENTER_Z]
}

pub fn star_positions() -> [Vec3; STAR_COUNT] {
    std::array::from_fn(|i| heart_point(i as f64 * PI / 6.0))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StarClick {
    /// Accepted; `step` counts from zero.
    Linked { step: u32 },
    /// Accepted and it was the last star.
    Completed { step: u32 },
    Ignored,
}

#[derive(Clone, Debug)]
pub struct Constellation {
    stars: [Vec3; STAR_COUNT],
    clicked: Vec<usize>,
}

impl Default for Constellation {
    fn default() -> Self {
        Self::new()
    }
}

impl Constellation {
    pub fn new() -> Self {
        Self { stars: star_positions(), clicked: Vec::with_capacity(STAR_COUNT) }
    }

    pub fn stars(&self) -> &[Vec3; STAR_COUNT] {
        &self.stars
    }

    pub fn star_radius(&self) -> f64 {
        STAR_SIZE
    }

    /// Clickable area is wider than the drawn star.
    pub fn hit_radius(&self) -> f64 {
        STAR_SIZE * 3.2
    }

    pub fn clicked(&self) -> &[usize] {
        &self.clicked
    }

    pub fn is_lit(&self, index: usize) -> bool {
        self.clicked.contains(&index)
    }

    pub fn next_star(&self) -> Option<usize> {
        CLICK_ORDER.get(self.clicked.len()).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.clicked.len() == STAR_COUNT
    }

    /// Consecutive pairs of lit stars to draw as lines.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.clicked.windows(2).map(|w| (self.stars[w[0]], self.stars[w[1]]))
    }

    pub fn click(&mut self, index: usize) -> StarClick {
        if self.next_star() != Some(index) {
            return StarClick::Ignored;
        }
        let step = self.clicked.len() as u32;
        self.clicked.push(index);
        if self.is_complete() {
            log::info!("constellation complete");
            StarClick::Completed { step }
        } else {
            StarClick::Linked { step }
        }
    }
}
