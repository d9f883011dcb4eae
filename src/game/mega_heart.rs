// The big heart that replaces the targets after the hundredth hit.

use crate::config::{MEGA_HEART_CLICKS, MEGA_HEART_POSITION};
use crate::scene::Rgb;
use crate::scene::camera::Vec3;

const FRESH: Rgb = Rgb::hex(0xff6b9d);
const BRUISED: Rgb = Rgb::hex(0x8b0000);
pub const MEGA_HEART_RADIUS: f64 = 2.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeartClick {
    Cracked { hits: u32 },
    Broke,
    /// Already broken; the click did nothing.
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct MegaHeart {
    hits: u32,
    broken: bool,
}

impl MegaHeart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        MEGA_HEART_POSITION
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// 0 when fresh, 1 when about to break.
    pub fn damage(&self) -> f64 {
        self.hits as f64 / MEGA_HEART_CLICKS as f64
    }

    pub fn color(&self) -> Rgb {
        FRESH.lerp(BRUISED, self.damage() * 0.5)
    }

    pub fn crack_opacity(&self) -> f64 {
        0.4 + self.damage() * 0.5
    }

    pub fn click(&mut self) -> HeartClick {
        if self.broken {
            return HeartClick::Ignored;
        }
        self.hits += 1;
        if self.hits >= MEGA_HEART_CLICKS {
            self.broken = true;
            HeartClick::Broke
        } else {
            HeartClick::Cracked { hits: self.hits }
        }
    }
}
