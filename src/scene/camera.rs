// First-person camera: yaw/pitch from pointer-lock movement, pinhole
// projection to the canvas, and a centre-of-screen ray for shooting.

pub type Vec3 = [f64; 3];

const LOOK_SENSITIVITY: f64 = 0.002;
const PITCH_LIMIT: f64 = std::f64::consts::FRAC_PI_2 - 0.01;

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn length(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Radians; 0 looks down -Z.
    pub yaw: f64,
    pub pitch: f64,
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { position: [0.0, 2.0, 5.0], yaw: 0.0, pitch: 0.0, fov_deg: 75.0 }
    }
}

impl Camera {
    /// Apply a pointer-lock movement delta in CSS pixels.
    pub fn look(&mut self, dx: f64, dy: f64) {
        self.yaw -= dx * LOOK_SENSITIVITY;
        self.pitch = (self.pitch - dy * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        [-sy * cp, sp, -cy * cp]
    }

    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let f = self.forward();
        let (sy, cy) = self.yaw.sin_cos();
        let right = [cy, 0.0, -sy];
        // up = right x forward
        let up = [
            right[1] * f[2] - right[2] * f[1],
            right[2] * f[0] - right[0] * f[2],
            right[0] * f[1] - right[1] * f[0],
        ];
        (f, right, up)
    }

    /// Project a world point to canvas pixels. Returns (x, y, depth) or None
    /// when the point is behind the camera.
    pub fn project(&self, p: Vec3, width: f64, height: f64) -> Option<(f64, f64, f64)> {
        let (f, r, u) = self.basis();
        let rel = sub(p, self.position);
        let depth = dot(rel, f);
        if depth <= 0.05 {
            return None;
        }
        let focal = (height / 2.0) / (self.fov_deg.to_radians() / 2.0).tan();
        let x = width / 2.0 + dot(rel, r) / depth * focal;
        let y = height / 2.0 - dot(rel, u) / depth * focal;
        Some((x, y, depth))
    }

    /// Pixel size of a world-space length at `depth`.
    pub fn scale_at(&self, depth: f64, height: f64) -> f64 {
        (height / 2.0) / (self.fov_deg.to_radians() / 2.0).tan() / depth
    }

    /// Distance along the aim ray to a sphere, if the crosshair is on it.
    pub fn aim_hit(&self, center: Vec3, radius: f64) -> Option<f64> {
        let f = self.forward();
        let rel = sub(center, self.position);
        let along = dot(rel, f);
        if along <= 0.0 {
            return None;
        }
        let miss_sq = dot(rel, rel) - along * along;
        if miss_sq <= radius * radius {
            Some(along - (radius * radius - miss_sq).max(0.0).sqrt())
        } else {
            None
        }
    }

    /// Point `dist` units along the aim ray.
    pub fn aim_point(&self, dist: f64) -> Vec3 {
        let f = self.forward();
        [
            self.position[0] + f[0] * dist,
            self.position[1] + f[1] * dist,
            self.position[2] + f[2] * dist,
        ]
    }
}
