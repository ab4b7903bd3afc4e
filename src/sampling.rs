use std::f32::consts::PI;

use rand::Rng;

/// Axis-angle rotation: a unit axis and an angle in `[-PI, PI]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisAngle {
    pub axis: [f32; 3],
    pub angle: f32,
}

impl AxisAngle {
    /// Samples a rotation whose axis is uniformly distributed over the unit
    /// sphere, via sphere point picking
    /// (https://mathworld.wolfram.com/SpherePointPicking.html): sampling the
    /// z-coordinate and an azimuth directly avoids the pole bias of
    /// normalizing three independent components.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let u: f32 = rng.gen_range(-1.0..1.0);
        let t: f32 = rng.gen_range(0.0..PI * 2.0);
        let f = (1.0 - u * u).sqrt();

        Self {
            axis: [f * t.cos(), f * t.sin(), u],
            angle: rng.gen_range(-PI..PI),
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.axis[0], self.axis[1], self.axis[2], self.angle]
    }
}

/// Scatter distance, uniform in `[0.2 * radius, radius]`. The floor keeps
/// every triangle moving at full scatter instead of leaving some in place.
pub fn scatter_distance<R: Rng>(rng: &mut R, radius: f32) -> f32 {
    (rng.gen_range(0.0..1.0f32) * 0.8 + 0.2) * radius
}
