use glam::Vec3;

/// One white key light aimed at the origin plus a flat ambient term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Where the key light sits; it shines toward the origin.
    pub sun_position: Vec3,
    pub sun_color: Vec3,
    pub sun_intensity: f32,
    pub ambient: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            sun_position: Vec3::new(3.0, 5.0, 4.0),
            sun_color: Vec3::ONE,
            sun_intensity: 3.0,
            ambient: 0.1,
        }
    }
}

impl Lighting {
    /// Unit vector from a surface toward the light, for the diffuse dot.
    pub fn sun_direction(&self) -> Vec3 {
        self.sun_position.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_direction_is_unit_length() {
        let light = Lighting::default();
        assert!((light.sun_direction().length() - 1.0).abs() < 1e-6);
    }
}
