use super::Vec2;

/// Natural Earth I pseudo-cylindrical projection (Šavrič et al. polynomial).
///
/// Output is in screen pixels: `x` grows east, `y` grows south, and the
/// point (0°, 0°) lands on `translate`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NaturalEarth1 {
    pub scale: f64,
    pub translate: Vec2,
}

impl NaturalEarth1 {
    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    /// Projection centered in a `width` x `height` viewport.
    pub fn centered(width: f64, height: f64, scale: f64) -> Self {
        Self::new(scale, Vec2::new(width / 2.0, height / 2.0))
    }

    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> Vec2 {
        let raw = natural_earth1_raw(lon_deg.to_radians(), lat_deg.to_radians());
        Vec2::new(
            self.translate.x + self.scale * raw.x,
            self.translate.y - self.scale * raw.y,
        )
    }
}

/// Unit-sphere forward projection, radians in, projection-plane units out.
pub fn natural_earth1_raw(lambda: f64, phi: f64) -> Vec2 {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    Vec2::new(
        lambda
            * (0.8707 - 0.131979 * phi2
                + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4))),
        phi * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4))),
    )
}

#[cfg(test)]
mod tests {
    use super::{NaturalEarth1, natural_earth1_raw};
    use crate::math::Vec2;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_maps_to_translate() {
        let p = NaturalEarth1::centered(1000.0, 650.0, 160.0);
        assert_eq!(p.project(0.0, 0.0), Vec2::new(500.0, 325.0));
    }

    #[test]
    fn antimeridian_on_equator() {
        let raw = natural_earth1_raw(std::f64::consts::PI, 0.0);
        assert_close(raw.x, std::f64::consts::PI * 0.8707, 1e-12);
        assert_close(raw.y, 0.0, 1e-12);

        let p = NaturalEarth1::centered(1000.0, 650.0, 160.0);
        let east = p.project(180.0, 0.0);
        let west = p.project(-180.0, 0.0);
        assert_close(east.x - 500.0, 500.0 - west.x, 1e-9);
        assert_close(east.x, 500.0 + 160.0 * std::f64::consts::PI * 0.8707, 1e-9);
    }

    #[test]
    fn north_is_up_on_screen() {
        let p = NaturalEarth1::centered(1000.0, 650.0, 160.0);
        let north = p.project(0.0, 60.0);
        let south = p.project(0.0, -60.0);
        assert!(north.y < 325.0);
        assert_close(north.y - 325.0, 325.0 - south.y, 1e-9);
    }

    #[test]
    fn pole_height_matches_reference() {
        // Reference value for the Natural Earth I pole ordinate (≈ 1.4224 R).
        let raw = natural_earth1_raw(0.0, std::f64::consts::FRAC_PI_2);
        assert_close(raw.y, 1.4224, 1e-3);
    }
}
