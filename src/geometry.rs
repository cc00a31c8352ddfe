// Card dimensions, glare overlay outline and the card's perspective transform.

/// Card size in density-independent units.
pub const CARD_WIDTH_DP: f64 = 200.0;
pub const CARD_HEIGHT_DP: f64 = 300.0;
/// Host camera distance (8in at 72dpi), in CSS pixels.
pub const DEFAULT_CAMERA_DISTANCE_PX: f64 = 576.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardSize {
    pub width_dp: f64,
    pub height_dp: f64,
}

impl Default for CardSize {
    fn default() -> Self {
        Self {
            width_dp: CARD_WIDTH_DP,
            height_dp: CARD_HEIGHT_DP,
        }
    }
}

impl CardSize {
    /// Size in device pixels for the given pixel ratio.
    pub fn to_px(self, density: f64) -> (f64, f64) {
        let density = if density.is_finite() && density > 0.0 {
            density
        } else {
            1.0
        };
        (self.width_dp * density, self.height_dp * density)
    }
}

/// The parallelogram the glare gradient is clipped to, in untranslated card coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct GlarePath {
    pub vertices: [(f64, f64); 4],
}

impl GlarePath {
    pub fn new(width: f64, height: f64) -> Self {
        let fifth = width / 5.0;
        Self {
            vertices: [
                (fifth, 0.0),
                (fifth * 2.0, 0.0),
                (fifth, height),
                (0.0, height),
            ],
        }
    }
}

/// CSS transform tilting the card around its center.
pub fn perspective_transform(camera_distance_px: f64, rotation_x: f64, rotation_y: f64) -> String {
    format!(
        "perspective({:.1}px) rotateX({:.3}deg) rotateY({:.3}deg)",
        camera_distance_px, rotation_x, rotation_y
    )
}
