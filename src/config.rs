//! Widget configuration, optionally overridden from localStorage.

use serde::Deserialize;

use crate::geometry::{CARD_HEIGHT_DP, CARD_WIDTH_DP, CardSize, DEFAULT_CAMERA_DISTANCE_PX};
use crate::util::cwarn;

pub const STORAGE_KEY: &str = "glare_card_config";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub width_dp: f64,
    pub height_dp: f64,
    /// Face image URL.
    pub image_src: String,
    pub glare_alpha: f64,
    pub camera_distance_px: f64,
    pub debug_log: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            width_dp: CARD_WIDTH_DP,
            height_dp: CARD_HEIGHT_DP,
            image_src: "assets/card.png".to_string(),
            glare_alpha: 0.4,
            camera_distance_px: DEFAULT_CAMERA_DISTANCE_PX,
            debug_log: false,
        }
    }
}

impl CardConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<CardConfig>(raw).map(CardConfig::sanitized)
    }

    /// Replaces out-of-range values with defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = CardConfig::default();
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.width_dp) || !positive(self.height_dp) {
            self.width_dp = defaults.width_dp;
            self.height_dp = defaults.height_dp;
        }
        if !positive(self.camera_distance_px) {
            self.camera_distance_px = defaults.camera_distance_px;
        }
        self.glare_alpha = if self.glare_alpha.is_finite() {
            self.glare_alpha.clamp(0.0, 1.0)
        } else {
            defaults.glare_alpha
        };
        if self.image_src.trim().is_empty() {
            self.image_src = defaults.image_src;
        }
        self
    }

    pub fn card_size(&self) -> CardSize {
        CardSize {
            width_dp: self.width_dp,
            height_dp: self.height_dp,
        }
    }

    /// Reads the override from localStorage, falling back to defaults.
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|win| win.local_storage().ok().flatten())
            .and_then(|store| store.get_item(STORAGE_KEY).ok().flatten());
        match raw {
            Some(raw) => match CardConfig::from_json(&raw) {
                Ok(cfg) => cfg,
                Err(e) => {
                    cwarn(&format!("ignoring malformed {}: {}", STORAGE_KEY, e));
                    CardConfig::default()
                }
            },
            None => CardConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(CardConfig::from_json("{}").unwrap(), CardConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = CardConfig::from_json(r#"{"image_src":"img/pika.png","debug_log":true}"#)
            .unwrap();
        assert_eq!(cfg.image_src, "img/pika.png");
        assert!(cfg.debug_log);
        assert_eq!(cfg.width_dp, 200.0);
        assert_eq!(cfg.glare_alpha, 0.4);
    }

    #[test]
    fn out_of_range_values_are_sanitized() {
        let cfg = CardConfig::from_json(
            r#"{"width_dp":-1,"height_dp":50,"glare_alpha":3.0,"camera_distance_px":0,"image_src":"  "}"#,
        )
        .unwrap();
        let d = CardConfig::default();
        assert_eq!((cfg.width_dp, cfg.height_dp), (d.width_dp, d.height_dp));
        assert_eq!(cfg.glare_alpha, 1.0);
        assert_eq!(cfg.camera_distance_px, d.camera_distance_px);
        assert_eq!(cfg.image_src, d.image_src);
    }

    #[test]
    fn default_face_image_ships_with_the_crate() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join(CardConfig::default().image_src);
        assert!(path.is_file(), "missing {}", path.display());
        let html = std::fs::read_to_string(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("index.html"),
        )
        .unwrap();
        assert!(html.contains(r#"rel="copy-dir" href="assets""#));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(CardConfig::from_json("{width_dp:").is_err());
    }

    #[test]
    fn card_size_from_config() {
        let cfg = CardConfig {
            width_dp: 100.0,
            height_dp: 150.0,
            ..CardConfig::default()
        };
        assert_eq!(cfg.card_size().to_px(2.0), (200.0, 300.0));
    }
}
