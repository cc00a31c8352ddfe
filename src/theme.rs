//! Card palette and the lighting color filter applied to the glare.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }

    /// Lighting filter: `clamp(self * multiply + add)` per RGB channel, alpha untouched.
    pub fn lighting(self, multiply: Rgba, add: Rgba) -> Rgba {
        let ch = |c: u8, m: u8, a: u8| -> u8 {
            let lit = (c as u32 * m as u32) / 255 + a as u32;
            lit.min(255) as u8
        };
        Rgba {
            r: ch(self.r, multiply.r, add.r),
            g: ch(self.g, multiply.g, add.g),
            b: ch(self.b, multiply.b, add.b),
            a: self.a,
        }
    }
}

pub const YELLOW: Rgba = Rgba::from_argb(0xFFFF_EB3B);
pub const PURPLE: Rgba = Rgba::from_argb(0xFF9C_27B0);
pub const WHITE: Rgba = Rgba::from_argb(0xFFFF_FFFF);

pub const GRAY: Rgba = Rgba::from_argb(0xFF9E_9E9E);

/// Page behind the card.
pub const SCREEN_BACKGROUND: Rgba = WHITE;
/// Face fill while the card image is unavailable.
pub const FACE_FALLBACK: Rgba = GRAY;
