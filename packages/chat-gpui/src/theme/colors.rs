//! Color conversion from option tokens to GPUI colors

use chat_core::Rgba8;
use gpui::Hsla;

/// Convert a parsed color token to Hsla
pub fn to_hsla(color: Rgba8) -> Hsla {
    rgb_to_hsla(color.r, color.g, color.b, color.a)
}

/// Convert RGB to HSLA
fn rgb_to_hsla(r: u8, g: u8, b: u8, a: u8) -> Hsla {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;
    let a = a as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        // Achromatic
        Hsla {
            h: 0.0,
            s: 0.0,
            l,
            a,
        }
    } else {
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            let h = (g - b) / d;
            if g < b { h + 6.0 } else { h }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsla {
            h: h / 6.0,
            s,
            l,
            a,
        }
    }
}

/// Set the alpha of a color
pub fn with_alpha(color: Hsla, alpha: f32) -> Hsla {
    Hsla { a: alpha, ..color }
}

/// Fixed colors the option bag does not expose
pub mod constants {
    use gpui::Hsla;

    pub fn white() -> Hsla {
        Hsla {
            h: 0.0,
            s: 0.0,
            l: 1.0,
            a: 1.0,
        }
    }

    /// Translucent backdrop behind media badges
    pub fn badge_backdrop() -> Hsla {
        Hsla {
            h: 0.0,
            s: 0.0,
            l: 0.0,
            a: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_conversion() {
        let white = to_hsla(Rgba8::rgb(255, 255, 255));
        assert!((white.l - 1.0).abs() < 0.01);

        let black = to_hsla(Rgba8::rgb(0, 0, 0));
        assert!((black.l - 0.0).abs() < 0.01);

        let red = to_hsla(Rgba8::rgb(255, 0, 0));
        assert!((red.h - 0.0).abs() < 0.01);
        assert!((red.s - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_alpha_carried() {
        let half = to_hsla(Rgba8::rgba(0, 0, 0, 128));
        assert!((half.a - 128.0 / 255.0).abs() < 0.01);
        assert!((with_alpha(half, 1.0).a - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_named_token_hue() {
        let light_blue = to_hsla(Rgba8::parse("lightblue").unwrap());
        // lightblue sits around 195 degrees
        assert!((light_blue.h * 360.0 - 195.0).abs() < 1.0);
    }
}
