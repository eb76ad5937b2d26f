//! Length resolution.
//!
//! Converts a [`Length`] into pixels for a given font size, device pixel
//! ratio and viewport.

use super::properties::Length;

/// Font size (px) used where no element font size exists yet, e.g. when
/// resolving lengths inside media queries.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// CSS pixels per inch.
const PIXELS_PER_INCH: f32 = 96.0;

/// Resolve `length` to pixels.
///
/// `font_size` is used for `em`, `root_font_size` for `rem`. Absolute units
/// (`in`, `cm`, `mm`, `pt`, `pc`) and `dp` scale with `dp_ratio`. Viewport
/// units are relative to `viewport` (width, height). Percentages and `auto`
/// have no reference here and resolve to zero.
pub fn compute_length(
    length: Length,
    font_size: f32,
    root_font_size: f32,
    dp_ratio: f32,
    viewport: (f32, f32),
) -> f32 {
    let (vp_width, vp_height) = viewport;
    let inch = PIXELS_PER_INCH * dp_ratio;

    match length {
        Length::Px(v) => v,
        Length::Dp(v) => v * dp_ratio,
        Length::Em(v) => v * font_size,
        Length::Rem(v) => v * root_font_size,
        Length::Vw(v) => v * vp_width * 0.01,
        Length::Vh(v) => v * vp_height * 0.01,
        Length::Vmin(v) => v * vp_width.min(vp_height) * 0.01,
        Length::Vmax(v) => v * vp_width.max(vp_height) * 0.01,
        Length::In(v) => v * inch,
        Length::Cm(v) => v * inch / 2.54,
        Length::Mm(v) => v * inch / 25.4,
        Length::Pt(v) => v * inch / 72.0,
        Length::Pc(v) => v * inch / 6.0,
        Length::Percent(_) | Length::Auto => 0.0,
    }
}
