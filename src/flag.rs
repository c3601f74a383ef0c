//! Procedural flag textures.
//!
//! Renders small RGBA pixel buffers from a declarative [`FlagSpec`] — the
//! faction-flag artwork used by the sandbox.  Rendering is pure and
//! deterministic; [`random_spec`] exists for the demo scenario.

use rand::Rng;

/// RGBA color, 8 bits per channel.
pub type Rgba = [u8; 4];

/// Layout of the flag field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagPattern {
    /// Single color.
    Solid,
    /// Three equal horizontal bands, top to bottom.
    HorizontalBands,
    /// Three equal vertical bands, left to right.
    VerticalBands,
    /// Split along the top-left → bottom-right diagonal.
    DiagonalDown,
    /// Centred cross of the secondary color over the primary field.
    Cross,
}

/// A flag design: pattern plus up to three participating colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    pub pattern: FlagPattern,
    /// Primary, secondary, tertiary.  Patterns that use fewer colors ignore
    /// the rest.
    pub colors: [Rgba; 3],
    pub width: usize,
    pub height: usize,
}

impl FlagSpec {
    pub fn new(pattern: FlagPattern, colors: [Rgba; 3]) -> Self {
        Self {
            pattern,
            colors,
            width: crate::constants::FLAG_WIDTH,
            height: crate::constants::FLAG_HEIGHT,
        }
    }
}

/// Render the spec to a row-major RGBA buffer of `width × height × 4` bytes.
pub fn render(spec: &FlagSpec) -> Vec<u8> {
    let [primary, secondary, tertiary] = spec.colors;
    let mut pixels = Vec::with_capacity(spec.width * spec.height * 4);

    // Cross arm thickness: a fifth of the smaller dimension, at least 1 px.
    let arm = (spec.width.min(spec.height) / 5).max(1);

    for y in 0..spec.height {
        for x in 0..spec.width {
            let color = match spec.pattern {
                FlagPattern::Solid => primary,
                FlagPattern::HorizontalBands => {
                    match y * 3 / spec.height {
                        0 => primary,
                        1 => secondary,
                        _ => tertiary,
                    }
                }
                FlagPattern::VerticalBands => {
                    match x * 3 / spec.width {
                        0 => primary,
                        1 => secondary,
                        _ => tertiary,
                    }
                }
                FlagPattern::DiagonalDown => {
                    // Above the diagonal keeps the primary field.
                    if x * spec.height < y * spec.width {
                        secondary
                    } else {
                        primary
                    }
                }
                FlagPattern::Cross => {
                    let cx = spec.width / 2;
                    let cy = spec.height / 2;
                    if x.abs_diff(cx) < arm || y.abs_diff(cy) < arm {
                        secondary
                    } else {
                        primary
                    }
                }
            };
            pixels.extend_from_slice(&color);
        }
    }

    pixels
}

/// Fetch the pixel at `(x, y)` from a buffer produced by [`render`].
pub fn pixel_at(buffer: &[u8], width: usize, x: usize, y: usize) -> Rgba {
    let idx = (y * width + x) * 4;
    [buffer[idx], buffer[idx + 1], buffer[idx + 2], buffer[idx + 3]]
}

/// A random flag design at the default dimensions.
pub fn random_spec<R: Rng>(rng: &mut R) -> FlagSpec {
    let pattern = match rng.gen_range(0..5) {
        0 => FlagPattern::Solid,
        1 => FlagPattern::HorizontalBands,
        2 => FlagPattern::VerticalBands,
        3 => FlagPattern::DiagonalDown,
        _ => FlagPattern::Cross,
    };
    let mut color = || -> Rgba { [rng.gen(), rng.gen(), rng.gen(), 255] };
    FlagSpec::new(pattern, [color(), color(), color()])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];
    const GREEN: Rgba = [0, 255, 0, 255];
    const BLUE: Rgba = [0, 0, 255, 255];

    fn spec(pattern: FlagPattern) -> FlagSpec {
        FlagSpec {
            pattern,
            colors: [RED, GREEN, BLUE],
            width: 30,
            height: 18,
        }
    }

    #[test]
    fn buffer_is_width_height_rgba() {
        let buf = render(&spec(FlagPattern::Solid));
        assert_eq!(buf.len(), 30 * 18 * 4);
    }

    #[test]
    fn solid_flag_is_uniformly_primary() {
        let s = spec(FlagPattern::Solid);
        let buf = render(&s);
        for y in 0..s.height {
            for x in 0..s.width {
                assert_eq!(pixel_at(&buf, s.width, x, y), RED);
            }
        }
    }

    #[test]
    fn horizontal_bands_stack_top_to_bottom() {
        let s = spec(FlagPattern::HorizontalBands);
        let buf = render(&s);
        assert_eq!(pixel_at(&buf, s.width, 0, 0), RED);
        assert_eq!(pixel_at(&buf, s.width, 0, 9), GREEN);
        assert_eq!(pixel_at(&buf, s.width, 0, 17), BLUE);
    }

    #[test]
    fn vertical_bands_run_left_to_right() {
        let s = spec(FlagPattern::VerticalBands);
        let buf = render(&s);
        assert_eq!(pixel_at(&buf, s.width, 0, 5), RED);
        assert_eq!(pixel_at(&buf, s.width, 15, 5), GREEN);
        assert_eq!(pixel_at(&buf, s.width, 29, 5), BLUE);
    }

    #[test]
    fn diagonal_splits_corners() {
        let s = spec(FlagPattern::DiagonalDown);
        let buf = render(&s);
        // Top-right corner lies above the diagonal, bottom-left below it.
        assert_eq!(pixel_at(&buf, s.width, 29, 0), RED);
        assert_eq!(pixel_at(&buf, s.width, 0, 17), GREEN);
    }

    #[test]
    fn cross_paints_centre_and_keeps_field_corners() {
        let s = spec(FlagPattern::Cross);
        let buf = render(&s);
        assert_eq!(pixel_at(&buf, s.width, 15, 9), GREEN, "centre is cross color");
        assert_eq!(pixel_at(&buf, s.width, 0, 0), RED, "corner keeps field color");
    }

    #[test]
    fn random_spec_uses_default_dimensions() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        let mut rng = StdRng::seed_from_u64(6);
        let s = random_spec(&mut rng);
        assert_eq!(s.width, crate::constants::FLAG_WIDTH);
        assert_eq!(s.height, crate::constants::FLAG_HEIGHT);
        assert!(s.colors.iter().all(|c| c[3] == 255), "flags are opaque");
    }
}
