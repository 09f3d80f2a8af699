#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic palette system assigning display colors to silhouettes.
//!
//! Each silhouette seed selects a base color from the palette and derives a
//! small tonal variant of it using a random stream that is salted away from
//! the ridge stream, so coloring never perturbs ridge generation.

use ridgeline_core::{Rgba, SeededRandomStream};

/// Salt mixed into silhouette seeds before driving the tonal jitter stream.
const TONE_STREAM_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Non-empty ordered list of base colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Creates a palette, returning `None` when no colors are provided.
    #[must_use]
    pub fn new(colors: Vec<Rgba>) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Self { colors })
        }
    }

    /// Creates a palette, substituting a single fallback color for an empty list.
    #[must_use]
    pub fn with_fallback(colors: Vec<Rgba>, fallback: Rgba) -> Self {
        Self::new(colors).unwrap_or_else(|| Self {
            colors: vec![fallback],
        })
    }

    /// Colors in palette order.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Index of the base color selected by `seed`.
    #[must_use]
    pub fn base_index(&self, seed: u64) -> usize {
        // Lossless: the remainder is smaller than the palette length.
        (seed % self.colors.len() as u64) as usize
    }

    /// Base color selected by `seed`.
    #[must_use]
    pub fn base_color(&self, seed: u64) -> Rgba {
        self.colors[self.base_index(seed)]
    }
}

/// Bounds of the tonal perturbation applied to base colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneJitter {
    /// Maximum signed hue shift, in turns.
    pub hue_shift: f64,
    /// Range the saturation multiplier is drawn from.
    pub saturation_scale: (f64, f64),
    /// Range the brightness multiplier is drawn from.
    pub brightness_scale: (f64, f64),
    /// Maximum signed offset added to the scaled brightness.
    pub brightness_shift: f64,
}

impl Default for ToneJitter {
    fn default() -> Self {
        Self {
            hue_shift: 0.035,
            saturation_scale: (0.75, 1.15),
            brightness_scale: (0.75, 1.12),
            brightness_shift: 0.06,
        }
    }
}

/// Hue, saturation, brightness and alpha components, each in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsba {
    /// Hue in turns, `[0, 1)`.
    pub hue: f64,
    /// Saturation.
    pub saturation: f64,
    /// Brightness (value).
    pub brightness: f64,
    /// Alpha.
    pub alpha: f64,
}

impl Hsba {
    /// Converts an RGBA color, returning `None` when its channels are not representable.
    #[must_use]
    pub fn from_rgba(color: Rgba) -> Option<Self> {
        if !color.is_normalized() {
            return None;
        }

        let red = f64::from(color.red);
        let green = f64::from(color.green);
        let blue = f64::from(color.blue);
        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);
        let chroma = max - min;

        let hue = if chroma <= 0.0 {
            0.0
        } else if max == red {
            ((green - blue) / chroma).rem_euclid(6.0) / 6.0
        } else if max == green {
            ((blue - red) / chroma + 2.0) / 6.0
        } else {
            ((red - green) / chroma + 4.0) / 6.0
        };
        let saturation = if max <= 0.0 { 0.0 } else { chroma / max };

        Some(Self {
            hue: hue.rem_euclid(1.0),
            saturation,
            brightness: max,
            alpha: f64::from(color.alpha),
        })
    }

    /// Converts back into an RGBA color.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        let sector = self.hue.rem_euclid(1.0) * 6.0;
        let index = sector.floor();
        let fraction = sector - index;
        let value = self.brightness;
        let p = value * (1.0 - self.saturation);
        let q = value * (1.0 - fraction * self.saturation);
        let t = value * (1.0 - (1.0 - fraction) * self.saturation);

        // A hue of exactly one turn lands in sector six, which is sector zero.
        let (red, green, blue) = match (index as u8) % 6 {
            0 => (value, t, p),
            1 => (q, value, p),
            2 => (p, value, t),
            3 => (p, q, value),
            4 => (t, p, value),
            _ => (value, p, q),
        };

        Rgba::new(red as f32, green as f32, blue as f32, self.alpha as f32)
    }
}

/// Pure system that maps silhouette seeds to display colors.
#[derive(Clone, Debug, Default)]
pub struct PaletteAssigner {
    jitter: ToneJitter,
}

impl PaletteAssigner {
    /// Creates an assigner using the provided jitter bounds.
    #[must_use]
    pub const fn new(jitter: ToneJitter) -> Self {
        Self { jitter }
    }

    /// Returns the display color for the silhouette seeded with `seed`.
    #[must_use]
    pub fn color_for(&self, seed: u64, palette: &Palette) -> Rgba {
        self.tone_variant(palette.base_color(seed), seed)
    }

    /// Derives a seeded tonal variant of `base`.
    ///
    /// Colors that cannot be expressed in HSB are returned unmodified.
    #[must_use]
    pub fn tone_variant(&self, base: Rgba, seed: u64) -> Rgba {
        let Some(components) = Hsba::from_rgba(base) else {
            return base;
        };

        let jitter = &self.jitter;
        let mut stream = SeededRandomStream::new(seed ^ TONE_STREAM_SALT);
        let hue_shift = stream.next_in_range(-jitter.hue_shift, jitter.hue_shift);
        let saturation_scale =
            stream.next_in_range(jitter.saturation_scale.0, jitter.saturation_scale.1);
        let brightness_scale =
            stream.next_in_range(jitter.brightness_scale.0, jitter.brightness_scale.1);
        let brightness_shift =
            stream.next_in_range(-jitter.brightness_shift, jitter.brightness_shift);

        Hsba {
            hue: (components.hue + hue_shift).rem_euclid(1.0),
            saturation: (components.saturation * saturation_scale).clamp(0.0, 1.0),
            brightness: (components.brightness * brightness_scale + brightness_shift)
                .clamp(0.0, 1.0),
            alpha: components.alpha,
        }
        .to_rgba()
    }
}
