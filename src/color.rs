use palette::{FromColor, Hsl, Srgb};

use crate::period::PeriodBucket;

// ---------------------------------------------------------------------------
// Brand colours
// ---------------------------------------------------------------------------

/// Official colour of each period, used by every chart.
pub fn period_color(bucket: PeriodBucket) -> Srgb<u8> {
    match bucket {
        PeriodBucket::Morning => Srgb::new(0x6D, 0xAF, 0xB8),
        PeriodBucket::Afternoon => Srgb::new(0x2C, 0x6E, 0x7A),
        PeriodBucket::OffHours => Srgb::new(0xC6, 0x38, 0x32),
        PeriodBucket::Night => Srgb::new(0x16, 0x3A, 0x4A),
    }
}

/// Line colours for the first sectors of the hourly chart.
const SERIES_COLORS: [(u8, u8, u8); 6] = [
    (0x2C, 0x6E, 0x7A),
    (0xC6, 0x38, 0x32),
    (0xEA, 0xB3, 0x08),
    (0x16, 0x3A, 0x4A),
    (0x8B, 0x5C, 0xF6),
    (0x0E, 0xA5, 0xE9),
];

// ---------------------------------------------------------------------------
// Series palette
// ---------------------------------------------------------------------------

/// Hue step between generated colours (the golden angle). Each new colour
/// lands away from the earlier ones, and earlier ones never move.
const HUE_STEP: f32 = 137.508;

/// `n` extra series colours for when the fixed cycle runs out.
pub fn generated_colors(n: usize) -> Vec<Srgb<u8>> {
    (0..n)
        .map(|i| {
            let rgb: Srgb = Srgb::from_color(Hsl::new(40.0 + i as f32 * HUE_STEP, 0.65, 0.5));
            rgb.into_format()
        })
        .collect()
}

/// Colours for `n` chart series: the brand cycle first, then generated hues.
pub fn series_colors(n: usize) -> Vec<Srgb<u8>> {
    let mut colors: Vec<Srgb<u8>> = SERIES_COLORS
        .iter()
        .take(n)
        .map(|&(r, g, b)| Srgb::new(r, g, b))
        .collect();
    colors.extend(generated_colors(n.saturating_sub(SERIES_COLORS.len())));
    colors
}

/// `#RRGGBB` for hand-off to a web chart.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}
