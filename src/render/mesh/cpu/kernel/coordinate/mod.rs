//! Mapping between NDC `[-1, 1]` and pixel indices `[0, size - 1]`.
//!
//! NDC `y` points up while pixel rows count from the top.

/// A one-pixel axis maps to its center.
#[inline]
pub fn to_ndc(
    pixel: u32,
    size: u32,
) -> f32 {
    if size <= 1 {
        return 0.0;
    }
    2.0 * (pixel as f32 / (size - 1) as f32 - 0.5)
}

/// Rounded to the nearest pixel and clamped into the image.
#[inline]
pub fn to_pixel(
    ndc: f32,
    size: u32,
) -> u32 {
    if size <= 1 {
        return 0;
    }
    let max = (size - 1) as f32;
    ((ndc + 1.0) * 0.5 * max).round().clamp(0.0, max) as u32
}

#[inline]
pub fn row_to_ndc(
    row: u32,
    size: u32,
) -> f32 {
    -to_ndc(row, size)
}

#[inline]
pub fn ndc_to_row(
    ndc: f32,
    size: u32,
) -> u32 {
    size.saturating_sub(1) - to_pixel(ndc, size)
}
