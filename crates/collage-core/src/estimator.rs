use crate::error::{CollageError, Result};
use crate::model::Size;
use tracing::debug;

/// Assumed height/width ratio of an average photo (3:2 portrait). Only the
/// column-count estimate depends on it; placement measures real sizes.
const ASSUMED_PORTRAIT_RATIO: f64 = 1.5;

/// Estimates how many columns the canvas should be split into for the given
/// photo set.
///
/// Fails with [`CollageError::InsufficientArea`] when the photos cannot
/// cover the canvas even before any cropping. The mean photo area is
/// discounted by the span probability, since a spanning photo occupies two
/// column widths and leaves fewer slots per row of columns.
pub fn estimate_column_count(
    photo_sizes: &[Size],
    canvas: Size,
    span_probability: f64,
) -> Result<usize> {
    if photo_sizes.is_empty() {
        return Err(CollageError::Empty);
    }
    let photo_area: u64 = photo_sizes.iter().map(|s| s.area()).sum();
    let canvas_area = canvas.area();
    if photo_area < canvas_area {
        return Err(CollageError::InsufficientArea {
            photo_area,
            canvas_area,
        });
    }

    let average_area = photo_area as f64 / photo_sizes.len() as f64;
    let effective_area = average_area * (1.0 - span_probability);
    if effective_area < 1.0 {
        return Err(CollageError::InvalidConfig(
            "span probability leaves no effective photo area to estimate columns; \
             force a column count instead"
                .into(),
        ));
    }
    let expected_width = (effective_area / ASSUMED_PORTRAIT_RATIO).sqrt();
    let count = ((canvas.width as f64 / expected_width).ceil() as usize).max(1);
    debug!(
        average_area,
        effective_area, expected_width, count, "estimated column count"
    );
    Ok(count)
}

/// Width shared by all columns except the last, which absorbs the division
/// remainder so the columns tile `[0, canvas_width)` exactly.
pub fn column_width(canvas_width: u32, count: usize) -> u32 {
    debug_assert!(count > 0);
    canvas_width.div_ceil(count as u32)
}
