use crate::error::{CollageError, Result};
use serde::{Deserialize, Serialize};

/// Pixel dimensions of a photo, a wrapper, or the canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
    pub fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }
    /// Height over width; portrait photos are > 1.
    pub fn ratio(&self) -> f64 {
        self.height as f64 / self.width as f64
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Canvas-absolute top-left corner of a placed item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

/// A pending geometric operation on a wrapper.
///
/// Operations are plain data: `simulate` predicts the resulting size without
/// touching pixels, and the apply phase (`pipeline`) replays the same
/// sequence on the decoded image. The two never disagree because the apply
/// phase reads its target dimensions from `simulate`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Scale down to fit within `max_width` x `max_height`, preserving the
    /// aspect ratio. The tighter of the two ratios wins. Upscaling is a
    /// precondition violation, not a clamp.
    Resize { max_width: u32, max_height: u32 },
    /// Remove `rows` pixel rows from the bottom edge.
    Crop { rows: u32 },
}

impl Operation {
    /// Predicts the size after applying this operation to `current`.
    pub fn simulate(&self, current: Size) -> Result<Size> {
        match *self {
            Operation::Resize {
                max_width,
                max_height,
            } => {
                if max_width > current.width || max_height > current.height {
                    return Err(CollageError::Upscale {
                        current,
                        max_width,
                        max_height,
                    });
                }
                let width_ratio = max_width as f64 / current.width as f64;
                let height_ratio = max_height as f64 / current.height as f64;
                if width_ratio < height_ratio {
                    Ok(Size::new(
                        max_width,
                        (current.height as f64 * width_ratio).ceil() as u32,
                    ))
                } else {
                    Ok(Size::new(
                        (current.width as f64 * height_ratio).ceil() as u32,
                        max_height,
                    ))
                }
            }
            Operation::Crop { rows } => {
                if rows >= current.height {
                    return Err(CollageError::CropExhausted {
                        height: current.height,
                        target: current.height.saturating_sub(rows),
                    });
                }
                Ok(Size::new(current.width, current.height - rows))
            }
        }
    }
}

/// A photo's final placement: the operation sequence to apply and where the
/// result lands on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacedPhoto {
    /// Index of the photo in the input order handed to the planner.
    pub photo: usize,
    /// Pending operations, in application order.
    pub ops: Vec<Operation>,
    /// Top-left corner on the canvas.
    pub position: Position,
    /// Size after all operations; the rendered pixel footprint.
    pub size: Size,
}

/// Frozen output of the planning phase and input to the apply phase.
///
/// Items are ordered column by column, top to bottom. Placeholders reserved
/// for spans are already consumed; every item here carries a real photo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutPlan {
    pub canvas: Size,
    pub column_count: usize,
    /// Width shared by every column except possibly the last, which absorbs
    /// the division remainder.
    pub column_width: u32,
    pub items: Vec<PlacedPhoto>,
}

/// Statistics about a finished layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Photos placed (a span counts once).
    pub num_photos: usize,
    /// Photos spanning two columns.
    pub num_spans: usize,
    pub columns: usize,
    pub canvas_area: u64,
    /// Total area of the placed items (spans cover both columns).
    pub placed_area: u64,
    /// Pixel rows sacrificed to alignment crops across all items.
    pub cropped_rows: u64,
    /// placed_area / canvas_area (0.0 to 1.0). 1.0 means a gapless canvas.
    pub coverage: f64,
}

impl LayoutPlan {
    /// Computes statistics for this plan.
    pub fn stats(&self) -> LayoutStats {
        let num_photos = self.items.len();
        let mut num_spans = 0;
        let mut placed_area = 0u64;
        let mut cropped_rows = 0u64;
        for item in &self.items {
            if item.size.width > self.column_width {
                num_spans += 1;
            }
            placed_area += item.size.area();
            cropped_rows += item
                .ops
                .iter()
                .map(|op| match op {
                    Operation::Crop { rows } => *rows as u64,
                    Operation::Resize { .. } => 0,
                })
                .sum::<u64>();
        }
        let canvas_area = self.canvas.area();
        let coverage = if canvas_area > 0 {
            placed_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        LayoutStats {
            num_photos,
            num_spans,
            columns: self.column_count,
            canvas_area,
            placed_area,
            cropped_rows,
            coverage,
        }
    }
}

impl LayoutStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Photos: {}, Spans: {}, Columns: {}, Coverage: {:.2}%, Cropped: {} rows",
            self.num_photos,
            self.num_spans,
            self.columns,
            self.coverage * 100.0,
            self.cropped_rows,
        )
    }
}
