use crate::model::Size;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Nothing to lay out")]
    Empty,
    #[error(
        "Photos are too small to cover the canvas ({photo_area} px² of content for {canvas_area} px² of canvas)"
    )]
    InsufficientArea { photo_area: u64, canvas_area: u64 },
    #[error("Cannot resize {current} up to {max_width}x{max_height}")]
    Upscale {
        current: Size,
        max_width: u32,
        max_height: u32,
    },
    #[error("Cannot crop a {height} px tall wrapper to {target} px")]
    CropExhausted { height: u32, target: u32 },
    #[error(
        "Column {column} is {height} px tall, under the {target} px canvas; layout cannot stretch downward"
    )]
    ColumnTooShort {
        column: usize,
        height: u32,
        target: u32,
    },
    #[error(
        "Group in column {column} misses its anchors by {gap} px; the column count is likely too high"
    )]
    GroupTooShort { column: usize, gap: u32 },
    #[error("Locked wrapper in column {column} has no link partner")]
    MissingPartner { column: usize },
}

pub type Result<T> = std::result::Result<T, CollageError>;
