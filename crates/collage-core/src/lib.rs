//! Core library for laying photo streams out into exact-fit column collages.
//!
//! - Planning: estimate a column count from the photo areas, place each photo
//!   greedily into the shortest column (occasionally spanning two
//!   similar-height neighbors), then crop every column to the exact canvas
//!   height.
//! - The plan is pure geometry and fully deterministic for a given seed;
//!   applying it to pixels is a separate phase that can fan out across a
//!   thread pool (`parallel` feature).
//!
//! Quick example:
//! ```ignore
//! use collage_core::{CollageConfig, Size, plan_layout};
//! # fn main() -> collage_core::Result<()> {
//! let sizes = vec![Size::new(2400, 3600); 40];
//! let cfg = CollageConfig {
//!     canvas_width: 1200,
//!     canvas_height: 1800,
//!     ..Default::default()
//! };
//! let plan = plan_layout(&sizes, &cfg)?;
//! println!("columns: {}", plan.column_count);
//! # Ok(()) }
//! ```

pub mod canvas;
pub mod column;
pub mod compositing;
pub mod config;
pub mod error;
pub mod estimator;
pub mod export;
pub mod model;
pub mod pipeline;
pub mod wrapper;

pub use canvas::*;
pub use config::*;
pub use error::*;
pub use estimator::*;
pub use export::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `collage_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::config::{CollageConfig, CollageConfigBuilder};
    pub use crate::estimator::{column_width, estimate_column_count};
    pub use crate::model::{LayoutPlan, LayoutStats, Operation, PlacedPhoto, Position, Size};
    pub use crate::pipeline::{
        CollageOutput, InputPhoto, plan_layout, plan_layout_adaptive, render_collage, render_plan,
    };
    pub use crate::wrapper::{Wrapper, WrapperArena, WrapperId};
}
