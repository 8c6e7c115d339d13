use crate::canvas::Canvas;
use crate::config::CollageConfig;
use crate::error::{CollageError, Result};
use crate::estimator::estimate_column_count;
use crate::model::{LayoutPlan, LayoutStats, Operation, PlacedPhoto, Position, Size};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// In-memory photo to place (key + decoded image).
pub struct InputPhoto {
    pub key: String,
    pub image: DynamicImage,
}

/// Output of a full run: the frozen plan and the composed RGBA canvas.
pub struct CollageOutput {
    pub plan: LayoutPlan,
    pub rgba: RgbaImage,
}

impl CollageOutput {
    /// Computes layout statistics for this output.
    /// This is a convenience method that delegates to `plan.stats()`.
    pub fn stats(&self) -> LayoutStats {
        self.plan.stats()
    }
}

#[instrument(skip_all)]
/// Plans a layout for `sizes` (arrival order preserved) on the configured
/// canvas. Pure geometry: no pixel data is touched.
///
/// The column count is taken from `cfg.columns` when forced, estimated from
/// the photo set otherwise. Fails when the photos cannot cover the canvas or
/// when the finished columns cannot be cropped to the exact target height.
pub fn plan_layout(sizes: &[Size], cfg: &CollageConfig) -> Result<LayoutPlan> {
    cfg.validate()?;
    if sizes.is_empty() {
        return Err(CollageError::Empty);
    }
    let count = match cfg.columns {
        Some(n) => n,
        None => estimate_column_count(sizes, cfg.canvas_size(), cfg.span_probability)?,
    };
    plan_with_columns(sizes, cfg, count)
}

#[instrument(skip_all)]
/// Like [`plan_layout`], but when alignment reports columns that cannot
/// shrink to fit, retries with one column fewer, down to a single column.
/// The estimate errs high by design; this walks it back to feasibility.
pub fn plan_layout_adaptive(sizes: &[Size], cfg: &CollageConfig) -> Result<LayoutPlan> {
    cfg.validate()?;
    if sizes.is_empty() {
        return Err(CollageError::Empty);
    }
    let mut count = match cfg.columns {
        Some(n) => n,
        None => estimate_column_count(sizes, cfg.canvas_size(), cfg.span_probability)?,
    };
    loop {
        match plan_with_columns(sizes, cfg, count) {
            Err(
                e @ (CollageError::ColumnTooShort { .. } | CollageError::GroupTooShort { .. }),
            ) if count > 1 => {
                warn!(count, error = %e, "layout infeasible, retrying with fewer columns");
                count -= 1;
            }
            other => return other,
        }
    }
}

fn plan_with_columns(sizes: &[Size], cfg: &CollageConfig, count: usize) -> Result<LayoutPlan> {
    let mut canvas = Canvas::new(count, cfg)?;
    for (photo, &size) in sizes.iter().enumerate() {
        canvas.add_photo(photo, size)?;
    }
    canvas.align_bottom()?;
    Ok(canvas.into_plan())
}

#[instrument(skip_all)]
/// Applies a frozen plan to pixel content and composes the RGBA canvas.
///
/// Each item is independent once the plan exists; with the `parallel`
/// feature the per-item resample/crop work fans out across a rayon pool and
/// only the final blits run sequentially.
pub fn render_plan(photos: &[InputPhoto], plan: &LayoutPlan) -> Result<RgbaImage> {
    #[cfg(feature = "parallel")]
    let tiles: Vec<(RgbaImage, Position)> = plan
        .items
        .par_iter()
        .map(|item| render_item(photos, item))
        .collect::<Result<_>>()?;
    #[cfg(not(feature = "parallel"))]
    let tiles: Vec<(RgbaImage, Position)> = plan
        .items
        .iter()
        .map(|item| render_item(photos, item))
        .collect::<Result<_>>()?;

    let mut canvas = RgbaImage::new(plan.canvas.width, plan.canvas.height);
    for (tile, position) in &tiles {
        crate::compositing::blit_rgba(tile, &mut canvas, position.x, position.y);
    }
    Ok(canvas)
}

fn render_item(photos: &[InputPhoto], item: &PlacedPhoto) -> Result<(RgbaImage, Position)> {
    let input = photos.get(item.photo).ok_or_else(|| {
        CollageError::InvalidConfig(format!(
            "plan references photo {} outside the input set",
            item.photo
        ))
    })?;
    let (width, height) = input.image.dimensions();
    let rgba = apply_ops(&input.image, Size::new(width, height), &item.ops)?;
    debug_assert_eq!(
        (rgba.width(), rgba.height()),
        (item.size.width, item.size.height)
    );
    Ok((rgba, item.position))
}

/// Replays a planned operation sequence on pixels. The planner's simulated
/// sizes are authoritative: every step resamples or crops to the exact fold
/// of [`Operation::simulate`], so the rendered tile matches the plan to the
/// pixel.
fn apply_ops(image: &DynamicImage, original: Size, ops: &[Operation]) -> Result<RgbaImage> {
    let mut rgba = image.to_rgba8();
    let mut size = original;
    for op in ops {
        let next = op.simulate(size)?;
        rgba = match op {
            Operation::Resize { .. } => {
                imageops::resize(&rgba, next.width, next.height, FilterType::Lanczos3)
            }
            Operation::Crop { .. } => {
                imageops::crop_imm(&rgba, 0, 0, next.width, next.height).to_image()
            }
        };
        size = next;
    }
    Ok(rgba)
}

#[instrument(skip_all)]
/// Plans adaptively from the decoded photo dimensions, then renders.
pub fn render_collage(photos: &[InputPhoto], cfg: &CollageConfig) -> Result<CollageOutput> {
    let sizes: Vec<Size> = photos
        .iter()
        .map(|p| {
            let (width, height) = p.image.dimensions();
            Size::new(width, height)
        })
        .collect();
    let plan = plan_layout_adaptive(&sizes, cfg)?;
    info!(
        columns = plan.column_count,
        column_width = plan.column_width,
        photos = plan.items.len(),
        "layout planned"
    );
    let rgba = render_plan(photos, &plan)?;
    Ok(CollageOutput { plan, rgba })
}
