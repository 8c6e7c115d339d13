use crate::column::Column;
use crate::config::CollageConfig;
use crate::error::{CollageError, Result};
use crate::estimator::column_width;
use crate::model::{LayoutPlan, PlacedPhoto, Position, Size};
use crate::wrapper::{SLACK_PX, WrapperArena, WrapperId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Mutable layout state: the column array plus the arena owning every
/// wrapper of the run.
///
/// Drive it with [`Canvas::add_photo`] once per input photo in arrival
/// order, then [`Canvas::align_bottom`] once, then freeze the result with
/// [`Canvas::into_plan`]. The span coin flip draws from a seeded RNG, so a
/// canvas built from the same photos and config is always identical.
pub struct Canvas {
    size: Size,
    columns: Vec<Column>,
    arena: WrapperArena,
    span_probability: f64,
    similar_height_tolerance: u32,
    rng: StdRng,
}

/// A maximal run of unlocked wrappers between locked anchors, the unit of
/// height redistribution during bottom alignment. `target` may go negative
/// when anchors are inconsistent; that is detected, not assumed away.
struct Group {
    members: Vec<WrapperId>,
    target: i64,
}

impl Canvas {
    /// Splits the canvas into `column_count` columns. All columns share
    /// `ceil(canvas_width / column_count)`; the last absorbs the remainder.
    pub fn new(column_count: usize, cfg: &CollageConfig) -> Result<Self> {
        cfg.validate()?;
        if column_count == 0 {
            return Err(CollageError::InvalidConfig(
                "cannot build a canvas with zero columns".into(),
            ));
        }
        let size = cfg.canvas_size();
        let width = column_width(size.width, column_count);
        let mut columns = Vec::with_capacity(column_count);
        for index in 0..column_count as u32 {
            let x = index * width;
            if x >= size.width {
                warn!(
                    column_count,
                    width, "column width does not fill the canvas; dropping trailing columns"
                );
                break;
            }
            let actual = width.min(size.width - x);
            columns.push(Column::new(x, actual));
        }
        debug!(columns = columns.len(), width, "canvas columns");
        Ok(Self {
            size,
            columns,
            arena: WrapperArena::new(),
            span_probability: cfg.span_probability,
            similar_height_tolerance: cfg.similar_height_tolerance,
            rng: StdRng::seed_from_u64(cfg.seed),
        })
    }

    /// Places one photo into the currently shortest column, or across two
    /// columns when a similar-height neighbor exists and the coin flip says
    /// so. Exactly one random value is drawn per call, taken or not, so the
    /// plan for a given seed does not depend on column height coincidences.
    pub fn add_photo(&mut self, photo: usize, size: Size) -> Result<()> {
        let shortest = self.shortest_column();
        let draw = self.rng.gen_range(0.0..1.0);
        match self.similar_neighbor(shortest) {
            Some(neighbor) if draw < self.span_probability => {
                self.span_join(photo, size, shortest, neighbor)
            }
            _ => self.fit_single(photo, size, shortest),
        }
    }

    fn shortest_column(&self) -> usize {
        let mut best = 0;
        let mut best_height = self.columns[0].height(&self.arena);
        for (index, column) in self.columns.iter().enumerate().skip(1) {
            let height = column.height(&self.arena);
            if height < best_height {
                best = index;
                best_height = height;
            }
        }
        best
    }

    /// First neighbor (left before right) whose height is within the
    /// similarity tolerance of `index`'s.
    fn similar_neighbor(&self, index: usize) -> Option<usize> {
        let height = self.columns[index].height(&self.arena);
        let left = index.checked_sub(1);
        let right = (index + 1 < self.columns.len()).then_some(index + 1);
        for neighbor in [left, right].into_iter().flatten() {
            let diff = self.columns[neighbor].height(&self.arena).abs_diff(height);
            if diff <= self.similar_height_tolerance {
                return Some(neighbor);
            }
        }
        None
    }

    fn fit_single(&mut self, photo: usize, size: Size, index: usize) -> Result<()> {
        let id = self.arena.insert_photo(photo, size);
        self.arena
            .resize(id, self.columns[index].width(), size.height)?;
        self.append(index, id);
        Ok(())
    }

    /// Places the photo across two adjacent columns: the real wrapper goes
    /// into the left column resized to the pair's combined width, a linked
    /// placeholder reserves the same height in the right column.
    fn span_join(&mut self, photo: usize, size: Size, a: usize, b: usize) -> Result<()> {
        let (left, right) = (a.min(b), a.max(b));
        self.align_pair(left, right)?;

        let real = self.arena.insert_photo(photo, size);
        let placeholder = self.arena.insert_placeholder(size);
        self.arena.link(real, placeholder);

        let span_width = self.columns[left].width() + self.columns[right].width();
        self.arena.resize(real, span_width, size.height)?;
        self.append(left, real);
        self.append(right, placeholder);
        debug!(photo, left, right, "span join");
        Ok(())
    }

    /// Brings two columns to equal height by cropping the taller one at its
    /// last wrapper. A zero difference is a no-op.
    fn align_pair(&mut self, a: usize, b: usize) -> Result<()> {
        let ha = self.columns[a].height(&self.arena);
        let hb = self.columns[b].height(&self.arena);
        let (taller, diff) = if ha >= hb { (a, ha - hb) } else { (b, hb - ha) };
        if diff == 0 {
            return Ok(());
        }
        debug!(diff, "aligning pair by cropping the taller column");
        match self.columns[taller].slots().last().copied() {
            Some(last) => {
                let height = self.arena.size(last).height;
                self.arena
                    .crop_to_height(last, height.saturating_sub(diff))
            }
            // heights are positive, so a taller column is never empty
            None => Ok(()),
        }
    }

    fn append(&mut self, index: usize, id: WrapperId) {
        self.arena.set_column(id, index);
        self.columns[index].push(id);
    }

    /// Forces every column to exactly the canvas height through grouped,
    /// integer-exact cropping, then locks the whole canvas.
    ///
    /// Columns are processed left to right. The real wrapper of a span pair
    /// always sits in the left column, so by the time a locked placeholder
    /// is met while grouping, its partner's column is already final and the
    /// anchor y read from it is the partner's settled position.
    pub fn align_bottom(&mut self) -> Result<()> {
        let target = self.size.height;
        for (index, column) in self.columns.iter().enumerate() {
            let height = column.height(&self.arena);
            if height < target {
                return Err(CollageError::ColumnTooShort {
                    column: index,
                    height,
                    target,
                });
            }
        }

        for index in 0..self.columns.len() {
            for group in self.collect_groups(index)? {
                self.shrink_group(index, group)?;
            }
            for id in self.columns[index].slots().to_vec() {
                self.arena.lock(id);
            }
            debug!(
                column = index,
                height = self.columns[index].height(&self.arena),
                "column aligned"
            );
        }
        Ok(())
    }

    /// Partitions a column into maximal runs of unlocked wrappers. Each
    /// locked wrapper closes the current group at its anchor y and opens the
    /// next one below itself.
    fn collect_groups(&self, index: usize) -> Result<Vec<Group>> {
        let mut groups = Vec::new();
        let mut members = Vec::new();
        let mut start: i64 = 0;
        for &id in self.columns[index].slots() {
            if !self.arena.get(id).is_locked() {
                members.push(id);
                continue;
            }
            let anchor_y = self.partner_y(index, id)? as i64;
            groups.push(Group {
                members: std::mem::take(&mut members),
                target: anchor_y - start,
            });
            start = anchor_y + self.arena.size(id).height as i64;
        }
        groups.push(Group {
            members,
            target: self.size.height as i64 - start,
        });
        Ok(groups)
    }

    /// Absolute y of a locked anchor, read from its partner's recorded
    /// column rather than the partially processed one.
    fn partner_y(&self, index: usize, id: WrapperId) -> Result<u32> {
        let partner = self
            .arena
            .get(id)
            .partner()
            .ok_or(CollageError::MissingPartner { column: index })?;
        let home = self.arena.get(partner).column();
        self.columns[home]
            .slot_y(&self.arena, partner)
            .ok_or(CollageError::MissingPartner { column: index })
    }

    /// Crops a group down to its target height: an even share per wrapper,
    /// with the division remainder taken from the tallest member so the
    /// group total lands on the target exactly.
    fn shrink_group(&mut self, index: usize, group: Group) -> Result<()> {
        let total: i64 = group
            .members
            .iter()
            .map(|&id| self.arena.size(id).height as i64)
            .sum();
        let overshoot = total - group.target;
        if overshoot < -(SLACK_PX as i64) {
            return Err(CollageError::GroupTooShort {
                column: index,
                gap: (-overshoot) as u32,
            });
        }
        if overshoot <= 0 {
            if overshoot < 0 {
                warn!(
                    column = index,
                    gap = -overshoot,
                    "locked anchors leave a small gap; living with it"
                );
            }
            return Ok(());
        }
        if group.members.is_empty() {
            // overlapping anchors; nothing here can absorb the difference
            return Err(CollageError::GroupTooShort {
                column: index,
                gap: overshoot as u32,
            });
        }

        let per_wrapper = (overshoot / group.members.len() as i64) as u32;
        let remainder = (overshoot % group.members.len() as i64) as u32;
        if per_wrapper > 0 {
            for &id in &group.members {
                let height = self.arena.size(id).height;
                self.arena
                    .crop_to_height(id, height.saturating_sub(per_wrapper))?;
            }
        }
        if remainder > 0 {
            let mut tallest = group.members[0];
            for &id in &group.members[1..] {
                if self.arena.size(id).height > self.arena.size(tallest).height {
                    tallest = id;
                }
            }
            let height = self.arena.size(tallest).height;
            self.arena
                .crop_to_height(tallest, height.saturating_sub(remainder))?;
        }
        Ok(())
    }

    /// Freezes the canvas into the exported plan: columns left to right, top
    /// to bottom within each. Placeholders advance the y accumulator but are
    /// not emitted; their photo is drawn once by its real wrapper.
    pub fn into_plan(self) -> LayoutPlan {
        let column_width = self.columns.first().map_or(0, |c| c.width());
        let mut items = Vec::new();
        for column in &self.columns {
            let mut y = 0u32;
            for &id in column.slots() {
                let wrapper = self.arena.get(id);
                if let Some(photo) = wrapper.photo() {
                    items.push(PlacedPhoto {
                        photo,
                        ops: wrapper.ops().to_vec(),
                        position: Position { x: column.x(), y },
                        size: wrapper.size(),
                    });
                }
                y += wrapper.size().height;
            }
        }
        LayoutPlan {
            canvas: self.size,
            column_count: self.columns.len(),
            column_width,
            items,
        }
    }
}
