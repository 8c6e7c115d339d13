use crate::error::{CollageError, Result};
use crate::model::{Operation, Size};
use tracing::{debug, warn};

/// Crops and gaps within this many pixels are absorbed as no-ops instead of
/// failing the layout; integer rounding drifts by a few pixels at most.
pub const SLACK_PX: u32 = 5;

/// Stable handle to a wrapper in a [`WrapperArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WrapperId(usize);

/// A placed photo slot, or a placeholder reserving vertical space on behalf
/// of a photo drawn in the neighboring column.
///
/// A wrapper owns its pending operation list; `size()` is the cheap fold of
/// the original size through that list, kept cached because every mutation
/// is validated through [`Operation::simulate`] before it is committed.
#[derive(Debug, Clone)]
pub struct Wrapper {
    photo: Option<usize>,
    original: Size,
    size: Size,
    ops: Vec<Operation>,
    partner: Option<WrapperId>,
    locked: bool,
    column: usize,
}

impl Wrapper {
    /// Index of the bound photo; `None` for placeholders.
    pub fn photo(&self) -> Option<usize> {
        self.photo
    }
    pub fn is_placeholder(&self) -> bool {
        self.photo.is_none()
    }
    /// Current simulated size.
    pub fn size(&self) -> Size {
        self.size
    }
    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }
    pub fn is_locked(&self) -> bool {
        self.locked
    }
    pub fn partner(&self) -> Option<WrapperId> {
        self.partner
    }
    /// Column this wrapper was appended to.
    pub fn column(&self) -> usize {
        self.column
    }
    /// Folds the original size through the pending operations. Always equals
    /// `size()`; exists so tests can check the cache against the definition.
    pub fn replay(&self) -> Result<Size> {
        self.ops
            .iter()
            .try_fold(self.original, |size, op| op.simulate(size))
    }
}

/// Arena owning every wrapper of a layout run.
///
/// Links are symmetric peer references by id, never ownership: a resize,
/// crop, or lock on one side of a pair is mirrored onto the other in the
/// same call, so linked wrappers report identical heights at every
/// observation point.
#[derive(Debug, Default)]
pub struct WrapperArena {
    slots: Vec<Wrapper>,
}

impl WrapperArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_photo(&mut self, photo: usize, size: Size) -> WrapperId {
        self.insert(Some(photo), size)
    }

    pub fn insert_placeholder(&mut self, size: Size) -> WrapperId {
        self.insert(None, size)
    }

    fn insert(&mut self, photo: Option<usize>, size: Size) -> WrapperId {
        self.slots.push(Wrapper {
            photo,
            original: size,
            size,
            ops: Vec::new(),
            partner: None,
            locked: false,
            column: 0,
        });
        WrapperId(self.slots.len() - 1)
    }

    pub fn get(&self, id: WrapperId) -> &Wrapper {
        &self.slots[id.0]
    }

    pub fn size(&self, id: WrapperId) -> Size {
        self.slots[id.0].size
    }

    /// Establishes the symmetric link between a span pair.
    pub fn link(&mut self, a: WrapperId, b: WrapperId) {
        debug_assert_eq!(self.slots[a.0].size, self.slots[b.0].size);
        self.slots[a.0].partner = Some(b);
        self.slots[b.0].partner = Some(a);
    }

    pub fn set_column(&mut self, id: WrapperId, column: usize) {
        self.slots[id.0].column = column;
    }

    /// Registers a resize on the wrapper and mirrors it onto its partner.
    /// Ignored on locked wrappers.
    pub fn resize(&mut self, id: WrapperId, max_width: u32, max_height: u32) -> Result<()> {
        if self.slots[id.0].locked {
            debug!("resize skipped, wrapper is locked");
            return Ok(());
        }
        let op = Operation::Resize {
            max_width,
            max_height,
        };
        let next = op.simulate(self.slots[id.0].size)?;
        self.commit(id, op, next);
        if let Some(partner) = self.slots[id.0].partner {
            self.commit(partner, op, next);
        }
        Ok(())
    }

    /// Registers a crop bringing the wrapper down to `target_height`, and
    /// mirrors it onto its partner. A target above the current height within
    /// [`SLACK_PX`] is a warn-logged no-op; beyond it, or when less than one
    /// pixel row would remain, the crop is infeasible. Ignored on locked
    /// wrappers.
    pub fn crop_to_height(&mut self, id: WrapperId, target_height: u32) -> Result<()> {
        if self.slots[id.0].locked {
            debug!("crop skipped, wrapper is locked");
            return Ok(());
        }
        let current = self.slots[id.0].size;
        if target_height == current.height {
            return Ok(());
        }
        if target_height > current.height {
            let gap = target_height - current.height;
            if gap > SLACK_PX {
                return Err(CollageError::CropExhausted {
                    height: current.height,
                    target: target_height,
                });
            }
            warn!(gap, "no crop for unfortunate gap");
            return Ok(());
        }
        if target_height == 0 {
            return Err(CollageError::CropExhausted {
                height: current.height,
                target: target_height,
            });
        }
        let op = Operation::Crop {
            rows: current.height - target_height,
        };
        let next = op.simulate(current)?;
        self.commit(id, op, next);
        if let Some(partner) = self.slots[id.0].partner {
            self.commit(partner, op, next);
        }
        Ok(())
    }

    /// Locks the wrapper and its partner against further mutation.
    pub fn lock(&mut self, id: WrapperId) {
        self.slots[id.0].locked = true;
        if let Some(partner) = self.slots[id.0].partner {
            self.slots[partner.0].locked = true;
        }
    }

    fn commit(&mut self, id: WrapperId, op: Operation, next: Size) {
        let w = &mut self.slots[id.0];
        debug_assert!(!w.locked);
        w.ops.push(op);
        w.size = next;
    }
}
