//! Snapshot-based undo/redo over the committed raster.
//!
//! The history owns the primary surface outright: every committed
//! drawing action encodes the full raster as a PNG snapshot, and
//! undo/redo repaint the surface from those snapshots. Nothing else
//! mutates the committed raster directly.

use crate::viewport::Viewport;
use kurbo::{Size, Vec2};
use slateboard_raster::{RasterResult, RgbaImage, Surface, codec};

/// Maximum number of undo snapshots to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// An immutable encoded raster image, one undo/redo unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Vec<u8>);

impl Snapshot {
    /// The encoded PNG bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Undo/redo stacks plus the committed raster they describe.
///
/// Invariants: the undo side always holds at least one element (the
/// initial blank state is element 0); the redo side is cleared by any
/// new committed action; popping below one undo element is a no-op.
#[derive(Debug)]
pub struct RasterHistory {
    surface: Surface,
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl RasterHistory {
    /// Take ownership of the committed surface and record its current
    /// contents as snapshot element 0.
    pub fn new(surface: Surface) -> RasterResult<Self> {
        let initial = Snapshot(surface.encode()?);
        Ok(Self {
            surface,
            undo: vec![initial],
            redo: Vec::new(),
        })
    }

    /// The committed raster.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Mutable access for the drawing pipeline's incremental paints.
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Whether undo would change anything.
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    /// Whether redo would change anything.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Record the current raster as a new snapshot. Called after every
    /// completed stroke, shape commit, text commit and clear -- never
    /// mid-drag. Clears the redo side.
    pub fn snapshot(&mut self) -> RasterResult<()> {
        let snap = Snapshot(self.surface.encode()?);
        self.undo.push(snap);
        self.redo.clear();
        if self.undo.len() > MAX_UNDO_HISTORY {
            self.undo.remove(0);
        }
        Ok(())
    }

    /// Step back one snapshot. No-op (`Ok(false)`) at the initial
    /// state. Decode happens before any stack mutation so a corrupt
    /// snapshot leaves both the raster and the stacks untouched.
    ///
    /// Snapshots are device-buffer encodings, so the restore is a 1:1
    /// blit. Pushing them through the current scale/offset would
    /// re-magnify content whose zoom is already baked in.
    pub fn undo(&mut self, viewport: &Viewport) -> RasterResult<bool> {
        if self.undo.len() <= 1 {
            return Ok(false);
        }
        let decoded = codec::decode_png(self.undo[self.undo.len() - 2].bytes())?;
        let current = Snapshot(self.surface.encode()?);

        self.undo.pop();
        self.redo.push(current);
        self.restore(decoded, viewport);
        Ok(true)
    }

    /// Step forward one snapshot. No-op (`Ok(false)`) when the redo
    /// side is empty. Same fail-closed decode ordering and 1:1 blit
    /// as undo.
    pub fn redo(&mut self, viewport: &Viewport) -> RasterResult<bool> {
        let Some(target) = self.redo.last() else {
            return Ok(false);
        };
        let decoded = codec::decode_png(target.bytes())?;
        let current = Snapshot(self.surface.encode()?);

        self.redo.pop();
        self.undo.push(current);
        self.restore(decoded, viewport);
        Ok(true)
    }

    /// Erase the raster to blank and record the blank state. When the
    /// top snapshot is already byte-identical to the blank encoding the
    /// push is suppressed and the stacks are left untouched, so
    /// repeated clears do not pile up no-op history entries.
    pub fn clear(&mut self, viewport: &Viewport) -> RasterResult<()> {
        self.surface.clear_device();
        self.surface.set_transform(viewport.scale, viewport.offset);

        let blank = Snapshot(self.surface.encode()?);
        if self.undo.last() == Some(&blank) {
            return Ok(());
        }
        self.undo.push(blank);
        self.redo.clear();
        if self.undo.len() > MAX_UNDO_HISTORY {
            self.undo.remove(0);
        }
        Ok(())
    }

    /// Repaint the raster from the most recent snapshot, reapplying the
    /// viewport transform. Used after resize and throttled zoom/pan
    /// redraws.
    pub fn repaint_from_top(&mut self, viewport: &Viewport) -> RasterResult<()> {
        let Some(top) = self.undo.last() else {
            return Ok(());
        };
        let decoded = codec::decode_png(top.bytes())?;
        self.repaint(decoded, viewport);
        Ok(())
    }

    /// Replace the raster with externally loaded image bytes (board
    /// load), then record the result as a new snapshot.
    pub fn replace_with(&mut self, bytes: &[u8], viewport: &Viewport) -> RasterResult<()> {
        let decoded = codec::decode_png(bytes)?;
        self.repaint(decoded, viewport);
        self.snapshot()
    }

    /// Reallocate the device buffer and repaint the committed content.
    /// The resized display buffer starts blank; content comes back from
    /// the last snapshot, not from the old buffer.
    pub fn resize(&mut self, display: Size, viewport: &Viewport) -> RasterResult<()> {
        self.surface.resize(display, viewport.dpr);
        self.repaint_from_top(viewport)
    }

    // Undo/redo restore: identity blit of the device-level snapshot,
    // then the live transform comes back for subsequent drawing.
    fn restore(&mut self, decoded: RgbaImage, viewport: &Viewport) {
        self.surface.clear_device();
        self.surface.set_transform(1.0, Vec2::ZERO);
        self.surface.draw_image(&decoded);
        self.surface.set_transform(viewport.scale, viewport.offset);
    }

    // Zoom/pan/resize/load repaint: the snapshot is stretched over the
    // display rect through the current scale/offset.
    fn repaint(&mut self, decoded: RgbaImage, viewport: &Viewport) {
        self.surface.clear_device();
        self.surface.set_transform(viewport.scale, viewport.offset);
        self.surface.draw_image(&decoded);
    }
}
