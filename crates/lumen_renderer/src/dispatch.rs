//! Row dispatcher.
//!
//! Hands image rows to concurrently running workers, one row per claim, in
//! increasing index order. Each claim returns the row index together with an
//! exclusive borrow of that row's pixels, so the claim itself is what makes
//! the unsynchronized pixel writes sound.

use std::slice::ChunksMut;
use std::sync::{Mutex, PoisonError};

/// Outcome of [`RowDispatcher::claim`].
#[derive(Debug, PartialEq)]
pub enum RowClaim<'a, T> {
    /// The next unclaimed row and its pixels.
    Row { index: u32, pixels: &'a mut [T] },
    /// Every row has been handed out.
    Exhausted,
}

struct Cursor<'a, T> {
    next: u32,
    rows: ChunksMut<'a, T>,
}

/// Shared row counter for one render pass.
///
/// Built from a borrow of the image's pixels, so it cannot outlive the pass
/// or be reused for another one.
pub struct RowDispatcher<'a, T> {
    cursor: Mutex<Cursor<'a, T>>,
    total_rows: u32,
}

impl<'a, T> RowDispatcher<'a, T> {
    /// Split `pixels` into rows of `width` elements.
    ///
    /// A trailing partial row is still handed out. A zero width yields no rows.
    pub fn new(pixels: &'a mut [T], width: usize) -> Self {
        let (rows, total_rows) = if width == 0 {
            (pixels[..0].chunks_mut(1), 0)
        } else {
            let total = pixels.len().div_ceil(width);
            (pixels.chunks_mut(width), total as u32)
        };

        Self {
            cursor: Mutex::new(Cursor { next: 0, rows }),
            total_rows,
        }
    }

    /// Claim the next row.
    ///
    /// Each index in `0..total_rows()` is returned exactly once across all
    /// callers; after that every call returns [`RowClaim::Exhausted`].
    pub fn claim(&self) -> RowClaim<'a, T> {
        // A worker that panicked mid-row cannot corrupt the cursor.
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);

        match cursor.rows.next() {
            Some(pixels) => {
                let index = cursor.next;
                cursor.next += 1;
                RowClaim::Row { index, pixels }
            }
            None => RowClaim::Exhausted,
        }
    }

    /// Number of rows this dispatcher hands out in total.
    pub fn total_rows(&self) -> u32 {
        self.total_rows
    }

    /// Number of rows claimed so far.
    pub fn claimed(&self) -> u32 {
        self.cursor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next
    }
}
