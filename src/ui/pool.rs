/// Recycled cell pool
///
/// One page of `GridCell`s is built up front and rebound as the user pages
/// through the grid. Rebinding resets each cell before configuring it, so a
/// thumbnail requested for the previous page cannot land on the new one.
use iced::Size;
use std::collections::HashSet;

use super::cell::{GridCell, PendingThumbnail, ThumbnailTicket};
use crate::state::item::{DisplayItem, Picture};

#[derive(Debug, Clone)]
pub struct CellPool {
    cells: Vec<GridCell>,
    /// Index into the host's item list each cell is bound to
    bound: Vec<Option<usize>>,
    page: usize,
}

impl CellPool {
    /// A pool of `page_size` cells of `cell_size` (at least one cell)
    pub fn new(page_size: usize, cell_size: Size) -> Self {
        let page_size = page_size.max(1);
        Self {
            cells: (0..page_size).map(|_| GridCell::new(cell_size)).collect(),
            bound: vec![None; page_size],
            page: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.cells.len()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.page_size())
    }

    /// Move to the first page
    pub fn rewind(&mut self) {
        self.page = 0;
    }

    /// Pull the page back inside the grid after the item list shrank
    pub fn clamp_page(&mut self, item_count: usize) {
        let last_page = self.page_count(item_count).saturating_sub(1);
        self.page = self.page.min(last_page);
    }

    /// Advance one page; returns false on the last page
    pub fn next_page(&mut self, item_count: usize) -> bool {
        if self.page + 1 < self.page_count(item_count) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page; returns false on the first page
    pub fn previous_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Reset every cell and bind it to the current page of `items`
    ///
    /// Returns the thumbnail requests to run, keyed by slot.
    pub fn bind_page(
        &mut self,
        items: &[DisplayItem],
        selected: &HashSet<String>,
        target_size: iced::Size<u32>,
    ) -> Vec<(usize, PendingThumbnail)> {
        let first = self.page * self.cells.len();
        let mut pending = Vec::new();

        for (slot, (cell, bound)) in self.cells.iter_mut().zip(self.bound.iter_mut()).enumerate() {
            cell.reset();

            let index = first + slot;
            let Some(item) = items.get(index) else {
                *bound = None;
                cell.set_selected(false);
                continue;
            };

            *bound = Some(index);
            cell.set_selected(item.selection_key().is_some_and(|key| selected.contains(&key)));

            if let Some(request) = cell.configure(item, target_size) {
                pending.push((slot, request));
            }
        }

        tracing::debug!(
            "Bound page {} ({} thumbnail requests)",
            self.page + 1,
            pending.len()
        );
        pending
    }

    /// Route a thumbnail delivery to its slot; stale tickets are dropped
    pub fn deliver(&mut self, slot: usize, ticket: &ThumbnailTicket, picture: Option<Picture>) -> bool {
        match self.cells.get_mut(slot) {
            Some(cell) => cell.deliver_thumbnail(ticket, picture),
            None => false,
        }
    }

    /// Index of the item shown in `slot`, if any
    pub fn item_index(&self, slot: usize) -> Option<usize> {
        self.bound.get(slot).copied().flatten()
    }

    pub fn cell(&self, slot: usize) -> Option<&GridCell> {
        self.cells.get(slot)
    }

    pub fn cell_mut(&mut self, slot: usize) -> Option<&mut GridCell> {
        self.cells.get_mut(slot)
    }

    /// Cells bound to an item, with their slots
    pub fn bound_cells(&self) -> impl Iterator<Item = (usize, &GridCell)> {
        self.cells
            .iter()
            .zip(&self.bound)
            .enumerate()
            .filter(|(_, (_, bound))| bound.is_some())
            .map(|(slot, (cell, _))| (slot, cell))
    }
}
