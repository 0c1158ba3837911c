//! Chapter ordering rules.
//!
//! # Responsibility
//! - Keep chapter `order` values dense after append, delete and move.
//! - Implement the swap-adjacent, re-densify move used by up/down controls.
//!
//! # Invariants
//! - All functions are pure: inputs are never mutated, new values returned.
//! - Outputs of `densify`, `swap_adjacent` and `remove_and_densify` are sorted
//!   by `order` and carry exactly `0..N-1`.
//! - Ties in `order` keep their relative slice position (stable sort).

use crate::model::chapter::{Chapter, ChapterId};

/// Direction for a one-slot chapter move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards order 0.
    Up,
    /// Towards the last order.
    Down,
}

impl From<bool> for MoveDirection {
    /// `true` maps to `Up`, matching the `move_up` flag used by hosts.
    fn from(move_up: bool) -> Self {
        if move_up {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// Order value assigned to a chapter appended to `chapters`.
pub fn next_order(chapters: &[Chapter]) -> u32 {
    order_at(chapters.len())
}

/// Returns chapters sorted by `order`.
pub fn sorted_by_order(chapters: &[Chapter]) -> Vec<Chapter> {
    let mut sorted = chapters.to_vec();
    sorted.sort_by_key(|chapter| chapter.order);
    sorted
}

/// Returns whether sorted `order` values are exactly `0..N-1`.
pub fn is_dense(chapters: &[Chapter]) -> bool {
    let mut orders: Vec<u32> = chapters.iter().map(|chapter| chapter.order).collect();
    orders.sort_unstable();
    orders
        .iter()
        .enumerate()
        .all(|(index, order)| *order == order_at(index))
}

/// Sorts by `order` and reassigns `0..N-1` following sorted position.
pub fn densify(chapters: &[Chapter]) -> Vec<Chapter> {
    renumber(sorted_by_order(chapters))
}

/// Removes `chapter_id` and closes the gap it leaves.
pub fn remove_and_densify(chapters: &[Chapter], chapter_id: &ChapterId) -> Vec<Chapter> {
    let remaining: Vec<Chapter> = chapters
        .iter()
        .filter(|chapter| &chapter.id != chapter_id)
        .cloned()
        .collect();
    densify(&remaining)
}

/// Returns whether `chapter_id` has a neighbour in `direction`.
pub fn can_move(chapters: &[Chapter], chapter_id: &ChapterId, direction: MoveDirection) -> bool {
    let sorted = sorted_by_order(chapters);
    position_of(&sorted, chapter_id)
        .and_then(|index| neighbour_index(index, sorted.len(), direction))
        .is_some()
}

/// Swaps `chapter_id` with its neighbour in display order, then re-densifies.
///
/// Returns `None` when the chapter is unknown or already at the edge in
/// `direction`; callers treat that as a no-op.
pub fn swap_adjacent(
    chapters: &[Chapter],
    chapter_id: &ChapterId,
    direction: MoveDirection,
) -> Option<Vec<Chapter>> {
    let mut sorted = sorted_by_order(chapters);
    let index = position_of(&sorted, chapter_id)?;
    let target = neighbour_index(index, sorted.len(), direction)?;
    sorted.swap(index, target);
    Some(renumber(sorted))
}

fn renumber(sorted: Vec<Chapter>) -> Vec<Chapter> {
    sorted
        .into_iter()
        .enumerate()
        .map(|(index, chapter)| {
            let order = order_at(index);
            if chapter.order == order {
                chapter
            } else {
                chapter.with_order(order)
            }
        })
        .collect()
}

fn position_of(sorted: &[Chapter], chapter_id: &ChapterId) -> Option<usize> {
    sorted.iter().position(|chapter| &chapter.id == chapter_id)
}

fn neighbour_index(index: usize, len: usize, direction: MoveDirection) -> Option<usize> {
    match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|target| *target < len),
    }
}

fn order_at(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
