use std::time::Duration;

use shared::domain::Mode;

use crate::{collection::Collection, error::PickError, item::Item, random::RandomSource};

/// Pause between asking for a draw and revealing it.
pub const DEFAULT_DRAW_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawn {
    pub index: usize,
    pub item: Item,
}

pub fn ensure_drawable(collection: &Collection, mode: Mode) -> Result<(), PickError> {
    let required = mode.minimum_items();
    if collection.size() < required {
        return Err(PickError::InsufficientItems {
            mode,
            required,
            available: collection.size(),
        });
    }
    Ok(())
}

/// Picks one item uniformly at random. The collection is never mutated.
pub fn draw<S>(collection: &Collection, mode: Mode, source: &mut S) -> Result<Drawn, PickError>
where
    S: RandomSource + ?Sized,
{
    ensure_drawable(collection, mode)?;
    let index = source.index_below(collection.size());
    let item = collection
        .get(index)
        .cloned()
        .ok_or(PickError::IndexOutOfRange {
            index,
            len: collection.size(),
        })?;
    Ok(Drawn { index, item })
}

#[cfg(test)]
#[path = "tests/draw_tests.rs"]
mod tests;
