use crate::{error::PickError, item::Item};

/// Ordered pool of items in insertion order. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    items: Vec<Item>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from multi-line text, one item per line.
    pub fn from_lines(raw: &str) -> Self {
        let mut collection = Self::new();
        collection.add_lines(raw);
        collection
    }

    /// Appends the trimmed text. Blank input is ignored and returns `false`.
    pub fn add(&mut self, raw: &str) -> bool {
        match Item::parse(raw) {
            Some(item) => {
                self.items.push(item);
                true
            }
            None => false,
        }
    }

    /// Applies [`Collection::add`] to every line and returns how many items
    /// were appended.
    pub fn add_lines(&mut self, raw: &str) -> usize {
        raw.lines().filter(|line| self.add(line)).count()
    }

    pub fn replace_lines(&mut self, raw: &str) -> usize {
        self.clear();
        self.add_lines(raw)
    }

    /// Removes the item at `index`. An invalid index is reported and the
    /// collection is left untouched.
    pub fn remove_at(&mut self, index: usize) -> Result<Item, PickError> {
        if index >= self.items.len() {
            return Err(PickError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Removes the first item equal to `value`; returns whether one was found.
    pub fn remove_value(&mut self, value: &str) -> bool {
        match self.items.iter().position(|item| item == value) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.items.iter().map(|item| item.as_str().to_string()).collect()
    }
}

#[cfg(test)]
#[path = "tests/collection_tests.rs"]
mod tests;
