use super::DEFAULT_LABEL_FIELD;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Named string fields on an item, used by [`Label::field`] and field-based filters.
pub trait Fields {
    fn field(&self, name: &str) -> Option<&str>;
}

impl Fields for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Fields for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

pub type Filter<T> = Box<dyn Fn(&T) -> bool>;

/// Extracts the text shown on an item's panel.
pub struct Label<T> {
    source: String,
    extract: Box<dyn Fn(&T) -> String>,
}

impl<T> Label<T> {
    pub fn with(extract: impl Fn(&T) -> String + 'static) -> Self {
        Self {
            source: "<fn>".to_string(),
            extract: Box::new(extract),
        }
    }

    pub fn text(&self, item: &T) -> String {
        (self.extract)(item)
    }
}

impl<T: Fields + 'static> Label<T> {
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        let source = name.clone();
        Self {
            source,
            extract: Box::new(move |item: &T| match item.field(&name) {
                Some(text) => text.to_string(),
                None => {
                    log::warn!("Item has no '{}' field to display", name);
                    String::new()
                }
            }),
        }
    }
}

impl<T: Fields + 'static> Default for Label<T> {
    fn default() -> Self {
        Self::field(DEFAULT_LABEL_FIELD)
    }
}

impl<T> fmt::Debug for Label<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Label").field(&self.source).finish()
    }
}

/// Raw items plus the ordered filters that decide which of them are shown.
///
/// The displayable set is recomputed eagerly on every mutation, so
/// [`displayable`](Self::displayable) is never stale.
pub struct FilterPipeline<T> {
    items: Vec<T>,
    filters: Vec<Filter<T>>,
    displayable: Vec<usize>,
}

impl<T> FilterPipeline<T> {
    pub fn new(items: Vec<T>, filters: Vec<Filter<T>>) -> Self {
        let mut pipeline = Self {
            items,
            filters,
            displayable: Vec::new(),
        };
        pipeline.recompute();
        pipeline
    }

    /// Replaces the items and hands back the previous ones.
    pub fn set_items(&mut self, items: Vec<T>) -> Vec<T> {
        let previous = std::mem::replace(&mut self.items, items);
        self.recompute();
        previous
    }

    /// Replaces the filters and hands back the previous ones.
    pub fn set_filters(&mut self, filters: Vec<Filter<T>>) -> Vec<Filter<T>> {
        let previous = std::mem::replace(&mut self.filters, filters);
        self.recompute();
        previous
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Indices into [`items`](Self::items), in their original order.
    pub fn displayable(&self) -> &[usize] {
        &self.displayable
    }

    pub fn displayable_items(&self) -> impl Iterator<Item = &T> {
        self.displayable.iter().map(|&i| &self.items[i])
    }

    pub fn len(&self) -> usize {
        self.displayable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displayable.is_empty()
    }

    fn accepts(&self, item: &T) -> bool {
        // every filter runs, in order, even after one has rejected the item
        self.filters
            .iter()
            .fold(true, |matched, filter| filter(item) && matched)
    }

    fn recompute(&mut self) {
        self.displayable = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.accepts(item))
            .map(|(i, _)| i)
            .collect();
        log::debug!(
            "{} of {} items displayable",
            self.displayable.len(),
            self.items.len()
        );
    }
}
