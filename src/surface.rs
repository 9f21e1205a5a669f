use crate::wheel::PanelStyle;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ContainerId(String);

crate::impl_string_newtype!(ContainerId);

impl Default for ContainerId {
    fn default() -> Self {
        Self::new("wheelCanvas")
    }
}

/// Whatever draws the panels. The wheel only ever talks to it through this trait.
pub trait PresentationSurface {
    type Panel: Clone;
    type Container;

    fn query_container(&mut self, id: &ContainerId) -> Option<Self::Container>;
    fn create_panel(&mut self, text: &str) -> Self::Panel;
    fn apply_style(&mut self, panel: &Self::Panel, style: &PanelStyle);
    fn append(&mut self, container: &Self::Container, panel: &Self::Panel);
    fn measure_width(&self, panel: &Self::Panel) -> f64;
    /// Removes every panel from the container.
    fn clear(&mut self, container: &Self::Container);
}

/// Approximate glyph width used by surfaces that cannot measure text.
pub const CHAR_WIDTH: f64 = 8.0;

/// A headless surface that writes every style change to the log.
#[derive(Debug, Default)]
pub struct LogSurface {
    texts: Vec<String>,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, panel: usize) -> Option<&str> {
        self.texts.get(panel).map(String::as_str)
    }
}

impl PresentationSurface for LogSurface {
    type Panel = usize;
    type Container = ContainerId;

    fn query_container(&mut self, id: &ContainerId) -> Option<ContainerId> {
        Some(id.clone())
    }

    fn create_panel(&mut self, text: &str) -> usize {
        self.texts.push(text.to_string());
        self.texts.len() - 1
    }

    fn apply_style(&mut self, panel: &usize, style: &PanelStyle) {
        log::trace!(
            "[{}] {}",
            self.text(*panel).unwrap_or_default(),
            style.css()
        );
    }

    fn append(&mut self, container: &ContainerId, panel: &usize) {
        log::debug!(
            "Appended '{}' to '{}'",
            self.text(*panel).unwrap_or_default(),
            container
        );
    }

    fn measure_width(&self, panel: &usize) -> f64 {
        self.text(*panel)
            .map(|t| t.chars().count() as f64 * CHAR_WIDTH)
            .unwrap_or_default()
    }

    fn clear(&mut self, container: &ContainerId) {
        log::debug!("Cleared '{}'", container);
        self.texts.clear();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;

    /// Keeps every call so tests can inspect what the wheel asked for.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        containers: Vec<ContainerId>,
        texts: Vec<String>,
        styles: HashMap<usize, PanelStyle>,
        appended: Vec<(ContainerId, usize)>,
        clears: usize,
    }

    impl RecordingSurface {
        pub fn with_container(id: &str) -> Self {
            Self {
                containers: vec![ContainerId::new(id)],
                ..Default::default()
            }
        }

        pub fn width_for(text: &str) -> f64 {
            text.len() as f64 * 10.0
        }

        pub fn texts(&self) -> Vec<&str> {
            self.texts.iter().map(String::as_str).collect()
        }

        pub fn style_of(&self, panel: usize) -> Option<PanelStyle> {
            self.styles.get(&panel).copied()
        }

        pub fn appended(&self) -> &[(ContainerId, usize)] {
            &self.appended
        }

        pub fn clears(&self) -> usize {
            self.clears
        }
    }

    impl PresentationSurface for RecordingSurface {
        type Panel = usize;
        type Container = ContainerId;

        fn query_container(&mut self, id: &ContainerId) -> Option<ContainerId> {
            self.containers.iter().find(|c| *c == id).cloned()
        }

        fn create_panel(&mut self, text: &str) -> usize {
            self.texts.push(text.to_string());
            self.texts.len() - 1
        }

        fn apply_style(&mut self, panel: &usize, style: &PanelStyle) {
            self.styles.insert(*panel, *style);
        }

        fn append(&mut self, container: &ContainerId, panel: &usize) {
            self.appended.push((container.clone(), *panel));
        }

        fn measure_width(&self, panel: &usize) -> f64 {
            self.texts
                .get(*panel)
                .map(|t| Self::width_for(t))
                .unwrap_or_default()
        }

        fn clear(&mut self, container: &ContainerId) {
            self.clears += 1;
            self.appended.retain(|(c, _)| c != container);
        }
    }
}
