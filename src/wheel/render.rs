use super::color::to_hex;
use super::error::RenderError;
use super::geometry::angle_of;
use super::projector::{Projection, Projector};
use crate::surface::{ContainerId, PresentationSurface};
use palette::Srgb;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStyle {
    pub top: f64,
    pub left: f64,
    pub z_index: i32,
    pub background: Option<Srgb<u8>>,
}

impl PanelStyle {
    pub fn css(&self) -> String {
        let mut css = format!(
            "position:absolute;top:{}px;left:{}px;z-index:{};",
            self.top, self.left, self.z_index
        );
        if let Some(color) = self.background {
            let _ = write!(css, "background-color:{};", to_hex(color));
        }
        css
    }
}

impl From<Projection> for PanelStyle {
    fn from(p: Projection) -> Self {
        Self {
            top: p.y,
            left: p.x,
            z_index: p.stack_depth,
            background: Some(p.color),
        }
    }
}

/// One style per slot, in displayable order, for the given rotation.
pub fn panel_styles(rotation: u16, offsets: &[f64], projector: &mut Projector) -> Vec<PanelStyle> {
    offsets
        .iter()
        .map(|&offset| projector.style(i64::from(angle_of(rotation, offset))).into())
        .collect()
}

/// The indicator sits at the angle-0 slot, pushed left by its own width and
/// stacked above every panel.
pub fn indicator_style(front: Projection, width: f64) -> PanelStyle {
    PanelStyle {
        top: front.y,
        left: front.x - width,
        z_index: front.stack_depth + 1,
        background: None,
    }
}

struct Mounted<S: PresentationSurface> {
    container: S::Container,
    panels: Vec<S::Panel>,
    indicator: S::Panel,
}

/// Owns the surface and the handles created on it.
pub struct RenderDriver<S: PresentationSurface> {
    surface: S,
    container_id: ContainerId,
    indicator_text: String,
    mounted: Option<Mounted<S>>,
}

impl<S: PresentationSurface> RenderDriver<S> {
    pub fn new(surface: S, container_id: ContainerId, indicator_text: impl Into<String>) -> Self {
        Self {
            surface,
            container_id,
            indicator_text: indicator_text.into(),
            mounted: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Creates a panel per label, styles and appends it, then places the indicator.
    /// Anything mounted before is cleared first.
    pub fn mount(
        &mut self,
        labels: &[String],
        styles: &[PanelStyle],
        front: Projection,
    ) -> Result<(), RenderError> {
        self.unmount();

        let container = self
            .surface
            .query_container(&self.container_id)
            .ok_or_else(|| RenderError::ContainerNotFound(self.container_id.clone()))?;

        let panels: Vec<S::Panel> = labels
            .iter()
            .zip(styles)
            .map(|(label, style)| {
                let panel = self.surface.create_panel(label);
                self.surface.apply_style(&panel, style);
                self.surface.append(&container, &panel);
                panel
            })
            .collect();

        let indicator = self.surface.create_panel(&self.indicator_text);
        self.surface.append(&container, &indicator);
        let width = self.surface.measure_width(&indicator);
        self.surface
            .apply_style(&indicator, &indicator_style(front, width));

        log::debug!(
            "Mounted {} panels in '{}'",
            panels.len(),
            self.container_id
        );

        self.mounted = Some(Mounted {
            container,
            panels,
            indicator,
        });
        Ok(())
    }

    pub fn repaint(&mut self, styles: &[PanelStyle]) -> Result<(), RenderError> {
        let mounted = self.mounted.as_ref().ok_or(RenderError::NotMounted)?;
        for (panel, style) in mounted.panels.iter().zip(styles) {
            self.surface.apply_style(panel, style);
        }
        Ok(())
    }

    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            self.surface.clear(&mounted.container);
        }
    }

    pub fn indicator(&self) -> Option<&S::Panel> {
        self.mounted.as_ref().map(|m| &m.indicator)
    }

    pub fn panels(&self) -> &[S::Panel] {
        self.mounted
            .as_ref()
            .map(|m| m.panels.as_slice())
            .unwrap_or_default()
    }
}
