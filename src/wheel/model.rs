use super::color::Palette;
use super::error::{ConfigurationError, WheelError};
use super::filter::{Fields, Filter, FilterPipeline, Label};
use super::geometry::{DiscLayout, GeometryOptions, WheelGeometry, angle_offsets};
use super::picker::{indicated_index, pick_index, rotation_for};
use super::projector::Projector;
use super::render::{RenderDriver, panel_styles};
use super::spin::{SpinPhase, SpinPlan, SpinState, SpinTimings, SpinToken, Tick};
use super::{DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, DEFAULT_INDICATOR};
use crate::surface::{ContainerId, PresentationSurface};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct WheelConfig<T> {
    pub items: Vec<T>,
    pub filters: Vec<Filter<T>>,
    pub label: Label<T>,
    pub geometry: GeometryOptions,
    pub foreground: String,
    pub background: String,
    pub timings: SpinTimings,
    pub container: ContainerId,
    pub indicator: String,
}

impl<T: Fields + 'static> WheelConfig<T> {
    /// Labels come from each item's `value` field.
    pub fn new(items: Vec<T>) -> Self {
        Self::with_label(items, Label::default())
    }
}

impl<T> WheelConfig<T> {
    pub fn with_label(items: Vec<T>, label: Label<T>) -> Self {
        Self {
            items,
            filters: Vec::new(),
            label,
            geometry: GeometryOptions::default(),
            foreground: DEFAULT_FOREGROUND.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            timings: SpinTimings::default(),
            container: ContainerId::default(),
            indicator: DEFAULT_INDICATOR.to_string(),
        }
    }

    pub fn filters(mut self, filters: Vec<Filter<T>>) -> Self {
        self.filters = filters;
        self
    }

    pub fn geometry(mut self, geometry: GeometryOptions) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn colors(mut self, foreground: impl Into<String>, background: impl Into<String>) -> Self {
        self.foreground = foreground.into();
        self.background = background.into();
        self
    }

    pub fn timings(mut self, timings: SpinTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn container(mut self, container: ContainerId) -> Self {
        self.container = container;
        self
    }
}

/// One wheel: its items, disc, style cache, spin and surface. Wheels share nothing.
pub struct Wheel<T, S: PresentationSurface, R = StdRng> {
    pipeline: FilterPipeline<T>,
    label: Label<T>,
    options: GeometryOptions,
    geometry: WheelGeometry,
    offsets: Vec<f64>,
    projector: Projector,
    timings: SpinTimings,
    spin: SpinState,
    selected: usize,
    driver: RenderDriver<S>,
    rng: R,
}

impl<T, S: PresentationSurface> Wheel<T, S, StdRng> {
    pub fn new(config: WheelConfig<T>, surface: S) -> Result<Self, WheelError> {
        Self::with_rng(config, surface, StdRng::from_os_rng())
    }
}

impl<T, S: PresentationSurface, R: Rng> Wheel<T, S, R> {
    /// Validates the whole configuration before building anything, picks the
    /// starting item and turns the disc so it sits under the indicator.
    pub fn with_rng(config: WheelConfig<T>, surface: S, mut rng: R) -> Result<Self, WheelError> {
        if config.items.is_empty() {
            return Err(ConfigurationError::NoItems.into());
        }

        let palette = Palette::parse(&config.foreground, &config.background)?;

        let total = config.items.len();
        let pipeline = FilterPipeline::new(config.items, config.filters);
        let n = pipeline.len();
        if n == 0 {
            return Err(WheelError::EmptyDisplayableSet { total });
        }

        let layout = DiscLayout::resolve(&config.geometry, n)?;
        config.timings.validate()?;

        let selected = pick_index(n, &mut rng).unwrap_or_default();
        let mut geometry = WheelGeometry::new(layout);
        geometry.set_rotation(rotation_for(selected, n));

        log::debug!(
            "Wheel ready: {} of {} items, radius {}, starting on {}",
            n,
            total,
            layout.radius,
            selected
        );

        Ok(Self {
            pipeline,
            label: config.label,
            options: config.geometry,
            geometry,
            offsets: angle_offsets(n),
            projector: Projector::new(layout, palette),
            timings: config.timings,
            spin: SpinState::default(),
            selected,
            driver: RenderDriver::new(surface, config.container, config.indicator),
            rng,
        })
    }

    pub fn items(&self) -> &[T] {
        self.pipeline.items()
    }

    pub fn displayable_count(&self) -> usize {
        self.pipeline.len()
    }

    /// The item at a displayable position.
    pub fn item(&self, position: usize) -> Option<&T> {
        self.pipeline
            .displayable()
            .get(position)
            .and_then(|&i| self.pipeline.items().get(i))
    }

    pub fn label_of(&self, position: usize) -> Option<String> {
        self.item(position).map(|item| self.label.text(item))
    }

    pub fn labels(&self) -> Vec<String> {
        self.pipeline
            .displayable_items()
            .map(|item| self.label.text(item))
            .collect()
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn timings(&self) -> &SpinTimings {
        &self.timings
    }

    pub fn phase(&self) -> SpinPhase {
        self.spin.phase()
    }

    pub fn spin_state(&self) -> &SpinState {
        &self.spin
    }

    /// Displayable position of the current pick.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.item(self.selected)
    }

    /// The item the last spin landed on, once it has settled.
    pub fn settled_item(&self) -> Option<&T> {
        (self.phase() == SpinPhase::Settled)
            .then(|| self.selected_item())
            .flatten()
    }

    /// Displayable position currently under the indicator.
    pub fn indicated_index(&self) -> Option<usize> {
        indicated_index(self.geometry.rotation, &self.offsets)
    }

    pub fn surface(&self) -> &S {
        self.driver.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.driver.surface_mut()
    }

    pub fn render_driver(&self) -> &RenderDriver<S> {
        &self.driver
    }

    pub fn is_mounted(&self) -> bool {
        self.driver.is_mounted()
    }

    /// Creates every panel and the indicator on the surface.
    pub fn mount(&mut self) -> Result<(), WheelError> {
        let labels = self.labels();
        let styles = panel_styles(self.geometry.rotation, &self.offsets, &mut self.projector);
        let front = self.projector.style(0);
        self.driver.mount(&labels, &styles, front)?;
        Ok(())
    }

    /// Restyles every panel for the current rotation, mounting first if needed.
    pub fn paint(&mut self) -> Result<(), WheelError> {
        if !self.driver.is_mounted() {
            return self.mount();
        }
        let styles = panel_styles(self.geometry.rotation, &self.offsets, &mut self.projector);
        self.driver.repaint(&styles)?;
        Ok(())
    }

    /// Starts a new spin, replacing any spin in progress.
    pub fn spin(&mut self) -> SpinToken {
        let plan = SpinPlan::draw(
            self.displayable_count(),
            self.selected,
            self.geometry.rotation,
            &self.timings,
            &mut self.rng,
        );
        self.spin_with(plan)
    }

    /// Starts a spin with a fixed plan.
    pub fn spin_with(&mut self, plan: SpinPlan) -> SpinToken {
        if self.phase() == SpinPhase::Spinning {
            log::debug!("Restarting spin; pending ticks are dropped");
        }
        log::debug!(
            "Spinning {} slots over {} steps towards {}",
            plan.slots,
            plan.total_steps,
            plan.target
        );
        self.spin.start(plan)
    }

    /// Plans a spin from the current position that passes `slots` items.
    pub fn plan(&self, slots: usize) -> SpinPlan {
        SpinPlan::with_slots(
            self.displayable_count(),
            self.selected,
            self.geometry.rotation,
            slots,
        )
    }

    /// Advances one degree and repaints. Ticks from a replaced or cancelled spin
    /// change nothing.
    pub fn tick(&mut self, token: SpinToken) -> Result<Tick, WheelError> {
        if !self.spin.is_live(token) {
            log::warn!("Ignoring tick from a spin that is no longer running");
            return Ok(Tick::Stale);
        }

        // a zero-step plan settles without moving
        if self
            .spin
            .plan()
            .is_some_and(|plan| self.spin.step() < plan.total_steps)
        {
            // the step only counts once it is on screen
            let previous = self.geometry.rotation;
            self.geometry.advance();
            if let Err(e) = self.paint() {
                self.geometry.set_rotation(previous);
                return Err(e);
            }
        }

        let tick = self.spin.complete_step(&self.timings);
        log::trace!(
            "Step {} at rotation {}",
            self.spin.step(),
            self.geometry.rotation
        );

        if let Tick::Settled { index } = tick {
            self.selected = index;
            log::info!(
                "Settled on '{}'",
                self.label_of(index).unwrap_or_default()
            );
        }
        Ok(tick)
    }

    /// Stops the running spin where it is.
    pub fn cancel(&mut self) {
        if self.phase() == SpinPhase::Spinning {
            log::debug!("Spin cancelled at rotation {}", self.geometry.rotation);
        }
        self.spin.cancel();
    }

    /// Replaces the items. On error the previous items stay in place.
    pub fn set_items(&mut self, items: Vec<T>) -> Result<(), WheelError> {
        if items.is_empty() {
            return Err(ConfigurationError::NoItems.into());
        }
        let previous = self.pipeline.set_items(items);
        if self.pipeline.is_empty() {
            let total = self.pipeline.items().len();
            self.pipeline.set_items(previous);
            return Err(WheelError::EmptyDisplayableSet { total });
        }
        self.relayout()
    }

    /// Replaces the filters. On error the previous filters stay in place.
    pub fn set_filters(&mut self, filters: Vec<Filter<T>>) -> Result<(), WheelError> {
        let previous = self.pipeline.set_filters(filters);
        if self.pipeline.is_empty() {
            self.pipeline.set_filters(previous);
            return Err(WheelError::EmptyDisplayableSet {
                total: self.pipeline.items().len(),
            });
        }
        self.relayout()
    }

    pub fn set_label(&mut self, label: Label<T>) -> Result<(), WheelError> {
        self.label = label;
        self.remount()
    }

    pub fn set_colors(&mut self, foreground: &str, background: &str) -> Result<(), WheelError> {
        let palette = Palette::parse(foreground, background)?;
        self.projector.set_palette(palette);
        self.repaint_if_mounted()
    }

    pub fn set_radius(&mut self, radius: Option<f64>) -> Result<(), WheelError> {
        self.apply_options(GeometryOptions {
            radius,
            ..self.options.clone()
        })
    }

    /// Moves the disc so its bounding box starts at `(left, top)`.
    pub fn set_position(&mut self, left: f64, top: f64) -> Result<(), WheelError> {
        self.apply_options(GeometryOptions {
            left: Some(left),
            top: Some(top),
            ..self.options.clone()
        })
    }

    /// Pitch and yaw in degrees.
    pub fn set_tilt(&mut self, pitch: f64, yaw: f64) -> Result<(), WheelError> {
        self.apply_options(GeometryOptions {
            pitch: Some(pitch),
            yaw: Some(yaw),
            ..self.options.clone()
        })
    }

    fn apply_options(&mut self, options: GeometryOptions) -> Result<(), WheelError> {
        let layout = DiscLayout::resolve(&options, self.displayable_count())?;
        self.options = options;
        self.set_layout(layout);
        self.remount()
    }

    fn set_layout(&mut self, layout: DiscLayout) {
        self.projector.set_layout(layout);
        self.geometry.layout = layout;
    }

    /// Rebuilds everything that depends on the displayable count and re-picks.
    fn relayout(&mut self) -> Result<(), WheelError> {
        self.cancel();

        let n = self.displayable_count();
        let layout = DiscLayout::resolve(&self.options, n)?;
        self.set_layout(layout);
        self.offsets = angle_offsets(n);

        self.selected = pick_index(n, &mut self.rng).unwrap_or_default();
        self.geometry.set_rotation(rotation_for(self.selected, n));

        self.remount()
    }

    fn remount(&mut self) -> Result<(), WheelError> {
        if self.driver.is_mounted() {
            self.mount()?;
        }
        Ok(())
    }

    fn repaint_if_mounted(&mut self) -> Result<(), WheelError> {
        if self.driver.is_mounted() {
            self.paint()?;
        }
        Ok(())
    }
}
