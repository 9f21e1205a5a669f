pub mod color;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod model;
pub mod picker;
pub mod projector;
pub mod render;
pub mod spin;

pub use color::Palette;
pub use error::{ColorRole, ConfigurationError, RenderError, WheelError};
pub use filter::{Fields, Filter, FilterPipeline, Label};
pub use geometry::{DiscLayout, GeometryOptions, WheelGeometry};
pub use model::{Wheel, WheelConfig};
pub use projector::{Projection, Projector};
pub use render::PanelStyle;
pub use spin::{Easing, SpinPhase, SpinPlan, SpinTimings, SpinToken, Tick};

pub const FULL_TURN: u16 = 360;
pub const PANEL_WIDTH: f64 = 200.0;
pub const RADIUS_PANEL_RATIO: f64 = 0.75; // default radius relative to panel width
pub const DENSITY_REFERENCE: f64 = 15.0; // item count above which the disc grows
pub const DEFAULT_LEFT: f64 = 100.0;
pub const DEFAULT_TOP: f64 = 100.0;
pub const DEFAULT_TILT_DEGREES: f64 = 5.0;
pub const DEFAULT_FOREGROUND: &str = "#EEEEEE";
pub const DEFAULT_BACKGROUND: &str = "#999999";
pub const DEFAULT_LABEL_FIELD: &str = "value";
pub const DEFAULT_INDICATOR: &str = "\u{25B6}";

// Spin timing (milliseconds)
pub const MIN_STEP_DELAY_MS: u64 = 5;
pub const MAX_STEP_DELAY_MS: u64 = 50;
pub const EASE_OUT_EXPONENT: f64 = 2.0;
pub const BASE_REVOLUTIONS: usize = 3;
pub const EXTRA_REVOLUTIONS: usize = 2; // random extra, in slots, up to this many turns
pub const MAX_REVOLUTIONS: usize = 1000;
