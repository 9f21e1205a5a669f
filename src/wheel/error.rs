use crate::surface::ContainerId;
use strum::Display as StrumDisplay;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum ColorRole {
    Foreground,
    Background,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("No items to populate the wheel with")]
    NoItems,
    #[error("Wheel radius must be at least 1, got {0}")]
    InvalidRadius(f64),
    #[error("Panel width must be positive, got {0}")]
    InvalidPanelWidth(f64),
    #[error("Step delays must satisfy min <= max (min {min}ms, max {max}ms)")]
    InvalidDelays { min: u64, max: u64 },
    #[error("Easing exponent must be a positive finite number, got {0}")]
    InvalidExponent(f64),
    #[error("A spin may make at most {max} revolutions, got {base} plus up to {extra}")]
    TooManyRevolutions { base: usize, extra: usize, max: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Container '{0}' not found on the surface")]
    ContainerNotFound(ContainerId),
    #[error("Wheel has not been mounted on a surface")]
    NotMounted,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WheelError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Filters rejected all {total} items; nothing to display")]
    EmptyDisplayableSet { total: usize },
    #[error("Invalid {role} color {value:?}: expected #RRGGBB")]
    InvalidColor { role: ColorRole, value: String },
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}
