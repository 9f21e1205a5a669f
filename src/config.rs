use crate::surface::ContainerId;
use crate::wheel::filter::{Fields, Filter, Label};
use crate::wheel::geometry::GeometryOptions;
use crate::wheel::spin::{Easing, SpinTimings};
use crate::wheel::{
    BASE_REVOLUTIONS, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, DEFAULT_INDICATOR,
    DEFAULT_LABEL_FIELD, EASE_OUT_EXPONENT, EXTRA_REVOLUTIONS, MAX_STEP_DELAY_MS,
    MIN_STEP_DELAY_MS, PANEL_WIDTH, WheelConfig,
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// An item read from a config file: plain string fields.
pub type Entry = BTreeMap<String, String>;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum FilterOp {
    #[default]
    #[strum(to_string = "equals", serialize = "eq", serialize = "==")]
    Equals,
    #[strum(to_string = "not_equals", serialize = "ne", serialize = "!=")]
    NotEquals,
    #[strum(serialize = "contains")]
    Contains,
    #[strum(serialize = "present")]
    Present,
    #[strum(serialize = "absent")]
    Absent,
}

/// A declarative filter: `field <op> value`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterRule {
    pub field: String,
    #[serde(default)]
    pub op: FilterOp,
    #[serde(default)]
    pub value: Option<String>,
}

impl FilterRule {
    pub fn matches<T: Fields>(&self, item: &T) -> bool {
        let found = item.field(&self.field);
        let expected = self.value.as_deref().unwrap_or_default();
        match self.op {
            FilterOp::Equals => found == Some(expected),
            FilterOp::NotEquals => found != Some(expected),
            FilterOp::Contains => found.is_some_and(|f| f.contains(expected)),
            FilterOp::Present => found.is_some(),
            FilterOp::Absent => found.is_none(),
        }
    }

    pub fn into_filter<T: Fields + 'static>(self) -> Filter<T> {
        Box::new(move |item: &T| self.matches(item))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpinSection {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub exponent: f64,
    pub base_revolutions: usize,
    pub extra_revolutions: usize,
}

impl Default for SpinSection {
    fn default() -> Self {
        Self {
            min_delay_ms: MIN_STEP_DELAY_MS,
            max_delay_ms: MAX_STEP_DELAY_MS,
            exponent: EASE_OUT_EXPONENT,
            base_revolutions: BASE_REVOLUTIONS,
            extra_revolutions: EXTRA_REVOLUTIONS,
        }
    }
}

impl From<&SpinSection> for SpinTimings {
    fn from(spin: &SpinSection) -> Self {
        Self {
            min_delay: Duration::from_millis(spin.min_delay_ms),
            max_delay: Duration::from_millis(spin.max_delay_ms),
            easing: Easing {
                exponent: spin.exponent,
            },
            base_revolutions: spin.base_revolutions,
            extra_revolutions: spin.extra_revolutions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub items: Vec<Entry>,
    #[serde(default)]
    pub filters: Vec<FilterRule>,
    /// Field shown on each panel.
    pub display: Option<String>,
    pub radius: Option<f64>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub pitch: Option<f64>,
    pub yaw: Option<f64>,
    pub panel_width: Option<f64>,
    #[serde(default)]
    pub scale_with_count: bool,
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub container: Option<ContainerId>,
    pub indicator: Option<String>,
    #[serde(default)]
    pub spin: SpinSection,
}

impl FileConfig {
    /// Converts to a wheel config. Colors and counts are validated when the wheel is built.
    pub fn into_wheel_config(self) -> WheelConfig<Entry> {
        let label = Label::field(
            self.display
                .unwrap_or_else(|| DEFAULT_LABEL_FIELD.to_string()),
        );
        let filters = self
            .filters
            .into_iter()
            .map(FilterRule::into_filter)
            .collect();

        WheelConfig {
            items: self.items,
            filters,
            label,
            geometry: GeometryOptions {
                radius: self.radius,
                left: self.left,
                top: self.top,
                pitch: self.pitch,
                yaw: self.yaw,
                panel_width: self.panel_width.unwrap_or(PANEL_WIDTH),
                scale_with_count: self.scale_with_count,
            },
            foreground: self
                .foreground
                .unwrap_or_else(|| DEFAULT_FOREGROUND.to_string()),
            background: self
                .background
                .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
            timings: SpinTimings::from(&self.spin),
            container: self.container.unwrap_or_default(),
            indicator: self
                .indicator
                .unwrap_or_else(|| DEFAULT_INDICATOR.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "spinwheel", "spinwheel")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn build(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<FileConfig, ConfigError> {
    let s = builder
        .add_source(
            config::Environment::with_prefix("SPINWHEEL")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads `path`, or the user config file when no path is given. An explicit
/// path must exist; the user file is optional.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (get_config_path()?, false),
    };

    build(config::Config::builder().add_source(config::File::from(path).required(required)))
}

pub fn default_config() -> Result<FileConfig, ConfigError> {
    build(
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml)),
    )
}

/// The user config if there is a usable one, otherwise the bundled sample wheel.
pub fn load_or_default() -> FileConfig {
    if let Ok(path) = get_config_path()
        && path.exists()
    {
        match load_config(Some(&path)) {
            Ok(c) if !c.items.is_empty() => return c,
            Ok(_) => log::warn!("{} has no items; using the sample wheel", path.display()),
            Err(e) => log::error!("Failed to load {}: {}", path.display(), e),
        }
    }

    default_config().unwrap_or_else(|e| {
        log::error!("Bundled config is invalid: {}", e);
        FileConfig::default()
    })
}

pub fn write_default_config() -> Result<PathBuf, ConfigError> {
    let path = get_config_path()?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
        log::info!("Wrote default config to {}", path.display());
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingSurface;
    use crate::wheel::{ConfigurationError, Wheel, WheelError};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn parse(toml: &str) -> FileConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    fn entry(pairs: &[(&str, &str)]) -> Entry {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_filter_op_deserialization() {
        let cases = vec![
            ("\"equals\"", FilterOp::Equals),
            ("\"EQ\"", FilterOp::Equals),
            ("\"==\"", FilterOp::Equals),
            ("\"not_equals\"", FilterOp::NotEquals),
            ("\"!=\"", FilterOp::NotEquals),
            ("\"Contains\"", FilterOp::Contains),
            ("\"present\"", FilterOp::Present),
            ("\"ABSENT\"", FilterOp::Absent),
        ];

        for (json, expected) in cases {
            let deserialized: FilterOp = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<FilterOp>("\"maybe\"").is_err());
        assert_eq!(serde_json::to_string(&FilterOp::NotEquals).unwrap(), "\"not_equals\"");
    }

    #[test]
    fn test_filter_rules() {
        let item = entry(&[("value", "Pizza"), ("kind", "savory")]);
        let rule = |field: &str, op, value: Option<&str>| FilterRule {
            field: field.to_string(),
            op,
            value: value.map(str::to_string),
        };

        assert!(rule("kind", FilterOp::Equals, Some("savory")).matches(&item));
        assert!(!rule("kind", FilterOp::Equals, Some("sweet")).matches(&item));
        assert!(rule("kind", FilterOp::NotEquals, Some("sweet")).matches(&item));
        assert!(rule("missing", FilterOp::NotEquals, Some("x")).matches(&item));
        assert!(rule("value", FilterOp::Contains, Some("zz")).matches(&item));
        assert!(!rule("missing", FilterOp::Contains, Some("")).matches(&item));
        assert!(rule("kind", FilterOp::Present, None).matches(&item));
        assert!(rule("spicy", FilterOp::Absent, None).matches(&item));
    }

    #[test]
    fn test_file_config_from_toml() {
        let config = parse(
            r##"
            display = "name"
            radius = 120
            foreground = "#FFFFFF"

            [[items]]
            name = "Sushi"
            kind = "savory"

            [[items]]
            name = "Cake"
            kind = "sweet"

            [[items]]
            name = "Ramen"
            kind = "savory"

            [[filters]]
            field = "kind"
            op = "ne"
            value = "sweet"

            [spin]
            max_delay_ms = 80
            "##,
        );

        assert_eq!(config.items.len(), 3);
        assert_eq!(config.filters[0].op, FilterOp::NotEquals);
        assert_eq!(config.radius, Some(120.0));
        assert_eq!(config.spin.max_delay_ms, 80);
        assert_eq!(config.spin.min_delay_ms, MIN_STEP_DELAY_MS);

        let wheel = Wheel::with_rng(
            config.into_wheel_config(),
            RecordingSurface::with_container("wheelCanvas"),
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(wheel.labels(), vec!["Sushi", "Ramen"]);
        assert_eq!(wheel.geometry().layout.radius, 120.0);
        assert_eq!(wheel.timings().max_delay, Duration::from_millis(80));
    }

    #[test]
    fn test_runaway_revolutions_rejected() {
        let config = parse(
            r##"
            [[items]]
            value = "Only"

            [spin]
            base_revolutions = 12000000
            "##,
        );

        let result = Wheel::with_rng(
            config.into_wheel_config(),
            RecordingSurface::with_container("wheelCanvas"),
            StdRng::seed_from_u64(1),
        );
        assert!(matches!(
            result.err(),
            Some(WheelError::Configuration(
                ConfigurationError::TooManyRevolutions { .. }
            ))
        ));
    }

    #[test]
    fn test_bundled_config_builds_a_wheel() {
        let config = default_config().unwrap();
        assert!(!config.items.is_empty());

        let wheel = Wheel::with_rng(
            config.into_wheel_config(),
            RecordingSurface::with_container("wheelCanvas"),
            StdRng::seed_from_u64(0),
        );
        assert!(wheel.is_ok());
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let result = load_config(Some(Path::new("/nonexistent/spinwheel.toml")));
        assert!(matches!(result, Err(ConfigError::Config(_))));
    }
}
