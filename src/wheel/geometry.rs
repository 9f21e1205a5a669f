use super::error::ConfigurationError;
use super::{
    DEFAULT_LEFT, DEFAULT_TILT_DEGREES, DEFAULT_TOP, DENSITY_REFERENCE, FULL_TURN, PANEL_WIDTH,
    RADIUS_PANEL_RATIO,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Everything about the disc that the projector depends on. Rotation lives
/// outside of it so spinning never touches the style cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscLayout {
    pub radius: f64,
    pub center: Point,
    /// Radians.
    pub pitch: f64,
    /// Radians.
    pub yaw: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryOptions {
    pub radius: Option<f64>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    /// Degrees.
    pub pitch: Option<f64>,
    /// Degrees.
    pub yaw: Option<f64>,
    pub panel_width: f64,
    /// Grow the default radius for wheels denser than the reference count.
    pub scale_with_count: bool,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            radius: None,
            left: None,
            top: None,
            pitch: None,
            yaw: None,
            panel_width: PANEL_WIDTH,
            scale_with_count: false,
        }
    }
}

impl DiscLayout {
    /// Builds the layout for `displayable` items. `(left, top)` is the corner of
    /// the disc's bounding box, so the center sits one radius further in.
    pub fn resolve(
        options: &GeometryOptions,
        displayable: usize,
    ) -> Result<Self, ConfigurationError> {
        if !(options.panel_width > 0.0) {
            return Err(ConfigurationError::InvalidPanelWidth(options.panel_width));
        }

        let radius = match options.radius {
            Some(r) => r,
            None => {
                let base = RADIUS_PANEL_RATIO * options.panel_width;
                if options.scale_with_count {
                    base * (displayable as f64 / DENSITY_REFERENCE).max(1.0)
                } else {
                    base
                }
            }
        };

        // also rejects NaN
        if !(radius >= 1.0) || !radius.is_finite() {
            return Err(ConfigurationError::InvalidRadius(radius));
        }

        let left = options.left.unwrap_or(DEFAULT_LEFT);
        let top = options.top.unwrap_or(DEFAULT_TOP);

        Ok(Self {
            radius,
            center: Point::new(left + radius, top + radius),
            pitch: options.pitch.unwrap_or(DEFAULT_TILT_DEGREES).to_radians(),
            yaw: options.yaw.unwrap_or(DEFAULT_TILT_DEGREES).to_radians(),
        })
    }

    /// Moves the center so that `(left, top)` stays the bounding-box corner.
    pub fn with_radius(self, radius: f64) -> Result<Self, ConfigurationError> {
        if !(radius >= 1.0) || !radius.is_finite() {
            return Err(ConfigurationError::InvalidRadius(radius));
        }
        let (left, top) = self.corner();
        Ok(Self {
            radius,
            center: Point::new(left + radius, top + radius),
            ..self
        })
    }

    pub fn corner(&self) -> (f64, f64) {
        (self.center.x - self.radius, self.center.y - self.radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub layout: DiscLayout,
    /// Whole degrees in `[0, 360)`.
    pub rotation: u16,
}

impl WheelGeometry {
    pub fn new(layout: DiscLayout) -> Self {
        Self {
            layout,
            rotation: 0,
        }
    }

    pub fn advance(&mut self) {
        self.rotation = (self.rotation + 1) % FULL_TURN;
    }

    pub fn set_rotation(&mut self, rotation: u16) {
        self.rotation = rotation % FULL_TURN;
    }
}

/// Slot angle of every item: `offset[i] = i * 360 / n`.
pub fn angle_offsets(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| (i * FULL_TURN as usize) as f64 / n as f64)
        .collect()
}

/// Integer angle of a slot at the given rotation, wrapped to `[0, 360)`.
pub fn angle_of(rotation: u16, offset: f64) -> u16 {
    ((f64::from(rotation) + offset).floor() as i64).rem_euclid(i64::from(FULL_TURN)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_partition_the_circle() {
        assert_eq!(angle_offsets(4), vec![0.0, 90.0, 180.0, 270.0]);
        assert_eq!(angle_offsets(1), vec![0.0]);
        assert!(angle_offsets(0).is_empty());

        for n in [3, 7, 12, 25, 360] {
            let offsets = angle_offsets(n);
            assert_eq!(offsets.len(), n);
            let step = 360.0 / n as f64;
            let wrap = (offsets[n - 1] + step) % 360.0;
            assert!(wrap < 1e-9 || (360.0 - wrap) < 1e-9, "n = {n}: {wrap}");
        }
    }

    #[test]
    fn test_angle_of_wraps() {
        assert_eq!(angle_of(0, 0.0), 0);
        assert_eq!(angle_of(350, 20.0), 10);
        assert_eq!(angle_of(359, 0.999), 359);
        assert_eq!(angle_of(90, 270.0), 0);
    }

    #[test]
    fn test_resolve_defaults() {
        let layout = DiscLayout::resolve(&GeometryOptions::default(), 4).unwrap();
        assert_eq!(layout.radius, 150.0);
        assert_eq!(layout.center, Point::new(250.0, 250.0));
        assert!((layout.pitch - 5f64.to_radians()).abs() < 1e-12);
        assert!((layout.yaw - 5f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_scales_dense_wheels() {
        let options = GeometryOptions {
            scale_with_count: true,
            ..Default::default()
        };
        assert_eq!(DiscLayout::resolve(&options, 10).unwrap().radius, 150.0);
        assert_eq!(DiscLayout::resolve(&options, 30).unwrap().radius, 300.0);

        // an explicit radius is never scaled
        let options = GeometryOptions {
            radius: Some(80.0),
            scale_with_count: true,
            ..Default::default()
        };
        assert_eq!(DiscLayout::resolve(&options, 30).unwrap().radius, 80.0);
    }

    #[test]
    fn test_resolve_rejects_bad_radius() {
        for radius in [0.0, 0.5, -3.0, f64::NAN, f64::INFINITY] {
            let options = GeometryOptions {
                radius: Some(radius),
                ..Default::default()
            };
            assert!(matches!(
                DiscLayout::resolve(&options, 4),
                Err(ConfigurationError::InvalidRadius(_))
            ));
        }
    }

    #[test]
    fn test_with_radius_keeps_corner() {
        let options = GeometryOptions {
            left: Some(10.0),
            top: Some(20.0),
            ..Default::default()
        };
        let layout = DiscLayout::resolve(&options, 4)
            .unwrap()
            .with_radius(50.0)
            .unwrap();
        assert_eq!(layout.center, Point::new(60.0, 70.0));
        assert_eq!(layout.corner(), (10.0, 20.0));
    }

    #[test]
    fn test_rotation_wraps() {
        let layout = DiscLayout::resolve(&GeometryOptions::default(), 4).unwrap();
        let mut geometry = WheelGeometry::new(layout);
        geometry.set_rotation(359);
        geometry.advance();
        assert_eq!(geometry.rotation, 0);
        geometry.set_rotation(725);
        assert_eq!(geometry.rotation, 5);
    }
}
