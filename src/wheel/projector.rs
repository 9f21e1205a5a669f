use super::FULL_TURN;
use super::color::Palette;
use super::geometry::DiscLayout;
use palette::Srgb;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub x: f64,
    pub y: f64,
    /// Higher is nearer the viewer and painted on top.
    pub stack_depth: i32,
    pub color: Srgb<u8>,
}

/// Places a slot at `angle` degrees on the tilted disc. Angle 0 faces the viewer.
///
/// This is not a perspective projection: the disc is an ellipse skewed by the
/// fixed pitch and yaw, with depth driving both stacking and shading.
pub fn project(angle: f64, layout: &DiscLayout, palette: &Palette) -> Projection {
    let theta = angle.rem_euclid(f64::from(FULL_TURN)).to_radians();
    let radius = layout.radius;

    let depth = radius * theta.cos();
    let stack_depth = (radius + depth.floor()).floor() as i32;

    let horizontal_skew = (depth * layout.yaw.sin()).floor();
    let vertical_skew = (depth * layout.pitch.sin()).floor();

    Projection {
        x: layout.center.x - horizontal_skew,
        y: layout.center.y + vertical_skew - (radius * theta.sin()).floor(),
        stack_depth,
        color: palette.tint(stack_depth, radius),
    }
}

/// Memoizes [`project`] for whole-degree angles.
pub struct Projector {
    layout: DiscLayout,
    palette: Palette,
    cache: Vec<Option<Projection>>,
}

impl Projector {
    pub fn new(layout: DiscLayout, palette: Palette) -> Self {
        Self {
            layout,
            palette,
            cache: vec![None; FULL_TURN as usize],
        }
    }

    pub fn layout(&self) -> &DiscLayout {
        &self.layout
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn style(&mut self, angle: i64) -> Projection {
        let key = angle.rem_euclid(i64::from(FULL_TURN)) as usize;
        if let Some(hit) = self.cache[key] {
            return hit;
        }
        let projection = project(key as f64, &self.layout, &self.palette);
        self.cache[key] = Some(projection);
        projection
    }

    pub fn set_layout(&mut self, layout: DiscLayout) {
        if self.layout != layout {
            self.layout = layout;
            self.invalidate();
        }
    }

    pub fn set_palette(&mut self, palette: Palette) {
        if self.palette != palette {
            self.palette = palette;
            self.invalidate();
        }
    }

    pub fn invalidate(&mut self) {
        log::debug!("Clearing projection cache");
        self.cache.iter_mut().for_each(|entry| *entry = None);
    }

    pub fn cached(&self) -> usize {
        self.cache.iter().filter(|entry| entry.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::geometry::{GeometryOptions, Point};

    fn layout(radius: f64) -> DiscLayout {
        DiscLayout::resolve(
            &GeometryOptions {
                radius: Some(radius),
                ..Default::default()
            },
            4,
        )
        .unwrap()
    }

    #[test]
    fn test_front_slot() {
        let layout = layout(150.0);
        let palette = Palette::default();
        let p = project(0.0, &layout, &palette);

        assert_eq!(p.stack_depth, 300);
        assert_eq!(p.color, palette.foreground);

        let skew = (150.0 * 5f64.to_radians().sin()).floor();
        assert_eq!(p.x, layout.center.x - skew);
        assert_eq!(p.y, layout.center.y + skew);
    }

    #[test]
    fn test_back_slot_is_background() {
        let layout = layout(150.0);
        let palette = Palette::default();
        let p = project(180.0, &layout, &palette);
        assert_eq!(p.stack_depth, 0);
        assert_eq!(p.color, palette.background);
    }

    #[test]
    fn test_side_slots() {
        let layout = DiscLayout {
            radius: 100.0,
            center: Point::new(0.0, 0.0),
            pitch: 0.0,
            yaw: 0.0,
        };
        let palette = Palette::default();

        let top = project(90.0, &layout, &palette);
        assert_eq!(top.y, -100.0);
        assert_eq!(top.x, 0.0);

        let bottom = project(270.0, &layout, &palette);
        assert_eq!(bottom.y, 100.0);
    }

    #[test]
    fn test_angle_wraps() {
        let layout = layout(120.0);
        let palette = Palette::default();
        assert_eq!(
            project(370.0, &layout, &palette),
            project(10.0, &layout, &palette)
        );
        assert_eq!(
            project(-90.0, &layout, &palette),
            project(270.0, &layout, &palette)
        );
    }

    #[test]
    fn test_depth_ordering() {
        let layout = layout(150.0);
        let palette = Palette::default();
        let depths: Vec<i32> = [0.0, 45.0, 90.0, 135.0, 180.0]
            .iter()
            .map(|&a| project(a, &layout, &palette).stack_depth)
            .collect();
        assert!(depths.windows(2).all(|w| w[0] > w[1]), "{depths:?}");
    }

    #[test]
    fn test_cache_agrees_with_projection() {
        let layout = layout(150.0);
        let palette = Palette::default();
        let mut projector = Projector::new(layout, palette);

        for angle in 0..360 {
            let miss = projector.style(angle);
            let hit = projector.style(angle);
            let fresh = project(angle as f64, &layout, &palette);
            assert_eq!(miss, fresh);
            assert_eq!(hit, fresh);
        }
        assert_eq!(projector.cached(), 360);
        assert_eq!(projector.style(725), projector.style(5));
    }

    #[test]
    fn test_layout_change_clears_cache() {
        let mut projector = Projector::new(layout(150.0), Palette::default());
        projector.style(0);
        projector.style(90);
        assert_eq!(projector.cached(), 2);

        // unchanged layout keeps entries
        projector.set_layout(layout(150.0));
        assert_eq!(projector.cached(), 2);

        projector.set_layout(layout(80.0));
        assert_eq!(projector.cached(), 0);
        assert_eq!(projector.style(0).stack_depth, 160);
    }

    #[test]
    fn test_palette_change_clears_cache() {
        let mut projector = Projector::new(layout(150.0), Palette::default());
        let before = projector.style(0);

        let palette = Palette::parse("#FFFFFF", "#000000").unwrap();
        projector.set_palette(palette);
        assert_eq!(projector.cached(), 0);

        let after = projector.style(0);
        assert_ne!(before.color, after.color);
        assert_eq!(after.color, palette.foreground);
    }
}
