use crate::camera::Camera;
use crate::config::Config;
use crate::map::GridMap;
use rayon::prelude::*;

/// Substituted for an exactly-zero sin/cos so axis-aligned rays never divide
/// by zero. Numerical-stability policy, not an error path.
const AXIS_EPSILON: f32 = 1e-5;

/// Which grid-line family the winning intersection came from. Only shading
/// cares; geometry is identical either way.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Axis {
    Vertical,
    Horizontal,
}

/// Per-ray result, consumed immediately by the projector.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) struct Hit {
    /// Distance to the wall measured along the view-plane normal (fish-eye
    /// corrected), not along the ray.
    pub perp_depth: f32,
    pub axis: Axis,
}

/// Grid-line (DDA) ray caster over an immutable `GridMap`.
///
/// Each ray walks tile boundaries in the vertical-line and horizontal-line
/// families separately, takes the nearer intersection, and corrects the ray
/// distance to perpendicular depth. Rays are mutually independent, so the
/// full-frame cast fans out across columns with rayon; collection keeps the
/// output in ascending ray order.
pub(crate) struct RayCaster {
    tile_size: f32,
    half_fov: f32,
    delta_angle: f32,
    ray_count: usize,
    // per-family step caps: these bound the walk, they do not guarantee a
    // hit on a map with an open border
    steps_x: usize,
    steps_y: usize,
}

impl RayCaster {
    pub fn new(config: &Config) -> Self {
        Self {
            tile_size: config.tile_size,
            half_fov: config.fov / 2.,
            delta_angle: config.fov / config.ray_count as f32,
            ray_count: config.ray_count,
            steps_x: (config.screen_width as f32 / config.tile_size).ceil() as usize,
            steps_y: (config.screen_height as f32 / config.tile_size).ceil() as usize,
        }
    }

    /// Cast every ray of the field of view, left edge to right edge.
    pub fn cast_frame(&self, map: &GridMap, camera: &Camera) -> Vec<Hit> {
        (0..self.ray_count)
            .into_par_iter()
            .map(|index| self.cast_ray(map, camera, index))
            .collect()
    }

    /// Cast the ray for one screen column.
    ///
    /// If neither family finds a solid tile within its step budget (open or
    /// malformed map), the last computed depth stands; the projector clamps
    /// the resulting slab rather than treating it as an error.
    pub fn cast_ray(&self, map: &GridMap, camera: &Camera, index: usize) -> Hit {
        let angle = camera.angle - self.half_fov + index as f32 * self.delta_angle;
        let mut sin_a = angle.sin();
        let mut cos_a = angle.cos();
        if sin_a == 0. {
            sin_a = AXIS_EPSILON;
        }
        if cos_a == 0. {
            cos_a = AXIS_EPSILON;
        }

        let tile = self.tile_size;
        let snapped_x = (camera.pos.x / tile).floor() * tile;
        let snapped_y = (camera.pos.y / tile).floor() * tile;

        // vertical grid lines: step tile-by-tile in x, probe one unit past
        // the boundary so the tile on the far side is the one tested
        let (mut x, dx) = if cos_a >= 0. {
            (snapped_x + tile, 1.)
        } else {
            (snapped_x, -1.)
        };
        let mut depth_v = 0.;
        for _ in 0..self.steps_x {
            depth_v = (x - camera.pos.x) / cos_a;
            let y = camera.pos.y + depth_v * sin_a;
            if map.is_solid(x + dx, y) {
                break;
            }
            x += dx * tile;
        }

        // horizontal grid lines: same walk with the axes swapped
        let (mut y, dy) = if sin_a >= 0. {
            (snapped_y + tile, 1.)
        } else {
            (snapped_y, -1.)
        };
        let mut depth_h = 0.;
        for _ in 0..self.steps_y {
            depth_h = (y - camera.pos.y) / sin_a;
            let x = camera.pos.x + depth_h * cos_a;
            if map.is_solid(x, y + dy) {
                break;
            }
            y += dy * tile;
        }

        // nearer family wins; vertical on exact ties
        let (depth, axis) = if depth_v <= depth_h {
            (depth_v, Axis::Vertical)
        } else {
            (depth_h, Axis::Horizontal)
        };

        // remove fish-eye: ray-length distance -> view-plane distance
        Hit {
            perp_depth: depth * (camera.angle - angle).cos(),
            axis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::f32::consts::PI;

    fn config() -> Config {
        Config {
            screen_width: 1200,
            screen_height: 900,
            ray_count: 100,
            ..Config::default()
        }
    }

    /// 3x3 enclosed room, tile size 100: open interior tile spans
    /// (100, 100)..(200, 200), walls all around.
    fn room() -> GridMap {
        GridMap::parse(&["XXX", "X.X", "XXX"], 100.)
    }

    fn centered_camera(angle: f32) -> Camera {
        Camera::new(Vec2::new(150., 150.), angle, 1., 0.02)
    }

    #[test]
    fn center_ray_hits_east_wall_at_half_tile() {
        let cfg = config();
        let caster = RayCaster::new(&cfg);
        let map = room();
        let cam = centered_camera(0.);

        // ray_count/2 is the ray straight down the heading
        let hit = caster.cast_ray(&map, &cam, cfg.ray_count / 2);
        assert!(
            (hit.perp_depth - 50.).abs() < 1e-2,
            "expected ~50, got {}",
            hit.perp_depth
        );
        assert_eq!(hit.axis, Axis::Vertical);
    }

    #[test]
    fn fish_eye_is_corrected() {
        let cfg = config();
        let caster = RayCaster::new(&cfg);
        let map = room();
        let cam = centered_camera(0.);

        // ray 75 sits at offset +fov/4 = pi/12 from the heading and still
        // hits the east wall, at straight-line distance 50 / cos(pi/12)
        let delta = PI / 12.;
        let hit = caster.cast_ray(&map, &cam, 75);

        let straight_line = 50. / delta.cos();
        assert!(
            (hit.perp_depth - straight_line * delta.cos()).abs() < 0.05,
            "expected ~{}, got {}",
            straight_line * delta.cos(),
            hit.perp_depth
        );
        // without correction the depth would be the raw ray length
        assert!(hit.perp_depth < straight_line - 1.);
    }

    #[test]
    fn axis_aligned_ray_uses_epsilon_not_panic() {
        let cfg = config();
        let caster = RayCaster::new(&cfg);
        let map = room();

        // heading half_fov means ray 0 points at angle exactly 0.0, so
        // sin(a) == 0.0 and the epsilon substitution kicks in
        let cam = centered_camera(cfg.fov / 2.);
        let hit = caster.cast_ray(&map, &cam, 0);

        // the non-degenerate vertical family still finds the east wall at
        // raw depth 50; perpendicular depth folds in the fov/2 offset
        let expected = 50. * (cfg.fov / 2.).cos();
        assert_eq!(hit.axis, Axis::Vertical);
        assert!(
            (hit.perp_depth - expected).abs() < 0.05,
            "expected ~{expected}, got {}",
            hit.perp_depth
        );
    }

    #[test]
    fn full_frame_is_in_ray_order_and_idempotent() {
        let cfg = config();
        let caster = RayCaster::new(&cfg);
        let map = room();
        let cam = centered_camera(0.);

        let first = caster.cast_frame(&map, &cam);
        let second = caster.cast_frame(&map, &cam);

        assert_eq!(first.len(), cfg.ray_count);
        assert_eq!(first, second);

        // parallel cast agrees with the sequential per-ray entry point
        for (index, hit) in first.iter().enumerate() {
            assert_eq!(*hit, caster.cast_ray(&map, &cam, index));
        }
    }

    #[test]
    fn facing_north_hits_horizontal_family() {
        let cfg = config();
        let caster = RayCaster::new(&cfg);
        let map = room();

        // heading -y (north wall of the room)
        let cam = centered_camera(3. * PI / 2.);
        let hit = caster.cast_ray(&map, &cam, cfg.ray_count / 2);

        assert_eq!(hit.axis, Axis::Horizontal);
        assert!((hit.perp_depth - 50.).abs() < 1e-2);
    }

    #[test]
    fn open_map_exhausts_step_budget_without_error() {
        let cfg = config();
        let caster = RayCaster::new(&cfg);
        // no walls at all: both families run to their caps
        let map = GridMap::parse(&["...", "...", "..."], 100.);
        let cam = centered_camera(0.);

        let hit = caster.cast_ray(&map, &cam, cfg.ray_count / 2);
        // degenerate but finite depth, at least the capped walk distance
        assert!(hit.perp_depth.is_finite());
        assert!(hit.perp_depth > 100.);
    }
}
