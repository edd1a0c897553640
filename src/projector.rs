use crate::caster::{Axis, Hit};
use crate::config::Config;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Floor for incoming depths so a degenerate (exhausted-traversal) ray can
/// never divide the projection by zero.
const MIN_DEPTH: f32 = 1e-4;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as 0RGB (BGRA8 in little-endian memory), the layout softbuffer
    /// presents.
    pub fn to_u32(self) -> u32 {
        (self.b as u32) | ((self.g as u32) << 8) | ((self.r as u32) << 16)
    }
}

/// Wall color policy, injected so the geometry stays pure: the caster and
/// projector never read a clock themselves.
pub(crate) trait ColorStrategy {
    fn column_color(&self, ray_index: usize, axis: Axis, depth: f32, elapsed_secs: f32) -> Rgb;
}

/// One flat wall color everywhere.
pub(crate) struct FixedColor(pub Rgb);

impl ColorStrategy for FixedColor {
    fn column_color(&self, _ray_index: usize, _axis: Axis, _depth: f32, _elapsed_secs: f32) -> Rgb {
        self.0
    }
}

/// Animated variant: a color per column sampled from an RNG seeded by the
/// quantized frame clock, the column, and the hit axis. Re-samples until the
/// color is not pure black, so walls never vanish into the background.
/// Deterministic for a given clock sample.
pub(crate) struct RandomPulse {
    /// Palette ticks per second of elapsed time.
    pub ticks_per_sec: f32,
}

impl Default for RandomPulse {
    fn default() -> Self {
        Self { ticks_per_sec: 10. }
    }
}

impl ColorStrategy for RandomPulse {
    fn column_color(&self, ray_index: usize, axis: Axis, _depth: f32, elapsed_secs: f32) -> Rgb {
        let tick = (elapsed_secs * self.ticks_per_sec) as u64;
        let seed = tick
            .wrapping_mul(0x9e37_79b9_7f4a_7c15)
            .wrapping_add(ray_index as u64)
            .wrapping_add(match axis {
                Axis::Vertical => 0,
                Axis::Horizontal => 1 << 32,
            });

        let mut rng = StdRng::seed_from_u64(seed);
        loop {
            let color = Rgb::new(rng.gen(), rng.gen(), rng.gen());
            if color != Rgb::new(0, 0, 0) {
                return color;
            }
        }
    }
}

/// Screen-space wall slab for one column, handed straight to the presenter.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) struct DrawCommand {
    pub x: usize,
    pub width: usize,
    pub top: f32,
    pub height: f32,
    pub color: Rgb,
}

/// Converts perpendicular depths into centered vertical slabs.
///
/// The pinhole constants depend only on the startup configuration, so they
/// are computed once here and reused every frame.
pub(crate) struct Projector {
    proj_coeff: f32,
    column_width: usize,
    half_height: f32,
    max_slab: f32,
}

impl Projector {
    pub fn new(config: &Config) -> Self {
        // distance from the eye to the projection plane, in ray-columns
        let player_dist = (config.ray_count as f32 / 2.) / (config.fov / 2.).tan();
        Self {
            proj_coeff: 3. * player_dist * config.tile_size,
            column_width: config.column_width(),
            half_height: config.screen_height as f32 / 2.,
            // generous bound; keeps an exhausted-traversal slab renderable
            max_slab: config.screen_height as f32 * 16.,
        }
    }

    pub fn proj_coeff(&self) -> f32 {
        self.proj_coeff
    }

    /// Project one hit: slab height is inverse in depth and the slab is
    /// centered on the screen's vertical midline.
    pub fn project(&self, ray_index: usize, hit: Hit, color: Rgb) -> DrawCommand {
        let height = (self.proj_coeff / hit.perp_depth.max(MIN_DEPTH)).min(self.max_slab);
        DrawCommand {
            x: ray_index * self.column_width,
            width: self.column_width,
            top: self.half_height - height / 2.,
            height,
            color,
        }
    }

    /// Project a whole frame of hits, ascending ray order.
    pub fn project_frame(
        &self,
        hits: &[Hit],
        colors: &dyn ColorStrategy,
        elapsed_secs: f32,
    ) -> Vec<DrawCommand> {
        hits.iter()
            .enumerate()
            .map(|(index, hit)| {
                let color = colors.column_color(index, hit.axis, hit.perp_depth, elapsed_secs);
                self.project(index, *hit, color)
            })
            .collect()
    }
}
