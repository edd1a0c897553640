use std::f32::consts::PI;

/// Startup constants. Validated once before the frame loop; nothing here is
/// runtime-reconfigurable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Config {
    pub screen_width: usize,
    pub screen_height: usize,
    /// Side length of one map tile in world units (1 world unit = 1 pixel).
    pub tile_size: f32,
    /// Total field of view in radians.
    pub fov: f32,
    /// Number of rays cast per frame. Must evenly divide `screen_width` so
    /// the projected columns tile the screen without gaps.
    pub ray_count: usize,
    /// World units moved per frame of held movement input.
    pub speed: f32,
    /// Radians turned per frame of held turn input.
    pub angle_step: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: 1250,
            screen_height: 720,
            tile_size: 100.,
            fov: PI / 3.,
            ray_count: 250,
            speed: 1.,
            angle_step: 0.02,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.screen_width == 0 || self.screen_height == 0 {
            anyhow::bail!(
                "screen dimensions must be nonzero, got {}x{}",
                self.screen_width,
                self.screen_height
            );
        }
        if self.tile_size <= 0. {
            anyhow::bail!("tile size must be positive, got {}", self.tile_size);
        }
        if self.fov <= 0. || self.fov >= PI {
            anyhow::bail!("fov must lie in (0, pi), got {}", self.fov);
        }
        if self.ray_count == 0 {
            anyhow::bail!("ray count must be nonzero");
        }
        if self.screen_width % self.ray_count != 0 {
            anyhow::bail!(
                "ray count {} does not evenly divide screen width {}",
                self.ray_count,
                self.screen_width
            );
        }
        if self.speed <= 0. {
            anyhow::bail!("movement speed must be positive, got {}", self.speed);
        }

        Ok(())
    }

    /// On-screen width of one projected column.
    pub fn column_width(&self) -> usize {
        self.screen_width / self.ray_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_ray_count() {
        let cfg = Config {
            ray_count: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_uneven_column_split() {
        // 300 rays over 1250 pixels would leave a 50px gap on the right
        let cfg = Config {
            ray_count: 300,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_degenerate_fov() {
        let cfg = Config {
            fov: 0.,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = Config {
            fov: PI,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_nonpositive_tile_size() {
        let cfg = Config {
            tile_size: 0.,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn column_width_tiles_the_screen() {
        let cfg = Config::default();
        assert_eq!(cfg.column_width() * cfg.ray_count, cfg.screen_width);
    }
}
