/// Immutable tile grid built once from a textual row list.
///
/// `'X'` marks a solid tile, anything else is open space. Rows may be ragged;
/// tiles past the end of a short row are open. Storage is a flat row-major
/// boolean array so per-step lookups during traversal stay O(1) with no
/// hashing.
///
/// Bounded ray traversal relies on the authored map enclosing its border in
/// solid tiles. That is not validated here: an open border makes rays run to
/// the caster's step cap instead (see `RayCaster`).
pub(crate) struct GridMap {
    width: usize,
    height: usize,
    tile_size: f32,
    solid: Vec<bool>,
}

pub(crate) const SOLID_TILE: char = 'X';

impl GridMap {
    pub fn parse(rows: &[&str], tile_size: f32) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);

        let mut solid = vec![false; width * height];
        for (j, row) in rows.iter().enumerate() {
            for (i, tile) in row.chars().enumerate() {
                if tile == SOLID_TILE {
                    solid[j * width + i] = true;
                }
            }
        }

        log::info!("parsed {width}x{height} tile map");
        Self {
            width,
            height,
            tile_size,
            solid,
        }
    }

    /// Whether the tile containing the given world coordinate is solid.
    ///
    /// Coordinates are floor-divided by the tile size, so already-snapped
    /// inputs resolve to the same tile as any other point inside it.
    /// Coordinates outside the authored rows (including negative ones)
    /// answer `false`, never an error.
    pub fn is_solid(&self, world_x: f32, world_y: f32) -> bool {
        let i = (world_x / self.tile_size).floor();
        let j = (world_y / self.tile_size).floor();
        if i < 0. || j < 0. {
            return false;
        }

        let (i, j) = (i as usize, j as usize);
        i < self.width && j < self.height && self.solid[j * self.width + i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_solid_and_open_tiles() {
        let map = GridMap::parse(&["XXX", "X.X", "XXX"], 100.);

        assert!(map.is_solid(50., 50.));
        assert!(!map.is_solid(150., 150.));
        assert!(map.is_solid(250., 150.));
    }

    #[test]
    fn snap_is_idempotent_within_a_tile() {
        let map = GridMap::parse(&["XXX", "X.X", "XXX"], 100.);

        // every point of tile (0, 0) resolves to the same answer
        assert_eq!(map.is_solid(0., 0.), map.is_solid(99.9, 99.9));
        assert_eq!(map.is_solid(100., 100.), map.is_solid(199.9, 199.9));
    }

    #[test]
    fn out_of_bounds_is_open() {
        let map = GridMap::parse(&["XXX", "X.X", "XXX"], 100.);

        assert!(!map.is_solid(-50., 150.));
        assert!(!map.is_solid(150., -50.));
        assert!(!map.is_solid(1e6, 150.));
        assert!(!map.is_solid(150., 1e6));
    }

    #[test]
    fn ragged_rows_pad_with_open_tiles() {
        let map = GridMap::parse(&["XXXX", "X", "XXXX"], 100.);

        assert!(map.is_solid(50., 150.));
        assert!(!map.is_solid(250., 150.));
    }

    #[test]
    fn empty_map_is_all_open() {
        let map = GridMap::parse(&[], 100.);
        assert!(!map.is_solid(0., 0.));
    }
}
