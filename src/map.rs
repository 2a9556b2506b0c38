use anyhow::Context;
use glam::{IVec2, Vec2};

/// Tile code of traversable space. Every other code is a wall.
pub const EMPTY: u8 = 0;

/// Wall code that always renders yellow, whatever the shading mode.
pub const HIDDEN_WALL: u8 = 9;

/// Static level grid. Row-major tile codes, `tile_size` world units per tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    width: usize,
    height: usize,
    tile_size: f32,
    tiles: Vec<u8>,
}

impl Map {
    /// build a map from literal rows, rejecting ragged or empty tables
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R], tile_size: f32) -> anyhow::Result<Self> {
        if tile_size.is_nan() || tile_size <= 0. {
            anyhow::bail!("tile size must be positive, got {tile_size}");
        }

        let width = rows.first().context("map has no rows")?.as_ref().len();
        if width == 0 {
            anyhow::bail!("map rows are empty");
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                anyhow::bail!(
                    "row {row_idx} has {} tiles, expected {width}",
                    row.len()
                );
            }
            tiles.extend_from_slice(row);
        }

        log::debug!(
            "built {width}x{} map with tile size {tile_size}",
            rows.len()
        );

        Ok(Self {
            width,
            height: rows.len(),
            tile_size,
            tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// world units per tile
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    /// Tile code at `(col, row)`, or `None` when the cell lies outside the grid.
    pub fn tile_at(&self, col: i32, row: i32) -> Option<u8> {
        if !self.contains(col, row) {
            return None;
        }
        self.tiles
            .get(row as usize * self.width + col as usize)
            .copied()
    }

    /// Out-of-bounds cells count as walls so nothing can walk or see past the edge.
    pub fn is_wall(&self, col: i32, row: i32) -> bool {
        self.tile_at(col, row) != Some(EMPTY)
    }

    /// grid cell containing a world-space point
    pub fn cell_of(&self, pos: Vec2) -> IVec2 {
        (pos / self.tile_size).floor().as_ivec2()
    }

    pub fn is_wall_at(&self, pos: Vec2) -> bool {
        let cell = self.cell_of(pos);
        self.is_wall(cell.x, cell.y)
    }

    /// world position of a tile's top-left corner
    pub fn tile_origin(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(col as f32, row as f32) * self.tile_size
    }

    /// iterate `(col, row, code)` over every tile, row by row
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(idx, code)| (idx % self.width, idx / self.width, *code))
    }

    /// world-space extent of the whole grid
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * self.tile_size
    }
}

/// Built-in level tables.
pub mod levels {
    /// 8x8 room walled on every side.
    pub const BORDERED_8: [[u8; 8]; 8] = [
        [1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1],
    ];

    /// 9x9 maze with one hidden (yellow) wall.
    pub const COURTYARD: [[u8; 9]; 9] = [
        [1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 1, 1, 0, 1, 0, 0, 1],
        [1, 0, 9, 0, 0, 1, 0, 0, 1],
        [1, 0, 1, 0, 0, 0, 0, 0, 1],
        [1, 0, 1, 0, 1, 1, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1],
    ];

    /// 16x19 level with colored rooms.
    pub const ARENA: [[u8; 16]; 19] = [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 5, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 3, 2, 0, 0, 1],
        [1, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 2, 3, 0, 0, 1],
        [1, 0, 0, 6, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 1, 1, 1, 1, 9, 1, 1, 1, 1, 1, 0, 0, 1],
        [1, 0, 0, 1, 4, 4, 4, 0, 4, 4, 4, 4, 1, 0, 0, 1],
        [1, 0, 0, 1, 4, 0, 0, 0, 0, 0, 0, 4, 1, 0, 0, 1],
        [1, 0, 0, 1, 4, 0, 0, 0, 0, 0, 0, 4, 1, 0, 0, 1],
        [1, 0, 0, 1, 4, 4, 4, 4, 4, 4, 4, 4, 1, 0, 0, 1],
        [1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bordered() -> Map {
        Map::from_rows(&levels::BORDERED_8, 64.).expect("map should build")
    }

    #[test]
    fn out_of_bounds_is_sentinel_and_wall() {
        let map = bordered();
        assert_eq!(map.tile_at(-1, 0), None);
        assert_eq!(map.tile_at(0, 8), None);
        assert_eq!(map.tile_at(8, 3), None);
        assert!(map.is_wall(-1, 4));
        assert!(map.is_wall(4, 100));
    }

    #[test]
    fn lookups_inside_grid() {
        let map = bordered();
        assert_eq!(map.tile_at(0, 0), Some(1));
        assert_eq!(map.tile_at(4, 4), Some(EMPTY));
        assert!(!map.is_wall(3, 5));
        assert!(map.is_wall(7, 2));
    }

    #[test]
    fn world_to_cell() {
        let map = bordered();
        assert_eq!(map.cell_of(Vec2::new(288., 288.)), IVec2::new(4, 4));
        assert_eq!(map.cell_of(Vec2::new(-0.5, 10.)), IVec2::new(-1, 0));
        assert!(map.is_wall_at(Vec2::new(450., 100.)));
        assert_eq!(map.tile_origin(1, 1), Vec2::new(64., 64.));
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows: Vec<Vec<u8>> = vec![vec![1, 1, 1], vec![1, 0]];
        let err = Map::from_rows(&rows, 64.).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn rejects_empty_and_bad_tile_size() {
        let rows: Vec<Vec<u8>> = vec![];
        assert!(Map::from_rows(&rows, 64.).is_err());
        assert!(Map::from_rows(&levels::BORDERED_8, 0.).is_err());
        assert!(Map::from_rows(&levels::BORDERED_8, f32::NAN).is_err());
    }

    #[test]
    fn tiles_iterates_row_major() {
        let map = Map::from_rows(&levels::COURTYARD, 32.).expect("map should build");
        let hidden: Vec<_> = map.tiles().filter(|(_, _, c)| *c == HIDDEN_WALL).collect();
        assert_eq!(hidden, vec![(2, 3, HIDDEN_WALL)]);
        assert_eq!(map.world_size(), Vec2::new(288., 288.));
    }
}
