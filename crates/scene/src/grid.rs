use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::texture::TextureHandle;

/// Dimensions of the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    /// Edge length of one square tile, in world units.
    pub tile_size: f32,
    /// Gap between neighbouring tiles, in world units.
    pub spacing: f32,
}

impl GridSpec {
    /// The grid every scene is built with.
    pub const DEFAULT: GridSpec = GridSpec {
        rows: 20,
        cols: 20,
        tile_size: 100.0,
        spacing: 2.0,
    };

    /// Distance between the centers of adjacent tiles.
    pub fn pitch(&self) -> f32 {
        self.tile_size + self.spacing
    }

    pub fn tile_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// World-space center of the tile at row-major `index`.
    pub fn placement(&self, index: usize) -> TilePlacement {
        let cols = self.cols.max(1) as usize;
        let col = (index % cols) as u32;
        let row = (index / cols) as u32;
        let pitch = self.pitch();
        let x = col as f32 * pitch - (self.cols as f32 - 1.0) * pitch / 2.0;
        let y = row as f32 * pitch - (self.rows as f32 - 1.0) * pitch / 2.0;
        TilePlacement {
            row,
            col,
            position: Vec3::new(x, y, 0.0),
        }
    }

    /// Every placement in row-major order.
    pub fn layout(&self) -> impl Iterator<Item = TilePlacement> + '_ {
        (0..self.tile_count()).map(move |i| self.placement(i))
    }

    /// Size of the area covered by the grid, outer edge to outer edge.
    pub fn extent(&self) -> Vec2 {
        let span = |n: u32| {
            if n == 0 {
                0.0
            } else {
                n as f32 * self.tile_size + (n - 1) as f32 * self.spacing
            }
        };
        Vec2::new(span(self.cols), span(self.rows))
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Grid cell and its world position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub row: u32,
    pub col: u32,
    pub position: Vec3,
}

/// One textured quad of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub placement: TilePlacement,
    pub size: f32,
    pub texture: TextureHandle,
}

impl Tile {
    pub fn position(&self) -> Vec3 {
        self.placement.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_centered(spec: GridSpec) {
        let (sx, sy) = spec
            .layout()
            .fold((0.0f64, 0.0f64), |(sx, sy), p| {
                (sx + p.position.x as f64, sy + p.position.y as f64)
            });
        assert!(sx.abs() < 1e-3, "x sum {sx} for {spec:?}");
        assert!(sy.abs() < 1e-3, "y sum {sy} for {spec:?}");
    }

    #[test]
    fn grid_is_centered_for_any_parity() {
        for rows in 1..=7 {
            for cols in 1..=7 {
                assert_centered(GridSpec {
                    rows,
                    cols,
                    ..GridSpec::DEFAULT
                });
            }
        }
        assert_centered(GridSpec::DEFAULT);
    }

    #[test]
    fn one_tile_per_cell() {
        let spec = GridSpec {
            rows: 3,
            cols: 5,
            ..GridSpec::DEFAULT
        };
        let cells: HashSet<(u32, u32)> = spec.layout().map(|p| (p.row, p.col)).collect();
        assert_eq!(spec.layout().count(), 15);
        assert_eq!(cells.len(), 15);
    }

    #[test]
    fn default_grid_corners() {
        let spec = GridSpec::DEFAULT;
        assert_eq!(spec.tile_count(), 400);
        // (20 - 1) * 102 / 2
        let first = spec.placement(0);
        assert_eq!(first.position, Vec3::new(-969.0, -969.0, 0.0));
        let last = spec.placement(399);
        assert_eq!((last.row, last.col), (19, 19));
        assert_eq!(last.position, Vec3::new(969.0, 969.0, 0.0));
    }

    #[test]
    fn row_major_order() {
        let spec = GridSpec::DEFAULT;
        let p = spec.placement(21);
        assert_eq!((p.row, p.col), (1, 1));
        assert_eq!(p.position.x - spec.placement(20).position.x, spec.pitch());
    }

    #[test]
    fn extent_covers_tiles_and_gaps() {
        assert_eq!(GridSpec::DEFAULT.extent(), Vec2::splat(2038.0));
        let empty = GridSpec {
            rows: 0,
            cols: 0,
            ..GridSpec::DEFAULT
        };
        assert_eq!(empty.extent(), Vec2::ZERO);
        assert_eq!(empty.layout().count(), 0);
    }
}
