use anyhow::{anyhow, bail, Context, Result};
use raymarch_units::{Distance, Point, Size};

use crate::Color;

/// Default edge length of a grid cell, one centimetre on every axis.
pub const DEFAULT_CELL_SIZE: Size = Size::meters(0.01, 0.01, 0.01);

/// Dense voxel grid of colors covering `[0, bounds]` on every axis.
///
/// Every point handed to the scene is clipped into the bounds before it is turned into a cell
/// index, so lookups can never go out of range. Cells are stored in a single flat buffer, x-major.
#[derive(Debug, Clone)]
pub struct Scene {
    bounds: Size,
    cell_size: Size,
    dimensions: [usize; 3],
    cells: Vec<Color>,
}

impl Scene {
    /// Allocates a scene of `bounds / cell_size` cells per axis (truncated), all set to background.
    pub fn new(bounds: Size, cell_size: Size) -> Result<Self> {
        raymarch_profiling::profile_function!();

        if !bounds.is_positive() {
            bail!("Scene bounds must be positive and finite, got {:?}", bounds);
        }
        if !cell_size.is_positive() {
            bail!("Scene cell size must be positive and finite, got {:?}", cell_size);
        }

        let dimensions = [
            (bounds.length / cell_size.length) as usize,
            (bounds.width / cell_size.width) as usize,
            (bounds.height / cell_size.height) as usize,
        ];
        if dimensions.contains(&0) {
            bail!(
                "Scene bounds {:?} are smaller than a single cell {:?}",
                bounds,
                cell_size
            );
        }

        let cell_count = dimensions
            .iter()
            .try_fold(1usize, |count, &dim| count.checked_mul(dim))
            .ok_or_else(|| anyhow!("Scene of {:?} cells is too large to address", dimensions))?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(cell_count)
            .with_context(|| format!("Failed to allocate {} scene cells", cell_count))?;
        cells.resize(cell_count, Color::BACKGROUND);

        log::debug!(
            "Allocated scene of {}x{}x{} cells",
            dimensions[0],
            dimensions[1],
            dimensions[2]
        );

        Ok(Self {
            bounds,
            cell_size,
            dimensions,
            cells,
        })
    }

    pub fn with_bounds(bounds: Size) -> Result<Self> {
        Self::new(bounds, DEFAULT_CELL_SIZE)
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn cell_size(&self) -> Size {
        self.cell_size
    }

    /// Number of cells along x, y and z.
    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn painted_cell_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_background()).count()
    }

    /// Clamps every axis of `point` into `[0, bound]`. The flag reports whether any axis changed.
    pub fn clip_point(&self, point: Point) -> (Point, bool) {
        let clipped = Point::new(
            point.x.clamp(Distance::ZERO, self.bounds.length),
            point.y.clamp(Distance::ZERO, self.bounds.width),
            point.z.clamp(Distance::ZERO, self.bounds.height),
        );

        (clipped, clipped != point)
    }

    /// Paints every cell between the two corners, inclusive on both ends. Corners are clipped to
    /// the scene and may be given in any order.
    pub fn paint_slab(&mut self, corner1: Point, corner2: Point, color: Color) {
        raymarch_profiling::profile_function!();

        let (corner1, _) = self.clip_point(corner1);
        let (corner2, _) = self.clip_point(corner2);

        let [x0, y0, z0] = self.cell_index(corner1.min(corner2));
        let [x1, y1, z1] = self.cell_index(corner1.max(corner2));

        for x in x0..=x1 {
            for y in y0..=y1 {
                let start = self.linear_index(x, y, z0);
                self.cells[start..=start + (z1 - z0)].fill(color);
            }
        }

        log::debug!(
            "Painted slab [{}, {}, {}]..=[{}, {}, {}] with {:?}",
            x0,
            y0,
            z0,
            x1,
            y1,
            z1,
            color
        );
    }

    /// Paints the axis aligned box of extent `size` centred on `centroid`.
    pub fn paint_cuboid(&mut self, centroid: Point, size: Size, color: Color) {
        let half_extent = Point::from(size) * 0.5;
        self.paint_slab(centroid - half_extent, centroid + half_extent, color);
    }

    pub fn lookup(&self, point: Point) -> Color {
        let (point, _) = self.clip_point(point);
        let [x, y, z] = self.cell_index(point);
        self.cells[self.linear_index(x, y, z)]
    }

    /// Returns the color of the first painted cell visited by `points`, or background if none is.
    ///
    /// Points are tested in the order given. Rays are generated from the sensor outwards, so the
    /// first hit is also the nearest one. Points outside the scene are clipped onto its boundary
    /// and still tested. Features thinner than the spacing between consecutive points can be
    /// skipped.
    pub fn evaluate_ray(&self, points: &[Point]) -> Color {
        points
            .iter()
            .map(|point| self.lookup(*point))
            .find(|color| !color.is_background())
            .unwrap_or(Color::BACKGROUND)
    }

    /// Cell containing an already clipped point. Points exactly on the upper bound map to the last
    /// cell.
    fn cell_index(&self, point: Point) -> [usize; 3] {
        let axis = |coordinate: Distance, cell: Distance, dimension: usize| {
            ((coordinate / cell) as usize).min(dimension - 1)
        };

        [
            axis(point.x, self.cell_size.length, self.dimensions[0]),
            axis(point.y, self.cell_size.width, self.dimensions[1]),
            axis(point.z, self.cell_size.height, self.dimensions[2]),
        ]
    }

    fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
        let [_, width, height] = self.dimensions;
        x * width * height + y * height + z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_scene() -> Scene {
        Scene::with_bounds(Size::meters(4.0, 4.0, 2.0)).unwrap()
    }

    #[test]
    fn clip_clamps_each_axis() {
        let scene = small_scene();

        assert_eq!(
            scene.clip_point(Point::meters(5.0, 1.0, 1.0)),
            (Point::meters(4.0, 1.0, 1.0), true)
        );
        assert_eq!(
            scene.clip_point(Point::meters(-1.0, 1.0, 1.0)),
            (Point::meters(0.0, 1.0, 1.0), true)
        );
        assert_eq!(
            scene.clip_point(Point::meters(2.0, 3.0, 1.5)),
            (Point::meters(2.0, 3.0, 1.5), false)
        );
        assert_eq!(
            scene.clip_point(Point::meters(-3.0, 9.0, 2.5)),
            (Point::meters(0.0, 4.0, 2.0), true)
        );
    }

    #[test]
    fn clip_is_idempotent() {
        let scene = small_scene();

        for x in [-2.5, -0.001, 0.0, 1.7, 4.0, 4.001, 100.0] {
            for y in [-1.0, 0.3, 3.99, 4.5] {
                for z in [-0.2, 0.0, 1.0, 2.0, 7.0] {
                    let (once, _) = scene.clip_point(Point::meters(x, y, z));
                    let (twice, clipped_again) = scene.clip_point(once);

                    assert_eq!(once, twice);
                    assert!(!clipped_again);
                }
            }
        }
    }

    #[test]
    fn grid_is_sized_by_truncating_division() {
        let scene = Scene::new(Size::meters(5.0, 5.0, 2.0), DEFAULT_CELL_SIZE).unwrap();

        assert_eq!(scene.dimensions(), [500, 500, 200]);
        assert_eq!(scene.cell_count(), 500 * 500 * 200);
        assert_eq!(scene.painted_cell_count(), 0);
    }

    #[test]
    fn coarse_cells_truncate() {
        let scene = Scene::new(Size::meters(1.0, 1.0, 1.0), Size::meters(0.3, 0.4, 0.6)).unwrap();
        assert_eq!(scene.dimensions(), [3, 2, 1]);
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        assert!(Scene::new(Size::meters(1.0, 1.0, 1.0), Size::meters(0.0, 0.01, 0.01)).is_err());
        assert!(Scene::new(Size::meters(-1.0, 1.0, 1.0), DEFAULT_CELL_SIZE).is_err());
        assert!(Scene::new(Size::meters(0.001, 1.0, 1.0), DEFAULT_CELL_SIZE).is_err());
    }

    #[test]
    fn unaddressable_scene_fails_instead_of_aborting() {
        let result = Scene::with_bounds(Size::meters(1.0e7, 1.0e7, 1.0e7));
        assert!(result.is_err());
    }

    #[test]
    fn painted_slab_is_found_by_ray() {
        let mut scene = small_scene();
        scene.paint_slab(
            Point::meters(3.0, 1.0, 0.5),
            Point::meters(3.0, 1.1, 1.5),
            Color::WHITE,
        );

        let through = [
            Point::meters(2.5, 1.05, 1.0),
            Point::meters(3.0, 1.05, 1.0),
            Point::meters(3.5, 1.05, 1.0),
        ];
        let beside = [
            Point::meters(2.5, 2.05, 1.0),
            Point::meters(3.0, 2.05, 1.0),
            Point::meters(3.5, 2.05, 1.0),
        ];

        assert_eq!(scene.evaluate_ray(&through), Color::WHITE);
        assert_eq!(scene.evaluate_ray(&beside), Color::BACKGROUND);
        assert_eq!(scene.evaluate_ray(&[]), Color::BACKGROUND);
    }

    #[test]
    fn reversed_corners_paint_the_same_cells() {
        let mut ordered = small_scene();
        let mut reversed = small_scene();
        let a = Point::meters(1.0, 2.0, 0.5);
        let b = Point::meters(1.2, 2.5, 0.7);
        let color = Color::new(10, 20, 30);

        ordered.paint_slab(a, b, color);
        reversed.paint_slab(b, a, color);
        // Mixed order on a single axis.
        let mut mixed = small_scene();
        mixed.paint_slab(Point::meters(1.2, 2.0, 0.5), Point::meters(1.0, 2.5, 0.7), color);

        assert!(ordered.painted_cell_count() > 0);
        assert_eq!(ordered.cells, reversed.cells);
        assert_eq!(ordered.cells, mixed.cells);
        assert_eq!(reversed.lookup(Point::meters(1.1, 2.2, 0.6)), color);
    }

    #[test]
    fn slab_outside_bounds_is_clipped() {
        let mut scene = small_scene();
        scene.paint_slab(
            Point::meters(-1.0, -1.0, -1.0),
            Point::meters(0.015, 0.015, 0.015),
            Color::WHITE,
        );

        assert_eq!(scene.painted_cell_count(), 8);
        assert_eq!(scene.lookup(Point::meters(-5.0, -5.0, -5.0)), Color::WHITE);
    }

    #[test]
    fn upper_bound_maps_to_last_cell() {
        let mut scene = small_scene();
        scene.paint_slab(
            Point::meters(4.0, 4.0, 2.0),
            Point::meters(4.0, 4.0, 2.0),
            Color::WHITE,
        );

        assert_eq!(scene.painted_cell_count(), 1);
        assert_eq!(scene.lookup(Point::meters(3.995, 3.995, 1.995)), Color::WHITE);
        assert_eq!(scene.lookup(Point::meters(10.0, 10.0, 10.0)), Color::WHITE);
    }

    #[test]
    fn cuboid_covers_its_extent() {
        let mut scene = small_scene();
        let color = Color::new(200, 0, 0);
        scene.paint_cuboid(Point::meters(2.0, 2.0, 1.0), Size::meters(0.2, 0.4, 0.1), color);

        assert_eq!(scene.lookup(Point::meters(1.905, 1.805, 0.955)), color);
        assert_eq!(scene.lookup(Point::meters(2.095, 2.195, 1.045)), color);
        assert_eq!(scene.lookup(Point::meters(1.85, 2.0, 1.0)), Color::BACKGROUND);
        assert_eq!(scene.lookup(Point::meters(2.0, 2.0, 1.1)), Color::BACKGROUND);
    }

    #[test]
    fn first_hit_along_the_ray_wins() {
        let mut scene = small_scene();
        let near = Color::new(1, 1, 1);
        let far = Color::new(255, 0, 0);
        scene.paint_slab(Point::meters(1.0, 0.0, 0.0), Point::meters(1.0, 4.0, 2.0), near);
        scene.paint_slab(Point::meters(2.0, 0.0, 0.0), Point::meters(2.0, 4.0, 2.0), far);

        let ray: Vec<Point> = (0..500)
            .map(|i| Point::meters(i as f64 * 0.005, 1.0, 1.0))
            .collect();
        let reversed: Vec<Point> = ray.iter().rev().copied().collect();

        assert_eq!(scene.evaluate_ray(&ray), near);
        assert_eq!(scene.evaluate_ray(&reversed), far);
    }
}
