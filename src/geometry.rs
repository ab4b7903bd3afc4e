use rand::Rng;

use crate::color::Color;
use crate::grid::PixelGrid;
use crate::sampling::{scatter_distance, AxisAngle};

// Each cell splits along the (0,0)-(1,1) diagonal. Corner offsets are in
// cell-local units; winding is counter-clockwise so the +Z normal faces
// the camera.
const UPPER_CORNERS: [(f32, f32); 3] = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
const LOWER_CORNERS: [(f32, f32); 3] = [(0.0, 0.0), (1.0, 1.0), (1.0, 0.0)];
const UPPER_PIVOT: f32 = 0.25;
const LOWER_PIVOT: f32 = 0.75;

/// Interleaved vertex for GPU upload. Mirrors the channel layout of
/// [`FragmentGeometry`], one struct per vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FragmentVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub pivot: [f32; 3],
    pub local_rotation: [f32; 4],
    pub global_rotation: [f32; 4],
    pub global_dist: f32,
    pub color: [f32; 3],
}

/// Flat, non-indexed triangle soup: two triangles per pixel cell, six
/// vertices per cell, every channel aligned to the same vertex order.
///
/// Triangle-level data (pivot, the two rotations, the scatter distance) is
/// replicated across the triangle's three vertices so a shader can read it
/// as ordinary vertex attributes without an index pass.
#[derive(Clone, Debug, Default)]
pub struct FragmentGeometry {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    pivots: Vec<f32>,
    local_rotations: Vec<f32>,
    global_rotations: Vec<f32>,
    global_dists: Vec<f32>,
    colors: Vec<f32>,
}

impl FragmentGeometry {
    fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            normals: Vec::with_capacity(vertices * 3),
            uvs: Vec::with_capacity(vertices * 2),
            pivots: Vec::with_capacity(vertices * 3),
            local_rotations: Vec::with_capacity(vertices * 4),
            global_rotations: Vec::with_capacity(vertices * 4),
            global_dists: Vec::with_capacity(vertices),
            colors: Vec::with_capacity(vertices * 3),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.global_dists.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.global_dists.is_empty()
    }

    /// Vertex positions, 3 floats per vertex.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Vertex normals, 3 floats per vertex, constant `[0, 0, 1]`.
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Texture coordinates, 2 floats per vertex, top-left origin.
    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    /// Per-triangle rotation pivots, 3 floats per vertex.
    pub fn pivots(&self) -> &[f32] {
        &self.pivots
    }

    /// Per-triangle tumbling rotations as `[x, y, z, angle]`, 4 floats per
    /// vertex.
    pub fn local_rotations(&self) -> &[f32] {
        &self.local_rotations
    }

    /// Per-triangle world-origin rotations as `[x, y, z, angle]`, 4 floats
    /// per vertex. Sampled independently of the local rotation.
    pub fn global_rotations(&self) -> &[f32] {
        &self.global_rotations
    }

    /// Per-triangle scatter distances, 1 float per vertex.
    pub fn global_dists(&self) -> &[f32] {
        &self.global_dists
    }

    /// Linear RGB vertex colors, 3 floats per vertex, flat per pixel cell.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Packs all channels into one interleaved vertex buffer.
    pub fn interleave(&self) -> Vec<FragmentVertex> {
        (0..self.vertex_count())
            .map(|i| FragmentVertex {
                position: vec3_at(&self.positions, i),
                normal: vec3_at(&self.normals, i),
                uv: [self.uvs[i * 2], self.uvs[i * 2 + 1]],
                pivot: vec3_at(&self.pivots, i),
                local_rotation: vec4_at(&self.local_rotations, i),
                global_rotation: vec4_at(&self.global_rotations, i),
                global_dist: self.global_dists[i],
                color: vec3_at(&self.colors, i),
            })
            .collect()
    }
}

fn vec3_at(channel: &[f32], i: usize) -> [f32; 3] {
    [channel[i * 3], channel[i * 3 + 1], channel[i * 3 + 2]]
}

fn vec4_at(channel: &[f32], i: usize) -> [f32; 4] {
    [
        channel[i * 4],
        channel[i * 4 + 1],
        channel[i * 4 + 2],
        channel[i * 4 + 3],
    ]
}

/// Builds [`FragmentGeometry`] from a [`PixelGrid`].
///
/// `size` is the world-space length of the mesh's longest edge; the mesh is
/// centered on the origin in the XY plane. `scatter_radius` caps the
/// outward displacement a triangle receives at full scatter.
#[derive(Clone, Copy, Debug)]
pub struct FragmentGeometryBuilder {
    size: f32,
    scatter_radius: f32,
}

impl Default for FragmentGeometryBuilder {
    fn default() -> Self {
        Self {
            size: 1.0,
            scatter_radius: 3.0,
        }
    }
}

impl FragmentGeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, size: f32) -> Self {
        assert!(size > 0.0, "mesh size must be positive");
        self.size = size;
        self
    }

    pub fn scatter_radius(mut self, radius: f32) -> Self {
        assert!(radius > 0.0, "scatter radius must be positive");
        self.scatter_radius = radius;
        self
    }

    /// Builds the triangle soup. The random source drives the per-triangle
    /// rotation and distance sampling; pass a seeded rng for reproducible
    /// output.
    pub fn build<R: Rng>(&self, grid: &PixelGrid, rng: &mut R) -> FragmentGeometry {
        let rows = grid.rows();
        let columns = grid.columns();
        if rows == 0 || columns == 0 {
            return FragmentGeometry::default();
        }

        let cell_size = self.size / rows.max(columns) as f32;
        let layout = CellLayout {
            cell_size,
            half_width: columns as f32 * cell_size / 2.0,
            half_height: rows as f32 * cell_size / 2.0,
            columns: columns as f32,
            rows: rows as f32,
        };

        let mut geometry = FragmentGeometry::with_capacity(rows * columns * 6);
        for y in 0..rows {
            for x in 0..columns {
                let color = grid.get(y, x);
                self.emit_triangle(&mut geometry, &layout, x, y, UPPER_CORNERS, UPPER_PIVOT, color, rng);
                self.emit_triangle(&mut geometry, &layout, x, y, LOWER_CORNERS, LOWER_PIVOT, color, rng);
            }
        }
        geometry
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_triangle<R: Rng>(
        &self,
        geometry: &mut FragmentGeometry,
        layout: &CellLayout,
        x: usize,
        y: usize,
        corners: [(f32, f32); 3],
        pivot_offset: f32,
        color: Color,
        rng: &mut R,
    ) {
        let pivot = layout.point(x, y, pivot_offset, pivot_offset);
        let local = AxisAngle::random(rng).to_array();
        let global = AxisAngle::random(rng).to_array();
        let dist = scatter_distance(rng, self.scatter_radius);

        for (lx, ly) in corners {
            geometry.positions.extend_from_slice(&layout.point(x, y, lx, ly));
            geometry.normals.extend_from_slice(&[0.0, 0.0, 1.0]);
            geometry.uvs.extend_from_slice(&layout.uv(x, y, lx, ly));
            geometry.pivots.extend_from_slice(&pivot);
            geometry.local_rotations.extend_from_slice(&local);
            geometry.global_rotations.extend_from_slice(&global);
            geometry.global_dists.push(dist);
            geometry.colors.extend_from_slice(&[color.r, color.g, color.b]);
        }
    }
}

struct CellLayout {
    cell_size: f32,
    half_width: f32,
    half_height: f32,
    columns: f32,
    rows: f32,
}

impl CellLayout {
    // Image row 0 is the top of the picture, so Y is flipped into
    // world space where +Y is up.
    fn point(&self, x: usize, y: usize, lx: f32, ly: f32) -> [f32; 3] {
        [
            self.cell_size * (x as f32 + lx) - self.half_width,
            self.half_height - self.cell_size * (y as f32 + ly),
            0.0,
        ]
    }

    fn uv(&self, x: usize, y: usize, lx: f32, ly: f32) -> [f32; 2] {
        [(x as f32 + lx) / self.columns, (y as f32 + ly) / self.rows]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn quad_grid() -> PixelGrid {
        PixelGrid::parse_rows(&["red green", "blue white"]).unwrap()
    }

    #[test]
    fn vertex_and_triangle_counts() {
        let mut rng = SmallRng::seed_from_u64(1);
        let grid = PixelGrid::parse_rows(&["red red red", "red red red"]).unwrap();
        let geometry = FragmentGeometryBuilder::new().build(&grid, &mut rng);

        assert_eq!(geometry.vertex_count(), 2 * 3 * 6);
        assert_eq!(geometry.triangle_count(), 2 * 3 * 2);
        assert_eq!(geometry.positions().len(), geometry.vertex_count() * 3);
        assert_eq!(geometry.uvs().len(), geometry.vertex_count() * 2);
        assert_eq!(geometry.local_rotations().len(), geometry.vertex_count() * 4);
    }

    #[test]
    fn empty_grids_build_empty_meshes() {
        let mut rng = SmallRng::seed_from_u64(1);
        let builder = FragmentGeometryBuilder::new();

        let geometry = builder.build(&PixelGrid::empty(), &mut rng);
        assert!(geometry.is_empty());
        assert_eq!(geometry.triangle_count(), 0);

        // one row, zero columns
        let grid = PixelGrid::from_rows(vec![vec![]]).unwrap();
        assert!(builder.build(&grid, &mut rng).is_empty());
    }

    #[test]
    fn two_by_two_example_spans_centered_square() {
        let mut rng = SmallRng::seed_from_u64(3);
        let geometry = FragmentGeometryBuilder::new()
            .size(2.0)
            .scatter_radius(1.0)
            .build(&quad_grid(), &mut rng);

        assert_eq!(geometry.triangle_count(), 8);
        assert_eq!(geometry.vertex_count(), 24);

        // cellSize = 2 / 2 = 1, so the mesh covers [-1, 1] x [-1, 1]
        let xs: Vec<f32> = geometry.positions().iter().step_by(3).copied().collect();
        let ys: Vec<f32> = geometry.positions().iter().skip(1).step_by(3).copied().collect();
        assert_eq!(xs.iter().cloned().fold(f32::INFINITY, f32::min), -1.0);
        assert_eq!(xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max), 1.0);
        assert_eq!(ys.iter().cloned().fold(f32::INFINITY, f32::min), -1.0);
        assert_eq!(ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max), 1.0);

        // cell (0,0) is the top-left quadrant: x in [-1, 0], y in [0, 1]
        for i in 0..6 {
            let x = geometry.positions()[i * 3];
            let y = geometry.positions()[i * 3 + 1];
            assert!((-1.0..=0.0).contains(&x), "x = {x}");
            assert!((0.0..=1.0).contains(&y), "y = {y}");
        }
    }

    #[test]
    fn mesh_is_centered_on_origin() {
        let mut rng = SmallRng::seed_from_u64(5);
        let grid = PixelGrid::parse_rows(&["red red red red", "red red red red"]).unwrap();
        let geometry = FragmentGeometryBuilder::new().size(3.0).build(&grid, &mut rng);

        let n = geometry.vertex_count() as f32;
        let mean_x: f32 = geometry.positions().iter().step_by(3).sum::<f32>() / n;
        let mean_y: f32 = geometry.positions().iter().skip(1).step_by(3).sum::<f32>() / n;
        assert!(mean_x.abs() < 1e-5, "mean x = {mean_x}");
        assert!(mean_y.abs() < 1e-5, "mean y = {mean_y}");
    }

    #[test]
    fn triangle_attributes_are_replicated_and_independent() {
        let mut rng = SmallRng::seed_from_u64(9);
        let geometry = FragmentGeometryBuilder::new().build(&quad_grid(), &mut rng);

        for tri in 0..geometry.triangle_count() {
            let v0 = tri * 3;
            for v in v0 + 1..v0 + 3 {
                assert_eq!(vec3_at(geometry.pivots(), v0), vec3_at(geometry.pivots(), v));
                assert_eq!(
                    vec4_at(geometry.local_rotations(), v0),
                    vec4_at(geometry.local_rotations(), v)
                );
                assert_eq!(
                    vec4_at(geometry.global_rotations(), v0),
                    vec4_at(geometry.global_rotations(), v)
                );
                assert_eq!(geometry.global_dists()[v0], geometry.global_dists()[v]);
            }
            // the two rotations are drawn separately
            assert_ne!(
                vec4_at(geometry.local_rotations(), v0),
                vec4_at(geometry.global_rotations(), v0)
            );
        }

        // both cell triangles sample on their own
        assert_ne!(
            vec4_at(geometry.local_rotations(), 0),
            vec4_at(geometry.local_rotations(), 3)
        );
    }

    #[test]
    fn scatter_distances_respect_radius_band() {
        let mut rng = SmallRng::seed_from_u64(13);
        let radius = 5.0;
        let geometry = FragmentGeometryBuilder::new()
            .scatter_radius(radius)
            .build(&quad_grid(), &mut rng);

        for &d in geometry.global_dists() {
            assert!(d >= 0.2 * radius && d <= radius, "distance {d}");
        }
    }

    #[test]
    fn uv_corners_map_to_unit_square() {
        let mut rng = SmallRng::seed_from_u64(17);
        let grid = PixelGrid::parse_rows(&["red green blue", "white black cyan"]).unwrap();
        let geometry = FragmentGeometryBuilder::new().build(&grid, &mut rng);

        let uvs = geometry.uvs();
        let pairs: Vec<(f32, f32)> = uvs.chunks_exact(2).map(|c| (c[0], c[1])).collect();
        assert!(pairs.contains(&(0.0, 0.0)));
        assert!(pairs.contains(&(1.0, 1.0)));
        for &(u, v) in &pairs {
            assert!((0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn pivots_are_biased_into_their_triangle() {
        let mut rng = SmallRng::seed_from_u64(19);
        let grid = PixelGrid::parse_rows(&["red"]).unwrap();
        let geometry = FragmentGeometryBuilder::new().size(1.0).build(&grid, &mut rng);

        // 1x1 grid: cell spans [-0.5, 0.5]^2, upper pivot at local (0.25, 0.25)
        assert_eq!(vec3_at(geometry.pivots(), 0), [-0.25, 0.25, 0.0]);
        // lower pivot at local (0.75, 0.75)
        assert_eq!(vec3_at(geometry.pivots(), 3), [0.25, -0.25, 0.0]);
    }

    #[test]
    fn colors_are_flat_per_cell() {
        let mut rng = SmallRng::seed_from_u64(23);
        let grid = quad_grid();
        let geometry = FragmentGeometryBuilder::new().build(&grid, &mut rng);

        let expected = [
            grid.get(0, 0),
            grid.get(0, 1),
            grid.get(1, 0),
            grid.get(1, 1),
        ];
        for (cell, color) in expected.iter().enumerate() {
            for v in cell * 6..(cell + 1) * 6 {
                assert_eq!(
                    vec3_at(geometry.colors(), v),
                    [color.r, color.g, color.b],
                    "vertex {v} of cell {cell}"
                );
            }
        }
    }

    #[test]
    fn interleaved_buffer_matches_channels() {
        let mut rng = SmallRng::seed_from_u64(29);
        let geometry = FragmentGeometryBuilder::new().build(&quad_grid(), &mut rng);
        let vertices = geometry.interleave();

        assert_eq!(vertices.len(), geometry.vertex_count());
        for (i, vertex) in vertices.iter().enumerate() {
            assert_eq!(vertex.position, vec3_at(geometry.positions(), i));
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
            assert_eq!(vertex.global_dist, geometry.global_dists()[i]);
            assert_eq!(vertex.color, vec3_at(geometry.colors(), i));
        }

        // Pod layout: 23 floats per vertex, castable to a raw byte slice
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), vertices.len() * 23 * 4);
    }
}
