//! Turns a small raster image into a scatterable triangle mesh.
//!
//! Every pixel cell becomes two triangles carrying, besides the usual
//! position/normal/uv/color channels, per-triangle scatter metadata: a
//! rotation pivot, two independently sampled axis-angle rotations and an
//! outward scatter distance. A shader (or [`transition::scattered_positions`]
//! on the CPU) interpolates each triangle between the assembled image and a
//! tumbling, exploded cloud.
//!
//! ```
//! use pixel_scatter::{FragmentGeometryBuilder, PixelGrid};
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let grid = PixelGrid::parse_rows(&["red green", "blue white"]).unwrap();
//! let mut rng = SmallRng::seed_from_u64(42);
//! let geometry = FragmentGeometryBuilder::new()
//!     .size(2.0)
//!     .scatter_radius(1.0)
//!     .build(&grid, &mut rng);
//!
//! assert_eq!(geometry.triangle_count(), 2 * 2 * 2);
//! ```

mod color;
mod error;
mod geometry;
mod grid;
mod sampling;
pub mod transition;

pub use color::Color;
pub use error::{ColorParseError, GeometryError};
pub use geometry::{FragmentGeometry, FragmentGeometryBuilder, FragmentVertex};
pub use grid::PixelGrid;
pub use sampling::{scatter_distance, AxisAngle};
