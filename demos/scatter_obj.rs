//! Builds fragment geometry for a small pixel-art heart and writes OBJ
//! snapshots of the scatter transition.
//!
//!     cargo run --example scatter_obj

use std::fmt::Write as _;
use std::fs;

use anyhow::Context;
use pixel_scatter::{transition, FragmentGeometryBuilder, PixelGrid};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const HEART: &[&str] = &[
    "white crimson crimson white crimson crimson white",
    "crimson pink pink crimson pink pink crimson",
    "crimson pink pink pink pink pink crimson",
    "white crimson pink pink pink crimson white",
    "white white crimson pink crimson white white",
    "white white white crimson white white white",
];

fn main() -> anyhow::Result<()> {
    let grid = PixelGrid::parse_rows(HEART).context("parsing pixel art")?;
    let mut rng = SmallRng::seed_from_u64(0xC0FFEE);
    let geometry = FragmentGeometryBuilder::new()
        .size(2.0)
        .scatter_radius(4.0)
        .build(&grid, &mut rng);

    println!(
        "built {} triangles ({} vertices) from a {}x{} grid",
        geometry.triangle_count(),
        geometry.vertex_count(),
        grid.rows(),
        grid.columns(),
    );

    for (label, progress) in [("assembled", 0.0), ("half", 0.5), ("scattered", 1.0)] {
        let positions = transition::scattered_positions(&geometry, progress);
        let path = format!("scatter_{label}.obj");
        fs::write(&path, to_obj(&positions, geometry.colors()))
            .with_context(|| format!("writing {path}"))?;
        println!("wrote {path} (progress {progress})");
    }

    Ok(())
}

fn to_obj(positions: &[[f32; 3]], colors: &[f32]) -> String {
    let mut obj = String::new();
    for (i, p) in positions.iter().enumerate() {
        // vertex color extension: v x y z r g b
        let _ = writeln!(
            obj,
            "v {} {} {} {} {} {}",
            p[0],
            p[1],
            p[2],
            colors[i * 3],
            colors[i * 3 + 1],
            colors[i * 3 + 2],
        );
    }
    for tri in 0..positions.len() / 3 {
        let base = tri * 3 + 1;
        let _ = writeln!(obj, "f {} {} {}", base, base + 1, base + 2);
    }
    obj
}
