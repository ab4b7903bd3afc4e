use cgmath::{InnerSpace, Quaternion, Rad, Rotation, Rotation3, Vector3};

use crate::geometry::FragmentGeometry;

/// CPU reference for the scatter/assemble transition a shader would run on
/// the attribute channels.
///
/// `progress` runs from `0.0` (assembled image) to `1.0` (fully scattered).
/// Each vertex is tumbled about its triangle pivot by the local rotation,
/// pushed outward from the mesh origin by its scatter distance, then swung
/// about the world origin by the global rotation, with all three effects
/// scaled by `progress`.
pub fn scattered_positions(geometry: &FragmentGeometry, progress: f32) -> Vec<[f32; 3]> {
    let progress = progress.clamp(0.0, 1.0);
    let positions = geometry.positions();
    let pivots = geometry.pivots();
    let locals = geometry.local_rotations();
    let globals = geometry.global_rotations();
    let dists = geometry.global_dists();

    let mut out = Vec::with_capacity(geometry.vertex_count());
    for i in 0..geometry.vertex_count() {
        let position = Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]);
        let pivot = Vector3::new(pivots[i * 3], pivots[i * 3 + 1], pivots[i * 3 + 2]);

        let tumbled = pivot + scaled_rotation(&locals[i * 4..i * 4 + 4], progress)
            .rotate_vector(position - pivot);

        // Triangles radiate away from the mesh center along their pivot
        // direction; a pivot sitting on the origin escapes along +Z.
        let radial = if pivot.magnitude2() > 1e-12 {
            pivot.normalize()
        } else {
            Vector3::unit_z()
        };
        let displaced = tumbled + radial * (dists[i] * progress);

        let swept = scaled_rotation(&globals[i * 4..i * 4 + 4], progress).rotate_vector(displaced);
        out.push([swept.x, swept.y, swept.z]);
    }
    out
}

fn scaled_rotation(axis_angle: &[f32], progress: f32) -> Quaternion<f32> {
    let axis = Vector3::new(axis_angle[0], axis_angle[1], axis_angle[2]);
    Quaternion::from_axis_angle(axis, Rad(axis_angle[3] * progress))
}
