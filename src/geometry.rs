//! Frustum and chunk-corner geometry.
//!
//! Frustum corners come in as two quads, near then far, each wound
//! `(-1,-1), (-1,+1), (+1,+1), (+1,-1)` in normalized device
//! coordinates. Planes derived from them have inward-pointing normals,
//! so a point is inside the frustum when it sits on or in front of all
//! six planes.

use itertools::iproduct;
use nalgebra::Vector3;

/// Plane as `[a, b, c, d]` with `a*x + b*y + c*z + d = 0`.
pub type Plane = [f64; 4];

/// Near and far quads, four corners each.
pub type FrustumCorners = [[[f64; 3]; 4]; 2];

/// An axis-aligned box as its eight corners. Corner `k` takes the
/// maximum bound on axis `a` when bit `2 - a` of `k` is set, so corner
/// 0 is the minimum corner and corner 7 the maximum.
pub type BoxCorners = [[usize; 3]; 8];

const DEGENERATE_NORM: f64 = 1e-12;

fn plane_from_points(
    p0: Vector3<f64>,
    p1: Vector3<f64>,
    p2: Vector3<f64>,
    interior: Vector3<f64>,
) -> Plane {
    let normal = (p1 - p0).cross(&(p2 - p0));
    let norm = normal.norm();
    if norm < DEGENERATE_NORM {
        // Collapsed quad edge; a zero plane keeps every point "inside".
        return [0.0; 4];
    }
    let normal = normal / norm;
    let mut d = -normal.dot(&p0);
    // Orient the normal towards the frustum interior.
    if normal.dot(&interior) + d < 0.0 {
        [-normal.x, -normal.y, -normal.z, -d]
    } else {
        [normal.x, normal.y, normal.z, d]
    }
}

/// Derive the six bounding planes of a frustum from its corners, in
/// the order near, far, then the four side planes.
pub fn frustum_planes_from_corners(corners: &FrustumCorners) -> [Plane; 6] {
    let near: Vec<Vector3<f64>> = corners[0].iter().map(|c| Vector3::from(*c)).collect();
    let far: Vec<Vector3<f64>> = corners[1].iter().map(|c| Vector3::from(*c)).collect();

    let interior = near
        .iter()
        .chain(far.iter())
        .fold(Vector3::zeros(), |acc, corner| acc + corner)
        / 8.0;

    [
        plane_from_points(near[0], near[1], near[2], interior),
        plane_from_points(far[0], far[1], far[2], interior),
        plane_from_points(near[3], near[0], far[0], interior),
        plane_from_points(near[1], near[2], far[2], interior),
        plane_from_points(near[2], near[3], far[3], interior),
        plane_from_points(near[0], near[1], far[1], interior),
    ]
}

/// Whether `point` lies on or in front of `plane`.
pub fn point_in_front_of_plane(point: [f64; 3], plane: Plane) -> bool {
    plane[0] * point[0] + plane[1] * point[1] + plane[2] * point[2] + plane[3] >= 0.0
}

/// Whether `point` lies inside the frustum described by `planes`.
pub fn point_in_frustum(point: [f64; 3], planes: &[Plane; 6]) -> bool {
    planes
        .iter()
        .all(|plane| point_in_front_of_plane(point, *plane))
}

/// Test many points against the same frustum.
pub fn points_in_frustum(points: &[[f64; 3]], planes: &[Plane; 6]) -> Vec<bool> {
    points
        .iter()
        .map(|point| point_in_frustum(*point, planes))
        .collect()
}

/// Corner coordinates for every chunk of a chunked 3D array, in
/// row-major chunk order. Edge chunks are clipped to the array shape.
pub fn compute_chunk_corners_3d(array_shape: [usize; 3], chunk_shape: [usize; 3]) -> Vec<BoxCorners> {
    let n_chunks = [
        (array_shape[0] + chunk_shape[0] - 1) / chunk_shape[0],
        (array_shape[1] + chunk_shape[1] - 1) / chunk_shape[1],
        (array_shape[2] + chunk_shape[2] - 1) / chunk_shape[2],
    ];

    iproduct!(0..n_chunks[0], 0..n_chunks[1], 0..n_chunks[2])
        .map(|(c0, c1, c2)| {
            let min = [
                c0 * chunk_shape[0],
                c1 * chunk_shape[1],
                c2 * chunk_shape[2],
            ];
            let max = [
                (min[0] + chunk_shape[0]).min(array_shape[0]),
                (min[1] + chunk_shape[1]).min(array_shape[1]),
                (min[2] + chunk_shape[2]).min(array_shape[2]),
            ];
            let mut corners = [[0usize; 3]; 8];
            for (k, corner) in corners.iter_mut().enumerate() {
                for axis in 0..3 {
                    corner[axis] = if k >> (2 - axis) & 1 == 1 {
                        max[axis]
                    } else {
                        min[axis]
                    };
                }
            }
            corners
        })
        .collect()
}

fn quad_extent(quad: &[[f64; 3]; 4]) -> (f64, f64) {
    let edge = |a: usize, b: usize| {
        let (pa, pb) = (Vector3::from(quad[a]), Vector3::from(quad[b]));
        (pa - pb).norm()
    };
    // Corners are wound so edges 1-2 and 3-0 span the width.
    let width = edge(1, 2).max(edge(3, 0));
    let height = edge(0, 1).max(edge(2, 3));
    (width, height)
}

/// Width and height of the frustum cross-section, taking the larger of
/// the near and far quads per direction.
pub fn frustum_size_from_corners(corners: &FrustumCorners) -> (f64, f64) {
    let (near_w, near_h) = quad_extent(&corners[0]);
    let (far_w, far_h) = quad_extent(&corners[1]);
    (near_w.max(far_w), near_h.max(far_h))
}

/// Largest cross-section extent of the frustum in either direction.
pub fn frustum_width_from_corners(corners: &FrustumCorners) -> f64 {
    let (width, height) = frustum_size_from_corners(corners);
    width.max(height)
}

/// The twelve edges of a frustum: four around the near quad, four
/// around the far quad, then the four connecting edges.
pub fn frustum_edges_from_corners(corners: &FrustumCorners) -> [[[f64; 3]; 2]; 12] {
    let near = &corners[0];
    let far = &corners[1];
    let mut edges = [[[0.0; 3]; 2]; 12];
    for i in 0..4 {
        edges[i] = [near[i], near[(i + 1) % 4]];
        edges[4 + i] = [far[i], far[(i + 1) % 4]];
        edges[8 + i] = [near[i], far[i]];
    }
    edges
}
