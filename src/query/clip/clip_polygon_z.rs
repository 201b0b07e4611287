use crate::math::{Point3, Real};

/// Cuts a polygon with the horizontal plane at elevation `z`.
///
/// If `keep_less_than` is `true`, the part of the polygon below the plane is kept,
/// otherwise the part above it is. Vertices lying exactly on the plane are kept on
/// either side. Every edge crossing the plane is cut and contributes one new vertex,
/// so the result has at most `polygon.len()` plus the number of crossing edges
/// vertices. The winding of the input is preserved.
///
/// The result is written to `result`, which is cleared first.
pub fn clip_polygon_z(polygon: &[Point3], z: Real, keep_less_than: bool, result: &mut Vec<Point3>) {
    result.clear();

    let Some(last_pt) = polygon.last() else {
        return;
    };

    let keep_point = |pt: &Point3| {
        if keep_less_than {
            pt.z <= z
        } else {
            pt.z >= z
        }
    };
    let mut last_keep = keep_point(last_pt);

    if last_keep {
        result.push(*last_pt);
    }

    for i in 0..polygon.len() {
        let pt = &polygon[i];
        let keep = keep_point(pt);

        if keep != last_keep {
            // The edge crosses the plane: cut it at the plane height.
            let prev_i = if i == 0 { polygon.len() - 1 } else { i - 1 };
            let prev_pt = &polygon[prev_i];
            let dz = pt.z - prev_pt.z;

            if dz != 0.0 {
                let toi = (z - prev_pt.z) / dz;

                if toi > 0.0 && toi < 1.0 {
                    let mut cut = prev_pt + (pt - prev_pt) * toi;
                    cut.z = z;
                    result.push(cut);
                }
            }

            last_keep = keep;
        }

        if keep && i != polygon.len() - 1 {
            result.push(*pt);
        }
    }
}
