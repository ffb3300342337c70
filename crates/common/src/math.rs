use glam::{Mat4, Vec3};

/// Convert degrees to radians.
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Build a model matrix: translate by `position`, then rotate about X, Y and Z
/// (in that order) by `eulers` given in degrees.
///
/// The order is load-bearing: swapping any two rotations changes the visible
/// orientation of every object.
pub fn euler_model_matrix(position: Vec3, eulers: Vec3) -> Mat4 {
    let mut model = Mat4::from_translation(position);
    model *= Mat4::from_rotation_x(deg_to_rad(eulers.x));
    model *= Mat4::from_rotation_y(deg_to_rad(eulers.y));
    model *= Mat4::from_rotation_z(deg_to_rad(eulers.z));
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn assert_mat_close(a: Mat4, b: Mat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert!((x - y).abs() < 1e-5, "{a:?} != {b:?}");
        }
    }

    /// Rotation matrices written out by hand, column-major.
    fn rot_x(r: f32) -> Mat4 {
        let (s, c) = r.sin_cos();
        Mat4::from_cols(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::W,
        )
    }

    fn rot_y(r: f32) -> Mat4 {
        let (s, c) = r.sin_cos();
        Mat4::from_cols(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    fn rot_z(r: f32) -> Mat4 {
        let (s, c) = r.sin_cos();
        Mat4::from_cols(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::W,
        )
    }

    fn translate(p: Vec3) -> Mat4 {
        Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::Z, p.extend(1.0))
    }

    #[test]
    fn deg_to_rad_known_values() {
        assert_eq!(deg_to_rad(0.0), 0.0);
        assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((deg_to_rad(-90.0) + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn wrap_degrees_stays_in_range() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(370.0), 10.0);
        assert_eq!(wrap_degrees(-30.0), 330.0);
        assert_eq!(wrap_degrees(-720.0), 0.0);
        let tiny = wrap_degrees(-1e-7);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn euler_matrix_matches_direct_multiplication() {
        let cases = [
            (Vec3::ZERO, Vec3::ZERO),
            (Vec3::new(1.0, 2.0, 3.0), Vec3::new(90.0, 0.0, 0.0)),
            (Vec3::new(0.0, 0.0, -2.0), Vec3::new(90.0, 55.0, 0.0)),
            (Vec3::new(-4.5, 0.25, 7.0), Vec3::new(-33.0, 181.0, 359.0)),
            (Vec3::new(10.0, -10.0, 0.5), Vec3::new(720.0, -45.0, 12.5)),
        ];
        for (p, e) in cases {
            let expected = translate(p)
                * rot_x(deg_to_rad(e.x))
                * rot_y(deg_to_rad(e.y))
                * rot_z(deg_to_rad(e.z));
            assert_mat_close(euler_model_matrix(p, e), expected);
        }
    }

    #[test]
    fn rotation_order_is_observable() {
        let e = Vec3::new(90.0, 90.0, 0.0);
        let xyz = euler_model_matrix(Vec3::ZERO, e);
        let zyx = rot_z(0.0) * rot_y(deg_to_rad(e.y)) * rot_x(deg_to_rad(e.x));
        let p = Vec3::new(0.0, 0.0, 1.0);
        assert!((xyz.transform_point3(p) - zyx.transform_point3(p)).length() > 0.5);
    }

    #[test]
    fn translation_is_applied_last_to_points() {
        let m = euler_model_matrix(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 90.0));
        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::new(2.0, 1.0, 0.0)).length() < 1e-5);
    }
}
