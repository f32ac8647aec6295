//! Degree/radian conversion for the rotation triple shown in the UI.

pub fn deg_to_rad3(degrees: [f32; 3]) -> [f32; 3] {
    degrees.map(f32::to_radians)
}

pub fn rad_to_deg3(radians: [f32; 3]) -> [f32; 3] {
    radians.map(f32::to_degrees)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_angles() {
        let rad = deg_to_rad3([90.0, 180.0, -90.0]);
        assert!((rad[0] - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((rad[1] - std::f32::consts::PI).abs() < 1e-6);
        assert!((rad[2] + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let original = [12.5, -45.0, 359.0];
        let back = rad_to_deg3(deg_to_rad3(original));
        for (a, b) in original.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-3, "{} vs {}", a, b);
        }
    }
}
