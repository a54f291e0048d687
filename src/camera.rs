//! Camera: primary ray generation and pose mutators (spec component C5).

use crate::geometry::Ray;
use crate::util::{Matrix3, Transform, Vector3};

/// Default horizontal field of view, in degrees.
pub const DEFAULT_FOV_DEGREES: f32 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub transform: Transform,
    /// Horizontal field of view, in degrees.
    pub fov_degrees: f32,
}

impl Camera {
    pub fn new(transform: Transform, fov_degrees: f32) -> Self {
        Self { transform, fov_degrees }
    }

    /// Primary ray through pixel `(x, y)` of a `width x height` image.
    pub fn generate_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let (w, h) = (width as f32, height as f32);
        let aspect = w / h;
        let sx = (2.0 * (x as f32 + 0.5) / w - 1.0) * aspect;
        let sy = 1.0 - 2.0 * (y as f32 + 0.5) / h;

        let tan_half_fov = (self.fov_degrees.to_radians() * 0.5).tan();
        let local_direction = Vector3::new(sx * tan_half_fov, sy * tan_half_fov, -1.0);
        let direction = (local_direction * self.transform.rotation).normalize();

        Ray::new(self.transform.location, direction)
    }

    pub fn dolly(&mut self, distance: f32) {
        self.transform.translate_local(Vector3::new(0.0, 0.0, -distance));
    }

    pub fn truck(&mut self, distance: f32) {
        self.transform.translate_local(Vector3::new(distance, 0.0, 0.0));
    }

    pub fn pedestal(&mut self, distance: f32) {
        self.transform.translate_local(Vector3::new(0.0, distance, 0.0));
    }

    pub fn pan(&mut self, angle_radians: f32) {
        self.transform.rotate_y(angle_radians);
    }

    pub fn tilt(&mut self, angle_radians: f32) {
        self.transform.rotate_x(angle_radians);
    }

    pub fn roll(&mut self, angle_radians: f32) {
        self.transform.rotate_z(angle_radians);
    }

    pub fn pan_around(&mut self, angle_radians: f32, anchor: Vector3) {
        self.transform.rotate_y_around(angle_radians, anchor);
    }

    pub fn tilt_around(&mut self, angle_radians: f32, anchor: Vector3) {
        self.transform.rotate_x_around(angle_radians, anchor);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self { transform: Transform::default(), fov_degrees: DEFAULT_FOV_DEGREES }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_pixel_ray_points_straight_down_minus_z() {
        let camera = Camera::default();
        let ray = camera.generate_ray(2, 2, 4, 4);
        assert!(ray.direction.x.abs() < 1e-4);
        assert!(ray.direction.y.abs() < 1e-4);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn generated_ray_direction_is_unit_length() {
        let camera = Camera::default();
        let ray = camera.generate_ray(0, 0, 16, 9);
        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn dolly_moves_along_local_forward() {
        let mut camera = Camera::default();
        camera.dolly(2.0);
        assert_eq!(camera.transform.location, Vector3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn pan_rotates_camera_direction() {
        let mut camera = Camera::default();
        camera.pan(std::f32::consts::FRAC_PI_2);
        let ray = camera.generate_ray(2, 2, 4, 4);
        assert!((ray.direction - Vector3::new(-1.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn matrix3_rows_survive_default_identity() {
        assert_eq!(Matrix3::IDENTITY.rows()[0], Vector3::X);
    }
}
