//! Math type re-exports and renderer-specific vector/matrix utilities.
//!
//! `Vector3` is `glam::Vec3`; `Color` is the same type used as a linear RGB
//! triple. [`Matrix3`] and [`Transform`] are hand-rolled rather than reusing
//! `glam::Mat3` directly, because the renderer's rotation convention is
//! row-vector (`v * M`, post-multiply), matching the course reference this
//! was built against, rather than glam's column-vector convention.

pub use glam::Vec3;

/// A 3-component vector, used for positions, directions and colors alike.
pub type Vector3 = Vec3;

/// Linear RGB color. An alias of [`Vector3`] — components are not clamped
/// until PPM output.
pub type Color = Vector3;

/// Extension methods spec'd for `Vector3` beyond what `glam::Vec3` already
/// provides (`length`, `dot`, `cross`, `normalize`).
pub trait Vector3Ext {
    /// Reflect `self` (an incident direction) about `normal`.
    fn reflect(self, normal: Vector3) -> Vector3;

    /// Refract `self` (an incident direction) through a surface with the
    /// given `normal`, going from a medium of index `eta_from` into one of
    /// index `eta_to`. Returns `None` under total internal reflection.
    fn refract(self, normal: Vector3, eta_from: f32, eta_to: f32) -> Option<Vector3>;
}

impl Vector3Ext for Vector3 {
    #[inline]
    fn reflect(self, normal: Vector3) -> Vector3 {
        self - normal * 2.0 * self.dot(normal)
    }

    fn refract(self, normal: Vector3, eta_from: f32, eta_to: f32) -> Option<Vector3> {
        let eta = eta_from / eta_to;
        let cos_i = -self.dot(normal);
        let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
        if sin2_t > 1.0 {
            return None; // total internal reflection
        }
        let cos_t = (1.0 - sin2_t).sqrt();
        Some(self * eta + normal * (eta * cos_i - cos_t))
    }
}

/// Row-major 3x3 matrix, applied to vectors as `v * M` (post-multiply).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    rows: [Vector3; 3],
}

impl Matrix3 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        rows: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// Build a matrix from its three rows.
    pub const fn from_rows(r0: Vector3, r1: Vector3, r2: Vector3) -> Self {
        Self { rows: [r0, r1, r2] }
    }

    /// Right-handed rotation about the X axis by `angle_radians`.
    pub fn rotation_x(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, c, s), Vec3::new(0.0, -s, c))
    }

    /// Right-handed rotation about the Y axis by `angle_radians`.
    pub fn rotation_y(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(Vec3::new(c, 0.0, -s), Vec3::new(0.0, 1.0, 0.0), Vec3::new(s, 0.0, c))
    }

    /// Right-handed rotation about the Z axis by `angle_radians`.
    pub fn rotation_z(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(Vec3::new(c, s, 0.0), Vec3::new(-s, c, 0.0), Vec3::new(0.0, 0.0, 1.0))
    }

    /// Multiply a row vector by this matrix: `v * M`.
    #[inline]
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        Vec3::new(
            v.x * self.rows[0].x + v.y * self.rows[1].x + v.z * self.rows[2].x,
            v.x * self.rows[0].y + v.y * self.rows[1].y + v.z * self.rows[2].y,
            v.x * self.rows[0].z + v.y * self.rows[1].z + v.z * self.rows[2].z,
        )
    }

    /// Matrix product `self * rhs`, consistent with row-vector application:
    /// `v * (self * rhs) == (v * self) * rhs`.
    pub fn mul(&self, rhs: &Matrix3) -> Matrix3 {
        Matrix3::from_rows(
            rhs.transform_vector(self.rows[0]),
            rhs.transform_vector(self.rows[1]),
            rhs.transform_vector(self.rows[2]),
        )
    }

    /// Read the raw row array.
    pub fn rows(&self) -> [Vector3; 3] {
        self.rows
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<Matrix3> for Vector3 {
    type Output = Vector3;
    #[inline]
    fn mul(self, rhs: Matrix3) -> Vector3 {
        rhs.transform_vector(self)
    }
}

impl std::ops::Mul for Matrix3 {
    type Output = Matrix3;
    fn mul(self, rhs: Matrix3) -> Matrix3 {
        self.mul(&rhs)
    }
}

/// A location + orientation in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub location: Vector3,
    pub rotation: Matrix3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        location: Vec3::ZERO,
        rotation: Matrix3::IDENTITY,
    };

    pub fn new(location: Vector3, rotation: Matrix3) -> Self {
        Self { location, rotation }
    }

    pub fn translate_world(&mut self, translation: Vector3) {
        self.location += translation;
    }

    pub fn translate_local(&mut self, translation: Vector3) {
        self.location += translation * self.rotation;
    }

    pub fn rotate_x(&mut self, angle_radians: f32) {
        self.rotation = self.rotation * Matrix3::rotation_x(angle_radians);
    }

    pub fn rotate_y(&mut self, angle_radians: f32) {
        self.rotation = self.rotation * Matrix3::rotation_y(angle_radians);
    }

    pub fn rotate_z(&mut self, angle_radians: f32) {
        self.rotation = self.rotation * Matrix3::rotation_z(angle_radians);
    }

    fn rotate_around(&mut self, rotation_matrix: Matrix3, anchor: Vector3) {
        self.rotation = self.rotation * rotation_matrix;
        self.location = (self.location - anchor) * rotation_matrix + anchor;
    }

    pub fn rotate_x_around(&mut self, angle_radians: f32, anchor: Vector3) {
        self.rotate_around(Matrix3::rotation_x(angle_radians), anchor);
    }

    pub fn rotate_y_around(&mut self, angle_radians: f32, anchor: Vector3) {
        self.rotate_around(Matrix3::rotation_y(angle_radians), anchor);
    }

    pub fn rotate_z_around(&mut self, angle_radians: f32, anchor: Vector3) {
        self.rotate_around(Matrix3::rotation_z(angle_radians), anchor);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
