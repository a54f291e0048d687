//! Material kinds (spec §3 Data model).

/// Default index of refraction for a [`Material::Refractive`] that doesn't
/// specify one.
pub const DEFAULT_IOR: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Lambertian surface with optional diffuse global illumination.
    Diffuse { albedo_texture: u32 },
    /// Perfect mirror.
    Reflective { albedo_texture: u32 },
    /// Dielectric with Fresnel-blended reflection/refraction. `albedo_texture`
    /// is unused.
    Refractive { ior: f32 },
    /// Emissive: the sampled albedo is returned directly, no shading.
    Constant { albedo_texture: u32 },
}
