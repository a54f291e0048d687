//! Recursive shading/integrator (spec component C7).

use crate::intersect::{self, Intersection};
use crate::material::{Material, DEFAULT_IOR};
use crate::render::RendererSettings;
use crate::rng::Pcg32;
use crate::scene::Scene;
use crate::geometry::Ray;
use crate::util::{Color, Vector3, Vector3Ext};

/// Shade `ray` against `scene`, recursing into reflection/refraction/GI rays
/// up to `settings.max_ray_depth`.
pub fn shade_ray(ray: &Ray, scene: &Scene, settings: &RendererSettings, rng: &mut Pcg32) -> Color {
    if ray.depth > settings.max_ray_depth {
        return Color::ZERO;
    }

    let hit = match trace(ray, scene) {
        Some(hit) => hit,
        None => return scene.background_color,
    };

    match &scene.materials[hit.material_index as usize] {
        Material::Diffuse { albedo_texture } => shade_diffuse(ray, &hit, scene, settings, rng, *albedo_texture),
        Material::Reflective { albedo_texture } => shade_reflective(ray, &hit, scene, settings, rng, *albedo_texture),
        Material::Refractive { ior } => shade_refractive(ray, &hit, scene, settings, rng, *ior),
        Material::Constant { albedo_texture } => scene.textures[*albedo_texture as usize].sample(hit.uv, hit.barycentric),
    }
}

fn trace(ray: &Ray, scene: &Scene) -> Option<Intersection> {
    intersect::traverse(ray, &scene.tree, &scene.triangles, &scene.vertices)
}

fn shade_diffuse(ray: &Ray, hit: &Intersection, scene: &Scene, settings: &RendererSettings, rng: &mut Pcg32, albedo_texture: u32) -> Color {
    let albedo = scene.textures[albedo_texture as usize].sample(hit.uv, hit.barycentric);
    let n = hit.normal;

    let mut direct = Color::ZERO;
    for light in &scene.lights {
        let to_light = light.position - hit.point;
        let r2 = to_light.length_squared();
        let to_light_dir = to_light.normalize();
        let cos = n.dot(to_light_dir).max(0.0);
        if cos <= 0.0 {
            continue;
        }

        let shadow_ray = Ray { origin: hit.point + n * settings.shadow_bias, direction: to_light_dir, depth: 0 };
        let occluded = match trace_with_refractions(&shadow_ray, scene, settings) {
            Some(blocker) => blocker.distance * blocker.distance <= r2,
            None => false,
        };
        if occluded {
            continue;
        }

        let area = 4.0 * std::f32::consts::PI * r2;
        direct += albedo * (light.intensity / area) * cos;
    }

    if !scene.gi_on || settings.max_ray_depth <= ray.depth {
        return direct;
    }

    let right = ray.direction.cross(n).normalize();
    let up = n;
    let forward = right.cross(up);

    let mut gi_total = Color::ZERO;
    for _ in 0..settings.diffuse_sample_count {
        let alpha = rng.uniform() * std::f32::consts::PI;
        let beta = rng.uniform() * 2.0 * std::f32::consts::PI;
        let local = Vector3::new(alpha.cos(), alpha.sin(), 0.0);
        let rotated = rotate_about_y(local, beta);
        let world_dir = (rotated.x * right + rotated.y * up + rotated.z * forward).normalize();

        let gi_ray = Ray { origin: hit.point + n * settings.diffuse_bias, direction: world_dir, depth: ray.depth + 1 };
        gi_total += shade_ray(&gi_ray, scene, settings, rng);
    }

    (direct + gi_total) / (settings.diffuse_sample_count as f32 + 1.0)
}

fn shade_reflective(ray: &Ray, hit: &Intersection, scene: &Scene, settings: &RendererSettings, rng: &mut Pcg32, albedo_texture: u32) -> Color {
    if !scene.reflections_on {
        return Color::ZERO;
    }
    let albedo = scene.textures[albedo_texture as usize].sample(hit.uv, hit.barycentric);
    let reflection_ray = ray.reflected_at(hit.point, hit.normal, settings.reflection_bias);
    albedo * shade_ray(&reflection_ray, scene, settings, rng)
}

fn shade_refractive(ray: &Ray, hit: &Intersection, scene: &Scene, settings: &RendererSettings, rng: &mut Pcg32, ior: f32) -> Color {
    if !scene.refractions_on {
        return Color::ZERO;
    }

    let d = ray.direction;
    let mut n = hit.normal;
    let (outside_ior, inside_ior) = if d.dot(n) > 0.0 {
        n = -n;
        (ior, DEFAULT_IOR)
    } else {
        (DEFAULT_IOR, ior)
    };

    let reflection_ray = ray.reflected_at(hit.point, n, settings.reflection_bias);
    let reflection_color = shade_ray(&reflection_ray, scene, settings, rng);

    match ray.refracted_at(hit.point, n, outside_ior, inside_ior, settings.refraction_bias) {
        Some(refraction_ray) => {
            let refraction_color = shade_ray(&refraction_ray, scene, settings, rng);
            // Not standard Schlick; preserved verbatim from the reference.
            let fresnel = 0.5 * (1.0 + d.dot(n)).powi(5);
            reflection_color * fresnel + refraction_color * (1.0 - fresnel)
        }
        None => reflection_color,
    }
}

/// Shadow-ray tracing that sees through refractive occluders: refract
/// through each refractive hit and re-trace, up to `max_ray_depth` bounces,
/// returning the first non-refractive hit (an occluder) or `None`.
fn trace_with_refractions(ray: &Ray, scene: &Scene, settings: &RendererSettings) -> Option<Intersection> {
    let mut current = *ray;
    loop {
        if current.depth > settings.max_ray_depth {
            return None;
        }
        let hit = trace(&current, scene)?;
        match &scene.materials[hit.material_index as usize] {
            Material::Refractive { ior } => {
                let d = current.direction;
                let mut n = hit.normal;
                let (outside_ior, inside_ior) = if d.dot(n) > 0.0 {
                    n = -n;
                    (*ior, DEFAULT_IOR)
                } else {
                    (DEFAULT_IOR, *ior)
                };
                match current.refracted_at(hit.point, n, outside_ior, inside_ior, settings.refraction_bias) {
                    Some(refracted) => current = refracted,
                    None => return Some(hit),
                }
            }
            _ => return Some(hit),
        }
    }
}

fn rotate_about_y(v: Vector3, angle_radians: f32) -> Vector3 {
    let (s, c) = angle_radians.sin_cos();
    Vector3::new(v.x * c + v.z * s, v.y, -v.x * s + v.z * c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::geometry::{Triangle, TriangleFlags};
    use crate::light::Light;
    use crate::material::Material;
    use crate::texture::Texture;

    fn front_facing_triangle_scene(background: Color) -> Scene {
        let vertices = vec![
            crate::geometry::Vertex::new(Vector3::new(-1.0, -1.0, -3.0), Vector3::ZERO),
            crate::geometry::Vertex::new(Vector3::new(1.0, -1.0, -3.0), Vector3::ZERO),
            crate::geometry::Vertex::new(Vector3::new(0.0, 1.0, -3.0), Vector3::ZERO),
        ];
        let triangles = vec![Triangle::new(&vertices, 0, 1, 2, 0, TriangleFlags::default())];
        let tree = crate::accel::AccelerationTree::build(&triangles, &vertices);
        Scene {
            background_color: background,
            camera: Camera::default(),
            vertices,
            triangles,
            tree,
            lights: vec![Light::new(Vector3::ZERO, 1000.0)],
            textures: vec![Texture::Albedo { color: Color::ONE }],
            materials: vec![Material::Diffuse { albedo_texture: 0 }],
            bucket_size: 32,
            gi_on: false,
            reflections_on: true,
            refractions_on: true,
        }
    }

    #[test]
    fn miss_returns_background_color() {
        let scene = front_facing_triangle_scene(Color::new(1.0, 0.0, 0.0));
        let settings = RendererSettings::default();
        let mut rng = Pcg32::from_pixel(0, 0);
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, -5.0, -3.0).normalize());
        let color = shade_ray(&ray, &scene, &settings, &mut rng);
        assert_eq!(color, scene.background_color);
    }

    #[test]
    fn hit_produces_nonzero_direct_lighting() {
        let scene = front_facing_triangle_scene(Color::new(1.0, 0.0, 0.0));
        let settings = RendererSettings::default();
        let mut rng = Pcg32::from_pixel(2, 2);
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0));
        let color = shade_ray(&ray, &scene, &settings, &mut rng);
        assert!(color.x > 0.0 || color.y > 0.0 || color.z > 0.0);
    }

    #[test]
    fn depth_past_max_returns_black() {
        let scene = front_facing_triangle_scene(Color::ZERO);
        let settings = RendererSettings::default();
        let mut rng = Pcg32::from_pixel(0, 0);
        let ray = Ray { origin: Vector3::ZERO, direction: Vector3::new(0.0, 0.0, -1.0), depth: settings.max_ray_depth + 1 };
        assert_eq!(shade_ray(&ray, &scene, &settings, &mut rng), Color::ZERO);
    }

    #[test]
    fn disabled_reflections_flag_suppresses_mirror_contribution() {
        let mut scene = front_facing_triangle_scene(Color::ZERO);
        scene.materials[0] = Material::Reflective { albedo_texture: 0 };
        scene.reflections_on = false;
        let settings = RendererSettings::default();
        let mut rng = Pcg32::from_pixel(0, 0);
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(shade_ray(&ray, &scene, &settings, &mut rng), Color::ZERO);
    }
}
