//! Light refraction through the water surface and floor intersection.

use glam::{Vec2, Vec3};

/// Smallest downward component a light ray may have (keeps floor hits finite)
pub const MIN_DESCENT: f32 = 0.05;

/// Normalized incoming light direction, clamped to point downward
///
/// Zero, non-finite or upward directions fall back to straight down.
/// Horizontal and grazing light is tilted just below the horizon.
pub fn incident_direction(light_dir: Vec3) -> Vec3 {
    let Some(dir) = light_dir.try_normalize() else {
        return Vec3::NEG_Y;
    };
    if dir.y > 0.0 {
        return Vec3::NEG_Y;
    }
    if dir.y <= -MIN_DESCENT {
        return dir;
    }
    Vec3::new(dir.x, -MIN_DESCENT, dir.z)
        .try_normalize()
        .unwrap_or(Vec3::NEG_Y)
}

/// Upward surface normal from the height gradient `(dh/dx, dh/dz)`
pub fn surface_normal(slope: Vec2) -> Vec3 {
    Vec3::new(-slope.x, 1.0, -slope.y)
        .try_normalize()
        .unwrap_or(Vec3::Y)
}

/// Snell refraction of a unit `incident` ray through a unit `normal`
///
/// `eta` is the ratio of refractive indices (outside / inside). Total internal
/// reflection returns the undeviated ray.
pub fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Vec3 {
    let mut normal = normal;
    let mut cos_i = -normal.dot(incident).clamp(-1.0, 1.0);
    if cos_i < 0.0 {
        // Light reaches the back of a steep facet
        normal = -normal;
        cos_i = -cos_i;
    }

    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return incident;
    }
    (eta * incident + (eta * cos_i - k.sqrt()) * normal)
        .try_normalize()
        .unwrap_or(incident)
}

/// Where a ray leaving `origin` lands on the floor plane `y = 0` (XZ)
///
/// Rays that barely descend are clamped to `MIN_DESCENT`; origins at or below
/// the floor land directly beneath themselves.
pub fn floor_hit(origin: Vec3, dir: Vec3) -> Vec2 {
    if origin.y <= 0.0 {
        return Vec2::new(origin.x, origin.z);
    }
    let descent = (-dir.y).max(MIN_DESCENT);
    let travel = origin.y / descent;
    Vec2::new(origin.x + dir.x * travel, origin.z + dir.z * travel)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER_ETA: f32 = 1.0 / 1.333;

    #[test]
    fn test_vertical_light_through_flat_water_is_straight() {
        let dir = refract(Vec3::NEG_Y, Vec3::Y, WATER_ETA);
        assert!((dir - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_refraction_bends_toward_normal() {
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let refracted = refract(incident, Vec3::Y, WATER_ETA);

        let sin_i = incident.x.abs();
        let sin_t = refracted.x.abs();
        assert!((sin_t - sin_i * WATER_ETA).abs() < 1e-5);
        assert!(refracted.y < 0.0);
    }

    #[test]
    fn test_total_internal_reflection_keeps_ray() {
        // Going from dense to thin medium at a grazing angle
        let incident = Vec3::new(0.99, -0.141, 0.0).normalize();
        let out = refract(incident, Vec3::Y, 1.333);
        assert_eq!(out, incident);
    }

    #[test]
    fn test_incident_direction_clamps() {
        assert_eq!(incident_direction(Vec3::ZERO), Vec3::NEG_Y);
        assert_eq!(incident_direction(Vec3::splat(f32::NAN)), Vec3::NEG_Y);

        let grazing = incident_direction(Vec3::X);
        assert!(grazing.y <= -MIN_DESCENT * 0.99);
        assert!((grazing.length() - 1.0).abs() < 1e-5);

        let upward = incident_direction(Vec3::Y);
        assert!((upward - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_slanted_upward_light_points_straight_down() {
        assert_eq!(incident_direction(Vec3::new(1.0, 1.0, 0.0)), Vec3::NEG_Y);
        assert_eq!(incident_direction(Vec3::new(-0.3, 0.01, 2.0)), Vec3::NEG_Y);

        // Just below the horizon keeps its heading
        let low = incident_direction(Vec3::new(1.0, -0.01, 0.0));
        assert!(low.x > 0.99 && low.y < 0.0);
    }

    #[test]
    fn test_surface_normal() {
        assert_eq!(surface_normal(Vec2::ZERO), Vec3::Y);
        let n = surface_normal(Vec2::new(1.0, 0.0));
        assert!(n.x < 0.0 && n.y > 0.0);
        assert_eq!(surface_normal(Vec2::splat(f32::NAN)), Vec3::Y);
    }

    #[test]
    fn test_floor_hit() {
        let hit = floor_hit(Vec3::new(1.0, 10.0, 2.0), Vec3::NEG_Y);
        assert_eq!(hit, Vec2::new(1.0, 2.0));

        let slanted = Vec3::new(1.0, -1.0, 0.0).normalize();
        let hit = floor_hit(Vec3::new(0.0, 5.0, 0.0), slanted);
        assert!((hit.x - 5.0).abs() < 1e-4);

        // Horizontal ray still lands at a finite distance
        let hit = floor_hit(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(hit.is_finite());
        assert!((hit.x - 1.0 / MIN_DESCENT).abs() < 1e-3);
    }
}
