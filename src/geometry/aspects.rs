//! Visual weight of aspects

/// Orb (degrees) at which an aspect reaches the strength floor
pub const ORB_FALLOFF: f64 = 10.0;

/// Weakest strength an aspect is ever drawn with
pub const MIN_ASPECT_STRENGTH: f64 = 0.4;

/// `max(0.4, 1 - orb/10)`: tighter orbs draw stronger
pub fn aspect_strength(orb: f64) -> f64 {
    let strength = 1.0 - orb.abs() / ORB_FALLOFF;
    if strength.is_nan() {
        return MIN_ASPECT_STRENGTH;
    }
    strength.clamp(MIN_ASPECT_STRENGTH, 1.0)
}
