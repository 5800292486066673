use glam::Vec3;

/// sRGB hex triplet (`0xRRGGBB`) to linear RGB
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Narkowicz ACES filmic fit
pub fn aces_filmic(color: Vec3) -> Vec3 {
    const A: f32 = 2.51;
    const B: f32 = 0.03;
    const C: f32 = 2.43;
    const D: f32 = 0.59;
    const E: f32 = 0.14;
    let x = color.max(Vec3::ZERO);
    ((x * (A * x + B)) / (x * (C * x + D) + E)).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Linear color to an opaque sRGB-encoded RGBA8 pixel
pub fn to_rgba8(linear: Vec3) -> [u8; 4] {
    let encode = |c: f32| (linear_to_srgb(c) * 255.0 + 0.5) as u8;
    [encode(linear.x), encode(linear.y), encode(linear.z), 255]
}
