use crate::foundation::core::Rgba8;

/// Colors used by the demo scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SceneColors {
    pub sky: Rgba8,
    pub sky_light: Rgba8,
    pub grass: Rgba8,
    pub grass_dark: Rgba8,
    pub cloud: Rgba8,
    pub cloud_shadow: Rgba8,
    pub gem_pink: Rgba8,
    pub gem_orange: Rgba8,
    pub gem_yellow: Rgba8,
    pub gem_green: Rgba8,
    pub gem_cyan: Rgba8,
    pub gem_blue: Rgba8,
    pub gem_purple: Rgba8,
    pub sparkle: Rgba8,
    pub sparkle_glow: Rgba8,
}

impl SceneColors {
    /// Muted sky and grass with the gem's logo colors.
    pub const DEFAULT: Self = Self {
        sky: Rgba8::rgb(0x4a, 0x6f, 0xa5),
        sky_light: Rgba8::rgb(0x5b, 0x7d, 0xb1),
        grass: Rgba8::rgb(0x2d, 0x5a, 0x3d),
        grass_dark: Rgba8::rgb(0x1e, 0x3d, 0x2a),
        cloud: Rgba8::rgb(0xd8, 0xe2, 0xec),
        cloud_shadow: Rgba8::rgb(0xa8, 0xb8, 0xc8),
        gem_pink: Rgba8::rgb(0xef, 0x2b, 0x5a),
        gem_orange: Rgba8::rgb(0xf7, 0x73, 0x50),
        gem_yellow: Rgba8::rgb(0xff, 0xf1, 0x55),
        gem_green: Rgba8::rgb(0x89, 0xd6, 0x62),
        gem_cyan: Rgba8::rgb(0x4d, 0xd0, 0x8b),
        gem_blue: Rgba8::rgb(0x53, 0xa0, 0xed),
        gem_purple: Rgba8::rgb(0x6c, 0x39, 0xcd),
        sparkle: Rgba8::rgb(0xff, 0xff, 0xff),
        sparkle_glow: Rgba8::rgb(0xff, 0xe0, 0x66),
    };
}

impl Default for SceneColors {
    fn default() -> Self {
        Self::DEFAULT
    }
}
