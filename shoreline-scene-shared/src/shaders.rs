//! Embedded WGSL shader source for the gradient sky dome, shared between
//! the web runtime and any native preview backend.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::scene_format::Color;

pub const GRADIENT_SKY_WGSL: &str = include_str!("../shaders/gradient_sky.wgsl");

fn default_top_color() -> Color {
    Color::rgb(0xff, 0x5f, 0x6d)
}

fn default_bottom_color() -> Color {
    Color::rgb(0xff, 0xc3, 0x71)
}

fn default_offset() -> f32 {
    33.0
}

fn default_exponent() -> f32 {
    0.6
}

/// Tunable parameters for the gradient sky shader. The blend runs from
/// `bottom_color` at the horizon to `top_color` overhead; `offset` lifts
/// the horizon line and `exponent` shapes the falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GradientSkyParams {
    #[serde(default = "default_top_color")]
    pub top_color: Color,
    #[serde(default = "default_bottom_color")]
    pub bottom_color: Color,
    #[serde(default = "default_offset")]
    pub offset: f32,
    #[serde(default = "default_exponent")]
    pub exponent: f32,
}

impl Default for GradientSkyParams {
    fn default() -> Self {
        Self {
            top_color: default_top_color(),
            bottom_color: default_bottom_color(),
            offset: default_offset(),
            exponent: default_exponent(),
        }
    }
}

impl GradientSkyParams {
    pub fn to_uniform(self) -> GradientSkyUniform {
        GradientSkyUniform {
            top_color: self.top_color.to_f32_array(),
            offset: self.offset,
            bottom_color: self.bottom_color.to_f32_array(),
            exponent: self.exponent,
        }
    }
}

/// Uniform block layout matching `GradientSkyUniform` in the WGSL source.
/// vec3 fields are padded to 16 bytes by the trailing scalars.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GradientSkyUniform {
    pub top_color: [f32; 3],
    pub offset: f32,
    pub bottom_color: [f32; 3],
    pub exponent: f32,
}
