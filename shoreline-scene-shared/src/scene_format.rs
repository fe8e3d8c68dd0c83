//! Declarative scene document format.
//!
//! A scene is a data document (TOML in the demos) listing entities, the
//! model assets to verify after load, and the interaction behaviors
//! attached to entities. The runtime builds its scene graph from this and
//! never mutates the document itself.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// ─── Color ───────────────────────────────────────────────────────────

/// sRGB color, serialized as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string (case-insensitive).
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{s}' does not start with '#'"))?;
        if digits.len() != 6 {
            return Err(format!("color '{s}' is not a #RRGGBB value"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| format!("color '{s}' has a non-hex digit"))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels as 0..1 floats, for uniform upload.
    pub fn to_f32_array(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_hex()
    }
}

// ─── Entities ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LightKind {
    Ambient,
    Directional,
    Point,
}

/// What an entity is. Primitives render as-is; `Model` references an
/// external asset that the loader resolves asynchronously.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EntityKind {
    Box,
    Sphere,
    Cylinder,
    Plane,
    Sky {
        #[serde(default)]
        gradient: Option<crate::shaders::GradientSkyParams>,
    },
    Light {
        kind: LightKind,
        intensity: f32,
    },
    Camera,
    Model {
        src: String,
    },
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_visible() -> bool {
    true
}

/// One entity in the scene document. Rotation is in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EntityDoc {
    pub id: String,
    pub kind: EntityKind,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

// ─── Animation attributes ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimatedProperty {
    Position,
    Rotation,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseInOutQuad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayDirection {
    #[default]
    Normal,
    Alternate,
}

/// Declarative animation attribute. The runtime only attaches and removes
/// these; interpolation happens in the external renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AnimationSpec {
    pub property: AnimatedProperty,
    pub to: [f32; 3],
    pub dur_ms: u32,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub looping: bool,
    #[serde(default)]
    pub direction: PlayDirection,
}

// ─── Asset verification ──────────────────────────────────────────────

/// Verification settings for one model asset: the deadline after which a
/// still-unresolved load counts as failed, the bounding-size range that is
/// visually acceptable, and the corrective scale factors outside it.
/// Thresholds and factors are per-asset tuning, not universal constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetCheckDoc {
    pub entity: String,
    pub fallback: String,
    pub delay_ms: u64,
    pub min_size: f32,
    pub max_size: f32,
    pub upscale: f32,
    pub downscale: f32,
}

// ─── Interactions ────────────────────────────────────────────────────

/// Interaction behavior attached to one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum InteractionDoc {
    /// Click toggles a looping yaw spin; hovering shows a scale overlay.
    Model {
        entity: String,
        spin_to: [f32; 3],
        spin_dur_ms: u32,
        click_scale: f32,
        hover_scale: f32,
    },
    /// Click recolors the entity from a palette; hovering scales it.
    ColorCycle {
        entity: String,
        palette: Vec<Color>,
        hover_scale: f32,
    },
}

impl InteractionDoc {
    pub fn entity(&self) -> &str {
        match self {
            Self::Model { entity, .. } | Self::ColorCycle { entity, .. } => entity,
        }
    }
}

// ─── Scene document ──────────────────────────────────────────────────

/// A complete scene document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SceneDoc {
    pub name: String,
    #[serde(default)]
    pub entities: Vec<EntityDoc>,
    #[serde(default)]
    pub assets: Vec<AssetCheckDoc>,
    #[serde(default)]
    pub interactions: Vec<InteractionDoc>,
}

impl SceneDoc {
    /// Check internal references: entity ids must be unique, and every
    /// asset check or interaction must point at an entity that exists.
    pub fn validate(&self) -> Result<(), String> {
        let mut ids = HashSet::new();
        for entity in &self.entities {
            if !ids.insert(entity.id.as_str()) {
                return Err(format!("duplicate entity id '{}'", entity.id));
            }
        }
        for check in &self.assets {
            if !ids.contains(check.entity.as_str()) {
                return Err(format!(
                    "asset check references unknown entity '{}'",
                    check.entity
                ));
            }
            if !ids.contains(check.fallback.as_str()) {
                return Err(format!(
                    "asset check for '{}' references unknown fallback '{}'",
                    check.entity, check.fallback
                ));
            }
            if check.min_size > check.max_size {
                return Err(format!(
                    "asset check for '{}' has min-size {} above max-size {}",
                    check.entity, check.min_size, check.max_size
                ));
            }
        }
        for interaction in &self.interactions {
            if !ids.contains(interaction.entity()) {
                return Err(format!(
                    "interaction references unknown entity '{}'",
                    interaction.entity()
                ));
            }
        }
        Ok(())
    }
}
