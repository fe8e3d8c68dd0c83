//! Single-key shortcuts: camera reset, ambient light toggle, sky palette
//! cycling. Direct, synchronous command handlers; the only state is the
//! palette index.

use glam::Vec3;

use shoreline_scene_shared::scene_format::{Color, LightKind};

use crate::scene::SceneGraph;

/// Commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    ResetCamera,
    ToggleAmbientLight,
    CycleSkyColor,
}

impl KeyCommand {
    /// Map a key (as reported by the host) to a command. Case-insensitive;
    /// unmapped keys are `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "r" => Some(Self::ResetCamera),
            "l" => Some(Self::ToggleAmbientLight),
            "g" => Some(Self::CycleSkyColor),
            _ => None,
        }
    }
}

pub const CAMERA_HOME_POSITION: Vec3 = Vec3::new(0.0, 1.6, 0.0);
pub const AMBIENT_BRIGHT: f32 = 0.4;
pub const AMBIENT_DIM: f32 = 0.1;

/// Fixed beach palette cycled by `CycleSkyColor`.
pub const SKY_PALETTE: [Color; 8] = [
    Color::rgb(0x87, 0xce, 0xeb), // sky blue (default)
    Color::rgb(0xff, 0xb3, 0x47), // peach sunset
    Color::rgb(0xff, 0x6b, 0x6b), // coral red
    Color::rgb(0x4e, 0xcd, 0xc4), // teal ocean
    Color::rgb(0x45, 0xb7, 0xd1), // deep blue
    Color::rgb(0xff, 0xe4, 0xb5), // sandy beige
    Color::rgb(0xff, 0xd7, 0x00), // golden hour
    Color::rgb(0xff, 0xa0, 0x7a), // light salmon
];

/// Keyboard shortcut handler.
#[derive(Debug, Default)]
pub struct Shortcuts {
    sky_index: usize,
}

impl Shortcuts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the key and apply it. Returns whether a command ran.
    pub fn handle_key(&mut self, scene: &mut SceneGraph, key: &str) -> bool {
        match KeyCommand::from_key(key) {
            Some(command) => {
                self.apply(scene, command);
                true
            }
            None => false,
        }
    }

    /// Apply one command. Missing target entities are logged and skipped,
    /// never fatal.
    pub fn apply(&mut self, scene: &mut SceneGraph, command: KeyCommand) {
        match command {
            KeyCommand::ResetCamera => match scene.camera_mut() {
                Some(camera) => {
                    camera.position = CAMERA_HOME_POSITION;
                    camera.rotation = Vec3::ZERO;
                    log::info!("camera reset");
                }
                None => log::warn!("no camera entity to reset"),
            },
            KeyCommand::ToggleAmbientLight => match scene.light_mut(LightKind::Ambient) {
                Some(light) => {
                    let next = if light.light_intensity() == Some(AMBIENT_BRIGHT) {
                        AMBIENT_DIM
                    } else {
                        AMBIENT_BRIGHT
                    };
                    light.set_light_intensity(next);
                    log::info!("ambient light intensity: {next}");
                }
                None => log::warn!("no ambient light to toggle"),
            },
            KeyCommand::CycleSkyColor => {
                self.sky_index = (self.sky_index + 1) % SKY_PALETTE.len();
                let color = SKY_PALETTE[self.sky_index];
                match scene.sky_mut() {
                    Some(sky) => {
                        sky.color = Some(color);
                        log::info!("sky color changed to {}", color.to_hex());
                    }
                    None => log::warn!("no sky entity to recolor"),
                }
            }
        }
    }
}
