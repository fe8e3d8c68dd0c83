//! Click and hover behaviors, parameterized per entity from the scene
//! document: one generic mechanism instead of a near-identical handler
//! block per model.

use std::collections::HashMap;

use glam::Vec3;

use shoreline_scene_shared::scene_format::{
    AnimatedProperty, AnimationSpec, Color, Easing, InteractionDoc, PlayDirection,
};

use crate::scene::SceneGraph;

/// Animation slot for the toggleable looping spin.
pub const SPIN_SLOT: &str = "spin";
/// Animation slot for the short click-feedback pulse.
pub const CLICK_SLOT: &str = "click";
/// Animation slot for the hover emphasis.
pub const HOVER_SLOT: &str = "hover";

/// How long the click-feedback overlay stays attached before removal.
pub const CLICK_FEEDBACK_HOLD_MS: f64 = 400.0;
const FEEDBACK_DUR_MS: u32 = 200;

#[derive(Debug, Clone)]
enum Behavior {
    Model {
        spin_to: [f32; 3],
        spin_dur_ms: u32,
        click_scale: f32,
        hover_scale: f32,
    },
    ColorCycle {
        palette: Vec<Color>,
        hover_scale: f32,
    },
}

#[derive(Debug)]
struct PendingRemoval {
    entity: String,
    slot: &'static str,
    due_ms: f64,
}

/// Dispatches clicks and hovers to the behavior configured for the target
/// entity, and removes timed feedback overlays from `tick`.
pub struct InteractionSystem {
    behaviors: HashMap<String, Behavior>,
    pending: Vec<PendingRemoval>,
    rand_state: u32,
}

impl InteractionSystem {
    pub fn from_docs(docs: &[InteractionDoc]) -> Self {
        let behaviors = docs
            .iter()
            .map(|doc| match doc {
                InteractionDoc::Model {
                    entity,
                    spin_to,
                    spin_dur_ms,
                    click_scale,
                    hover_scale,
                } => (
                    entity.clone(),
                    Behavior::Model {
                        spin_to: *spin_to,
                        spin_dur_ms: *spin_dur_ms,
                        click_scale: *click_scale,
                        hover_scale: *hover_scale,
                    },
                ),
                InteractionDoc::ColorCycle {
                    entity,
                    palette,
                    hover_scale,
                } => (
                    entity.clone(),
                    Behavior::ColorCycle {
                        palette: palette.clone(),
                        hover_scale: *hover_scale,
                    },
                ),
            })
            .collect();
        Self {
            behaviors,
            pending: Vec::new(),
            rand_state: 12345,
        }
    }

    pub fn on_click(&mut self, scene: &mut SceneGraph, id: &str, now_ms: f64) {
        match self.behaviors.get(id) {
            Some(Behavior::Model {
                spin_to,
                spin_dur_ms,
                click_scale,
                ..
            }) => {
                let (spin_to, spin_dur_ms, click_scale) = (*spin_to, *spin_dur_ms, *click_scale);
                let Some(entity) = scene.entity_mut(id) else {
                    log::warn!("clicked entity '{id}' not in scene");
                    return;
                };
                if entity.remove_animation(SPIN_SLOT) {
                    log::info!("'{id}' spin stopped");
                } else {
                    entity.set_animation(
                        SPIN_SLOT,
                        AnimationSpec {
                            property: AnimatedProperty::Rotation,
                            to: spin_to,
                            dur_ms: spin_dur_ms,
                            easing: Easing::Linear,
                            looping: true,
                            direction: PlayDirection::Normal,
                        },
                    );
                    log::info!("'{id}' spin started");
                }
                entity.set_animation(
                    CLICK_SLOT,
                    AnimationSpec {
                        property: AnimatedProperty::Scale,
                        to: [click_scale; 3],
                        dur_ms: FEEDBACK_DUR_MS,
                        easing: Easing::EaseInOutQuad,
                        looping: false,
                        direction: PlayDirection::Alternate,
                    },
                );
                self.pending.push(PendingRemoval {
                    entity: id.to_owned(),
                    slot: CLICK_SLOT,
                    due_ms: now_ms + CLICK_FEEDBACK_HOLD_MS,
                });
            }
            Some(Behavior::ColorCycle { palette, .. }) => {
                if palette.is_empty() {
                    return;
                }
                let pick = palette[xorshift(&mut self.rand_state) as usize % palette.len()];
                match scene.entity_mut(id) {
                    Some(entity) => {
                        entity.color = Some(pick);
                        log::info!("'{id}' color changed to {}", pick.to_hex());
                    }
                    None => log::warn!("clicked entity '{id}' not in scene"),
                }
            }
            None => log::debug!("click on '{id}' with no interaction configured"),
        }
    }

    pub fn on_hover(&mut self, scene: &mut SceneGraph, id: &str, entered: bool) {
        match self.behaviors.get(id) {
            Some(Behavior::Model { hover_scale, .. }) => {
                let hover_scale = *hover_scale;
                let Some(entity) = scene.entity_mut(id) else {
                    return;
                };
                if entered {
                    entity.set_animation(
                        HOVER_SLOT,
                        AnimationSpec {
                            property: AnimatedProperty::Scale,
                            to: [hover_scale; 3],
                            dur_ms: FEEDBACK_DUR_MS,
                            easing: Easing::EaseInOutQuad,
                            looping: false,
                            direction: PlayDirection::Normal,
                        },
                    );
                } else {
                    entity.remove_animation(HOVER_SLOT);
                }
            }
            Some(Behavior::ColorCycle { hover_scale, .. }) => {
                let hover_scale = *hover_scale;
                if let Some(entity) = scene.entity_mut(id) {
                    entity.scale = if entered {
                        Vec3::splat(hover_scale)
                    } else {
                        Vec3::ONE
                    };
                }
            }
            None => {}
        }
    }

    /// Remove feedback overlays whose hold time has elapsed.
    pub fn tick(&mut self, scene: &mut SceneGraph, now_ms: f64) {
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_ms <= now_ms {
                let removal = self.pending.swap_remove(i);
                if let Some(entity) = scene.entity_mut(&removal.entity) {
                    entity.remove_animation(removal.slot);
                }
            } else {
                i += 1;
            }
        }
    }
}

// Small deterministic PRNG; no std randomness on WASM.
fn xorshift(state: &mut u32) -> u32 {
    *state ^= *state << 13;
    *state ^= *state >> 17;
    *state ^= *state << 5;
    *state
}
