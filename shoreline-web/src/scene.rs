use std::collections::HashMap;

use glam::Vec3;

use shoreline_scene_shared::math::Aabb;
use shoreline_scene_shared::scene_format::{
    AnimationSpec, Color, EntityDoc, EntityKind, LightKind, SceneDoc,
};

/// Geometry the external asset loader deposits on a model entity. One child
/// per mesh primitive; positions are flat `[x, y, z, x, y, z, ...]` arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshContent {
    pub children: Vec<MeshChild>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshChild {
    pub positions: Vec<f32>,
}

impl MeshContent {
    /// Bounding box over every child's positions, if any geometry exists.
    pub fn bounds(&self) -> Option<Aabb> {
        self.children
            .iter()
            .filter_map(|child| Aabb::from_positions(&child.positions))
            .reduce(Aabb::merge)
    }
}

/// A live entity with mutable attributes. Rotation is in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub kind: EntityKind,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub color: Option<Color>,
    pub visible: bool,
    /// Asset reference for `Model` entities; cleared to suppress retries.
    pub model_src: Option<String>,
    /// What the loader actually produced. `None` until (if ever) loaded.
    pub mesh: Option<MeshContent>,
    /// Named animation attributes ("spin", "click", "hover").
    pub animations: HashMap<String, AnimationSpec>,
}

impl Entity {
    fn from_doc(doc: &EntityDoc) -> Self {
        let model_src = match &doc.kind {
            EntityKind::Model { src } => Some(src.clone()),
            _ => None,
        };
        Self {
            id: doc.id.clone(),
            kind: doc.kind.clone(),
            position: Vec3::from_array(doc.position),
            rotation: Vec3::from_array(doc.rotation),
            scale: Vec3::from_array(doc.scale),
            color: doc.color,
            visible: doc.visible,
            model_src,
            mesh: None,
            animations: HashMap::new(),
        }
    }

    pub fn set_animation(&mut self, slot: &str, spec: AnimationSpec) {
        self.animations.insert(slot.to_owned(), spec);
    }

    /// Returns whether an animation was actually attached to the slot.
    pub fn remove_animation(&mut self, slot: &str) -> bool {
        self.animations.remove(slot).is_some()
    }

    pub fn animation(&self, slot: &str) -> Option<&AnimationSpec> {
        self.animations.get(slot)
    }

    /// Intensity attribute; `None` for non-light entities.
    pub fn light_intensity(&self) -> Option<f32> {
        match self.kind {
            EntityKind::Light { intensity, .. } => Some(intensity),
            _ => None,
        }
    }

    /// Returns `false` (and changes nothing) for non-light entities.
    pub fn set_light_intensity(&mut self, value: f32) -> bool {
        if let EntityKind::Light { intensity, .. } = &mut self.kind {
            *intensity = value;
            true
        } else {
            false
        }
    }
}

/// Runtime scene graph with O(1) entity lookup by id.
pub struct SceneGraph {
    pub name: String,
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
}

impl SceneGraph {
    /// Build the runtime graph from a scene document. Fails on duplicate
    /// ids or dangling asset/interaction references.
    pub fn from_doc(doc: &SceneDoc) -> Result<Self, String> {
        doc.validate()?;
        let entities: Vec<Entity> = doc.entities.iter().map(Entity::from_doc).collect();
        let index = entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        Ok(Self {
            name: doc.name.clone(),
            entities,
            index,
        })
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    pub fn entity_mut(&mut self, id: &str) -> Option<&mut Entity> {
        let i = *self.index.get(id)?;
        Some(&mut self.entities[i])
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// First camera entity, if the scene has one.
    pub fn camera_mut(&mut self) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| matches!(e.kind, EntityKind::Camera))
    }

    /// First sky entity, if the scene has one.
    pub fn sky_mut(&mut self) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| matches!(e.kind, EntityKind::Sky { .. }))
    }

    /// First light of the given kind, if the scene has one.
    pub fn light_mut(&mut self, which: LightKind) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| matches!(e.kind, EntityKind::Light { kind, .. } if kind == which))
    }

    /// Deposit loader output on an entity. Returns `false` when the entity
    /// does not exist.
    pub fn attach_mesh(&mut self, id: &str, mesh: MeshContent) -> bool {
        match self.entity_mut(id) {
            Some(entity) => {
                entity.mesh = Some(mesh);
                true
            }
            None => false,
        }
    }
}
