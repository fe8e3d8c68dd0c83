//! Deferred verification of model assets, with fallback substitution.
//!
//! The external loader fills in mesh content asynchronously. Each
//! configured asset settles exactly once: immediately when the loader
//! reports completion or failure, otherwise by probing the entity's mesh
//! content when the per-asset deadline expires. A settled asset either
//! stays on screen (rescaled into its acceptable size range when needed)
//! or is replaced by its fallback primitive. Per-asset completions feed a
//! single progress counter owned by the controller.

use glam::Vec3;

use shoreline_scene_shared::scene_format::{AssetCheckDoc, Color};

use crate::scene::{Entity, SceneGraph};

// ─── Probe ───────────────────────────────────────────────────────────

/// Outcome of inspecting a model entity's mesh content. Absence of mesh
/// content is a result, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeResult {
    Loaded { children: usize, size: Vec3 },
    Missing,
}

/// Inspect an entity's rendered mesh. No side effects.
pub fn probe(entity: &Entity) -> ProbeResult {
    match &entity.mesh {
        Some(mesh) if !mesh.children.is_empty() => {
            let size = mesh.bounds().map(|b| b.size()).unwrap_or(Vec3::ZERO);
            ProbeResult::Loaded {
                children: mesh.children.len(),
                size,
            }
        }
        _ => ProbeResult::Missing,
    }
}

// ─── Size normalization ──────────────────────────────────────────────

/// Corrective scale factor for a loaded bounding size, when its diagonal
/// falls outside the asset's acceptable range. Values exactly on a
/// threshold are left untouched.
pub fn corrective_scale(size: Vec3, check: &AssetCheckDoc) -> Option<f32> {
    let diagonal = size.length();
    if diagonal < check.min_size {
        Some(check.upscale)
    } else if diagonal > check.max_size {
        Some(check.downscale)
    } else {
        None
    }
}

// ─── Fallback ────────────────────────────────────────────────────────

/// Replace a missing asset: show the fallback entity and clear the failed
/// entity's model source so no further load is attempted. Idempotent.
pub fn apply_fallback(scene: &mut SceneGraph, check: &AssetCheckDoc) {
    match scene.entity_mut(&check.fallback) {
        Some(fallback) => fallback.visible = true,
        None => log::warn!("fallback entity '{}' not found", check.fallback),
    }
    if let Some(entity) = scene.entity_mut(&check.entity) {
        entity.model_src = None;
    }
}

// ─── Aggregate status ────────────────────────────────────────────────

pub const STATUS_COMPLETE_COLOR: Color = Color::rgb(0x4c, 0xaf, 0x50);

/// Monotonic completion counter over all configured assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    completed: usize,
    total: usize,
}

impl LoadProgress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }

    fn record_completion(&mut self) {
        debug_assert!(self.completed < self.total);
        self.completed += 1;
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    /// Render the human-readable status. Depends only on the counts, never
    /// on which asset finished first.
    pub fn status(&self) -> StatusView {
        if self.total == 0 {
            StatusView {
                text: "Scene loaded successfully!".into(),
                color: Some(STATUS_COMPLETE_COLOR),
            }
        } else if self.is_complete() {
            StatusView {
                text: "All models loaded successfully!".into(),
                color: Some(STATUS_COMPLETE_COLOR),
            }
        } else {
            StatusView {
                text: format!("Loading models... {}/{}", self.completed, self.total),
                color: None,
            }
        }
    }
}

/// What the status line should currently show. `color` is `None` while the
/// element keeps its stylesheet color.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub text: String,
    pub color: Option<Color>,
}

// ─── Controller ──────────────────────────────────────────────────────

/// Observable lifecycle of one watched asset. `Resolved` and
/// `FallbackApplied` are terminal; there is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetState {
    /// Waiting for a loader signal or the deadline.
    Scheduled,
    /// Asset displayed, possibly rescaled.
    Resolved,
    /// Placeholder displayed instead.
    FallbackApplied,
}

#[derive(Debug)]
struct Watch {
    check: AssetCheckDoc,
    deadline_ms: f64,
    state: AssetState,
}

enum SettleCause {
    /// Inspect the entity's current mesh content.
    Probe,
    /// The loader already told us the asset is gone.
    KnownFailed,
}

/// Owns the per-asset watches and the progress counter. All mutation goes
/// through `on_model_loaded`/`on_model_failed`/`tick`, which run to
/// completion on the host's single event thread.
pub struct LoadController {
    watches: Vec<Watch>,
    progress: LoadProgress,
    started: bool,
    cancelled: bool,
}

impl LoadController {
    pub fn new(checks: Vec<AssetCheckDoc>) -> Self {
        let progress = LoadProgress::new(checks.len());
        let watches = checks
            .into_iter()
            .map(|check| Watch {
                check,
                deadline_ms: 0.0,
                state: AssetState::Scheduled,
            })
            .collect();
        Self {
            watches,
            progress,
            started: false,
            cancelled: false,
        }
    }

    /// Arm the per-asset deadlines relative to `now_ms` (scene-loaded time).
    pub fn begin(&mut self, now_ms: f64) {
        self.started = true;
        for watch in &mut self.watches {
            watch.deadline_ms = now_ms + watch.check.delay_ms as f64;
        }
    }

    /// Loader signal: the asset finished loading. Settles it immediately;
    /// the mesh content is still verified, a nominally-successful load with
    /// no geometry falls back all the same.
    pub fn on_model_loaded(&mut self, scene: &mut SceneGraph, entity_id: &str) {
        if let Some(idx) = self.index_of(entity_id) {
            self.settle(scene, idx, SettleCause::Probe);
        }
    }

    /// Loader signal: the asset failed outright.
    pub fn on_model_failed(&mut self, scene: &mut SceneGraph, entity_id: &str) {
        if let Some(idx) = self.index_of(entity_id) {
            self.settle(scene, idx, SettleCause::KnownFailed);
        }
    }

    /// Settle every watch whose deadline has passed without a loader signal.
    pub fn tick(&mut self, scene: &mut SceneGraph, now_ms: f64) {
        if !self.started {
            return;
        }
        for idx in 0..self.watches.len() {
            if self.watches[idx].state == AssetState::Scheduled
                && now_ms >= self.watches[idx].deadline_ms
            {
                self.settle(scene, idx, SettleCause::Probe);
            }
        }
    }

    /// Abandon all pending watches, for scene teardown. Later signals and
    /// ticks mutate nothing.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn progress(&self) -> LoadProgress {
        self.progress
    }

    pub fn status(&self) -> StatusView {
        self.progress.status()
    }

    pub fn is_complete(&self) -> bool {
        self.progress.is_complete()
    }

    pub fn state_of(&self, entity_id: &str) -> Option<AssetState> {
        self.index_of(entity_id).map(|idx| self.watches[idx].state)
    }

    /// Entity ids of all watched assets, in configuration order.
    pub fn watched_entities(&self) -> Vec<String> {
        self.watches.iter().map(|w| w.check.entity.clone()).collect()
    }

    fn index_of(&self, entity_id: &str) -> Option<usize> {
        self.watches.iter().position(|w| w.check.entity == entity_id)
    }

    fn settle(&mut self, scene: &mut SceneGraph, idx: usize, cause: SettleCause) {
        if self.cancelled || self.watches[idx].state != AssetState::Scheduled {
            return;
        }
        let check = self.watches[idx].check.clone();
        let result = match cause {
            SettleCause::KnownFailed => ProbeResult::Missing,
            SettleCause::Probe => scene
                .entity(&check.entity)
                .map(probe)
                .unwrap_or(ProbeResult::Missing),
        };
        let state = match result {
            ProbeResult::Loaded { children, size } => {
                log::info!("model '{}' loaded ({children} mesh children)", check.entity);
                if let Some(factor) = corrective_scale(size, &check) {
                    if let Some(entity) = scene.entity_mut(&check.entity) {
                        entity.scale = Vec3::splat(factor);
                        if factor > 1.0 {
                            log::info!("model '{}' scaled up (was too small)", check.entity);
                        } else {
                            log::info!("model '{}' scaled down (was too large)", check.entity);
                        }
                    }
                }
                AssetState::Resolved
            }
            ProbeResult::Missing => {
                log::warn!(
                    "model '{}' failed to load, showing fallback geometry",
                    check.entity
                );
                apply_fallback(scene, &check);
                AssetState::FallbackApplied
            }
        };
        self.watches[idx].state = state;
        self.progress.record_completion();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MeshChild, MeshContent};
    use shoreline_scene_shared::scene_format::{EntityDoc, EntityKind, SceneDoc};

    fn model_doc(id: &str) -> EntityDoc {
        EntityDoc {
            id: id.into(),
            kind: EntityKind::Model {
                src: format!("{id}.glb"),
            },
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            color: None,
            visible: true,
        }
    }

    fn fallback_doc(id: &str) -> EntityDoc {
        EntityDoc {
            id: id.into(),
            kind: EntityKind::Box,
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            color: None,
            visible: false,
        }
    }

    fn check(entity: &str, fallback: &str, delay_ms: u64) -> AssetCheckDoc {
        AssetCheckDoc {
            entity: entity.into(),
            fallback: fallback.into(),
            delay_ms,
            min_size: 0.5,
            max_size: 5.0,
            upscale: 1.6,
            downscale: 0.4,
        }
    }

    /// Mesh whose bounding size is (x, y, z).
    fn mesh_sized(x: f32, y: f32, z: f32) -> MeshContent {
        MeshContent {
            children: vec![MeshChild {
                positions: vec![0.0, 0.0, 0.0, x, y, z],
            }],
        }
    }

    fn three_asset_scene() -> (SceneGraph, LoadController) {
        let doc = SceneDoc {
            name: "beach".into(),
            entities: vec![
                model_doc("clock"),
                fallback_doc("fallback-clock"),
                model_doc("crate"),
                fallback_doc("fallback-crate"),
                model_doc("shell"),
                fallback_doc("fallback-shell"),
            ],
            assets: vec![
                check("clock", "fallback-clock", 2000),
                check("crate", "fallback-crate", 3000),
                check("shell", "fallback-shell", 4000),
            ],
            interactions: vec![],
        };
        let scene = SceneGraph::from_doc(&doc).unwrap();
        let controller = LoadController::new(doc.assets);
        (scene, controller)
    }

    // ── probe ──

    #[test]
    fn test_probe_missing_when_no_mesh() {
        let (scene, _) = three_asset_scene();
        assert_eq!(probe(scene.entity("clock").unwrap()), ProbeResult::Missing);
    }

    #[test]
    fn test_probe_missing_when_empty_children() {
        let (mut scene, _) = three_asset_scene();
        scene.attach_mesh("clock", MeshContent::default());
        assert_eq!(probe(scene.entity("clock").unwrap()), ProbeResult::Missing);
    }

    #[test]
    fn test_probe_loaded_reports_children_and_size() {
        let (mut scene, _) = three_asset_scene();
        scene.attach_mesh("clock", mesh_sized(1.0, 2.0, 2.0));
        match probe(scene.entity("clock").unwrap()) {
            ProbeResult::Loaded { children, size } => {
                assert_eq!(children, 1);
                assert_eq!(size, Vec3::new(1.0, 2.0, 2.0));
            }
            ProbeResult::Missing => panic!("expected Loaded"),
        }
    }

    // ── corrective_scale ──

    #[test]
    fn test_corrective_scale_too_small() {
        let c = check("clock", "fallback-clock", 2000);
        assert_eq!(corrective_scale(Vec3::new(0.4, 0.0, 0.0), &c), Some(1.6));
    }

    #[test]
    fn test_corrective_scale_too_large() {
        let c = check("clock", "fallback-clock", 2000);
        assert_eq!(corrective_scale(Vec3::new(6.0, 0.0, 0.0), &c), Some(0.4));
    }

    #[test]
    fn test_corrective_scale_in_range() {
        let c = check("clock", "fallback-clock", 2000);
        assert_eq!(corrective_scale(Vec3::new(2.0, 1.0, 1.0), &c), None);
    }

    #[test]
    fn test_corrective_scale_boundaries_untouched() {
        // Strict inequalities on both sides: exactly min or max is fine.
        let c = check("clock", "fallback-clock", 2000);
        assert_eq!(corrective_scale(Vec3::new(0.5, 0.0, 0.0), &c), None);
        assert_eq!(corrective_scale(Vec3::new(5.0, 0.0, 0.0), &c), None);
    }

    // ── apply_fallback ──

    #[test]
    fn test_fallback_shows_placeholder_and_clears_src() {
        let (mut scene, _) = three_asset_scene();
        let c = check("clock", "fallback-clock", 2000);
        apply_fallback(&mut scene, &c);
        assert!(scene.entity("fallback-clock").unwrap().visible);
        assert!(scene.entity("clock").unwrap().model_src.is_none());
    }

    #[test]
    fn test_fallback_idempotent() {
        let (mut scene, _) = three_asset_scene();
        let c = check("clock", "fallback-clock", 2000);
        apply_fallback(&mut scene, &c);
        let fallback_once = scene.entity("fallback-clock").unwrap().clone();
        let entity_once = scene.entity("clock").unwrap().clone();
        apply_fallback(&mut scene, &c);
        assert_eq!(*scene.entity("fallback-clock").unwrap(), fallback_once);
        assert_eq!(*scene.entity("clock").unwrap(), entity_once);
    }

    // ── status rendering ──

    #[test]
    fn test_status_incomplete() {
        let mut progress = LoadProgress::new(3);
        progress.record_completion();
        let view = progress.status();
        assert_eq!(view.text, "Loading models... 1/3");
        assert_eq!(view.color, None);
    }

    #[test]
    fn test_status_complete() {
        let mut progress = LoadProgress::new(2);
        progress.record_completion();
        progress.record_completion();
        let view = progress.status();
        assert_eq!(view.text, "All models loaded successfully!");
        assert_eq!(view.color, Some(STATUS_COMPLETE_COLOR));
    }

    #[test]
    fn test_status_no_assets() {
        let progress = LoadProgress::new(0);
        assert!(progress.is_complete());
        assert_eq!(progress.status().text, "Scene loaded successfully!");
    }

    // ── controller ──

    #[test]
    fn test_scenario_one_missing_asset() {
        // Assets at 2000/3000/4000 ms; the second one never loads.
        let (mut scene, mut controller) = three_asset_scene();
        scene.attach_mesh("clock", mesh_sized(1.0, 1.0, 1.0));
        scene.attach_mesh("shell", mesh_sized(2.0, 1.0, 1.0));
        controller.begin(0.0);

        controller.tick(&mut scene, 1999.0);
        assert_eq!(controller.progress().completed(), 0);

        controller.tick(&mut scene, 2000.0);
        assert_eq!(controller.progress().completed(), 1);
        assert_eq!(controller.state_of("clock"), Some(AssetState::Resolved));

        controller.tick(&mut scene, 3000.0);
        assert_eq!(controller.state_of("crate"), Some(AssetState::FallbackApplied));
        assert!(scene.entity("fallback-crate").unwrap().visible);
        assert!(scene.entity("crate").unwrap().model_src.is_none());
        assert_eq!(controller.status().text, "Loading models... 2/3");

        controller.tick(&mut scene, 4000.0);
        assert_eq!(controller.progress().completed(), 3);
        assert!(controller.is_complete());
        assert_eq!(controller.status().text, "All models loaded successfully!");
    }

    #[test]
    fn test_every_watch_settles_exactly_once() {
        let (mut scene, mut controller) = three_asset_scene();
        scene.attach_mesh("clock", mesh_sized(1.0, 1.0, 1.0));
        controller.begin(0.0);
        controller.tick(&mut scene, 10_000.0);
        for id in ["clock", "crate", "shell"] {
            let state = controller.state_of(id).unwrap();
            assert_ne!(state, AssetState::Scheduled, "{id} never settled");
        }
        assert_eq!(controller.progress().completed(), 3);

        // A spurious later tick changes nothing.
        controller.tick(&mut scene, 20_000.0);
        assert_eq!(controller.progress().completed(), 3);
    }

    #[test]
    fn test_completion_count_is_order_independent() {
        for order in [
            ["clock", "crate", "shell"],
            ["shell", "clock", "crate"],
            ["crate", "shell", "clock"],
        ] {
            let (mut scene, mut controller) = three_asset_scene();
            for id in ["clock", "crate", "shell"] {
                scene.attach_mesh(id, mesh_sized(1.0, 1.0, 1.0));
            }
            controller.begin(0.0);
            for (i, id) in order.iter().enumerate() {
                controller.on_model_loaded(&mut scene, id);
                assert_eq!(controller.progress().completed(), i + 1);
            }
            assert_eq!(controller.status().text, "All models loaded successfully!");
        }
    }

    #[test]
    fn test_loader_signal_settles_before_deadline() {
        let (mut scene, mut controller) = three_asset_scene();
        scene.attach_mesh("clock", mesh_sized(1.0, 1.0, 1.0));
        controller.begin(0.0);

        controller.on_model_loaded(&mut scene, "clock");
        assert_eq!(controller.state_of("clock"), Some(AssetState::Resolved));
        assert_eq!(controller.progress().completed(), 1);

        // The deadline tick for an already-settled watch is a no-op.
        controller.tick(&mut scene, 2000.0);
        assert_eq!(controller.progress().completed(), 1);
    }

    #[test]
    fn test_loader_failure_signal_applies_fallback_early() {
        let (mut scene, mut controller) = three_asset_scene();
        controller.begin(0.0);
        controller.on_model_failed(&mut scene, "shell");
        assert_eq!(controller.state_of("shell"), Some(AssetState::FallbackApplied));
        assert!(scene.entity("fallback-shell").unwrap().visible);
    }

    #[test]
    fn test_loaded_signal_without_geometry_falls_back() {
        // The loader claims success but deposited nothing renderable.
        let (mut scene, mut controller) = three_asset_scene();
        scene.attach_mesh("clock", MeshContent::default());
        controller.begin(0.0);
        controller.on_model_loaded(&mut scene, "clock");
        assert_eq!(controller.state_of("clock"), Some(AssetState::FallbackApplied));
    }

    #[test]
    fn test_small_model_upscaled_exactly_once() {
        let (mut scene, mut controller) = three_asset_scene();
        // Diagonal 0.4, below the 0.5 threshold.
        scene.attach_mesh("clock", mesh_sized(0.4, 0.0, 0.0));
        controller.begin(0.0);
        controller.tick(&mut scene, 2000.0);
        assert_eq!(scene.entity("clock").unwrap().scale, Vec3::splat(1.6));

        // Settled; no second application on later ticks or signals.
        controller.tick(&mut scene, 5000.0);
        controller.on_model_loaded(&mut scene, "clock");
        assert_eq!(scene.entity("clock").unwrap().scale, Vec3::splat(1.6));
    }

    #[test]
    fn test_large_model_downscaled() {
        let (mut scene, mut controller) = three_asset_scene();
        scene.attach_mesh("clock", mesh_sized(4.0, 4.0, 4.0));
        controller.begin(0.0);
        controller.tick(&mut scene, 2000.0);
        assert_eq!(scene.entity("clock").unwrap().scale, Vec3::splat(0.4));
    }

    #[test]
    fn test_boundary_diagonal_not_rescaled() {
        let (mut scene, mut controller) = three_asset_scene();
        scene.attach_mesh("clock", mesh_sized(0.5, 0.0, 0.0));
        controller.begin(0.0);
        controller.tick(&mut scene, 2000.0);
        assert_eq!(controller.state_of("clock"), Some(AssetState::Resolved));
        assert_eq!(scene.entity("clock").unwrap().scale, Vec3::ONE);
    }

    #[test]
    fn test_cancel_stops_all_mutation() {
        let (mut scene, mut controller) = three_asset_scene();
        controller.begin(0.0);
        controller.cancel();
        controller.tick(&mut scene, 10_000.0);
        controller.on_model_failed(&mut scene, "clock");
        assert_eq!(controller.progress().completed(), 0);
        assert_eq!(controller.state_of("clock"), Some(AssetState::Scheduled));
        assert!(!scene.entity("fallback-clock").unwrap().visible);
    }

    #[test]
    fn test_tick_before_begin_is_inert() {
        let (mut scene, mut controller) = three_asset_scene();
        controller.tick(&mut scene, 1_000_000.0);
        assert_eq!(controller.progress().completed(), 0);
    }

    #[test]
    fn test_unknown_entity_signal_ignored() {
        let (mut scene, mut controller) = three_asset_scene();
        controller.begin(0.0);
        controller.on_model_loaded(&mut scene, "nonexistent");
        controller.on_model_failed(&mut scene, "nonexistent");
        assert_eq!(controller.progress().completed(), 0);
    }
}
