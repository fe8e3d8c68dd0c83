//! Headless demo runs with a simulated asset loader.
//!
//! Each asset gets its own timer task standing in for the external
//! download: it delivers synthetic geometry partway through the asset's
//! deadline window, or (for ids named via `--fail`) stays silent so the
//! deadline probe catches the miss. All events funnel through one channel
//! into the single loop that owns the scene graph and the load controller,
//! so probe settlement is serialized exactly as it is in the browser.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use shoreline_scene_shared::scene_format::SceneDoc;
use shoreline_web::input::Shortcuts;
use shoreline_web::loading::{AssetState, LoadController};
use shoreline_web::scene::{MeshChild, MeshContent, SceneGraph};

use crate::event_log::EventLog;

/// Options for a headless run.
pub struct RunOptions {
    /// Entity ids whose simulated download never arrives.
    pub fail: Vec<String>,
    /// Multiplier applied to every delay (1.0 = real time).
    pub time_scale: f64,
    /// Keyboard shortcuts applied once loading settles.
    pub keys: String,
}

/// Final state of a run, for reporting.
pub struct RunSummary {
    pub completed: usize,
    pub total: usize,
    pub assets: Vec<(String, AssetState)>,
    pub keys_applied: usize,
    pub log: EventLog,
}

enum RunEvent {
    /// The simulated loader delivered geometry for an entity.
    Delivered { entity: String },
    /// An asset's deadline elapsed; `at_ms` is scene-relative time.
    Deadline { at_ms: f64 },
}

pub async fn run(doc: &SceneDoc, options: &RunOptions) -> Result<RunSummary, String> {
    let mut scene = SceneGraph::from_doc(doc)?;
    let mut controller = LoadController::new(doc.assets.clone());
    let mut log = EventLog::new(1000);

    let (tx, mut rx) = mpsc::unbounded_channel::<RunEvent>();

    for check in &doc.assets {
        if options.fail.iter().any(|id| *id == check.entity) {
            log::info!("simulating a failed download for '{}'", check.entity);
        } else {
            // Deliver partway through the deadline window.
            let entity = check.entity.clone();
            let delay = scaled(check.delay_ms, options.time_scale).mul_f64(0.5);
            let tx = tx.clone();
            tokio::spawn(async move {
                sleep(delay).await;
                let _ = tx.send(RunEvent::Delivered { entity });
            });
        }

        let at_ms = check.delay_ms as f64;
        let delay = scaled(check.delay_ms, options.time_scale);
        let tx = tx.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(RunEvent::Deadline { at_ms });
        });
    }
    drop(tx);

    controller.begin(0.0);
    let mut last_status = String::new();
    report(&controller, &mut last_status, &mut log);

    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::Delivered { entity } => {
                scene.attach_mesh(&entity, synthetic_mesh());
                controller.on_model_loaded(&mut scene, &entity);
                log.push(format!("loader delivered '{entity}'"));
            }
            RunEvent::Deadline { at_ms } => {
                controller.tick(&mut scene, at_ms);
            }
        }
        report(&controller, &mut last_status, &mut log);
        if controller.is_complete() {
            break;
        }
    }
    report(&controller, &mut last_status, &mut log);

    let mut shortcuts = Shortcuts::new();
    let mut keys_applied = 0;
    for key in options.keys.chars() {
        if shortcuts.handle_key(&mut scene, &key.to_string()) {
            keys_applied += 1;
        } else {
            log::warn!("no shortcut bound to '{key}'");
        }
    }

    let assets = controller
        .watched_entities()
        .into_iter()
        .map(|id| {
            let state = controller.state_of(&id).unwrap_or(AssetState::Scheduled);
            (id, state)
        })
        .collect();

    Ok(RunSummary {
        completed: controller.progress().completed(),
        total: controller.progress().total(),
        assets,
        keys_applied,
        log,
    })
}

fn report(controller: &LoadController, last_status: &mut String, log: &mut EventLog) {
    let status = controller.status();
    if status.text != *last_status {
        println!("{}", status.text);
        log.push(status.text.clone());
        *last_status = status.text;
    }
}

fn scaled(delay_ms: u64, time_scale: f64) -> Duration {
    Duration::from_secs_f64((delay_ms as f64 / 1000.0) * time_scale.max(0.0))
}

fn synthetic_mesh() -> MeshContent {
    MeshContent {
        children: vec![MeshChild {
            positions: vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        }],
    }
}
