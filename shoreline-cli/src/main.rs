mod cli;
mod demos;
mod event_log;
mod runner;

use anyhow::Context;
use clap::Parser;

use shoreline_scene_shared::scene_format::SceneDoc;
use shoreline_web::loading::AssetState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = cli::Cli::parse();
    match cli.command {
        cli::Command::List => {
            for (name, blurb) in demos::CATALOG {
                println!("{name:<10} {blurb}");
            }
            Ok(())
        }
        cli::Command::Validate { file } => {
            let doc = load_scene(&file)?;
            println!(
                "{}: {} entities, {} asset checks, {} interactions: OK",
                doc.name,
                doc.entities.len(),
                doc.assets.len(),
                doc.interactions.len()
            );
            Ok(())
        }
        cli::Command::Run {
            scene,
            fail,
            time_scale,
            keys,
        } => {
            let doc = load_scene(&scene)?;
            let options = runner::RunOptions {
                fail,
                time_scale,
                keys,
            };
            let summary = runner::run(&doc, &options)
                .await
                .map_err(|e| anyhow::anyhow!("run failed: {e}"))?;

            println!();
            println!(
                "{}: {}/{} assets settled",
                doc.name, summary.completed, summary.total
            );
            for (id, state) in &summary.assets {
                let label = match state {
                    AssetState::Resolved => "displayed",
                    AssetState::FallbackApplied => "fallback shown",
                    AssetState::Scheduled => "never settled",
                };
                println!("  {id:<24} {label}");
            }
            Ok(())
        }
    }
}

/// Resolve a built-in demo name or read a scene file, then parse and
/// validate the document.
fn load_scene(name_or_path: &str) -> anyhow::Result<SceneDoc> {
    let text = match demos::builtin(name_or_path) {
        Some(text) => text.to_owned(),
        None => std::fs::read_to_string(name_or_path)
            .with_context(|| format!("could not read scene file '{name_or_path}'"))?,
    };
    let doc: SceneDoc =
        toml::from_str(&text).map_err(|e| anyhow::anyhow!("invalid scene document: {e}"))?;
    doc.validate()
        .map_err(|e| anyhow::anyhow!("invalid scene document: {e}"))?;
    Ok(doc)
}
