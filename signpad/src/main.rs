#![warn(clippy::pedantic)]

pub mod global;
pub mod host;
pub mod platform;
pub mod script;

use anyhow::Result as AnyResult;

fn main() -> AnyResult<()> {
    let preferences = global::Preferences::get();
    let level = preferences.settings.log_level;

    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder().filter_level(level).init();
    } else {
        let _ = simple_logging::log_to_file("log.out", level);
    }
    if let Some(e) = preferences.load_error() {
        log::warn!("Using default preferences: {e}");
    }
    if let Err(e) = preferences.save() {
        log::warn!("Failed to save preferences:\n{e:?}");
    }

    let scripts = {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
        // Args are a simple list of gesture scripts to replay, in order.
        let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
        let loaded: Vec<_> = paths
            .into_par_iter()
            .filter_map(|path| match script::Script::load(&path) {
                Ok(script) => Some((path, script)),
                Err(e) => {
                    log::error!("failed to load script {path:?}: {e:#}");
                    None
                }
            })
            .collect();
        loaded
    };
    if scripts.is_empty() {
        log::warn!("No gesture scripts to play. Usage: signpad [SCRIPT...]");
        return Ok(());
    }

    let settings = &preferences.settings;
    let platform = platform::desktop(settings)?;
    let mut host = host::Host::new(settings.canvas_width, settings.canvas_height, platform)?;

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    runtime.block_on(async {
        for (path, script) in scripts {
            log::info!("Playing {path:?} ({} events)", script.events.len());
            let report = host.play(script).await?;
            log::info!(
                "{path:?}: {} commands, {} strokes at {}, {} saved, {} failed",
                report.dispatched,
                report.strokes,
                report.revision,
                report.saved.len(),
                report.failed_saves,
            );
        }
        AnyResult::Ok(())
    })
}
