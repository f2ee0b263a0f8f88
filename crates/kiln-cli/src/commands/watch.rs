//! `kiln watch`: watch bindings, live reload and the static file server.
//!
//! No initial build runs; each binding rebuilds only what its sources feed.
//! Failures inside a binding are logged and the loop keeps waiting for the
//! next change. Only a failure to start, or the server stopping, ends it.

use std::sync::Arc;

use kiln_config::Config;
use kiln_pipeline::Orchestrator;
use tokio::signal;

use crate::error::{CliError, Result, ResultExt};
use crate::livereload::LiveReload;
use crate::server::DevServer;
use crate::testing::TestRunnerHook;
use crate::ui;
use crate::watch::{FileWatcher, IgnoreRules, WatchRouter};

pub async fn execute(config: Arc<Config>) -> Result<()> {
    let orchestrator = Arc::new(Orchestrator::new(Arc::clone(&config))?);
    let tests = TestRunnerHook::from_config(&config).map(Arc::new);

    let (reload, reload_addr) = LiveReload::listen(config.livereload_addr()?).await?;
    ui::info(&format!(
        "Live reload script at http://{}/livereload.js",
        reload_addr
    ));

    let router = WatchRouter::from_config(&config, orchestrator, tests, reload)?;
    for binding in router.bindings() {
        tracing::debug!(binding = %binding.name, action = ?binding.action, "watch binding registered");
    }

    let rules = IgnoreRules::new(&config.root, config.dist_dir(), &config.watch.ignore).keep(
        [config.paths.meta.as_ref(), config.test.as_ref().and_then(|t| t.config_file.as_ref())]
            .into_iter()
            .flatten()
            .map(|path| config.resolve(path)),
    );
    let (watcher, mut changes) =
        FileWatcher::new(config.root.clone(), rules, config.watch.debounce_ms)
            .context("Failed to start the file watcher")?;
    ui::info(&format!("Watching {}", watcher.root().display()));

    let server = DevServer::bind(&config).await?;
    let mut server_task = tokio::spawn(server.serve());

    ui::info("Press Ctrl+C to stop");
    loop {
        tokio::select! {
            Some(batch) = changes.recv() => {
                for path in &batch {
                    tracing::debug!(path = %path.display(), "changed");
                }
                router.dispatch(batch);
            }

            _ = signal::ctrl_c() => {
                ui::info("Stopping watch...");
                break;
            }

            result = &mut server_task => {
                return match result {
                    Ok(Ok(())) => Err(CliError::Server("server stopped unexpectedly".into())),
                    Ok(Err(e)) => Err(e),
                    Err(join) => Err(CliError::Server(join.to_string())),
                };
            }
        }
    }

    ui::success("Watch stopped");
    Ok(())
}
