//! Application orchestrator — wires the watcher, pipeline and tray together.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use wowcache_pipeline::{Notifier, PipelineContext, Severity, UploadPipeline, run_worker};
use wowcache_tray::{TrayConfig, TrayEvent, TrayHandle};
use wowcache_upload::UploadClient;
use wowcache_watch::{CacheWatcher, JOB_QUEUE_DEPTH, watch_targets};

use crate::autostart;
use crate::config::{self, Config};
use crate::update;

/// Runs the agent until shutdown is requested.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let install_dir = PathBuf::from(&config.install_dir);

    if !config::is_valid_install_dir(&install_dir) {
        tracing::warn!(
            dir = %install_dir.display(),
            "install directory not recognized; check install_dir in the config file"
        );
    }

    // -- Watch targets --
    let targets = watch_targets(&install_dir);
    if targets.is_empty() {
        tracing::warn!("no cache directories to watch; the agent will stay idle");
    }

    // -- Tray --
    let (tray, _event_tx, _update_rx) = TrayHandle::new(TrayConfig::default());
    let tray = Arc::new(Mutex::new(tray));

    // -- Pipeline worker --
    let notifier: Arc<dyn Notifier> = Arc::new(TrayNotifier::new(Arc::clone(&tray)));
    let client = UploadClient::new(&config.api_token)?;
    let ctx = PipelineContext {
        install_dir: install_dir.clone(),
        show_success_notifications: config.show_notifications,
    };
    let pipeline = UploadPipeline::new(ctx, client, Arc::clone(&notifier));

    let (jobs_tx, jobs_rx) = mpsc::channel(JOB_QUEUE_DEPTH);
    let worker = tokio::spawn(run_worker(jobs_rx, pipeline, cancel.clone()));

    // -- Watcher --
    let mut watcher = CacheWatcher::new(jobs_tx)?;
    for target in &targets {
        watcher.watch(target)?;
    }

    // -- Autostart --
    let login = autostart::platform_autostart();
    if let Err(e) = autostart::apply(login.as_ref(), config.run_at_login) {
        tracing::warn!(error = %e, "could not update run-at-login registration");
    }

    // -- Update check --
    {
        let notifier = Arc::clone(&notifier);
        tokio::spawn(async move {
            update::check(
                update::VERSION_CHECK_URL,
                env!("CARGO_PKG_VERSION"),
                notifier.as_ref(),
            )
            .await;
        });
    }

    tracing::info!("agent ready");

    // -- Main loop: wait for shutdown --
    let quit_tray = Arc::clone(&tray);
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
        }
        _ = async move {
            loop {
                let quit = matches!(
                    quit_tray.lock().unwrap().try_recv_event(),
                    Some(TrayEvent::QuitRequested)
                );
                if quit {
                    break;
                }
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            }
        } => {
            tracing::info!("quit requested via tray");
        }
    }

    // -- Graceful shutdown --
    tracing::info!("stopping services...");
    cancel.cancel();
    let _ = worker.await;
    drop(watcher);
    tray.lock().unwrap().shutdown();

    Ok(())
}

/// Bridges pipeline notifications to the tray: balloons, busy state, and a
/// log line for headless runs.
struct TrayNotifier {
    tray: Arc<Mutex<TrayHandle>>,
    last_title: Mutex<Option<String>>,
}

impl TrayNotifier {
    fn new(tray: Arc<Mutex<TrayHandle>>) -> Self {
        Self {
            tray,
            last_title: Mutex::new(None),
        }
    }
}

impl Notifier for TrayNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Info => tracing::info!(title, message, "notification"),
            Severity::Error => tracing::warn!(title, message, "notification"),
        }
        *self.last_title.lock().unwrap() = Some(title.to_string());
        self.tray
            .lock()
            .unwrap()
            .balloon(title, message, severity == Severity::Error);
    }

    fn upload_started(&self) {
        self.tray.lock().unwrap().upload_started();
    }

    fn upload_finished(&self) {
        let outcome = self
            .last_title
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| "Done".into());
        self.tray.lock().unwrap().upload_finished(outcome);
    }
}
