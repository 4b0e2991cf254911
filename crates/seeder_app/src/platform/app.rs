use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use seeder_core::{update, AppState, Msg, QueryGenerator, Stats};
use seeder_engine::{
    AcquisitionLoop, CollectionStore, DownloadWorker, FetchSettings, Fetcher, HtmlSearchClient,
    InferClassifier, ReqwestFetcher, SearchSettings,
};
use seeder_logging::{seeder_info, seeder_warn};
use tokio_util::sync::CancellationToken;

use super::config::{Cli, Config};
use super::effects::{EffectRunner, Stoppable};
use super::reporter::spawn_reporter;
use super::signal::Interrupts;

pub fn run_app() -> anyhow::Result<()> {
    let config = Config::resolve(Cli::parse())?;
    seeder_logging::initialize(config.log, config.log_level, &config.log_file);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    runtime.block_on(run(config))
}

async fn run(config: Config) -> anyhow::Result<()> {
    let mut interrupts = Interrupts::install();

    let store = CollectionStore::open(&config.store_dir)
        .with_context(|| format!("preparing store directory {:?}", config.store_dir))?;
    let store = Arc::new(store);
    let search_settings = SearchSettings {
        endpoint: config.search_url.clone(),
        ..SearchSettings::default()
    };
    search_settings.endpoint_url()?;
    let fetcher: Arc<dyn Fetcher> =
        Arc::new(ReqwestFetcher::new(FetchSettings::default()).context("building HTTP client")?);

    let stats = Arc::new(Stats::new());
    let search = Arc::new(HtmlSearchClient::new(Arc::clone(&fetcher), search_settings));
    let worker = DownloadWorker::new(fetcher, Arc::clone(&store), Arc::clone(&stats));
    let queries = QueryGenerator::new(config.file_type.clone(), config.token_len);

    seeder_info!(
        "collecting {:?} into {:?} (delay {:?})",
        config.file_type,
        config.store_dir,
        config.delay
    );
    println!("Hit CTRL-C to stop execution at any time");

    let reporter_cancel = CancellationToken::new();
    let reporter = Stoppable {
        handle: spawn_reporter(Arc::clone(&stats), reporter_cancel.clone()),
        cancel: reporter_cancel,
    };
    let acquisition_cancel = CancellationToken::new();
    let acquisition = Stoppable {
        handle: tokio::spawn(
            AcquisitionLoop::new(
                queries,
                search,
                worker,
                config.delay,
                acquisition_cancel.clone(),
            )
            .run(),
        ),
        cancel: acquisition_cancel,
    };

    let mut runner = EffectRunner {
        acquisition: Some(acquisition),
        reporter: Some(reporter),
        store,
        stats,
        classifier: Arc::new(InferClassifier),
        file_type: config.file_type,
        last_summary: None,
    };

    let name = interrupts.recv().await;
    seeder_info!("{} received, shutting down", name);
    shutdown(&mut runner, &mut interrupts).await;
    Ok(())
}

/// Feeds the interrupt through the state machine and executes effects until
/// it reaches `Terminated`.
async fn shutdown(runner: &mut EffectRunner, interrupts: &mut Interrupts) -> AppState {
    let mut state = AppState::new();
    let mut inbox = VecDeque::from([Msg::InterruptReceived]);

    while let Some(msg) = inbox.pop_front() {
        let (next, effects) = update(state, msg);
        state = next;
        for effect in effects {
            inbox.extend(runner.execute(effect, interrupts).await);
        }
        if state.is_terminated() {
            break;
        }
    }

    if state.interrupts_received() > 1 {
        seeder_warn!(
            "{} extra interrupts ignored during shutdown",
            state.interrupts_received() - 1
        );
    }
    state
}

#[cfg(test)]
mod tests {
    use std::fs;

    use seeder_core::{CleanupCounts, ShutdownPhase, StatsSnapshot};
    use tempfile::TempDir;

    use super::*;

    fn idle_task<T: Send + 'static>(value: T) -> Stoppable<T> {
        let cancel = CancellationToken::new();
        let stopped = cancel.clone();
        Stoppable {
            handle: tokio::spawn(async move {
                stopped.cancelled().await;
                value
            }),
            cancel,
        }
    }

    #[tokio::test]
    async fn shutdown_halts_tasks_cleans_store_and_reports() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(CollectionStore::open(temp.path()).unwrap());
        let pdf = b"%PDF-1.4\n%%EOF\n";
        fs::write(store.path_of("itema"), pdf).unwrap();
        fs::write(store.path_of("itemb"), pdf).unwrap();
        fs::write(store.path_of("itemc"), b"plain text").unwrap();

        let stats = Arc::new(Stats::new());
        let _ok = stats.begin_attempt();
        stats.begin_attempt().fail();
        stats.tick();

        let acquisition = idle_task(7u64);
        let reporter = idle_task(());
        let acquisition_cancel = acquisition.cancel.clone();
        let reporter_cancel = reporter.cancel.clone();
        let mut runner = EffectRunner {
            acquisition: Some(acquisition),
            reporter: Some(reporter),
            store: Arc::clone(&store),
            stats,
            classifier: Arc::new(InferClassifier),
            file_type: "pdf".to_string(),
            last_summary: None,
        };
        let mut interrupts = Interrupts::install();

        let state = shutdown(&mut runner, &mut interrupts).await;

        assert_eq!(state.phase(), ShutdownPhase::Terminated);
        assert!(acquisition_cancel.is_cancelled());
        assert!(reporter_cancel.is_cancelled());
        assert_eq!(store.items().unwrap(), vec!["itema"]);

        let summary = runner.last_summary.expect("summary printed");
        assert_eq!(
            summary.stats,
            StatsSnapshot {
                num_downloads: 2,
                failed_downloads: 1,
                elapsed_secs: 1,
            }
        );
        assert_eq!(
            summary.cleanup,
            CleanupCounts {
                removed_by_type: 1,
                removed_as_duplicate: 1,
                remaining: 1,
            }
        );
        assert_eq!(summary.store_dir, temp.path().display().to_string());
    }
}
