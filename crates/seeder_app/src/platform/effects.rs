use std::io::{self, Write};
use std::sync::Arc;

use seeder_core::{Effect, Msg, Stats, Summary};
use seeder_engine::{sanitize_collection, CollectionStore, TypeClassifier};
use seeder_logging::{seeder_error, seeder_info, seeder_warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::signal::Interrupts;

/// A background task together with the token that stops it.
pub struct Stoppable<T> {
    pub cancel: CancellationToken,
    pub handle: JoinHandle<T>,
}

/// Executes the effects emitted by the shutdown state machine.
pub struct EffectRunner {
    pub acquisition: Option<Stoppable<u64>>,
    pub reporter: Option<Stoppable<()>>,
    pub store: Arc<CollectionStore>,
    pub stats: Arc<Stats>,
    pub classifier: Arc<dyn TypeClassifier>,
    pub file_type: String,
    pub last_summary: Option<Summary>,
}

impl EffectRunner {
    /// Runs one effect and returns the messages it produced, in arrival order.
    pub async fn execute(&mut self, effect: Effect, interrupts: &mut Interrupts) -> Vec<Msg> {
        match effect {
            Effect::HaltAcquisition => {
                if let Some(task) = self.acquisition.take() {
                    task.cancel.cancel();
                    match task.handle.await {
                        Ok(iterations) => {
                            seeder_info!("acquisition halted after {} iterations", iterations)
                        }
                        Err(err) => seeder_error!("acquisition task ended abnormally: {}", err),
                    }
                }
                Vec::new()
            }
            Effect::StopReporter => {
                if let Some(task) = self.reporter.take() {
                    task.cancel.cancel();
                    if let Err(err) = task.handle.await {
                        seeder_error!("progress reporter ended abnormally: {}", err);
                    }
                }
                Vec::new()
            }
            Effect::RunCleanup => self.run_cleanup(interrupts).await,
            Effect::PrintSummary(summary) => {
                if let Err(err) = write_summary(&mut io::stdout().lock(), &summary) {
                    // Keep the report in the log when the terminal is gone.
                    seeder_warn!("could not print summary: {}\n{}", err, summary);
                }
                self.last_summary = Some(summary);
                vec![Msg::SummaryPrinted]
            }
            Effect::Exit => {
                seeder_info!("shutdown complete");
                Vec::new()
            }
        }
    }

    async fn run_cleanup(&mut self, interrupts: &mut Interrupts) -> Vec<Msg> {
        seeder_info!("cleaning {:?} for type {:?}", self.store.dir(), self.file_type);
        let store = Arc::clone(&self.store);
        let classifier = Arc::clone(&self.classifier);
        let target = self.file_type.clone();
        let mut sweep = tokio::task::spawn_blocking(move || {
            sanitize_collection(&store, classifier.as_ref(), &target)
        });

        let mut msgs = Vec::new();
        let counts = loop {
            tokio::select! {
                joined = &mut sweep => break joined,
                name = interrupts.recv() => {
                    seeder_warn!("{} received during cleanup; already shutting down", name);
                    msgs.push(Msg::InterruptReceived);
                }
            }
        };
        let counts = counts.unwrap_or_else(|err| {
            seeder_error!("cleanup task ended abnormally: {}", err);
            Default::default()
        });

        msgs.push(Msg::CleanupFinished(Summary {
            stats: self.stats.snapshot(),
            cleanup: counts,
            store_dir: self.store.dir().display().to_string(),
        }));
        msgs
    }
}

fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    write!(out, "\n\n\n{summary}\n\n\n")?;
    out.flush()
}
