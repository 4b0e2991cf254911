use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use seeder_core::{status_line, Stats};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

const TICK: Duration = Duration::from_secs(1);

/// Starts the once-per-second runtime line on stdout.
pub fn spawn_reporter(stats: Arc<Stats>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        run_reporter(stats, cancel, TICK, io::stdout()).await;
    })
}

/// Ticks `stats` every `period` and rewrites the status line on `out` until
/// cancelled. Returns the writer once stopped; no tick happens after that.
pub async fn run_reporter<W: Write>(
    stats: Arc<Stats>,
    cancel: CancellationToken,
    period: Duration,
    mut out: W,
) -> W {
    let mut ticker = interval_at(Instant::now() + period, period);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let elapsed = stats.tick();
                // A closed stdout must not stop the clock.
                let _ = write!(out, "{}", status_line(elapsed));
                let _ = out.flush();
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ticks_until_cancelled_then_stops() {
        let stats = Arc::new(Stats::new());
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_reporter(
            Arc::clone(&stats),
            cancel.clone(),
            Duration::from_millis(20),
            Vec::new(),
        ));

        tokio::time::sleep(Duration::from_millis(150)).await;
        cancel.cancel();
        let out = task.await.unwrap();

        let ticks = stats.elapsed_secs();
        assert!(ticks >= 3, "only {ticks} ticks");
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\rRuntime: 0:00:01"));
        assert_eq!(text.matches('\r').count() as u64, ticks);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(stats.elapsed_secs(), ticks);
    }

    #[tokio::test]
    async fn cancelled_before_first_tick_prints_nothing() {
        let stats = Arc::new(Stats::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let out =
            run_reporter(Arc::clone(&stats), cancel, Duration::from_secs(1), Vec::new()).await;
        assert!(out.is_empty());
        assert_eq!(stats.elapsed_secs(), 0);
    }
}
