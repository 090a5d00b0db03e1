//! Driver runs the engineer against a provider in a background task

use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::engineer::{EngineerReport, StintEngineer};
use crate::provider::Provider;

/// Consecutive provider errors tolerated before the driver gives up.
const MAX_ERRORS: u32 = 10;

/// Result of spawning the driver task
pub struct DriverChannels {
    /// Latest report, `None` before the first sample and after the provider gives up
    pub reports: watch::Receiver<Option<Arc<EngineerReport>>>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
    /// Resolves to the engineer once the task stops
    pub task: JoinHandle<StintEngineer>,
}

impl DriverChannels {
    /// Reports as a stream, skipping the empty placeholder values.
    ///
    /// The stream yields the latest report whenever it changes and ends when
    /// the driver task stops. Intermediate reports may be skipped by a slow
    /// consumer.
    pub fn report_stream(&self) -> impl Stream<Item = Arc<EngineerReport>> + Send + 'static {
        WatchStream::new(self.reports.clone()).filter_map(|report| async move { report })
    }

    /// Most recent report, if any.
    pub fn latest(&self) -> Option<Arc<EngineerReport>> {
        self.reports.borrow().clone()
    }
}

/// Driver spawns and manages the telemetry processing task
///
/// The task owns both the provider and the engineer, so the analysis state is
/// only ever touched sequentially from one place.
pub struct Driver;

impl Driver {
    /// Spawn the driver task for the given provider and engineer
    pub fn spawn<P>(provider: P, engineer: StintEngineer) -> DriverChannels
    where
        P: Provider,
    {
        let (report_tx, report_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        let task = tokio::spawn(async move {
            Self::engineer_task(provider, engineer, report_tx, cancel_task).await
        });

        DriverChannels { reports: report_rx, cancel, task }
    }

    async fn engineer_task<P>(
        mut provider: P,
        mut engineer: StintEngineer,
        report_tx: watch::Sender<Option<Arc<EngineerReport>>>,
        cancel: CancellationToken,
    ) -> StintEngineer
    where
        P: Provider,
    {
        info!(tick_rate = provider.tick_rate(), "Engineer task started");
        let mut sample_count = 0u64;
        let mut error_count = 0u32;

        loop {
            if cancel.is_cancelled() {
                info!("Engineer task cancelled");
                break;
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Engineer task cancelled during read");
                    break;
                }
                result = provider.next_sample() => result,
            };

            match result {
                Ok(Some(sample)) => {
                    error_count = 0;
                    if let Err(e) = sample.validate() {
                        warn!(error = %e, "Skipping invalid sample");
                        continue;
                    }

                    sample_count += 1;
                    let previous = engineer.state();
                    engineer.update(&sample);
                    if engineer.state() != previous {
                        debug!(from = %previous, to = %engineer.state(), "Stint state changed");
                    }
                    let report = Arc::new(engineer.report());
                    trace!(sample = sample_count, phase = %report.phase, "Sample processed");

                    if report_tx.send(Some(report)).is_err() {
                        debug!("Report receiver dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!(samples = sample_count, "Provider stream ended");
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    error!(attempt = error_count, max = MAX_ERRORS, error = %e, "Provider error");

                    if error_count >= MAX_ERRORS {
                        error!("Too many provider errors, shutting down");
                        let _ = report_tx.send(None);
                        break;
                    }

                    // Exponential backoff: 100ms, 200ms, ... capped at 1.6s
                    let backoff = std::time::Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        info!(samples = sample_count, "Engineer task ended");
        engineer
    }
}
