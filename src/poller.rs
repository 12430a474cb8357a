//! Client-side polling state machine.
//!
//! Polls the status endpoint on a fixed interval until a terminal outcome
//! or the attempt budget runs out. Waiting goes through the [`Waiter`]
//! seam so the loop is testable without wall-clock delay.

use std::time::Duration;

use crate::api::{ApiClient, ApiError, StatusBody};
use crate::job::JobStatus;
use crate::ui;

/// Anything that can answer a status query for a job.
pub trait StatusSource {
    async fn status(&self, job_id: &str) -> Result<StatusBody, ApiError>;
}

impl StatusSource for ApiClient {
    async fn status(&self, job_id: &str) -> Result<StatusBody, ApiError> {
        ApiClient::status(self, job_id).await
    }
}

/// The sleep seam. Production uses [`TokioWaiter`]; tests count calls
/// instead of sleeping.
pub trait Waiter {
    async fn wait(&self, interval: Duration);
}

pub struct TokioWaiter;

impl Waiter for TokioWaiter {
    async fn wait(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

/// Terminal outcome of a polling run. Timeout is distinct from failure:
/// a timed-out job may still complete later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed { download_url: Option<String> },
    Failed { reason: String },
    /// The job disappeared or never existed.
    NotFound,
    TimedOut { attempts: u32 },
}

pub struct Poller {
    interval: Duration,
    max_attempts: u32,
    verbose: bool,
}

impl Poller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            verbose: false,
        }
    }

    /// Log a timestamped line for every non-terminal poll attempt.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Poll until a terminal outcome or the attempt budget is exhausted.
    ///
    /// A transport error during one attempt is transient: it consumes the
    /// attempt and the loop continues. `NotFound` ends the loop at once.
    pub async fn poll(
        &self,
        source: &impl StatusSource,
        waiter: &impl Waiter,
        job_id: &str,
    ) -> PollOutcome {
        for attempt in 1..=self.max_attempts {
            match source.status(job_id).await {
                Ok(body) => match body.status {
                    JobStatus::Completed => {
                        return PollOutcome::Completed {
                            download_url: body.download_url,
                        };
                    }
                    JobStatus::Failed => {
                        return PollOutcome::Failed {
                            reason: body
                                .error
                                .unwrap_or_else(|| "unknown error".to_string()),
                        };
                    }
                    other => self.log_attempt(attempt, &other.to_string()),
                },
                Err(err) if err.is_transient() => {
                    self.log_attempt(attempt, &format!("transient: {err}"));
                }
                Err(_) => return PollOutcome::NotFound,
            }

            if attempt < self.max_attempts {
                waiter.wait(self.interval).await;
            }
        }

        PollOutcome::TimedOut {
            attempts: self.max_attempts,
        }
    }

    fn log_attempt(&self, attempt: u32, detail: &str) {
        if self.verbose {
            ui::log(&format!(
                "poll attempt {attempt}/{}: {detail}",
                self.max_attempts
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Replays a scripted sequence of status responses.
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<StatusBody, ApiError>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<StatusBody, ApiError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }
    }

    impl StatusSource for ScriptedSource {
        async fn status(&self, _job_id: &str) -> Result<StatusBody, ApiError> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("script exhausted")
        }
    }

    struct CountingWaiter {
        waits: AtomicU32,
    }

    impl CountingWaiter {
        fn new() -> Self {
            Self {
                waits: AtomicU32::new(0),
            }
        }

        fn count(&self) -> u32 {
            self.waits.load(Ordering::SeqCst)
        }
    }

    impl Waiter for CountingWaiter {
        async fn wait(&self, _interval: Duration) {
            self.waits.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn body(status: JobStatus) -> Result<StatusBody, ApiError> {
        Ok(StatusBody {
            status,
            download_url: None,
            error: None,
        })
    }

    #[tokio::test]
    async fn completes_as_soon_as_status_is_completed() {
        let source = ScriptedSource::new(vec![
            body(JobStatus::Uploading),
            body(JobStatus::Processing),
            Ok(StatusBody {
                status: JobStatus::Completed,
                download_url: Some("https://store/transcripts/a.txt?sig=y".into()),
                error: None,
            }),
        ]);
        let waiter = CountingWaiter::new();

        let outcome = Poller::new(Duration::from_secs(30), 30)
            .poll(&source, &waiter, "j-1")
            .await;
        assert_eq!(
            outcome,
            PollOutcome::Completed {
                download_url: Some("https://store/transcripts/a.txt?sig=y".into()),
            }
        );
        // One wait between each of the three attempts.
        assert_eq!(waiter.count(), 2);
    }

    #[tokio::test]
    async fn verbose_polling_reaches_the_same_outcome() {
        let source = ScriptedSource::new(vec![
            body(JobStatus::Processing),
            body(JobStatus::Completed),
        ]);
        let waiter = CountingWaiter::new();

        let outcome = Poller::new(Duration::from_secs(30), 30)
            .with_verbose(true)
            .poll(&source, &waiter, "j-1")
            .await;
        assert!(matches!(outcome, PollOutcome::Completed { .. }));
        assert_eq!(waiter.count(), 1);
    }

    #[tokio::test]
    async fn failure_ends_the_loop_before_the_budget() {
        let source = ScriptedSource::new(vec![
            body(JobStatus::Processing),
            Ok(StatusBody {
                status: JobStatus::Failed,
                download_url: None,
                error: Some("decode error".into()),
            }),
        ]);
        let waiter = CountingWaiter::new();

        let outcome = Poller::new(Duration::from_secs(30), 30)
            .poll(&source, &waiter, "j-1")
            .await;
        assert_eq!(
            outcome,
            PollOutcome::Failed {
                reason: "decode error".into(),
            }
        );
        assert_eq!(waiter.count(), 1);
    }

    #[tokio::test]
    async fn stuck_job_times_out_distinct_from_failed() {
        let source =
            ScriptedSource::new((0..30).map(|_| body(JobStatus::Processing)).collect());
        let waiter = CountingWaiter::new();

        let outcome = Poller::new(Duration::from_secs(30), 30)
            .poll(&source, &waiter, "j-1")
            .await;
        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 30 });
        assert!(!matches!(outcome, PollOutcome::Failed { .. }));
        // No wait after the final attempt.
        assert_eq!(waiter.count(), 29);
    }

    #[tokio::test]
    async fn not_found_is_terminal() {
        let source = ScriptedSource::new(vec![Err(ApiError::NotFound)]);
        let waiter = CountingWaiter::new();

        let outcome = Poller::new(Duration::from_secs(30), 30)
            .poll(&source, &waiter, "ghost")
            .await;
        assert_eq!(outcome, PollOutcome::NotFound);
        assert_eq!(waiter.count(), 0);
    }

    #[tokio::test]
    async fn transport_errors_are_transient_within_the_budget() {
        let source = ScriptedSource::new(vec![
            Err(ApiError::Api {
                status: 500,
                message: "hiccup".into(),
            }),
            body(JobStatus::Processing),
            Ok(StatusBody {
                status: JobStatus::Completed,
                download_url: None,
                error: None,
            }),
        ]);
        let waiter = CountingWaiter::new();

        let outcome = Poller::new(Duration::from_secs(30), 30)
            .poll(&source, &waiter, "j-1")
            .await;
        assert!(matches!(outcome, PollOutcome::Completed { .. }));
        assert_eq!(waiter.count(), 2);
    }

    #[tokio::test]
    async fn budget_of_transient_errors_times_out() {
        let source = ScriptedSource::new(
            (0..3)
                .map(|_| {
                    Err(ApiError::Api {
                        status: 503,
                        message: "unavailable".into(),
                    })
                })
                .collect(),
        );
        let waiter = CountingWaiter::new();

        let outcome = Poller::new(Duration::from_secs(30), 3)
            .poll(&source, &waiter, "j-1")
            .await;
        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 3 });
    }
}
