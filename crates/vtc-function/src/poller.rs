//! Job status polling loop.
//!
//! Ticks are strictly serialized: a fetch completes before the next sleep
//! starts, so at most one status call is ever in flight. A fetch error
//! terminates the loop, and the whole wait is capped by a deadline.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::info;

use vtc_models::{Job, JobId};
use vtc_transcoder::{TranscoderClient, TranscoderResult};

use crate::error::{FunctionError, FunctionResult};

/// Poll a job on a fixed interval until it reaches a terminal state.
///
/// The first status check happens one interval after submission. Returns
/// the terminal job record; a job-reported failure is a normal return,
/// not an error.
pub async fn poll_until_terminal(
    client: &TranscoderClient,
    job_id: &JobId,
    interval: Duration,
    timeout: Duration,
) -> FunctionResult<Job> {
    poll_with(|| client.get_job(job_id), job_id, interval, timeout).await
}

/// Polling core, generic over the status fetch.
pub(crate) async fn poll_with<F, Fut>(
    mut fetch: F,
    job_id: &JobId,
    interval: Duration,
    timeout: Duration,
) -> FunctionResult<Job>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TranscoderResult<Job>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        tokio::time::sleep(interval).await;

        if Instant::now() >= deadline {
            return Err(FunctionError::PollTimeout {
                job_id: job_id.clone(),
                waited_secs: timeout.as_secs(),
            });
        }

        let job = fetch().await?;
        info!(job_id = %job_id, state = %job.state, "Job status");

        if job.state.is_terminal() {
            info!(
                job_id = %job_id,
                state = %job.state,
                result = %serde_json::to_string(&job).unwrap_or_default(),
                "Job reached terminal state"
            );
            return Ok(job);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use vtc_models::JobState;
    use vtc_transcoder::TranscoderError;

    const TICK: Duration = Duration::from_millis(1);
    const LONG: Duration = Duration::from_secs(60);

    fn job_in_state(state: JobState) -> Job {
        serde_json::from_value(serde_json::json!({
            "name": "projects/p/locations/l/jobs/abc123",
            "state": state.as_str(),
        }))
        .unwrap()
    }

    /// Scripted status source: pops one state per fetch and counts calls.
    struct Script {
        states: RefCell<VecDeque<JobState>>,
        calls: RefCell<u32>,
    }

    impl Script {
        fn new(states: &[JobState]) -> Self {
            Self {
                states: RefCell::new(states.iter().copied().collect()),
                calls: RefCell::new(0),
            }
        }

        fn next(&self) -> TranscoderResult<Job> {
            *self.calls.borrow_mut() += 1;
            let state = self
                .states
                .borrow_mut()
                .pop_front()
                .expect("polled past the scripted states");
            Ok(job_in_state(state))
        }

        fn calls(&self) -> u32 {
            *self.calls.borrow()
        }
    }

    #[tokio::test]
    async fn test_stops_on_first_terminal_state() {
        let script = Script::new(&[JobState::Running, JobState::Running, JobState::Succeeded]);
        let job_id = JobId::from_string("abc123");

        let job = poll_with(|| async { script.next() }, &job_id, TICK, LONG)
            .await
            .unwrap();

        assert_eq!(job.state, JobState::Succeeded);
        // Two non-terminal ticks plus the terminal one, nothing after.
        assert_eq!(script.calls(), 3);
    }

    #[tokio::test]
    async fn test_failed_is_a_normal_terminal_outcome() {
        let script = Script::new(&[JobState::Pending, JobState::Failed]);
        let job_id = JobId::from_string("abc123");

        let job = poll_with(|| async { script.next() }, &job_id, TICK, LONG)
            .await
            .unwrap();

        assert_eq!(job.state, JobState::Failed);
        assert_eq!(script.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_error_terminates_the_loop() {
        let job_id = JobId::from_string("abc123");

        let result = poll_with(
            || async { Err(TranscoderError::request_failed("status check failed")) },
            &job_id,
            TICK,
            LONG,
        )
        .await;

        assert!(matches!(
            result,
            Err(FunctionError::Transcoder(TranscoderError::RequestFailed(_)))
        ));
    }

    #[tokio::test]
    async fn test_deadline_produces_poll_timeout() {
        let script = Script::new(&[]);
        let job_id = JobId::from_string("abc123");

        let result = poll_with(
            || async { script.next() },
            &job_id,
            TICK,
            Duration::ZERO,
        )
        .await;

        assert!(matches!(result, Err(FunctionError::PollTimeout { .. })));
        // The deadline fires before any status call is issued.
        assert_eq!(script.calls(), 0);
    }
}
