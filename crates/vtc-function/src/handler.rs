//! Submit-and-wait orchestration for one storage event.
//!
//! One invocation creates exactly one job: derive the input/output pair
//! from the event, submit, then follow the job to a terminal state. The
//! poll is awaited, never detached, so the invocation's lifetime covers it.

use tracing::info;
use uuid::Uuid;

use vtc_models::{Job, JobId, StorageEvent};
use vtc_transcoder::{JobSpec, TranscoderClient};

use crate::config::FunctionConfig;
use crate::error::FunctionResult;
use crate::poller::poll_until_terminal;

/// Preset template every job is created from.
pub const WEB_HD_TEMPLATE: &str = "preset/web-hd";

/// Derive the input URI for an uploaded object.
pub fn input_uri(event: &StorageEvent) -> String {
    format!("gs://{}/{}", event.bucket, event.name)
}

/// Derive a fresh output prefix.
///
/// The random segment guarantees two invocations never write to the same
/// path, even for identical input objects.
pub fn output_uri(output_bucket: &str) -> String {
    format!("gs://{}/{}/", output_bucket, Uuid::new_v4())
}

/// Submit a transcode job for an uploaded object.
///
/// Issues exactly one create call; on failure the error propagates and
/// polling never starts.
pub async fn submit_job(
    client: &TranscoderClient,
    config: &FunctionConfig,
    event: &StorageEvent,
) -> FunctionResult<JobId> {
    info!(
        bucket = %event.bucket,
        object = %event.name,
        payload = %serde_json::to_string(event).unwrap_or_default(),
        "Processing storage event"
    );

    event.validate()?;

    let spec = JobSpec::from_template(
        input_uri(event),
        output_uri(&config.output_bucket),
        WEB_HD_TEMPLATE,
    );

    let job = client.create_job(&spec).await?;
    info!(job_name = %job.name, "Transcode job created");

    Ok(job.id())
}

/// Handle one storage event end to end: submit, then poll to completion.
///
/// Returns the terminal job record. A failed job is a normal terminal
/// outcome here, not an error; the caller can inspect `job.state`.
pub async fn process_event(
    client: &TranscoderClient,
    config: &FunctionConfig,
    event: &StorageEvent,
) -> FunctionResult<Job> {
    let job_id = submit_job(client, config, event).await?;

    let job = poll_until_terminal(client, &job_id, config.poll_interval, config.poll_timeout)
        .await?;

    info!(
        job_id = %job_id,
        state = %job.state,
        "Invocation complete"
    );

    Ok(job)
}
