//! Wire types for the create-job request.

use serde::{Deserialize, Serialize};

/// Job descriptor submitted to the service.
///
/// The output format itself lives in the preset template on the service
/// side; the descriptor only names the input, the output prefix and the
/// template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    /// Source media location (`gs://bucket/key`)
    pub input_uri: String,
    /// Destination prefix for transcoded output (`gs://bucket/prefix/`)
    pub output_uri: String,
    /// Preset template to create the job from
    pub template_id: String,
}

impl JobSpec {
    /// Build a descriptor from a preset template.
    pub fn from_template(
        input_uri: impl Into<String>,
        output_uri: impl Into<String>,
        template_id: impl Into<String>,
    ) -> Self {
        Self {
            input_uri: input_uri.into(),
            output_uri: output_uri.into(),
            template_id: template_id.into(),
        }
    }
}
