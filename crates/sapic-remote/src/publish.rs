use crate::{PublishTarget, RemoteError};
use sapic_package::Artifact;
use sapic_schema::PublishMetadata;
use serde::Serialize;
use std::io::Read;

/// Path appended to every target's base URL.
pub const PUBLISH_PATH: &str = "publish";

/// Per-target result of a publish attempt.
///
/// `status` is present whenever the registry was reached; `body` carries
/// the registry's response verbatim on failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublishOutcome {
    pub target: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// How a multi-target run reacts to a failed target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PublishPolicy {
    /// Stop after the first failure; remaining targets are never attempted.
    /// Already-published targets are not rolled back.
    #[default]
    FailFast,
    /// Attempt every target and aggregate the outcomes.
    AttemptAll,
}

/// Blocking multipart publish client over a shared [`ureq::Agent`].
pub struct Publisher {
    agent: ureq::Agent,
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new()
    }
}

impl Publisher {
    pub fn new() -> Self {
        // Non-2xx statuses are publish outcomes here, not transport errors
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }

    /// Send one `POST {target.url}/publish` with a `metadata` JSON part and
    /// a `file` part carrying the artifact bytes. HTTP 201 is success; any
    /// other status becomes a failed outcome carrying the response body.
    pub fn publish(
        &self,
        metadata: &PublishMetadata,
        artifact: &Artifact,
        target: &PublishTarget,
    ) -> Result<PublishOutcome, RemoteError> {
        let url = format!("{}/{PUBLISH_PATH}", target.url);
        let metadata_json = serde_json::to_string(metadata)
            .map_err(|e| RemoteError::Serialization(e.to_string()))?;
        let boundary = make_boundary();
        let body = multipart_body(&boundary, &metadata_json, artifact.file_name(), &artifact.data);

        tracing::debug!("POST {url} ({} bytes)", body.len());
        let mut req = self.agent.post(&url).header(
            "Content-Type",
            &format!("multipart/form-data; boundary={boundary}"),
        );
        if let Some(ref token) = target.token {
            req = req.header("Authorization", &format!("Bearer {token}"));
        }

        let resp = req.send(&body[..]).map_err(|e| RemoteError::Transport {
            target: target.name.clone(),
            cause: e.to_string(),
        })?;
        let status = resp.status().as_u16();
        if status == 201 {
            return Ok(PublishOutcome {
                target: target.name.clone(),
                success: true,
                status: Some(status),
                body: None,
            });
        }

        let mut reader = resp.into_body().into_reader();
        let mut raw = Vec::new();
        reader
            .read_to_end(&mut raw)
            .map_err(|e| RemoteError::Transport {
                target: target.name.clone(),
                cause: e.to_string(),
            })?;
        Ok(PublishOutcome {
            target: target.name.clone(),
            success: false,
            status: Some(status),
            body: Some(String::from_utf8_lossy(&raw).into_owned()),
        })
    }
}

/// Publish to each target in declared order, as an explicit fold producing
/// one outcome per attempted target.
///
/// Under [`PublishPolicy::FailFast`] a failed target (or transport error)
/// stops the run before the next target is attempted. Under
/// [`PublishPolicy::AttemptAll`] every target is tried and transport
/// errors are folded into failed outcomes.
pub fn publish_all(
    publisher: &Publisher,
    metadata: &PublishMetadata,
    artifact: &Artifact,
    targets: &[PublishTarget],
    policy: PublishPolicy,
) -> Result<Vec<PublishOutcome>, RemoteError> {
    let mut outcomes = Vec::with_capacity(targets.len());
    for target in targets {
        let outcome = match publisher.publish(metadata, artifact, target) {
            Ok(outcome) => outcome,
            Err(RemoteError::Transport { target, cause }) if policy == PublishPolicy::AttemptAll => {
                PublishOutcome {
                    target,
                    success: false,
                    status: None,
                    body: Some(cause),
                }
            }
            Err(other) => return Err(other),
        };
        let failed = !outcome.success;
        outcomes.push(outcome);
        if failed && policy == PublishPolicy::FailFast {
            break;
        }
    }
    Ok(outcomes)
}

fn make_boundary() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("sapic-boundary-{nanos:032x}")
}

fn multipart_body(
    boundary: &str,
    metadata_json: &str,
    file_name: &str,
    file_data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(file_data.len() + metadata_json.len() + 512);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"metadata\"\r\n\
             Content-Type: application/json\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(metadata_json.as_bytes());
    body.extend_from_slice(
        format!(
            "\r\n--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/gzip\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
