//! CI notification webhook: signature check and benchmark-run dispatch.
//!
//! Notifications carry an HMAC-SHA256 signature over the raw body in the
//! `X-Hub-Signature-256` header (`sha256=<hex>`). A verified notification for
//! the watched branch spawns the configured benchmark command, detached, with
//! the commit id and a derived results path as arguments.

use std::path::{Path, PathBuf};

use chrono::Utc;
use ring::hmac;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::config::WebhookConfig;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";
const SIGNATURE_PREFIX: &str = "sha256=";

/// The notification body sent by CI after a build.
#[derive(Debug, Deserialize)]
pub struct Notification {
    pub branch: String,
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub head_commit: String,
    #[serde(default)]
    pub pull_request: bool,
    #[serde(default)]
    pub pull_request_title: String,
    #[serde(default)]
    pub pull_request_number: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Commit was not on the watched branch; nothing ran.
    Skipped,
    /// Benchmark run spawned.
    Started,
}

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("unable to start benchmark run: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Check the signature header against the raw request body. Comparison is
/// constant-time.
pub fn verify_signature(secret: &str, body: &[u8], header: &str) -> bool {
    let hex_signature = match header.strip_prefix(SIGNATURE_PREFIX) {
        Some(rest) => rest,
        None => return false,
    };
    let signature = match hex::decode(hex_signature) {
        Ok(signature) => signature,
        Err(_) => return false,
    };
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    hmac::verify(&key, body, &signature).is_ok()
}

/// Produce the signature header value for a body. Counterpart of
/// [`verify_signature`], used by tests and notification senders.
pub fn sign(secret: &str, body: &[u8]) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let tag = hmac::sign(&key, body);
    format!("{SIGNATURE_PREFIX}{}", hex::encode(tag.as_ref()))
}

/// The results subdirectory and commit id a notification resolves to.
/// Pull requests group under "<title> (#<number>)" and use the head commit;
/// everything else groups under "Master".
pub fn run_target(notification: &Notification) -> (String, &str) {
    if notification.pull_request {
        (
            format!(
                "{} (#{})",
                notification.pull_request_title, notification.pull_request_number
            ),
            notification.head_commit.as_str(),
        )
    } else {
        ("Master".to_owned(), notification.commit.as_str())
    }
}

/// Act on a verified notification: skip commits off the watched branch,
/// otherwise spawn the benchmark command fire-and-forget.
pub fn dispatch(
    config: &WebhookConfig,
    results_dir: &Path,
    notification: &Notification,
) -> Result<Outcome, WebhookError> {
    if notification.branch != config.watched_branch {
        info!(branch = %notification.branch, "branch commit detected, skipping benchmark run");
        return Ok(Outcome::Skipped);
    }

    let (group, commit) = run_target(notification);
    let time = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let results_path: PathBuf = results_dir.join(group).join(format!("{time}-{commit}"));

    let mut command = tokio::process::Command::new(&config.bench_command);
    command.arg(commit).arg(&results_path);
    command.spawn()?;

    info!(%commit, path = %results_path.display(), "benchmark run started");
    Ok(Outcome::Started)
}
