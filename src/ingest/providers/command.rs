// src/ingest/providers/command.rs
//! Alternate fetcher that delegates the upstream call to an external program
//! (e.g. a browser-emulating script) and reads the JSON envelope from stdout.

use async_trait::async_trait;
use serde_json::Value;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::ingest::error::FetchError;
use crate::ingest::types::{Category, ContentSource, Credential, RawEnvelope};

/// Invoked as `<program> <args..> <category> <timestamp> <signature>`.
#[derive(Debug, Clone)]
pub struct CommandContentFetcher {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandContentFetcher {
    /// `argv[0]` is the program; returns `None` for an empty argv.
    pub fn new(argv: &[String], timeout: Duration) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
        })
    }
}

#[async_trait]
impl ContentSource for CommandContentFetcher {
    async fn fetch_category(
        &self,
        category: Category,
        credential: &Credential,
    ) -> Result<RawEnvelope, FetchError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(category.wire_name())
            .arg(credential.issued_timestamp.to_string())
            .arg(&credential.signature)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FetchError::Command(format!("spawn {}: {e}", self.program)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| FetchError::Command(format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| FetchError::Command(format!("wait: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Command(format!(
                "exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let json: Value = serde_json::from_slice(&output.stdout)?;
        RawEnvelope::from_body(json)
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn cred() -> Credential {
        Credential {
            issued_timestamp: 1_700_000_000,
            signature: "abc".into(),
        }
    }

    fn sh(script: &str) -> CommandContentFetcher {
        let argv = vec!["sh".to_string(), "-c".to_string(), script.to_string(), "fetch".to_string()];
        CommandContentFetcher::new(&argv, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn reads_envelope_from_stdout_and_passes_arguments() {
        // $1 = category, $2 = timestamp, $3 = signature
        let f = sh(r#"printf '{"data":"%s-%s-%s"}' "$1" "$2" "$3""#);
        let env = f.fetch_category(Category::Upcoming, &cred()).await.unwrap();
        assert_eq!(env.payload, "up-1700000000-abc");
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_fetch_error() {
        let f = sh("echo boom >&2; exit 3");
        let err = f.fetch_category(Category::Live, &cred()).await.unwrap_err();
        match err {
            FetchError::Command(msg) => assert!(msg.contains("boom"), "{msg}"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_data_in_stdout_is_missing_payload() {
        let f = sh(r#"echo '{"ok":true}'"#);
        let err = f.fetch_category(Category::Live, &cred()).await.unwrap_err();
        assert!(matches!(err, FetchError::MissingPayload));
    }

    #[test]
    fn empty_argv_is_rejected() {
        assert!(CommandContentFetcher::new(&[], Duration::from_secs(1)).is_none());
    }
}
