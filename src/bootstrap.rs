use std::{future::Future, path::Path};

use anyhow::Context;
use tracing::info;

use crate::config::BotConfig;

/// Loads the config at `path` and hands it to `start`.
///
/// `start` is only invoked once the config is known to be valid, so a bad or
/// missing file never reaches the Discord client.
pub async fn launch<F, Fut>(path: &Path, start: F) -> anyhow::Result<()>
where
    F: FnOnce(BotConfig) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let config = BotConfig::load(path)
        .with_context(|| format!("could not load configuration from {}", path.display()))?;
    info!("Starting bot");
    start(config).await
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use tempfile::TempDir;

    use super::*;
    use crate::config::ConfigError;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("must create temp dir");
        let path = dir.path().join("config.json");
        fs::write(&path, contents).expect("must write test config");
        (dir, path)
    }

    #[tokio::test]
    async fn starts_client_with_loaded_token() {
        let (_dir, path) = write_config(r#"{"token": "abc123"}"#);
        let mut started_with = None;

        launch(&path, |config| {
            started_with = Some(config.token);
            async { Ok(()) }
        })
        .await
        .expect("launch must succeed");

        assert_eq!(started_with.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn never_starts_client_on_config_error() {
        for contents in ["{}", r#"{"token": ""}"#, r#"{"token": 7}"#, "{oops"] {
            let (_dir, path) = write_config(contents);
            let mut started = false;

            let result = launch(&path, |_| {
                started = true;
                async { Ok(()) }
            })
            .await;

            let err = result.expect_err("launch must fail");
            assert!(err.downcast_ref::<ConfigError>().is_some());
            assert!(!started, "client started for config {contents}");
        }
    }

    #[tokio::test]
    async fn missing_file_is_reported_with_path() {
        let dir = tempfile::tempdir().expect("must create temp dir");
        let path = dir.path().join("config.json");
        let mut started = false;

        let err = launch(&path, |_| {
            started = true;
            async { Ok(()) }
        })
        .await
        .expect_err("launch must fail");

        assert!(!started);
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NotFound { .. })
        ));
        assert!(err.to_string().contains("config.json"));
    }

    #[tokio::test]
    async fn client_errors_propagate() {
        let (_dir, path) = write_config(r#"{"token": "abc123"}"#);

        let err = launch(&path, |_| async { Err(anyhow::anyhow!("gateway closed")) })
            .await
            .expect_err("launch must fail");

        assert_eq!(err.to_string(), "gateway closed");
    }
}
