//! Runtime services and shared state for mailbox-butler.

use std::{future::Future, panic::AssertUnwindSafe};

use futures::FutureExt;
use tokio::{net::TcpListener, time::timeout};
use tracing::{info, instrument, warn};

use crate::{
    api::{
        self,
        error::{AppError, AppResult},
    },
    base::{config::Config, types::Void},
    service::llm::LlmClient,
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration and the LLM client. It is trivially
/// cloneable, so it doubles as the router state without `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
}

impl Runtime {
    /// Create a new runtime instance backed by OpenAI.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Self {
        let llm = LlmClient::openai(&config);

        if llm.is_available() {
            info!("OpenAI credential configured, using model `{}`", config.openai_model);
        } else {
            warn!("No OpenAI credential configured, running in mock mode");
        }

        Self { config, llm }
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn start(&self) -> Void {
        let address = self.config.bind_address();
        let listener = TcpListener::bind(&address).await?;

        info!("Listening on {address}");

        axum::serve(listener, api::router(self.clone())).with_graceful_shutdown(shutdown_signal()).await?;

        Ok(())
    }

    /// Run `work` under the request deadline.
    ///
    /// On expiry the future is dropped, abandoning any in-flight model calls. A panic
    /// inside `work` surfaces as an internal error instead of tearing down the connection.
    pub async fn within_deadline<F, T>(&self, work: F) -> AppResult<T>
    where
        F: Future<Output = T>,
    {
        let deadline = self.config.analysis_deadline();

        match timeout(deadline, AssertUnwindSafe(work).catch_unwind()).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(AppError::Internal(anyhow::anyhow!("analysis task panicked"))),
            Err(_) => {
                warn!("Request exceeded the {}s deadline", deadline.as_secs());
                Err(AppError::Timeout(deadline.as_secs()))
            }
        }
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{base::config::ConfigInner, service::llm::MockGenericLlmClient};

    fn runtime(analysis_timeout: u64) -> Runtime {
        let mut mock = MockGenericLlmClient::new();
        mock.expect_is_available().return_const(false);

        Runtime {
            config: ConfigInner {
                analysis_timeout,
                ..Default::default()
            }
            .into(),
            llm: LlmClient::new(Arc::new(mock)),
        }
    }

    #[tokio::test]
    async fn test_within_deadline_passes_value() {
        assert_eq!(runtime(5).within_deadline(async { 7 }).await.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_within_deadline_times_out() {
        let result = runtime(1).within_deadline(tokio::time::sleep(Duration::from_secs(10))).await;

        assert!(matches!(result, Err(AppError::Timeout(1))));
    }

    #[tokio::test]
    async fn test_within_deadline_catches_panic() {
        let result: AppResult<()> = runtime(5).within_deadline(async { panic!("bug") }).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
