//! Binding a stage router to a socket.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use factline_types::Config;

use crate::api::{classifier, gateway, summarizer};
use crate::error::UpstreamError;

/// One of the three pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Gateway,
    Classifier,
    Summarizer,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::Classifier => classifier::SERVICE_NAME,
            Self::Summarizer => summarizer::SERVICE_NAME,
        }
    }

    /// Configured `(host, port)` for this stage.
    pub fn bind_address(&self, config: &Config) -> (String, u16) {
        match self {
            Self::Gateway => (config.gateway.host.clone(), config.gateway.port),
            Self::Classifier => (config.classifier.host.clone(), config.classifier.port),
            Self::Summarizer => (config.summarizer.host.clone(), config.summarizer.port),
        }
    }

    /// Build this stage's router, including its outbound clients.
    pub fn router(&self, config: &Config) -> Result<Router, UpstreamError> {
        let router = match self {
            Self::Gateway => gateway::router(
                gateway::GatewayState::from_config(config)?,
                config.gateway.body_limit_bytes,
            ),
            Self::Classifier => classifier::router(
                classifier::ClassifierState::from_config(config)?,
                config.classifier.body_limit_bytes,
            ),
            Self::Summarizer => summarizer::router(
                summarizer::SummarizerState::from_config(config)?,
                config.summarizer.body_limit_bytes,
            ),
        };
        Ok(router)
    }
}

/// Bind `host:port` and serve `router` until Ctrl+C or SIGTERM.
pub async fn serve(router: Router, host: &str, port: u16) -> std::io::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    serve_on(listener, router, shutdown_signal()).await
}

/// Serve `router` on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "listening");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;
    info!(%addr, "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_follows_config() {
        let config = Config::default();
        assert_eq!(
            Stage::Gateway.bind_address(&config),
            ("0.0.0.0".to_string(), 4000)
        );
        assert_eq!(Stage::Classifier.bind_address(&config).1, 3000);
        assert_eq!(Stage::Summarizer.bind_address(&config).1, 3001);
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::Gateway.name(), "gateway");
        assert_eq!(Stage::Classifier.name(), "fake-news-classifier");
        assert_eq!(Stage::Summarizer.name(), "news-summarizer");
    }

    #[tokio::test]
    async fn every_stage_builds_from_default_config() {
        let config = Config::default();
        for stage in [Stage::Gateway, Stage::Classifier, Stage::Summarizer] {
            assert!(stage.router(&config).is_ok(), "{} failed to build", stage.name());
        }
    }
}
