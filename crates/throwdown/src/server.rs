//! `ThrowdownServer` builder and run loop.
//!
//! Ties the layers together: one shared store, the sweeper over it, the
//! match engine on top, and the gateway route in front.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use throwdown_gateway::{router, GatewayConfig, MentionResolver, SlackNotifier};
use throwdown_match::{IdentityResolver, MatchConfig, MatchEngine, Notifier};
use throwdown_rules::MoveCatalog;
use throwdown_session::SessionStore;
use throwdown_sweep::{SweepConfig, SweepStats, Sweeper};
use tokio::net::TcpListener;

use crate::ThrowdownError;

/// Builder for configuring and starting a Throwdown server.
///
/// # Example
///
/// ```rust,ignore
/// use throwdown::prelude::*;
///
/// let server = ThrowdownServer::builder()
///     .bind("0.0.0.0:8081")
///     .sweep_config(SweepConfig::default())
///     .build(MentionResolver, notifier)
///     .await?;
/// server.run_until(shutdown_signal()).await
/// ```
#[derive(Debug, Default)]
pub struct ThrowdownServerBuilder {
    bind_addr: Option<String>,
    catalog: Option<MoveCatalog>,
    sweep_config: SweepConfig,
    match_config: MatchConfig,
    gateway_config: GatewayConfig,
}

impl ThrowdownServerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the listen address. Default: `0.0.0.0` on the gateway port.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = Some(addr.to_string());
        self
    }

    /// Uses `catalog` instead of the one named by the gateway config.
    pub fn catalog(mut self, catalog: MoveCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn sweep_config(mut self, config: SweepConfig) -> Self {
        self.sweep_config = config;
        self
    }

    pub fn match_config(mut self, config: MatchConfig) -> Self {
        self.match_config = config;
        self
    }

    pub fn gateway_config(mut self, config: GatewayConfig) -> Self {
        self.gateway_config = config;
        self
    }

    /// Binds the listener and assembles the engine.
    ///
    /// Nothing is served and no sweep runs until
    /// [`run_until`](ThrowdownServer::run_until).
    ///
    /// # Errors
    /// - [`ThrowdownError::Gateway`] if no catalog was given and the
    ///   configured game is unknown
    /// - [`ThrowdownError::Io`] if the address can't be bound
    pub async fn build<R: IdentityResolver, N: Notifier>(
        self,
        resolver: R,
        notifier: N,
    ) -> Result<ThrowdownServer<R, N>, ThrowdownError> {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => self.gateway_config.catalog()?,
        };
        let bind_addr = self
            .bind_addr
            .unwrap_or_else(|| format!("0.0.0.0:{}", self.gateway_config.port));
        let listener = TcpListener::bind(&bind_addr).await?;

        let store = Arc::new(SessionStore::new());
        let engine = Arc::new(
            MatchEngine::new(Arc::clone(&store), catalog, resolver, notifier)
                .with_config(self.match_config),
        );
        let sweeper = Sweeper::new(store, self.sweep_config);
        let app = router(Arc::clone(&engine), self.gateway_config);

        Ok(ThrowdownServer {
            listener,
            app,
            engine,
            sweeper,
        })
    }
}

/// A bound, ready-to-run Throwdown server.
pub struct ThrowdownServer<R, N> {
    listener: TcpListener,
    app: Router,
    engine: Arc<MatchEngine<R, N>>,
    sweeper: Sweeper,
}

impl ThrowdownServer<MentionResolver, SlackNotifier> {
    /// Creates a new builder.
    ///
    /// The resolver and notifier are chosen later, in
    /// [`build`](ThrowdownServerBuilder::build); any pair works.
    pub fn builder() -> ThrowdownServerBuilder {
        ThrowdownServerBuilder::new()
    }
}

impl<R: IdentityResolver, N: Notifier> ThrowdownServer<R, N> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// The engine behind the route, for driving matches directly.
    pub fn engine(&self) -> &Arc<MatchEngine<R, N>> {
        &self.engine
    }

    /// Serves callbacks and sweeps sessions until `shutdown` completes.
    ///
    /// In-flight requests finish first; the sweeper is stopped before
    /// this returns.
    pub async fn run_until<F>(self, shutdown: F) -> Result<SweepStats, ThrowdownError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        let sweeper = self.sweeper.spawn();
        tracing::info!(%addr, "throwdown server running");

        let served = axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await;

        let stats = sweeper.stop().await;
        tracing::info!(
            passes = stats.passes,
            expired = stats.expired,
            retired = stats.retired,
            "throwdown server stopped"
        );
        served?;
        Ok(stats)
    }

    /// Serves until the process is terminated.
    pub async fn run(self) -> Result<SweepStats, ThrowdownError> {
        self.run_until(std::future::pending()).await
    }
}
