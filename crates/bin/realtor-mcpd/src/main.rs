//! Daemon entry point for the realtor MCP server.
//!
//! Loads configuration from the command line and environment, builds the
//! property API client, and serves the MCP protocol over stdio and/or
//! streamable HTTP.

mod config;

use std::sync::Arc;

use realtor_core::PropertySearchClient;
use realtor_mcp::server::{serve_stdio, serve_streamable_http};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::RealtorConfig;

type ServeResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> ServeResult {
    // stdout carries the stdio transport.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = RealtorConfig::from_args()?;
    let client = Arc::new(PropertySearchClient::new(config.search_client_config())?);
    info!(endpoint = %client.endpoint(), "property API configured");

    let stdio = config.enable_stdio.then(|| serve_stdio(client.clone()));
    let http = config
        .mcp_serve
        .then(|| serve_streamable_http(client.clone(), config.http_server_config()));

    run_transports(stdio, http).await
}

/// Drives the enabled transports together.
///
/// An HTTP failure (including a failed bind) ends the daemon immediately,
/// even while stdio is still connected. Once stdio finishes cleanly the HTTP
/// server keeps running until it stops on its own.
async fn run_transports<S, H>(stdio: Option<S>, http: Option<H>) -> ServeResult
where
    S: Future<Output = ServeResult> + Send,
    H: Future<Output = ServeResult> + Send,
{
    match (stdio, http) {
        (Some(stdio), Some(http)) => {
            tokio::pin!(http);
            let stdio_result = tokio::select! {
                result = stdio => result,
                result = &mut http => return result,
            };
            stdio_result?;
            http.await
        }
        (Some(stdio), None) => stdio.await,
        (None, Some(http)) => http.await,
        (None, None) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::pending;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use realtor_core::SearchClientConfig;
    use realtor_mcp::server::McpHttpServerConfig;
    use tokio::time::{sleep, timeout};
    use url::Url;

    fn failure(message: &str) -> ServeResult {
        Err(message.into())
    }

    #[tokio::test]
    async fn http_failure_ends_daemon_while_stdio_is_connected() {
        let result = timeout(
            Duration::from_secs(1),
            run_transports(
                Some(pending::<ServeResult>()),
                Some(async { failure("address already in use") }),
            ),
        )
        .await
        .expect("http failure should not wait on stdio");

        let err = result.expect_err("http failure should surface");
        assert_eq!(err.to_string(), "address already in use");
    }

    #[tokio::test]
    async fn finished_stdio_keeps_http_running() {
        let http_done = Arc::new(AtomicBool::new(false));
        let flag = http_done.clone();

        run_transports(
            Some(async { ServeResult::Ok(()) }),
            Some(async move {
                sleep(Duration::from_millis(50)).await;
                flag.store(true, Ordering::SeqCst);
                ServeResult::Ok(())
            }),
        )
        .await
        .expect("both transports should finish cleanly");

        assert!(http_done.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn stdio_failure_is_returned() {
        let result = run_transports(
            Some(async { failure("stdin closed unexpectedly") }),
            Some(pending::<ServeResult>()),
        )
        .await;

        let err = result.expect_err("stdio failure should surface");
        assert_eq!(err.to_string(), "stdin closed unexpectedly");
    }

    #[tokio::test]
    async fn occupied_http_port_is_reported_without_waiting_on_stdio() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test port");
        let addr = occupied.local_addr().expect("local addr");
        let client = Arc::new(
            PropertySearchClient::new(SearchClientConfig::new(
                Url::parse("http://127.0.0.1:9").expect("valid url"),
            ))
            .expect("client should build"),
        );

        let result = timeout(
            Duration::from_secs(5),
            run_transports(
                Some(pending::<ServeResult>()),
                Some(serve_streamable_http(client, McpHttpServerConfig::new(addr))),
            ),
        )
        .await
        .expect("bind failure should not wait on stdio");

        assert!(result.is_err());
        drop(occupied);
    }
}
