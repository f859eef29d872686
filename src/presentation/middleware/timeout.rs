//! Request Timeout

use std::time::Duration;

use axum::http::StatusCode;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerSettings;

/// Abort requests that exceed `server.request_timeout_secs` with 408.
pub fn create_timeout_layer(settings: &ServerSettings) -> TimeoutLayer {
    TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(settings.request_timeout_secs),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_slow_request_times_out_with_408() {
        let settings = ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
            request_timeout_secs: 1,
            shutdown_timeout_secs: 1,
        };
        let router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    "done"
                }),
            )
            .layer(create_timeout_layer(&settings));

        let server = TestServer::new(router).unwrap();
        server
            .get("/slow")
            .await
            .assert_status(StatusCode::REQUEST_TIMEOUT);
    }
}
