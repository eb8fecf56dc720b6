//! Mock release API startup that tolerates sandboxes without loopback sockets.
//!
//! Shared by the integration tests and, via `#[path]`, by unit tests in
//! `src/test_support`.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

/// Set to `1`/`true`/`yes` to turn a skipped mock-server test into a failure.
pub const REQUIRE_SOCKET_TESTS_ENV: &str = "LAMPA_REQUIRE_SOCKET_TESTS";

fn socket_tests_required() -> bool {
    std::env::var(REQUIRE_SOCKET_TESTS_ENV)
        .is_ok_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Starts a mock release API, or returns `None` when localhost cannot be bound.
#[track_caller]
pub fn start_mock_server_or_skip() -> impl Future<Output = Option<MockServer>> {
    let location = Location::caller();
    let loopback_ok = TcpListener::bind("127.0.0.1:0").is_ok();
    async move {
        if loopback_ok {
            return Some(MockServer::start().await);
        }

        let message = format!(
            "[mock-release-api] no loopback socket for test at {}:{}",
            location.file(),
            location.line()
        );
        if socket_tests_required() {
            panic!("{message}; unset {REQUIRE_SOCKET_TESTS_ENV} to skip instead");
        }
        eprintln!("{message}; skipping (set {REQUIRE_SOCKET_TESTS_ENV}=1 to fail)");
        None
    }
}
