//! Common test utilities and helpers

use layer_client::observability::RecordingObserver;
use layer_client::{BackoffPolicy, Client};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

/// Application id used by every test client.
#[allow(dead_code)]
pub const APP_ID: &str = "24f43c32-4d95-11e4-b3a2-0fd00000020d";

/// Bearer token used by every test client.
#[allow(dead_code)]
pub const TOKEN: &str = "test-platform-token";

/// `Accept` header for conversations, messages and identities.
#[allow(dead_code)]
pub const RESOURCE_ACCEPT: &str = "application/vnd.layer+json; version=1.0";

/// `Accept` header for webhook management.
#[allow(dead_code)]
pub const WEBHOOKS_ACCEPT: &str = "application/vnd.layer.webhooks+json; version=1.0";

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// Path under the test application.
#[allow(dead_code)]
pub fn app_path(rest: &str) -> String {
    format!("/apps/{}/{}", APP_ID, rest)
}

/// Short delays so retry tests finish quickly.
#[allow(dead_code)]
pub fn fast_policy(max_attempts: u32) -> BackoffPolicy {
    BackoffPolicy::new(
        max_attempts,
        Duration::from_millis(1),
        Duration::from_millis(5),
    )
}

/// A client pointed at the mock server.
#[allow(dead_code)]
pub fn client(server: &MockServer, policy: BackoffPolicy) -> Client {
    client_for(&server.uri(), policy).0
}

/// A client pointed at `base_url`, plus the observer recording its attempts.
#[allow(dead_code)]
pub fn client_for(base_url: &str, policy: BackoffPolicy) -> (Client, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::new());
    let client = Client::builder()
        .account_id(APP_ID)
        .token(TOKEN)
        .api_version("1.0")
        .base_url(base_url)
        .backoff(policy)
        .observer(observer.clone())
        .build()
        .expect("Failed to build client");
    (client, observer)
}
