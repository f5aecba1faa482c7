use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};

use axum::Router;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static TRACING_INITIALIZED: Once = Once::new();

// Help function to add tracing to tests
// Note: This is safe to use for multiple tests, but since tests are run concurrently the
// output may be interleaved
#[allow(dead_code)]
pub fn enable_tracing() {
    TRACING_INITIALIZED.call_once(|| {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "snag=trace".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}

/// Parameters of every request an origin handler has seen, in arrival order.
pub type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

#[allow(dead_code)]
pub fn seen() -> Seen {
    Arc::new(Mutex::new(Vec::new()))
}

/// Starts `router` on an ephemeral port and returns its base address.
#[allow(dead_code)]
pub async fn origin(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

#[allow(dead_code)]
pub fn client() -> snag::Client {
    snag::Client::new(None).unwrap()
}

#[allow(dead_code)]
pub fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
