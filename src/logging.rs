//! Tracing subscriber setup.
//!
//! Call [`init`] once at startup (or from test harnesses); repeated calls are
//! no-ops. The filter defaults to `info` and is overridable via `RUST_LOG`.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

pub fn init() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        // try_init: another subscriber may already be installed by the embedder.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init();
    });
}
