use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_tree::HierarchicalLayer;

const DEFAULT_FILTER: &str = "panedock=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() { init_logging_with(None) }

/// Like [`init_logging`], but `directive` (e.g. `"panedock=debug"`) wins over
/// both `RUST_LOG` and the default.
pub fn init_logging_with(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
    };
    let tree = HierarchicalLayer::default()
        .with_writer(std::io::stderr)
        .with_indent_amount(2)
        .with_targets(true)
        .with_bracketed_fields(true);
    // A subscriber may already be installed (tests, embedding hosts).
    let _ = tracing_subscriber::registry().with(filter).with(tree).try_init();
}
