//! glidepad client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Desktop profile against the default port
//! glidepad --host 192.168.1.20
//!
//! # Touch profile, JSON records, logs to a file
//! glidepad --host desk.local --surface touch --framing text --log-file glidepad.log
//! ```

use std::path::Path;

use clap::Parser;
use glidepad_client::endpoint_url;
use glidepad_term::{InputMapper, Runtime, TerminalDriver, cli::Args};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // The guard flushes buffered log lines when main returns.
    let (file_layer, _log_guard) = match &args.log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path.file_name().ok_or("--log-file must name a file")?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        },
        None => (None, None),
    };
    let stderr_layer = args.log_file.is_none().then(fmt::layer);

    tracing_subscriber::registry().with(filter).with(file_layer).with(stderr_layer).init();

    let url = endpoint_url(&args.host, args.port);
    let config = args.pipeline_config();
    tracing::info!(
        %url,
        surface = ?config.gesture.surface,
        framing = ?config.framing,
        "glidepad starting"
    );

    let driver = TerminalDriver::new(url, InputMapper::new(args.surface()))?;
    let runtime = Runtime::new(driver, config);

    let mut state = runtime.subscribe();
    tokio::spawn(async move {
        while state.changed().await.is_ok() {
            let current = *state.borrow_and_update();
            if let Err(e) = TerminalDriver::show_state(current) {
                tracing::debug!(error = %e, "failed to update title");
            }
        }
    });

    Ok(runtime.run().await?)
}
