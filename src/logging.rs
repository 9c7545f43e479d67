use color_eyre::Result;
use std::path::{Path, PathBuf};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// `<cache dir>/lazyweather/lazyweather.log`, or the working directory when there is no cache dir.
pub fn default_log_path() -> PathBuf {
    match dirs::cache_dir() {
        Some(dir) => dir.join("lazyweather").join("lazyweather.log"),
        None => PathBuf::from("lazyweather.log"),
    }
}

/// Initialize logging to a file using tracing. The terminal belongs to the UI.
///
/// Uses RUST_LOG environment variable for filtering, or defaults to INFO level.
/// Examples:
///   RUST_LOG=lazyweather::store=debug  - Only debug history store mutations
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::File::create(path)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .try_from_env()
        .or_else(|_| EnvFilter::try_new("info"))?;

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
