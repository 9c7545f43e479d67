use clap::Parser;
use color_eyre::eyre::{WrapErr, bail};
use lazyweather::{
    api::ApiClient,
    app::App,
    cli::Cli,
    config::Config,
    form::format_date_for_display,
    logging,
    slot::{FileSlot, MemorySlot},
    store::HistoryStore,
};
use tracing::{info, warn};

fn open_store(config: &Config) -> HistoryStore {
    match config.history_path() {
        Some(path) => {
            info!("Using history file {:?}", path);
            HistoryStore::new(FileSlot::new(path))
        }
        None => {
            warn!("No data directory available, history will not survive a restart");
            HistoryStore::new(MemorySlot::new())
        }
    }
}

fn print_history(store: &HistoryStore) {
    let history = store.get_all();
    if history.is_empty() {
        println!("No requests submitted yet.");
        return;
    }
    for item in &history {
        println!(
            "{}  {}  {}  {}",
            item.id,
            format_date_for_display(item.date),
            item.location,
            item.notes.as_deref().unwrap_or("No notes")
        );
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init(&log_path)?;

    let config = Config::load(&args.config).with_overrides(&args);
    if let Some(path) = config.get_path() {
        info!("Loaded config from {}", path);
    }

    let store = open_store(&config);

    if args.is_batch() {
        if args.list_history {
            print_history(&store);
        } else {
            store.clear();
            if store.is_volatile() {
                bail!("Could not remove the stored history, see {:?}", log_path);
            }
            println!("History cleared.");
        }
        return Ok(());
    }

    let api = ApiClient::new(&config.api_url, config.request_timeout())
        .wrap_err_with(|| format!("Invalid api_url {:?}", config.api_url))?;

    let terminal = ratatui::init();
    let app = App::new(store, api);
    let result = app.run(terminal).await;

    ratatui::restore();
    result
}
