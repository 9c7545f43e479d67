use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(version, about)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base url of the weather service (overrides config)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// File holding the request history (overrides config)
    #[arg(long, value_name = "PATH")]
    pub history_file: Option<PathBuf>,

    /// Where to write the debug log
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the request history and exit
    #[arg(long, conflicts_with = "clear_history")]
    pub list_history: bool,

    /// Clear the request history and exit
    #[arg(long)]
    pub clear_history: bool,
}

impl Cli {
    /// True when the command runs without the terminal UI.
    pub fn is_batch(&self) -> bool {
        self.list_history || self.clear_history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::parse_from([
            "lazyweather",
            "--api-url",
            "http://weather.local:9000",
            "--history-file",
            "/tmp/history.json",
            "--list-history",
        ]);
        assert_eq!(cli.api_url.as_deref(), Some("http://weather.local:9000"));
        assert_eq!(cli.history_file, Some(PathBuf::from("/tmp/history.json")));
        assert!(cli.is_batch());
    }

    #[test]
    fn test_list_and_clear_conflict() {
        assert!(Cli::try_parse_from(["lazyweather", "--list-history", "--clear-history"]).is_err());
    }
}
