use bakeqc::app::App;
use bakeqc::cli::Cli;
use bakeqc::ui::Printer;
use clap::Parser;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BAKEQC_LOG";

fn main() {
    let cli = Cli::parse();

    // BAKEQC_LOG takes the usual filter syntax; --verbose lowers the default to debug.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = App::new(&cli).and_then(|app| app.run(cli.command));
    if let Err(err) = result {
        tracing::debug!(error = ?err, "command failed");
        Printer::default().error(format!("{err:#}"));
        std::process::exit(1);
    }
}
