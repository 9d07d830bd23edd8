use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotim3u::{cli, config, error, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Sync local M3U/M3U8 playlists to Spotify
    Sync(SyncOptions),

    /// List the playlist registry
    Playlists,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Directory containing the M3U/M3U8 files
    folder: String,

    /// Cache the results without updating Spotify
    #[clap(long)]
    cache_only: bool,

    /// Force query tracks that were previously unavailable
    #[clap(long)]
    force_update: bool,

    /// Update artwork in the playlists
    #[clap(long)]
    update_art: bool,

    /// Text to be replaced in the playlist paths
    #[clap(long)]
    replace_from: Option<String>,

    /// Replacement text for the playlist paths
    #[clap(long, requires = "replace_from")]
    replace_to: Option<String>,

    /// Treat --replace-from as a regular expression
    #[clap(long)]
    regex: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            if let Err(e) = config::ensure_credentials() {
                error!("{}", e);
            }

            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Sync(opt) => {
            if let Err(e) = config::ensure_credentials() {
                error!("{}", e);
            }

            cli::sync(cli::SyncOptions {
                folder: opt.folder,
                cache_only: opt.cache_only,
                force_update: opt.force_update,
                update_art: opt.update_art,
                replace_from: opt.replace_from,
                replace_to: opt.replace_to,
                use_regex: opt.regex,
            })
            .await
        }
        Command::Playlists => cli::list_playlists().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
