use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pixiv_client::cli::output::{print_error, OutputMode};

#[derive(Parser)]
#[command(name = "pixiv", version, about = "Log in to Pixiv, call the app API and download media")]
struct Cli {
    /// Path to a config file with clientId, clientSecret and hashSecret
    #[arg(long, global = true)]
    config: Option<String>,

    /// Where the saved token lives
    #[arg(long, global = true, env = "PIXIV_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Print results and errors as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password and save the token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "PIXIV_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Exchange a refresh token (saved or given) for a new token
    Refresh {
        #[arg(long, env = "PIXIV_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: Option<String>,
    },

    /// Download a media file with the saved token
    Download {
        url: String,

        file: PathBuf,

        /// Refuse to write when the file already exists
        #[arg(long = "override")]
        override_existing: bool,
    },

    /// Authenticated form POST, printing the JSON response
    Post {
        url: String,

        /// Form fields as key=value
        fields: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("PIXIV_LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mode = OutputMode::from_flag(cli.json);

    if let Err(e) = run(cli, mode).await {
        print_error(&e, mode, std::io::stderr().is_terminal());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<(), pixiv_client::PixivError> {
    let config = pixiv_client::load_config(cli.config.as_deref())?;
    let store = cli
        .token_file
        .unwrap_or_else(pixiv_client::store::default_store_path);

    use pixiv_client::cli::commands;
    match cli.command {
        Commands::Login { email, password } => {
            commands::run_login(&config, &store, &email, &password, mode).await
        }
        Commands::Refresh { refresh_token } => {
            commands::run_refresh(&config, &store, refresh_token.as_deref(), mode).await
        }
        Commands::Download {
            url,
            file,
            override_existing,
        } => commands::run_download(&config, &store, &url, &file, override_existing, mode).await,
        Commands::Post { url, fields } => commands::run_post(&config, &store, &url, &fields).await,
    }
}
