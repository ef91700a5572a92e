use anyhow::Result;
use clap::Parser;
use imhex_downloads::asset::{ClientArch, ClientOs};
use imhex_downloads::commands::{self, Options};
use imhex_downloads::github::{Channel, DEFAULT_REPO};
use imhex_downloads::runtime::RealRuntime;
use std::path::PathBuf;

/// imhex-downloads - ImHex release downloads
///
/// Fetch the latest ImHex release, sort its assets by platform and pick the
/// download that fits your machine.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
/// This is useful for avoiding rate limits.
///
/// Examples:
///   imhex-downloads show                  # Summarise the latest stable release
///   imhex-downloads --channel nightly primary
///   imhex-downloads download -o ~/Downloads
#[derive(Parser, Debug)]
#[command(author, version = env!("IMHEX_DOWNLOADS_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository releases are read from (also via IMHEX_REPO)
    #[arg(
        long,
        env = "IMHEX_REPO",
        value_name = "OWNER/REPO",
        default_value = DEFAULT_REPO,
        global = true
    )]
    repo: String,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Release channel
    #[arg(long, value_enum, default_value_t = Channel::Stable, global = true)]
    channel: Channel,

    /// Operating system to pick downloads for (defaults to this machine)
    #[arg(long, value_name = "OS", global = true)]
    os: Option<ClientOs>,

    /// CPU architecture to pick downloads for: x86 or arm
    #[arg(long, value_name = "ARCH", global = true)]
    arch: Option<ClientArch>,

    /// Detect the platform from a browser user-agent string
    #[arg(long = "user-agent", value_name = "UA", global = true)]
    user_agent: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show the release with its downloads grouped by platform
    Show(ShowArgs),

    /// Print the URL of the recommended download
    Primary,

    /// Classify asset filenames offline
    Classify(ClassifyArgs),

    /// Download the recommended asset
    Download(DownloadArgs),

    /// Print the download section as an HTML fragment
    Page(PageArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Asset filenames
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<String>,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct DownloadArgs {
    /// Directory to save the download in (defaults to the current directory)
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct PageArgs {
    /// Base URL the demo scripts are served from
    #[arg(long = "demo-url", value_name = "URL")]
    pub demo_url: Option<String>,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            repo: self.repo.clone(),
            api_url: self.api_url.clone(),
            channel: self.channel,
            os: self.os.clone(),
            arch: self.arch,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let options = cli.options();
    let runtime = RealRuntime;

    match cli.command {
        Commands::Show(args) => commands::show(runtime, options, args.json).await?,
        Commands::Primary => commands::primary(runtime, options).await?,
        Commands::Classify(args) => commands::classify(&args.files, args.json)?,
        Commands::Download(args) => commands::download(runtime, options, args.output).await?,
        Commands::Page(args) => commands::page(runtime, options, args.demo_url).await?,
    }
    Ok(())
}
