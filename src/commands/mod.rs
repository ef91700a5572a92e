use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::{
    asset::{Bucket, ClassifiedAsset, ClientArch, ClientOs, Platform, format_size},
    embed::{DemoEmbed, ScriptTagLoader},
    github::{Channel, GetRelease, GitHubRepo, ReleaseAsset},
    page::{Event, PageState, ReleaseController, ReleaseView},
    runtime::Runtime,
};

pub mod config;
pub mod render;

use config::Config;

/// Options shared by every command that talks to the release API.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub repo: String,
    pub api_url: Option<String>,
    pub channel: Channel,
    pub os: Option<ClientOs>,
    pub arch: Option<ClientArch>,
    pub user_agent: Option<String>,
}

impl Options {
    /// Platform to pick the primary download for.
    pub fn platform<R: Runtime>(&self, runtime: &R) -> Platform {
        Platform::resolve(
            self.os.clone(),
            self.arch,
            self.user_agent.as_deref(),
            runtime.host_platform(),
        )
    }
}

/// Fetch the release for `channel` and wait until the request has resolved.
///
/// A failed request is not an error here; it ends up in the returned state.
#[tracing::instrument(skip(github, platform))]
pub async fn fetch<G: GetRelease + 'static>(
    github: G,
    repo_str: &str,
    channel: Channel,
    platform: Platform,
) -> Result<PageState> {
    let repo = repo_str.parse::<GitHubRepo>()?;
    debug!("Loading {} release of {} for {}", channel, repo, platform);

    let mut controller = ReleaseController::new(github, repo, PageState::new(platform, channel));
    controller.dispatch(Event::Mounted);
    controller.settle().await;
    Ok(controller.into_state())
}

/// The view of a settled state, or the error the request ended with.
pub fn loaded_view(state: &PageState) -> Result<ReleaseView> {
    if let Some(message) = state.error() {
        anyhow::bail!("Error loading releases: {}", message);
    }
    state
        .view()
        .context("Release request finished without a release")
}

async fn load_view<G: GetRelease + 'static>(
    github: G,
    options: &Options,
    platform: Platform,
) -> Result<ReleaseView> {
    let state = fetch(github, &options.repo, options.channel, platform).await?;
    loaded_view(&state)
}

/// Print the release summary
#[tracing::instrument(skip(runtime, options))]
pub async fn show<R: Runtime + 'static>(runtime: R, options: Options, json: bool) -> Result<()> {
    let config = Config::new(runtime, options.api_url.clone())?;
    run_show(config, &options, json).await
}

pub async fn run_show<R: Runtime, G: GetRelease + 'static>(
    config: Config<R, G>,
    options: &Options,
    json: bool,
) -> Result<()> {
    let platform = options.platform(&config.runtime);
    let view = load_view(config.github, options, platform.clone()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::text(&view, &platform));
    }
    Ok(())
}

/// Print the URL of the primary download
#[tracing::instrument(skip(runtime, options))]
pub async fn primary<R: Runtime + 'static>(runtime: R, options: Options) -> Result<()> {
    let config = Config::new(runtime, options.api_url.clone())?;
    let asset = run_primary(config, &options).await?;
    println!("{}", asset.url);
    Ok(())
}

pub async fn run_primary<R: Runtime, G: GetRelease + 'static>(
    config: Config<R, G>,
    options: &Options,
) -> Result<ClassifiedAsset> {
    let platform = options.platform(&config.runtime);
    let view = load_view(config.github, options, platform.clone()).await?;
    view.primary
        .with_context(|| format!("No download available for {}", platform))
}

/// How a single filename is classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub name: String,
    /// `None` for assets that are not offered for download.
    pub bucket: Option<String>,
    pub friendly_name: String,
    #[serde(rename = "isMSI")]
    pub is_msi: bool,
    pub is_portable: bool,
    #[serde(rename = "isNoGPU")]
    pub is_no_gpu: bool,
    pub is_arm: bool,
}

impl Classification {
    pub fn of(name: &str) -> Self {
        let asset = ClassifiedAsset::classify(&ReleaseAsset {
            name: name.to_string(),
            ..Default::default()
        });
        Self {
            bucket: Bucket::for_name(name).map(|bucket| bucket.to_string()),
            name: asset.name,
            friendly_name: asset.friendly_name,
            is_msi: asset.is_msi,
            is_portable: asset.is_portable,
            is_no_gpu: asset.is_no_gpu,
            is_arm: asset.is_arm,
        }
    }
}

/// Classify filenames without contacting the API
pub fn classify(files: &[String], json: bool) -> Result<()> {
    let classifications: Vec<Classification> =
        files.iter().map(|name| Classification::of(name)).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&classifications)?);
        return Ok(());
    }

    for c in &classifications {
        println!(
            "{}\t{}\t{}",
            c.name,
            c.bucket.as_deref().unwrap_or("-"),
            c.friendly_name
        );
    }
    Ok(())
}

/// Download the primary asset into `output` (the current directory by default)
#[tracing::instrument(skip(runtime, options))]
pub async fn download<R: Runtime + 'static>(
    runtime: R,
    options: Options,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = Config::new(runtime, options.api_url.clone())?;
    let path = run_download(config, &options, output).await?;
    println!("Downloaded {}", path.display());
    Ok(())
}

pub async fn run_download<R: Runtime, G: GetRelease + 'static>(
    config: Config<R, G>,
    options: &Options,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let Config {
        runtime,
        github,
        http_client,
    } = config;

    let platform = options.platform(&runtime);
    let view = load_view(github, options, platform.clone()).await?;
    let asset = view
        .primary
        .with_context(|| format!("No download available for {}", platform))?;

    // Asset names come from the API and must not escape the output directory
    let file_name = Path::new(&asset.name)
        .file_name()
        .filter(|name| *name == asset.name.as_str())
        .with_context(|| format!("Refusing to save asset with unsafe name: {}", asset.name))?;

    let dir = output.unwrap_or_else(|| PathBuf::from("."));
    runtime.create_dir_all(&dir)?;
    let path = dir.join(file_name);

    info!("Downloading {} to {}", asset.friendly_name, path.display());
    let bytes = http_client
        .download_file(&asset.url, || runtime.create_file(&path))
        .await
        .with_context(|| format!("Failed to download {}", asset.name))?;
    info!("Downloaded {} ({})", asset.name, format_size(bytes));

    Ok(path)
}

/// Print the download section as HTML, with the demo scripts appended
#[tracing::instrument(skip(runtime, options))]
pub async fn page<R: Runtime + 'static>(
    runtime: R,
    options: Options,
    demo_url: Option<String>,
) -> Result<()> {
    let config = Config::new(runtime, options.api_url.clone())?;
    let page = run_page(config, &options, demo_url.as_deref()).await?;
    print!("{}", page.html);
    if let Some(message) = page.error {
        anyhow::bail!("Error loading releases: {}", message);
    }
    Ok(())
}

/// HTML produced by `page`.
#[derive(Debug)]
pub struct RenderedPage {
    pub html: String,
    /// Set when the release failed to load and `html` is the error placeholder.
    pub error: Option<String>,
}

pub async fn run_page<R: Runtime, G: GetRelease + 'static>(
    config: Config<R, G>,
    options: &Options,
    demo_url: Option<&str>,
) -> Result<RenderedPage> {
    let platform = options.platform(&config.runtime);
    let state = fetch(config.github, &options.repo, options.channel, platform).await?;
    if let Some(message) = state.error() {
        return Ok(RenderedPage {
            html: render::html_placeholder(Some(message)),
            error: Some(message.to_string()),
        });
    }
    let view = loaded_view(&state)?;

    let mut embed = DemoEmbed::new(ScriptTagLoader::new(demo_url.unwrap_or_default()));
    // The rendered section always contains the canvas.
    embed.mount(true)?;

    Ok(RenderedPage {
        html: render::html(&view, &embed.loader().html()),
        error: None,
    })
}
