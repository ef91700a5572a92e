//! Text and HTML rendering of the download section.

use std::fmt;

use crate::asset::{ClassifiedAsset, Platform};
use crate::embed::CANVAS_ID;
use crate::page::{Dropdown, ReleaseView};

/// Plain-text summary printed by `show`.
pub fn text(view: &ReleaseView, platform: &Platform) -> String {
    Text { view, platform }.to_string()
}

/// HTML fragment of the download section, followed by the demo window.
///
/// `scripts` is inserted after the canvas so it exists when they run.
pub fn html(view: &ReleaseView, scripts: &str) -> String {
    Html { view, scripts }.to_string()
}

struct Text<'a> {
    view: &'a ReleaseView,
    platform: &'a Platform,
}

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view;

        writeln!(f, "ImHex {} (released {})", view.label, view.released)?;
        match &view.primary {
            Some(asset) => {
                writeln!(
                    f,
                    "Download for {}: {} ({})",
                    self.platform, asset.friendly_name, asset.size
                )?;
                writeln!(f, "  {}", asset.url)?;
            }
            None => writeln!(f, "No download available for {}", self.platform)?,
        }

        for dropdown in view.counts.visible() {
            writeln!(f, "\n{} ({})", dropdown, view.counts.get(dropdown))?;
            for (group, assets) in groups(view, dropdown) {
                let indent = match group {
                    Some(group) => {
                        writeln!(f, "  {}", group)?;
                        "    "
                    }
                    None => "  ",
                };
                for asset in assets {
                    writeln!(
                        f,
                        "{}{}  {}  {}",
                        indent, asset.friendly_name, asset.size, asset.url
                    )?;
                }
            }
        }

        writeln!(f, "\nRelease notes: {}", view.notes_url)
    }
}

struct Html<'a> {
    view: &'a ReleaseView,
    scripts: &'a str,
}

impl fmt::Display for Html<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view;

        writeln!(f, r#"<section class="downloads" data-channel="{}">"#, view.channel)?;
        writeln!(
            f,
            r#"  <h2>ImHex {} <small>{}</small></h2>"#,
            escape(&view.label),
            escape(&view.released)
        )?;

        if let Some(asset) = &view.primary {
            writeln!(
                f,
                r#"  <a class="download-primary" href="{}">Download {}</a>"#,
                escape(&asset.url),
                escape(&asset.friendly_name)
            )?;
        }

        for dropdown in view.counts.visible() {
            writeln!(
                f,
                r#"  <div class="dropdown" data-platform="{}">"#,
                dropdown_key(dropdown)
            )?;
            writeln!(f, "    <button>{}</button>", dropdown)?;
            writeln!(f, "    <ul>")?;
            for (group, assets) in groups(view, dropdown) {
                if let Some(group) = group {
                    writeln!(f, r#"      <li class="group">{}</li>"#, escape(group))?;
                }
                for asset in assets {
                    writeln!(f, "      {}", asset_item(asset))?;
                }
            }
            writeln!(f, "    </ul>")?;
            writeln!(f, "  </div>")?;
        }

        writeln!(
            f,
            r#"  <a class="release-notes" href="{}">Release notes</a>"#,
            escape(&view.notes_url)
        )?;
        writeln!(f, "</section>")?;

        writeln!(f, r#"<div class="window-frame">"#)?;
        writeln!(
            f,
            r#"  <canvas class="imhex-web-canvas" id="{}"></canvas>"#,
            CANVAS_ID
        )?;
        writeln!(f, "</div>")?;
        if !self.scripts.is_empty() {
            writeln!(f, "{}", self.scripts)?;
        }
        Ok(())
    }
}

/// Loading and error placeholders for when no release is available.
pub fn html_placeholder(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(
            "<section class=\"downloads\">\n  <p class=\"error\">Error loading releases: {}</p>\n  <button class=\"retry\">Retry</button>\n</section>\n",
            escape(message)
        ),
        None => "<section class=\"downloads\">\n  <p class=\"loading\">Loading...</p>\n</section>\n"
            .to_string(),
    }
}

fn asset_item(asset: &ClassifiedAsset) -> String {
    format!(
        r#"<li><a href="{}" title="{}">{} <span class="size">{}</span></a></li>"#,
        escape(&asset.url),
        escape(&asset.name),
        escape(&asset.friendly_name),
        escape(&asset.size)
    )
}

fn dropdown_key(dropdown: Dropdown) -> &'static str {
    match dropdown {
        Dropdown::Windows => "windows",
        Dropdown::MacOs => "macos",
        Dropdown::Linux => "linux",
    }
}

/// Asset groups shown inside a dropdown. macOS has a single unnamed group.
fn groups(view: &ReleaseView, dropdown: Dropdown) -> Vec<(Option<&str>, &[ClassifiedAsset])> {
    let assets = &view.assets;
    let groups: Vec<(Option<&str>, &[ClassifiedAsset])> = match dropdown {
        Dropdown::Windows => assets
            .windows
            .iter()
            .map(|(arch, builds)| (Some(arch.key()), builds))
            .collect(),
        Dropdown::MacOs => vec![(None, assets.macos.as_slice())],
        Dropdown::Linux => assets
            .linux
            .iter()
            .map(|(family, builds)| (Some(family.label()), builds))
            .collect(),
    };
    groups
        .into_iter()
        .filter(|(_, builds)| !builds.is_empty())
        .collect()
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
