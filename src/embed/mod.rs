//! Loading of the in-browser ImHex demo.
//!
//! The demo is a web build of ImHex drawn onto a canvas. It needs two
//! scripts: a configuration script that must run first, and the runtime
//! itself, which is loaded asynchronously.

use anyhow::Result;
use log::{debug, error};

/// Id of the canvas element the demo draws on.
pub const CANVAS_ID: &str = "canvas";
/// Configuration script, loaded synchronously.
pub const CONFIG_SCRIPT: &str = "wasm-config.js";
/// The demo runtime, loaded asynchronously.
pub const RUNTIME_SCRIPT: &str = "imhex.js";

/// A script to attach to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptResource {
    pub src: String,
    pub is_async: bool,
}

impl ScriptResource {
    pub fn new(src: impl Into<String>, is_async: bool) -> Self {
        Self {
            src: src.into(),
            is_async,
        }
    }
}

/// Identifies a script attached by a [`ModuleLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptHandle(pub usize);

#[cfg_attr(test, mockall::automock)]
pub trait ModuleLoader {
    /// Attach `resource` to the page.
    fn load(&mut self, resource: &ScriptResource) -> Result<ScriptHandle>;
    /// Detach a previously loaded script.
    fn unload(&mut self, handle: ScriptHandle) -> Result<()>;
}

/// Loads the demo scripts at most once and detaches them on teardown.
pub struct DemoEmbed<L: ModuleLoader> {
    loader: L,
    mounted: bool,
    // Load order; torn down in reverse.
    handles: Vec<ScriptHandle>,
}

impl<L: ModuleLoader> DemoEmbed<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            mounted: false,
            handles: Vec::new(),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn is_loaded(&self) -> bool {
        !self.handles.is_empty()
    }

    /// Load the demo scripts if the canvas is present.
    ///
    /// Returns `true` when the scripts were loaded by this call. Later calls
    /// do nothing, even after a teardown.
    #[tracing::instrument(skip(self))]
    pub fn mount(&mut self, canvas_present: bool) -> Result<bool> {
        if !canvas_present {
            error!("Canvas not found");
            return Ok(false);
        }
        if self.mounted {
            debug!("Demo scripts already loaded, skipping");
            return Ok(false);
        }
        self.mounted = true;

        for resource in [
            ScriptResource::new(CONFIG_SCRIPT, false),
            ScriptResource::new(RUNTIME_SCRIPT, true),
        ] {
            debug!("Loading demo script {}", resource.src);
            let handle = self.loader.load(&resource)?;
            self.handles.push(handle);
        }
        Ok(true)
    }

    /// Detach whatever was loaded, runtime first.
    pub fn teardown(&mut self) -> Result<()> {
        while let Some(handle) = self.handles.pop() {
            debug!("Unloading demo script {:?}", handle);
            self.loader.unload(handle)?;
        }
        Ok(())
    }
}

/// Loader that records scripts as `<script>` tags for a static page.
#[derive(Debug, Default)]
pub struct ScriptTagLoader {
    base_url: String,
    tags: Vec<Option<String>>,
}

impl ScriptTagLoader {
    /// Scripts are referenced relative to `base_url`; pass an empty string
    /// for same-directory references.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tags: Vec::new(),
        }
    }

    fn script_url(&self, src: &str) -> String {
        if self.base_url.is_empty() {
            src.to_string()
        } else {
            format!("{}/{}", self.base_url, src)
        }
    }

    /// Tags of the scripts still attached, in load order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().filter_map(|tag| tag.as_deref())
    }

    pub fn html(&self) -> String {
        self.tags().collect::<Vec<_>>().join("\n")
    }
}

impl ModuleLoader for ScriptTagLoader {
    fn load(&mut self, resource: &ScriptResource) -> Result<ScriptHandle> {
        let async_attr = if resource.is_async { " async" } else { "" };
        let tag = format!(
            r#"<script src="{}"{}></script>"#,
            self.script_url(&resource.src),
            async_attr
        );
        self.tags.push(Some(tag));
        Ok(ScriptHandle(self.tags.len() - 1))
    }

    fn unload(&mut self, handle: ScriptHandle) -> Result<()> {
        match self.tags.get_mut(handle.0) {
            Some(tag) if tag.is_some() => {
                *tag = None;
                Ok(())
            }
            _ => anyhow::bail!("Script {:?} is not loaded", handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use mockall::predicate::eq;

    #[test]
    fn test_mount_loads_config_then_runtime() {
        let mut loader = MockModuleLoader::new();
        let mut seq = Sequence::new();

        loader
            .expect_load()
            .with(eq(ScriptResource::new(CONFIG_SCRIPT, false)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ScriptHandle(0)));
        loader
            .expect_load()
            .with(eq(ScriptResource::new(RUNTIME_SCRIPT, true)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ScriptHandle(1)));

        let mut embed = DemoEmbed::new(loader);
        assert!(embed.mount(true).unwrap());
        assert!(embed.is_loaded());
    }

    #[test]
    fn test_mount_without_canvas_does_nothing() {
        let mut loader = MockModuleLoader::new();
        loader.expect_load().never();

        let mut embed = DemoEmbed::new(loader);
        assert!(!embed.mount(false).unwrap());
        assert!(!embed.is_loaded());
    }

    #[test]
    fn test_mount_only_once() {
        let mut loader = MockModuleLoader::new();
        let mut next = 0;
        loader.expect_load().times(2).returning(move |_| {
            next += 1;
            Ok(ScriptHandle(next))
        });
        loader.expect_unload().times(2).returning(|_| Ok(()));

        let mut embed = DemoEmbed::new(loader);
        assert!(embed.mount(true).unwrap());
        assert!(!embed.mount(true).unwrap());

        embed.teardown().unwrap();
        assert!(!embed.mount(true).unwrap());
    }

    #[test]
    fn test_teardown_unloads_runtime_first() {
        let mut loader = MockModuleLoader::new();
        let mut seq = Sequence::new();

        loader
            .expect_load()
            .times(1)
            .returning(|_| Ok(ScriptHandle(10)));
        loader
            .expect_load()
            .times(1)
            .returning(|_| Ok(ScriptHandle(11)));
        loader
            .expect_unload()
            .with(eq(ScriptHandle(11)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        loader
            .expect_unload()
            .with(eq(ScriptHandle(10)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let mut embed = DemoEmbed::new(loader);
        embed.mount(true).unwrap();
        embed.teardown().unwrap();
        assert!(!embed.is_loaded());
    }

    #[test]
    fn test_teardown_before_mount_is_noop() {
        let mut loader = MockModuleLoader::new();
        loader.expect_unload().never();

        let mut embed = DemoEmbed::new(loader);
        embed.teardown().unwrap();
    }

    #[test]
    fn test_script_tag_loader() {
        let mut embed = DemoEmbed::new(ScriptTagLoader::new("https://web.imhex.werwolv.net/"));
        embed.mount(true).unwrap();

        assert_eq!(
            embed.loader().html(),
            "<script src=\"https://web.imhex.werwolv.net/wasm-config.js\"></script>\n\
             <script src=\"https://web.imhex.werwolv.net/imhex.js\" async></script>"
        );

        embed.teardown().unwrap();
        assert_eq!(embed.loader().tags().count(), 0);
    }

    #[test]
    fn test_script_tag_loader_relative_and_double_unload() {
        let mut loader = ScriptTagLoader::new("");
        let handle = loader
            .load(&ScriptResource::new(CONFIG_SCRIPT, false))
            .unwrap();
        assert_eq!(loader.html(), "<script src=\"wasm-config.js\"></script>");

        loader.unload(handle).unwrap();
        assert!(loader.unload(handle).is_err());
        assert!(loader.unload(ScriptHandle(7)).is_err());
    }
}
