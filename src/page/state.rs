//! Serializable download-section state and its reducer.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::asset::Platform;
use crate::github::{Channel, Release};

use super::view::{DEFAULT_DROPDOWN_HEIGHT, ReleaseView};

/// One of the per-platform download lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dropdown {
    Windows,
    MacOs,
    Linux,
}

impl fmt::Display for Dropdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dropdown::Windows => write!(f, "Windows"),
            Dropdown::MacOs => write!(f, "macOS"),
            Dropdown::Linux => write!(f, "Linux"),
        }
    }
}

/// Progress of the release request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FetchState {
    Loading,
    Ready { release: Release },
    Error { message: String },
}

/// Something that happened on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Mounted,
    ChannelSelected(Channel),
    Retry,
    FetchCompleted {
        request: u64,
        result: Result<Release, String>,
    },
    DropdownToggled {
        dropdown: Dropdown,
        max_height: u32,
    },
    ClickedOutside,
    HoverEntered(Dropdown),
    HoverLeft,
    AssetChosen(String),
}

/// Work the owner of the state has to carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { request: u64, channel: Channel },
    OpenUrl(String),
}

/// The whole state of the download section.
///
/// Only [`PageState::apply`] changes it. `request` identifies the most
/// recently issued fetch; completions carrying any other id are stale and
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub channel: Channel,
    pub platform: Platform,
    pub fetch: FetchState,
    pub request: u64,
    pub open_dropdown: Option<Dropdown>,
    pub hovered_dropdown: Option<Dropdown>,
    pub dropdown_max_height: u32,
}

impl PageState {
    pub fn new(platform: Platform, channel: Channel) -> Self {
        Self {
            channel,
            platform,
            fetch: FetchState::Loading,
            request: 0,
            open_dropdown: None,
            hovered_dropdown: None,
            dropdown_max_height: DEFAULT_DROPDOWN_HEIGHT,
        }
    }

    /// Apply `event` and return the effect it requires, if any.
    pub fn apply(&mut self, event: Event) -> Option<Effect> {
        match event {
            Event::Mounted | Event::Retry => Some(self.begin_fetch()),
            Event::ChannelSelected(channel) => {
                if channel == self.channel {
                    return None;
                }
                self.channel = channel;
                Some(self.begin_fetch())
            }
            Event::FetchCompleted { request, result } => {
                if request != self.request {
                    debug!(
                        "Discarding stale response for request {} (current {})",
                        request, self.request
                    );
                    return None;
                }
                self.fetch = match result {
                    Ok(release) => FetchState::Ready { release },
                    Err(message) => FetchState::Error { message },
                };
                None
            }
            Event::DropdownToggled {
                dropdown,
                max_height,
            } => {
                self.dropdown_max_height = max_height;
                self.open_dropdown = if self.open_dropdown == Some(dropdown) {
                    None
                } else {
                    Some(dropdown)
                };
                None
            }
            Event::ClickedOutside => {
                self.open_dropdown = None;
                None
            }
            Event::HoverEntered(dropdown) => {
                self.hovered_dropdown = Some(dropdown);
                None
            }
            Event::HoverLeft => {
                self.hovered_dropdown = None;
                None
            }
            Event::AssetChosen(url) => {
                self.open_dropdown = None;
                Some(Effect::OpenUrl(url))
            }
        }
    }

    fn begin_fetch(&mut self) -> Effect {
        self.request += 1;
        self.fetch = FetchState::Loading;
        Effect::Fetch {
            request: self.request,
            channel: self.channel,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.fetch, FetchState::Loading)
    }

    pub fn release(&self) -> Option<&Release> {
        match &self.fetch {
            FetchState::Ready { release } => Some(release),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.fetch {
            FetchState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Whether `dropdown` is drawn highlighted (hovered or open).
    pub fn is_highlighted(&self, dropdown: Dropdown) -> bool {
        self.hovered_dropdown == Some(dropdown) || self.open_dropdown == Some(dropdown)
    }

    /// Derived view of the loaded release, if there is one.
    pub fn view(&self) -> Option<ReleaseView> {
        self.release()
            .map(|release| ReleaseView::new(release, self.channel, &self.platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{ClientArch, ClientOs};

    fn state() -> PageState {
        PageState::new(
            Platform::new(ClientOs::Windows, ClientArch::X86),
            Channel::Stable,
        )
    }

    fn release(tag: &str) -> Release {
        Release {
            tag_name: tag.to_string(),
            updated_at: "2025-02-28T09:10:11Z".to_string(),
            html_url: format!("https://example.com/{}", tag),
            assets: vec![],
        }
    }

    #[test]
    fn test_mount_starts_fetch() {
        let mut state = state();
        let effect = state.apply(Event::Mounted);
        assert_eq!(
            effect,
            Some(Effect::Fetch {
                request: 1,
                channel: Channel::Stable
            })
        );
        assert!(state.is_loading());
    }

    #[test]
    fn test_fetch_success_and_failure() {
        let mut state = state();
        state.apply(Event::Mounted);
        state.apply(Event::FetchCompleted {
            request: 1,
            result: Ok(release("v1.0.0")),
        });
        assert_eq!(state.release().unwrap().tag_name, "v1.0.0");

        state.apply(Event::Retry);
        assert!(state.is_loading());
        state.apply(Event::FetchCompleted {
            request: 2,
            result: Err("Not Found".into()),
        });
        assert_eq!(state.error(), Some("Not Found"));
        assert!(state.release().is_none());
    }

    #[test]
    fn test_retry_keeps_channel() {
        let mut state = state();
        state.apply(Event::ChannelSelected(Channel::Nightly));
        let effect = state.apply(Event::Retry);
        assert_eq!(
            effect,
            Some(Effect::Fetch {
                request: 2,
                channel: Channel::Nightly
            })
        );
    }

    #[test]
    fn test_selecting_current_channel_is_noop() {
        let mut state = state();
        state.apply(Event::Mounted);
        assert_eq!(state.apply(Event::ChannelSelected(Channel::Stable)), None);
        assert_eq!(state.request, 1);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = state();
        state.apply(Event::Mounted);
        state.apply(Event::ChannelSelected(Channel::Nightly));

        state.apply(Event::FetchCompleted {
            request: 2,
            result: Ok(release("nightly")),
        });
        // The stable response arrives late.
        state.apply(Event::FetchCompleted {
            request: 1,
            result: Ok(release("v1.0.0")),
        });

        assert_eq!(state.channel, Channel::Nightly);
        assert_eq!(state.release().unwrap().tag_name, "nightly");
    }

    #[test]
    fn test_stale_response_does_not_end_loading() {
        let mut state = state();
        state.apply(Event::Mounted);
        state.apply(Event::ChannelSelected(Channel::Nightly));
        state.apply(Event::FetchCompleted {
            request: 1,
            result: Err("boom".into()),
        });
        assert!(state.is_loading());
    }

    #[test]
    fn test_dropdown_toggle_and_close() {
        let mut state = state();

        state.apply(Event::DropdownToggled {
            dropdown: Dropdown::Linux,
            max_height: 320,
        });
        assert_eq!(state.open_dropdown, Some(Dropdown::Linux));
        assert_eq!(state.dropdown_max_height, 320);

        state.apply(Event::DropdownToggled {
            dropdown: Dropdown::Windows,
            max_height: 500,
        });
        assert_eq!(state.open_dropdown, Some(Dropdown::Windows));

        state.apply(Event::DropdownToggled {
            dropdown: Dropdown::Windows,
            max_height: 500,
        });
        assert_eq!(state.open_dropdown, None);

        state.apply(Event::DropdownToggled {
            dropdown: Dropdown::MacOs,
            max_height: 200,
        });
        state.apply(Event::ClickedOutside);
        assert_eq!(state.open_dropdown, None);
    }

    #[test]
    fn test_hover_highlight() {
        let mut state = state();
        state.apply(Event::HoverEntered(Dropdown::MacOs));
        assert!(state.is_highlighted(Dropdown::MacOs));
        assert!(!state.is_highlighted(Dropdown::Linux));
        state.apply(Event::HoverLeft);
        assert!(!state.is_highlighted(Dropdown::MacOs));
    }

    #[test]
    fn test_asset_chosen_closes_dropdown() {
        let mut state = state();
        state.apply(Event::DropdownToggled {
            dropdown: Dropdown::Windows,
            max_height: 400,
        });
        let effect = state.apply(Event::AssetChosen("https://example.com/a.msi".into()));
        assert_eq!(
            effect,
            Some(Effect::OpenUrl("https://example.com/a.msi".into()))
        );
        assert_eq!(state.open_dropdown, None);
    }

    #[test]
    fn test_state_serializes() {
        let mut state = state();
        state.apply(Event::Mounted);
        state.apply(Event::FetchCompleted {
            request: 1,
            result: Ok(release("v1.0.0")),
        });

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["channel"], "stable");
        assert_eq!(json["fetch"]["state"], "ready");
        assert_eq!(json["fetch"]["release"]["tag_name"], "v1.0.0");
        assert_eq!(json["platform"]["os"], "windows");

        let restored: PageState = serde_json::from_value(json).unwrap();
        assert_eq!(restored, state);
    }
}
