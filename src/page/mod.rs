//! Download section state, transitions and derived views.
//!
//! [`PageState`] is the single owner of everything the section shows. It is
//! changed only through [`PageState::apply`]; [`ReleaseController`] wraps it
//! and performs the network effects the transitions ask for.

mod controller;
mod state;
mod view;

pub use controller::ReleaseController;
pub use state::{Dropdown, Effect, Event, FetchState, PageState};
pub use view::{
    DEFAULT_DROPDOWN_HEIGHT, PlatformCounts, ReleaseView, dropdown_max_height, release_date,
    release_label,
};
