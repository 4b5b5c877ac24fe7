//! Application module: the presentation model used by the TUI and runtime.
//!
//! `App` lives in `app::model`; the render-ready `ViewModel` it derives
//! lives in `app::view`.

mod model;
mod view;

pub use model::*;
pub use view::{NO_TRACK_SELECTED, Row, ViewModel};
