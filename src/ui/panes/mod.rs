//! TUI pane rendering modules
//!
//! Every pane is a stateless render function over data owned by the app.
//!
//! - [`algorithms`]: the selectable algorithm catalogue
//! - [`canvas`]: the current step (bars, node canvas or maze grid)
//! - [`log`]: step messages and headline blocks
//! - [`status`]: position, speed, playback state and keybindings

pub mod algorithms;
pub mod canvas;
pub mod log;
pub mod status;

pub use algorithms::render_algorithm_pane;
pub use canvas::render_canvas_pane;
pub use log::render_log_pane;
pub use status::{render_status_bar, StatusRenderData};
