//! Embassy tasks
//!
//! Every task reaches the source graph through `AppContext::graph`, one
//! short lock per access, and returns once shutdown is requested.

mod clock;
mod countdown;
mod counter;
mod input;
mod navigation;
mod render;
mod scroller;

pub use clock::clock_task;
pub use countdown::countdown_task;
pub use counter::counter_task;
pub use input::{input_task, Buttons};
pub use navigation::navigation_task;
pub use render::render_task;
pub use scroller::{scroller_task, SCROLLER_POOL_SIZE};
