//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and the
//! application: callbacks in, a per-frame context out.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
