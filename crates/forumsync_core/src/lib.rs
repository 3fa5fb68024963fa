//! Forumsync core: pure domain types, tag selection and the pipeline state machine.
mod effect;
mod filter;
mod msg;
mod state;
mod thread;
mod update;

pub use effect::Effect;
pub use filter::TagAllowList;
pub use msg::Msg;
pub use state::{PipelineState, RenderFailure, RunSummary, Stage};
pub use thread::{RenderedDocument, Thread, ThreadId};
pub use update::update;
