//! Tool trait and registry: explicit name→callable mapping.
//!
//! Callers build a [`ToolRegistry`], register their [`Tool`] implementations,
//! and hand it to the runner/coordinator as a
//! [`ToolSource`](crate::tool_source::ToolSource). The mapping is an explicit
//! argument everywhere; nothing consults global state, so tests can run fully
//! isolated with fake tools.

mod registry;
mod r#trait;

pub use registry::ToolRegistry;
pub use r#trait::Tool;
