//! Render target selection.
//!
//! Turns the positional arguments of a command, and in Smart Mode the output
//! of a [`ChangeDetector`](crate::detect::ChangeDetector), into [`Targets`].

mod resolve;
mod types;

pub use resolve::{Resolution, ResolveError, ResolveOptions, SmartMode, resolve_targets};
pub use types::{AppSelector, TargetMap, Targets};
