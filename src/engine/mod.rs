//! Build engines and the contract the orchestrator drives them through.

mod glob;
mod mirror;

pub use mirror::MirrorEngine;

use crate::model::BuildEvent;
use std::future::Future;
use tokio::sync::mpsc::UnboundedSender;

/// A build engine consumed by the run controller.
///
/// The engine owns its configuration, emits exactly one `BuildEvent` per
/// artifact outcome on `events`, and resolves to the overall success of the
/// run. A fatal internal failure must surface at least one `error`-kind
/// event before resolving to `false`. Event delivery is serialized by the
/// channel; the engine is free to parallelize internally.
pub trait BuildEngine {
    fn run(
        self,
        events: UnboundedSender<BuildEvent>,
    ) -> impl Future<Output = bool> + Send + 'static;
}
