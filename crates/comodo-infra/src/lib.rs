//! Infrastructure around the Comodo adapter core
//!
//! Everything that talks to the outside world lives here: the `cmdscan`
//! process, the signature download and the Malice webhook.

pub mod invoker;
pub mod pipeline;
pub mod telemetry;
pub mod update;
pub mod webhook;

// Re-export commonly used types
pub use invoker::{CmdScanInvoker, ScanInvoker};
pub use pipeline::{resolve_target, ScanPipeline};
pub use telemetry::init_tracing;
pub use update::{UpdateManager, UpdateOutcome};
pub use webhook::WebhookReporter;
