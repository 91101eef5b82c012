//! Appkit infrastructure: tracing setup and the action datastore.

pub mod datastore;
pub mod telemetry;

pub use datastore::{Datastore, DatastoreMirror, HttpMirror, MirrorError, MirrorStatus};
pub use telemetry::init_tracing;
