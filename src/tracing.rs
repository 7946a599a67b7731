//! # Observability & Tracing
//!
//! The core logs through the `tracing` crate with structured fields instead of
//! formatted strings, so every line can be filtered by resource or operation.
//!
//! ## What Gets Traced
//!
//! - **Lifecycle** (`info`): resource built, registered, adapter initialized
//! - **Dispatch** (`debug`): override hits, resolved models, merged scopes,
//!   ignored scope names, missing instances
//! - **Pipeline**: every `prepare_collection` run is wrapped in a
//!   `prepare_collection` span carrying the resource name
//! - **Failures** (`warn`): invalid definitions, failed model inference and
//!   duplicate registrations, logged right before the error is returned
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run     # lifecycle only
//! RUST_LOG=debug cargo run    # per-dispatch detail
//! ```
//!
//! Expected `debug` output for one list request:
//!
//! ```text
//! DEBUG prepare_collection: Merging scopes scopes=["in_stock"] resource="widgets"
//! DEBUG prepare_collection: Collection prepared resource="widgets"
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // resource/operation fields identify the source
        .compact()
        .init();
}
