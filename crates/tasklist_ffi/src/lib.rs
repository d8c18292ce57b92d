//! Flutter-facing bindings for `tasklist_core`.

pub mod api;

// Produced by `flutter_rust_bridge_codegen generate`; the `codegen` feature
// is enabled once that file exists.
#[cfg(feature = "codegen")]
mod frb_generated;
