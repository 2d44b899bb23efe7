// crates/pidl-cli/src/lib.rs
// ============================================================================
// Module: PIDL CLI Library
// Description: Shared helpers for the `pidl` binary.
// Purpose: Expose the message catalog to the binary and its tests.
// Dependencies: Standard library only.
// ============================================================================

//! ## Overview
//! The `pidl` binary keeps its command tree in `main.rs`; this library holds
//! the pieces integration tests exercise directly.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod i18n;
