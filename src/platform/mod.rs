//! Platform bindings
//!
//! The browser build exports a `WebGame` handle to JavaScript. Rendering,
//! input capture and the frame loop stay on the JavaScript side; each
//! frame it passes input in and reads a JSON snapshot back.

#[cfg(target_arch = "wasm32")]
pub mod web;
