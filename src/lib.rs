//! QR upload scanner
//!
//! Accepts an image over HTTP, decodes the QR codes in it and answers with
//! JSON: the decoded payloads, plus a redirect target when the first payload
//! looks like a web address. Every failure, including ones raised by the
//! framework itself, is answered with the same `{"ok": false, "error": ...}`
//! envelope.

pub mod app;
pub mod app_state;
pub mod boundary;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
