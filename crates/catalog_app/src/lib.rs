//! Page session wiring for the catalog engine: routes intercepted payloads,
//! document mutations and user actions through the catalog core and runs the
//! resulting effects against a host document.
pub mod platform;
