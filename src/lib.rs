//! JobTrack - Job Application Tracking Dashboard
//!
//! Client-side session core for the JobTrack frontend, built with Leptos
//! and WebAssembly. This crate owns authentication state, transparent
//! bearer-token attachment, single-flight token refresh, and route guard
//! decisions; the host application provides the views and the router.

pub mod core;
pub mod ui;
