//! Server-rendered HTML fragments for the configuration page.

pub mod layout;

pub use layout::{base_page, button, card, escape_html, input, status_badge};
