//! Page objects for the FLAIR UI
//!
//! Each page borrows a [`Driver`](crate::session::Driver) and the base URL
//! and exposes one method per user action. Selectors live next to the page
//! that owns them.

pub mod login;
pub mod sourcing;

pub use login::LoginPage;
pub use sourcing::SourcingPage;

/// Quote `value` as an XPath string literal, whatever quotes it contains
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
