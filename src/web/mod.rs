pub mod admin;
pub mod auth;
pub mod cron;
pub mod responses;
pub mod router;
pub mod state;
pub mod submit;
pub mod survey;
pub mod templates;

#[cfg(test)]
pub mod test_support;

pub use responses::{ApiError, ApiFailure, ApiMessage, json_error, json_failure};
pub use state::AppState;
pub use templates::{escape_html, render_footer};
