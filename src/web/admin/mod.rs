mod auth;
mod export;
mod login;
mod stats;

pub use export::export_csv;
pub use login::login;
pub use stats::stats;
