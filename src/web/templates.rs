use chrono::{Datelike, Utc};

pub fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(
        r#"<footer class="app-footer">© {year} Happy Meter, internal use only</footer>"#,
        year = current_year
    )
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
