pub mod html;

pub use html::{escape_html, render_error_page, render_overview_page};
