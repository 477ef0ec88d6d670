//! Server-rendered pages. Every interpolated value goes through
//! [`escape_html`].

use axum::http::StatusCode;
use castview_model::{ResolvedActivity, SeriesOverview};

pub const PAGE_TITLE: &str = "Opencast Videos";

const EXPLANATION: &str = "This overview lists every video of the series and the courses that \
embed it as an activity. Courses in the second column also provide the series itself; courses \
in the third column embed the video without a link to its series.";

const STYLE: &str = r#"<style>
body{font-family:system-ui,-apple-system,Segoe UI,Helvetica,Arial,sans-serif;margin:24px;line-height:1.5;}
h1,h2{margin-bottom:0.2em;}
table{border-collapse:collapse;width:100%;margin:0.5em 0;}
th,td{border:1px solid #ddd;padding:6px 8px;font-size:14px;vertical-align:top;}
th{background:#f5f5f5;text-align:left;}
.muted{color:#666;}
.alert{border:1px solid #f1aeb5;background:#f8d7da;color:#58151c;border-radius:6px;padding:8px 12px;margin:12px 0;}
</style>"#;

pub fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn page_heading(overview: &SeriesOverview, multiple_instances: bool) -> String {
    if multiple_instances {
        format!("{PAGE_TITLE}: {}", overview.instance.name)
    } else {
        PAGE_TITLE.to_string()
    }
}

fn activity_links(activities: &[ResolvedActivity]) -> String {
    activities
        .iter()
        .map(|activity| {
            format!(
                "<a href=\"{}\" target=\"_blank\">{}</a>",
                escape_html(&activity.display_url),
                escape_html(&activity.course_name)
            )
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

fn open_document(out: &mut String, title: &str) {
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\" />\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    out.push_str(STYLE);
    out.push_str("\n</head><body>\n");
}

fn close_document(out: &mut String) {
    out.push_str("</body>\n</html>\n");
}

/// Render the series video overview.
///
/// `multiple_instances` adds the instance name to the heading.
pub fn render_overview_page(overview: &SeriesOverview, multiple_instances: bool) -> String {
    let mut out = String::new();
    open_document(&mut out, PAGE_TITLE);

    out.push_str(&format!(
        "<h1>{}</h1>\n<p>{}</p>\n<h2>{}</h2>\n",
        escape_html(&page_heading(overview, multiple_instances)),
        escape_html(EXPLANATION),
        escape_html(&overview.heading)
    ));

    out.push_str(
        "<table>\n<tr><th>Video</th><th>Embedded as activity</th>\
         <th>Embedded as activity without linked series</th></tr>\n",
    );
    if overview.rows.is_empty() && overview.notices.is_empty() {
        out.push_str("<tr><td colspan=\"3\" class=\"muted\">No videos</td></tr>\n");
    }
    for row in &overview.rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&row.video_title),
            activity_links(&row.linked_activities),
            activity_links(&row.unlinked_activities)
        ));
    }
    out.push_str("</table>\n");

    for notice in &overview.notices {
        out.push_str(&format!(
            "<div class=\"alert\" role=\"alert\">{}</div>\n",
            escape_html(notice)
        ));
    }

    close_document(&mut out);
    out
}

pub fn render_error_page(status: StatusCode, message: &str) -> String {
    let mut out = String::new();
    open_document(&mut out, PAGE_TITLE);
    out.push_str(&format!(
        "<h1>{}</h1>\n<div class=\"alert\" role=\"alert\">{}</div>\n",
        escape_html(status.canonical_reason().unwrap_or("Error")),
        escape_html(message)
    ));
    close_document(&mut out);
    out
}
