use castview_model::ModuleId;
use url::Url;

const ACTIVITY_VIEW_PATH: [&str; 3] = ["mod", "opencast", "view.php"];

/// Link to the LMS page showing the activity wrapped by `module`.
///
/// The LMS may live below a path prefix (`https://host/moodle`), so the view
/// path is appended to whatever path the base carries.
pub fn activity_view_url(base: &Url, module: ModuleId) -> String {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(ACTIVITY_VIEW_PATH);
    }
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair("id", &module.to_string());
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_view_path_to_bare_host() {
        let base = Url::parse("https://lms.example.edu").unwrap();
        assert_eq!(
            activity_view_url(&base, ModuleId(42)),
            "https://lms.example.edu/mod/opencast/view.php?id=42"
        );
    }

    #[test]
    fn keeps_path_prefix_and_drops_trailing_slash() {
        let base = Url::parse("https://lms.example.edu/moodle/").unwrap();
        assert_eq!(
            activity_view_url(&base, ModuleId(7)),
            "https://lms.example.edu/moodle/mod/opencast/view.php?id=7"
        );
    }

    #[test]
    fn replaces_existing_query() {
        let base = Url::parse("https://lms.example.edu/?lang=de#top").unwrap();
        assert_eq!(
            activity_view_url(&base, ModuleId(1)),
            "https://lms.example.edu/mod/opencast/view.php?id=1"
        );
    }
}
