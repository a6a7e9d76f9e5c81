// Blogger stores both reader-facing labels and internal taxonomy URLs as
// `category` terms; only the former become WordPress tags.
const URL_PREFIXES: [&str; 3] = ["http://", "https://", "www."];

pub fn is_valid_label(label: &str) -> bool {
    !URL_PREFIXES.iter().any(|prefix| label.starts_with(prefix))
}

pub fn tag_nicename(label: &str) -> String {
    label.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_labels_are_rejected() {
        assert!(!is_valid_label("http://x"));
        assert!(!is_valid_label("https://example.com/tag/x"));
        assert!(!is_valid_label("www.x"));
        assert!(!is_valid_label("http://schemas.google.com/blogger/2008/kind#post"));
    }

    #[test]
    fn test_plain_labels_are_accepted() {
        assert!(is_valid_label("Travel"));
        assert!(is_valid_label(""));
        assert!(is_valid_label("HTTP://shouting"));
        assert!(is_valid_label("see http://x"));
        assert!(is_valid_label("wwwhat"));
    }

    #[test]
    fn test_tag_nicename() {
        assert_eq!(tag_nicename("Travel"), "travel");
        assert_eq!(tag_nicename("Road Trip 2019"), "road-trip-2019");
        assert_eq!(tag_nicename(""), "");
    }
}
