use url::Url;

/// Reduce a raw anchor target to a normalized site-relative path.
///
/// - `#`, `#...` fragments and empty targets are non-navigable → `None`
/// - absolute URLs on `base` origin are reduced to their path component
/// - absolute URLs on a foreign origin are non-navigable → `None`
/// - relative non-rooted paths are prefixed with `/`
pub fn normalize_path(href: &str, base: &Url) -> Option<String> {
    let trimmed = href.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    if trimmed.starts_with("javascript:") || trimmed.starts_with("mailto:") {
        return None;
    }

    if let Ok(absolute) = Url::parse(trimmed) {
        if absolute.origin() == base.origin() {
            return Some(absolute.path().to_string());
        }
        return None;
    }

    if trimmed.starts_with('/') {
        // Drop query/fragment, keep the path alone.
        let end = trimmed
            .find(['?', '#'])
            .unwrap_or(trimmed.len());
        return Some(trimmed[..end].to_string());
    }

    let end = trimmed.find(['?', '#']).unwrap_or(trimmed.len());
    Some(format!("/{}", &trimmed[..end]))
}
