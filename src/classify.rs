//! Request classification: reduce a request URL to the document type it
//! returns, so that `/i/api/graphql/Xyz123/TweetDetail?variables=…` and the
//! same query under a new query id are the same type.

use url::Url;

/// Classify a request URL (absolute, or just a path) into a document type.
///
/// Drops the query string, the `/i/api` prefix, a leading API version, and a
/// trailing `.json`; collapses GraphQL query ids and numeric ids.
pub fn document_type(request: &str) -> String {
    let path = match Url::parse(request) {
        Ok(url) => url.path().to_owned(),
        Err(_) => request.split(['?', '#']).next().unwrap_or_default().to_owned(),
    };
    let path = path.strip_prefix("/i/api").unwrap_or(&path);
    let path = path.strip_suffix(".json").unwrap_or(path);

    let mut segments: Vec<&str> = path.split('/').filter(|s| return !s.is_empty()).collect();
    if segments.first().is_some_and(|first| return is_version(first)) {
        segments.remove(0);
    }
    if segments.first() == Some(&"graphql") && segments.len() > 2 {
        // `/graphql/<queryId>/<Operation>`: the query id changes per deploy.
        segments.remove(1);
    }

    let collapsed: Vec<&str> = segments
        .into_iter()
        .map(|segment| return if is_numeric(segment) { ":id" } else { segment })
        .collect();
    return format!("/{}", collapsed.join("/"));
}

/// `1.1`, `2`: an API version segment.
fn is_version(segment: &str) -> bool {
    return !segment.is_empty() && segment.split('.').all(is_numeric);
}

/// All ASCII digits.
fn is_numeric(segment: &str) -> bool {
    return !segment.is_empty() && segment.bytes().all(|b| return b.is_ascii_digit());
}
