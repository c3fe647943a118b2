//! Request target construction.
//!
//! Pure functions: the same [`Config`] and inputs always give the same URL.

use url::Url;

use crate::config::Config;
use crate::error::RequestError;

/// Join `config.root` with `segments` and append `query` in order.
///
/// Each segment is percent-encoded as a single path segment, so a category
/// code is never validated, it simply becomes part of the path.  A trailing
/// slash on the root is tolerated.
pub fn build_target<S, K, V>(
    config: &Config,
    segments: &[S],
    query: &[(K, V)],
) -> Result<Url, RequestError>
where
    S: AsRef<str>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(&config.root).map_err(|source| RequestError::InvalidRoot {
        root: config.root.clone(),
        source,
    })?;

    url.path_segments_mut()
        .map_err(|()| RequestError::NotABase(config.root.clone()))?
        .pop_if_empty()
        .extend(segments.iter().map(AsRef::as_ref));

    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_QUERY: &[(&str, &str)] = &[];

    fn config(root: &str) -> Config {
        Config::new(root, "test")
    }

    #[test]
    fn joins_root_category_and_resource() {
        let url = build_target(
            &config("http://www.abc.net.au/news/feed"),
            &["45910", "rss.xml"],
            &[("mode", "xml")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "http://www.abc.net.au/news/feed/45910/rss.xml?mode=xml"
        );
    }

    #[test]
    fn trailing_slash_on_root_is_not_doubled() {
        let url = build_target(&config("http://host/feed/"), &["1", "rss.xml"], NO_QUERY).unwrap();
        assert_eq!(url.as_str(), "http://host/feed/1/rss.xml");
    }

    #[test]
    fn bare_host_root() {
        let url = build_target(&config("http://host"), &["1", "rss.xml"], NO_QUERY).unwrap();
        assert_eq!(url.as_str(), "http://host/1/rss.xml");
    }

    #[test]
    fn odd_category_codes_are_encoded_not_rejected() {
        let url = build_target(&config("http://host"), &["a b/c", "rss.xml"], NO_QUERY).unwrap();
        assert_eq!(url.path(), "/a%20b%2Fc/rss.xml");
    }

    #[test]
    fn query_pairs_keep_order_and_are_encoded() {
        let url = build_target(
            &config("http://host"),
            &["x"],
            &[("mode", "xml"), ("q", "a&b c")],
        )
        .unwrap();
        assert_eq!(url.query(), Some("mode=xml&q=a%26b+c"));
    }

    #[test]
    fn unparseable_root_is_an_error() {
        let err = build_target(&config("not a url"), &["x"], NO_QUERY).unwrap_err();
        assert!(matches!(err, RequestError::InvalidRoot { .. }));
    }

    #[test]
    fn cannot_be_a_base_root_is_an_error() {
        let err = build_target(&config("mailto:someone@example.com"), &["x"], NO_QUERY).unwrap_err();
        assert!(matches!(err, RequestError::NotABase(_)));
    }
}
