//! The item type produced by the feed parser.
//!
//! `NewsItem` is deliberately flat: four strings, each empty when the feed
//! did not provide it.  No field is required, so a bare `<item/>` is still a
//! valid (if uninteresting) item.

/// A single news entry from a category feed.
///
/// The [`link`](NewsItem::link) is the identity of a result; consumers use it
/// as the item's URI.  Items are kept in document order and are never
/// de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsItem {
    /// Headline text, verbatim from `<title>`.
    pub title: String,

    /// Canonical URL of the story, from `<link>`.
    pub link: String,

    /// Summary text, verbatim from `<description>`.
    pub description: String,

    /// Image URL taken from the `url` attribute of the media element.
    ///
    /// Empty when the item carries no media element, or the element has no
    /// `url` attribute.
    pub image: String,
}

impl NewsItem {
    /// Whether the item carries an image URL.
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_item_is_all_empty() {
        let item = NewsItem::default();
        assert!(item.title.is_empty());
        assert!(item.link.is_empty());
        assert!(item.description.is_empty());
        assert!(!item.has_image());
    }

    #[test]
    fn has_image_reflects_image_field() {
        let item = NewsItem {
            image: "http://x/img.jpg".into(),
            ..NewsItem::default()
        };
        assert!(item.has_image());
    }
}
