//! Streaming feed parser.
//!
//! Drives a [`quick_xml`] reader over the response body and feeds every
//! token through a three-state machine:
//!
//! ```text
//!            <item>                 <title>|<link>|<description>
//! Seeking ─────────────► InItem ──────────────────────────────► InField
//!    ▲                    │  ▲                                     │
//!    └──── </item> ───────┘  └──────────── </field> ──────────────┘
//! ```
//!
//! * Only direct children of `<item>` named `title`, `link` or
//!   `description` are captured.  Their text (and CDATA) is accumulated
//!   verbatim, without trimming, until the field closes.
//! * A media element (`content`, matched on the local name so that
//!   `media:content` counts, or `enclosure`) anywhere inside an item sets
//!   the image from its `url` attribute.  The last one seen wins.
//! * Anything else inside an item is skipped along with its text.
//! * End-tag names are not checked against start tags, so loosely nested
//!   documents still yield their items.
//! * Input that runs out inside an item is [`ParseError::Truncated`], also
//!   when it stops partway through a tag.
//!
//! The parser makes one pass and returns either every item or an error;
//! it never hands back a partial list.

use std::io::BufRead;

use quick_xml::encoding::Decoder;
use quick_xml::errors::SyntaxError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::NewsItem;
use crate::error::ParseError;

/// Parse every `<item>` in `input`, in document order.
pub fn parse<R: BufRead>(input: R) -> Result<Vec<NewsItem>, ParseError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().check_end_names = false;

    let mut machine = ItemMachine::default();
    let mut buf = Vec::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(err) if machine.in_item() && ends_inside_markup(&err) => {
                return Err(ParseError::Truncated)
            }
            Err(err) => {
                return Err(ParseError::Malformed(format!(
                    "{err} (at byte {})",
                    reader.buffer_position()
                )))
            }
        };
        if let Event::Eof = event {
            break;
        }
        machine.step(event, reader.decoder())?;
        buf.clear();
    }

    machine.finish()
}

/// Convenience wrapper for an in-memory body.
pub fn parse_bytes(body: &[u8]) -> Result<Vec<NewsItem>, ParseError> {
    parse(body)
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Description,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"link" => Some(Field::Link),
            b"description" => Some(Field::Description),
            _ => None,
        }
    }

    fn assign(self, item: &mut NewsItem, value: String) {
        match self {
            Field::Title => item.title = value,
            Field::Link => item.link = value,
            Field::Description => item.description = value,
        }
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Seeking,
    /// `depth` counts open elements below the `<item>` itself.
    InItem { item: NewsItem, depth: usize },
    /// `depth` counts open elements below the field element.
    InField {
        item: NewsItem,
        field: Field,
        text: String,
        depth: usize,
    },
}

#[derive(Debug, Default)]
struct ItemMachine {
    state: State,
    items: Vec<NewsItem>,
}

impl ItemMachine {
    fn step(&mut self, event: Event<'_>, decoder: Decoder) -> Result<(), ParseError> {
        let state = std::mem::take(&mut self.state);

        self.state = match (state, event) {
            // -- Seeking ------------------------------------------------------
            (State::Seeking, Event::Start(e)) if e.name().as_ref() == b"item" => State::InItem {
                item: NewsItem::default(),
                depth: 0,
            },
            (State::Seeking, Event::Empty(e)) if e.name().as_ref() == b"item" => {
                self.items.push(NewsItem::default());
                State::Seeking
            }
            (State::Seeking, _) => State::Seeking,

            // -- InItem -------------------------------------------------------
            (State::InItem { mut item, depth }, Event::Start(e)) => {
                if is_media(&e) {
                    item.image = media_url(&e)?;
                }
                match Field::from_name(e.name().as_ref()) {
                    Some(field) if depth == 0 => State::InField {
                        item,
                        field,
                        text: String::new(),
                        depth: 0,
                    },
                    _ => State::InItem {
                        item,
                        depth: depth + 1,
                    },
                }
            }
            (State::InItem { mut item, depth }, Event::Empty(e)) => {
                if is_media(&e) {
                    item.image = media_url(&e)?;
                } else if let Some(field) = Field::from_name(e.name().as_ref()) {
                    if depth == 0 {
                        field.assign(&mut item, String::new());
                    }
                }
                State::InItem { item, depth }
            }
            (State::InItem { item, depth: 0 }, Event::End(e)) => {
                if e.name().as_ref() == b"item" {
                    self.items.push(item);
                    State::Seeking
                } else {
                    // Stray close tag directly under the item.
                    State::InItem { item, depth: 0 }
                }
            }
            (State::InItem { item, depth }, Event::End(_)) => State::InItem {
                item,
                depth: depth - 1,
            },
            (state @ State::InItem { .. }, _) => state,

            // -- InField ------------------------------------------------------
            (
                State::InField {
                    item,
                    field,
                    mut text,
                    depth,
                },
                Event::Text(e),
            ) => {
                let chunk = match e.unescape() {
                    Ok(chunk) => chunk.into_owned(),
                    // Entities the XML layer does not know (e.g. `&nbsp;`) are kept as written.
                    Err(_) => decode(decoder, &e)?,
                };
                text.push_str(&chunk);
                State::InField {
                    item,
                    field,
                    text,
                    depth,
                }
            }
            (
                State::InField {
                    item,
                    field,
                    mut text,
                    depth,
                },
                Event::CData(e),
            ) => {
                text.push_str(&decode(decoder, &e)?);
                State::InField {
                    item,
                    field,
                    text,
                    depth,
                }
            }
            (
                State::InField {
                    item,
                    field,
                    text,
                    depth,
                },
                Event::Start(_),
            ) => State::InField {
                item,
                field,
                text,
                depth: depth + 1,
            },
            (
                State::InField {
                    mut item,
                    field,
                    text,
                    depth: 0,
                },
                Event::End(e),
            ) => {
                field.assign(&mut item, text);
                if e.name().as_ref() == b"item" {
                    // `<item><title>A</item>`: the item closes the field too.
                    self.items.push(item);
                    State::Seeking
                } else {
                    State::InItem { item, depth: 0 }
                }
            }
            (
                State::InField {
                    item,
                    field,
                    text,
                    depth,
                },
                Event::End(_),
            ) => State::InField {
                item,
                field,
                text,
                depth: depth - 1,
            },
            (state @ State::InField { .. }, _) => state,
        };

        Ok(())
    }

    fn in_item(&self) -> bool {
        !matches!(self.state, State::Seeking)
    }

    fn finish(self) -> Result<Vec<NewsItem>, ParseError> {
        match self.state {
            State::Seeking => Ok(self.items),
            State::InItem { .. } | State::InField { .. } => Err(ParseError::Truncated),
        }
    }
}

/// Whether the reader gave up because input ran out inside a tag, comment,
/// CDATA section or similar construct.  Every syntax error except a bad
/// `<!` prefix is of that kind.
fn ends_inside_markup(err: &quick_xml::Error) -> bool {
    matches!(err, quick_xml::Error::Syntax(kind) if !matches!(kind, SyntaxError::InvalidBangMarkup))
}

fn is_media(e: &BytesStart<'_>) -> bool {
    matches!(e.local_name().as_ref(), b"content" | b"enclosure")
}

/// The `url` attribute of a media element, or `""` when it has none.
fn media_url(e: &BytesStart<'_>) -> Result<String, ParseError> {
    let attr = e
        .try_get_attribute("url")
        .map_err(|err| ParseError::Malformed(err.to_string()))?;
    match attr {
        Some(attr) => attr
            .unescape_value()
            .map(|value| value.into_owned())
            .map_err(|err| ParseError::Malformed(err.to_string())),
        None => Ok(String::new()),
    }
}

fn decode(decoder: Decoder, bytes: &[u8]) -> Result<String, ParseError> {
    decoder
        .decode(bytes)
        .map(|text| text.into_owned())
        .map_err(|err| ParseError::Malformed(err.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(title: &str, link: &str, description: &str, image: &str) -> NewsItem {
        NewsItem {
            title: title.into(),
            link: link.into(),
            description: description.into(),
            image: image.into(),
        }
    }

    #[test]
    fn parses_full_items_in_document_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Top Stories</title>
    <link>http://www.abc.net.au/news/</link>
    <item>
      <title>First</title>
      <link>http://x/1</link>
      <description>One</description>
      <media:content url="http://x/1.jpg" medium="image"/>
    </item>
    <item>
      <title>Second</title>
      <link>http://x/2</link>
      <description>Two</description>
      <media:content url="http://x/2.jpg" medium="image"/>
    </item>
  </channel>
</rss>"#;

        let items = parse_bytes(xml.as_bytes()).unwrap();

        assert_eq!(
            items,
            vec![
                item("First", "http://x/1", "One", "http://x/1.jpg"),
                item("Second", "http://x/2", "Two", "http://x/2.jpg"),
            ]
        );
    }

    #[test]
    fn loosely_nested_document_still_parses() {
        let xml = "<rss><channel><item><title>A</title><link>http://x/1</link>\
                   <description>d</description></item></rss>";

        let items = parse_bytes(xml.as_bytes()).unwrap();

        assert_eq!(items, vec![item("A", "http://x/1", "d", "")]);
    }

    #[test]
    fn missing_description_is_empty() {
        let xml = "<rss><item><title>T</title><link>L</link></item></rss>";
        let items = parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(items, vec![item("T", "L", "", "")]);
    }

    #[test]
    fn media_without_url_gives_empty_image() {
        let xml = r#"<rss><item><title>T</title><media:content medium="image"/></item></rss>"#;
        let items = parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(items[0].image, "");
    }

    #[test]
    fn non_empty_media_element_and_its_children() {
        let xml = r#"<rss><item>
            <title>Real title</title>
            <media:content url="http://x/big.jpg"><media:title>Caption</media:title></media:content>
        </item></rss>"#;

        let items = parse_bytes(xml.as_bytes()).unwrap();

        assert_eq!(items[0].title, "Real title");
        assert_eq!(items[0].image, "http://x/big.jpg");
    }

    #[test]
    fn media_inside_group_is_found_and_last_wins() {
        let xml = r#"<rss><item>
            <media:group>
              <media:content url="http://x/small.jpg"/>
              <media:content url="http://x/large.jpg"/>
            </media:group>
        </item></rss>"#;

        let items = parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(items[0].image, "http://x/large.jpg");
    }

    #[test]
    fn enclosure_counts_as_media() {
        let xml = r#"<rss><item><enclosure url="http://x/e.jpg" type="image/jpeg"/></item></rss>"#;
        let items = parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(items[0].image, "http://x/e.jpg");
    }

    #[test]
    fn field_text_is_kept_verbatim() {
        let xml = "<rss><item><title>  spaced  </title><description>\n line\n</description></item></rss>";
        let items = parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(items[0].title, "  spaced  ");
        assert_eq!(items[0].description, "\n line\n");
    }

    #[test]
    fn entities_are_unescaped_and_cdata_is_accumulated() {
        let xml = "<rss><item><title>Fish &amp; Chips</title>\
                   <description>Intro <![CDATA[<p>body</p>]]> outro</description></item></rss>";

        let items = parse_bytes(xml.as_bytes()).unwrap();

        assert_eq!(items[0].title, "Fish & Chips");
        assert_eq!(items[0].description, "Intro <p>body</p> outro");
    }

    #[test]
    fn unknown_entities_are_kept_as_written() {
        let xml = "<rss><item><title>a&nbsp;b</title></item></rss>";
        let items = parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(items[0].title, "a&nbsp;b");
    }

    #[test]
    fn empty_and_self_closing_fields_are_empty_strings() {
        let xml = "<rss><item><title></title><link/><description/></item></rss>";
        let items = parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(items, vec![NewsItem::default()]);
    }

    #[test]
    fn unrecognized_elements_are_skipped() {
        let xml = "<rss><item>\
                   <guid>g-1</guid>\
                   <category><title>Nested title</title></category>\
                   <title>Kept</title>\
                   <pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>\
                   </item></rss>";

        let items = parse_bytes(xml.as_bytes()).unwrap();

        assert_eq!(items, vec![item("Kept", "", "", "")]);
    }

    #[test]
    fn prefixed_field_names_are_not_fields() {
        let xml = "<rss><item><title>Kept</title><dc:title>Other</dc:title></item></rss>";
        let items = parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(items[0].title, "Kept");
    }

    #[test]
    fn duplicates_are_not_removed() {
        let one = "<item><title>Same</title><link>http://x/1</link></item>";
        let xml = format!("<rss>{one}{one}</rss>");
        let items = parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], items[1]);
    }

    #[test]
    fn self_closing_item_is_an_empty_item() {
        let items = parse_bytes(b"<rss><item/></rss>").unwrap();
        assert_eq!(items, vec![NewsItem::default()]);
    }

    #[test]
    fn document_without_items_is_empty() {
        let items = parse_bytes(b"<rss><channel><title>Nothing</title></channel></rss>").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn empty_body_is_empty() {
        assert!(parse_bytes(b"").unwrap().is_empty());
    }

    #[test]
    fn truncated_inside_item_is_an_error() {
        let xml = "<rss><item><title>One</title></item><item><title>Two</title>";
        assert_eq!(parse_bytes(xml.as_bytes()), Err(ParseError::Truncated));
    }

    #[test]
    fn truncated_inside_field_is_an_error() {
        let xml = "<rss><channel><item><title>Unclosed";
        assert_eq!(parse_bytes(xml.as_bytes()), Err(ParseError::Truncated));
    }

    #[test]
    fn item_end_closes_an_open_field() {
        let xml = "<rss><item><title>A</item></rss>";
        let items = parse_bytes(xml.as_bytes()).unwrap();
        assert_eq!(items, vec![item("A", "", "", "")]);
    }

    #[test]
    fn cut_mid_tag_inside_item_is_truncated() {
        for xml in [
            "<rss><item><title>A</ti",
            "<rss><item><title>A</title><li",
            "<rss><item><title>A</title></it",
            r#"<rss><item><media:content url="http://x/1.j"#,
            "<rss><item><description><![CDATA[half",
        ] {
            assert_eq!(parse_bytes(xml.as_bytes()), Err(ParseError::Truncated), "{xml}");
        }
    }

    #[test]
    fn cut_mid_tag_outside_items_is_malformed() {
        let xml = "<rss><item><title>A</title></item></rs";
        assert!(matches!(
            parse_bytes(xml.as_bytes()),
            Err(ParseError::Malformed(_))
        ));
    }

    #[test]
    fn syntax_errors_are_malformed() {
        for xml in [
            "<rss><item><!x></item></rss>",
            "<rss><item><media:content url=unquoted/></item></rss>",
        ] {
            assert!(
                matches!(parse_bytes(xml.as_bytes()), Err(ParseError::Malformed(_))),
                "{xml}"
            );
        }
    }

    #[test]
    fn reads_from_any_buffered_reader() {
        let xml = "<rss><item><title>Buffered</title></item></rss>";
        let reader = std::io::BufReader::with_capacity(4, xml.as_bytes());
        let items = parse(reader).unwrap();
        assert_eq!(items[0].title, "Buffered");
    }
}
