use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::{Error, Result};
use crate::models::{EntryAuthor, SourceDocument, SourceEntry};

pub const ATOM_NS: &[u8] = b"http://www.w3.org/2005/Atom";
pub const THREAD_NS: &[u8] = b"http://purl.org/syndication/thread/1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Title,
    Published,
    Content,
    AuthorName,
    AuthorEmail,
}

/// Position in the element tree, only as deep as the reader cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Feed,
    Entry,
    Author,
    Category,
    InReplyTo,
    Field(Field),
    Other,
}

#[derive(Debug, Default)]
struct PartialEntry {
    id: Option<String>,
    title: Option<String>,
    published: Option<String>,
    content: Option<String>,
    categories: Vec<String>,
    author_name: Option<String>,
    author_email: Option<String>,
    in_reply_to: Option<String>,
}

impl PartialEntry {
    fn finish(self) -> Result<SourceEntry> {
        let id = self
            .id
            .ok_or_else(|| Error::MalformedSource("entry without an <id> element".to_string()))?;

        Ok(SourceEntry {
            id,
            title: self.title,
            published: self.published.unwrap_or_default(),
            content: self.content,
            categories: self.categories,
            author: EntryAuthor {
                name: self.author_name,
                email: self.author_email,
            },
            in_reply_to: self.in_reply_to,
        })
    }
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<SourceDocument> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    let xml = std::fs::read_to_string(path)?;
    parse_feed(&xml)
}

/// Parse an Atom feed, keeping every `entry` directly under `feed` in
/// document order.
pub fn parse_feed(xml: &str) -> Result<SourceDocument> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Node> = Vec::new();
    let mut entries = Vec::new();
    let mut current: Option<PartialEntry> = None;
    let mut capturing: Option<Field> = None;
    let mut text_buf = String::new();
    let mut saw_root = false;
    let mut root_closed = false;

    loop {
        let (ns, event) = {
            let (resolved, event) = reader.read_resolved_event()?;
            (Ns::from(&resolved), event)
        };

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if root_closed {
                    return Err(Error::MalformedSource(
                        "content after the root element".to_string(),
                    ));
                }
                check_prefixes(&reader, &ns, e)?;

                let node = classify(stack.last().copied(), &ns, e)?;
                saw_root = true;
                open(node, e, &mut current, &mut capturing, &mut text_buf)?;

                if matches!(event, Event::Start(_)) {
                    stack.push(node);
                } else {
                    close(node, &mut current, &mut capturing, &mut text_buf, &mut entries)?;
                    root_closed = stack.is_empty();
                }
            }
            Event::Text(ref e) => {
                if stack.is_empty() {
                    if !e.iter().all(u8::is_ascii_whitespace) {
                        return Err(Error::MalformedSource(
                            "text outside the root element".to_string(),
                        ));
                    }
                } else if capturing.is_some() {
                    text_buf.push_str(&e.unescape()?);
                }
            }
            Event::CData(ref e) => {
                if stack.is_empty() {
                    return Err(Error::MalformedSource(
                        "CDATA outside the root element".to_string(),
                    ));
                }
                if capturing.is_some() {
                    text_buf.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| {
                    Error::MalformedSource("unbalanced closing tag".to_string())
                })?;
                close(node, &mut current, &mut capturing, &mut text_buf, &mut entries)?;
                root_closed = stack.is_empty();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(Error::MalformedSource(
            "document has no root element".to_string(),
        ));
    }
    if !stack.is_empty() {
        return Err(Error::MalformedSource(
            "unexpected end of document".to_string(),
        ));
    }

    tracing::debug!("Parsed {} Atom entries", entries.len());
    Ok(SourceDocument::new(entries))
}

/// Owned copy of an element's namespace resolution, so the reader can be
/// queried again while the event is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Ns {
    Atom,
    Thread,
    Unbound,
    Foreign,
    Unknown(String),
}

impl From<&ResolveResult<'_>> for Ns {
    fn from(resolved: &ResolveResult<'_>) -> Self {
        match resolved {
            ResolveResult::Bound(Namespace(ns)) if *ns == ATOM_NS => Ns::Atom,
            ResolveResult::Bound(Namespace(ns)) if *ns == THREAD_NS => Ns::Thread,
            ResolveResult::Bound(_) => Ns::Foreign,
            ResolveResult::Unbound => Ns::Unbound,
            ResolveResult::Unknown(prefix) => {
                Ns::Unknown(String::from_utf8_lossy(prefix).into_owned())
            }
        }
    }
}

impl Ns {
    // Feeds written without an xmlns are read as plain Atom
    fn is_atom(&self) -> bool {
        matches!(self, Ns::Atom | Ns::Unbound)
    }
}

/// Every prefix used on the element or its attributes must be declared.
fn check_prefixes(reader: &NsReader<&[u8]>, ns: &Ns, e: &BytesStart) -> Result<()> {
    if let Ns::Unknown(prefix) = ns {
        return Err(unbound_prefix(prefix));
    }

    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        match attr.key.prefix() {
            None => continue,
            Some(prefix) if prefix.as_ref() == b"xml" => continue,
            Some(_) => {}
        }
        if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(attr.key) {
            return Err(unbound_prefix(&String::from_utf8_lossy(&prefix)));
        }
    }
    Ok(())
}

fn unbound_prefix(prefix: &str) -> Error {
    Error::MalformedSource(format!("unbound prefix '{}'", prefix))
}

fn classify(parent: Option<Node>, ns: &Ns, e: &BytesStart) -> Result<Node> {
    let local = e.local_name();
    let name = local.as_ref();
    let atom = ns.is_atom();

    let node = match parent {
        None => {
            if atom && name == b"feed" {
                Node::Feed
            } else {
                return Err(Error::MalformedSource(format!(
                    "expected Atom <feed> root element, found <{}>",
                    String::from_utf8_lossy(name)
                )));
            }
        }
        Some(Node::Feed) if atom && name == b"entry" => Node::Entry,
        Some(Node::Entry) if atom => match name {
            b"id" => Node::Field(Field::Id),
            b"title" => Node::Field(Field::Title),
            b"published" => Node::Field(Field::Published),
            b"content" => Node::Field(Field::Content),
            b"author" => Node::Author,
            b"category" => Node::Category,
            _ => Node::Other,
        },
        Some(Node::Entry) if *ns == Ns::Thread && name == b"in-reply-to" => Node::InReplyTo,
        Some(Node::Author) if atom => match name {
            b"name" => Node::Field(Field::AuthorName),
            b"email" => Node::Field(Field::AuthorEmail),
            _ => Node::Other,
        },
        _ => Node::Other,
    };

    Ok(node)
}

fn open(
    node: Node,
    e: &BytesStart,
    current: &mut Option<PartialEntry>,
    capturing: &mut Option<Field>,
    text_buf: &mut String,
) -> Result<()> {
    match node {
        Node::Entry => *current = Some(PartialEntry::default()),
        Node::Field(field) => {
            // Only the text of `type='xhtml'` bodies is kept; Blogger writes `html`
            if field == Field::Content && attribute(e, b"type")?.as_deref() == Some("xhtml") {
                tracing::warn!("xhtml content keeps its text but loses its markup");
            }
            *capturing = Some(field);
            text_buf.clear();
        }
        Node::Category => {
            if let (Some(entry), Some(term)) = (current.as_mut(), attribute(e, b"term")?) {
                if !term.is_empty() {
                    entry.categories.push(term);
                }
            }
        }
        Node::InReplyTo => {
            if let Some(entry) = current.as_mut() {
                // Presence marks a comment even when `ref` is missing
                entry.in_reply_to = Some(attribute(e, b"ref")?.unwrap_or_default());
            }
        }
        _ => {}
    }
    Ok(())
}

fn close(
    node: Node,
    current: &mut Option<PartialEntry>,
    capturing: &mut Option<Field>,
    text_buf: &mut String,
    entries: &mut Vec<SourceEntry>,
) -> Result<()> {
    match node {
        Node::Entry => {
            if let Some(partial) = current.take() {
                entries.push(partial.finish()?);
            }
        }
        Node::Field(field) => {
            *capturing = None;
            let text = std::mem::take(text_buf);
            if let Some(entry) = current.as_mut() {
                let value = if text.is_empty() { None } else { Some(text) };
                match field {
                    Field::Id => entry.id = value,
                    Field::Title => entry.title = value,
                    Field::Published => entry.published = value,
                    Field::Content => entry.content = value,
                    Field::AuthorName => entry.author_name = value,
                    Field::AuthorEmail => entry.author_email = value,
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn attribute(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<feed xmlns='http://www.w3.org/2005/Atom' xmlns:thr='http://purl.org/syndication/thread/1.0'>
  <id>tag:blogger.com,1999:blog-1</id>
  <title type='text'>My Blog</title>
  <entry>
    <id>tag:blogger.com,1999:blog-1.post-100</id>
    <published>2019-04-01T10:00:00.000-07:00</published>
    <category scheme='http://schemas.google.com/g/2005#kind' term='http://schemas.google.com/blogger/2008/kind#post'/>
    <category scheme='http://www.blogger.com/atom/ns#' term='Road Trip'/>
    <title type='text'>Hello &amp; welcome</title>
    <content type='html'>&lt;p&gt;First post&lt;/p&gt;</content>
    <author>
      <name>Jane Doe</name>
      <uri>https://www.blogger.com/profile/1</uri>
      <email>jane@example.com</email>
    </author>
  </entry>
  <entry>
    <id>tag:blogger.com,1999:blog-1.post-200</id>
    <published>2019-04-02T10:00:00.000-07:00</published>
    <title type='text'></title>
    <content type='html'><![CDATA[<b>raw</b>]]></content>
    <author><name>Anonymous</name></author>
    <thr:in-reply-to ref='tag:blogger.com,1999:blog-1.post-100' type='text/html'/>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_posts_and_comments() {
        let doc = parse_feed(FEED).unwrap();
        assert_eq!(doc.len(), 2);

        let post = &doc.entries[0];
        assert_eq!(post.id, "tag:blogger.com,1999:blog-1.post-100");
        assert_eq!(post.title.as_deref(), Some("Hello & welcome"));
        assert_eq!(post.content.as_deref(), Some("<p>First post</p>"));
        assert_eq!(post.published, "2019-04-01T10:00:00.000-07:00");
        assert_eq!(
            post.categories,
            vec![
                "http://schemas.google.com/blogger/2008/kind#post".to_string(),
                "Road Trip".to_string()
            ]
        );
        assert_eq!(post.author.name.as_deref(), Some("Jane Doe"));
        assert_eq!(post.author.email.as_deref(), Some("jane@example.com"));
        assert!(post.in_reply_to.is_none());

        let comment = &doc.entries[1];
        assert!(comment.title.is_none());
        assert_eq!(comment.content.as_deref(), Some("<b>raw</b>"));
        assert!(comment.author.email.is_none());
        assert_eq!(
            comment.in_reply_to.as_deref(),
            Some("tag:blogger.com,1999:blog-1.post-100")
        );
    }

    #[test]
    fn test_feed_level_elements_are_not_entries() {
        let doc = parse_feed(FEED).unwrap();
        assert!(doc.entries.iter().all(|e| e.id != "tag:blogger.com,1999:blog-1"));
    }

    #[test]
    fn test_empty_in_reply_to_still_marks_comment() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:thr="http://purl.org/syndication/thread/1.0">
<entry><id>c1</id><thr:in-reply-to/></entry></feed>"#;
        let doc = parse_feed(xml).unwrap();
        assert_eq!(doc.entries[0].in_reply_to.as_deref(), Some(""));
    }

    #[test]
    fn test_rejects_non_feed_root() {
        let err = parse_feed("<rss><channel/></rss>").unwrap_err();
        assert!(matches!(err, Error::MalformedSource(_)));
    }

    #[test]
    fn test_rejects_broken_xml() {
        let err = parse_feed("<feed xmlns='http://www.w3.org/2005/Atom'><entry><id>x</id></feed>")
            .unwrap_err();
        assert!(matches!(err, Error::MalformedSource(_)));
    }

    #[test]
    fn test_entry_without_id_is_malformed() {
        let err = parse_feed("<feed xmlns='http://www.w3.org/2005/Atom'><entry/></feed>")
            .unwrap_err();
        assert!(matches!(err, Error::MalformedSource(_)));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = parse_file("/definitely/not/here.xml").unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }

    #[test]
    fn test_undeclared_thread_prefix_is_malformed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
<entry><id>P1</id></entry>
<entry><id>C1</id><thr:in-reply-to ref="P1"/></entry></feed>"#;
        let err = parse_feed(xml).unwrap_err();
        match err {
            Error::MalformedSource(msg) => assert!(msg.contains("thr")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_undeclared_attribute_prefix_is_malformed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
<entry><id>P1</id><content gd:kind="html">x</content></entry></feed>"#;
        assert!(matches!(parse_feed(xml), Err(Error::MalformedSource(_))));
    }

    #[test]
    fn test_declared_prefixes_and_xml_attributes_are_accepted() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:gd="http://schemas.google.com/g/2005" xml:lang="en">
<entry gd:etag="W/abc"><id>P1</id></entry></feed>"#;
        assert_eq!(parse_feed(xml).unwrap().len(), 1);
    }

    #[test]
    fn test_second_root_is_malformed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><id>P1</id></entry></feed>
<feed xmlns="http://www.w3.org/2005/Atom"><entry><id>P2</id></entry></feed>"#;
        assert!(matches!(parse_feed(xml), Err(Error::MalformedSource(_))));
    }

    #[test]
    fn test_trailing_text_is_malformed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><id>P1</id></entry></feed>junk"#;
        assert!(matches!(parse_feed(xml), Err(Error::MalformedSource(_))));
    }

    #[test]
    fn test_trailing_whitespace_is_accepted() {
        let xml = "<feed xmlns='http://www.w3.org/2005/Atom'><entry><id>P1</id></entry></feed>\n\n";
        assert_eq!(parse_feed(xml).unwrap().len(), 1);
    }

    #[test]
    fn test_xhtml_content_keeps_text_only() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
<entry><id>P1</id><content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml">Hi <b>there</b></div></content></entry></feed>"#;
        let doc = parse_feed(xml).unwrap();
        assert_eq!(doc.entries[0].content.as_deref(), Some("Hi there"));
    }
}
