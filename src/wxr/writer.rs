use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::models::{Item, OutputDocument, WxrAuthor, WxrComment};

const RSS_NAMESPACES: [(&str, &str); 5] = [
    ("version", "2.0"),
    ("xmlns:excerpt", "http://wordpress.org/export/1.2/excerpt/"),
    ("xmlns:content", "http://purl.org/rss/1.0/modules/content/"),
    ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
    ("xmlns:wp", "http://wordpress.org/export/1.2/"),
];

pub fn to_xml_string(document: &OutputDocument) -> Result<String> {
    let mut buf = Vec::new();
    write_document(document, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::Xml(e.to_string()))
}

pub fn write_file(document: &OutputDocument, path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut out = std::io::BufWriter::new(file);
    write_document(document, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Write the document as UTF-8 XML, declaration first.
pub fn write_document<W: Write>(document: &OutputDocument, out: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    emit(
        &mut writer,
        Event::Start(BytesStart::new("rss").with_attributes(RSS_NAMESPACES)),
    )?;
    open(&mut writer, "channel")?;

    let channel = &document.channel;
    text_element(&mut writer, "wp:wxr_version", &channel.wxr_version)?;
    text_element(&mut writer, "title", &channel.title)?;
    text_element(&mut writer, "link", &channel.link)?;

    for author in &channel.authors {
        write_author(&mut writer, author)?;
    }
    for item in &channel.items {
        write_item(&mut writer, item)?;
    }

    close(&mut writer, "channel")?;
    close(&mut writer, "rss")?;

    writer
        .into_inner()
        .write_all(b"\n")
        .map_err(Error::from)
}

fn write_author<W: Write>(writer: &mut Writer<W>, author: &WxrAuthor) -> Result<()> {
    open(writer, "wp:author")?;
    text_element(writer, "wp:author_id", author.id)?;
    text_element(writer, "wp:author_login", &author.login)?;
    text_element(writer, "wp:author_email", &author.email)?;
    text_element(writer, "wp:author_display_name", &author.display_name)?;
    text_element(writer, "wp:author_first_name", &author.first_name)?;
    text_element(writer, "wp:author_last_name", &author.last_name)?;
    close(writer, "wp:author")
}

fn write_item<W: Write>(writer: &mut Writer<W>, item: &Item) -> Result<()> {
    open(writer, "item")?;
    text_element(writer, "title", &item.title)?;
    text_element(writer, "wp:post_id", item.post_id)?;
    text_element(writer, "wp:post_date", &item.post_date)?;
    text_element(writer, "content:encoded", &item.content)?;
    text_element(writer, "wp:status", &item.status)?;
    text_element(writer, "wp:post_type", &item.post_type)?;

    for tag in &item.tags {
        let start = BytesStart::new("category").with_attributes([
            ("domain", tag.domain.as_str()),
            ("nicename", tag.nicename.as_str()),
        ]);
        emit(writer, Event::Start(start))?;
        emit(writer, Event::Text(BytesText::new(&tag.label)))?;
        close(writer, "category")?;
    }

    for comment in &item.comments {
        write_comment(writer, comment)?;
    }

    close(writer, "item")
}

fn write_comment<W: Write>(writer: &mut Writer<W>, comment: &WxrComment) -> Result<()> {
    open(writer, "wp:comment")?;
    text_element(writer, "wp:comment_id", comment.id)?;
    text_element(writer, "wp:comment_post_ID", comment.post_id)?;
    text_element(writer, "wp:comment_author", &comment.author)?;
    text_element(writer, "wp:comment_author_email", &comment.author_email)?;
    text_element(writer, "wp:comment_content", &comment.content)?;
    text_element(writer, "wp:comment_date", &comment.date)?;
    text_element(
        writer,
        "wp:comment_approved",
        if comment.approved { "1" } else { "0" },
    )?;
    text_element(writer, "wp:comment_parent", comment.parent)?;
    close(writer, "wp:comment")
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, value: impl Display) -> Result<()> {
    let text = value.to_string();
    if text.is_empty() {
        return emit(writer, Event::Empty(BytesStart::new(name)));
    }
    open(writer, name)?;
    emit(writer, Event::Text(BytesText::new(&text)))?;
    close(writer, name)
}

fn open<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    emit(writer, Event::Start(BytesStart::new(name)))
}

fn close<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Xml(e.to_string()))
}
