//! XML report.
//!
//! Layout:
//!
//! ```text
//! <project>
//!     <meta><title>..</title>..</meta>
//!     <structure>
//!         <root>
//!             <files><file name=".."/></files>
//!             <directories><directory name=".."/></directories>
//!         </root>
//!     </structure>
//!     <ansible_roles>
//!         <ansible_role name=".."><dependency name=".."/></ansible_role>
//!     </ansible_roles>
//! </project>
//! ```

use std::borrow::Cow;
use std::fmt::Display;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use super::{ReportContent, ReportMeta, ReportRenderer};
use crate::error::{Error, Result};

/// Element used for structure entries whose label is not a valid element name.
const FALLBACK_DIR_ELEMENT: &str = "dir";

/// XML renderer.
pub struct XmlRenderer;

impl ReportRenderer for XmlRenderer {
    fn render(&self, meta: &ReportMeta, content: &ReportContent<'_>) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        start(&mut writer, BytesStart::new("project"))?;

        start(&mut writer, BytesStart::new("meta"))?;
        for (key, value) in meta.entries() {
            start(&mut writer, BytesStart::new(key))?;
            write(&mut writer, Event::Text(BytesText::from_escaped(escape_text(value))))?;
            end(&mut writer, key)?;
        }
        end(&mut writer, "meta")?;

        start(&mut writer, BytesStart::new("structure"))?;
        for (label, entry) in content.tree.iter() {
            let element = if is_xml_name(label) {
                BytesStart::new(label)
            } else {
                named(FALLBACK_DIR_ELEMENT, label)
            };
            let element_name = if is_xml_name(label) { label } else { FALLBACK_DIR_ELEMENT };

            start(&mut writer, element)?;
            named_list(&mut writer, "files", "file", &entry.files)?;
            named_list(&mut writer, "directories", "directory", &entry.subdirectories)?;
            end(&mut writer, element_name)?;
        }
        end(&mut writer, "structure")?;

        start(&mut writer, BytesStart::new("ansible_roles"))?;
        for (role, deps) in content.graph.iter() {
            let element = named("ansible_role", role);
            if deps.is_empty() {
                write(&mut writer, Event::Empty(element))?;
                continue;
            }
            start(&mut writer, element)?;
            for dep in deps {
                empty_named(&mut writer, "dependency", dep)?;
            }
            end(&mut writer, "ansible_role")?;
        }
        end(&mut writer, "ansible_roles")?;

        end(&mut writer, "project")?;

        String::from_utf8(writer.into_inner()).map_err(xml_error)
    }
}

/// Writes `<outer>` holding one `<inner name=".."/>` per name.
fn named_list(writer: &mut Writer<Vec<u8>>, outer: &str, inner: &str, names: &[String]) -> Result<()> {
    if names.is_empty() {
        return write(writer, Event::Empty(BytesStart::new(outer)));
    }
    start(writer, BytesStart::new(outer))?;
    for name in names {
        empty_named(writer, inner, name)?;
    }
    end(writer, outer)
}

fn empty_named(writer: &mut Writer<Vec<u8>>, element: &str, name: &str) -> Result<()> {
    write(writer, Event::Empty(named(element, name)))
}

/// Start tag `<element name="..">` with the name escaped by [`escape_attribute`].
fn named<'a>(element: &'a str, name: &str) -> BytesStart<'a> {
    let mut start = BytesStart::new(element);
    start.push_attribute(Attribute {
        key: QName(b"name"),
        value: Cow::Owned(escape_attribute(name).into_bytes()),
    });
    start
}

/// Replaces characters XML 1.0 does not allow with U+FFFD.
fn xml_chars(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_xml_char) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(
            value
                .chars()
                .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
                .collect(),
        )
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

/// Escapes element text. Carriage returns become `&#13;` so parsers do not
/// normalize them away.
fn escape_text(value: &str) -> String {
    let safe = xml_chars(value);
    escape(safe.as_ref()).replace('\r', "&#13;")
}

/// Escapes an attribute value. Tabs and line breaks become character
/// references so attribute normalization leaves them intact.
fn escape_attribute(value: &str) -> String {
    let safe = xml_chars(value);
    escape(safe.as_ref())
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
}

fn start(writer: &mut Writer<Vec<u8>>, element: BytesStart<'_>) -> Result<()> {
    write(writer, Event::Start(element))
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(xml_error)
}

fn xml_error(err: impl Display) -> Error {
    Error::Xml(err.to_string())
}

/// Returns true if `name` can be used as an element name as is.
///
/// Stricter than XML itself: ASCII letters, digits, `_`, `-` and `.`, starting
/// with a letter or `_`, and not starting with `xml` in any case.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');

    starts_well
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !name.to_ascii_lowercase().starts_with("xml")
}
