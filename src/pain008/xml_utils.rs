use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use crate::core::IncassoError;

pub type XmlResult = Result<String, IncassoError>;

/// Indent step of the generated document.
const INDENT: usize = 2;

/// Streaming pain.008 writer: UTF-8 declaration first, two-space indent,
/// text and attribute values escaped by quick-xml.
///
/// Text is escaped, not filtered. Characters XML 1.0 forbids (C0 controls
/// other than tab and newlines) are written as given.
pub struct XmlWriter {
    inner: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, IncassoError> {
        let mut this = Self {
            inner: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', INDENT),
        };
        this.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(this)
    }

    fn emit(&mut self, event: Event<'_>) -> Result<&mut Self, IncassoError> {
        self.inner
            .write_event(event)
            .map_err(|e| IncassoError::Xml(format!("XML write error: {e}")))?;
        Ok(self)
    }

    fn tag<'n>(name: &'n str, attrs: &[(&str, &str)]) -> BytesStart<'n> {
        let mut tag = BytesStart::new(name);
        tag.extend_attributes(attrs.iter().copied());
        tag
    }

    pub fn into_string(self) -> XmlResult {
        String::from_utf8(self.inner.into_inner().into_inner())
            .map_err(|e| IncassoError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, IncassoError> {
        self.start_element_with_attrs(name, &[])
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, IncassoError> {
        self.emit(Event::Start(Self::tag(name, attrs)))
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, IncassoError> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    /// Write `<name/>`.
    pub fn empty_element(&mut self, name: &str) -> Result<&mut Self, IncassoError> {
        self.emit(Event::Empty(Self::tag(name, &[])))
    }

    /// `<name>text</name>` on a single line.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, IncassoError> {
        self.text_element_with_attrs(name, text, &[])
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, IncassoError> {
        self.start_element_with_attrs(name, attrs)?
            .emit(Event::Text(BytesText::new(text)))?
            .end_element(name)
    }

    /// Write a formatted amount with its `Ccy` attribute.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: &str,
        currency: &str,
    ) -> Result<&mut Self, IncassoError> {
        self.text_element_with_attrs(name, amount, &[("Ccy", currency)])
    }
}
