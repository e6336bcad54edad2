//! Groups reader events into the document header and its stanzas.
use crate::error::Result;
use crate::parser::LineListener;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagValue {
    tag: String,
    value: String,
}

impl TagValue {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
    pub fn tag(&self) -> &str {
        &self.tag
    }
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A `[Name]` block and the tag-value pairs that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    name: String,
    line: usize,
    tag_values: Vec<TagValue>,
}

impl Stanza {
    pub fn new(name: impl Into<String>, line: usize, tag_values: Vec<TagValue>) -> Self {
        Self {
            name: name.into(),
            line,
            tag_values,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Line of the stanza header.
    pub fn line(&self) -> usize {
        self.line
    }
    pub fn tag_values(&self) -> &[TagValue] {
        &self.tag_values
    }
    /// Every value given for `tag`, in document order.
    pub fn values<'a>(&'a self, tag: &str) -> impl Iterator<Item = &'a str> {
        self.tag_values
            .iter()
            .filter(move |tv| tv.tag == tag)
            .map(|tv| tv.value.as_str())
    }
    /// The last value given for `tag`.
    pub fn value(&self, tag: &str) -> Option<&str> {
        self.values(tag).last()
    }
}

/// Receives the output of a [`StanzaCollector`].
pub trait StanzaListener {
    fn on_header(&mut self, header: &[TagValue]) -> Result<()>;
    fn on_stanza(&mut self, stanza: &Stanza) -> Result<()>;
    fn on_end(&mut self) -> Result<()> {
        Ok(())
    }
}

// The header is whatever precedes the first stanza, and a stanza is only
// complete once the next one starts or the document ends.
pub struct StanzaCollector<L> {
    listener: L,
    current: Option<(String, usize)>,
    tag_values: Vec<TagValue>,
}

impl<L: StanzaListener> StanzaCollector<L> {
    pub fn new(listener: L) -> Self {
        Self {
            listener,
            current: None,
            tag_values: Vec::new(),
        }
    }
    pub fn listener(&self) -> &L {
        &self.listener
    }
    pub fn into_listener(self) -> L {
        self.listener
    }

    fn flush(&mut self, next: Option<(String, usize)>) -> Result<()> {
        let tag_values = std::mem::take(&mut self.tag_values);
        match std::mem::replace(&mut self.current, next) {
            None => self.listener.on_header(&tag_values),
            Some((name, line)) => self.listener.on_stanza(&Stanza::new(name, line, tag_values)),
        }
    }
}

impl<L: StanzaListener> LineListener for StanzaCollector<L> {
    fn on_stanza(&mut self, name: &str, line: usize) -> Result<()> {
        self.flush(Some((name.to_owned(), line)))
    }
    fn on_tag_value(&mut self, tag: &str, value: &str, _line: usize) -> Result<()> {
        self.tag_values.push(TagValue::new(tag, value));
        Ok(())
    }
    fn on_end(&mut self) -> Result<()> {
        self.flush(None)?;
        self.listener.on_end()
    }
}
