/// Editable XML part.
///
/// The part is held as a flat list of owned quick-xml events. Elements are
/// addressed by the index of their start event; an empty element is its own
/// end. Writing the events back reproduces the original markup for
/// everything that was not edited.
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

/// An XML part as an editable event list.
#[derive(Debug, Clone)]
pub struct XmlPart {
    events: Vec<Event<'static>>,
}

impl XmlPart {
    /// Parse XML bytes, keeping whitespace as is.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut events = Vec::new();
        let mut buf = Vec::with_capacity(1024);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Eof) => break,
                Ok(event) => events.push(event.into_owned()),
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            }
            buf.clear();
        }

        Ok(Self { events })
    }

    /// Serialize the events back to XML.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::with_capacity(self.events.len() * 16));
        for event in &self.events {
            writer
                .write_event(event.borrow())
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        }
        Ok(writer.into_inner())
    }

    /// Number of events.
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the part has no events.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The event at `idx`.
    #[inline]
    pub fn event(&self, idx: usize) -> &Event<'static> {
        &self.events[idx]
    }

    /// The element opened at `idx`, if `idx` is a start or empty event.
    #[inline]
    pub fn element(&self, idx: usize) -> Option<&BytesStart<'static>> {
        match &self.events[idx] {
            Event::Start(e) | Event::Empty(e) => Some(e),
            _ => None,
        }
    }

    /// Local name of the element opened at `idx`.
    #[inline]
    pub fn local_name(&self, idx: usize) -> Option<&[u8]> {
        self.element(idx).map(|e| e.local_name().into_inner())
    }

    /// Whether `idx` is an empty element.
    #[inline]
    pub fn is_empty_element(&self, idx: usize) -> bool {
        matches!(self.events[idx], Event::Empty(_))
    }

    /// Index of the end event closing the element opened at `start`.
    pub fn matching_end(&self, start: usize) -> Result<usize> {
        match &self.events[start] {
            Event::Empty(_) => return Ok(start),
            Event::Start(_) => {},
            _ => {
                return Err(OoxmlError::InvalidFormat(format!(
                    "event {} does not open an element",
                    start
                )));
            },
        }

        let mut depth = 0usize;
        for (offset, event) in self.events[start..].iter().enumerate() {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(start + offset);
                    }
                },
                _ => {},
            }
        }

        Err(OoxmlError::InvalidFormat(format!(
            "element at event {} is never closed",
            start
        )))
    }

    /// Index of the start event of the element directly containing `idx`.
    pub fn enclosing(&self, idx: usize) -> Option<usize> {
        let mut depth = 0usize;
        for j in (0..idx).rev() {
            match &self.events[j] {
                Event::End(_) => depth += 1,
                Event::Start(_) if depth == 0 => return Some(j),
                Event::Start(_) => depth -= 1,
                _ => {},
            }
        }
        None
    }

    /// `(start, end)` of every direct child element of the element opened at
    /// `parent`.
    pub fn children(&self, parent: usize) -> Result<Vec<(usize, usize)>> {
        let end = self.matching_end(parent)?;
        let mut children = Vec::new();
        let mut j = parent + 1;
        while j < end {
            match &self.events[j] {
                Event::Start(_) | Event::Empty(_) => {
                    let child_end = self.matching_end(j)?;
                    children.push((j, child_end));
                    j = child_end + 1;
                },
                _ => j += 1,
            }
        }
        Ok(children)
    }

    /// First direct child of `parent` with the given local name.
    pub fn child(&self, parent: usize, local: &[u8]) -> Result<Option<(usize, usize)>> {
        Ok(self
            .children(parent)?
            .into_iter()
            .find(|&(s, _)| self.local_name(s) == Some(local)))
    }

    /// Index of the first element with the given local name.
    pub fn find(&self, local: &[u8]) -> Option<usize> {
        (0..self.events.len()).find(|&i| self.local_name(i) == Some(local))
    }

    /// Start indices of every element with the given local name inside the
    /// element opened at `parent`, at any depth.
    pub fn descendants(&self, parent: usize, local: &[u8]) -> Result<Vec<usize>> {
        let end = self.matching_end(parent)?;
        Ok((parent + 1..end)
            .filter(|&i| self.local_name(i) == Some(local))
            .collect())
    }

    /// Remove events `start..=end`.
    pub fn remove(&mut self, start: usize, end: usize) {
        self.events.drain(start..=end);
    }

    /// Insert events before `at`.
    pub fn insert(&mut self, at: usize, events: impl IntoIterator<Item = Event<'static>>) {
        self.events.splice(at..at, events);
    }

    /// Remove the tags of the element opened at `start`, keeping its content.
    pub fn unwrap_element(&mut self, start: usize) -> Result<()> {
        let end = self.matching_end(start)?;
        if end != start {
            self.events.remove(end);
        }
        self.events.remove(start);
        Ok(())
    }

    /// Rename the element opened at `start`, keeping its prefix and
    /// attributes.
    pub fn rename(&mut self, start: usize, local: &str) -> Result<()> {
        let end = self.matching_end(start)?;
        let Some(old) = self.element(start) else {
            return Ok(());
        };
        let name = qualified(old, local);

        let mut renamed = BytesStart::new(name.clone());
        renamed.extend_attributes(old.attributes().flatten());
        let renamed = renamed.into_owned();

        if end == start {
            self.events[start] = Event::Empty(renamed);
        } else {
            self.events[start] = Event::Start(renamed);
            self.events[end] = Event::End(BytesEnd::new(name));
        }
        Ok(())
    }

    /// Turn the empty element at `start` into a start/end pair so children
    /// can be inserted. Returns the index of the end event.
    pub fn expand(&mut self, start: usize) -> Result<usize> {
        let Event::Empty(e) = &self.events[start] else {
            return self.matching_end(start);
        };
        let element = e.clone();
        let end = BytesEnd::new(String::from_utf8_lossy(element.name().as_ref()).into_owned());
        self.events[start] = Event::Start(element);
        self.events.insert(start + 1, Event::End(end));
        Ok(start + 1)
    }

    /// Concatenated character data of `w:t`-style elements between `start`
    /// and `end`, for the given text element local names.
    pub fn text_between(&self, start: usize, end: usize, text_elements: &[&[u8]]) -> String {
        self.collect_text(start, end, text_elements, None)
    }

    /// Character data of the whole part, with a line break after every
    /// element named `line_element`.
    pub fn text_lines(&self, line_element: &[u8], text_elements: &[&[u8]]) -> String {
        if self.events.is_empty() {
            return String::new();
        }
        self.collect_text(0, self.events.len() - 1, text_elements, Some(line_element))
    }

    fn collect_text(
        &self,
        start: usize,
        end: usize,
        text_elements: &[&[u8]],
        line_element: Option<&[u8]>,
    ) -> String {
        let mut text = String::new();
        let mut depth_in_text = 0usize;
        if self.events.is_empty() {
            return text;
        }

        for i in start..=end.min(self.events.len().saturating_sub(1)) {
            match &self.events[i] {
                Event::Start(e) => {
                    if depth_in_text > 0 || text_elements.contains(&e.local_name().as_ref()) {
                        depth_in_text += 1;
                    }
                },
                Event::End(_) if depth_in_text > 0 => depth_in_text -= 1,
                Event::End(e) if line_element == Some(e.local_name().as_ref()) => text.push('\n'),
                Event::Empty(e) if depth_in_text == 0 => match e.local_name().as_ref() {
                    b"tab" => text.push('\t'),
                    b"br" | b"cr" => text.push('\n'),
                    _ => {},
                },
                Event::Text(t) if depth_in_text > 0 => {
                    if let Ok(s) = std::str::from_utf8(t) {
                        text.push_str(s);
                    }
                },
                Event::CData(t) if depth_in_text > 0 => {
                    if let Ok(s) = std::str::from_utf8(t) {
                        text.push_str(s);
                    }
                },
                Event::GeneralRef(r) if depth_in_text > 0 => {
                    if let Ok(Some(c)) = r.resolve_char_ref() {
                        text.push(c);
                    } else {
                        match &**r {
                            b"amp" => text.push('&'),
                            b"lt" => text.push('<'),
                            b"gt" => text.push('>'),
                            b"quot" => text.push('"'),
                            b"apos" => text.push('\''),
                            _ => {},
                        }
                    }
                },
                _ => {},
            }
        }

        text
    }
}

/// Qualified name for `local` using the prefix of `like`.
pub(crate) fn qualified(like: &BytesStart<'_>, local: &str) -> String {
    match like.name().prefix() {
        Some(prefix) => format!("{}:{}", String::from_utf8_lossy(prefix.as_ref()), local),
        None => local.to_string(),
    }
}

/// Start and end events of `<prefix:local></prefix:local>` using the prefix
/// of `like`.
pub(crate) fn element_pair(like: &BytesStart<'_>, local: &str) -> [Event<'static>; 2] {
    let name = qualified(like, local);
    [
        Event::Start(BytesStart::new(name.clone())),
        Event::End(BytesEnd::new(name)),
    ]
}

/// Empty element `<prefix:local attr="value"/>` using the prefix of `like`.
pub(crate) fn empty_element(like: &BytesStart<'_>, local: &str, attrs: &[(&str, &str)]) -> Event<'static> {
    let prefix = like
        .name()
        .prefix()
        .map(|p| format!("{}:", String::from_utf8_lossy(p.as_ref())));
    let mut element = BytesStart::new(qualified(like, local));
    for (key, value) in attrs {
        let key = match &prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => (*key).to_string(),
        };
        element.push_attribute((key.as_str(), *value));
    }
    Event::Empty(element.into_owned())
}
