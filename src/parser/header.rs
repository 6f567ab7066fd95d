//! Header block parsing: line folding and raw byte decoding.

/// Ordered header fields, one folded value per lower-cased name.
///
/// A repeated field name replaces the earlier value in place, so the order
/// is that of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    fields: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field, looked up case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a field, or `""` when absent.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Set a field, replacing any earlier value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    fn append_continuation(&mut self, name: &str, piece: &str) {
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| k == name) {
            slot.1.push(' ');
            slot.1.push_str(piece);
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse a header block into a [`HeaderMap`].
///
/// Continuation lines (leading space or tab) are joined to the most recently
/// seen field with a single space. Lines without a colon, lines with an empty
/// field name, and continuations before any field are dropped.
pub fn parse_headers(block: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let mut current: Option<String> = None;

    for line in block.lines() {
        if line.starts_with(char::is_whitespace) {
            if let Some(name) = current.as_deref() {
                headers.append_continuation(name, line.trim());
            }
        } else if let Some(colon_pos) = line.find(':') {
            let name = line[..colon_pos].trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            let value = line[colon_pos + 1..].trim();
            headers.insert(name.clone(), value);
            current = Some(name);
        }
    }

    headers
}

/// Decode raw message bytes to a string.
///
/// Tries UTF-8 first, then falls back to Windows-1252 (a superset of
/// ISO-8859-1 that accepts every byte).
pub fn decode_raw_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}
