//! Frontmatter splitting and header parsing for agent documents.
//!
//! The header dialect is a small subset of YAML: unindented `key: value`
//! lines, where a value of exactly `|` opens an indented block. Anything the
//! parser does not recognize is dropped rather than reported.

/// The marker line that opens and closes a header block.
pub const MARKER: &str = "---";

/// A document split into its header block and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document<'a> {
    /// Raw text between the marker lines, if both were found.
    pub(crate) header: Option<&'a str>,
    /// Text following the closing marker line, or the whole input.
    pub(crate) body: &'a str,
}

/// Parsed header fields. Only `name`, `description` and `tools` carry meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// The `name` field.
    pub name: Option<String>,
    /// The `description` field, possibly multi-line.
    pub description: Option<String>,
    /// The comma-separated `tools` field.
    pub tools: Option<String>,
    /// Every other field, in discovery order. Never written back out.
    pub other: Vec<(String, String)>,
}

impl Header {
    /// Whether no field at all was recognized.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.tools.is_none()
            && self.other.is_empty()
    }

    /// Store a finalized field; a repeated key replaces the earlier value.
    ///
    /// Fields with an empty key are never stored.
    fn insert(&mut self, key: String, value: String) {
        match key.as_str() {
            "" => {}
            "name" => self.name = Some(value),
            "description" => self.description = Some(value),
            "tools" => self.tools = Some(value),
            _ => {
                if let Some(slot) = self.other.iter_mut().find(|(existing, _)| *existing == key) {
                    slot.1 = value;
                } else {
                    self.other.push((key, value));
                }
            }
        }
    }
}

/// Split a document at its header markers.
///
/// The first line must be exactly the marker. Without a later closing marker
/// line the whole input is treated as body.
pub fn split_document(contents: &str) -> Document<'_> {
    let headerless = Document {
        header: None,
        body: contents,
    };

    let mut lines = contents.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return headerless;
    };
    if trim_line_endings(first) != MARKER {
        return headerless;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if trim_line_endings(line) == MARKER {
            return Document {
                header: Some(&contents[start..offset]),
                body: &contents[offset + line.len()..],
            };
        }
        offset += line.len();
    }

    headerless
}

/// Parse the header of a document, returning it with the body.
///
/// A headerless document yields an empty [`Header`] and the full input.
pub fn parse_document(contents: &str) -> (Header, &str) {
    let document = split_document(contents);
    let header = document.header.map(parse_header).unwrap_or_default();
    (header, document.body)
}

/// How a single header line is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    /// An unindented `key: value` line.
    Field {
        /// Trimmed text before the first colon.
        key: &'a str,
        /// Trimmed text after the first colon.
        value: &'a str,
    },
    /// An indented or blank line inside a block value.
    Continuation(&'a str),
    /// Anything else.
    Discard,
}

/// Parser state while walking header lines.
#[derive(Debug)]
enum State {
    /// No field has been opened yet.
    Scanning,
    /// A scalar field is open; further non-field lines are dropped.
    Scalar {
        /// Field name.
        key: String,
        /// Seed value from the field line.
        value: String,
    },
    /// A `|` block field is open and collecting lines.
    Block {
        /// Field name.
        key: String,
        /// Collected lines, indentation stripped.
        lines: Vec<String>,
    },
}

impl State {
    /// Whether indented continuation lines are accepted.
    fn in_block(&self) -> bool {
        matches!(self, Self::Block { .. })
    }

    /// Close the open field, if any, into the header.
    fn finish(self, header: &mut Header) {
        match self {
            Self::Scanning => {}
            Self::Scalar { key, value } => header.insert(key, value.trim().to_string()),
            Self::Block { key, lines } => header.insert(key, lines.join("\n").trim().to_string()),
        }
    }
}

/// Parse the raw text between the header markers.
pub fn parse_header(block: &str) -> Header {
    let mut header = Header::default();
    let mut state = State::Scanning;

    for line in block.lines() {
        match classify(line, state.in_block()) {
            LineKind::Field { key, value } => {
                state.finish(&mut header);
                state = if value == "|" {
                    State::Block {
                        key: key.to_string(),
                        lines: Vec::new(),
                    }
                } else {
                    State::Scalar {
                        key: key.to_string(),
                        value: value.to_string(),
                    }
                };
            }
            LineKind::Continuation(text) => {
                if let State::Block { lines, .. } = &mut state {
                    lines.push(text.to_string());
                }
            }
            LineKind::Discard => {}
        }
    }

    state.finish(&mut header);
    header
}

/// Decide how a header line is handled given whether a block is open.
fn classify(line: &str, in_block: bool) -> LineKind<'_> {
    let indented = line.starts_with([' ', '\t']);
    if !indented && let Some((key, value)) = line.split_once(':') {
        return LineKind::Field {
            key: key.trim(),
            value: value.trim(),
        };
    }

    let blank = line.trim().is_empty();
    if in_block && (indented || blank) {
        let text = if blank { "" } else { line.trim_start() };
        return LineKind::Continuation(text);
    }

    LineKind::Discard
}

/// Trim CRLF and LF suffixes from a line fragment.
fn trim_line_endings(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
