//! Agent header conversion into the Codex layout.

use crate::frontmatter::{Header, MARKER, parse_document};

/// Indent used for block lines and list items.
const INDENT: &str = "  ";

/// Result of transcoding one agent document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcoded {
    /// The header was rewritten.
    Converted {
        /// Full output document.
        contents: String,
        /// Tools emitted under `allowed-tools`, if the source had a `tools` field.
        tools: Option<Vec<String>>,
        /// Names of fields dropped from the header.
        dropped: Vec<String>,
    },
    /// No header was found; the document should be copied unchanged.
    NoHeader,
}

/// Split a comma-separated tools value into trimmed, non-empty names.
pub fn parse_tools(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tool| !tool.is_empty())
        .map(str::to_string)
        .collect()
}

/// Transcode an agent document, or report that it has no header.
pub fn transcode(contents: &str) -> Transcoded {
    let (header, body) = parse_document(contents);
    if header.is_empty() {
        return Transcoded::NoHeader;
    }

    Transcoded::Converted {
        contents: render(&header, body),
        tools: header.tools.as_deref().map(parse_tools),
        dropped: header.other.iter().map(|(key, _)| key.clone()).collect(),
    }
}

/// Write a header and body in the Codex layout.
///
/// Field order is always `name`, `description`, `allowed-tools`; any other
/// field is omitted.
pub fn render(header: &Header, body: &str) -> String {
    let mut lines = vec![MARKER.to_string()];

    if let Some(name) = &header.name {
        lines.push(format!("name: {name}"));
    }

    if let Some(description) = &header.description {
        lines.push("description: |".to_string());
        lines.extend(description.split('\n').map(|line| format!("{INDENT}{line}")));
    }

    if let Some(tools) = &header.tools {
        lines.push("allowed-tools:".to_string());
        lines.extend(
            parse_tools(tools)
                .iter()
                .map(|tool| format!("{INDENT}- {tool}")),
        );
    }

    lines.push(MARKER.to_string());

    let mut output = lines.join("\n");
    output.push_str("\n\n");
    output.push_str(body);
    output
}

#[cfg(test)]
mod tests {
    use super::{Transcoded, parse_tools, transcode};

    fn converted(contents: &str) -> String {
        match transcode(contents) {
            Transcoded::Converted { contents, .. } => contents,
            Transcoded::NoHeader => panic!("expected a header"),
        }
    }

    #[test]
    fn parses_tools_robustly() {
        assert_eq!(parse_tools("a,  b ,, c,"), vec!["a", "b", "c"]);
        assert_eq!(parse_tools("Read, Read, Bash"), vec!["Read", "Read", "Bash"]);
        assert!(parse_tools("").is_empty());
        assert!(parse_tools(" , ,").is_empty());
    }

    #[test]
    fn converts_well_formed_agent() {
        let input = "---\nname: X\ndescription: |\n  A\n  B\ntools: a, b, c\n---\n# Body\n";
        assert_eq!(
            converted(input),
            "---\nname: X\ndescription: |\n  A\n  B\nallowed-tools:\n  - a\n  - b\n  - c\n---\n\n# Body\n"
        );
    }

    #[test]
    fn promotes_scalar_description_to_block() {
        let output = converted("---\ndescription: hello world\n---\n");
        assert!(output.contains("description: |\n  hello world\n"));
    }

    #[test]
    fn empty_key_header_falls_back_to_copy() {
        assert_eq!(transcode("---\n: orphan value\n---\nbody"), Transcoded::NoHeader);
    }

    #[test]
    fn drops_unknown_fields() {
        let input = "---\nname: X\nversion: 2\n---\nbody";
        match transcode(input) {
            Transcoded::Converted {
                contents, dropped, ..
            } => {
                assert!(!contents.contains("version"));
                assert_eq!(dropped, vec!["version"]);
            }
            Transcoded::NoHeader => panic!("expected a header"),
        }
    }

    #[test]
    fn emits_fixed_field_order() {
        let output = converted("---\ntools: a\nname: X\ndescription: hi\n---\n");
        assert_eq!(
            output,
            "---\nname: X\ndescription: |\n  hi\nallowed-tools:\n  - a\n---\n\n"
        );
    }

    #[test]
    fn empty_tools_still_emits_key() {
        let output = converted("---\nname: X\ntools: , ,\n---\n");
        assert_eq!(output, "---\nname: X\nallowed-tools:\n---\n\n");
    }

    #[test]
    fn omits_absent_fields() {
        let output = converted("---\nname: X\n---\nbody");
        assert_eq!(output, "---\nname: X\n---\n\nbody");
    }

    #[test]
    fn unclosed_header_is_not_converted() {
        assert_eq!(transcode("---\nname: X\nbody\n"), Transcoded::NoHeader);
    }

    #[test]
    fn header_without_fields_is_not_converted() {
        assert_eq!(transcode("---\nplain text\n---\nbody"), Transcoded::NoHeader);
        assert_eq!(transcode("no header at all"), Transcoded::NoHeader);
    }

    #[test]
    fn reports_converted_tools() {
        match transcode("---\nname: X\ntools: Read, Grep\n---\n") {
            Transcoded::Converted { tools, .. } => {
                assert_eq!(tools, Some(vec!["Read".to_string(), "Grep".to_string()]));
            }
            Transcoded::NoHeader => panic!("expected a header"),
        }
    }
}
