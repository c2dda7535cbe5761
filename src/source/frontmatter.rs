//! YAML front-matter at the top of a page.

use crate::error::ParseError;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;

/// Metadata keys we understand. Anything else in the block is ignored.
#[derive(Debug, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub order: Option<f64>,
    pub section: Option<String>,
}

#[derive(Default, Deserialize)]
struct RawFrontMatter {
    title: Option<String>,
    #[serde(alias = "sidebar_position", alias = "weight")]
    order: Option<Value>,
    section: Option<String>,
}

/// Result of looking for a front-matter block.
#[derive(Debug, PartialEq)]
pub enum Block<'a> {
    /// The file doesn't start with `---`
    Missing,
    /// An opening `---` without a closing one
    Unterminated,
    Found { yaml: &'a str, body: &'a str },
}

/// Separate a leading `---` delimited block from the markdown that follows it.
pub fn split(content: &str) -> Block<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    let opening = match lines.next() {
        Some(line) if line.trim_end() == "---" => line,
        _ => return Block::Missing,
    };

    let yaml_start = opening.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Block::Found {
                yaml: &content[yaml_start..offset],
                body: &content[offset + line.len()..],
            };
        }
        offset += line.len();
    }

    Block::Unterminated
}

/// Deserialize a front-matter block, requiring a title.
pub fn parse(path: &Path, yaml: &str) -> Result<FrontMatter, ParseError> {
    let raw: RawFrontMatter = if yaml.trim().is_empty() {
        RawFrontMatter::default()
    } else {
        serde_yaml::from_str(yaml).map_err(|source| ParseError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?
    };

    let front_matter = FrontMatter {
        order: raw.order.and_then(|value| ordering_key(path, &value)),
        title: raw.title,
        section: raw.section,
    };

    match &front_matter.title {
        Some(title) if !title.trim().is_empty() => Ok(front_matter),
        _ => Err(ParseError::MissingField {
            path: path.to_path_buf(),
            field: "title",
        }),
    }
}

/// Read an ordering key written as a number or a numeric string. Keys of any
/// other shape are ignored with a warning.
fn ordering_key(path: &Path, value: &Value) -> Option<f64> {
    let key = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match key {
        Some(key) if key.is_finite() => Some(key),
        _ => {
            log::warn!(
                "Ignoring ordering key {value:?} in {}: it isn't a number",
                path.display()
            );
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_block_from_body() {
        let content = "---\ntitle: Values\norder: 2\n---\n# Our values\n";
        assert_eq!(
            split(content),
            Block::Found {
                yaml: "title: Values\norder: 2\n",
                body: "# Our values\n",
            }
        );
    }

    #[test]
    fn ignores_leading_byte_order_mark() {
        let content = "\u{feff}---\ntitle: Values\n---\nbody";
        assert!(matches!(split(content), Block::Found { body: "body", .. }));
    }

    #[test]
    fn detects_missing_and_unterminated_blocks() {
        assert_eq!(split("# Just markdown\n"), Block::Missing);
        assert_eq!(split("---\ntitle: Values\n"), Block::Unterminated);
        // a horizontal rule later in the file isn't front-matter
        assert_eq!(split("intro\n---\nmore\n"), Block::Missing);
    }

    #[test]
    fn parses_known_keys_and_aliases() {
        let fm = parse(
            Path::new("a.md"),
            "title: Hiring\nsidebar_position: 4\nsection: People\nauthor: ignored\n",
        )
        .expect("can parse");
        assert_eq!(
            fm,
            FrontMatter {
                title: Some("Hiring".to_string()),
                order: Some(4.0),
                section: Some("People".to_string()),
            }
        );
    }

    #[test]
    fn ordering_keys_accept_floats_and_numeric_strings() {
        let fm = parse(Path::new("a.md"), "title: A\nsidebar_position: 1.5\n").expect("can parse");
        assert_eq!(fm.order, Some(1.5));

        let fm = parse(Path::new("a.md"), "title: A\norder: \"3\"\n").expect("can parse");
        assert_eq!(fm.order, Some(3.0));

        let fm = parse(Path::new("a.md"), "title: A\nweight: -2\n").expect("can parse");
        assert_eq!(fm.order, Some(-2.0));
    }

    #[test]
    fn unusable_ordering_keys_are_ignored() {
        for yaml in [
            "title: A\norder: first\n",
            "title: A\norder: [1, 2]\n",
            "title: A\norder: .nan\n",
            "title: A\norder:\n",
        ] {
            let fm = parse(Path::new("a.md"), yaml).expect("can parse");
            assert_eq!(fm.order, None, "{yaml}");
            assert_eq!(fm.title.as_deref(), Some("A"));
        }
    }

    #[test]
    fn requires_a_title() {
        let err = parse(Path::new("a.md"), "order: 1\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingField { field: "title", .. }));

        let err = parse(Path::new("a.md"), "").unwrap_err();
        assert!(matches!(err, ParseError::MissingField { .. }));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = parse(Path::new("a.md"), "title: [unclosed\n").unwrap_err();
        assert!(matches!(err, ParseError::FrontMatter { .. }));
    }
}
