use serde::Deserialize;

/// Deck-level metadata from the optional YAML header.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeckMeta {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub author: Option<String>,
}

/// Split `---`-delimited YAML frontmatter from the body.
///
/// The header counts as frontmatter only when it is closed and holds a YAML
/// mapping. Anything else leaves the document untouched, so a deck may open
/// with a plain `---` slide separator.
pub fn extract(content: &str) -> Result<(DeckMeta, String), serde_yaml::Error> {
    let content = content.replace("\r\n", "\n");
    let content = content.trim_start_matches('\u{feff}');

    let mut lines = content.lines();
    if lines.next().map(str::trim) != Some("---") {
        return Ok((DeckMeta::default(), content.to_string()));
    }

    let rest: Vec<&str> = lines.collect();
    let Some(close) = rest.iter().position(|l| matches!(l.trim(), "---" | "...")) else {
        return Ok((DeckMeta::default(), content.to_string()));
    };

    let yaml = rest[..close].join("\n");
    let meta = if yaml.trim().is_empty() {
        DeckMeta::default()
    } else {
        match serde_yaml::from_str::<serde_yaml::Value>(&yaml) {
            Ok(value @ serde_yaml::Value::Mapping(_)) => serde_yaml::from_value(value)?,
            _ => return Ok((DeckMeta::default(), content.to_string())),
        }
    };
    let body = rest[close + 1..].join("\n");
    Ok((meta, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_title() {
        let (meta, body) = extract("---\ntitle: Demo\nauthor: Ada\n---\n# One").unwrap();
        assert_eq!(meta.title.as_deref(), Some("Demo"));
        assert_eq!(meta.author.as_deref(), Some("Ada"));
        assert_eq!(body, "# One");
    }

    #[test]
    fn test_no_frontmatter() {
        let (meta, body) = extract("# One\n\nText").unwrap();
        assert_eq!(meta, DeckMeta::default());
        assert_eq!(body, "# One\n\nText");
    }

    #[test]
    fn test_unclosed_header_is_body() {
        let (meta, body) = extract("---\n\n# One").unwrap();
        assert_eq!(meta, DeckMeta::default());
        assert!(body.contains("# One"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (meta, _) = extract("---\ntheme: dark\n---\nBody").unwrap();
        assert_eq!(meta.title, None);
    }

    #[test]
    fn test_mapping_with_wrong_types_is_error() {
        assert!(extract("---\ntitle: [1, 2]\n---\nBody").is_err());
    }

    #[test]
    fn test_leading_separator_is_not_frontmatter() {
        let content = "---\n\nSlide one\n\n---\n\nSlide two";
        let (meta, body) = extract(content).unwrap();
        assert_eq!(meta, DeckMeta::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unparsable_header_is_body() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        let (meta, body) = extract(content).unwrap();
        assert_eq!(meta, DeckMeta::default());
        assert_eq!(body, content);
    }
}
