/// Split a document body (frontmatter already removed) into raw slide texts.
///
/// A slide ends at:
/// 1. a `---` line with blank lines on both sides
/// 2. three or more consecutive blank lines
/// 3. a `# ` heading when the slide already has content
///
/// Nothing inside a fenced code block ever ends a slide.
pub fn split(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = body.split('\n').collect();

    let mut slides = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut fence: Option<Fence> = None;
    let mut blank_run = 0;

    for (i, line) in lines.iter().copied().enumerate() {
        let trimmed = line.trim();

        if let Some(open) = fence {
            if open.is_closed_by(trimmed) {
                fence = None;
            }
            current.push(line);
            blank_run = 0;
            continue;
        }

        if trimmed.is_empty() {
            blank_run += 1;
            match blank_run {
                1 | 2 => current.push(line),
                3 => flush(&mut current, &mut slides),
                _ => {}
            }
            continue;
        }
        blank_run = 0;

        if is_rule(trimmed) {
            let prev_blank = i == 0 || lines[i - 1].trim().is_empty();
            let next_blank = lines.get(i + 1).is_none_or(|l| l.trim().is_empty());
            if prev_blank && next_blank {
                flush(&mut current, &mut slides);
                continue;
            }
        }

        if line.starts_with("# ") && current.iter().any(|l| !l.trim().is_empty()) {
            flush(&mut current, &mut slides);
        }

        if let Some(open) = Fence::opened_by(trimmed) {
            fence = Some(open);
        }
        current.push(line);
    }
    flush(&mut current, &mut slides);

    slides
}

fn flush(current: &mut Vec<&str>, slides: &mut Vec<String>) {
    let text = current.join("\n").trim().to_string();
    if !text.is_empty() {
        slides.push(text);
    }
    current.clear();
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn opened_by(line: &str) -> Option<Self> {
        let marker = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = line.chars().take_while(|&c| c == marker).count();
        (len >= 3).then_some(Self { marker, len })
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let count = line.chars().take_while(|&c| c == self.marker).count();
        count >= self.len && line.chars().skip(count).all(char::is_whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_split() {
        let slides = split("Slide one\n\n\n\nSlide two");
        assert_eq!(slides, vec!["Slide one", "Slide two"]);
    }

    #[test]
    fn test_two_blank_lines_do_not_split() {
        let slides = split("Line one\n\n\nLine two");
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_dash_separator() {
        let slides = split("Slide one\n\n---\n\nSlide two");
        assert_eq!(slides, vec!["Slide one", "Slide two"]);
    }

    #[test]
    fn test_dash_without_blank_lines_is_content() {
        let slides = split("Heading\n---\nText");
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_heading_inference() {
        let slides = split("# First\n\nContent\n\n# Second\n\nMore content");
        assert_eq!(slides.len(), 2);
        assert!(slides[0].starts_with("# First"));
        assert!(slides[1].starts_with("# Second"));
    }

    #[test]
    fn test_h2_no_split() {
        assert_eq!(split("# Title\n\n## Subtitle\n\nContent").len(), 1);
    }

    #[test]
    fn test_combined_separators() {
        // Overlapping separators make a single break.
        assert_eq!(split("Slide one\n\n\n\n---\n\n\n\nSlide two").len(), 2);
    }

    #[test]
    fn test_code_fence_protects_content() {
        let body = "# Title\n\n```python\n# comment\n\n\n\nprint('hi')\n```\n\nAfter";
        assert_eq!(split(body).len(), 1);
    }

    #[test]
    fn test_crlf_input() {
        assert_eq!(split("One\r\n\r\n---\r\n\r\nTwo").len(), 2);
    }

    #[test]
    fn test_empty_body() {
        assert!(split("\n\n   \n").is_empty());
    }
}
