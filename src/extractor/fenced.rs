//! Fenced-block strategy: a Markdown code block tagged `json`.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening fence with the literal `json` tag, lazily matched content, then
/// the closing fence. `\b` keeps tags such as `jsonc` from matching.
static FENCED_JSON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```json\b(.*?)```").unwrap());

/// The first JSON-tagged fenced block in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Byte range of the whole block, fences included.
    pub block: Range<usize>,
    /// Trimmed text between the fences.
    pub content: &'a str,
}

/// Find the first ```` ```json ```` block. Later blocks are ignored.
pub fn find_fenced_json(text: &str) -> Option<FencedBlock<'_>> {
    let caps = FENCED_JSON.captures(text)?;
    let whole = caps.get(0)?;
    let inner = caps.get(1)?;
    Some(FencedBlock {
        block: whole.range(),
        content: inner.as_str().trim(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_block_and_content() {
        let text = "Intro\n```json\n{\"a\": 1}\n```\nOutro";
        let found = find_fenced_json(text).unwrap();
        assert_eq!(found.content, "{\"a\": 1}");
        assert_eq!(&text[found.block.clone()], "```json\n{\"a\": 1}\n```");
    }

    #[test]
    fn test_only_first_block_considered() {
        let text = "```json\n{\"n\": 1}\n```\nand\n```json\n{\"n\": 2}\n```";
        let found = find_fenced_json(text).unwrap();
        assert_eq!(found.content, "{\"n\": 1}");
        assert_eq!(found.block.start, 0);
    }

    #[test]
    fn test_untagged_and_other_tags_ignored() {
        assert!(find_fenced_json("```\n{\"a\": 1}\n```").is_none());
        assert!(find_fenced_json("```python\nprint(1)\n```").is_none());
        assert!(find_fenced_json("```jsonc\n{}\n```").is_none());
    }

    #[test]
    fn test_unclosed_fence_not_matched() {
        assert!(find_fenced_json("```json\n{\"a\": 1}").is_none());
    }

    #[test]
    fn test_tagged_block_found_after_other_block() {
        let text = "```sql\nSELECT 1\n```\n```json\n{}\n```";
        let found = find_fenced_json(text).unwrap();
        assert_eq!(found.content, "{}");
    }
}
