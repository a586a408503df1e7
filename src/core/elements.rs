use regex::Regex;

/// Counts opening occurrences of `<tag ...>` in `text`.
///
/// Matching is a case-sensitive prefix match on the tag name that ignores nesting depth
/// and does not tell self-closing tags apart, so `quiz` also counts `<quizzes>`. The
/// count is an approximation for flat descriptors and may overcount deeper or
/// namespaced markup.
pub fn count_elements(text: &str, tag: &str) -> usize {
    opening_tag_pattern(tag)
        .map(|re| re.find_iter(text).count())
        .unwrap_or(0)
}

pub(crate) fn opening_tag_pattern(tag: &str) -> Option<Regex> {
    Regex::new(&format!("<{}[^>]*>", regex::escape(tag))).ok()
}

/// Reusable counter for a fixed set of tag names.
#[derive(Debug, Clone)]
pub struct ElementCounter {
    patterns: Vec<(String, Regex)>,
}

impl ElementCounter {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = tags
            .into_iter()
            .map(Into::into)
            .filter_map(|tag| opening_tag_pattern(&tag).map(|re| (tag, re)))
            .collect();
        Self { patterns }
    }

    pub fn count(&self, text: &str, tag: &str) -> usize {
        match self.patterns.iter().find(|(name, _)| name == tag) {
            Some((_, re)) => re.find_iter(text).count(),
            None => count_elements(text, tag),
        }
    }

    /// Sum of the counts of several tags.
    pub fn count_all(&self, text: &str, tags: &[&str]) -> usize {
        tags.iter().map(|tag| self.count(text, tag)).sum()
    }
}
