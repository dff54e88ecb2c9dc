// Pattern Matching Utilities
// Glob-like matching of file names against exclude patterns

/// Check if a file name matches a pattern
///
/// Each `*` matches any run of characters, so `*.sw*` and `.*.swp` both work.
/// Patterns without a wildcard must match the whole name. Matching ignores case.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    let name = name.to_lowercase();
    let pattern = pattern.to_lowercase();

    let mut segments = pattern.split('*');
    // split always yields at least one segment
    let first = segments.next().unwrap_or_default();
    let rest: Vec<&str> = segments.collect();

    let Some((last, middle)) = rest.split_last() else {
        return name == pattern;
    };

    let Some(mut remaining) = name.strip_prefix(first) else {
        return false;
    };

    for segment in middle {
        match remaining.find(segment) {
            Some(index) => remaining = &remaining[index + segment.len()..],
            None => return false,
        }
    }

    remaining.ends_with(last)
}

/// Pattern matcher for hiding files from the picker
pub struct PatternMatcher {
    patterns: Vec<String>,
}

impl PatternMatcher {
    /// Create a new pattern matcher with the given patterns
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Check if a name should be excluded
    pub fn should_exclude(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| matches_pattern(name, p))
    }

    /// Keep only names that no pattern excludes, preserving order
    pub fn filter(&self, names: Vec<String>) -> Vec<String> {
        names
            .into_iter()
            .filter(|name| !self.should_exclude(name))
            .collect()
    }

    /// Get all patterns
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
