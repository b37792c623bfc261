use regex::Regex;

use crate::Result;

/// An anchored path matcher.
///
/// Patterns are regular expressions; `^` and `$` are added for you, so
/// `/person/\d+` matches exactly that path and nothing longer.
#[derive(Debug, Clone)]
pub struct RoutePath {
    matcher: Regex,
}

impl RoutePath {
    pub fn new(path: &str) -> Result<RoutePath> {
        let mut pattern = String::with_capacity(path.len() + 2);
        pattern.push('^');
        pattern.push_str(path);
        pattern.push('$');
        let matcher = Regex::new(&pattern)?;
        Ok(RoutePath { matcher })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        self.matcher.as_str()
    }
}
