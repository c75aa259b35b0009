//! Include expression parsing
//!
//! Clients ask for related resources with a comma separated expression such as
//! `?include=author,comments:limit(5),author.profile`. Each segment names a
//! relation; anything after the first `:` is a modifier the core does not
//! interpret and is dropped. Dots separate nesting levels.

use serde::Serialize;

/// Default maximum nesting depth for include paths
pub const DEFAULT_RECURSION_LIMIT: usize = 10;

/// An ordered list of requested relation paths
///
/// Order is first-seen and duplicates are kept, so the list mirrors what the
/// client sent. Empty input gives an empty list, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Includes(Vec<String>);

impl Includes {
    /// Parse a raw include expression
    ///
    /// # Examples
    ///
    /// ```
    /// use skeleton::core::includes::Includes;
    ///
    /// let includes = Includes::parse("a,b:x(1),,c");
    /// assert_eq!(includes.as_slice(), ["a", "b", "c"]);
    /// ```
    pub fn parse(expression: &str) -> Self {
        let names = expression
            .split(',')
            .map(|segment| match segment.split_once(':') {
                Some((name, _modifier)) => name,
                None => segment,
            })
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        Self(names)
    }

    /// Parse an optional expression, treating `None` as empty
    pub fn parse_opt(expression: Option<&str>) -> Self {
        expression.map(Self::parse).unwrap_or_default()
    }

    /// Build from already split relation names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Truncate every path to at most `limit` levels
    ///
    /// `a.b.c` with a limit of 2 becomes `a.b`. A limit of 0 drops everything.
    pub fn with_recursion_limit(self, limit: usize) -> Self {
        let names = self
            .0
            .into_iter()
            .filter_map(|path| {
                let kept: Vec<&str> = path.split('.').take(limit).collect();
                if kept.is_empty() || kept.iter().any(|s| s.is_empty()) {
                    None
                } else {
                    Some(kept.join("."))
                }
            })
            .collect();

        Self(names)
    }

    /// Camel-case every segment of every path (`author_profile` → `authorProfile`)
    pub fn camel_cased(self) -> Self {
        let names = self
            .0
            .iter()
            .map(|path| {
                path.split('.')
                    .map(camel_case)
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect();

        Self(names)
    }

    /// Relation names requested at this level (first segment of every path)
    ///
    /// Deduplicated, first-seen order.
    pub fn top_level(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for path in &self.0 {
            let head = path.split('.').next().unwrap_or(path);
            if !names.contains(&head) {
                names.push(head);
            }
        }
        names
    }

    /// Paths requested below `relation`, with the `relation.` prefix removed
    pub fn children(&self, relation: &str) -> Includes {
        let names = self
            .0
            .iter()
            .filter_map(|path| path.split_once('.'))
            .filter(|(head, _)| *head == relation)
            .map(|(_, tail)| tail.to_string())
            .collect();

        Self(names)
    }

    /// Whether `relation` was requested at this level
    pub fn requests(&self, relation: &str) -> bool {
        self.top_level().contains(&relation)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a Includes {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Convert `snake_case` or `kebab-case` to `camelCase`
pub fn camel_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut upper_next = false;

    for ch in value.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else if out.is_empty() {
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_modifiers_and_empty_segments() {
        let includes = Includes::parse("a,b:x(1),,c");
        assert_eq!(includes.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(Includes::parse("").is_empty());
        assert!(Includes::parse(",,,").is_empty());
        assert!(Includes::parse_opt(None).is_empty());
    }

    #[test]
    fn test_parse_keeps_duplicates_in_order() {
        let includes = Includes::parse("comments,author,comments");
        assert_eq!(includes.as_slice(), ["comments", "author", "comments"]);
    }

    #[test]
    fn test_parse_only_first_colon_matters() {
        let includes = Includes::parse("comments:limit(5):order(id|desc)");
        assert_eq!(includes.as_slice(), ["comments"]);
    }

    #[test]
    fn test_parse_drops_modifier_only_segment() {
        let includes = Includes::parse(":limit(5),author");
        assert_eq!(includes.as_slice(), ["author"]);
    }

    #[test]
    fn test_top_level_and_children() {
        let includes = Includes::parse("author.profile,comments,author.posts.tags");
        assert_eq!(includes.top_level(), vec!["author", "comments"]);
        assert_eq!(
            includes.children("author").as_slice(),
            ["profile", "posts.tags"]
        );
        assert!(includes.children("comments").is_empty());
        assert!(includes.requests("author"));
        assert!(!includes.requests("profile"));
    }

    #[test]
    fn test_recursion_limit_truncates_paths() {
        let includes = Includes::parse("a.b.c.d,e").with_recursion_limit(2);
        assert_eq!(includes.as_slice(), ["a.b", "e"]);

        let none = Includes::parse("a,b").with_recursion_limit(0);
        assert!(none.is_empty());
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("author_profile"), "authorProfile");
        assert_eq!(camel_case("author-profile"), "authorProfile");
        assert_eq!(camel_case("author"), "author");
        assert_eq!(camel_case("_leading"), "leading");

        let includes = Includes::parse("blog_posts.post_tags").camel_cased();
        assert_eq!(includes.as_slice(), ["blogPosts.postTags"]);
    }
}
