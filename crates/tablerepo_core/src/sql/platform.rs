//! SQL dialect details needed to render statements.
//!
//! # Responsibility
//! - Quote identifiers for the target engine.
//! - Emit bind placeholders in the engine's style.

/// Bind placeholder style of a SQL engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaceholderStyle {
    /// Positional `?` markers (SQLite, MySQL).
    Question,
    /// Numbered `$1`, `$2`, ... markers (PostgreSQL).
    Numbered,
}

/// Rendering rules for one SQL engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    name: &'static str,
    quote: char,
    placeholder: PlaceholderStyle,
}

impl Platform {
    pub const fn sqlite() -> Self {
        Self {
            name: "sqlite",
            quote: '"',
            placeholder: PlaceholderStyle::Question,
        }
    }

    pub const fn mysql() -> Self {
        Self {
            name: "mysql",
            quote: '`',
            placeholder: PlaceholderStyle::Question,
        }
    }

    pub const fn postgres() -> Self {
        Self {
            name: "postgresql",
            quote: '"',
            placeholder: PlaceholderStyle::Numbered,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Quotes one identifier, doubling any embedded quote character.
    pub fn quote_identifier(&self, identifier: &str) -> String {
        let escaped = identifier.replace(self.quote, &format!("{0}{0}", self.quote));
        format!("{0}{1}{0}", self.quote, escaped)
    }

    /// Quotes a dotted identifier chain such as `schema.table` or `t.col`.
    ///
    /// A bare `*` segment is kept unquoted so `t.*` stays a wildcard.
    pub fn quote_identifier_chain(&self, chain: &str) -> String {
        chain
            .split('.')
            .map(|segment| {
                if segment == "*" {
                    segment.to_string()
                } else {
                    self.quote_identifier(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// LIMIT value meaning "no limit", for engines that need one before OFFSET.
    pub fn unbounded_limit(&self) -> Option<&'static str> {
        match self.name {
            "sqlite" => Some("-1"),
            "mysql" => Some("18446744073709551615"),
            _ => None,
        }
    }

    /// Returns the placeholder for the bind parameter at 1-based `position`.
    pub fn placeholder(&self, position: usize) -> String {
        match self.placeholder {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Numbered => format!("${position}"),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::sqlite()
    }
}

#[cfg(test)]
mod tests {
    use super::Platform;

    #[test]
    fn quotes_identifiers_per_engine() {
        assert_eq!(Platform::sqlite().quote_identifier("users"), "\"users\"");
        assert_eq!(Platform::mysql().quote_identifier("users"), "`users`");
    }

    #[test]
    fn escapes_embedded_quote_characters() {
        assert_eq!(Platform::sqlite().quote_identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(Platform::mysql().quote_identifier("a`b"), "`a``b`");
    }

    #[test]
    fn quotes_chains_but_keeps_wildcard_segment() {
        let platform = Platform::sqlite();
        assert_eq!(platform.quote_identifier_chain("u.name"), "\"u\".\"name\"");
        assert_eq!(platform.quote_identifier_chain("u.*"), "\"u\".*");
    }

    #[test]
    fn numbered_placeholders_follow_position() {
        assert_eq!(Platform::postgres().placeholder(3), "$3");
        assert_eq!(Platform::sqlite().placeholder(3), "?");
    }
}
