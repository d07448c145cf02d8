use std::fmt;

/// Directives emitted by the site policy, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    DefaultSrc,
    ImgSrc,
    ScriptSrc,
    StyleSrc,
    ConnectSrc,
    FontSrc,
    WorkerSrc,
    ObjectSrc,
    BaseUri,
    FrameAncestors,
}

impl Directive {
    pub const ALL: [Directive; 10] = [
        Directive::DefaultSrc,
        Directive::ImgSrc,
        Directive::ScriptSrc,
        Directive::StyleSrc,
        Directive::ConnectSrc,
        Directive::FontSrc,
        Directive::WorkerSrc,
        Directive::ObjectSrc,
        Directive::BaseUri,
        Directive::FrameAncestors,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Directive::DefaultSrc => "default-src",
            Directive::ImgSrc => "img-src",
            Directive::ScriptSrc => "script-src",
            Directive::StyleSrc => "style-src",
            Directive::ConnectSrc => "connect-src",
            Directive::FontSrc => "font-src",
            Directive::WorkerSrc => "worker-src",
            Directive::ObjectSrc => "object-src",
            Directive::BaseUri => "base-uri",
            Directive::FrameAncestors => "frame-ancestors",
        }
    }

    fn baseline_tokens(self) -> &'static [&'static str] {
        match self {
            Directive::DefaultSrc => &["'self'"],
            Directive::ImgSrc => &["'self'", "https:", "data:"],
            Directive::ScriptSrc => &["'self'"],
            Directive::StyleSrc => &["'self'", "'unsafe-inline'"],
            Directive::ConnectSrc => &["'self'", "https:"],
            Directive::FontSrc => &["'self'", "data:"],
            Directive::WorkerSrc => &["'self'"],
            Directive::ObjectSrc => &["'none'"],
            Directive::BaseUri => &["'self'"],
            Directive::FrameAncestors => &["'none'"],
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered directive → source-expression mapping.
///
/// Directives keep insertion order and each token list is duplicate-free in
/// insertion order, so serialization is deterministic for a given input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveSet {
    entries: Vec<(Directive, Vec<String>)>,
}

impl DirectiveSet {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The fixed starting policy, before any conditional allowances.
    pub fn baseline() -> Self {
        let mut set = Self::empty();
        for directive in Directive::ALL {
            for token in directive.baseline_tokens() {
                set.add(directive, *token);
            }
        }
        set
    }

    /// Appends `token` to `directive`, creating the directive at the end if
    /// absent. Returns false when the token was already present.
    pub fn add(&mut self, directive: Directive, token: impl Into<String>) -> bool {
        let token = token.into();
        match self.entries.iter_mut().find(|(d, _)| *d == directive) {
            Some((_, tokens)) => {
                if tokens.contains(&token) {
                    return false;
                }
                tokens.push(token);
            }
            None => self.entries.push((directive, vec![token])),
        }
        true
    }

    pub fn extend<I, T>(&mut self, directive: Directive, tokens: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for token in tokens {
            self.add(directive, token);
        }
    }

    pub fn tokens(&self, directive: Directive) -> &[String] {
        self.entries
            .iter()
            .find(|(d, _)| *d == directive)
            .map(|(_, tokens)| tokens.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, directive: Directive, token: &str) -> bool {
        self.tokens(directive).iter().any(|t| t == token)
    }

    pub fn directives(&self) -> impl Iterator<Item = Directive> + '_ {
        self.entries.iter().map(|(d, _)| *d)
    }

    /// `"<name> <tok> <tok>; <name> <tok>; ..."`
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl Default for DirectiveSet {
    fn default() -> Self {
        Self::baseline()
    }
}

impl fmt::Display for DirectiveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (directive, tokens)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(directive.as_str())?;
            for token in tokens {
                write!(f, " {}", token)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_baseline_serialization() {
        assert_eq!(
            DirectiveSet::baseline().serialize(),
            "default-src 'self'; img-src 'self' https: data:; script-src 'self'; \
             style-src 'self' 'unsafe-inline'; connect-src 'self' https:; font-src 'self' data:; \
             worker-src 'self'; object-src 'none'; base-uri 'self'; frame-ancestors 'none'"
        );
    }

    #[test]
    fn test_add_is_duplicate_free() {
        let mut set = DirectiveSet::baseline();
        assert!(!set.add(Directive::ConnectSrc, "https:"));
        assert!(set.add(Directive::ConnectSrc, "https://api.example.com"));
        assert!(!set.add(Directive::ConnectSrc, "https://api.example.com"));
        assert_eq!(
            set.tokens(Directive::ConnectSrc),
            ["'self'", "https:", "https://api.example.com"]
        );
    }

    #[test]
    fn test_directive_order_is_insertion_order() {
        let mut set = DirectiveSet::empty();
        set.add(Directive::ObjectSrc, "'none'");
        set.add(Directive::DefaultSrc, "'self'");
        set.add(Directive::ObjectSrc, "'self'");

        let order: Vec<_> = set.directives().collect();
        assert_eq!(order, vec![Directive::ObjectSrc, Directive::DefaultSrc]);
        assert_eq!(set.serialize(), "object-src 'none' 'self'; default-src 'self'");
    }

    #[test]
    fn test_missing_directive_has_no_tokens() {
        let set = DirectiveSet::empty();
        assert!(set.tokens(Directive::ScriptSrc).is_empty());
        assert!(!set.contains(Directive::ScriptSrc, "'self'"));
    }
}
