//! Semantic style roles and their terminal escape codes.
//!
//! The renderer never writes an escape code directly; it asks the
//! [`StyleTable`] for the SGR parameters of a [`Role`]. Swapping the table
//! (for example [`StyleTable::plain`] in tests or when output is not a
//! terminal) changes appearance without touching layout or line mapping.

/// What a piece of rendered text *is*, independent of how it looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    // ── Headings ─────────────────────────────────────────────────────
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    /// Levels 5 and 6.
    HeadingOther,

    // ── Inline ───────────────────────────────────────────────────────
    Strong,
    Emphasis,
    Strikethrough,
    InlineCode,
    Link,
    LinkDestination,
    Image,

    // ── Blocks ───────────────────────────────────────────────────────
    CodeBlock,
    CodeLanguage,
    Rule,
    QuoteMarker,
    Html,
    ListMarker,
}

impl Role {
    pub fn heading(level: u8) -> Self {
        match level {
            1 => Role::Heading1,
            2 => Role::Heading2,
            3 => Role::Heading3,
            4 => Role::Heading4,
            _ => Role::HeadingOther,
        }
    }
}

/// SGR parameter string for one role, e.g. `"1;36"` for bold cyan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnsiStyle {
    pub sgr: &'static str,
}

/// Maps every [`Role`] to an optional [`AnsiStyle`].
#[derive(Debug, Clone, Copy)]
pub struct StyleTable {
    lookup: fn(Role) -> Option<AnsiStyle>,
}

impl StyleTable {
    /// 16-color styles suitable for dark and light terminals alike.
    pub fn ansi() -> Self {
        Self {
            lookup: ansi16_style_for,
        }
    }

    /// No styling at all. Rendered text is plain.
    pub fn plain() -> Self {
        Self { lookup: |_| None }
    }

    pub fn style_for(&self, role: Role) -> Option<AnsiStyle> {
        (self.lookup)(role)
    }

    /// Opening escape sequence for `role`, or `None` when unstyled.
    pub fn open(&self, role: Role) -> Option<String> {
        self.style_for(role).map(|s| format!("\x1b[{}m", s.sgr))
    }

    /// `text` wrapped in the role's style and a trailing reset.
    pub fn paint(&self, role: Role, text: &str) -> String {
        match self.open(role) {
            Some(open) => format!("{open}{text}{RESET}"),
            None => text.to_string(),
        }
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::ansi()
    }
}

/// Resets every SGR attribute.
pub const RESET: &str = "\x1b[0m";

fn ansi16_style_for(role: Role) -> Option<AnsiStyle> {
    let sgr = match role {
        Role::Heading1 => "1;36",
        Role::Heading2 => "1;32",
        Role::Heading3 => "1;33",
        Role::Heading4 => "1;35",
        Role::HeadingOther => "1",
        Role::Strong => "1",
        Role::Emphasis => "3",
        Role::Strikethrough => "2",
        Role::InlineCode => "33",
        Role::Link => "4;36",
        Role::LinkDestination | Role::Image | Role::Rule | Role::QuoteMarker | Role::Html => "90",
        Role::CodeBlock => "48;5;236;97",
        Role::CodeLanguage => "48;5;236;90",
        Role::ListMarker => "36",
    };
    Some(AnsiStyle { sgr })
}
