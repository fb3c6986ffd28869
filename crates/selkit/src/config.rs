//! Render configuration.

/// Marker emitted for each bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholder {
    /// `?` (MySQL, SQLite drivers)
    #[default]
    QuestionMark,
    /// `%s` (DB-API style connectors)
    Format,
    /// `$1, $2, ...` (PostgreSQL)
    Numbered,
}

impl Placeholder {
    /// Write the marker for the parameter at 1-based `index`.
    pub(crate) fn write_marker(self, index: usize, out: &mut String) {
        match self {
            Placeholder::QuestionMark => out.push('?'),
            Placeholder::Format => out.push_str("%s"),
            Placeholder::Numbered => {
                out.push('$');
                out.push_str(&index.to_string());
            }
        }
    }
}

/// Configuration for rendering a statement.
///
/// By default, statements use `?` markers and end with `;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Placeholder style for bound parameters.
    pub placeholder: Placeholder,
    /// Whether to append the `;` terminator.
    pub terminator: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            placeholder: Placeholder::QuestionMark,
            terminator: true,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Numbered `$n` markers, no terminator: ready for `tokio_postgres::Client::query`.
    pub fn postgres() -> Self {
        Self {
            placeholder: Placeholder::Numbered,
            terminator: false,
        }
    }

    /// Set the placeholder style.
    pub fn with_placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Append (or omit) the trailing `;`.
    pub fn with_terminator(mut self, terminator: bool) -> Self {
        self.terminator = terminator;
        self
    }
}
