// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Decorative glyph derived from a pull-request title.
//!
//! Conventional-commit prefixes take precedence over leading keywords, and
//! every other title falls back to [`DEFAULT_GLYPH`].

/// Glyphs for conventional-commit kinds.
const CONVENTIONAL_GLYPHS: &[(&str, &str,)] = &[
    ("feat", "✨",),
    ("fix", "🐛",),
    ("refactor", "♻️",),
    ("docs", "📝",),
    ("style", "💄",),
    ("test", "✅",),
    ("chore", "🔧",),
    ("perf", "⚡",),
    ("ci", "👷",),
    ("build", "📦",),
    ("revert", "⏪",),
];

/// Glyphs for leading keywords, matched in declaration order.
const KEYWORD_GLYPHS: &[(&str, &str,)] = &[
    ("add", "➕",),
    ("update", "🔄",),
    ("remove", "➖",),
    ("delete", "🗑️",),
    ("migrate", "🚚",),
    ("improve", "👌",),
    ("enhance", "🚀",),
    ("optimize", "🏎️",),
    ("bump", "⬆️",),
    ("upgrade", "⏫",),
    ("deprecate", "🗃️",),
];

/// Glyph used when neither a conventional prefix nor a keyword matches.
pub const DEFAULT_GLYPH: &str = "🔨";

/// Returns the glyph for a pull-request title.
///
/// # Examples
///
/// ```
/// use oscr::classify_title;
///
/// assert_eq!(classify_title("feat(ui): add caching"), "✨");
/// assert_eq!(classify_title("Update dependencies"), "🔄");
/// assert_eq!(classify_title("Random change"), oscr::DEFAULT_GLYPH);
/// ```
pub fn classify_title(title: &str) -> &'static str {
    if let Some(kind) = conventional_kind(title) {
        let kind = kind.to_ascii_lowercase();
        if let Some((_, glyph)) = CONVENTIONAL_GLYPHS.iter().find(|(name, _)| *name == kind) {
            return *glyph;
        }
    }

    let normalized = title.trim().to_lowercase();
    KEYWORD_GLYPHS
        .iter()
        .find(|(keyword, _)| normalized.starts_with(*keyword))
        .map_or(DEFAULT_GLYPH, |(_, glyph)| *glyph)
}

/// Extracts the leading token of a `kind(scope):` or `kind:` prefix.
fn conventional_kind(title: &str) -> Option<&str> {
    let token_end = title
        .char_indices()
        .find(|(_, ch)| !(ch.is_alphanumeric() || *ch == '_'))
        .map_or(title.len(), |(index, _)| index);
    if token_end == 0 {
        return None;
    }

    let (token, rest) = title.split_at(token_end);
    let rest = match rest.strip_prefix('(') {
        Some(scoped) => {
            let close = scoped.find(')')?;
            &scoped[close + 1..]
        }
        None => rest
    };

    rest.starts_with(':').then_some(token)
}
