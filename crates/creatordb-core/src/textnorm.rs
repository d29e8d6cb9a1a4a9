//! Free-text cleanup applied to captions, biographies, and headlines before
//! storage or AI consumption.
//!
//! The function is deterministic and idempotent: running it twice yields the
//! same output as running it once. Whitespace is collapsed *after* the
//! character allow-list is applied, otherwise deleting an interior character
//! could leave a double space behind and break idempotence.

/// Emoji and pictograph blocks stripped outright.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport & map
    (0x1F900, 0x1F9FF), // supplemental symbols
    (0x1F1E0, 0x1F1FF), // regional indicators (flags)
    (0x2600, 0x26FF),   // misc symbols
    (0x2700, 0x27BF),   // dingbats
];

/// Invisible formatting code points: zero-width characters, word joiner,
/// invisible separator, variation selectors.
const INVISIBLE_RANGES: &[(u32, u32)] = &[
    (0x200B, 0x200D),
    (0x2060, 0x2060),
    (0x2063, 0x2063),
    (0xFE00, 0xFE0F),
];

fn in_ranges(c: char, ranges: &[(u32, u32)]) -> bool {
    let code = c as u32;
    ranges.iter().any(|&(lo, hi)| code >= lo && code <= hi)
}

/// Punctuation retained alongside word characters and whitespace.
fn is_allowed_punct(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '-' | '(' | ')')
}

/// Cleans free text for storage and prompt assembly.
///
/// In order: strips emoji/pictograph blocks, strips invisible formatting
/// code points, maps line breaks and tabs to spaces, drops everything
/// outside the allow-list (alphanumerics, `_`, whitespace, basic
/// punctuation), collapses whitespace runs to a single space, and trims.
#[must_use]
pub fn normalize(text: &str) -> String {
    let filtered: String = text
        .chars()
        .filter(|&c| !in_ranges(c, EMOJI_RANGES))
        .filter(|&c| !in_ranges(c, INVISIBLE_RANGES))
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .filter(|&c| c.is_alphanumeric() || c == '_' || c.is_whitespace() || is_allowed_punct(c))
        .collect();

    let mut out = String::with_capacity(filtered.len());
    let mut prev_space = false;
    for c in filtered.chars() {
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }

    out.trim().to_string()
}
