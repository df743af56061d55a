//! Name normalization for speaker matching.
//!
//! Speaker search must find "José García" when the operator types
//! "jose garcia", so speaker names are stored alongside a normalized form
//! and search input is normalized the same way. Key transformations:
//! - Convert to lowercase
//! - Remove accents/diacritics (é → e, ü → u, etc.)
//! - Normalize whitespace
//! - Handle special characters that don't decompose

use unicode_normalization::UnicodeNormalization;

/// Normalize a name for matching purposes.
///
/// Transformations applied:
/// 1. Replace special characters that don't decompose (ł, ø, æ, etc.)
/// 2. Unicode NFD normalization (decompose characters)
/// 3. Remove combining diacritical marks (accents)
/// 4. Convert to lowercase
/// 5. Normalize whitespace (collapse multiple spaces, trim)
///
/// # Examples
///
/// ```
/// use confdesk::utils::normalize_name;
///
/// assert_eq!(normalize_name("José García"), "jose garcia");
/// assert_eq!(normalize_name("Müller"), "muller");
/// assert_eq!(normalize_name("Schrödinger"), "schrodinger");
/// assert_eq!(normalize_name("  Alice   Bob  "), "alice bob");
/// ```
pub fn normalize_name(name: &str) -> String {
    // First, replace special characters that don't decompose via NFD
    let replaced = replace_special_chars(name);

    replaced
        // NFD decomposition: splits characters into base + combining marks
        // e.g., "é" becomes "e" + combining acute accent
        .nfd()
        // Filter out combining diacritical marks (Unicode category Mn)
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Replace special characters that don't decompose via Unicode NFD.
///
/// Some characters like Ł, Ø, Æ are distinct letters, not accented versions,
/// so they need explicit replacement for normalization.
fn replace_special_chars(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            // Polish
            'Ł' => 'L',
            'ł' => 'l',
            // Nordic
            'Ø' => 'O',
            'ø' => 'o',
            'Æ' => 'A',
            'æ' => 'a',
            'Å' => 'A',
            'å' => 'a',
            // German
            'ß' => 's',
            // Icelandic
            'Ð' => 'D',
            'ð' => 'd',
            'Þ' => 'T',
            'þ' => 't',
            // Croatian/Serbian
            'Đ' => 'D',
            'đ' => 'd',
            // Turkish
            'İ' => 'I',
            'ı' => 'i',
            'Ğ' => 'G',
            'ğ' => 'g',
            'Ş' => 'S',
            'ş' => 's',
            // Others pass through for NFD handling
            _ => c,
        })
        .collect()
}

/// Check if a character is a combining diacritical mark.
///
/// Combining marks are Unicode characters that modify the preceding character,
/// such as accents (́), umlauts (̈), cedillas (̧), etc.
fn is_combining_mark(c: char) -> bool {
    // Unicode combining diacritical marks range
    // See: https://unicode.org/charts/PDF/U0300.pdf
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
