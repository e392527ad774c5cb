/*!
 * Language utilities for the provider's supported-language table.
 *
 * Codes are accepted as ISO 639-1 (`en`), ISO 639-2/T (`eng`), ISO 639-2/B (`fre`),
 * optionally followed by a region subtag (`zh-cn`, `pt_BR`), and resolved to the
 * code the translation endpoint understands.
 */

use std::collections::HashMap;

use isolang::Language;
use once_cell::sync::Lazy;

use crate::errors::TranslationError;

/// Languages the translation endpoint accepts, as (code, English name)
const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("zh-CN", "Chinese (Simplified)"),
    ("zh-TW", "Chinese (Traditional)"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("fr", "French"),
    ("de", "German"),
    ("es", "Spanish"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("tr", "Turkish"),
    ("vi", "Vietnamese"),
    ("th", "Thai"),
    ("id", "Indonesian"),
    ("uk", "Ukrainian"),
    ("sv", "Swedish"),
];

/// Lookup from lowercase code to table entry
static LANGUAGE_TABLE: Lazy<HashMap<String, (&'static str, &'static str)>> = Lazy::new(|| {
    SUPPORTED_LANGUAGES
        .iter()
        .map(|&(code, name)| (code.to_lowercase(), (code, name)))
        .collect()
});

/// Map an ISO 639-2/B code to its ISO 639-2/T counterpart when they differ
fn part2b_to_part2t(code: &str) -> &str {
    match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        other => other,
    }
}

/// Canonical form of a language tag: lowercase ISO 639-1 primary subtag,
/// uppercase region (`zh-CN`). Returns `None` for codes isolang does not know.
pub fn canonicalize(code: &str) -> Option<String> {
    let trimmed = code.trim();
    let mut parts = trimmed.splitn(2, ['-', '_']);
    let primary = parts.next()?.to_lowercase();
    let region = parts.next().map(|r| r.to_uppercase());

    let primary = match primary.len() {
        2 => Language::from_639_1(&primary).map(|_| primary)?,
        3 => {
            let lang = Language::from_639_3(part2b_to_part2t(&primary))?;
            // Languages without a two-letter code keep their three-letter form
            lang.to_639_1()
                .map(|c| c.to_string())
                .unwrap_or_else(|| lang.to_639_3().to_string())
        }
        _ => return None,
    };

    match region {
        Some(region) if !region.is_empty() => Some(format!("{}-{}", primary, region)),
        _ => Some(primary),
    }
}

/// Resolve a requested language to the endpoint's code
///
/// Tries the exact tag first, then the bare primary subtag; a bare `zh` means
/// Simplified Chinese.
pub fn resolve_language(code: &str) -> Result<&'static str, TranslationError> {
    let unsupported = || TranslationError::UnsupportedLanguage(code.trim().to_string());

    let canonical = canonicalize(code).ok_or_else(unsupported)?;
    if let Some((resolved, _)) = LANGUAGE_TABLE.get(&canonical.to_lowercase()) {
        return Ok(resolved);
    }

    let primary = canonical.split('-').next().unwrap_or(&canonical);
    if primary == "zh" {
        return Ok("zh-CN");
    }

    LANGUAGE_TABLE
        .get(primary)
        .map(|(resolved, _)| *resolved)
        .ok_or_else(unsupported)
}

/// Check whether a code resolves to a supported language
pub fn is_supported(code: &str) -> bool {
    resolve_language(code).is_ok()
}

/// Check if two language codes represent the same language
///
/// Tags match when their canonical forms are equal, or when their primary
/// subtags are equal and at least one of them carries no region.
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let (Some(first), Some(second)) = (canonicalize(code1), canonicalize(code2)) else {
        // Unknown codes only match themselves
        return !code1.trim().is_empty() && code1.trim().eq_ignore_ascii_case(code2.trim());
    };

    if first == second {
        return true;
    }

    let mut first_parts = first.splitn(2, '-');
    let mut second_parts = second.splitn(2, '-');
    let first_primary = first_parts.next();
    let second_primary = second_parts.next();
    let first_region = first_parts.next();
    let second_region = second_parts.next();

    first_primary == second_primary && (first_region.is_none() || second_region.is_none())
}

/// Get the display name of a supported language
pub fn get_language_name(code: &str) -> Result<&'static str, TranslationError> {
    let resolved = resolve_language(code)?;
    LANGUAGE_TABLE
        .get(&resolved.to_lowercase())
        .map(|(_, name)| *name)
        .ok_or_else(|| TranslationError::UnsupportedLanguage(code.to_string()))
}

/// All supported languages as (code, name) pairs, in table order
pub fn supported_languages() -> impl Iterator<Item = (&'static str, &'static str)> {
    SUPPORTED_LANGUAGES.iter().copied()
}
