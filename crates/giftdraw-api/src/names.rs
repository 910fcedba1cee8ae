use giftdraw_types::RandomSource;
use unicode_normalization::UnicodeNormalization;

const SUFFIX_LEN: usize = 6;
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `"  maría   josé "` becomes `"María José"`.
pub fn display_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// URL-safe base for a slug: lowercase, accents stripped, every run of
/// anything outside `[a-z0-9]` folded into one `-`.
pub fn slug_base(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();

    let mut out = String::with_capacity(folded.len());
    for c in folded.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }

    if out.is_empty() { "participant".to_string() } else { out }
}

pub fn slug_suffix(rng: &dyn RandomSource) -> String {
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.index(SUFFIX_ALPHABET.len())] as char)
        .collect()
}

pub fn make_slug(name: &str, rng: &dyn RandomSource) -> String {
    format!("{}-{}", slug_base(name), slug_suffix(rng))
}

/// Splits a `{ name, names }` payload into cleaned display names, single
/// name first, blanks dropped.
pub fn collect_names(name: Option<&str>, names: Option<&str>) -> Vec<String> {
    name.into_iter()
        .chain(names.into_iter().flat_map(str::lines))
        .map(display_name)
        .filter(|n| !n.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use giftdraw_types::ScriptedRandom;

    #[test]
    fn slug_strips_accents_and_punctuation() {
        assert_eq!(slug_base("María José"), "maria-jose");
        assert_eq!(slug_base("  Ñoño!! & Co. "), "nono-co");
        assert_eq!(slug_base("O'Brien--Smith"), "o-brien-smith");
        assert_eq!(slug_base("Zoë 2"), "zoe-2");
    }

    #[test]
    fn slug_of_symbols_falls_back() {
        assert_eq!(slug_base("🎄🎁"), "participant");
        assert_eq!(slug_base("---"), "participant");
    }

    #[test]
    fn suffix_is_six_base36_chars() {
        let rng = ScriptedRandom::new([0, 9, 10, 35, 36, 1]);
        assert_eq!(slug_suffix(&rng), "09az01");
        assert_eq!(make_slug("Ana", &ScriptedRandom::default()), "ana-000000");
    }

    #[test]
    fn display_names_are_capitalized() {
        assert_eq!(display_name("  maría   josé "), "María José");
        assert_eq!(display_name("LUIS"), "Luis");
        assert_eq!(display_name("élodie"), "Élodie");
        assert_eq!(display_name("   "), "");
    }

    #[test]
    fn batch_lines_are_split_and_cleaned() {
        let names = collect_names(Some("ana"), Some("luis\n\n  \r\nmaria lopez\r\n"));
        assert_eq!(names, ["Ana", "Luis", "Maria Lopez"]);
        assert!(collect_names(None, Some("\n \n")).is_empty());
        assert!(collect_names(Some("  "), None).is_empty());
    }
}
