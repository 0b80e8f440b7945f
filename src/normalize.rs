//! Base-name normalization used as the grouping key for scanned entities.

/// Map a display name to its base name.
///
/// Lowercases, drops whole tokens found in `ignore_words`, rejoins with single
/// spaces and title-cases the result. `ignore_words` must already be lowercase.
/// Returns an empty string when every token was dropped.
pub fn normalize_name<S: AsRef<str>>(name: &str, ignore_words: &[S]) -> String {
    let lowered = name.to_lowercase();
    let kept: Vec<&str> = lowered
        .split_whitespace()
        .filter(|w| !ignore_words.iter().any(|ig| ig.as_ref() == *w))
        .collect();
    fix_possessive(&title_case(&kept.join(" ")))
}

/// Uppercase the first letter after any non-letter, lowercase every other letter.
/// A letter whose uppercase form is several characters (`ß` -> `SS`) keeps only the
/// first one uppercase, so `ßa` becomes `Ssa`.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                let mut upper = ch.to_uppercase();
                if let Some(first) = upper.next() {
                    out.push(first);
                }
                out.extend(upper.flat_map(char::to_lowercase));
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// Title-casing turns "joe's" into "Joe'S"; lower a possessive `'S` that ends a word.
fn fix_possessive(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, ch) in chars.iter().enumerate() {
        let after_apostrophe = i > 0 && matches!(chars[i - 1], '\'' | '\u{2019}');
        let ends_word = chars.get(i + 1).is_none_or(|next| !next.is_alphabetic());
        if *ch == 'S' && after_apostrophe && ends_word {
            out.push('s');
        } else {
            out.push(*ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::normalize_name;
    use crate::statics;

    fn norm(name: &str) -> String {
        normalize_name(name, statics::DEFAULT_IGNORE_WORDS)
    }

    #[test]
    fn drops_ignore_words_and_title_cases() {
        assert_eq!(norm("JOE'S   bakery"), "Joe's");
        assert_eq!(norm("Fresh Market"), "Fresh");
        assert_eq!(norm("neon labs"), "Neon");
        assert_eq!(norm("the old  mill"), "The Old Mill");
    }

    #[test]
    fn ignore_words_only_match_whole_tokens() {
        assert_eq!(norm("Supermarket"), "Supermarket");
        assert_eq!(norm("Grillhouse Market"), "Grillhouse");
    }

    #[test]
    fn all_tokens_filtered_yields_empty() {
        assert_eq!(norm("Market Store"), "");
        assert_eq!(norm("   "), "");
    }

    #[test]
    fn possessive_stays_lowercase_but_names_keep_capitals() {
        assert_eq!(norm("o'sullivan's"), "O'Sullivan's");
        assert_eq!(norm("mcdonald's grill"), "Mcdonald's");
        assert_eq!(norm("sam\u{2019}s"), "Sam\u{2019}s");
    }

    #[test]
    fn multi_char_uppercase_keeps_one_capital() {
        assert_eq!(norm("\u{df}a"), "Ssa");
        assert_eq!(norm("\u{fb01}x"), "Fix");
        assert_eq!(norm("gro\u{df}e stra\u{df}e"), "Gro\u{df}e Stra\u{df}e");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "JOE'S   bakery",
            "o'sullivan's",
            "Fresh Market",
            "Supermarket",
            "the old-town deli",
            "Market Store",
            "caf\u{e9} r\u{f6}ma",
            "\u{df}a",
            "\u{fb01}x",
        ] {
            let once = norm(raw);
            assert_eq!(norm(&once), once, "not idempotent for {raw:?}");
        }
    }
}
