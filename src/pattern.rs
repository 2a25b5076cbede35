//! Compliance-pattern compilation.
//!
//! Char patterns describe a value one character class at a time: `a` is any
//! lowercase letter, `A` any uppercase letter, `9` any digit, and every
//! other character stands for itself. `'Aaaa 99'` matches "Jean 42".
//!
//! Word patterns describe a value as a sequence of bracketed tokens:
//! `[word]`, `[Word]`, `[WORD]`, `[digit]`, `[number]`, `[char]`, `[Char]`
//! and `[alnum]`; characters outside brackets stand for themselves.
//! `'[Word] [digit]'` matches "Jean 4".
//!
//! Both compile to anchored regexes over Unicode character classes.

/// Compile a char pattern to an anchored regex source.
pub fn char_pattern_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    for ch in pattern.chars() {
        match ch {
            'a' => out.push_str(r"\p{Ll}"),
            'A' => out.push_str(r"\p{Lu}"),
            '9' => out.push_str(r"\p{Nd}"),
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out.push('$');
    out
}

/// Compile a word pattern to an anchored regex source.
pub fn word_pattern_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '[' {
            if let Some(close) = chars[i + 1..].iter().position(|&c| c == ']') {
                let token: String = chars[i + 1..i + 1 + close].iter().collect();
                match token_class(&token) {
                    Some(class) => {
                        out.push_str(class);
                        i += close + 2;
                        continue;
                    }
                    // Unknown tokens stand for themselves, brackets included.
                    None => {}
                }
            }
        }
        out.push_str(&regex::escape(&chars[i].to_string()));
        i += 1;
    }

    out.push('$');
    out
}

fn token_class(token: &str) -> Option<&'static str> {
    match token {
        "word" => Some(r"\p{Ll}+"),
        "Word" => Some(r"\p{Lu}\p{Ll}+"),
        "WORD" => Some(r"\p{Lu}+"),
        "digit" => Some(r"\p{Nd}"),
        "number" => Some(r"\p{Nd}+"),
        "char" => Some(r"\p{Ll}"),
        "Char" => Some(r"\p{Lu}"),
        "alnum" => Some(r"[\p{L}\p{Nd}]+"),
        _ => None,
    }
}

#[test]
fn test_char_pattern() {
    assert_eq!(char_pattern_to_regex("Aaa9"), r"^\p{Lu}\p{Ll}\p{Ll}\p{Nd}$");
    assert_eq!(char_pattern_to_regex(""), "^$");
    assert_eq!(char_pattern_to_regex("a.b"), r"^\p{Ll}\.\p{Ll}$");
}

#[test]
fn test_word_pattern() {
    assert_eq!(word_pattern_to_regex("[Word]"), r"^\p{Lu}\p{Ll}+$");
    assert_eq!(
        word_pattern_to_regex("[word][digit]"),
        r"^\p{Ll}+\p{Nd}$"
    );
    // A stray bracket is a literal, not a token.
    assert_eq!(word_pattern_to_regex("][word]@"), r"^\]\p{Ll}+@$");
    assert_eq!(word_pattern_to_regex("[nope]"), r"^\[nope\]$");
}
