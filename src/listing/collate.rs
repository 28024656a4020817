//! Locale-aware title comparison
//!
//! Approximates the default Unicode collation for Latin titles: letters
//! compare case- and accent-insensitively first, then unaccented before
//! accented, then lowercase before uppercase.

use std::cmp::Ordering;

/// Compare two strings the way a reader expects an index to be ordered
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| case_key(a).cmp(&case_key(b)))
}

fn primary_key(s: &str) -> Vec<char> {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| fold_accent(c).0)
        .collect()
}

fn accent_key(s: &str) -> Vec<bool> {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| fold_accent(c).1)
        .collect()
}

/// `false` sorts before `true`, so lowercase wins ties
fn case_key(s: &str) -> Vec<bool> {
    s.chars().map(char::is_uppercase).collect()
}

/// Base letter and whether an accent was removed
fn fold_accent(c: char) -> (char, bool) {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ñ' | 'ń' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ś' | 'š' => 's',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        _ => return (c, false),
    };
    (base, true)
}
