//! English verb inflection: past tense, third person and base-form recovery

use crate::lexicon;

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn syllables(word: &str) -> usize {
    let mut count = 0;
    let mut previous_vowel = false;
    for c in word.chars() {
        let vowel = is_vowel(c) || c == 'y';
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }
    count
}

/// One-syllable consonant-vowel-consonant ending (`stop`, `hug`)
fn doubles_final_consonant(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    if n < 3 || syllables(word) != 1 {
        return false;
    }
    let (c1, v, c2) = (chars[n - 3], chars[n - 2], chars[n - 1]);
    !is_vowel(c1) && is_vowel(v) && !is_vowel(c2) && !matches!(c2, 'w' | 'x' | 'y')
}

fn ends_with_consonant_y(word: &str) -> bool {
    let mut rev = word.chars().rev();
    matches!((rev.next(), rev.next()), (Some('y'), Some(c)) if !is_vowel(c))
}

/// Past tense: irregular table first, then regular suffix rules
pub fn past_tense(base: &str) -> String {
    let base = base.to_lowercase();
    if let Some(past) = lexicon::irregular_past(&base) {
        return past.to_string();
    }
    if base.ends_with('e') {
        format!("{base}d")
    } else if ends_with_consonant_y(&base) {
        format!("{}ied", &base[..base.len() - 1])
    } else if doubles_final_consonant(&base) {
        let last = base.chars().last().unwrap_or_default();
        format!("{base}{last}ed")
    } else {
        format!("{base}ed")
    }
}

/// Third-person singular present: `go` -> `goes`, `play` -> `plays`
pub fn third_person(base: &str) -> String {
    let base = base.to_lowercase();
    if let Some(form) = lexicon::irregular_third_person(&base) {
        return form.to_string();
    }
    if ["s", "x", "z", "ch", "sh", "o"]
        .iter()
        .any(|suffix| base.ends_with(suffix))
    {
        format!("{base}es")
    } else if ends_with_consonant_y(&base) {
        format!("{}ies", &base[..base.len() - 1])
    } else {
        format!("{base}s")
    }
}

/// Recover the known base form of an inflected verb
pub fn base_form(word: &str) -> Option<String> {
    let word = word.to_lowercase();
    if lexicon::is_base_verb(&word) {
        return Some(word);
    }
    if let Some(base) = lexicon::irregular_third_person_base(&word) {
        return Some(base.to_string());
    }
    if let Some(base) = lexicon::irregular_past_base(&word) {
        return Some(base.to_string());
    }

    let mut candidates: Vec<String> = Vec::new();
    if let Some(stem) = word.strip_suffix("ies") {
        candidates.push(format!("{stem}y"));
    }
    if let Some(stem) = word.strip_suffix("es") {
        candidates.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('s') {
        candidates.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix("ied") {
        candidates.push(format!("{stem}y"));
    }
    if let Some(stem) = word.strip_suffix("ed") {
        candidates.push(stem.to_string());
        let mut chars = stem.chars().rev();
        if let (Some(a), Some(b)) = (chars.next(), chars.next()) {
            if a == b {
                candidates.push(stem[..stem.len() - a.len_utf8()].to_string());
            }
        }
    }
    if let Some(stem) = word.strip_suffix('d') {
        candidates.push(stem.to_string());
    }

    candidates.into_iter().find(|c| lexicon::is_base_verb(c))
}

pub fn is_verb(word: &str) -> bool {
    base_form(word).is_some()
}

/// Third-person form of a known verb (`wants`, `goes`), never a base form
pub fn is_third_person_form(word: &str) -> bool {
    match base_form(word) {
        Some(base) => base != word.to_lowercase() && third_person(&base) == word.to_lowercase(),
        None => false,
    }
}
