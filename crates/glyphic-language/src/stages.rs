//! Grammar rewrite stages.
//!
//! Each stage is a pure function from a [`Clause`] to an optional rewritten
//! clause. `None` means the stage found nothing to do. Stages rewrite at most
//! one site: the first match wins.

use crate::analyzer::Intent;
use crate::lexicon::{self, Person, Tense};
use crate::morphology::{base_form, is_third_person_form, is_verb, past_tense, third_person};

/// Working state threaded through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub words: Vec<String>,
    pub intent: Intent,
    /// Terminal punctuation decided by a stage, if any
    pub terminal: Option<char>,
}

impl Clause {
    pub fn new(words: Vec<String>, intent: Intent) -> Self {
        Self {
            words,
            intent,
            terminal: None,
        }
    }

    fn with_words(&self, words: Vec<String>) -> Self {
        Self {
            words,
            intent: self.intent,
            terminal: self.terminal,
        }
    }
}

pub type StageFn = fn(&Clause) -> Option<Clause>;

/// A named pipeline stage
#[derive(Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub apply: StageFn,
}

/// Rewrite stages in application order
pub const PIPELINE: &[Stage] = &[
    Stage {
        name: "tense",
        apply: mark_tense,
    },
    Stage {
        name: "pronoun",
        apply: normalize_pronoun,
    },
    Stage {
        name: "article",
        apply: insert_article,
    },
    Stage {
        name: "conjugation",
        apply: conjugate_verb,
    },
    Stage {
        name: "question",
        apply: form_question,
    },
];

fn is_subject_word(word: &str) -> bool {
    lexicon::is_pronoun(word) || lexicon::person(word).is_some()
}

/// Nearest temporal marker beside the verb at `index`, looking past a
/// subject on the left (`yesterday me go`)
fn adjacent_tense(words: &[String], index: usize) -> Option<Tense> {
    let left = words[..index]
        .iter()
        .rev()
        .find(|w| !is_subject_word(w))
        .and_then(|w| lexicon::temporal(w));
    let right = words.get(index + 1).and_then(|w| lexicon::temporal(w));
    left.or(right)
}

/// `yesterday go park` -> `yesterday went park`; `tomorrow go` -> `tomorrow will go`
pub fn mark_tense(clause: &Clause) -> Option<Clause> {
    let words = &clause.words;
    for (i, word) in words.iter().enumerate() {
        let Some(base) = base_form(word) else {
            continue;
        };
        if i > 0 && lexicon::is_auxiliary(&words[i - 1]) {
            continue;
        }
        let Some(tense) = adjacent_tense(words, i) else {
            continue;
        };

        let mut rewritten = words.clone();
        match tense {
            Tense::Past => {
                let past = past_tense(&base);
                if past == word.to_lowercase() {
                    continue;
                }
                rewritten[i] = past;
            }
            Tense::Future => {
                rewritten[i] = base;
                rewritten.insert(i, "will".to_string());
            }
        }
        return Some(clause.with_words(rewritten));
    }
    None
}

/// `me want` -> `I want`
pub fn normalize_pronoun(clause: &Clause) -> Option<Clause> {
    let words = &clause.words;
    for i in 0..words.len().saturating_sub(1) {
        let Some(subject) = lexicon::subject_case(&words[i]) else {
            continue;
        };
        let next = &words[i + 1];
        if is_verb(next) || lexicon::is_auxiliary(next) {
            let mut rewritten = words.clone();
            rewritten[i] = subject.to_string();
            return Some(clause.with_words(rewritten));
        }
    }
    None
}

fn is_bare_countable_noun(word: &str) -> bool {
    let lower = word.to_lowercase();
    let plural = lower.ends_with('s') && !lower.ends_with("ss");
    !lower.is_empty()
        && lower.chars().all(|c| c.is_alphabetic() || c == '\'')
        && !plural
        && !lexicon::is_determiner(&lower)
        && !lexicon::is_pronoun(&lower)
        && !lexicon::is_people_noun(&lower)
        && !lexicon::is_uncountable(&lower)
        && !lexicon::is_feeling(&lower)
        && !lexicon::is_interrogative(&lower)
        && !lexicon::is_auxiliary(&lower)
        && lexicon::temporal(&lower).is_none()
        && !is_verb(&lower)
}

fn indefinite_article(noun: &str) -> &'static str {
    match noun.to_lowercase().chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// `want cookie` -> `want a cookie`; `go park` -> `go to the park`
pub fn insert_article(clause: &Clause) -> Option<Clause> {
    let words = &clause.words;
    for i in 0..words.len().saturating_sub(1) {
        let Some(base) = base_form(&words[i]) else {
            continue;
        };
        let next = &words[i + 1];

        if lexicon::is_motion_verb(&base) {
            if next.eq_ignore_ascii_case("to") || lexicon::temporal(next).is_some() {
                continue;
            }
            if lexicon::is_place(next) {
                let mut rewritten = words.clone();
                rewritten.insert(i + 1, "to".to_string());
                rewritten.insert(i + 2, "the".to_string());
                return Some(clause.with_words(rewritten));
            }
        }

        if lexicon::is_object_verb(&base) && is_bare_countable_noun(next) {
            let mut rewritten = words.clone();
            rewritten.insert(i + 1, indefinite_article(next).to_string());
            return Some(clause.with_words(rewritten));
        }
    }
    None
}

/// `I wants` -> `I want`; `mom want` -> `mom wants`
pub fn conjugate_verb(clause: &Clause) -> Option<Clause> {
    let words = &clause.words;
    for i in 0..words.len().saturating_sub(1) {
        let Some(person) = lexicon::person(&words[i]) else {
            continue;
        };
        // a noun right after a verb is its object, not a subject
        if i > 0 && is_verb(&words[i - 1]) {
            continue;
        }
        let verb = &words[i + 1];
        let replacement = match person {
            Person::NonThird if is_third_person_form(verb) => base_form(verb),
            Person::Third if lexicon::is_base_verb(verb) => Some(third_person(verb)),
            _ => None,
        };
        if let Some(replacement) = replacement {
            let mut rewritten = words.clone();
            rewritten[i + 1] = replacement;
            return Some(clause.with_words(rewritten));
        }
    }
    None
}

/// `where mom` -> `where is mom?`
pub fn form_question(clause: &Clause) -> Option<Clause> {
    let words = &clause.words;
    let first = words.first()?;
    let opens_with_interrogative = lexicon::is_interrogative(first);
    if clause.intent != Intent::Question && !opens_with_interrogative {
        return None;
    }

    let needs_copula =
        opens_with_interrogative && !words.iter().any(|w| lexicon::is_auxiliary(w));
    if !needs_copula && clause.terminal == Some('?') {
        return None;
    }

    let mut rewritten = words.clone();
    if needs_copula {
        rewritten.insert(1, "is".to_string());
    }
    let mut question = clause.with_words(rewritten);
    question.terminal = Some('?');
    Some(question)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(text: &str) -> Clause {
        Clause::new(
            text.split_whitespace().map(str::to_string).collect(),
            Intent::Statement,
        )
    }

    fn words(c: Option<Clause>) -> Option<String> {
        c.map(|c| c.words.join(" "))
    }

    #[test]
    fn test_tense_past_irregular_and_regular() {
        assert_eq!(
            words(mark_tense(&clause("yesterday go park"))).as_deref(),
            Some("yesterday went park")
        );
        assert_eq!(
            words(mark_tense(&clause("play ball yesterday"))).as_deref(),
            None
        );
        assert_eq!(
            words(mark_tense(&clause("yesterday me play"))).as_deref(),
            Some("yesterday me played")
        );
    }

    #[test]
    fn test_tense_future_inserts_will() {
        assert_eq!(
            words(mark_tense(&clause("tomorrow I go school"))).as_deref(),
            Some("tomorrow I will go school")
        );
    }

    #[test]
    fn test_tense_skips_existing_auxiliary() {
        assert_eq!(words(mark_tense(&clause("tomorrow will go"))), None);
        assert_eq!(words(mark_tense(&clause("went yesterday"))), None);
    }

    #[test]
    fn test_pronoun_first_match_only() {
        assert_eq!(
            words(normalize_pronoun(&clause("me want them go"))).as_deref(),
            Some("i want them go")
        );
        assert_eq!(words(normalize_pronoun(&clause("give me cookie"))), None);
    }

    #[test]
    fn test_article_vowel_heuristic() {
        assert_eq!(
            words(insert_article(&clause("i want apple"))).as_deref(),
            Some("i want an apple")
        );
        assert_eq!(
            words(insert_article(&clause("i want cookie"))).as_deref(),
            Some("i want a cookie")
        );
    }

    #[test]
    fn test_article_skips_non_bare_nouns() {
        assert_eq!(words(insert_article(&clause("want the ball"))), None);
        assert_eq!(words(insert_article(&clause("want cookies"))), None);
        assert_eq!(words(insert_article(&clause("want water"))), None);
        assert_eq!(words(insert_article(&clause("want play"))), None);
    }

    #[test]
    fn test_article_place_after_motion_verb() {
        assert_eq!(
            words(insert_article(&clause("we go park"))).as_deref(),
            Some("we go to the park")
        );
        assert_eq!(words(insert_article(&clause("go to park"))), None);
        assert_eq!(words(insert_article(&clause("go tomorrow park"))), None);
    }

    #[test]
    fn test_conjugation_adds_third_person() {
        assert_eq!(
            words(conjugate_verb(&clause("mom go to the store"))).as_deref(),
            Some("mom goes to the store")
        );
        assert_eq!(
            words(conjugate_verb(&clause("she want a drink"))).as_deref(),
            Some("she wants a drink")
        );
    }

    #[test]
    fn test_conjugation_strips_wrong_suffix() {
        assert_eq!(
            words(conjugate_verb(&clause("I wants juice"))).as_deref(),
            Some("I want juice")
        );
        assert_eq!(
            words(conjugate_verb(&clause("they has a dog"))).as_deref(),
            Some("they have a dog")
        );
        assert_eq!(words(conjugate_verb(&clause("I want juice"))), None);
    }

    #[test]
    fn test_question_inserts_copula() {
        let rewritten = form_question(&clause("where mom")).unwrap();
        assert_eq!(rewritten.words.join(" "), "where is mom");
        assert_eq!(rewritten.terminal, Some('?'));
    }

    #[test]
    fn test_question_keeps_existing_auxiliary() {
        let rewritten = form_question(&clause("where is mom")).unwrap();
        assert_eq!(rewritten.words.join(" "), "where is mom");
        assert_eq!(rewritten.terminal, Some('?'));
    }

    #[test]
    fn test_question_from_intent_only() {
        let mut c = clause("you want juice");
        c.intent = Intent::Question;
        let rewritten = form_question(&c).unwrap();
        assert_eq!(rewritten.words.join(" "), "you want juice");
        assert_eq!(rewritten.terminal, Some('?'));

        assert!(form_question(&clause("you want juice")).is_none());
    }
}
