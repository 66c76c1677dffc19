//! Closed English word lists used by the grammar stages.
//!
//! Every lookup lowercases its input, so callers can pass tokens in their
//! original case.

/// Whole-utterance phrases for a single tapped symbol
pub(crate) const SINGLE_SYMBOL_PHRASES: &[(&str, &str)] = &[
    ("happy", "I feel happy"),
    ("sad", "I feel sad"),
    ("angry", "I feel angry"),
    ("mad", "I feel mad"),
    ("scared", "I feel scared"),
    ("excited", "I feel excited"),
    ("bored", "I feel bored"),
    ("sick", "I feel sick"),
    ("tired", "I am tired"),
    ("hungry", "I am hungry"),
    ("thirsty", "I am thirsty"),
    ("hurt", "I am hurt"),
    ("cold", "I am cold"),
    ("hot", "I am hot"),
    ("finished", "I am finished"),
    ("all done", "I am all done"),
    ("more", "I want more"),
    ("help", "I need help"),
    ("toilet", "I need the toilet"),
    ("bathroom", "I need the bathroom"),
    ("water", "I want water"),
    ("drink", "I want a drink"),
    ("eat", "I want to eat"),
    ("play", "I want to play"),
    ("sleep", "I want to sleep"),
    ("stop", "Please stop"),
    ("wait", "Please wait"),
    ("go", "Let's go"),
    ("yes", "Yes"),
    ("no", "No"),
    ("please", "Please"),
    ("thank you", "Thank you"),
    ("thanks", "Thank you"),
    ("hello", "Hello!"),
    ("hi", "Hi!"),
    ("bye", "Goodbye!"),
    ("goodbye", "Goodbye!"),
    ("sorry", "I am sorry"),
    ("love", "I love you"),
];

/// Base forms of verbs the stages recognize
const VERBS: &[&str] = &[
    "want", "need", "like", "love", "go", "come", "eat", "drink", "play", "see", "look", "watch",
    "have", "get", "give", "make", "help", "feel", "read", "sleep", "walk", "run", "stop",
    "open", "close", "find", "take", "put", "sit", "stand", "listen", "hear", "talk", "say",
    "tell", "know", "think", "wash", "brush", "cook", "buy", "ride", "swim", "jump", "sing",
    "dance", "draw", "write", "hug", "kiss", "try", "cry", "carry", "finish", "fix", "push",
    "pull", "turn", "wait", "call", "visit", "use", "do", "drive", "move", "hold", "bring",
    "catch", "throw", "build", "break", "wear", "meet", "leave", "send", "cut", "hurt", "fall",
    "win", "lose", "climb", "paint", "travel", "return", "shop", "bake", "clean", "study",
    "learn", "laugh", "smile", "share", "kick", "color", "miss", "touch", "pick",
];

const IRREGULAR_PAST: &[(&str, &str)] = &[
    ("go", "went"),
    ("come", "came"),
    ("eat", "ate"),
    ("drink", "drank"),
    ("see", "saw"),
    ("have", "had"),
    ("get", "got"),
    ("give", "gave"),
    ("make", "made"),
    ("feel", "felt"),
    ("read", "read"),
    ("sleep", "slept"),
    ("run", "ran"),
    ("find", "found"),
    ("take", "took"),
    ("put", "put"),
    ("sit", "sat"),
    ("stand", "stood"),
    ("hear", "heard"),
    ("say", "said"),
    ("tell", "told"),
    ("know", "knew"),
    ("think", "thought"),
    ("buy", "bought"),
    ("ride", "rode"),
    ("swim", "swam"),
    ("sing", "sang"),
    ("draw", "drew"),
    ("write", "wrote"),
    ("do", "did"),
    ("drive", "drove"),
    ("hold", "held"),
    ("bring", "brought"),
    ("catch", "caught"),
    ("throw", "threw"),
    ("build", "built"),
    ("break", "broke"),
    ("wear", "wore"),
    ("meet", "met"),
    ("leave", "left"),
    ("send", "sent"),
    ("cut", "cut"),
    ("hurt", "hurt"),
    ("fall", "fell"),
    ("win", "won"),
    ("lose", "lost"),
];

const IRREGULAR_THIRD_PERSON: &[(&str, &str)] = &[("go", "goes"), ("have", "has"), ("do", "does")];

/// Object-case pronoun and its subject case
const OBJECT_PRONOUNS: &[(&str, &str)] = &[
    ("me", "i"),
    ("him", "he"),
    ("her", "she"),
    ("us", "we"),
    ("them", "they"),
];

const NON_THIRD_PERSON_SUBJECTS: &[&str] = &["i", "you", "we", "they"];
const THIRD_PERSON_SUBJECTS: &[&str] = &["he", "she", "it"];

/// Nouns that commonly open a telegraphic clause as its subject
const PEOPLE_NOUNS: &[&str] = &[
    "mom", "mommy", "mum", "dad", "daddy", "teacher", "brother", "sister", "friend", "baby",
    "grandma", "grandpa", "doctor", "nurse", "dog", "cat", "boy", "girl", "man", "woman",
];

/// Verbs that take a direct object noun
const OBJECT_VERBS: &[&str] = &[
    "want", "need", "like", "love", "have", "see", "get", "eat", "find", "make", "read", "watch",
    "hold", "buy", "take", "draw", "bring", "throw", "catch", "wear", "carry",
];

const MOTION_VERBS: &[&str] = &[
    "go", "come", "walk", "run", "drive", "ride", "travel", "move", "return",
];

const PLACE_NOUNS: &[&str] = &[
    "park", "school", "store", "shop", "bathroom", "toilet", "kitchen", "bedroom", "playground",
    "beach", "library", "hospital", "zoo", "pool", "restaurant", "church", "gym", "office",
    "garden", "farm", "mall", "museum", "doctor", "dentist", "cinema", "movies", "supermarket",
    "market", "classroom", "cafeteria",
];

const UNCOUNTABLE_NOUNS: &[&str] = &[
    "water", "milk", "juice", "food", "music", "rice", "bread", "help", "money", "time",
    "homework", "tv", "television", "pasta", "cereal", "soup", "coffee", "tea", "chocolate",
    "fun", "paper", "sand", "air", "medicine", "candy", "popcorn", "cheese", "ice", "lunch",
    "breakfast", "dinner", "home", "outside", "inside", "quiet", "space",
];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "my", "your", "his", "her", "its", "our", "their", "some", "more", "this",
    "that", "these", "those", "any", "no", "one", "two", "three", "another", "every", "all",
    "much", "many", "lots", "to", "not", "and", "with", "for", "please",
];

/// Feeling words read as complements, never as object nouns
const FEELINGS: &[&str] = &[
    "happy", "sad", "angry", "mad", "scared", "excited", "bored", "sick", "tired", "hungry",
    "thirsty", "hurt", "upset", "calm", "okay", "ok", "good", "bad", "fine",
];

const PAST_MARKERS: &[&str] = &["yesterday", "earlier", "before", "ago", "already", "last"];
const FUTURE_MARKERS: &[&str] = &["tomorrow", "later", "soon", "tonight", "next"];

const INTERROGATIVES: &[&str] = &["what", "where", "who", "when", "why", "how", "which"];

const AUXILIARIES: &[&str] = &[
    "is", "are", "am", "was", "were", "be", "do", "does", "did", "can", "could", "will", "would",
    "should", "shall", "may", "might", "must", "have", "has", "had", "'s", "'re", "'m",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tense {
    Past,
    Future,
}

/// Grammatical person of a clause subject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Person {
    /// First/second person or plural: bare verb
    NonThird,
    /// Singular third person: verb takes `-s`
    Third,
}

fn lower(word: &str) -> String {
    word.to_lowercase()
}

fn contains(table: &[&str], word: &str) -> bool {
    table.contains(&lower(word).as_str())
}

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    let key = lower(key);
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn reverse_lookup(table: &[(&'static str, &'static str)], value: &str) -> Option<&'static str> {
    let value = lower(value);
    table.iter().find(|(_, v)| *v == value).map(|(k, _)| *k)
}

pub(crate) fn single_symbol_phrase(label: &str) -> Option<&'static str> {
    lookup(SINGLE_SYMBOL_PHRASES, label)
}

pub(crate) fn is_base_verb(word: &str) -> bool {
    contains(VERBS, word)
}

pub(crate) fn irregular_past(base: &str) -> Option<&'static str> {
    lookup(IRREGULAR_PAST, base)
}

pub(crate) fn irregular_past_base(past: &str) -> Option<&'static str> {
    reverse_lookup(IRREGULAR_PAST, past)
}

pub(crate) fn irregular_third_person(base: &str) -> Option<&'static str> {
    lookup(IRREGULAR_THIRD_PERSON, base)
}

pub(crate) fn irregular_third_person_base(form: &str) -> Option<&'static str> {
    reverse_lookup(IRREGULAR_THIRD_PERSON, form)
}

pub(crate) fn subject_case(pronoun: &str) -> Option<&'static str> {
    lookup(OBJECT_PRONOUNS, pronoun)
}

pub(crate) fn is_pronoun(word: &str) -> bool {
    let word = lower(word);
    subject_case(&word).is_some()
        || NON_THIRD_PERSON_SUBJECTS.contains(&word.as_str())
        || THIRD_PERSON_SUBJECTS.contains(&word.as_str())
}

pub(crate) fn is_people_noun(word: &str) -> bool {
    contains(PEOPLE_NOUNS, word)
}

/// Person of a would-be subject; `None` when the word cannot open a clause
pub(crate) fn person(subject: &str) -> Option<Person> {
    let subject = lower(subject);
    if NON_THIRD_PERSON_SUBJECTS.contains(&subject.as_str()) {
        return Some(Person::NonThird);
    }
    if THIRD_PERSON_SUBJECTS.contains(&subject.as_str()) || is_people_noun(&subject) {
        return Some(Person::Third);
    }
    match subject.strip_suffix('s') {
        Some(stem) if is_people_noun(stem) => Some(Person::NonThird),
        _ => None,
    }
}

pub(crate) fn is_object_verb(base: &str) -> bool {
    contains(OBJECT_VERBS, base)
}

pub(crate) fn is_motion_verb(base: &str) -> bool {
    contains(MOTION_VERBS, base)
}

pub(crate) fn is_place(word: &str) -> bool {
    contains(PLACE_NOUNS, word)
}

pub(crate) fn is_uncountable(word: &str) -> bool {
    contains(UNCOUNTABLE_NOUNS, word)
}

pub(crate) fn is_determiner(word: &str) -> bool {
    contains(DETERMINERS, word)
}

pub(crate) fn is_feeling(word: &str) -> bool {
    contains(FEELINGS, word)
}

pub(crate) fn temporal(word: &str) -> Option<Tense> {
    if contains(PAST_MARKERS, word) {
        Some(Tense::Past)
    } else if contains(FUTURE_MARKERS, word) {
        Some(Tense::Future)
    } else {
        None
    }
}

pub(crate) fn is_interrogative(word: &str) -> bool {
    contains(INTERROGATIVES, word)
}

pub(crate) fn is_auxiliary(word: &str) -> bool {
    contains(AUXILIARIES, word)
}
