//! Stop-word sets removed before vocabulary construction.
//!
//! A [`StopWords`] set is part of the vectorizer configuration rather than
//! a hard-coded list: the built-in English list is the default, but callers
//! can disable filtering or extend the list with domain terms.

use std::collections::HashSet;

/// Common English function words, matching the list shipped with mainstream
/// text-vectorization libraries.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// A set of terms excluded from the vocabulary entirely.
///
/// Terms are stored lowercase; lookups expect already-lowercased tokens,
/// which is what [`tokenize`](crate::vectorize::tokenize) produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Build a set from arbitrary words (lowercased on insert).
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// The built-in English list.
    pub fn english() -> Self {
        Self::new(ENGLISH_STOP_WORDS.iter())
    }

    /// An empty set: nothing is filtered.
    pub fn none() -> Self {
        Self::default()
    }

    /// Add more words to the set.
    pub fn extend<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(term)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_contains_function_words() {
        let sw = StopWords::english();
        for w in ["the", "a", "and", "of", "with", "yourselves"] {
            assert!(sw.contains(w), "expected stop word: {}", w);
        }
        assert!(!sw.contains("space"));
        assert!(!sw.contains("hero"));
    }

    #[test]
    fn test_english_list_has_no_duplicates() {
        let sw = StopWords::english();
        assert_eq!(sw.len(), ENGLISH_STOP_WORDS.len());
    }

    #[test]
    fn test_none_filters_nothing() {
        let sw = StopWords::none();
        assert!(sw.is_empty());
        assert!(!sw.contains("the"));
    }

    #[test]
    fn test_extend_lowercases() {
        let sw = StopWords::none().extend(["Movie", "FILM"]);
        assert!(sw.contains("movie"));
        assert!(sw.contains("film"));
        assert_eq!(sw.len(), 2);
    }
}
