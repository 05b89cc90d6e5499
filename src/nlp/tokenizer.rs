//! Line normalization and word tokenization
//!
//! A token starts and ends with a word character and may contain apostrophes
//! in between, so contractions like "don't" survive while quotes wrapped
//! around a word are dropped. Single word characters are tokens too.

use std::sync::LazyLock;

use regex::Regex;

/// `\w[\w']*\w` or a lone `\w`
static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w[\w']*\w|\w").expect("word pattern is valid"));

/// Right single quote (U+2019) as UTF-8 bytes misread as Windows-1252
pub const MISENCODED_APOSTROPHE: &str = "\u{e2}\u{20ac}\u{2122}";

/// Split text into word tokens without any other normalization
pub fn tokenize_words(text: &str) -> Vec<String> {
    WORD_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Normalize a single line and split it into tokens
///
/// A line of exactly one character yields `None`. Every other line has its
/// newlines removed, the mis-encoded apostrophe repaired, is lowercased and
/// then tokenized. An empty line yields an empty token list.
pub fn normalize_line(line: &str) -> Option<Vec<String>> {
    let mut chars = line.chars();
    if chars.next().is_some() && chars.next().is_none() {
        return None;
    }

    let cleaned = line
        .replace('\n', "")
        .replace(MISENCODED_APOSTROPHE, "'")
        .to_lowercase();

    Some(tokenize_words(&cleaned))
}

/// Tokenize a whole document line by line
///
/// Lines keep their trailing newline while being normalized, so blank lines
/// are skipped by the one-character rule of [`normalize_line`].
pub fn tokenize_document(text: &str) -> Vec<String> {
    text.split_inclusive('\n')
        .filter_map(normalize_line)
        .flatten()
        .collect()
}

/// Tokenize a document keeping one token list per non-skipped line
pub fn tokenize_document_lines(text: &str) -> Vec<Vec<String>> {
    text.split_inclusive('\n')
        .filter_map(normalize_line)
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

/// Whether `token` has the shape produced by the tokenizer
pub fn is_valid_token(token: &str) -> bool {
    WORD_REGEX
        .find(token)
        .map(|m| m.start() == 0 && m.end() == token.len())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_contraction_and_punctuation() {
        let tokens = normalize_line("Don't worry, be happy!\n").unwrap();
        assert_eq!(tokens, vec!["don't", "worry", "be", "happy"]);
    }

    #[test]
    fn test_single_character_line_is_none() {
        assert_eq!(normalize_line("\n"), None);
        assert_eq!(normalize_line("a"), None);
        assert_eq!(normalize_line("é"), None);
    }

    #[test]
    fn test_empty_line_is_empty_not_none() {
        assert_eq!(normalize_line(""), Some(vec![]));
    }

    #[test]
    fn test_two_character_line_is_processed() {
        assert_eq!(normalize_line("a\n"), Some(vec!["a".to_string()]));
        assert_eq!(normalize_line("!!"), Some(vec![]));
    }

    #[test]
    fn test_misencoded_apostrophe_is_repaired() {
        let line = format!("I{}m here", MISENCODED_APOSTROPHE);
        assert_eq!(normalize_line(&line).unwrap(), vec!["i'm", "here"]);
    }

    #[test]
    fn test_leading_and_trailing_apostrophes_dropped() {
        let tokens = normalize_line("'quoted' words''").unwrap();
        assert_eq!(tokens, vec!["quoted", "words"]);
    }

    #[test]
    fn test_single_letters_and_digits_are_tokens() {
        let tokens = normalize_line("a b 7 win $1000").unwrap();
        assert_eq!(tokens, vec!["a", "b", "7", "win", "1000"]);
    }

    #[test]
    fn test_unicode_word_characters() {
        let tokens = normalize_line("Café Über naïve").unwrap();
        assert_eq!(tokens, vec!["café", "über", "naïve"]);
    }

    #[test]
    fn test_every_token_matches_shape() {
        let lines = [
            "Hello, World!",
            "it's 'tricky' -- isn't it?\n",
            "''' '' ' x'y z''",
            "tabs\tand\r\nreturns",
            "",
        ];
        for line in lines {
            for token in normalize_line(line).unwrap() {
                assert!(is_valid_token(&token), "bad token {token:?} from {line:?}");
                assert!(!token.starts_with('\''));
                assert!(!token.ends_with('\''));
            }
        }
    }

    #[test]
    fn test_tokenize_document_skips_blank_lines() {
        let text = "Win a FREE prize\n\nClick now\n";
        assert_eq!(
            tokenize_document(text),
            vec!["win", "a", "free", "prize", "click", "now"]
        );
    }

    #[test]
    fn test_tokenize_document_lines() {
        let text = "first line\n\nsecond\n";
        assert_eq!(
            tokenize_document_lines(text),
            vec![vec!["first", "line"], vec!["second"]]
        );
    }

    #[test]
    fn test_is_valid_token() {
        assert!(is_valid_token("don't"));
        assert!(is_valid_token("a"));
        assert!(!is_valid_token("'a"));
        assert!(!is_valid_token("a b"));
        assert!(!is_valid_token(""));
    }
}
