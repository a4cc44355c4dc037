//! Lazy n-gram extraction over normalized text.
//!
//! A rolling window holds up to three consecutive characters. The window is
//! reset on whitespace and whenever adjacent characters belong to incompatible
//! script classes, so no n-gram spans a word boundary or a script change.
//! Every character that enters the window yields the n-grams of length 1, 2
//! and 3 ending at it (as far as the window is filled).

use std::str::CharIndices;

use unicode_normalization::char::is_combining_mark;

use crate::normalize::{ScriptClass, script_class};

/// Longest n-gram produced by the extractor.
pub const MAX_NGRAM_LEN: usize = 3;

/// One n-gram: a slice of the source text plus its length in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NGram<'a> {
    pub text: &'a str,
    pub len: usize,
}

/// Iterator over the n-grams of a normalized string.
///
/// Cloning the iterator (or calling [`ngrams`] again) restarts the sequence.
#[derive(Debug, Clone)]
pub struct NGrams<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
    /// Byte offsets where the last, second-to-last and third-to-last chars start.
    starts: [usize; MAX_NGRAM_LEN],
    /// Number of valid entries in `starts`.
    filled: usize,
    /// Byte offset just past the newest char.
    end: usize,
    last: char,
    prev_class: Option<ScriptClass>,
    next_len: usize,
}

/// Extract the n-grams of `text`, which should already be normalized.
pub fn ngrams(text: &str) -> NGrams<'_> {
    NGrams::new(text)
}

impl<'a> NGrams<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices(),
            starts: [0; MAX_NGRAM_LEN],
            filled: 0,
            end: 0,
            last: ' ',
            prev_class: None,
            next_len: 1,
        }
    }

    fn push(&mut self, offset: usize, c: char) {
        // A combining mark belongs to the letter it decorates.
        let class = match self.prev_class {
            Some(prev) if is_combining_mark(c) => prev,
            _ => script_class(c),
        };
        if self.prev_class.is_some_and(|prev| !prev.compatible(class)) {
            self.filled = 0;
        }
        self.starts.copy_within(0..MAX_NGRAM_LEN - 1, 1);
        self.starts[0] = offset;
        self.filled = (self.filled + 1).min(MAX_NGRAM_LEN);
        self.end = offset + c.len_utf8();
        self.last = c;
        self.prev_class = Some(class);
        self.next_len = 1;
    }
}

impl<'a> Iterator for NGrams<'a> {
    type Item = NGram<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.next_len <= self.filled {
                let len = self.next_len;
                self.next_len += 1;
                // A lone digit or punctuation mark carries no language signal.
                if len == 1 && !self.last.is_alphabetic() {
                    continue;
                }
                return Some(NGram {
                    text: &self.text[self.starts[len - 1]..self.end],
                    len,
                });
            }

            let (offset, c) = self.chars.next()?;
            if c.is_whitespace() {
                self.filled = 0;
                self.prev_class = None;
                continue;
            }
            self.push(offset, c);
        }
    }
}
