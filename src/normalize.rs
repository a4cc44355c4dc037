//! Text normalization and coarse script classification.
//!
//! [`normalize`] maps raw Unicode text onto a canonical character stream:
//! control characters are dropped, compatibility forms (full-width Latin,
//! half-width katakana, ideographic space) are folded via NFKC, look-alike
//! punctuation is mapped to ASCII, and whitespace runs collapse to one space.
//!
//! [`ScriptClass`] tags each character so n-grams never span scripts that
//! cannot share a token (Latin next to CJK, for example).

use unicode_normalization::UnicodeNormalization;

/// Coarse script class of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptClass {
    /// ASCII, Latin-1 and the Latin extension blocks.
    Latin,
    /// Han, kana, Hangul, Bopomofo and CJK punctuation.
    Cjk,
    /// Every other script (Cyrillic, Arabic, Devanagari, ...).
    Other,
}

impl ScriptClass {
    /// Whether two adjacent characters of these classes may share an n-gram.
    pub fn compatible(self, other: ScriptClass) -> bool {
        self == other
    }
}

/// Classify a character by Unicode block.
pub fn script_class(c: char) -> ScriptClass {
    match c {
        // Basic Latin, Latin-1, Extended-A/B, IPA, spacing modifiers, combining marks
        '\u{0000}'..='\u{036F}'
        // Latin Extended Additional
        | '\u{1E00}'..='\u{1EFF}'
        // Latin Extended-C/D/E
        | '\u{2C60}'..='\u{2C7F}'
        | '\u{A720}'..='\u{A7FF}'
        | '\u{AB30}'..='\u{AB6F}' => ScriptClass::Latin,
        // Hangul Jamo
        '\u{1100}'..='\u{11FF}'
        // CJK radicals, symbols & punctuation, kana, Bopomofo, compatibility Jamo
        | '\u{2E80}'..='\u{33FF}'
        // CJK Unified Ideographs Extension A
        | '\u{3400}'..='\u{4DBF}'
        // CJK Unified Ideographs
        | '\u{4E00}'..='\u{9FFF}'
        // Hangul syllables
        | '\u{AC00}'..='\u{D7AF}'
        // CJK compatibility ideographs
        | '\u{F900}'..='\u{FAFF}'
        // Half-width kana and Hangul
        | '\u{FF61}'..='\u{FFDC}'
        // Supplementary ideographic planes
        | '\u{20000}'..='\u{3FFFF}' => ScriptClass::Cjk,
        _ => ScriptClass::Other,
    }
}

/// Map look-alike punctuation onto its ASCII form.
fn canonical_punctuation(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => '\'',
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' | '\u{00AB}'
        | '\u{00BB}' => '"',
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' => '-',
        other => other,
    }
}

/// Normalize raw text into the canonical stream the n-gram extractor expects.
///
/// The function is pure and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    // Controls go first so their removal cannot create a new composition
    // opportunity after NFKC has run.
    let stripped: String = text
        .chars()
        .filter(|c| c.is_whitespace() || !c.is_control())
        .collect();

    let mut out = String::with_capacity(stripped.len());
    let mut prev_space = false;
    for c in stripped.nfkc() {
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
            continue;
        }
        out.push(canonical_punctuation(c));
        prev_space = false;
    }
    out
}
