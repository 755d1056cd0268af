//! Text sanitization — strips markup and decorative glyphs and resolves
//! key-binding tokens into speakable key names.
//!
//! Pure and idempotent: it runs on both the hot per-frame paths and the
//! one-shot announcement paths, so it must be safe to apply twice.

use crate::schema::bindings::KeyBindings;

/// The sanitization pipeline. Owns only the immutable binding table.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    bindings: KeyBindings,
}

impl Sanitizer {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Full pipeline: markup strip, binding substitution, glyph
    /// transliteration, whitespace collapse. Returns `None` when nothing
    /// speakable remains.
    pub fn sanitize(&self, input: &str) -> Option<String> {
        let stripped = strip_markup(input);
        let bound = self.resolve_bindings(&stripped);
        let plain = transliterate_glyphs(&bound);
        let collapsed = collapse_whitespace(&plain);
        if collapsed.is_empty() {
            None
        } else {
            Some(collapsed)
        }
    }

    fn resolve_bindings(&self, text: &str) -> String {
        if self.bindings.is_empty() {
            return text.to_string();
        }
        let mut out = text.to_string();
        for token in self.bindings.tokens_longest_first() {
            if let Some(key) = self.bindings.key_for(token) {
                if out.contains(token.as_str()) {
                    out = out.replace(token.as_str(), key);
                }
            }
        }
        out
    }
}

/// Strip `{{style|text}}` color markup, keeping the inner text. Nesting is
/// allowed; unbalanced or pipe-less braces pass through untouched.
pub fn strip_markup(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut depth = 0usize;
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '{' && i + 1 < chars.len() && chars[i + 1] == '{' {
            if let Some(pipe) = find_style_pipe(&chars, i + 2) {
                depth += 1;
                i = pipe + 1;
                continue;
            }
        }
        if depth > 0 && chars[i] == '}' && i + 1 < chars.len() && chars[i + 1] == '}' {
            depth -= 1;
            i += 2;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn find_style_pipe(chars: &[char], from: usize) -> Option<usize> {
    let mut j = from;
    while j < chars.len() {
        match chars[j] {
            '|' => return Some(j),
            '{' | '}' => return None,
            _ => j += 1,
        }
    }
    None
}

/// Replace decorative Unicode with nothing or a readable word: box drawing,
/// block elements, and geometric shapes become spaces; arrows become
/// "Up/Down/Left/Right Arrow".
pub fn transliterate_glyphs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\u{2190}' => out.push_str(" Left Arrow "),
            '\u{2191}' => out.push_str(" Up Arrow "),
            '\u{2192}' => out.push_str(" Right Arrow "),
            '\u{2193}' => out.push_str(" Down Arrow "),
            '\u{2500}'..='\u{257F}' | '\u{2580}'..='\u{259F}' | '\u{25A0}'..='\u{25FF}' => {
                out.push(' ')
            }
            _ => out.push(ch),
        }
    }
    out
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
