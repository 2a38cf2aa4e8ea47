//! Terminal-safe text.
//!
//! Fragment files are arbitrary input. Their text ends up written cell by cell
//! into the terminal, where an embedded escape sequence could move the cursor,
//! rewrite the screen or reach the clipboard (OSC 52). Everything a renderer
//! displays goes through [`sanitize_terminal_text`] first.

use std::borrow::Cow;
use std::iter::Peekable;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const DEL: char = '\x7f';
/// Single-character C1 form of `ESC [`.
const C1_CSI: char = '\u{009b}';

/// Strip escape sequences and control characters, keeping `\n`, `\t` and `\r`.
///
/// Borrows when the input is already clean.
///
/// ```
/// use quill_types::sanitize_terminal_text;
///
/// assert_eq!(sanitize_terminal_text("plain"), "plain");
/// assert_eq!(sanitize_terminal_text("a\x1b[2Jb"), "ab");
/// ```
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_unsafe) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESC => skip_escape(&mut chars),
            C1_CSI => skip_csi(&mut chars),
            c if is_unsafe(c) => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn is_unsafe(c: char) -> bool {
    match c {
        '\n' | '\t' | '\r' => false,
        c if c <= '\x1f' => true,
        DEL => true,
        c => ('\u{0080}'..='\u{009f}').contains(&c),
    }
}

/// Consume the sequence following an `ESC`.
fn skip_escape<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    let Some(&kind) = chars.peek() else {
        return;
    };
    match kind {
        '[' => {
            chars.next();
            skip_csi(chars);
        }
        // OSC ends at BEL or ST; DCS, PM and APC only at ST
        ']' => {
            chars.next();
            skip_string(chars, true);
        }
        'P' | '^' | '_' => {
            chars.next();
            skip_string(chars, false);
        }
        // charset and line attribute selectors carry one argument
        '(' | ')' | '*' | '+' | '#' | ' ' => {
            chars.next();
            chars.next();
        }
        '7' | '8' | 'c' | 'D' | 'E' | 'H' | 'M' | 'N' | 'O' | 'Z' | '=' | '>' | '<' => {
            chars.next();
        }
        _ => {}
    }
}

/// Parameter and intermediate bytes, then one final byte.
fn skip_csi<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    while let Some(&c) = chars.peek() {
        if ('\x40'..='\x7e').contains(&c) {
            chars.next();
            return;
        }
        if !('\x20'..='\x3f').contains(&c) {
            return;
        }
        chars.next();
    }
}

fn skip_string<I: Iterator<Item = char>>(chars: &mut Peekable<I>, bel_terminates: bool) {
    while let Some(c) = chars.next() {
        if bel_terminates && c == BEL {
            return;
        }
        if c == ESC && chars.peek() == Some(&'\\') {
            chars.next();
            return;
        }
    }
}
