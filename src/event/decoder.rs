//! Raw terminal bytes to structured input events.
//!
//! [`KeyDecoder`] accepts chunks of bytes exactly as they arrive from a
//! raw-mode input stream. A chunk may hold several keypresses or only part of
//! one; incomplete escape sequences and UTF-8 characters stay buffered until
//! the next chunk completes them, so the decoded event stream does not depend
//! on where chunk boundaries fall.
//!
//! Recognised input:
//! - CSI sequences: arrows, Home/End, Insert/Delete, PageUp/PageDown, F1-F12,
//!   Shift+Tab, with xterm modifier parameters (`ESC [ 1 ; 5 A`)
//! - SS3 sequences (`ESC O A`, `ESC O P`)
//! - Alt+key (`ESC` followed by a key)
//! - Control bytes (Ctrl+A..Ctrl+Z, Tab, Return, Backspace)
//! - X10 and SGR mouse reports, when mouse reporting is switched on
//!
//! Anything unrecognised degrades to one literal event per byte. Nothing is
//! ever dropped. A lone trailing `ESC` cannot be told apart from the start of
//! a sequence; the caller decides when to give up waiting and calls
//! [`KeyDecoder::flush`].

use super::input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};

const ESC: u8 = 0x1b;

/// Longest escape sequence kept pending before it is degraded to literals.
const MAX_SEQUENCE_LEN: usize = 32;

/// Outcome of decoding the front of the pending buffer.
enum Decoded {
    /// One event built from the first `n` bytes.
    Event(InputEvent, usize),
    /// The first `n` bytes form no known sequence; emit them as literals.
    Literal(usize),
    /// More bytes are needed to decide.
    Incomplete,
}

// ---------------------------------------------------------------------------
// KeyDecoder
// ---------------------------------------------------------------------------

/// Byte-buffered decoder from raw input to [`InputEvent`]s.
///
/// Decoding is deterministic and has no side effects beyond the pending
/// buffer: it never renders and never touches components.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
    mouse: bool,
}

impl KeyDecoder {
    /// Create a decoder with mouse reporting disabled.
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(MAX_SEQUENCE_LEN),
            mouse: false,
        }
    }

    /// Enable or disable decoding of mouse reports.
    ///
    /// While disabled, `ESC [ M ...` is treated as an unknown sequence.
    pub fn set_mouse_reporting(&mut self, enabled: bool) {
        self.mouse = enabled;
    }

    /// Whether mouse reports are being decoded.
    pub fn mouse_reporting(&self) -> bool {
        self.mouse
    }

    /// Whether bytes are buffered waiting for the rest of a sequence.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Feed one chunk of raw input and return every event it completes.
    pub fn feed(&mut self, data: &[u8]) -> Vec<InputEvent> {
        self.pending.extend_from_slice(data);
        let mut events = Vec::new();

        while !self.pending.is_empty() {
            match self.decode_front() {
                Decoded::Event(event, n) => {
                    events.push(event);
                    self.pending.drain(..n);
                }
                Decoded::Literal(n) => self.push_literals(n, &mut events),
                Decoded::Incomplete => break,
            }
        }

        events
    }

    /// Give up waiting for the rest of a sequence.
    ///
    /// A buffered `ESC` becomes an Escape keypress and the bytes after it are
    /// decoded again on their own, so `ESC [` flushes as Escape then `[`.
    pub fn flush(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        while !self.pending.is_empty() {
            match self.decode_front() {
                Decoded::Event(event, n) => {
                    events.push(event);
                    self.pending.drain(..n);
                }
                Decoded::Literal(n) => self.push_literals(n, &mut events),
                Decoded::Incomplete => self.push_literals(1, &mut events),
            }
        }

        events
    }

    /// Decode a complete buffer in one go: `feed` followed by `flush`.
    pub fn decode_all(&mut self, data: &[u8]) -> Vec<InputEvent> {
        let mut events = self.feed(data);
        events.extend(self.flush());
        events
    }

    // ── Internals ────────────────────────────────────────────────────

    fn push_literals(&mut self, n: usize, events: &mut Vec<InputEvent>) {
        let n = n.clamp(1, self.pending.len());
        if n > 1 || self.pending[0] == ESC {
            tracing::debug!(
                sequence = ?String::from_utf8_lossy(&self.pending[..n]),
                "unrecognised input sequence, degrading to literals"
            );
        }
        for &byte in &self.pending[..n] {
            let code = if byte == ESC {
                Key::Escape
            } else {
                Key::Char(byte as char)
            };
            let event = KeyEvent::new(code, Modifiers::NONE).with_sequence((byte as char).to_string());
            events.push(InputEvent::Key(event));
        }
        self.pending.drain(..n);
    }

    fn decode_front(&self) -> Decoded {
        let b = self.pending.as_slice();
        match b[0] {
            ESC => self.decode_escape(b),
            0x20..=0x7e => key_event(b, 1, Key::Char(b[0] as char), Modifiers::NONE),
            0x80..=0xff => decode_utf8(b),
            _ => {
                let (code, modifiers) = control_key(b[0]);
                key_event(b, 1, code, modifiers)
            }
        }
    }

    fn decode_escape(&self, b: &[u8]) -> Decoded {
        if b.len() < 2 {
            return Decoded::Incomplete;
        }
        match b[1] {
            b'[' => self.decode_csi(b),
            b'O' => decode_ss3(b),
            // ESC ESC: the first is a lone Escape, the second starts over.
            ESC => key_event(b, 1, Key::Escape, Modifiers::NONE),
            0x20..=0x7e => key_event(b, 2, Key::Char(b[1] as char), Modifiers::ALT),
            0x80..=0xff => key_event(b, 1, Key::Escape, Modifiers::NONE),
            control => {
                let (code, modifiers) = control_key(control);
                key_event(b, 2, code, modifiers | Modifiers::ALT)
            }
        }
    }

    fn decode_csi(&self, b: &[u8]) -> Decoded {
        if b.len() < 3 {
            return Decoded::Incomplete;
        }
        if self.mouse && b[2] == b'M' {
            return decode_x10_mouse(b);
        }
        if self.mouse && b[2] == b'<' {
            return decode_sgr_mouse(b);
        }

        // Parameter and intermediate bytes run until a final byte 0x40..=0x7e.
        let mut end = 2;
        while end < b.len().min(MAX_SEQUENCE_LEN) {
            match b[end] {
                0x20..=0x3f => end += 1,
                0x40..=0x7e => break,
                _ => return Decoded::Literal(end),
            }
        }
        if let Some(unfinished) = unfinished(b, end) {
            return unfinished;
        }

        let consumed = end + 1;
        let Some(params) = parse_params(&b[2..end]) else {
            return Decoded::Literal(consumed);
        };
        let modifiers = params
            .get(1)
            .map_or(Modifiers::NONE, |&m| Modifiers::from_xterm_param(m));

        let code = match b[end] {
            b'A' => Key::Up,
            b'B' => Key::Down,
            b'C' => Key::Right,
            b'D' => Key::Left,
            b'H' => Key::Home,
            b'F' => Key::End,
            b'P' => Key::F(1),
            b'Q' => Key::F(2),
            b'R' => Key::F(3),
            b'S' => Key::F(4),
            b'Z' => return key_event(b, consumed, Key::Tab, Modifiers::SHIFT),
            b'~' => match params.first().copied().unwrap_or(0) {
                1 | 7 => Key::Home,
                2 => Key::Insert,
                3 => Key::Delete,
                4 | 8 => Key::End,
                5 => Key::PageUp,
                6 => Key::PageDown,
                n @ 11..=15 => Key::F((n - 10) as u8),
                n @ 17..=21 => Key::F((n - 11) as u8),
                23 => Key::F(11),
                24 => Key::F(12),
                _ => return Decoded::Literal(consumed),
            },
            _ => return Decoded::Literal(consumed),
        };
        key_event(b, consumed, code, modifiers)
    }
}

// ---------------------------------------------------------------------------
// Sequence helpers
// ---------------------------------------------------------------------------

/// Verdict for a scan that stopped at `end` without finding a final byte.
///
/// The cap is checked against the scan position, never the buffer length,
/// so a sequence is cut at the same byte whether it arrived whole or split.
fn unfinished(b: &[u8], end: usize) -> Option<Decoded> {
    if end >= MAX_SEQUENCE_LEN {
        Some(Decoded::Literal(MAX_SEQUENCE_LEN))
    } else if end >= b.len() {
        Some(Decoded::Incomplete)
    } else {
        None
    }
}

fn key_event(b: &[u8], n: usize, code: Key, modifiers: Modifiers) -> Decoded {
    let event = KeyEvent::new(code, modifiers).with_sequence(String::from_utf8_lossy(&b[..n]));
    Decoded::Event(InputEvent::Key(event), n)
}

/// Map a C0 control byte (or DEL) to a key.
fn control_key(byte: u8) -> (Key, Modifiers) {
    match byte {
        0x00 => (Key::Char(' '), Modifiers::CTRL),
        0x08 | 0x7f => (Key::Backspace, Modifiers::NONE),
        b'\t' => (Key::Tab, Modifiers::NONE),
        b'\r' | b'\n' => (Key::Enter, Modifiers::NONE),
        0x01..=0x1a => (Key::Char((byte - 1 + b'a') as char), Modifiers::CTRL),
        0x1c..=0x1f => (Key::Char((byte + 0x40) as char), Modifiers::CTRL),
        other => (Key::Char(other as char), Modifiers::NONE),
    }
}

/// Parse `;`-separated decimal parameters. Empty fields default to 1.
/// Returns `None` for private markers (`?`, `>`, ...) and intermediates.
fn parse_params(raw: &[u8]) -> Option<Vec<u32>> {
    if raw.is_empty() {
        return Some(Vec::new());
    }
    raw.split(|&c| c == b';')
        .map(|field| {
            if field.is_empty() {
                return Some(1);
            }
            if !field.iter().all(u8::is_ascii_digit) {
                return None;
            }
            std::str::from_utf8(field).ok()?.parse().ok()
        })
        .collect()
}

fn decode_ss3(b: &[u8]) -> Decoded {
    if b.len() < 3 {
        return Decoded::Incomplete;
    }
    let code = match b[2] {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'H' => Key::Home,
        b'F' => Key::End,
        b'P' => Key::F(1),
        b'Q' => Key::F(2),
        b'R' => Key::F(3),
        b'S' => Key::F(4),
        _ => return Decoded::Literal(2),
    };
    key_event(b, 3, code, Modifiers::NONE)
}

fn decode_utf8(b: &[u8]) -> Decoded {
    let need = match b[0] {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return Decoded::Literal(1),
    };
    let available = b.len().min(need);
    if b[1..available].iter().any(|&c| c & 0xc0 != 0x80) {
        return Decoded::Literal(1);
    }
    if b.len() < need {
        return Decoded::Incomplete;
    }
    match std::str::from_utf8(&b[..need]).ok().and_then(|s| s.chars().next()) {
        Some(c) => key_event(b, need, Key::Char(c), Modifiers::NONE),
        None => Decoded::Literal(1),
    }
}

/// Button/modifier byte shared by the X10 and SGR encodings.
fn mouse_event(cb: u16, x: u16, y: u16, release: bool) -> InputEvent {
    let mut modifiers = Modifiers::NONE;
    if cb & 4 != 0 {
        modifiers = modifiers | Modifiers::SHIFT;
    }
    if cb & 8 != 0 {
        modifiers = modifiers | Modifiers::ALT;
    }
    if cb & 16 != 0 {
        modifiers = modifiers | Modifiers::CTRL;
    }

    let button = match cb & 3 {
        0 => Some(MouseBtn::Left),
        1 => Some(MouseBtn::Middle),
        2 => Some(MouseBtn::Right),
        _ => None,
    };

    let kind = if cb & 64 != 0 {
        if cb & 1 == 0 {
            MouseAction::ScrollUp
        } else {
            MouseAction::ScrollDown
        }
    } else if cb & 32 != 0 {
        match button {
            Some(btn) => MouseAction::Drag(btn),
            None => MouseAction::Moved,
        }
    } else {
        // X10 releases do not say which button went up.
        let btn = button.unwrap_or(MouseBtn::Left);
        if release || button.is_none() {
            MouseAction::Up(btn)
        } else {
            MouseAction::Down(btn)
        }
    };

    InputEvent::Mouse(MouseEvent { kind, x, y, modifiers })
}

/// `ESC [ M Cb Cx Cy`, each value offset by 32, coordinates 1-indexed.
fn decode_x10_mouse(b: &[u8]) -> Decoded {
    if b.len() < 6 {
        return Decoded::Incomplete;
    }
    let cb = u16::from(b[3].saturating_sub(32));
    let x = u16::from(b[4].saturating_sub(33));
    let y = u16::from(b[5].saturating_sub(33));
    Decoded::Event(mouse_event(cb, x, y, false), 6)
}

/// `ESC [ < Cb ; Cx ; Cy M` (press) or `... m` (release).
fn decode_sgr_mouse(b: &[u8]) -> Decoded {
    let mut end = 3;
    while end < b.len().min(MAX_SEQUENCE_LEN) {
        match b[end] {
            b'0'..=b'9' | b';' => end += 1,
            b'M' | b'm' => break,
            _ => return Decoded::Literal(end),
        }
    }
    if let Some(unfinished) = unfinished(b, end) {
        return unfinished;
    }

    let consumed = end + 1;
    let params = match parse_params(&b[3..end]) {
        Some(p) if p.len() == 3 => p,
        _ => return Decoded::Literal(consumed),
    };
    let clamp = |v: u32| u16::try_from(v.saturating_sub(1)).unwrap_or(u16::MAX);
    let cb = u16::try_from(params[0]).unwrap_or(0);
    Decoded::Event(
        mouse_event(cb, clamp(params[1]), clamp(params[2]), b[end] == b'm'),
        consumed,
    )
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(events: &[InputEvent]) -> Vec<(Key, Modifiers)> {
        events
            .iter()
            .filter_map(|e| match e {
                InputEvent::Key(k) => Some((k.code, k.modifiers)),
                _ => None,
            })
            .collect()
    }

    fn decode(bytes: &[u8]) -> Vec<(Key, Modifiers)> {
        keys(&KeyDecoder::new().decode_all(bytes))
    }

    const NONE: Modifiers = Modifiers::NONE;

    // ── Scenarios ────────────────────────────────────────────────────

    #[test]
    fn arrow_up_is_one_named_event() {
        let events = KeyDecoder::new().feed(b"\x1b[A");
        assert_eq!(events.len(), 1);
        let InputEvent::Key(ke) = &events[0] else {
            panic!("expected key event");
        };
        assert_eq!(ke.name(), "up");
        assert_eq!(ke.sequence, "\x1b[A");
    }

    #[test]
    fn printable_is_one_literal_event() {
        let events = KeyDecoder::new().feed(b"a");
        let InputEvent::Key(ke) = &events[0] else {
            panic!("expected key event");
        };
        assert_eq!(events.len(), 1);
        assert_eq!(ke.name(), "");
        assert_eq!(ke.literal(), Some('a'));
    }

    #[test]
    fn ctrl_c_decodes_as_interrupt() {
        let events = KeyDecoder::new().feed(b"\x03");
        let InputEvent::Key(ke) = &events[0] else {
            panic!("expected key event");
        };
        assert_eq!(ke.name(), "ctrl+c");
        assert!(ke.is_interrupt());
    }

    // ── Protocol table ───────────────────────────────────────────────

    #[test]
    fn cursor_and_navigation_keys() {
        assert_eq!(
            decode(b"\x1b[A\x1b[B\x1b[C\x1b[D\x1b[H\x1b[F\x1b[5~\x1b[6~"),
            vec![
                (Key::Up, NONE),
                (Key::Down, NONE),
                (Key::Right, NONE),
                (Key::Left, NONE),
                (Key::Home, NONE),
                (Key::End, NONE),
                (Key::PageUp, NONE),
                (Key::PageDown, NONE),
            ]
        );
    }

    #[test]
    fn tilde_keys() {
        assert_eq!(
            decode(b"\x1b[1~\x1b[2~\x1b[3~\x1b[4~\x1b[15~\x1b[24~"),
            vec![
                (Key::Home, NONE),
                (Key::Insert, NONE),
                (Key::Delete, NONE),
                (Key::End, NONE),
                (Key::F(5), NONE),
                (Key::F(12), NONE),
            ]
        );
    }

    #[test]
    fn function_keys_via_ss3_and_csi() {
        assert_eq!(
            decode(b"\x1bOP\x1bOS\x1b[11~\x1b[17~\x1b[21~\x1b[23~"),
            vec![
                (Key::F(1), NONE),
                (Key::F(4), NONE),
                (Key::F(1), NONE),
                (Key::F(6), NONE),
                (Key::F(10), NONE),
                (Key::F(11), NONE),
            ]
        );
    }

    #[test]
    fn ss3_arrows() {
        assert_eq!(decode(b"\x1bOA\x1bOD"), vec![(Key::Up, NONE), (Key::Left, NONE)]);
    }

    #[test]
    fn control_bytes() {
        assert_eq!(
            decode(b"\r\n\x7f\x08\t"),
            vec![
                (Key::Enter, NONE),
                (Key::Enter, NONE),
                (Key::Backspace, NONE),
                (Key::Backspace, NONE),
                (Key::Tab, NONE),
            ]
        );
    }

    #[test]
    fn ctrl_letters_map_to_letters() {
        assert_eq!(
            decode(b"\x01\x1a\x13"),
            vec![
                (Key::Char('a'), Modifiers::CTRL),
                (Key::Char('z'), Modifiers::CTRL),
                (Key::Char('s'), Modifiers::CTRL),
            ]
        );
        assert_eq!(decode(b"\x00"), vec![(Key::Char(' '), Modifiers::CTRL)]);
        assert_eq!(decode(b"\x1c"), vec![(Key::Char('\\'), Modifiers::CTRL)]);
    }

    #[test]
    fn modifier_parameters() {
        assert_eq!(
            decode(b"\x1b[1;5A\x1b[1;2C\x1b[3;3~\x1b[Z"),
            vec![
                (Key::Up, Modifiers::CTRL),
                (Key::Right, Modifiers::SHIFT),
                (Key::Delete, Modifiers::ALT),
                (Key::Tab, Modifiers::SHIFT),
            ]
        );
    }

    #[test]
    fn alt_prefix() {
        assert_eq!(
            decode(b"\x1bx\x1b\r"),
            vec![(Key::Char('x'), Modifiers::ALT), (Key::Enter, Modifiers::ALT)]
        );
    }

    #[test]
    fn double_escape_is_escape_then_sequence() {
        assert_eq!(decode(b"\x1b\x1b[A"), vec![(Key::Escape, NONE), (Key::Up, NONE)]);
    }

    #[test]
    fn utf8_characters() {
        assert_eq!(
            decode("é日🦀".as_bytes()),
            vec![
                (Key::Char('é'), NONE),
                (Key::Char('日'), NONE),
                (Key::Char('🦀'), NONE),
            ]
        );
    }

    // ── Pending bytes and flushing ───────────────────────────────────

    #[test]
    fn lone_escape_waits_then_flushes() {
        let mut decoder = KeyDecoder::new();
        assert!(decoder.feed(b"\x1b").is_empty());
        assert!(decoder.has_pending());
        assert_eq!(keys(&decoder.flush()), vec![(Key::Escape, NONE)]);
        assert!(!decoder.has_pending());
    }

    #[test]
    fn partial_csi_flushes_as_literals() {
        let mut decoder = KeyDecoder::new();
        assert!(decoder.feed(b"\x1b[").is_empty());
        assert_eq!(
            keys(&decoder.flush()),
            vec![(Key::Escape, NONE), (Key::Char('['), NONE)]
        );
    }

    #[test]
    fn unknown_sequence_degrades_to_literals() {
        assert_eq!(
            decode(b"\x1b[99X"),
            vec![
                (Key::Escape, NONE),
                (Key::Char('['), NONE),
                (Key::Char('9'), NONE),
                (Key::Char('9'), NONE),
                (Key::Char('X'), NONE),
            ]
        );
    }

    #[test]
    fn private_marker_sequence_degrades() {
        assert_eq!(decode(b"\x1b[?1u").len(), 5);
    }

    #[test]
    fn interrupted_sequence_keeps_both_parts() {
        // A control byte inside a CSI ends it; both halves survive.
        assert_eq!(
            decode(b"\x1b[1\ra"),
            vec![
                (Key::Escape, NONE),
                (Key::Char('['), NONE),
                (Key::Char('1'), NONE),
                (Key::Enter, NONE),
                (Key::Char('a'), NONE),
            ]
        );
    }

    #[test]
    fn overlong_sequence_is_not_held_forever() {
        let mut bytes = b"\x1b[".to_vec();
        bytes.extend(std::iter::repeat(b'1').take(MAX_SEQUENCE_LEN));
        let mut decoder = KeyDecoder::new();
        let events = decoder.feed(&bytes);
        assert_eq!(events.len(), bytes.len());
        assert!(!decoder.has_pending());
    }

    #[test]
    fn invalid_utf8_degrades() {
        assert_eq!(
            decode(&[0xff, b'a']),
            vec![(Key::Char('\u{ff}'), NONE), (Key::Char('a'), NONE)]
        );
        assert_eq!(decode(&[0xc3, b'a']).len(), 2);
    }

    // ── Chunk-boundary independence ──────────────────────────────────

    #[test]
    fn byte_at_a_time_matches_whole_buffer() {
        let inputs: [&[u8]; 6] = [
            b"\x1b[A\x1b[1;5Bhello\x1bOP\x03",
            "añ日\x1b[3~\r".as_bytes(),
            b"\x1b\x1b[5~\x1bx\t\x7f",
            b"\x1b[99X\x1b[Z",
            b"\x1b[<0;10;5M\x1b[<0;10;5m",
            b"\x1b[M !!q",
        ];
        for input in inputs {
            let mut whole = KeyDecoder::new();
            whole.set_mouse_reporting(true);
            let expected = whole.decode_all(input);

            let mut split = KeyDecoder::new();
            split.set_mouse_reporting(true);
            let mut got = Vec::new();
            for byte in input {
                got.extend(split.feed(std::slice::from_ref(byte)));
            }
            got.extend(split.flush());

            assert_eq!(got, expected, "input {input:?}");
        }
    }

    #[test]
    fn overlong_sequence_splits_the_same_way_in_any_chunking() {
        let mut padded = b"\x1b[".to_vec();
        padded.extend(std::iter::repeat(b'0').take(MAX_SEQUENCE_LEN + 4));
        padded.extend(b"1A");
        let mut sgr = b"\x1b[<".to_vec();
        sgr.extend(std::iter::repeat(b'0').take(MAX_SEQUENCE_LEN));
        sgr.extend(b";1;1M");

        for input in [padded, sgr] {
            let mut whole = KeyDecoder::new();
            whole.set_mouse_reporting(true);
            let expected = whole.decode_all(&input);

            let mut split = KeyDecoder::new();
            split.set_mouse_reporting(true);
            let mut got = Vec::new();
            for chunk in input.chunks(5) {
                got.extend(split.feed(chunk));
            }
            got.extend(split.flush());

            assert_eq!(got, expected);
            assert_eq!(expected.len(), input.len());
        }
    }

    #[test]
    fn sequence_ending_within_the_cap_still_decodes() {
        let mut bytes = b"\x1b[".to_vec();
        bytes.extend(std::iter::repeat(b'0').take(MAX_SEQUENCE_LEN - 4));
        bytes.extend(b"1A");
        assert_eq!(bytes.len(), MAX_SEQUENCE_LEN);
        assert_eq!(decode(&bytes), vec![(Key::Up, NONE)]);
    }

    // ── Mouse ────────────────────────────────────────────────────────

    fn mouse(bytes: &[u8]) -> Vec<MouseEvent> {
        let mut decoder = KeyDecoder::new();
        decoder.set_mouse_reporting(true);
        decoder
            .decode_all(bytes)
            .into_iter()
            .filter_map(|e| match e {
                InputEvent::Mouse(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn x10_press_and_release() {
        // Button 0 at column 1, row 1 (1-indexed, offset 32).
        let events = mouse(b"\x1b[M !!\x1b[M#!!");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, MouseAction::Down(MouseBtn::Left));
        assert_eq!((events[0].x, events[0].y), (0, 0));
        assert_eq!(events[1].kind, MouseAction::Up(MouseBtn::Left));
    }

    #[test]
    fn sgr_press_release_scroll_drag() {
        let events = mouse(b"\x1b[<2;20;10M\x1b[<2;20;10m\x1b[<64;1;1M\x1b[<65;1;1M\x1b[<32;5;6M\x1b[<35;7;8M");
        let kinds: Vec<MouseAction> = events.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MouseAction::Down(MouseBtn::Right),
                MouseAction::Up(MouseBtn::Right),
                MouseAction::ScrollUp,
                MouseAction::ScrollDown,
                MouseAction::Drag(MouseBtn::Left),
                MouseAction::Moved,
            ]
        );
        assert_eq!((events[0].x, events[0].y), (19, 9));
    }

    #[test]
    fn sgr_modifiers() {
        let events = mouse(b"\x1b[<16;3;3M");
        assert!(events[0].modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn mouse_reports_ignored_when_disabled() {
        let events = KeyDecoder::new().decode_all(b"\x1b[<0;1;1M");
        assert!(events.iter().all(|e| matches!(e, InputEvent::Key(_))));
        assert_eq!(events.len(), 9);
    }
}
