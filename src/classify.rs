//! Escape-sequence boundary classification.
//!
//! Finds where an escape run ends and which category it belongs to, without
//! interpreting what the sequence means. Recognizers are pure functions over
//! `(payload, pos)` tried in a fixed priority order; the first match wins,
//! never the longest.

/// The escape introducer byte.
pub const ESC: u8 = 0x1b;

/// Maximum preview length for plain text, and the lookahead window used when
/// no recognizer matches an escape run.
pub const MAX_PREVIEW: usize = 15;

const BEL: u8 = 0x07;

/// Category tags for classified sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    /// Control Sequence Introducer (`ESC [`)
    Csi,
    /// Operating System Command (`ESC ]`)
    Osc,
    /// Privacy Message (`ESC ^`)
    Pm,
    /// Device Control String (`ESC P`)
    Dcs,
    /// Application Program Command (`ESC _`)
    Apc,
    /// DEC-private two-byte sequence (`ESC # digit`)
    Dec,
    /// Character-set control (`ESC %`)
    Charset,
    /// Graphic character set designation (`ESC (`, `ESC )`, `ESC *`, `ESC +`)
    Graphic,
    /// Generic single-byte escape (`ESC 7`, `ESC =`, ...)
    Escape,
    /// No recognizer matched; the end offset is a fixed lookahead window.
    Unknown,
}

impl SequenceKind {
    /// Tag shown in the operator output.
    pub fn tag(self) -> &'static str {
        match self {
            SequenceKind::Csi => "CSI",
            SequenceKind::Osc => "OSC",
            SequenceKind::Pm => "PM",
            SequenceKind::Dcs => "DCS",
            SequenceKind::Apc => "APC",
            SequenceKind::Dec => "DEC",
            SequenceKind::Charset => "CHR",
            SequenceKind::Graphic => "GRA",
            SequenceKind::Escape | SequenceKind::Unknown => "ESC",
        }
    }
}

/// Result of classifying one escape run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: SequenceKind,
    /// Exclusive end offset of the sequence, terminator included.
    pub end: usize,
}

/// A recognizer inspects `payload` starting at `pos` (the byte after ESC) and
/// returns the exclusive end offset if the run belongs to its category.
type Recognizer = fn(&[u8], usize) -> Option<usize>;

/// Priority-ordered recognizer table. Order matters: the generic single-byte
/// entry overlaps every introducer above it and must stay last.
const RECOGNIZERS: &[(SequenceKind, Recognizer)] = &[
    (SequenceKind::Csi, csi),
    (SequenceKind::Osc, osc),
    (SequenceKind::Pm, pm),
    (SequenceKind::Dcs, dcs),
    (SequenceKind::Apc, apc),
    (SequenceKind::Dec, dec_private),
    (SequenceKind::Charset, charset),
    (SequenceKind::Graphic, graphic),
    (SequenceKind::Escape, single_byte),
];

/// Classify the escape run starting at `pos`, where `payload[pos - 1]` is the
/// ESC byte. When nothing matches, falls back to [`SequenceKind::Unknown`]
/// with a fixed lookahead window; the caller surfaces that as a diagnostic.
pub fn classify(payload: &[u8], pos: usize) -> Classification {
    for (kind, recognize) in RECOGNIZERS {
        if let Some(end) = recognize(payload, pos) {
            return Classification { kind: *kind, end };
        }
    }

    Classification {
        kind: SequenceKind::Unknown,
        end: (pos + MAX_PREVIEW).min(payload.len()),
    }
}

fn csi(payload: &[u8], pos: usize) -> Option<usize> {
    if *payload.get(pos)? != b'[' {
        return None;
    }
    let mut i = pos + 1;
    while let Some(&b) = payload.get(i) {
        match b {
            // parameter and intermediate bytes
            0x20..=0x3f => i += 1,
            // final byte
            0x40..=0x7e => return Some(i + 1),
            _ => return None,
        }
    }
    None
}

/// Shared ending for the string-style categories: the body runs until a BEL
/// or an ST (`ESC \`), either of which is consumed.
fn string_terminated(payload: &[u8], introducer: u8, pos: usize) -> Option<usize> {
    if *payload.get(pos)? != introducer {
        return None;
    }
    let mut i = pos + 1;
    while let Some(&b) = payload.get(i) {
        match b {
            BEL => return Some(i + 1),
            ESC if payload.get(i + 1) == Some(&b'\\') => return Some(i + 2),
            _ => i += 1,
        }
    }
    None
}

fn osc(payload: &[u8], pos: usize) -> Option<usize> {
    string_terminated(payload, b']', pos)
}

fn pm(payload: &[u8], pos: usize) -> Option<usize> {
    string_terminated(payload, b'^', pos)
}

fn dcs(payload: &[u8], pos: usize) -> Option<usize> {
    string_terminated(payload, b'P', pos)
}

fn apc(payload: &[u8], pos: usize) -> Option<usize> {
    string_terminated(payload, b'_', pos)
}

fn dec_private(payload: &[u8], pos: usize) -> Option<usize> {
    if *payload.get(pos)? == b'#' && payload.get(pos + 1)?.is_ascii_digit() {
        Some(pos + 2)
    } else {
        None
    }
}

fn charset(payload: &[u8], pos: usize) -> Option<usize> {
    two_byte_designator(payload, &[b'%'], pos)
}

fn graphic(payload: &[u8], pos: usize) -> Option<usize> {
    two_byte_designator(payload, b"()*+", pos)
}

fn two_byte_designator(payload: &[u8], introducers: &[u8], pos: usize) -> Option<usize> {
    if introducers.contains(payload.get(pos)?) && matches!(*payload.get(pos + 1)?, 0x20..=0x7e) {
        Some(pos + 2)
    } else {
        None
    }
}

fn single_byte(payload: &[u8], pos: usize) -> Option<usize> {
    match *payload.get(pos)? {
        0x30..=0x7e => Some(pos + 1),
        _ => None,
    }
}
