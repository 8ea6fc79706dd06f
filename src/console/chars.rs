//! Control characters understood by the read loop and its handlers.

/// Interrupt (Ctrl-C).
pub const CTRL_C: char = '\u{3}';

/// End of transmission (Ctrl-D).
pub const CTRL_D: char = '\u{4}';

/// Suspend (Ctrl-Z).
pub const CTRL_Z: char = '\u{1a}';

pub const BACKSPACE: char = '\u{8}';

/// Sent by most terminals for the backspace key; normalised to [`BACKSPACE`].
pub const DELETE: char = '\u{7f}';

pub const TAB: char = '\t';

pub const NEWLINE: char = '\n';

/// Sent by raw terminals for Enter; normalised to [`NEWLINE`].
pub const CARRIAGE_RETURN: char = '\r';

/// Sentinel returned by a [`CharSource`](super::CharSource) once input is
/// exhausted.
///
/// U+FFFF is a Unicode noncharacter, so no terminal will ever send it.
pub const END_OF_INPUT: char = '\u{ffff}';

/// Whether `c` ends a session without committing a line.
pub fn is_cancel(c: char) -> bool {
    matches!(c, CTRL_C | CTRL_D | CTRL_Z)
}

/// Whether `c` produces a visible glyph.
pub fn is_printable(c: char) -> bool {
    !c.is_control() && c != END_OF_INPUT
}
