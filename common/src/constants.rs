//! Useful constants to have

/// Unicode's nabla symbol, used for gradients
pub const NABLA_SYM: char = '\u{2207}';

/// Unicode's right arrow
pub const ARROW_SYM: char = '\u{2192}';

/// Marks the current point on a terminal curve
pub const MARKER_SYM: char = '\u{25cf}';

/// Marks the optimum on a terminal curve
pub const OPTIMUM_SYM: char = '\u{2605}';

/// Go to the begining of the previous line
pub const ANSI_GOTO_PREV_LINE: &str = "\u{001b}[1F";

/// Clear current line
pub const ANSI_CLEAR_LINE: &str = "\u{001b}[K";
