//! Line layout engine for the prettify renderer.
//!
//! Everything here is pure string math so it can be tested without a
//! terminal. The renderer builds result lines of the shape
//!
//! ```text
//!   ✓ Install nginx ......................................... 123ms DONE
//! ```
//!
//! with the task name on the left, a gray dot leader filling the middle,
//! and timing plus status right-aligned to the terminal width. Names that
//! do not fit are wrapped at a word boundary or truncated.
//!
//! All width arithmetic is done on character counts of the *uncolored*
//! text; ANSI escape sequences are applied afterwards and must never
//! perturb alignment.

/// Narrowest terminal the layout will target.
pub const MIN_TERMINAL_WIDTH: usize = 60;
/// Columns reserved for the timing annotation ("1234ms" plus padding).
pub const TIMING_SPACE: usize = 8;
/// Columns reserved for the status label ("SKIPPED" is longest).
pub const STATUS_SPACE: usize = 8;
/// Width the status label is padded to.
pub const STATUS_LABEL_WIDTH: usize = 7;
/// Columns consumed by the "  ✓ " prefix and trailing space.
pub const PREFIX_SPACE: usize = 6;
/// Minimum number of leader dots between name and suffix.
pub const MIN_DOTS: usize = 3;

/// Characters a long task name may be broken at. Dots and slashes are
/// excluded so file paths never split mid-component.
const BREAK_CHARS: [char; 4] = [' ', '_', '-', ':'];

/// Fallback when the terminal size cannot be determined.
const FALLBACK_WIDTH: usize = 80;

/// How a task name fits into the available columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameLayout {
    /// Fits on one line (possibly after truncation).
    Single(String),
    /// Wrapped at a word boundary onto a continuation line.
    Wrapped { first: String, second: String },
}

/// Determine the terminal width to lay lines out against.
///
/// An explicit override wins; otherwise the attached terminal is
/// measured, falling back to 80 columns. The result never goes below
/// [`MIN_TERMINAL_WIDTH`].
pub fn terminal_width(override_width: Option<usize>) -> usize {
    let width = override_width.unwrap_or_else(|| {
        let (_, cols) = console::Term::stdout().size();
        if cols > 0 {
            cols as usize
        } else {
            FALLBACK_WIDTH
        }
    });
    width.max(MIN_TERMINAL_WIDTH)
}

/// Maximum columns available for the task name itself.
pub fn max_task_width(total_width: usize) -> usize {
    total_width.saturating_sub(PREFIX_SPACE + TIMING_SPACE + STATUS_SPACE)
}

/// Display width of a string in columns.
///
/// Counted in characters; wide glyphs are rare in task names and not
/// worth a full width table.
pub fn display_width(s: &str) -> usize {
    s.chars().count()
}

/// Lay out a task name within the given number of columns.
///
/// Names that fit are returned unchanged. Longer names wrap at the last
/// break character found in a window between the ideal width and
/// `max(25, width / 2)`, skipping break points that would strand a word
/// shorter than three characters. With no acceptable break point the
/// name is truncated with an ellipsis.
pub fn layout_task_name(name: &str, available: usize) -> NameLayout {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= available {
        return NameLayout::Single(name.to_string());
    }

    if let Some(break_at) = find_break_point(&chars, available) {
        let first: String = chars[..break_at].iter().collect();
        let second: String = chars[break_at..].iter().collect();
        return NameLayout::Wrapped {
            first: first.trim_end().to_string(),
            second: second.trim_start().to_string(),
        };
    }

    NameLayout::Single(truncate(&chars, available))
}

/// Find a break index inside the wrap window, searching backward from
/// the ideal width.
fn find_break_point(chars: &[char], available: usize) -> Option<usize> {
    if chars.len() < 2 || available < 4 {
        return None;
    }
    let search_start = available.saturating_sub(3).min(chars.len() - 1);
    let search_end = (available / 2).max(25);
    if search_start <= search_end {
        return None;
    }

    let mut i = search_start;
    while i > search_end {
        if BREAK_CHARS.contains(&chars[i]) {
            // A break right after a very short word reads badly
            if i > 3 && chars[i - 3..i].iter().any(|c| !c.is_whitespace()) {
                return Some(i);
            }
        }
        i -= 1;
    }
    None
}

/// Truncate to the available columns with a trailing ellipsis.
fn truncate(chars: &[char], available: usize) -> String {
    if available <= 3 {
        return "...".to_string();
    }
    let mut out: String = chars[..available - 3].iter().collect();
    out.push_str("...");
    out
}

/// Build the dot leader between the name prefix and the right-aligned
/// suffix, given their uncolored widths.
pub fn dot_leader(prefix_width: usize, suffix_width: usize, total_width: usize) -> String {
    let dots = total_width
        .saturating_sub(prefix_width + suffix_width)
        .max(MIN_DOTS);
    ".".repeat(dots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_terminal_width_override() {
        assert_eq!(terminal_width(Some(100)), 100);
        // Overrides are still clamped to the minimum
        assert_eq!(terminal_width(Some(20)), MIN_TERMINAL_WIDTH);
    }

    #[test]
    fn test_max_task_width() {
        assert_eq!(max_task_width(80), 80 - PREFIX_SPACE - TIMING_SPACE - STATUS_SPACE);
        assert_eq!(max_task_width(10), 0);
    }

    #[test]
    fn test_short_name_untouched() {
        let layout = layout_task_name("Install nginx", 58);
        assert_eq!(layout, NameLayout::Single("Install nginx".to_string()));
    }

    #[test]
    fn test_exact_fit_untouched() {
        let name = "x".repeat(58);
        let layout = layout_task_name(&name, 58);
        assert_eq!(layout, NameLayout::Single(name));
    }

    #[test]
    fn test_long_name_wraps_at_space() {
        let name = "Ensure that the application configuration directory exists with correct permissions";
        match layout_task_name(name, 58) {
            NameLayout::Wrapped { first, second } => {
                assert!(display_width(&first) <= 58);
                assert!(!first.ends_with(' '));
                assert!(!second.starts_with(' '));
                // Nothing lost besides the boundary whitespace
                let rejoined = format!("{first} {second}");
                assert_eq!(rejoined, name);
            }
            other => panic!("expected wrap, got {other:?}"),
        }
    }

    #[test]
    fn test_unbreakable_name_truncates() {
        let name = "a".repeat(120);
        match layout_task_name(&name, 58) {
            NameLayout::Single(s) => {
                assert_eq!(display_width(&s), 58);
                assert!(s.ends_with("..."));
            }
            other => panic!("expected truncation, got {other:?}"),
        }
    }

    #[test]
    fn test_path_not_broken_at_slash_or_dot() {
        let name = format!(
            "Copy /etc/nginx/sites-available/very.long.example.com.conf {}",
            "x".repeat(40)
        );
        if let NameLayout::Wrapped { first, .. } = layout_task_name(&name, 58) {
            // Break chars exclude '.' and '/', so the filename stays whole
            assert!(!first.ends_with('.'));
            assert!(!first.ends_with('/'));
        }
    }

    #[test]
    fn test_break_after_whitespace_run_skipped() {
        // The dash at index 50 and the spaces right before it sit inside
        // the search window, but each is preceded by whitespace only;
        // the break lands on the last space still touching the x-run
        let name = format!("{}    -{}", "x".repeat(46), "y".repeat(20));
        match layout_task_name(&name, 58) {
            NameLayout::Wrapped { first, second } => {
                assert_eq!(first, "x".repeat(46));
                assert_eq!(second, format!("-{}", "y".repeat(20)));
            }
            other => panic!("expected wrap, got {other:?}"),
        }
    }

    #[test]
    fn test_wrap_prefers_later_break() {
        let name = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        match layout_task_name(name, 58) {
            NameLayout::Wrapped { first, .. } => {
                // The break search starts near the ideal width, so the
                // first fragment should use most of the line
                assert!(display_width(&first) > 58 / 2);
            }
            other => panic!("expected wrap, got {other:?}"),
        }
    }

    #[test]
    fn test_dot_leader_fills_line() {
        let dots = dot_leader(20, 14, 80);
        assert_eq!(dots.len(), 80 - 20 - 14);
    }

    #[test]
    fn test_dot_leader_minimum() {
        let dots = dot_leader(70, 14, 80);
        assert_eq!(dots.len(), MIN_DOTS);
    }

    #[test]
    fn test_unicode_name_width() {
        // Multi-byte characters count once
        assert_eq!(display_width("héllo wörld"), 11);
        let layout = layout_task_name("héllo wörld", 58);
        assert_eq!(layout, NameLayout::Single("héllo wörld".to_string()));
    }
}
