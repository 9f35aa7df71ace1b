//! Fixed-width text bars and string truncation shared by every view

use std::borrow::Cow;
use unicode_width::UnicodeWidthStr;

pub const FILLED: char = '█';
pub const EMPTY: char = '░';

/// Width of the daily activity bar
pub const ACTIVITY_BAR_WIDTH: usize = 30;

/// Number of filled cells for `value` out of `max` in a `width`-cell bar.
///
/// Zero when `max == 0`; never exceeds `width`.
#[inline]
pub fn filled_len(value: u64, max: u64, width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    let filled = (value as f64 / max as f64 * width as f64).floor() as usize;
    filled.min(width)
}

/// Magnitude bar: `width` codepoints, filled run then empty run.
pub fn render_bar(value: u64, max: u64, width: usize) -> String {
    let filled = filled_len(value, max, width);
    let mut bar = String::with_capacity(width * FILLED.len_utf8());
    bar.extend(std::iter::repeat_n(FILLED, filled));
    bar.extend(std::iter::repeat_n(EMPTY, width - filled));
    bar
}

/// Daily activity bar, always [`ACTIVITY_BAR_WIDTH`] cells and never styled
pub fn render_activity_bar(value: u64, max: u64) -> String {
    render_bar(value, max, ACTIVITY_BAR_WIDTH)
}

/// Shorten to exactly `n` characters with a trailing `...` when longer than `n`.
pub fn truncate(s: &str, n: usize) -> Cow<'_, str> {
    if s.chars().count() <= n {
        return Cow::Borrowed(s);
    }
    let keep = n.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    // n < 3 leaves no room for the full marker
    out.extend("...".chars().take(n - keep));
    Cow::Owned(out)
}

/// Left-align in a column of `width` terminal cells
pub fn pad_right(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    let mut out = String::with_capacity(s.len() + width.saturating_sub(used));
    out.push_str(s);
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}
