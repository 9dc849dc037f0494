use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Format a money amount with thousand separators and 2 decimal places.
/// e.g. `380000` → `"$380,000.00"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let sign = if val.is_sign_negative() && !val.is_zero() { "-" } else { "" };
    let formatted = format!("{:.2}", val.abs());
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    format!("{sign}${}.{dec_part}", group_thousands(int_part))
}

/// Format a quantity without trailing zeros, grouped like an amount.
/// e.g. `1200.50` → `"1,200.5"`
pub(crate) fn format_quantity(val: Decimal) -> String {
    let text = val.normalize().to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    match digits.split_once('.') {
        Some((int_part, frac)) => format!("{sign}{}.{frac}", group_thousands(int_part)),
        None => format!("{sign}{}", group_thousands(digits)),
    }
}

fn group_thousands(digits: &str) -> String {
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",")
}

/// `part` as a whole-number percentage of `whole`; 0 when `whole` is not positive.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> u16 {
    if whole <= Decimal::ZERO || part <= Decimal::ZERO {
        return 0;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .and_then(|pct| pct.round().to_u16())
        .map_or(999, |pct| pct.min(999))
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max - 1).collect();
    format!("{truncated}…")
}

/// Expand a leading `~/` to `$HOME`.
pub(crate) fn shellexpand(path: &str) -> String {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/{rest}")
        }
        None => path.to_string(),
    }
}

/// Cursor over a scrolling list; `scroll` is the first visible row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ListCursor {
    pub(crate) index: usize,
    pub(crate) scroll: usize,
}

impl ListCursor {
    pub(crate) fn down(&mut self, len: usize, page: usize) {
        if self.index + 1 < len {
            self.index += 1;
            self.follow(page);
        }
    }

    pub(crate) fn up(&mut self) {
        self.index = self.index.saturating_sub(1);
        if self.index < self.scroll {
            self.scroll = self.index;
        }
    }

    pub(crate) fn top(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn bottom(&mut self, len: usize, page: usize) {
        if len > 0 {
            self.index = len - 1;
            self.follow(page);
        }
    }

    /// Keep the cursor inside `0..len` after the list shrinks or grows.
    pub(crate) fn clamp(&mut self, len: usize, page: usize) {
        if len == 0 {
            self.top();
            return;
        }
        self.index = self.index.min(len - 1);
        self.scroll = self.scroll.min(self.index);
        self.follow(page);
    }

    fn follow(&mut self, page: usize) {
        let page = page.max(1);
        if self.index >= self.scroll + page {
            self.scroll = self.index + 1 - page;
        }
    }
}
