//! Input filtering applied to every form keystroke.

/// Which characters a field accepts after tag stripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharFilter {
    Any,
    /// ASCII digits only.
    Digits,
    /// ASCII letters and whitespace.
    Letters,
}

impl CharFilter {
    fn accepts(self, c: char) -> bool {
        match self {
            CharFilter::Any => true,
            CharFilter::Digits => c.is_ascii_digit(),
            CharFilter::Letters => c.is_ascii_alphabetic() || c.is_whitespace(),
        }
    }
}

pub fn strip_tags(raw: &str) -> String {
    raw.chars().filter(|c| *c != '<' && *c != '>').collect()
}

/// Strip `<`/`>`, drop characters the filter rejects, then cap the length in chars.
pub fn clean(raw: &str, filter: CharFilter, max_len: Option<usize>) -> String {
    let stripped = strip_tags(raw);
    let kept = stripped.chars().filter(|c| filter.accepts(*c));
    match max_len {
        Some(n) => kept.take(n).collect(),
        None => kept.collect(),
    }
}
