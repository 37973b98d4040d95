use std::fmt;

const CJK_UNIFIED_IDEOGRAPHS: std::ops::RangeInclusive<char> = '\u{4e00}'..='\u{9fff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Zh,
    En,
}

impl Language {
    /// ISO 639-1 code as sent on the wire
    pub fn code(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    pub from: Language,
    pub to: Language,
}

impl Direction {
    /// Any CJK ideograph makes the whole text Chinese; everything else is English.
    pub fn detect(text: &str) -> Self {
        if contains_cjk(text) {
            Self {
                from: Language::Zh,
                to: Language::En,
            }
        } else {
            Self {
                from: Language::En,
                to: Language::Zh,
            }
        }
    }

    /// Direction used by connectivity probes
    pub fn probe() -> Self {
        Self {
            from: Language::En,
            to: Language::Zh,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| CJK_UNIFIED_IDEOGRAPHS.contains(&c))
}

/// First `max` characters of `text` for log lines
pub(crate) fn preview(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_text_goes_to_english() {
        let direction = Direction::detect("你好，世界");
        assert_eq!(direction.from, Language::Zh);
        assert_eq!(direction.to, Language::En);
    }

    #[test]
    fn latin_text_goes_to_chinese() {
        let direction = Direction::detect("Hello, world");
        assert_eq!(direction, Direction::probe());
    }

    #[test]
    fn one_ideograph_is_enough() {
        assert_eq!(Direction::detect("version 2 发布").from, Language::Zh);
    }

    #[test]
    fn range_bounds() {
        assert!(contains_cjk("\u{4e00}"));
        assert!(contains_cjk("\u{9fff}"));
        assert!(!contains_cjk("\u{4dff}"));
        assert!(!contains_cjk("\u{a000}"));
        // Hiragana and Hangul are outside the ideograph block
        assert!(!contains_cjk("ひらがな"));
        assert!(!contains_cjk("한국어"));
    }

    #[test]
    fn preview_counts_chars() {
        assert_eq!(preview("abc", 5), "abc");
        assert_eq!(preview("你好世界", 2), "你好...");
    }
}
