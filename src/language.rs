use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BotError;

/// Languages this bot translates between.
///
/// Only the primary subtag takes part in comparisons, so `zh`, `zh-CN` and
/// `zh-TW` all parse to [`LanguageCode::ChineseSimplified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageCode {
    ChineseSimplified,
    English,
}

impl LanguageCode {
    /// Full tag, as used in cache keys and log lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ChineseSimplified => "zh-CN",
            Self::English => "en",
        }
    }

    /// ISO 639-1 code handed to translation providers.
    pub fn primary_subtag(&self) -> &'static str {
        match self {
            Self::ChineseSimplified => "zh",
            Self::English => "en",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::ChineseSimplified => Self::English,
            Self::English => Self::ChineseSimplified,
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LanguageCode {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s.trim().split(['-', '_']).next().unwrap_or_default();
        match primary.to_lowercase().as_str() {
            "zh" => Ok(Self::ChineseSimplified),
            "en" => Ok(Self::English),
            _ => Err(BotError::Config(format!(
                "Unsupported language code '{}'. Valid codes: zh-CN, en",
                s
            ))),
        }
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = BotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.tag().to_string()
    }
}

/// True when `c` is in one of the CJK ideograph blocks used for Chinese:
/// Unified Ideographs, Extension A, or Compatibility Ideographs.
fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

pub fn contains_chinese(text: &str) -> bool {
    text.chars().any(is_cjk_ideograph)
}

/// Binary heuristic: any CJK ideograph makes the text Chinese, everything
/// else (including empty input) is English.
pub fn classify(text: &str) -> LanguageCode {
    if contains_chinese(text) {
        LanguageCode::ChineseSimplified
    } else {
        LanguageCode::English
    }
}
