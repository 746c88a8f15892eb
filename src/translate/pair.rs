use std::fmt;
use std::str::FromStr;

pub const PAIR_SEPARATOR: &str = "->";

/// Cache key for one translation direction, rendered as `src->tgt`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePairKey(String);

impl LanguagePairKey {
    pub fn new(source: &str, target: &str) -> Self {
        Self(format!("{}{}{}", source, PAIR_SEPARATOR, target))
    }
}

impl fmt::Display for LanguagePairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguagePairKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(PAIR_SEPARATOR) {
            Some((source, target)) if !source.trim().is_empty() && !target.trim().is_empty() => {
                Ok(Self::new(source.trim(), target.trim()))
            }
            _ => Err(format!(
                "Invalid language pair '{}', expected <source>{}<target>",
                s, PAIR_SEPARATOR
            )),
        }
    }
}
