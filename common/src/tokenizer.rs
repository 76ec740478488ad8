//! ポイント名のトークン分割
//!
//! 空白・`_`・`-`・`.` で区切り、さらに camelCase の境界
//! （小文字→大文字）で分割する。空のトークンは捨てる。

use regex::Regex;

/// ポイント名をトークンに分割
///
/// # Examples
/// ```
/// use dbo_mapper_common::tokenize;
///
/// assert_eq!(tokenize("Zone Temp SP"), vec!["Zone", "Temp", "SP"]);
/// assert_eq!(tokenize("SupplyAirTemp"), vec!["Supply", "Air", "Temp"]);
/// ```
pub fn tokenize(name: &str) -> Vec<String> {
    lazy_static::lazy_static! {
        static ref DELIMITER_RE: Regex = Regex::new(r"[\s_\-.]+").unwrap();
    }

    DELIMITER_RE
        .split(name)
        .filter(|part| !part.is_empty())
        .flat_map(split_camel_case)
        .collect()
}

/// camelCase境界で分割
fn split_camel_case(part: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in part.chars() {
        if prev_lower && ch.is_ascii_uppercase() && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        current.push(ch);
        prev_lower = ch.is_ascii_lowercase();
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_delimiters() {
        assert_eq!(tokenize("CHWS_Temp"), vec!["CHWS", "Temp"]);
        assert_eq!(tokenize("AHU-1.Fan Status"), vec!["AHU", "1", "Fan", "Status"]);
        assert_eq!(tokenize("__Zone  Temp--"), vec!["Zone", "Temp"]);
    }

    #[test]
    fn test_tokenize_camel_case() {
        assert_eq!(tokenize("DischgAirTemp"), vec!["Dischg", "Air", "Temp"]);
        assert_eq!(tokenize("ZoneTempSP"), vec!["Zone", "Temp", "SP"]);
        // 大文字の連続は分割しない
        assert_eq!(tokenize("CHWST"), vec!["CHWST"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" _-. ").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_order() {
        assert_eq!(
            tokenize("supplyFan_speedCmd"),
            vec!["supply", "Fan", "speed", "Cmd"]
        );
    }
}
