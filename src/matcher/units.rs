//! 単位文字列と計測量の対応
//!
//! 単位は小文字化した上で部分一致で判定する。表は上から順に評価する。

/// 単位からの計測量推定表（上から順に評価）
const INFERENCE_TABLE: &[(&str, &[&str])] = &[
    ("temperature", &["f", "c", "k"]),
    ("pressure", &["psi", "pa", "bar"]),
    ("flowrate", &["cfm", "l/s", "m3/h"]),
    ("flowvolume", &["gal", "liter"]),
    ("power", &["w", "kw", "mw"]),
    ("current", &["amp", "ma"]),
    ("voltage", &["volt", "v"]),
    ("speed", &["rpm"]),
    ("frequency", &["hz"]),
    ("percentage", &["%", "percent"]),
];

/// 計測量ごとの単位整合チェック表
const VALIDATION_TABLE: &[(&str, &[&str])] = &[
    ("temperature", &["f", "c", "k"]),
    ("pressure", &["psi", "pa", "bar"]),
    ("flowrate", &["cfm", "l/s", "m3"]),
    ("power", &["w", "kw"]),
    ("percentage", &["%", "percent"]),
];

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// 単位から計測量を推定
pub fn infer_measurement(units: &str) -> Option<&'static str> {
    let lower = units.to_lowercase();
    INFERENCE_TABLE
        .iter()
        .find(|(_, needles)| contains_any(&lower, needles))
        .map(|(measurement, _)| *measurement)
}

/// 単位が計測量と整合するか（チェック規則のない計測量は常に整合）
pub fn units_consistent(units: &str, measurement: &str) -> bool {
    let lower = units.to_lowercase();
    match VALIDATION_TABLE.iter().find(|(m, _)| *m == measurement) {
        Some((_, needles)) => contains_any(&lower, needles),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_measurement() {
        assert_eq!(infer_measurement("°F"), Some("temperature"));
        assert_eq!(infer_measurement("psi"), Some("pressure"));
        assert_eq!(infer_measurement("l/s"), Some("flowrate"));
        assert_eq!(infer_measurement("gal"), Some("flowvolume"));
        assert_eq!(infer_measurement("W"), Some("power"));
        assert_eq!(infer_measurement("rpm"), Some("speed"));
        assert_eq!(infer_measurement("Hz"), Some("frequency"));
        assert_eq!(infer_measurement("%"), Some("percentage"));
        assert_eq!(infer_measurement("ppm"), None);
    }

    #[test]
    fn test_inference_table_order() {
        // "kw" は先に評価される温度の "k" に一致する
        assert_eq!(infer_measurement("kW"), Some("temperature"));
        assert_eq!(infer_measurement("cfm"), Some("temperature"));
    }

    #[test]
    fn test_units_consistent() {
        assert!(units_consistent("°F", "temperature"));
        assert!(!units_consistent("psi", "temperature"));
        assert!(units_consistent("inH2O pa", "pressure"));
        assert!(units_consistent("m3/h", "flowrate"));
        assert!(!units_consistent("rpm", "percentage"));
    }

    #[test]
    fn test_units_without_rule_are_consistent() {
        assert!(units_consistent("anything", "speed"));
        assert!(units_consistent("", "concentration"));
    }
}
