//! 特徴量抽出
//!
//! (ポイント名, 機器種別) から21次元の特徴ベクトルを作る。純粋関数で、
//! 同じ入力には常に同じベクトルを返す。
//!
//! | 次元 | 内容 |
//! |------|------|
//! | 0-1 | 名前の長さ、トークン数 |
//! | 2-11 | 名前のキーワード有無 |
//! | 12-15 | 位置（吐出・還気・混合・外気） |
//! | 16-20 | 機器種別 |

/// 特徴ベクトルの次元数
pub const FEATURE_COUNT: usize = 21;

pub type FeatureVector = [f64; FEATURE_COUNT];

/// 各次元の名前（診断用）
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "name_length",
    "token_count",
    "has_temp",
    "has_pressure",
    "has_flow",
    "has_fan",
    "has_damper",
    "has_valve",
    "has_setpoint",
    "has_sensor",
    "has_command",
    "has_status",
    "is_discharge",
    "is_return",
    "is_mixed",
    "is_outside",
    "equip_ahu",
    "equip_vav",
    "equip_chiller",
    "equip_boiler",
    "equip_fcu",
];

const NAME_KEYWORDS: [&[&str]; 10] = [
    &["temp", "temperature"],
    &["press", "pressure"],
    &["flow"],
    &["fan", "supply", "return", "exhaust"],
    &["damper", "dmp"],
    &["valve", "vlv"],
    &["setpoint", "sp", "set"],
    &["sensor", "snsr"],
    &["command", "cmd"],
    &["status", "sts"],
];

const POSITION_KEYWORDS: [&[&str]; 4] = [
    &["discharge", "dat", "supply"],
    &["return", "rat"],
    &["mixed", "mat"],
    &["outside", "oat", "outdoor"],
];

const EQUIPMENT_KEYWORDS: [&[&str]; 5] = [
    &["ahu"],
    &["vav"],
    &["chiller", "chws"],
    &["boiler", "hws"],
    &["fcu", "fan_coil"],
];

/// 特徴ベクトルを抽出
pub fn extract_features(point_name: &str, equipment_type: &str) -> FeatureVector {
    let lower = point_name.to_lowercase();
    let equip_lower = equipment_type.to_lowercase();

    let mut features = [0.0; FEATURE_COUNT];
    features[0] = lower.chars().count() as f64;
    features[1] = count_tokens(point_name) as f64;

    let indicators = NAME_KEYWORDS
        .iter()
        .chain(POSITION_KEYWORDS.iter())
        .map(|keywords| contains_any(&lower, keywords))
        .chain(
            EQUIPMENT_KEYWORDS
                .iter()
                .map(|keywords| contains_any(&equip_lower, keywords)),
        );

    for (slot, present) in features[2..].iter_mut().zip(indicators) {
        *slot = if present { 1.0 } else { 0.0 };
    }

    features
}

/// トークン数を数える
///
/// 1 + 区切り文字（`_`・空白・`-`）の数 + 小文字→大文字の境界数
///
/// 境界は小文字化する前の名前で数える（"SupplyAirTemp" は 3、"supplyairtemp" は 1）。
pub fn count_tokens(name: &str) -> usize {
    let mut count = 1;
    let mut prev_lower = false;

    for ch in name.chars() {
        if ch == '_' || ch == ' ' || ch == '-' || (prev_lower && ch.is_uppercase()) {
            count += 1;
        }
        prev_lower = ch.is_lowercase();
    }

    count
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names_match_dimension() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        assert_eq!(
            NAME_KEYWORDS.len() + POSITION_KEYWORDS.len() + EQUIPMENT_KEYWORDS.len() + 2,
            FEATURE_COUNT
        );
    }

    #[test]
    fn test_count_tokens() {
        assert_eq!(count_tokens("DAT"), 1);
        assert_eq!(count_tokens("Zone Temp SP"), 3);
        assert_eq!(count_tokens("CHWS_Temp"), 2);
        assert_eq!(count_tokens("SupplyAirTemp"), 3);
        assert_eq!(count_tokens("supplyairtemp"), 1);
        assert_eq!(count_tokens("sf-speed_cmd"), 3);
    }

    #[test]
    fn test_extract_features_keywords() {
        let f = extract_features("DAT", "AHU");
        assert_eq!(f[0], 3.0);
        assert_eq!(f[1], 1.0);
        // is_discharge
        assert_eq!(f[12], 1.0);
        // equip_ahu
        assert_eq!(f[16], 1.0);
        assert_eq!(f[17], 0.0);
    }

    #[test]
    fn test_extract_features_chiller() {
        let f = extract_features("CHWS_Temp", "CHILLER");
        assert_eq!(f[2], 1.0);
        assert_eq!(f[18], 1.0);
        assert_eq!(f[16], 0.0);
    }

    #[test]
    fn test_extract_features_is_pure() {
        let a = extract_features("Zone Temp SP", "VAV");
        let b = extract_features("Zone Temp SP", "VAV");
        assert_eq!(a.map(f64::to_bits), b.map(f64::to_bits));
    }

    #[test]
    fn test_empty_equipment_type() {
        let f = extract_features("Supply Fan Status", "");
        assert!(f[16..].iter().all(|v| *v == 0.0));
        // fan系, status
        assert_eq!(f[5], 1.0);
        assert_eq!(f[11], 1.0);
    }
}
