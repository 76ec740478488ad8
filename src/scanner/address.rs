//! スロットパス・アドレス関連のユーティリティ

use sha2::{Digest, Sha256};

/// 2値ポイントの列挙マッピング
pub const BOOLEAN_MAPPING: &str = "false=false,true=true";

/// エンティティIDの桁数（16進）
const ENTITY_ID_LEN: usize = 16;

/// 機器パスから安定したエンティティIDを作る
pub fn entity_id(path: &str) -> String {
    let digest = Sha256::digest(path.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(ENTITY_ID_LEN);
    id
}

/// エンティティからの相対アドレス
///
/// ポイントがエンティティ配下にない場合はポイント名を返す。
pub fn point_address(entity_path: &str, point_path: &str, point_name: &str) -> String {
    let relative = point_path
        .strip_prefix(entity_path)
        .and_then(|rest| rest.strip_prefix('/'));

    match relative {
        Some(suffix) if !suffix.is_empty() => slot_path_to_suffix(suffix),
        _ => point_name.to_string(),
    }
}

/// スロットパスをアドレス表記に変換
///
/// `/` は `.` に、`$xx` エスケープは捨て、英数字と `.` 以外は除く。
pub fn slot_path_to_suffix(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut chars = path.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '/' => out.push('.'),
            '$' => {
                chars.next();
                chars.next();
            }
            c if c.is_alphanumeric() || c == '.' => out.push(c),
            _ => {}
        }
    }

    out
}

/// `$xx` の16進エスケープを戻す
pub fn unescape_path(path: &str) -> String {
    let chars: Vec<char> = path.chars().collect();
    let mut out = String::with_capacity(path.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '$' && i + 2 < chars.len() {
            let hex: String = chars[i + 1..=i + 2].iter().collect();
            if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                out.push(decoded);
                i += 3;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// 列挙範囲を "0=Off,1=On" 形式にする（空なら None）
pub fn enum_mapping(range: &[(i32, String)]) -> Option<String> {
    if range.is_empty() {
        return None;
    }

    let mapping = range
        .iter()
        .map(|(ordinal, tag)| format!("{}={}", ordinal, unescape_path(tag)))
        .collect::<Vec<_>>()
        .join(",");
    Some(mapping)
}
