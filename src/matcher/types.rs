/// トークン分類の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenClasses {
    pub point_type: Option<String>,
    pub measurement: Option<String>,
    /// 走査順の記述子
    pub descriptors: Vec<String>,
    pub component: Option<String>,
}

impl TokenClasses {
    /// フィールド名を組み立てる（記述子 → 部品 → 計測量 → ポイント種別）
    pub fn compose_field(&self, point_type: &str) -> String {
        let mut segments: Vec<&str> = self.descriptors.iter().map(String::as_str).collect();
        segments.extend(self.component.as_deref());
        segments.extend(self.measurement.as_deref());
        segments.push(point_type);
        segments.join("_")
    }
}
