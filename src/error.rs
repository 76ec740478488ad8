use thiserror::Error;

#[derive(Error, Debug)]
pub enum DboMapperError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("ポイントソースが不正: {0}")]
    InvalidPointSource(String),

    #[error("修正データが不正: {0}")]
    InvalidCorrections(String),

    #[error("エンティティが見つかりません: {0}")]
    EntityNotFound(String),

    #[error("学習エラー: {0}")]
    Training(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("共通ライブラリエラー: {0}")]
    Common(#[from] dbo_mapper_common::Error),
}

pub type Result<T> = std::result::Result<T, DboMapperError>;
