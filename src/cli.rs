use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dbo-mapper")]
#[command(about = "ビル設備ポイント名 → DBOフィールド照合・学習ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 標準語彙の代わりに使う語彙JSON
    #[arg(long, global = true, value_name = "FILE")]
    pub vocabulary: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ポイント名を1件照合
    Match {
        /// ポイントの表示名
        #[arg(required = true)]
        name: String,

        /// 単位（例: °F, psi, %）
        #[arg(short, long)]
        units: Option<String>,

        /// 2値ポイントとして扱う
        #[arg(short, long)]
        boolean: bool,

        /// 機器種別（AHU, VAV など。学習済みモデルの予測に使う）
        #[arg(short, long, default_value = "EQUIPMENT")]
        equipment: String,

        /// 修正データJSON（学習してから照合）
        #[arg(short, long)]
        corrections: Option<PathBuf>,
    },

    /// ポイント一覧を走査してインデックスをJSONに出力
    Scan {
        /// ポイント一覧JSONファイル、またはそれを含むフォルダ
        #[arg(required = true)]
        path: PathBuf,

        /// 出力JSONファイル（デフォルト: 標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 修正データJSON（学習してから走査）
        #[arg(short, long)]
        corrections: Option<PathBuf>,

        /// 最低信頼度（設定ファイルより優先）
        #[arg(short, long)]
        min_confidence: Option<u8>,
    },

    /// 修正データで学習
    Train {
        /// 修正データJSON
        #[arg(required = true)]
        corrections: PathBuf,

        /// 学習後に予測するポイント名
        #[arg(short, long)]
        predict: Option<String>,

        /// 予測時の機器種別
        #[arg(short, long, default_value = "EQUIPMENT")]
        equipment: String,
    },

    /// 機器名から機器種別を推定
    EntityType {
        /// 機器の表示名
        #[arg(required = true)]
        name: String,
    },

    /// 設定を表示/編集
    Config {
        /// 最低信頼度を設定 (0-100)
        #[arg(long)]
        set_min_confidence: Option<u8>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
