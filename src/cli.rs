use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rx-match")]
#[command(about = "薬品パッケージOCR結果の薬品名照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 薬品名カタログ（1行1薬品名、設定・環境変数より優先）
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// OCRテキスト1件を照合してJSONを出力
    Match {
        /// OCRで読み取ったテキスト
        #[arg(required = true)]
        query: String,

        /// 自動採用の閾値（省略時は設定値）
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// 処方1枚分（1行1薬品）をまとめて照合
    Batch {
        /// OCRテキストファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 自動採用の閾値（省略時は設定値）
        #[arg(short, long)]
        threshold: Option<f64>,

        /// 要確認の薬品を対話式で確定する
        #[arg(short, long)]
        interactive: bool,
    },

    /// カタログ情報を表示
    Catalog,

    /// 設定を表示/編集
    Config {
        /// カタログパスを設定
        #[arg(long)]
        set_catalog: Option<String>,

        /// 閾値を設定（0.0-1.0）
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

impl Commands {
    /// 実行前に設定値の検証が必要か
    ///
    /// `config` は壊れた設定を直すためのコマンドなので検証しない。
    pub fn requires_valid_config(&self) -> bool {
        !matches!(self, Commands::Config { .. })
    }
}
