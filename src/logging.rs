//! ログ初期化
//!
//! JSON出力を汚さないよう、ログは標準エラーに出す。

use tracing_subscriber::EnvFilter;

/// ログレベルを決定（RUST_LOG > --verbose > 設定ファイル）
pub fn resolve_filter(verbose: bool, config_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { config_level };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// グローバルsubscriberを設定
pub fn init(verbose: bool, config_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(resolve_filter(verbose, config_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
