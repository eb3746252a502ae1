use crate::error::{Result, RxMatchError};
use rx_match_common::DEFAULT_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// カタログパスを上書きする環境変数
pub const CATALOG_ENV: &str = "RX_MATCH_CATALOG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 薬品名カタログ（1行1薬品名のテキスト）
    pub catalog_path: Option<String>,
    /// 自動採用の閾値
    pub threshold: f64,
    /// 1処方あたりの薬品数上限
    pub max_drugs_per_session: usize,
    /// RUST_LOG未指定時のログレベル
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            threshold: DEFAULT_THRESHOLD,
            max_drugs_per_session: 50,
            log_level: "info".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| RxMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("rx-match").join("config.json"))
    }

    /// 使用するカタログパスを決定
    ///
    /// 優先順: 引数 > 環境変数 > 設定ファイル
    pub fn resolve_catalog_path(&self, cli_path: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = cli_path {
            return Ok(path);
        }
        if let Ok(path) = std::env::var(CATALOG_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        self.catalog_path
            .as_ref()
            .map(PathBuf::from)
            .ok_or(RxMatchError::CatalogNotLoaded)
    }

    /// 設定値の検証
    ///
    /// コアは範囲外の閾値も受け付けるが、設定ファイルには保存させない。
    pub fn validate(&self) -> Result<()> {
        check_threshold(self.threshold)?;
        if self.max_drugs_per_session == 0 {
            return Err(RxMatchError::Config(
                "max_drugs_per_session は1以上にしてください".into(),
            ));
        }
        Ok(())
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        self.update_threshold(threshold)?;
        self.save()
    }

    /// 閾値を検証して書き換える（保存はしない）
    ///
    /// 現在の設定が不正でも、正しい値への書き換えは受け付ける。
    pub fn update_threshold(&mut self, threshold: f64) -> Result<()> {
        check_threshold(threshold)?;
        self.threshold = threshold;
        Ok(())
    }

    pub fn set_catalog_path(&mut self, path: String) -> Result<()> {
        self.catalog_path = Some(path);
        self.save()
    }
}

/// 閾値が [0, 1] に収まっているか
pub fn check_threshold(threshold: f64) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(RxMatchError::InvalidThreshold(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.threshold, 0.7);
        assert_eq!(config.max_drugs_per_session, 50);
        assert!(config.catalog_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"threshold": 0.8}"#).unwrap();
        assert_eq!(config.threshold, 0.8);
        assert_eq!(config.max_drugs_per_session, 50);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            threshold: 1.2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RxMatchError::InvalidThreshold(_))));

        let config = Config {
            max_drugs_per_session: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RxMatchError::Config(_))));
    }

    #[test]
    fn test_check_threshold_nan() {
        assert!(check_threshold(f64::NAN).is_err());
        assert!(check_threshold(0.0).is_ok());
        assert!(check_threshold(1.0).is_ok());
    }

    #[test]
    fn test_cli_path_wins() {
        let config = Config {
            catalog_path: Some("/from/config.txt".into()),
            ..Default::default()
        };
        let path = config
            .resolve_catalog_path(Some(PathBuf::from("/from/cli.txt")))
            .unwrap();
        assert_eq!(path, PathBuf::from("/from/cli.txt"));
    }

    #[test]
    fn test_invalid_config_can_be_repaired() {
        let mut config: Config = serde_json::from_str(r#"{"threshold": 1.5}"#).unwrap();
        assert!(config.validate().is_err());

        config.update_threshold(0.7).unwrap();
        assert_eq!(config.threshold, 0.7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_update_threshold_rejects_out_of_range() {
        let mut config = Config::default();
        let err = config.update_threshold(1.5).unwrap_err();

        assert!(matches!(err, RxMatchError::InvalidThreshold(_)));
        assert_eq!(config.threshold, 0.7);
    }

    /// 環境変数はこのテストでのみ操作する（並列実行での競合を避ける）
    #[test]
    fn test_catalog_path_resolution_order() {
        let config = Config {
            catalog_path: Some("/from/config.txt".into()),
            ..Default::default()
        };

        std::env::set_var(CATALOG_ENV, "/from/env.txt");
        let from_env = config.resolve_catalog_path(None).unwrap();
        let from_cli = config
            .resolve_catalog_path(Some(PathBuf::from("/from/cli.txt")))
            .unwrap();

        std::env::set_var(CATALOG_ENV, "   ");
        let blank_env = config.resolve_catalog_path(None).unwrap();

        std::env::remove_var(CATALOG_ENV);
        let from_config = config.resolve_catalog_path(None).unwrap();
        let missing = Config::default().resolve_catalog_path(None);

        assert_eq!(from_env, PathBuf::from("/from/env.txt"));
        assert_eq!(from_cli, PathBuf::from("/from/cli.txt"));
        assert_eq!(blank_env, PathBuf::from("/from/config.txt"));
        assert_eq!(from_config, PathBuf::from("/from/config.txt"));
        assert!(matches!(missing, Err(RxMatchError::CatalogNotLoaded)));
    }
}
