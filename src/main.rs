use clap::Parser;
use rx_match::{catalog_source, cli, config, error, logging, prescription, review};
use rx_match_common::{find_best_match, CatalogStore};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use prescription::PrescriptionSession;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init(cli.verbose, &config.log_level);
    if cli.command.requires_valid_config() {
        config.validate()?;
    }

    match cli.command {
        Commands::Match { query, threshold } => {
            let threshold = threshold.unwrap_or(config.threshold);
            config::check_threshold(threshold)?;

            let store = CatalogStore::new();
            let catalog_path = config.resolve_catalog_path(cli.catalog)?;
            catalog_source::load_catalog_file(&store, &catalog_path)?;

            let result = find_best_match(&store, &query, threshold);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Batch { input, output, threshold, interactive } => {
            let threshold = threshold.unwrap_or(config.threshold);
            config::check_threshold(threshold)?;

            let store = CatalogStore::new();
            let catalog_path = config.resolve_catalog_path(cli.catalog)?;
            let info = catalog_source::load_catalog_file(&store, &catalog_path)?;

            if !input.exists() {
                return Err(error::RxMatchError::FileNotFound(input.display().to_string()));
            }
            let text = std::fs::read_to_string(&input)?;

            let mut session = PrescriptionSession::from_text(
                &store,
                &text,
                threshold,
                config.max_drugs_per_session,
            );
            if session.truncated {
                eprintln!(
                    "⚠ 薬品数が上限（{}件）を超えたため、以降の行は無視しました",
                    config.max_drugs_per_session
                );
            }

            if interactive {
                review::run_interactive_review(&mut session)?;
            }

            let report = session.report(Some(info.fingerprint));
            let json = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    eprintln!("✔ 結果を保存: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Catalog => {
            let store = CatalogStore::new();
            let catalog_path = config.resolve_catalog_path(cli.catalog)?;
            let info = catalog_source::load_catalog_file(&store, &catalog_path)?;

            println!("カタログ:");
            println!("  パス: {}", info.path);
            println!("  件数: {}", info.entries);
            println!("  SHA-256: {}", info.fingerprint);
        }

        Commands::Config { set_catalog, set_threshold, show } => {
            let mut config = config;

            if let Some(path) = set_catalog {
                config.set_catalog_path(path)?;
                println!("✔ カタログパスを設定しました");
            }

            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ 閾値を設定しました");
            }

            if show {
                println!("設定:");
                println!("  カタログ: {}", config.catalog_path.as_deref().unwrap_or("未設定"));
                println!("  閾値: {}", config.threshold);
                println!("  1処方あたりの上限: {}", config.max_drugs_per_session);
                println!("  ログレベル: {}", config.log_level);
            }
        }
    }

    Ok(())
}
