use anyhow::Context;
use clap::Parser;
use dbo_mapper::{cli, config, corrections, scanner, service};
use cli::{Cli, Commands};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use scanner::{JsonPointSource, PointBatch, PointProvider};
use service::OntologyService;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let vocabulary = config::load_vocabulary(cli.vocabulary.as_deref())?;

    match cli.command {
        Commands::Match { name, units, boolean, equipment, corrections } => {
            let service = OntologyService::new(vocabulary, config);
            if let Some(path) = corrections {
                load_and_train(&service, &path)?;
            }

            let resolution = service.match_point(&name, units.as_deref(), boolean, &equipment);
            println!("ポイント: {}", name);
            println!("  DBOフィールド: {}", resolution.result.dbo_field);
            println!("  信頼度: {}%", resolution.result.confidence);
            println!("  採用: {}", resolution.source);
            if let Some(point_type) = &resolution.result.point_type {
                println!("  ポイント種別: {}", point_type);
            }
            if let Some(measurement) = &resolution.result.measurement {
                println!("  計測量: {}", measurement);
            }
        }

        Commands::Scan { path, output, corrections, min_confidence } => {
            println!("🏢 dbo-mapper - インデックス構築\n");

            let mut config = config;
            if let Some(value) = min_confidence {
                config.min_confidence = value.min(100);
            }
            let service = OntologyService::new(vocabulary, config);

            if let Some(corrections_path) = corrections {
                println!("[0/3] 修正データで学習中...");
                load_and_train(&service, &corrections_path)?;
                println!("✔ {}\n", service.learning_stats());
            }

            // 1. ポイント読み込み
            println!("[1/3] ポイントを読み込み中...");
            let batch = JsonPointSource::new(&path).points()?;
            if batch.rejected > 0 {
                println!("⚠ 形式の合わない{}件を読み飛ばしました", batch.rejected);
            }
            println!("✔ {}件のポイントを検出\n", batch.len());
            let PointBatch { points, rejected } = batch;

            // 2. 照合
            println!("[2/3] 照合中...");
            let pb = ProgressBar::new(points.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .context("プログレスバーのテンプレートが不正です")?
                    .progress_chars("#>-"),
            );
            let mut stats = service.index_points(&points, |point| {
                pb.set_message(point.display_name.clone());
                pb.inc(1);
            });
            pb.finish_and_clear();
            stats.points_scanned += rejected;
            stats.failures += rejected;
            println!(
                "✔ {}エンティティ / {}件照合 (低信頼度 {}件, 除外 {}件, 失敗 {}件)\n",
                stats.entities,
                stats.points_matched,
                stats.low_confidence,
                stats.skipped,
                stats.failures
            );

            // 3. 出力
            println!("[3/3] 結果を出力中...");
            let json = serde_json::to_string_pretty(&service.export())?;
            match output {
                Some(output) => {
                    std::fs::write(&output, json)?;
                    println!("✔ 結果を保存: {}", output.display());
                }
                None => println!("{}", json),
            }

            println!("\n✅ 完了 ({:.2?})", stats.elapsed);
        }

        Commands::Train { corrections, predict, equipment } => {
            let service = OntologyService::new(vocabulary, config);
            let trained = load_and_train(&service, &corrections)?;

            println!("{}", service.learning_stats());
            if !trained {
                println!(
                    "⚠ 学習には{}件以上の修正が必要です",
                    service.config().min_training_examples
                );
            }

            if let Some(name) = predict {
                let resolution = service.match_point(&name, None, false, &equipment);
                println!(
                    "{} ({}) -> {} [{}%, {}]",
                    name,
                    equipment,
                    resolution.result.dbo_field,
                    resolution.result.confidence,
                    resolution.source
                );
            }
        }

        Commands::EntityType { name } => {
            println!("{}", vocabulary.infer_entity_type(&name));
        }

        Commands::Config { set_min_confidence, show } => {
            let mut config = config;

            if let Some(value) = set_min_confidence {
                config.set_min_confidence(value)?;
                println!("✔ 最低信頼度を {}% に設定しました", config.min_confidence);
            }

            if show || set_min_confidence.is_none() {
                println!("設定:");
                println!("  最低信頼度: {}%", config.min_confidence);
                println!("  学習に必要な修正数: {}", config.min_training_examples);
                println!("  近傍数 (k): {}", config.neighbors);
                println!("  除外パス: {}", config.excluded_path_prefixes.join(", "));
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

/// RUST_LOG を優先し、なければ --verbose で debug、通常は warn
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// 修正データを読み込んで学習
fn load_and_train(service: &OntologyService, path: &Path) -> anyhow::Result<bool> {
    let records = corrections::load_corrections(path)?;
    service.apply_corrections(&records);
    Ok(service.train_model())
}
