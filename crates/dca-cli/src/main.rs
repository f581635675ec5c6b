//! DCA 시뮬레이터 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # BTC-USD 월 $500 적립 (2020-01-01 ~ 오늘, Yahoo Finance 종가)
//! dca simulate
//!
//! # 로컬 CSV로 기간/금액 지정, JSON 보고서 저장
//! dca simulate -p data/btc.csv -f 2021-01-01 -t 2023-12-31 -a 250 -o reports/btc.json
//!
//! # 종가 CSV 다운로드
//! dca download -s SPY -f 2020-01-01 -t 2024-12-31
//!
//! # 최종 설정 확인 (파일 + DCA__ 환경 변수)
//! dca config
//! ```

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dca_cli::commands::download::{default_output_path, download_prices, parse_date, DownloadConfig};
use dca_cli::commands::simulate::{run_simulate, SimulateCliConfig, SimulateOverrides};
use dca_core::{init_logging, AppConfig, LogConfig};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "dca")]
#[command(about = "DCA simulator - 적립식 투자 시뮬레이션 및 성과 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (TOML, 기본: config/default.toml이 있으면 사용)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 적립식 투자 시뮬레이션 실행
    Simulate {
        /// 로컬 가격 CSV 파일 (date,close). 없으면 Yahoo Finance에서 받음
        #[arg(short, long)]
        prices: Option<PathBuf>,

        /// 종목 심볼 (예: BTC-USD, SPY)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 적립 시작일 (YYYY-MM-DD)
        #[arg(short = 'f', long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,

        /// 적립 종료일 (YYYY-MM-DD, 기본: 오늘)
        #[arg(short, long, value_parser = parse_date_arg)]
        to: Option<NaiveDate>,

        /// 회차당 적립 금액
        #[arg(short, long)]
        amount: Option<Decimal>,

        /// 결과 저장 경로 (.json이면 JSON, 그 외 텍스트)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 원장 표 없이 요약만 출력
        #[arg(short, long, default_value = "false")]
        quiet: bool,
    },

    /// 일별 종가 CSV 다운로드 (Yahoo Finance)
    Download {
        /// 종목 심볼 (기본: 설정 파일의 data.symbol)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long, value_parser = parse_date_arg)]
        from: NaiveDate,

        /// 종료 날짜 (YYYY-MM-DD, 기본: 오늘)
        #[arg(short, long, value_parser = parse_date_arg)]
        to: Option<NaiveDate>,

        /// 출력 파일 경로 (자동 생성됨)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 최종 설정을 TOML로 출력
    Config,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let app = match &cli.config {
        Some(path) => AppConfig::load(Some(path.as_path()))
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => AppConfig::load_default().context("Failed to load config")?,
    };

    init_logging(LogConfig::from_settings(&app.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Simulate {
            prices,
            symbol,
            from,
            to,
            amount,
            output,
            quiet,
        } => {
            let overrides = SimulateOverrides {
                prices,
                symbol,
                from,
                to,
                amount,
            };
            let config = SimulateCliConfig {
                app: overrides.apply(app),
                output_path: output.clone(),
                quiet,
            };

            match run_simulate(config).await {
                Ok(_) => {
                    info!("✅ Simulation completed successfully");
                    if let Some(out) = output {
                        println!("\n📁 결과 저장됨: {}", out.display());
                    }
                }
                Err(e) => {
                    error!("Simulation failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Download {
            symbol,
            from,
            to,
            output,
        } => {
            let end_date = to.unwrap_or_else(|| Utc::now().date_naive());
            let config = DownloadConfig::new(
                symbol.unwrap_or_else(|| app.data.symbol.clone()),
                from,
                end_date,
                app.data.request_timeout_secs,
            )
            .context("Start date must be before end date")?;

            // 출력 경로 자동 생성
            let output_path = output.unwrap_or_else(|| default_output_path(&app.data.data_dir, &config));
            info!("Output will be saved to: {}", output_path.display());

            match download_prices(&config, &output_path).await {
                Ok(count) => {
                    info!("✅ Successfully downloaded {} daily closes", count);
                    println!("\n데이터 다운로드 완료: {} 종가", count);
                    println!("저장 위치: {}", output_path.display());
                }
                Err(e) => {
                    error!("Download failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Config => {
            let rendered = toml::to_string_pretty(&app).context("Failed to render config")?;
            println!("{}", rendered);
        }
    }

    Ok(())
}
