//! DCA 시뮬레이션 명령어.
//!
//! 설정 파일/환경 변수로 로드한 [`AppConfig`] 위에 명령행 플래그를 덮어쓴 뒤,
//! 가격 데이터를 준비하여 [`SimulationEngine`]을 실행합니다.
//!
//! 가격 데이터는 로컬 CSV 파일이 지정되면 그 파일을, 아니면 Yahoo Finance에서
//! 받습니다.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dca_analytics::{SimulationEngine, SimulationReport};
use dca_core::{AppConfig, PriceSeries, SimulationParams};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::info;

use super::download::{fetch_prices, DownloadConfig};
use super::prices::load_prices;
use super::report::{print_report, render_summary, save_report};

/// 명령행에서 덮어쓸 수 있는 값들.
#[derive(Debug, Clone, Default)]
pub struct SimulateOverrides {
    /// 로컬 가격 CSV 경로
    pub prices: Option<PathBuf>,
    /// Yahoo Finance 심볼
    pub symbol: Option<String>,
    /// 적립 시작일
    pub from: Option<NaiveDate>,
    /// 적립 종료일
    pub to: Option<NaiveDate>,
    /// 회차당 적립 금액
    pub amount: Option<Decimal>,
}

impl SimulateOverrides {
    /// 설정 위에 명령행 값을 덮어씁니다.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(prices) = &self.prices {
            config.data.price_file = Some(prices.display().to_string());
        }
        if let Some(symbol) = &self.symbol {
            config.data.symbol = symbol.clone();
            // 심볼을 지정하면 설정 파일의 가격 파일 대신 다운로드
            if self.prices.is_none() {
                config.data.price_file = None;
            }
        }
        if let Some(from) = self.from {
            config.simulation.start_date = from;
        }
        if let Some(to) = self.to {
            config.simulation.end_date = Some(to);
        }
        if let Some(amount) = self.amount {
            config.simulation.contribution_amount = amount;
        }
        config
    }
}

/// 시뮬레이션 실행 설정.
#[derive(Debug, Clone)]
pub struct SimulateCliConfig {
    /// 최종 설정 (플래그 반영 후)
    pub app: AppConfig,
    /// 보고서 저장 경로
    pub output_path: Option<PathBuf>,
    /// 원장 표 출력 생략
    pub quiet: bool,
}

/// 시뮬레이션을 실행하고 결과를 출력/저장합니다.
pub async fn run_simulate(config: SimulateCliConfig) -> Result<SimulationReport> {
    let params = config
        .app
        .simulation
        .to_params()
        .context("Invalid simulation parameters")?;

    let series = load_series(&config.app, &params).await?;
    info!(
        points = series.len(),
        first = ?series.first().map(|p| p.date),
        last = ?series.last().map(|p| p.date),
        "Price series ready"
    );

    let report = SimulationEngine::new(params)
        .run(&series)
        .context("Simulation failed")?;

    if config.quiet {
        print!("{}", render_summary(&report.summary));
    } else {
        print_report(&report);
    }

    if let Some(path) = &config.output_path {
        save_report(&report, path)
            .with_context(|| format!("Failed to save report: {}", path.display()))?;
        info!("Report saved to {}", path.display());
    }

    Ok(report)
}

async fn load_series(app: &AppConfig, params: &SimulationParams) -> Result<PriceSeries> {
    match &app.data.price_file {
        Some(path) => load_prices(Path::new(path)),
        None => {
            let download = DownloadConfig {
                symbol: app.data.symbol.clone(),
                start_date: params.start_date,
                end_date: params.end_date,
                timeout_secs: app.data.request_timeout_secs,
            }
            .with_lookback();

            fetch_prices(&download).await
        }
    }
}
