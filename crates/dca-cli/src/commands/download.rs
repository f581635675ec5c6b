//! Yahoo Finance 일별 종가 다운로드 명령어.
//!
//! Yahoo Finance API v8 chart 응답에서 종가만 추출하여 [`PriceSeries`]로 만듭니다.
//! 재시도는 하지 않으며, 실패는 [`DcaError::DataFetch`]로 보고합니다.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, TimeZone, Utc};
use dca_core::{DcaError, DcaResult, PricePoint, PriceSeries};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::prices::save_prices;

/// 첫 적립일 이전 종가를 찾기 위해 시작일보다 앞당겨 받는 일수.
///
/// 주말/휴장으로 시작일 당일에 종가가 없는 경우를 대비합니다.
pub const PRICE_LOOKBACK_DAYS: u64 = 7;

/// 다운로드 설정.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Yahoo Finance 심볼 (예: BTC-USD, SPY)
    pub symbol: String,
    /// 시작 날짜
    pub start_date: NaiveDate,
    /// 종료 날짜 (포함)
    pub end_date: NaiveDate,
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl DownloadConfig {
    /// 시작일 < 종료일을 검증하여 설정을 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        timeout_secs: u64,
    ) -> DcaResult<Self> {
        if start_date >= end_date {
            return Err(DcaError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            symbol: symbol.into(),
            start_date,
            end_date,
            timeout_secs,
        })
    }

    /// 첫 적립일 이전 종가까지 포함하도록 시작일을 앞당긴 설정.
    pub fn with_lookback(mut self) -> Self {
        self.start_date = self
            .start_date
            .checked_sub_days(Days::new(PRICE_LOOKBACK_DAYS))
            .unwrap_or(self.start_date);
        self
    }

    fn chart_url(&self) -> String {
        let start_ts = Utc
            .from_utc_datetime(&self.start_date.and_time(chrono::NaiveTime::MIN))
            .timestamp();
        // 종료일 당일 종가까지 포함
        let end_ts = Utc
            .from_utc_datetime(&self.end_date.and_time(chrono::NaiveTime::MIN))
            .timestamp()
            + 86_399;

        format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.symbol.to_uppercase(),
            start_ts,
            end_ts
        )
    }
}

/// Yahoo Finance API v8 응답 구조
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    close: Option<Vec<Option<f64>>>,
}

/// Yahoo chart 응답 본문을 가격 시계열로 변환합니다.
///
/// 종가가 `null`인 날(거래 정지 등)은 제외합니다. 같은 날짜가 여러 번 나오면
/// 응답 순서를 유지합니다.
pub fn parse_yahoo_chart(body: &str) -> DcaResult<PriceSeries> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| DcaError::DataFetch(format!("Yahoo Finance 응답 파싱 실패: {}", e)))?;

    if let Some(error) = response.chart.error {
        return Err(DcaError::DataFetch(format!(
            "Yahoo Finance error: {} - {}",
            error.code, error.description
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| DcaError::DataFetch("Yahoo Finance 응답에 데이터가 없습니다".to_string()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();

    let mut points = Vec::with_capacity(timestamps.len());
    for (&ts, close) in timestamps.iter().zip(closes) {
        let Some(close) = close else {
            continue;
        };

        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| DcaError::DataFetch(format!("잘못된 타임스탬프: {}", ts)))?;
        let price = Decimal::from_f64(close)
            .map(|p| p.round_dp(8))
            .ok_or_else(|| DcaError::DataFetch(format!("{} 종가 변환 실패: {}", date, close)))?;

        points.push(PricePoint::new(date, price)?);
    }

    PriceSeries::from_unsorted(points)
}

/// Yahoo Finance에서 일별 종가를 받습니다.
pub async fn fetch_prices(config: &DownloadConfig) -> Result<PriceSeries> {
    let client = Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let url = config.chart_url();
    debug!("Fetching from Yahoo Finance: {}", url);

    // 진행률 표시줄
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Fetching {} from Yahoo Finance...", config.symbol));

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| DcaError::DataFetch(format!("Yahoo Finance 요청 실패: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        pb.finish_and_clear();
        return Err(DcaError::DataFetch(format!("Yahoo Finance API error: {} - {}", status, body)).into());
    }

    let body = response
        .text()
        .await
        .map_err(|e| DcaError::DataFetch(format!("Yahoo Finance 응답 수신 실패: {}", e)))?;
    debug!("Yahoo Finance response length: {} bytes", body.len());

    let series = parse_yahoo_chart(&body)
        .with_context(|| format!("Failed to load prices for {}", config.symbol))?;

    pb.finish_with_message(format!(
        "Downloaded {} daily closes from Yahoo Finance",
        series.len()
    ));

    if series.is_empty() {
        return Err(DcaError::DataFetch(format!(
            "{}: {} ~ {} 기간의 종가가 없습니다",
            config.symbol, config.start_date, config.end_date
        ))
        .into());
    }

    Ok(series)
}

/// 종가를 받아 CSV로 저장하고 저장한 개수를 반환합니다.
pub async fn download_prices(config: &DownloadConfig, output: &Path) -> Result<usize> {
    info!(
        "Downloading daily closes for {} from {} to {}",
        config.symbol, config.start_date, config.end_date
    );

    let series = fetch_prices(config).await?;
    save_prices(output, &series)
}

/// 기본 출력 경로: `{data_dir}/{SYMBOL}_{시작}_to_{종료}.csv`
pub fn default_output_path(data_dir: &str, config: &DownloadConfig) -> PathBuf {
    Path::new(data_dir).join(format!(
        "{}_{}_to_{}.csv",
        config.symbol.to_uppercase(),
        config.start_date.format("%Y%m%d"),
        config.end_date.format("%Y%m%d")
    ))
}

/// 날짜 문자열 파싱 (YYYY-MM-DD)
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
}
