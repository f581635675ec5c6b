//! 설정 관리.
//!
//! 우선순위(낮음 → 높음): 기본값 → TOML 설정 파일 → `DCA__` 접두사 환경 변수.
//! 명령행 플래그는 CLI에서 마지막으로 덮어씁니다.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DcaError, DcaResult};
use crate::types::Amount;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 시뮬레이션 매개변수
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// 가격 데이터 설정
    #[serde(default)]
    pub data: DataConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 시뮬레이션 설정 (파일/환경 변수 원본 값).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// 적립 시작일
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    /// 적립 종료일 (없으면 오늘)
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// 회차당 적립 금액
    #[serde(default = "default_contribution_amount")]
    pub contribution_amount: Amount,
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_contribution_amount() -> Amount {
    Decimal::new(500, 0)
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: None,
            contribution_amount: default_contribution_amount(),
        }
    }
}

impl SimulationConfig {
    /// 검증된 시뮬레이션 매개변수로 변환합니다.
    ///
    /// 종료일이 없으면 오늘(UTC)을 사용합니다.
    pub fn to_params(&self) -> DcaResult<SimulationParams> {
        let end_date = self.end_date.unwrap_or_else(|| Utc::now().date_naive());
        SimulationParams::new(self.start_date, end_date, self.contribution_amount)
    }
}

/// 검증된 시뮬레이션 매개변수.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// 적립 일정 하한
    pub start_date: NaiveDate,
    /// 적립 일정 상한
    pub end_date: NaiveDate,
    /// 회차당 적립 금액
    pub contribution_amount: Amount,
}

impl SimulationParams {
    /// 매개변수를 검증하고 생성합니다.
    ///
    /// # 에러
    ///
    /// - 시작일 ≥ 종료일: [`DcaError::InvalidDateRange`]
    /// - 적립 금액 ≤ 0: [`DcaError::InvalidAmount`]
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        contribution_amount: Amount,
    ) -> DcaResult<Self> {
        if start_date >= end_date {
            return Err(DcaError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        if contribution_amount <= Decimal::ZERO {
            return Err(DcaError::InvalidAmount(contribution_amount));
        }

        Ok(Self {
            start_date,
            end_date,
            contribution_amount,
        })
    }
}

/// 가격 데이터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// 종목 심볼 (Yahoo Finance 표기)
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// 로컬 가격 CSV 경로 (지정 시 다운로드하지 않음)
    #[serde(default)]
    pub price_file: Option<String>,
    /// 다운로드한 CSV를 저장할 디렉토리
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// HTTP 요청 타임아웃 (초)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_symbol() -> String {
    "BTC-USD".to_string()
}
fn default_data_dir() -> String {
    "data".to_string()
}
fn default_request_timeout() -> u64 {
    30
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            price_file: None,
            data_dir: default_data_dir(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// 설정 파일(선택)과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 주어졌는데 존재하지 않으면 에러입니다.
    pub fn load(path: Option<&Path>) -> DcaResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("DCA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 기본 경로(`config/default.toml`)가 있으면 그 파일을, 없으면 환경 변수만 사용합니다.
    pub fn load_default() -> DcaResult<Self> {
        let path = Path::new("config/default.toml");
        if path.exists() {
            Self::load(Some(path))
        } else {
            Self::load(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults_match_dashboard() {
        let config = AppConfig::default();
        assert_eq!(config.simulation.start_date, date(2020, 1, 1));
        assert_eq!(config.simulation.contribution_amount, dec!(500));
        assert_eq!(config.data.symbol, "BTC-USD");
        assert!(config.simulation.end_date.is_none());
    }

    #[test]
    fn test_params_validation() {
        assert!(SimulationParams::new(date(2021, 1, 1), date(2022, 1, 1), dec!(100)).is_ok());

        assert!(matches!(
            SimulationParams::new(date(2021, 1, 1), date(2021, 1, 1), dec!(100)),
            Err(DcaError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            SimulationParams::new(date(2021, 1, 1), date(2022, 1, 1), dec!(0)),
            Err(DcaError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!("dca_config_test_{}.toml", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(
                file,
                r#"
[simulation]
start_date = "2019-03-15"
end_date = "2021-03-15"
contribution_amount = 250

[data]
symbol = "ETH-USD"
"#
            )
            .unwrap();
        }

        let config = AppConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.simulation.start_date, date(2019, 3, 15));
        assert_eq!(config.simulation.end_date, Some(date(2021, 3, 15)));
        assert_eq!(config.simulation.contribution_amount, dec!(250));
        assert_eq!(config.data.symbol, "ETH-USD");
        assert_eq!(config.logging.level, "info");

        let params = config.simulation.to_params().unwrap();
        assert_eq!(params.contribution_amount, dec!(250));
    }

    #[test]
    fn test_missing_file_is_error() {
        let path = Path::new("/definitely/not/here/dca.toml");
        assert!(matches!(AppConfig::load(Some(path)), Err(DcaError::Config(_))));
    }
}
