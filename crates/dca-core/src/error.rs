//! DCA 시뮬레이터의 에러 타입.
//!
//! 엔진은 실패를 조용히 기본값으로 바꾸지 않습니다. 누락된 가격을 0이나
//! 보간값으로 대체하지 않고 항상 에러로 전파합니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// 시뮬레이션 및 분석 에러.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DcaError {
    /// 시작일이 종료일보다 같거나 늦음
    #[error("잘못된 기간: 시작일({start})은 종료일({end})보다 빨라야 합니다")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// 적립 금액이 0 이하
    #[error("잘못된 적립 금액: {0} (0보다 커야 합니다)")]
    InvalidAmount(Decimal),

    /// 해당 날짜 이전의 가격 데이터가 없음
    #[error("가격 데이터 없음: {date} 이전의 가격이 존재하지 않습니다")]
    NoPriceData { date: NaiveDate },

    /// 빈 원장에 대한 통계 요청
    #[error("빈 원장: 적립 일정이 비어 있어 통계를 계산할 수 없습니다")]
    EmptyLedger,

    /// 0 이하의 가격
    #[error("잘못된 가격: {date}의 가격 {price} (0보다 커야 합니다)")]
    InvalidPrice { date: NaiveDate, price: Decimal },

    /// 날짜 역순 시계열
    #[error("정렬되지 않은 시계열: 인덱스 {index}의 날짜 {date}가 이전 날짜 {previous}보다 빠릅니다")]
    UnorderedSeries {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 계산 에러 (표현 불가능한 결과)
    #[error("계산 에러: {0}")]
    Calculation(String),

    /// 가격 데이터 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 외부 가격 제공자 에러
    #[error("데이터 수집 에러: {0}")]
    DataFetch(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// DCA 작업을 위한 Result 타입.
pub type DcaResult<T> = Result<T, DcaError>;

impl DcaError {
    /// 호출자가 잘못된 매개변수를 넘겨서 발생한 에러인지 확인합니다.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DcaError::InvalidDateRange { .. }
                | DcaError::InvalidAmount(_)
                | DcaError::InvalidInput(_)
                | DcaError::Config(_)
        )
    }

    /// 가격 데이터 자체의 문제인지 확인합니다.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            DcaError::NoPriceData { .. }
                | DcaError::InvalidPrice { .. }
                | DcaError::UnorderedSeries { .. }
                | DcaError::Parse(_)
                | DcaError::DataFetch(_)
        )
    }
}

impl From<config::ConfigError> for DcaError {
    fn from(err: config::ConfigError) -> Self {
        DcaError::Config(err.to_string())
    }
}
