//! 성과 분석 모듈
//!
//! 완성된 원장의 평가 금액 궤적으로 통계를 계산합니다:
//! - [`drawdown`]: 누적 고점, 회차별 낙폭, 최대/최근 낙폭
//! - [`summary`]: CAGR 및 최종 요약 (Summary)

pub mod drawdown;
pub mod summary;

pub use drawdown::*;
pub use summary::*;
