//! 적립식 투자(DCA) 시뮬레이션 및 성과 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 월별 적립 일정 생성
//! - 기준일 이전 최신 가격 조회 (as-of lookup)
//! - 누적 원장을 만드는 시뮬레이션 엔진
//! - 낙폭, CAGR, ROI, 평균 매입가 통계
//!
//! # 흐름
//!
//! ```text
//! PriceSeries + ContributionSchedule → simulate() → Ledger → analyze() → Summary
//! ```
//!
//! # Re-exports
//!
//! - [`schedule`]: 적립 일정 (DateRange, ContributionSchedule)
//! - [`resolver`]: 가격 조회 (resolve, AsOfCursor)
//! - [`simulation`]: 시뮬레이션 (Ledger, LedgerEntry, SimulationEngine)
//! - [`performance`]: 성과 분석 (Summary, DrawdownCurve)

pub mod performance;
pub mod resolver;
pub mod schedule;
pub mod simulation;

pub use performance::drawdown::{drawdown_series, DrawdownCurve, DrawdownPoint};
pub use performance::summary::{
    analyze, analyze_with_range, cagr_pct, years_span, Summary,
};
pub use resolver::{resolve, AsOfCursor};
pub use schedule::{ContributionSchedule, DateRange};
pub use simulation::engine::{simulate, SimulationEngine, SimulationReport};
pub use simulation::ledger::{Ledger, LedgerEntry};
