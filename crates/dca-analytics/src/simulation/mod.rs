//! DCA 시뮬레이션 모듈
//!
//! - [`ledger`]: 회차별 누적 기록 (LedgerEntry, Ledger)
//! - [`engine`]: 적립 일정을 따라 원장을 만드는 엔진
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use dca_analytics::{simulate, ContributionSchedule, analyze};
//! use rust_decimal_macros::dec;
//!
//! let schedule = ContributionSchedule::monthly_between(start, end)?;
//! let ledger = simulate(&series, &schedule, dec!(500))?;
//! let summary = analyze(&ledger)?;
//!
//! println!("평균 매입가: {}", summary.average_cost);
//! ```

pub mod engine;
pub mod ledger;

pub use engine::*;
pub use ledger::*;
