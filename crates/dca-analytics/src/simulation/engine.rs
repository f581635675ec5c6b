//! DCA 시뮬레이션 엔진
//!
//! 적립 일정을 순서대로 따라가며 누적 상태를 갱신하고 회차마다 원장 기록을
//! 하나씩 만듭니다. 각 회차는 직전 누적 상태에 의존하므로 병렬로 처리하지
//! 않습니다.
//!
//! 누적 상태는 루프 밖의 가변 변수가 아니라 명시적인 fold로 표현합니다:
//! `(이전 누적 상태, 적립일, 단가) → (새 누적 상태, 원장 기록)`.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use dca_analytics::SimulationEngine;
//! use dca_core::SimulationParams;
//! use rust_decimal_macros::dec;
//!
//! let params = SimulationParams::new(start, end, dec!(500))?;
//! let report = SimulationEngine::new(params).run(&series)?;
//!
//! println!("총 투자금: {}", report.summary.total_invested);
//! println!("최대 낙폭: {}%", report.summary.max_drawdown_pct);
//! ```

use chrono::NaiveDate;
use dca_core::{Amount, DcaError, DcaResult, Price, PriceSeries, Quantity, SimulationParams};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use super::ledger::{Ledger, LedgerEntry};
use crate::performance::summary::{analyze_with_range, Summary};
use crate::resolver::AsOfCursor;
use crate::schedule::{ContributionSchedule, DateRange};

/// 회차 사이에 이어지는 누적 상태.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Accumulator {
    cumulative_units: Quantity,
    cumulative_invested: Amount,
}

impl Accumulator {
    /// 한 회차를 적용하여 새 누적 상태와 원장 기록을 만듭니다.
    fn step(self, date: NaiveDate, price: Price, amount: Amount) -> DcaResult<(Self, LedgerEntry)> {
        let units_acquired = amount.checked_div(price).ok_or_else(|| overflow("매수 수량", date))?;
        let cumulative_units = self
            .cumulative_units
            .checked_add(units_acquired)
            .ok_or_else(|| overflow("누적 수량", date))?;
        let cumulative_invested = self
            .cumulative_invested
            .checked_add(amount)
            .ok_or_else(|| overflow("누적 투자금", date))?;

        let current_value = cumulative_units
            .checked_mul(price)
            .ok_or_else(|| overflow("평가 금액", date))?;
        // cumulative_invested > 0, cumulative_units > 0 (amount > 0, price > 0)
        let roi_pct = (current_value - cumulative_invested)
            .checked_div(cumulative_invested)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| overflow("수익률", date))?;
        let average_cost = cumulative_invested
            .checked_div(cumulative_units)
            .ok_or_else(|| overflow("평균 매입가", date))?;

        let next = Self {
            cumulative_units,
            cumulative_invested,
        };
        let entry = LedgerEntry {
            date,
            unit_price: price,
            units_acquired,
            cumulative_units,
            cumulative_invested,
            current_value,
            roi_pct,
            average_cost,
        };

        Ok((next, entry))
    }
}

fn overflow(field: &str, date: NaiveDate) -> DcaError {
    DcaError::Calculation(format!("{} 계산 중 오버플로 ({})", field, date))
}

/// 가격 시계열과 적립 일정으로 원장을 만듭니다.
///
/// # 에러
///
/// - 적립 금액 ≤ 0: [`DcaError::InvalidAmount`] (시뮬레이션 시작 전)
/// - 어떤 적립일 이전에도 가격이 없음: [`DcaError::NoPriceData`]. 부분 원장은
///   반환하지 않습니다.
///
/// 빈 일정은 빈 원장이 됩니다.
pub fn simulate(
    series: &PriceSeries,
    schedule: &ContributionSchedule,
    contribution_amount: Amount,
) -> DcaResult<Ledger> {
    if contribution_amount <= Decimal::ZERO {
        return Err(DcaError::InvalidAmount(contribution_amount));
    }

    let mut cursor = AsOfCursor::new(series);
    let initial = (Accumulator::default(), Vec::with_capacity(schedule.len()));

    let (_, entries) = schedule.iter().try_fold(
        initial,
        |(acc, mut entries), &date| -> DcaResult<(Accumulator, Vec<LedgerEntry>)> {
            let price = cursor.resolve(date)?;
            let (next, entry) = acc.step(date, price, contribution_amount)?;

            debug!(
                date = %entry.date,
                price = %entry.unit_price,
                units = %entry.units_acquired,
                value = %entry.current_value,
                "DCA contribution applied"
            );

            entries.push(entry);
            Ok((next, entries))
        },
    )?;

    Ok(Ledger::new(contribution_amount, entries))
}

/// 시뮬레이션 결과 (매개변수 + 원장 + 요약).
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    /// 사용한 매개변수
    pub params: SimulationParams,
    /// 회차별 원장
    pub ledger: Ledger,
    /// 요약 통계
    pub summary: Summary,
}

/// 매개변수 검증 → 일정 생성 → 시뮬레이션 → 분석을 한 번에 수행하는 엔진.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    params: SimulationParams,
}

impl SimulationEngine {
    /// 검증된 매개변수로 엔진을 생성합니다.
    pub fn new(params: SimulationParams) -> Self {
        Self { params }
    }

    /// 시뮬레이션과 분석을 실행합니다.
    ///
    /// CAGR 연수는 요청한 기간의 연도로 계산합니다 ([`analyze_with_range`]).
    ///
    /// # 에러
    ///
    /// - 시작일 ≥ 종료일: [`DcaError::InvalidDateRange`] (시뮬레이션 전)
    /// - 일정이 비어 있음: [`DcaError::EmptyLedger`]
    pub fn run(&self, series: &PriceSeries) -> DcaResult<SimulationReport> {
        let span = dca_core::simulation_span!(
            "dca_simulation",
            self.params.start_date,
            self.params.end_date,
            self.params.contribution_amount
        );
        let _guard = span.enter();

        let range = DateRange::try_from(&self.params)?;
        let schedule = ContributionSchedule::monthly(&range);
        info!(
            contributions = schedule.len(),
            price_points = series.len(),
            "Running DCA simulation"
        );

        let ledger = simulate(series, &schedule, self.params.contribution_amount)?;
        let summary = analyze_with_range(&ledger, &range)?;

        info!("{}", summary.summary());

        Ok(SimulationReport {
            params: self.params,
            ledger,
            summary,
        })
    }
}
