//! 최종 요약 통계
//!
//! 완성된 원장으로부터 총 투자금, 최종 수량/평가 금액, 평균 매입가, CAGR,
//! 최대/최근 낙폭을 계산합니다. 입력을 변경하지 않는 순수 함수이므로 같은
//! 원장에 여러 번 호출해도 같은 결과를 돌려줍니다.
//!
//! # CAGR 연수
//!
//! CAGR = ((최종 평가 금액 / 첫 평가 금액) ^ (1 / 연수) - 1) × 100
//!
//! 연수는 경과 일수가 아니라 `종료 연도 - 시작 연도 + 1`의 정수입니다.
//! 14개월짜리 시뮬레이션도 달력 연도 경계에 따라 1년 또는 2년으로 취급됩니다.
//! 대시보드에서 쓰던 공식을 그대로 유지합니다.

use chrono::{Datelike, NaiveDate};
use dca_core::{Amount, DcaError, DcaResult, Percentage, Price, Quantity};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::drawdown::DrawdownCurve;
use crate::schedule::DateRange;
use crate::simulation::Ledger;

/// DCA 시뮬레이션 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// 적립 횟수
    pub periods: usize,

    /// 첫 적립일
    pub first_date: NaiveDate,

    /// 마지막 적립일
    pub last_date: NaiveDate,

    /// CAGR 계산에 사용한 연수 (달력 연도 기준 정수)
    pub years_span: i32,

    /// 총 투자금
    pub total_invested: Amount,

    /// 최종 보유 수량
    pub final_units: Quantity,

    /// 최종 평가 금액
    pub final_value: Amount,

    /// 평균 매입가
    pub average_cost: Price,

    /// 평가 손익 (최종 평가 금액 - 총 투자금)
    pub net_profit: Amount,

    /// 최종 수익률 (%)
    pub roi_pct: Percentage,

    /// 연복리 수익률 (%)
    pub cagr_pct: Percentage,

    /// 최대 낙폭 (%, ≤ 0)
    pub max_drawdown_pct: Percentage,

    /// 최근 낙폭 (%, ≤ 0)
    pub latest_drawdown_pct: Percentage,
}

impl Summary {
    /// 평가 손익이 양수인지 확인합니다.
    pub fn is_profitable(&self) -> bool {
        self.net_profit > Decimal::ZERO
    }

    /// 로그 출력용 한 줄 요약.
    pub fn summary(&self) -> String {
        format!(
            "회차: {} | 투자금: {:.2} | 평가액: {:.2} | ROI: {:.2}% | CAGR: {:.2}% | MDD: {:.2}% | 최근 DD: {:.2}%",
            self.periods,
            self.total_invested,
            self.final_value,
            self.roi_pct,
            self.cagr_pct,
            self.max_drawdown_pct,
            self.latest_drawdown_pct
        )
    }
}

/// 두 날짜 사이의 달력 연도 수 (`종료 연도 - 시작 연도 + 1`).
pub fn years_span(start: NaiveDate, end: NaiveDate) -> i32 {
    end.year() - start.year() + 1
}

/// 연복리 수익률(%)을 계산합니다.
///
/// Decimal은 분수 지수를 지원하지 않으므로 거듭제곱은 f64로 계산합니다.
///
/// # 에러
///
/// - 값이 0 이하이거나 연수가 1 미만: [`DcaError::InvalidInput`]
/// - 결과를 Decimal로 표현할 수 없음: [`DcaError::Calculation`]
pub fn cagr_pct(first_value: Amount, final_value: Amount, years: i32) -> DcaResult<Percentage> {
    if first_value <= Decimal::ZERO || final_value <= Decimal::ZERO {
        return Err(DcaError::InvalidInput(format!(
            "CAGR에는 양수 평가 금액이 필요합니다: {} → {}",
            first_value, final_value
        )));
    }
    if years < 1 {
        return Err(DcaError::InvalidInput(format!(
            "CAGR 연수는 1 이상이어야 합니다: {}",
            years
        )));
    }

    let ratio = (final_value / first_value)
        .to_f64()
        .ok_or_else(|| DcaError::Calculation(format!("비율 변환 실패: {}", final_value / first_value)))?;

    let cagr = (ratio.powf(1.0 / f64::from(years)) - 1.0) * 100.0;

    Decimal::from_f64(cagr)
        .ok_or_else(|| DcaError::Calculation(format!("CAGR를 표현할 수 없습니다: {}", cagr)))
}

/// 원장 요약을 계산합니다.
///
/// CAGR 연수는 첫/마지막 적립일의 연도로 계산합니다.
///
/// # 에러
///
/// 빈 원장이면 [`DcaError::EmptyLedger`].
pub fn analyze(ledger: &Ledger) -> DcaResult<Summary> {
    let (first, last) = match (ledger.first(), ledger.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Err(DcaError::EmptyLedger),
    };
    summarize(ledger, years_span(first, last))
}

/// 요청한 시뮬레이션 기간의 연도로 CAGR 연수를 계산하는 요약.
///
/// 시작일이 12월 중순이면 첫 적립일은 다음 해 1월 1일이지만, 연수는 시작일의
/// 연도부터 셉니다.
pub fn analyze_with_range(ledger: &Ledger, range: &DateRange) -> DcaResult<Summary> {
    if ledger.is_empty() {
        return Err(DcaError::EmptyLedger);
    }
    summarize(ledger, years_span(range.start(), range.end()))
}

fn summarize(ledger: &Ledger, years: i32) -> DcaResult<Summary> {
    let (first, last) = match (ledger.first(), ledger.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(DcaError::EmptyLedger),
    };

    let curve = DrawdownCurve::from_ledger(ledger)?;
    let max_drawdown_pct = curve.max_drawdown_pct().ok_or(DcaError::EmptyLedger)?;
    let latest_drawdown_pct = curve.latest_drawdown_pct().ok_or(DcaError::EmptyLedger)?;

    let cagr_pct = cagr_pct(first.current_value, last.current_value, years)?;

    Ok(Summary {
        periods: ledger.len(),
        first_date: first.date,
        last_date: last.date,
        years_span: years,
        total_invested: last.cumulative_invested,
        final_units: last.cumulative_units,
        final_value: last.current_value,
        average_cost: last.average_cost,
        net_profit: last.unrealized_pnl(),
        roi_pct: last.roi_pct,
        cagr_pct,
        max_drawdown_pct,
        latest_drawdown_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ContributionSchedule;
    use crate::simulation::simulate;
    use dca_core::{PricePoint, PriceSeries};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger_from_prices(prices: &[(NaiveDate, Decimal)], amount: Decimal) -> Ledger {
        let points = prices
            .iter()
            .map(|&(d, p)| PricePoint::new(d, p).unwrap())
            .collect();
        let series = PriceSeries::new(points).unwrap();
        let schedule = ContributionSchedule::from_dates(prices.iter().map(|&(d, _)| d).collect()).unwrap();
        simulate(&series, &schedule, amount).unwrap()
    }

    #[test]
    fn test_years_span() {
        assert_eq!(years_span(date(2021, 1, 1), date(2021, 12, 1)), 1);
        assert_eq!(years_span(date(2020, 12, 1), date(2021, 1, 1)), 2);
        assert_eq!(years_span(date(2020, 1, 1), date(2024, 6, 1)), 5);
    }

    #[test]
    fn test_cagr_pct() {
        // 2년 동안 1.21배 → 연 10%
        let cagr = cagr_pct(dec!(100), dec!(121), 2).unwrap();
        assert!((cagr - dec!(10)).abs() < dec!(0.000001));

        // 1년이면 단순 수익률
        let cagr = cagr_pct(dec!(100), dec!(175), 1).unwrap();
        assert!((cagr - dec!(75)).abs() < dec!(0.000001));

        assert!(cagr_pct(dec!(0), dec!(100), 1).is_err());
        assert!(cagr_pct(dec!(100), dec!(100), 0).is_err());
    }

    #[test]
    fn test_analyze_three_contributions() {
        let ledger = ledger_from_prices(
            &[
                (date(2021, 1, 1), dec!(100)),
                (date(2021, 2, 1), dec!(200)),
                (date(2021, 3, 1), dec!(50)),
            ],
            dec!(100),
        );

        let summary = analyze(&ledger).unwrap();

        assert_eq!(summary.periods, 3);
        assert_eq!(summary.total_invested, dec!(300));
        assert_eq!(summary.final_units, dec!(3.5));
        assert_eq!(summary.final_value, dec!(175));
        assert_eq!(summary.net_profit, dec!(-125));
        assert_eq!(summary.years_span, 1);
        assert_eq!(summary.average_cost.round_dp(3), dec!(85.714));
        assert_eq!(summary.max_drawdown_pct.round_dp(3), dec!(-41.667));
        assert_eq!(summary.latest_drawdown_pct.round_dp(3), dec!(-41.667));
        assert!((summary.cagr_pct - dec!(75)).abs() < dec!(0.000001));
        assert!(!summary.is_profitable());
    }

    #[test]
    fn test_analyze_with_range_uses_requested_years() {
        let ledger = ledger_from_prices(
            &[(date(2021, 1, 1), dec!(100)), (date(2021, 2, 1), dec!(150))],
            dec!(100),
        );
        let range = DateRange::new(date(2020, 12, 15), date(2021, 2, 10)).unwrap();

        assert_eq!(analyze(&ledger).unwrap().years_span, 1);
        assert_eq!(analyze_with_range(&ledger, &range).unwrap().years_span, 2);
    }

    #[test]
    fn test_analyze_empty_ledger() {
        let ledger = ledger_from_prices(&[], dec!(100));
        assert_eq!(analyze(&ledger), Err(DcaError::EmptyLedger));

        let range = DateRange::new(date(2021, 6, 2), date(2021, 6, 30)).unwrap();
        assert_eq!(analyze_with_range(&ledger, &range), Err(DcaError::EmptyLedger));
    }

    #[test]
    fn test_summary_line() {
        let ledger = ledger_from_prices(&[(date(2021, 1, 1), dec!(100))], dec!(100));
        let line = analyze(&ledger).unwrap().summary();
        assert!(line.contains("회차: 1"));
        assert!(line.contains("MDD: 0.00%"));
    }
}
