//! 적립 원장
//!
//! 적립일마다 한 건씩, 일정 순서대로 쌓이는 불변 기록입니다. 각 항목의 누적
//! 필드는 직전 항목의 누적 상태에 이번 회차를 더한 값입니다.

use chrono::NaiveDate;
use dca_core::{Amount, Percentage, Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 단일 적립 회차 기록.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// 적립일
    pub date: NaiveDate,

    /// 적용된 단가 (적립일 이전 최신 종가)
    pub unit_price: Price,

    /// 이번 회차 매수 수량 = 적립액 / 단가
    pub units_acquired: Quantity,

    /// 누적 보유 수량
    pub cumulative_units: Quantity,

    /// 누적 투자금 = (회차 + 1) × 적립액
    pub cumulative_invested: Amount,

    /// 평가 금액 = 누적 수량 × 단가
    pub current_value: Amount,

    /// 수익률 (%) = (평가 금액 - 누적 투자금) / 누적 투자금 × 100
    pub roi_pct: Percentage,

    /// 평균 매입가 = 누적 투자금 / 누적 수량
    pub average_cost: Price,
}

impl LedgerEntry {
    /// 평가 손익 (평가 금액 - 누적 투자금).
    pub fn unrealized_pnl(&self) -> Amount {
        self.current_value - self.cumulative_invested
    }
}

/// 적립 원장.
///
/// [`simulate`](super::engine::simulate)만 생성할 수 있으며 이후에는 읽기 전용입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ledger {
    /// 회차당 적립 금액
    contribution_amount: Amount,

    /// 회차별 기록 (적립일 오름차순)
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub(crate) fn new(contribution_amount: Amount, entries: Vec<LedgerEntry>) -> Self {
        Self {
            contribution_amount,
            entries,
        }
    }

    /// 회차당 적립 금액을 반환합니다.
    pub fn contribution_amount(&self) -> Amount {
        self.contribution_amount
    }

    /// 모든 기록을 반환합니다.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&LedgerEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LedgerEntry> {
        self.entries.iter()
    }

    /// 평가 금액 궤적.
    pub fn values(&self) -> Vec<Amount> {
        self.entries.iter().map(|e| e.current_value).collect()
    }

    /// 최종 누적 투자금. 빈 원장이면 0.
    pub fn total_invested(&self) -> Amount {
        self.last()
            .map(|e| e.cumulative_invested)
            .unwrap_or(Decimal::ZERO)
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
