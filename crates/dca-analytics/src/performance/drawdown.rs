//! 낙폭(Drawdown) 계산
//!
//! 평가 금액 궤적의 누적 고점(prefix maximum)을 구하고, 회차별 낙폭을
//! `(값 - 고점) / 고점` 비율로 계산합니다. 값은 항상 고점 이하이므로 낙폭은
//! 0 이하이며, 고점 회차에서는 정확히 0입니다.
//!
//! 최대 낙폭은 전체 궤적에서 가장 깊은(가장 작은) 낙폭이고, 최근 낙폭은 마지막
//! 회차의 낙폭입니다. 둘 사이의 대소 관계는 정해져 있지 않습니다.

use chrono::NaiveDate;
use dca_core::{Amount, DcaError, DcaResult, Percentage};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::simulation::Ledger;

/// 평가 금액 궤적의 낙폭 곡선.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownCurve {
    /// 누적 고점: peaks[i] = max(values[0..=i])
    peaks: Vec<Amount>,
    /// 낙폭 비율 (≤ 0): (values[i] - peaks[i]) / peaks[i]
    drawdowns: Vec<Decimal>,
}

impl DrawdownCurve {
    /// 값 궤적으로 낙폭 곡선을 계산합니다.
    ///
    /// # 에러
    ///
    /// 0 이하의 값이 있으면 고점 대비 비율을 정의할 수 없으므로
    /// [`DcaError::InvalidInput`].
    pub fn from_values(values: &[Amount]) -> DcaResult<Self> {
        let mut peaks = Vec::with_capacity(values.len());
        let mut drawdowns = Vec::with_capacity(values.len());
        let mut peak = Decimal::ZERO;

        for (i, &value) in values.iter().enumerate() {
            if value <= Decimal::ZERO {
                return Err(DcaError::InvalidInput(format!(
                    "낙폭 계산에는 양수 값만 사용할 수 있습니다: index {} = {}",
                    i, value
                )));
            }
            if value > peak {
                peak = value;
            }

            peaks.push(peak);
            drawdowns.push((value - peak) / peak);
        }

        Ok(Self { peaks, drawdowns })
    }

    /// 원장의 평가 금액 궤적으로 낙폭 곡선을 계산합니다.
    pub fn from_ledger(ledger: &Ledger) -> DcaResult<Self> {
        Self::from_values(&ledger.values())
    }

    /// 누적 고점 목록.
    pub fn running_peaks(&self) -> &[Amount] {
        &self.peaks
    }

    /// 회차별 낙폭 비율 (≤ 0).
    pub fn drawdowns(&self) -> &[Decimal] {
        &self.drawdowns
    }

    pub fn len(&self) -> usize {
        self.drawdowns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawdowns.is_empty()
    }

    /// 가장 깊은 낙폭 비율. 빈 곡선이면 `None`.
    pub fn max_drawdown(&self) -> Option<Decimal> {
        self.drawdowns.iter().copied().min()
    }

    /// 가장 깊은 낙폭이 처음 나타난 인덱스.
    pub fn max_drawdown_index(&self) -> Option<usize> {
        let deepest = self.max_drawdown()?;
        self.drawdowns.iter().position(|&d| d == deepest)
    }

    /// 마지막 회차의 낙폭 비율.
    pub fn latest_drawdown(&self) -> Option<Decimal> {
        self.drawdowns.last().copied()
    }

    /// 최대 낙폭 (%).
    pub fn max_drawdown_pct(&self) -> Option<Percentage> {
        self.max_drawdown().map(|d| d * Decimal::ONE_HUNDRED)
    }

    /// 최근 낙폭 (%).
    pub fn latest_drawdown_pct(&self) -> Option<Percentage> {
        self.latest_drawdown().map(|d| d * Decimal::ONE_HUNDRED)
    }
}

/// 차트용 낙폭 시계열 포인트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    /// 적립일
    pub date: NaiveDate,
    /// 평가 금액
    pub value: Amount,
    /// 그 시점까지의 고점
    pub peak: Amount,
    /// 고점 대비 낙폭 (%, ≤ 0)
    pub drawdown_pct: Percentage,
}

/// 원장의 회차별 낙폭 시계열을 반환합니다.
pub fn drawdown_series(ledger: &Ledger) -> DcaResult<Vec<DrawdownPoint>> {
    let curve = DrawdownCurve::from_ledger(ledger)?;

    Ok(ledger
        .iter()
        .zip(curve.running_peaks())
        .zip(curve.drawdowns())
        .map(|((entry, &peak), &drawdown)| DrawdownPoint {
            date: entry.date,
            value: entry.current_value,
            peak,
            drawdown_pct: drawdown * Decimal::ONE_HUNDRED,
        })
        .collect())
}
