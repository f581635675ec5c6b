//! 적립 일정 생성
//!
//! 주어진 기간 안의 모든 "월 첫날"을 적립일로 만듭니다. 시작일이 월 첫날이면
//! 그 날부터, 아니면 다음 달 1일부터 시작하며 종료일이 속한 달의 1일이 기간
//! 안에 있으면 포함합니다.
//!
//! 기간이 월 경계를 하나도 포함하지 않으면 빈 일정이 됩니다. 이는 에러가
//! 아니며, 이후 통계 계산 단계에서 `EmptyLedger`로 드러납니다.

use chrono::{Datelike, Months, NaiveDate};
use dca_core::{DcaError, DcaResult, SimulationParams};
use serde::{Deserialize, Serialize};

/// 검증된 시뮬레이션 기간 (시작일 < 종료일).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// 새 기간을 생성합니다.
    ///
    /// # 에러
    ///
    /// 시작일이 종료일과 같거나 늦으면 [`DcaError::InvalidDateRange`].
    pub fn new(start: NaiveDate, end: NaiveDate) -> DcaResult<Self> {
        if start >= end {
            return Err(DcaError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl TryFrom<&SimulationParams> for DateRange {
    type Error = DcaError;

    /// 시작일 < 종료일을 다시 검증합니다.
    fn try_from(params: &SimulationParams) -> DcaResult<Self> {
        Self::new(params.start_date, params.end_date)
    }
}

/// 적립 일정: 오름차순, 중복 없는 적립일 목록.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributionSchedule {
    dates: Vec<NaiveDate>,
}

impl ContributionSchedule {
    /// 기간 내 모든 월 첫날로 월별 일정을 생성합니다.
    pub fn monthly(range: &DateRange) -> Self {
        let mut dates = Vec::new();
        let mut cursor = first_month_start_on_or_after(range.start());

        while let Some(date) = cursor {
            if date > range.end() {
                break;
            }
            dates.push(date);
            cursor = date.checked_add_months(Months::new(1));
        }

        Self { dates }
    }

    /// 시작일/종료일로 바로 월별 일정을 생성합니다.
    pub fn monthly_between(start: NaiveDate, end: NaiveDate) -> DcaResult<Self> {
        Ok(Self::monthly(&DateRange::new(start, end)?))
    }

    /// 미리 만든 날짜 목록으로 일정을 생성합니다.
    ///
    /// 날짜는 엄격한 오름차순이어야 합니다.
    pub fn from_dates(dates: Vec<NaiveDate>) -> DcaResult<Self> {
        if let Some(pos) = dates.windows(2).position(|w| w[0] >= w[1]) {
            return Err(DcaError::InvalidInput(format!(
                "적립일은 중복 없이 오름차순이어야 합니다: {} 다음에 {}",
                dates[pos],
                dates[pos + 1]
            )));
        }
        Ok(Self { dates })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NaiveDate> {
        self.dates.iter()
    }
}

impl<'a> IntoIterator for &'a ContributionSchedule {
    type Item = &'a NaiveDate;
    type IntoIter = std::slice::Iter<'a, NaiveDate>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.iter()
    }
}

fn first_month_start_on_or_after(date: NaiveDate) -> Option<NaiveDate> {
    if date.day() == 1 {
        return Some(date);
    }
    date.with_day(1)?.checked_add_months(Months::new(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_validation() {
        assert!(DateRange::new(date(2021, 1, 1), date(2021, 1, 2)).is_ok());
        assert!(matches!(
            DateRange::new(date(2021, 1, 2), date(2021, 1, 2)),
            Err(DcaError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            DateRange::new(date(2022, 1, 1), date(2021, 1, 1)),
            Err(DcaError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_monthly_inclusive_bounds() {
        let schedule = ContributionSchedule::monthly_between(date(2020, 1, 1), date(2020, 4, 1)).unwrap();
        assert_eq!(
            schedule.dates(),
            &[date(2020, 1, 1), date(2020, 2, 1), date(2020, 3, 1), date(2020, 4, 1)]
        );
    }

    #[test]
    fn test_monthly_mid_month_start() {
        let schedule =
            ContributionSchedule::monthly_between(date(2020, 11, 15), date(2021, 2, 20)).unwrap();
        assert_eq!(
            schedule.dates(),
            &[date(2020, 12, 1), date(2021, 1, 1), date(2021, 2, 1)]
        );
    }

    #[test]
    fn test_start_on_month_start_short_range() {
        let schedule =
            ContributionSchedule::monthly_between(date(2021, 6, 1), date(2021, 6, 15)).unwrap();
        assert_eq!(schedule.dates(), &[date(2021, 6, 1)]);
    }

    #[test]
    fn test_empty_schedule_is_not_an_error() {
        let schedule =
            ContributionSchedule::monthly_between(date(2021, 6, 2), date(2021, 6, 30)).unwrap();
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_year_boundary() {
        let schedule =
            ContributionSchedule::monthly_between(date(2019, 12, 31), date(2020, 1, 1)).unwrap();
        assert_eq!(schedule.dates(), &[date(2020, 1, 1)]);
    }

    #[test]
    fn test_from_dates_rejects_duplicates() {
        assert!(ContributionSchedule::from_dates(vec![date(2021, 1, 1), date(2021, 1, 1)]).is_err());
        assert!(ContributionSchedule::from_dates(vec![date(2021, 2, 1), date(2021, 1, 1)]).is_err());
        assert!(ContributionSchedule::from_dates(vec![date(2021, 1, 1), date(2021, 1, 5)]).is_ok());
        assert!(ContributionSchedule::from_dates(Vec::new()).unwrap().is_empty());
    }
}
