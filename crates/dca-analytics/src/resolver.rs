//! 기준일 가격 조회 (as-of lookup)
//!
//! 기준일 당일 또는 그 이전의 가장 최근 가격을 찾습니다. 같은 날짜의 포인트가
//! 여러 개면 시계열 순서상 마지막 것을 사용합니다.
//!
//! 두 가지 방식을 제공합니다:
//! - [`resolve`]: 이진 탐색, 임의 순서 조회용 (O(log n))
//! - [`AsOfCursor`]: 단조 증가 기준일 전용 포인터 (시뮬레이션 전체 O(n + m))

use chrono::NaiveDate;
use dca_core::{DcaError, DcaResult, Price, PriceSeries};

/// 기준일 이전(당일 포함)의 최신 가격을 반환합니다.
///
/// # 에러
///
/// 기준일 이전에 가격이 하나도 없으면 [`DcaError::NoPriceData`].
pub fn resolve(series: &PriceSeries, as_of: NaiveDate) -> DcaResult<Price> {
    let points = series.points();
    // date <= as_of 인 포인트 개수 = 마지막 일치 포인트 다음 인덱스
    let upper = points.partition_point(|p| p.date <= as_of);

    upper
        .checked_sub(1)
        .map(|idx| points[idx].price)
        .ok_or(DcaError::NoPriceData { date: as_of })
}

/// 단조 증가하는 기준일에 대해 포인터를 앞으로만 옮기는 조회기.
///
/// 이전 호출보다 빠른 날짜로 조회하면 [`resolve`]로 대체합니다.
#[derive(Debug, Clone)]
pub struct AsOfCursor<'a> {
    series: &'a PriceSeries,
    /// date <= 마지막 기준일 인 포인트 개수
    upper: usize,
    last_as_of: Option<NaiveDate>,
}

impl<'a> AsOfCursor<'a> {
    pub fn new(series: &'a PriceSeries) -> Self {
        Self {
            series,
            upper: 0,
            last_as_of: None,
        }
    }

    /// 기준일 이전(당일 포함)의 최신 가격을 반환합니다.
    pub fn resolve(&mut self, as_of: NaiveDate) -> DcaResult<Price> {
        if self.last_as_of.is_some_and(|last| as_of < last) {
            return resolve(self.series, as_of);
        }

        let points = self.series.points();
        while self.upper < points.len() && points[self.upper].date <= as_of {
            self.upper += 1;
        }
        self.last_as_of = Some(as_of);

        self.upper
            .checked_sub(1)
            .map(|idx| points[idx].price)
            .ok_or(DcaError::NoPriceData { date: as_of })
    }
}
