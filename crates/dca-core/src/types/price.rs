//! 가격 포인트와 가격 시계열.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Price;
use crate::error::{DcaError, DcaResult};

/// 단일 날짜의 종가.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 거래일
    pub date: NaiveDate,
    /// 종가 (항상 양수)
    pub price: Price,
}

impl PricePoint {
    /// 새 가격 포인트를 생성합니다.
    ///
    /// # 에러
    ///
    /// 가격이 0 이하이면 [`DcaError::InvalidPrice`]를 반환합니다.
    pub fn new(date: NaiveDate, price: Price) -> DcaResult<Self> {
        if price <= Decimal::ZERO {
            return Err(DcaError::InvalidPrice { date, price });
        }
        Ok(Self { date, price })
    }
}

/// 불변 가격 시계열.
///
/// 날짜 기준 비내림차순으로 정렬되어 있습니다. 같은 날짜가 여러 번 나올 수
/// 있으며, 조회 시 시계열 순서상 마지막 값이 우선합니다. 중복 제거는 하지
/// 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// 정렬된 가격 포인트로 시계열을 생성합니다.
    ///
    /// 모든 가격이 양수인지, 날짜가 역행하지 않는지 검증합니다.
    pub fn new(points: Vec<PricePoint>) -> DcaResult<Self> {
        for (index, point) in points.iter().enumerate() {
            if point.price <= Decimal::ZERO {
                return Err(DcaError::InvalidPrice {
                    date: point.date,
                    price: point.price,
                });
            }
            if index > 0 {
                let previous = points[index - 1].date;
                if point.date < previous {
                    return Err(DcaError::UnorderedSeries {
                        index,
                        date: point.date,
                        previous,
                    });
                }
            }
        }

        Ok(Self { points })
    }

    /// 정렬되지 않은 포인트를 날짜순으로 안정 정렬한 뒤 시계열을 생성합니다.
    ///
    /// 같은 날짜의 포인트는 입력 순서를 유지합니다.
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> DcaResult<Self> {
        points.sort_by_key(|p| p.date);
        Self::new(points)
    }

    /// 모든 가격 포인트를 반환합니다.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// 시계열이 다루는 (첫 날짜, 마지막 날짜)를 반환합니다.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_price_point_rejects_non_positive() {
        assert!(PricePoint::new(date(2021, 1, 1), dec!(0)).is_err());
        assert!(PricePoint::new(date(2021, 1, 1), dec!(-3)).is_err());
        assert!(PricePoint::new(date(2021, 1, 1), dec!(0.0001)).is_ok());
    }

    #[test]
    fn test_series_accepts_duplicate_dates() {
        let series = PriceSeries::new(vec![
            PricePoint::new(date(2021, 1, 1), dec!(100)).unwrap(),
            PricePoint::new(date(2021, 1, 1), dec!(101)).unwrap(),
            PricePoint::new(date(2021, 1, 2), dec!(102)).unwrap(),
        ])
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.date_range(), Some((date(2021, 1, 1), date(2021, 1, 2))));
    }

    #[test]
    fn test_series_rejects_backwards_dates() {
        let err = PriceSeries::new(vec![
            PricePoint::new(date(2021, 1, 2), dec!(100)).unwrap(),
            PricePoint::new(date(2021, 1, 1), dec!(100)).unwrap(),
        ])
        .unwrap_err();

        assert!(matches!(err, DcaError::UnorderedSeries { index: 1, .. }));
    }

    #[test]
    fn test_series_rejects_bad_price_built_by_hand() {
        let bad = PricePoint {
            date: date(2021, 1, 1),
            price: dec!(0),
        };
        assert!(matches!(
            PriceSeries::new(vec![bad]),
            Err(DcaError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_from_unsorted_is_stable() {
        let series = PriceSeries::from_unsorted(vec![
            PricePoint::new(date(2021, 1, 3), dec!(3)).unwrap(),
            PricePoint::new(date(2021, 1, 1), dec!(1)).unwrap(),
            PricePoint::new(date(2021, 1, 3), dec!(4)).unwrap(),
        ])
        .unwrap();

        let prices: Vec<_> = series.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![dec!(1), dec!(3), dec!(4)]);
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::new(Vec::new()).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.date_range(), None);
    }
}
