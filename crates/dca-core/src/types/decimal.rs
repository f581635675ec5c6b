//! 정밀한 금액 계산을 위한 Decimal 유틸리티.
//!
//! 누적 투자금이 정확히 `회차 × 적립액`이 되도록 모든 금액과 수량은
//! 부동소수점이 아닌 [`Decimal`]로 다룹니다.

use rust_decimal::{Decimal, RoundingStrategy};

/// 단위 가격 타입.
pub type Price = Decimal;

/// 보유 수량 타입 (코인/주식 단위).
pub type Quantity = Decimal;

/// 금액 타입 (통화 무관).
pub type Amount = Decimal;

/// 퍼센트 타입 (5.25 = 5.25%).
pub type Percentage = Decimal;

/// 표시용 Decimal 포맷 확장 트레이트.
///
/// 숫자 모델에는 포맷을 섞지 않고, 출력 경계에서만 사용합니다.
pub trait DecimalExt {
    /// 지정된 소수점 자릿수로 반올림합니다 (0.5는 0에서 먼 쪽으로).
    fn round_half_up(&self, dp: u32) -> Decimal;

    /// 천 단위 구분자가 있는 통화 문자열 (예: "$12,345.68").
    fn to_currency_string(&self) -> String;

    /// 이미 백분율 단위인 값을 문자열로 변환합니다 (예: 5.25 → "5.25%").
    fn to_percent_string(&self) -> String;
}

impl DecimalExt for Decimal {
    fn round_half_up(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }

    fn to_currency_string(&self) -> String {
        let rounded = self.round_half_up(2);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let text = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
    }

    fn to_percent_string(&self) -> String {
        format!("{:.2}%", self.round_half_up(2))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_string() {
        assert_eq!(dec!(12345.678).to_currency_string(), "$12,345.68");
        assert_eq!(dec!(500).to_currency_string(), "$500.00");
        assert_eq!(dec!(-1234567.5).to_currency_string(), "-$1,234,567.50");
        assert_eq!(dec!(0).to_currency_string(), "$0.00");
    }

    #[test]
    fn test_percent_string() {
        assert_eq!(dec!(-41.6666666).to_percent_string(), "-41.67%");
        assert_eq!(dec!(5.25).to_percent_string(), "5.25%");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(dec!(2.345).round_half_up(2), dec!(2.35));
        assert_eq!(dec!(-2.345).round_half_up(2), dec!(-2.35));
    }

    mod prop {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_currency_string_parses_back(cents in -10_000_000_000i64..10_000_000_000i64) {
                let value = Decimal::new(cents, 2);
                let text = value.to_currency_string();

                let digits: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
                prop_assert_eq!(digits.parse::<Decimal>().unwrap(), value);
                let suffix = format!("{:02}", cents.unsigned_abs() % 100);
                prop_assert!(text.ends_with(&suffix));
            }
        }
    }
}
