//! 계산기에 넘기기 전 요금 전처리(온디맨드 할인, 선결제 상각).

use crate::breakeven::{validate_rate, BreakevenError, InputIssue, RateField, HOURS_PER_YEAR};

/// 온디맨드 요금에 곱하는 기본 할인 배수 (10% 기업 할인).
pub const DEFAULT_ON_DEMAND_DISCOUNT: f64 = 0.9;

/// 온디맨드 시간당 요금에 할인 배수를 적용한다.
/// - 배수는 0~1 (1이면 할인 없음)
pub fn apply_discount(on_demand_hourly: f64, multiplier: f64) -> Result<f64, BreakevenError> {
    validate_rate(RateField::OnDemand, on_demand_hourly)?;
    validate_discount(multiplier)?;
    Ok(on_demand_hourly * multiplier)
}

/// 할인 배수가 0~1 범위의 유한값인지 검사한다.
pub fn validate_discount(multiplier: f64) -> Result<(), BreakevenError> {
    if !multiplier.is_finite() || !(0.0..=1.0).contains(&multiplier) {
        return Err(InputIssue::DiscountOutOfRange { value: multiplier }.into());
    }
    Ok(())
}

/// 선결제 금액을 1년 약정 시간으로 상각해 시간당 약정 요금에 더한다.
/// 전액/부분 선결제 RI의 실효 시간당 요금을 직접 구할 때 쓴다.
pub fn effective_hourly_rate(upfront: f64, recurring_hourly: f64) -> Result<f64, BreakevenError> {
    validate_rate(RateField::Upfront, upfront)?;
    validate_rate(RateField::RecurringHourly, recurring_hourly)?;
    Ok(upfront / HOURS_PER_YEAR as f64 + recurring_hourly)
}
