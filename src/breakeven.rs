//! 예약 인스턴스(RI) 손익분기 계산 핵심 로직.
//!
//! 손익분기 시점은 온디맨드 대비 누적 절감액이 RI 계약의 잔여 약정 비용 이상이 되는
//! 첫 시간이다. 잔여 비용은 시간당 약정과 선결제 상각분을 합친 실효 시간당 요금
//! 하나로 표현한다. 이 모듈은 입출력 없이 입력값만으로 결과를 계산한다.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tracing::debug;

/// 1년 약정 시간(365일 × 24시간). 요금표 기준과 같이 윤년은 반영하지 않는다.
pub const HOURS_PER_YEAR: u64 = 8760;

/// 구매일 입력 형식 (yyyy-mm-dd).
pub const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// 큰 요금에서 `delta` 계산이 넘치지 않도록 축소를 시작하는 기준.
const LARGE_RATE: f64 = f64::MAX / (4.0 * HOURS_PER_YEAR as f64);

/// 큰 요금에 곱하는 축소 배수 (2^-32). 2의 거듭제곱이라 부호와 반올림이 그대로 유지된다.
const LARGE_RATE_SCALE: f64 = 1.0 / 4_294_967_296.0;

/// 입력 검증 대상 요금 항목.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateField {
    OnDemand,
    Ri,
    Upfront,
    RecurringHourly,
}

impl std::fmt::Display for RateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RateField::OnDemand => "온디맨드 시간당 요금",
            RateField::Ri => "RI 실효 시간당 요금",
            RateField::Upfront => "선결제 금액",
            RateField::RecurringHourly => "RI 시간당 약정 요금",
        };
        f.write_str(label)
    }
}

/// 계산 이전에 거부되는 입력의 사유.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputIssue {
    #[error("{field}은(는) 유한한 숫자여야 합니다: {value}")]
    NonFiniteRate { field: RateField, value: f64 },
    #[error("{field}은(는) 0 이상이어야 합니다: {value}")]
    NegativeRate { field: RateField, value: f64 },
    #[error("구매일은 yyyy-mm-dd 형식의 유효한 날짜여야 합니다: '{input}'")]
    BadDate { input: String },
    #[error("할인 배수는 0~1 사이여야 합니다: {value}")]
    DiscountOutOfRange { value: f64 },
    #[error("손익분기 날짜가 지원 범위를 벗어납니다: {purchase_date} + {hours}h")]
    DateOutOfRange { purchase_date: NaiveDate, hours: u64 },
    #[error("{hours}시간 시점의 잔여 비용 차이를 계산할 수 없습니다.")]
    UncomparableDelta { hours: u64 },
}

/// 손익분기 계산 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BreakevenError {
    /// 음수/비유한 요금, 잘못된 날짜 등 계산 이전에 거부되는 입력
    #[error("입력 오류: {0}")]
    InvalidInput(InputIssue),
    /// 온디맨드 요금이 RI 요금보다 크지 않아 두 요금이 교차하지 않음
    #[error(
        "손익분기 없음: 온디맨드 요금({on_demand_hourly})이 RI 요금({ri_hourly})보다 커야 합니다."
    )]
    NoBreakeven { on_demand_hourly: f64, ri_hourly: f64 },
}

impl From<InputIssue> for BreakevenError {
    fn from(value: InputIssue) -> Self {
        BreakevenError::InvalidInput(value)
    }
}

/// 온디맨드/RI 시간당 요금 쌍. 생성 시 두 값이 0 이상의 유한값인지 검증한다.
/// 상한은 두지 않는다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePair {
    on_demand_hourly: f64,
    ri_hourly: f64,
}

impl RatePair {
    pub fn new(on_demand_hourly: f64, ri_hourly: f64) -> Result<Self, BreakevenError> {
        validate_rate(RateField::OnDemand, on_demand_hourly)?;
        validate_rate(RateField::Ri, ri_hourly)?;
        Ok(Self {
            on_demand_hourly,
            ri_hourly,
        })
    }

    pub fn on_demand_hourly(&self) -> f64 {
        self.on_demand_hourly
    }

    pub fn ri_hourly(&self) -> f64 {
        self.ri_hourly
    }

    /// 1년 약정 총액. 극단적으로 큰 요금이면 `inf`가 될 수 있다 (보고용).
    pub fn ri_yearly_commitment(&self) -> f64 {
        self.ri_hourly * HOURS_PER_YEAR as f64
    }

    /// 비교 연산에 쓰는 (온디맨드, RI) 요금. 큰 값은 2^-32배로 축소한다.
    fn comparison_rates(&self) -> (f64, f64) {
        if self.on_demand_hourly.max(self.ri_hourly) > LARGE_RATE {
            (
                self.on_demand_hourly * LARGE_RATE_SCALE,
                self.ri_hourly * LARGE_RATE_SCALE,
            )
        } else {
            (self.on_demand_hourly, self.ri_hourly)
        }
    }

    /// `hours` 경과 시점의 (잔여 약정 비용 - 누적 절감액). 0 이하가 되면 손익분기.
    ///
    /// 큰 요금은 축소된 값으로 계산하므로 부호만 의미가 있다.
    pub fn delta_at(&self, hours: u64) -> f64 {
        let (on_demand, ri) = self.comparison_rates();
        let h = hours as f64;
        let savings = (on_demand - ri) * h;
        let remaining = ri * HOURS_PER_YEAR as f64 - ri * h;
        remaining - savings
    }

    /// `hours` 시점에 손익분기에 도달했는지. 비교할 수 없는 값(NaN)은 오류.
    fn crossed_at(&self, hours: u64) -> Result<bool, BreakevenError> {
        let delta = self.delta_at(hours);
        if delta.is_nan() {
            return Err(InputIssue::UncomparableDelta { hours }.into());
        }
        Ok(delta <= 0.0)
    }

    fn ensure_crossing(&self) -> Result<(), BreakevenError> {
        if self.on_demand_hourly <= self.ri_hourly {
            return Err(BreakevenError::NoBreakeven {
                on_demand_hourly: self.on_demand_hourly,
                ri_hourly: self.ri_hourly,
            });
        }
        Ok(())
    }
}

/// 손익분기 계산 결과. 한 번 계산되면 변경되지 않는다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakevenResult {
    rates: RatePair,
    purchase_date: NaiveDate,
    breakeven_hours: u64,
    breakeven_at: NaiveDateTime,
}

impl BreakevenResult {
    pub fn rates(&self) -> RatePair {
        self.rates
    }

    pub fn purchase_date(&self) -> NaiveDate {
        self.purchase_date
    }

    /// 구매 시점(구매일 00:00)부터 손익분기까지의 시간 수.
    pub fn breakeven_hours(&self) -> u64 {
        self.breakeven_hours
    }

    pub fn breakeven_at(&self) -> NaiveDateTime {
        self.breakeven_at
    }

    /// 손익분기 날짜.
    pub fn date(&self) -> NaiveDate {
        self.breakeven_at.date()
    }

    pub fn ri_yearly_commitment(&self) -> f64 {
        self.rates.ri_yearly_commitment()
    }
}

pub(crate) fn validate_rate(field: RateField, value: f64) -> Result<(), BreakevenError> {
    if !value.is_finite() {
        return Err(InputIssue::NonFiniteRate { field, value }.into());
    }
    if value < 0.0 {
        return Err(InputIssue::NegativeRate { field, value }.into());
    }
    Ok(())
}

/// yyyy-mm-dd 문자열을 달력상 유효한 날짜로 변환한다. (월 13, 2월 30일 등은 거부)
pub fn parse_purchase_date(input: &str) -> Result<NaiveDate, BreakevenError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, PURCHASE_DATE_FORMAT).map_err(|_| {
        InputIssue::BadDate {
            input: trimmed.to_string(),
        }
        .into()
    })
}

/// 손익분기 시간 수를 폐형식으로 계산한다.
///
/// 잔여 비용과 절감액의 차이는 `ri_yearly - on_demand * h`로 정리되므로
/// `ceil(ri_yearly / on_demand)`가 후보가 된다. 부동소수 경계에서 반복 정의
/// (`delta(h) <= 0`인 첫 `h`)와 어긋나지 않도록 후보를 앞뒤로 보정한다.
/// 정확한 등호 경계에서는 실수 연산 대비 ±1시간 차이가 날 수 있다.
///
/// 반환값은 `delta`가 처음 0 이하가 되는 시간 그 자체다. 참고 스크립트는 조건을
/// 확인한 뒤 카운터를 한 번 더 올려 +1시간을 돌려주므로, 교차 시간이 하루의
/// 마지막 시간(23시)이면 출력 날짜가 하루 빠르다.
pub fn breakeven_hours(rates: RatePair) -> Result<u64, BreakevenError> {
    rates.ensure_crossing()?;
    let (on_demand, ri) = rates.comparison_rates();
    // on_demand > ri >= 0 이므로 후보는 [0, HOURS_PER_YEAR] 범위에 있다.
    let estimate = (ri * HOURS_PER_YEAR as f64 / on_demand).ceil();
    let mut hours = estimate.clamp(0.0, HOURS_PER_YEAR as f64) as u64;
    while hours > 0 && rates.crossed_at(hours - 1)? {
        hours -= 1;
    }
    while !rates.crossed_at(hours)? {
        hours += 1;
        if hours > HOURS_PER_YEAR {
            return Err(InputIssue::UncomparableDelta { hours }.into());
        }
    }
    Ok(hours)
}

/// 한 시간씩 진행하며 손익분기 시간을 찾는 반복 정의 구현.
///
/// `breakeven_hours`의 기준값으로 쓰인다. 교차 조건을 먼저 검사하고, 교차한다면
/// `delta(HOURS_PER_YEAR)`는 항상 음수이므로 반복은 1년 안에 끝난다.
pub fn simulate_breakeven_hours(rates: RatePair) -> Result<u64, BreakevenError> {
    rates.ensure_crossing()?;
    let mut hours = 0;
    while !rates.crossed_at(hours)? {
        hours += 1;
        if hours > HOURS_PER_YEAR {
            return Err(BreakevenError::NoBreakeven {
                on_demand_hourly: rates.on_demand_hourly,
                ri_hourly: rates.ri_hourly,
            });
        }
    }
    Ok(hours)
}

/// 구매일에 손익분기 시간을 더해 결과를 만든다. 날짜 계산은 chrono에 맡긴다.
pub fn compute(
    rates: RatePair,
    purchase_date: NaiveDate,
) -> Result<BreakevenResult, BreakevenError> {
    let hours = breakeven_hours(rates)?;
    let start = purchase_date.and_time(NaiveTime::MIN);
    let breakeven_at = i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .and_then(|offset| start.checked_add_signed(offset))
        .ok_or(InputIssue::DateOutOfRange {
            purchase_date,
            hours,
        })?;
    debug!(
        on_demand_hourly = rates.on_demand_hourly,
        ri_hourly = rates.ri_hourly,
        ri_yearly = rates.ri_yearly_commitment(),
        hours,
        %breakeven_at,
        "breakeven computed"
    );
    Ok(BreakevenResult {
        rates,
        purchase_date,
        breakeven_hours: hours,
        breakeven_at,
    })
}

/// 세 스칼라 입력으로 손익분기 날짜만 돌려주는 단축 함수.
pub fn breakeven_date(
    on_demand_hourly: f64,
    ri_hourly: f64,
    purchase_date: NaiveDate,
) -> Result<NaiveDate, BreakevenError> {
    let rates = RatePair::new(on_demand_hourly, ri_hourly)?;
    Ok(compute(rates, purchase_date)?.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reference_example_breaks_even_in_june() {
        let rates = RatePair::new(0.45, 0.20).unwrap();
        assert!((rates.ri_yearly_commitment() - 1752.0).abs() < 1e-9);
        let res = compute(rates, date(2024, 1, 1)).unwrap();
        assert_eq!(res.breakeven_hours(), 3894);
        assert_eq!(res.date(), date(2024, 6, 11));
        assert_eq!(
            res.breakeven_at(),
            date(2024, 6, 11).and_hms_opt(6, 0, 0).unwrap()
        );
    }

    #[test]
    fn exact_equality_hour_counts_as_breakeven() {
        // 4380h 시점에서 delta가 정확히 0
        let rates = RatePair::new(1.0, 0.5).unwrap();
        assert_eq!(rates.delta_at(4380), 0.0);
        assert_eq!(breakeven_hours(rates).unwrap(), 4380);
    }

    #[test]
    fn date_arithmetic_crosses_year_and_leap_february() {
        let res = compute(RatePair::new(1.0, 0.5).unwrap(), date(2023, 12, 1)).unwrap();
        assert_eq!(
            res.breakeven_at(),
            date(2024, 5, 31).and_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[test]
    fn zero_ri_rate_breaks_even_at_purchase() {
        let res = compute(RatePair::new(0.1, 0.0).unwrap(), date(2024, 3, 15)).unwrap();
        assert_eq!(res.breakeven_hours(), 0);
        assert_eq!(res.date(), date(2024, 3, 15));
    }

    #[test]
    fn equal_rates_have_no_breakeven() {
        let err = breakeven_date(0.3, 0.3, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, BreakevenError::NoBreakeven { .. }));
    }

    #[test]
    fn ri_above_on_demand_has_no_breakeven() {
        let rates = RatePair::new(0.1, 0.2).unwrap();
        assert!(matches!(
            breakeven_hours(rates),
            Err(BreakevenError::NoBreakeven { .. })
        ));
        assert!(matches!(
            simulate_breakeven_hours(rates),
            Err(BreakevenError::NoBreakeven { .. })
        ));
    }

    #[test]
    fn zero_rates_have_no_breakeven() {
        let err = breakeven_date(0.0, 0.0, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, BreakevenError::NoBreakeven { .. }));
    }

    #[test]
    fn negative_and_non_finite_rates_are_invalid() {
        for (od, ri) in [(-0.1, 0.05), (0.5, -0.2), (f64::NAN, 0.1), (0.5, f64::INFINITY)] {
            assert!(
                matches!(RatePair::new(od, ri), Err(BreakevenError::InvalidInput(_))),
                "od={od} ri={ri}"
            );
        }
    }

    #[test]
    fn parse_accepts_valid_dates() {
        assert_eq!(parse_purchase_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert_eq!(parse_purchase_date(" 2025-12-31\n").unwrap(), date(2025, 12, 31));
    }

    #[test]
    fn parse_rejects_impossible_dates() {
        for s in ["2024-13-01", "2024-01-32", "2023-02-29", "2024/01/01", "", "tomorrow"] {
            assert!(
                matches!(parse_purchase_date(s), Err(BreakevenError::InvalidInput(_))),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn crossing_in_last_hour_of_day_stays_on_that_day() {
        // delta(46) = 89, delta(47) = -99.5
        let res = compute(RatePair::new(188.5, 1.0).unwrap(), date(2024, 1, 1)).unwrap();
        assert_eq!(res.breakeven_hours(), 47);
        assert_eq!(
            res.breakeven_at(),
            date(2024, 1, 2).and_hms_opt(23, 0, 0).unwrap()
        );
        assert_eq!(res.date(), date(2024, 1, 2));
    }

    #[test]
    fn very_large_rates_still_break_even_mid_year() {
        for (od, ri) in [(2e305, 1e305), (f64::MAX, f64::MAX / 2.0)] {
            let rates = RatePair::new(od, ri).unwrap();
            assert_eq!(breakeven_hours(rates).unwrap(), 4380, "{od} / {ri}");
            assert_eq!(simulate_breakeven_hours(rates).unwrap(), 4380, "{od} / {ri}");
        }
        let res = compute(RatePair::new(2e305, 1e305).unwrap(), date(2024, 1, 1)).unwrap();
        assert_eq!(
            res.breakeven_at(),
            date(2024, 7, 1).and_hms_opt(12, 0, 0).unwrap()
        );
    }

    #[test]
    fn overflowing_date_is_invalid_input() {
        let err = compute(RatePair::new(0.45, 0.20).unwrap(), NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, BreakevenError::InvalidInput(_)));
    }
}
