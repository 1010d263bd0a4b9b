use std::io::{BufRead, Write};

use chrono::{Datelike, NaiveDate};

use crate::app::AppError;
use crate::breakeven::{self, BreakevenResult};
use crate::i18n::{keys, Translator};

/// 대화형 입력/출력을 담당한다. 표준 입출력 대신 임의의 reader/writer로도 동작한다.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 출력 대상을 돌려받는다.
    pub fn into_output(self) -> W {
        self.output
    }

    /// 프롬프트를 출력하고 한 줄을 읽는다. 입력이 닫히면 `InputClosed`.
    pub fn read_line(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(AppError::InputClosed);
        }
        Ok(buf)
    }

    /// 0 이상의 유한한 요금이 입력될 때까지 반복해서 묻는다.
    pub fn read_rate(&mut self, tr: &Translator, prompt: &str) -> Result<f64, AppError> {
        loop {
            let s = self.read_line(prompt)?;
            let key = match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => return Ok(v),
                Ok(v) if v.is_finite() => keys::ERROR_NEGATIVE_NUMBER,
                _ => keys::ERROR_INVALID_NUMBER,
            };
            writeln!(self.output, "{}", tr.t(key))?;
        }
    }

    /// yyyy-mm-dd 형식의 유효한 날짜가 입력될 때까지 반복해서 묻는다.
    pub fn read_date(&mut self, tr: &Translator, prompt: &str) -> Result<NaiveDate, AppError> {
        loop {
            let s = self.read_line(prompt)?;
            match breakeven::parse_purchase_date(&s) {
                Ok(date) => return Ok(date),
                Err(_) => writeln!(self.output, "{}", tr.t(keys::ERROR_INVALID_DATE))?,
            }
        }
    }

    /// 요금표 참고 링크를 출력한다.
    pub fn print_intro(&mut self, tr: &Translator) -> Result<(), AppError> {
        for key in [
            keys::INTRO,
            keys::INTRO_LINK_EC2,
            keys::INTRO_LINK_RDS,
            keys::INTRO_LINK_ELASTICACHE,
        ] {
            writeln!(self.output, "{}", tr.t(key))?;
        }
        Ok(())
    }

    /// 손익분기 날짜를 출력한다. `details`면 계산 근거도 함께 출력한다.
    pub fn print_result(
        &mut self,
        tr: &Translator,
        result: &BreakevenResult,
        discount: f64,
        details: bool,
    ) -> Result<(), AppError> {
        writeln!(
            self.output,
            "{} {}",
            tr.t(keys::RESULT_BREAKEVEN),
            format_breakeven_date(result.date())
        )?;
        if details {
            let rates = result.rates();
            writeln!(
                self.output,
                "{} {}",
                tr.t(keys::DETAIL_PURCHASE_DATE),
                result.purchase_date().format(breakeven::PURCHASE_DATE_FORMAT)
            )?;
            writeln!(self.output, "{} {discount}", tr.t(keys::DETAIL_DISCOUNT))?;
            writeln!(
                self.output,
                "{} {:.4} / {:.4}",
                tr.t(keys::DETAIL_RATES),
                rates.on_demand_hourly(),
                rates.ri_hourly()
            )?;
            writeln!(
                self.output,
                "{} {:.2}",
                tr.t(keys::DETAIL_YEARLY),
                result.ri_yearly_commitment()
            )?;
            writeln!(
                self.output,
                "{} {}",
                tr.t(keys::DETAIL_HOURS),
                result.breakeven_hours()
            )?;
            writeln!(
                self.output,
                "{} {}",
                tr.t(keys::DETAIL_TIMESTAMP),
                result.breakeven_at().format("%Y-%m-%d %H:%M")
            )?;
        }
        Ok(())
    }
}

/// 날짜를 0 채움 없이 `YYYY-M-D` 형태로 만든다.
pub fn format_breakeven_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakeven::{compute, RatePair};

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    fn text(p: Prompter<&[u8], Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn date_is_not_zero_padded() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(format_breakeven_date(d), "2024-6-1");
        let d = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(format_breakeven_date(d), "2025-12-31");
    }

    #[test]
    fn read_rate_retries_until_number() {
        let tr = Translator::new("en");
        let mut p = prompter("abc\n\n0.45\n");
        assert_eq!(p.read_rate(&tr, "> ").unwrap(), 0.45);
        let out = text(p);
        assert_eq!(out.matches("Please enter a number.").count(), 2);
    }

    #[test]
    fn read_rate_rejects_nan_text() {
        let tr = Translator::new("en");
        let mut p = prompter("NaN\ninf\n1\n");
        assert_eq!(p.read_rate(&tr, "> ").unwrap(), 1.0);
    }

    #[test]
    fn read_rate_asks_again_after_negative() {
        let tr = Translator::new("en");
        let mut p = prompter("-0.2\n-0\n");
        assert_eq!(p.read_rate(&tr, "> ").unwrap(), 0.0);
        let out = text(p);
        assert_eq!(out.matches("Please enter a value of 0 or more.").count(), 1);
        assert_eq!(out.matches("> ").count(), 2);
    }

    #[test]
    fn read_date_retries_on_impossible_date() {
        let tr = Translator::new("en");
        let mut p = prompter("2024-13-01\n2024-02-30\n2024-02-29\n");
        assert_eq!(
            p.read_date(&tr, "> ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        let out = text(p);
        assert_eq!(out.matches("valid date").count(), 2);
    }

    #[test]
    fn closed_input_is_reported() {
        let tr = Translator::new("en");
        let mut p = prompter("");
        assert!(matches!(p.read_rate(&tr, "> "), Err(AppError::InputClosed)));
    }

    #[test]
    fn result_line_matches_reference_wording() {
        let tr = Translator::new("en");
        let res = compute(
            RatePair::new(0.45, 0.20).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();
        let mut p = prompter("");
        p.print_result(&tr, &res, 0.9, false).unwrap();
        assert_eq!(text(p), "\nYour purchase will breakeven on 2024-6-11\n");
    }

    #[test]
    fn details_include_hours() {
        let tr = Translator::new("en");
        let res = compute(
            RatePair::new(0.45, 0.20).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();
        let mut p = prompter("");
        p.print_result(&tr, &res, 0.9, true).unwrap();
        let out = text(p);
        assert!(out.contains("Purchase date: 2024-01-01"), "{out}");
        assert!(out.contains("Hours until breakeven: 3894"), "{out}");
        assert!(out.contains("RI yearly commitment: 1752.00"), "{out}");
        assert!(out.contains("Breakeven at: 2024-06-11 06:00"), "{out}");
    }
}
