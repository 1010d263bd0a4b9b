use std::io::{BufRead, Write};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::breakeven::{self, BreakevenError, BreakevenResult, RatePair};
use crate::config::{Config, ConfigError};
use crate::i18n::{keys, Translator};
use crate::pricing;
use crate::ui_cli::Prompter;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 손익분기 계산 오류
    #[error("{0}")]
    Breakeven(#[from] BreakevenError),
    /// 값을 다 받기 전에 입력이 끝남
    #[error("입력이 종료되었습니다.")]
    InputClosed,
}

/// 명령행에서 미리 받은 값. 비어 있는 항목은 대화형으로 묻는다.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// 할인 적용 전 온디맨드 시간당 요금
    pub on_demand_hourly: Option<f64>,
    /// RI 실효 시간당 요금 (`upfront`가 있으면 시간당 약정분만)
    pub ri_hourly: Option<f64>,
    /// 선결제 금액. 있으면 1년으로 상각해 RI 요금에 더한다.
    pub upfront: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    /// 설정 파일의 할인 배수를 덮어쓴다.
    pub discount: Option<f64>,
    pub details: bool,
    pub show_intro: bool,
}

impl RunOptions {
    fn needs_prompt(&self) -> bool {
        self.on_demand_hourly.is_none() || self.ri_hourly.is_none() || self.purchase_date.is_none()
    }
}

/// 입력을 모아 손익분기를 계산하고 결과를 출력한다.
pub fn run<R: BufRead, W: Write>(
    config: &Config,
    tr: &Translator,
    options: &RunOptions,
    prompter: &mut Prompter<R, W>,
) -> Result<BreakevenResult, AppError> {
    let discount = options.discount.unwrap_or(config.on_demand_discount);
    pricing::validate_discount(discount)?;

    if options.needs_prompt() && options.show_intro && config.show_reference_links {
        prompter.print_intro(tr)?;
    }

    let on_demand_listed = match options.on_demand_hourly {
        Some(v) => v,
        None => prompter.read_rate(tr, tr.t(keys::PROMPT_ON_DEMAND))?,
    };
    let on_demand = pricing::apply_discount(on_demand_listed, discount)?;

    let ri_entered = match options.ri_hourly {
        Some(v) => v,
        None => prompter.read_rate(tr, tr.t(keys::PROMPT_RI))?,
    };
    let ri = match options.upfront {
        Some(upfront) => pricing::effective_hourly_rate(upfront, ri_entered)?,
        None => ri_entered,
    };

    let purchase_date = match options.purchase_date {
        Some(d) => d,
        None => prompter.read_date(tr, tr.t(keys::PROMPT_PURCHASE_DATE))?,
    };
    debug!(on_demand_listed, discount, on_demand, ri, %purchase_date, "inputs collected");

    let rates = RatePair::new(on_demand, ri)?;
    let result = breakeven::compute(rates, purchase_date)?;
    info!(
        hours = result.breakeven_hours(),
        date = %result.date(),
        "breakeven date found"
    );

    prompter.print_result(tr, &result, discount, options.details)?;
    Ok(result)
}
