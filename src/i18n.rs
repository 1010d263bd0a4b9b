use sys_locale::get_locale;

use crate::app::AppError;
use crate::breakeven::{BreakevenError, InputIssue, RateField};
use crate::config::ConfigError;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";

    pub const INTRO: &str = "intro.heading";
    pub const INTRO_LINK_EC2: &str = "intro.link_ec2";
    pub const INTRO_LINK_RDS: &str = "intro.link_rds";
    pub const INTRO_LINK_ELASTICACHE: &str = "intro.link_elasticache";

    pub const PROMPT_ON_DEMAND: &str = "prompt.on_demand";
    pub const PROMPT_RI: &str = "prompt.ri";
    pub const PROMPT_PURCHASE_DATE: &str = "prompt.purchase_date";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const ERROR_INVALID_DATE: &str = "error.invalid_date";
    pub const ERROR_NEGATIVE_NUMBER: &str = "error.negative_number";

    pub const RESULT_BREAKEVEN: &str = "result.breakeven";
    pub const DETAIL_PURCHASE_DATE: &str = "detail.purchase_date";
    pub const DETAIL_DISCOUNT: &str = "detail.discount";
    pub const DETAIL_RATES: &str = "detail.rates";
    pub const DETAIL_YEARLY: &str = "detail.yearly";
    pub const DETAIL_HOURS: &str = "detail.hours";
    pub const DETAIL_TIMESTAMP: &str = "detail.timestamp";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    lang: Language,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    /// 번역을 가져온다. 영어 번역이 없으면 한국어 문자열을 폴백한다.
    pub fn t(&self, key: &str) -> &'static str {
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| ko(key)),
            Language::Ko => ko(key),
        }
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: Option<&str>, config_lang: Option<&str>) -> String {
    cli_arg
        .and_then(normalize_lang)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(code) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(code);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// 오류를 현재 언어로 설명한다. 한국어는 오류 타입의 기본 메시지를 그대로 쓴다.
pub fn describe_error(tr: &Translator, err: &AppError) -> String {
    match tr.language() {
        Language::Ko => err.to_string(),
        Language::En => en_app_error(err),
    }
}

fn en_app_error(err: &AppError) -> String {
    match err {
        AppError::Io(e) => format!("I/O error: {e}"),
        AppError::Config(ConfigError::Io(e)) => format!("config file I/O error: {e}"),
        AppError::Config(ConfigError::Parse(e)) => format!("config parse error: {e}"),
        AppError::Config(ConfigError::Serialize(e)) => format!("config serialize error: {e}"),
        AppError::Config(ConfigError::Invalid { key, source }) => {
            format!("invalid config value {key}: {}", en_breakeven_error(source))
        }
        AppError::Breakeven(e) => en_breakeven_error(e),
        AppError::InputClosed => "input ended before all values were entered.".to_string(),
    }
}

fn en_breakeven_error(err: &BreakevenError) -> String {
    match err {
        BreakevenError::InvalidInput(issue) => format!("invalid input: {}", en_input_issue(issue)),
        BreakevenError::NoBreakeven {
            on_demand_hourly,
            ri_hourly,
        } => format!(
            "no breakeven: the on-demand rate ({on_demand_hourly}) must exceed the RI rate ({ri_hourly})."
        ),
    }
}

fn en_input_issue(issue: &InputIssue) -> String {
    match issue {
        InputIssue::NonFiniteRate { field, value } => {
            format!("{} must be a finite number: {value}", en_rate_field(*field))
        }
        InputIssue::NegativeRate { field, value } => {
            format!("{} must be 0 or more: {value}", en_rate_field(*field))
        }
        InputIssue::BadDate { input } => {
            format!("purchase date must be a valid yyyy-mm-dd date: '{input}'")
        }
        InputIssue::DiscountOutOfRange { value } => {
            format!("discount multiplier must be between 0 and 1: {value}")
        }
        InputIssue::DateOutOfRange {
            purchase_date,
            hours,
        } => format!("breakeven date is out of the supported range: {purchase_date} + {hours}h"),
        InputIssue::UncomparableDelta { hours } => {
            format!("cost difference cannot be evaluated at hour {hours}.")
        }
    }
}

fn en_rate_field(field: RateField) -> &'static str {
    match field {
        RateField::OnDemand => "on-demand hourly rate",
        RateField::Ri => "RI effective hourly rate",
        RateField::Upfront => "upfront payment",
        RateField::RecurringHourly => "RI recurring hourly rate",
    }
}

fn ko(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "오류",
        INTRO => "요금 정보를 입력받습니다. 아래 요금표를 참고하세요.",
        INTRO_LINK_EC2 => "EC2: https://aws.amazon.com/ec2/pricing/reserved-instances/pricing/",
        INTRO_LINK_RDS => "RDS: https://aws.amazon.com/rds/pricing/",
        INTRO_LINK_ELASTICACHE => "ElastiCache: https://aws.amazon.com/elasticache/pricing/",
        PROMPT_ON_DEMAND => "\n온디맨드 시간당 요금 입력: ",
        PROMPT_RI => "RI 실효 시간당 요금 입력: ",
        PROMPT_PURCHASE_DATE => "예상 구매일 입력 (yyyy-mm-dd): ",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        ERROR_INVALID_DATE => "yyyy-mm-dd 형식의 유효한 날짜를 입력하세요.",
        ERROR_NEGATIVE_NUMBER => "0 이상의 값을 입력하세요.",
        RESULT_BREAKEVEN => "\n손익분기 날짜:",
        DETAIL_PURCHASE_DATE => "구매일:",
        DETAIL_DISCOUNT => "온디맨드 할인 배수:",
        DETAIL_RATES => "적용 요금 (온디맨드 / RI):",
        DETAIL_YEARLY => "RI 연간 약정액:",
        DETAIL_HOURS => "손익분기까지 시간:",
        DETAIL_TIMESTAMP => "손익분기 시각:",
        _ => "[missing translation]",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        INTRO => "You will be asked to input some pricing information. For reference, see these links.",
        INTRO_LINK_EC2 => "EC2: https://aws.amazon.com/ec2/pricing/reserved-instances/pricing/",
        INTRO_LINK_RDS => "RDS: https://aws.amazon.com/rds/pricing/",
        INTRO_LINK_ELASTICACHE => "ElastiCache: https://aws.amazon.com/elasticache/pricing/",
        PROMPT_ON_DEMAND => "\nInput the ON DEMAND HOURLY rate as float: ",
        PROMPT_RI => "Input the RESERVED EFFECTIVE HOURLY rate as float: ",
        PROMPT_PURCHASE_DATE => "Input the ANTICIPATED PURCHASE DATE in yyyy-mm-dd format: ",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        ERROR_INVALID_DATE => "Please enter a valid date in yyyy-mm-dd format.",
        ERROR_NEGATIVE_NUMBER => "Please enter a value of 0 or more.",
        RESULT_BREAKEVEN => "\nYour purchase will breakeven on",
        DETAIL_PURCHASE_DATE => "Purchase date:",
        DETAIL_DISCOUNT => "On-demand discount multiplier:",
        DETAIL_RATES => "Applied rates (on-demand / RI):",
        DETAIL_YEARLY => "RI yearly commitment:",
        DETAIL_HOURS => "Hours until breakeven:",
        DETAIL_TIMESTAMP => "Breakeven at:",
        _ => return None,
    })
}
