use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use ri_breakeven::{
    app::{self, AppError, RunOptions},
    breakeven, config,
    i18n::{self, describe_error, keys, Translator},
    logging,
    ui_cli::Prompter,
};
use tracing::debug;

/// 예약 인스턴스(RI) 구매의 손익분기 날짜 계산기.
/// 빠진 값은 대화형으로 입력받는다.
#[derive(Debug, Parser)]
#[command(name = "ri_breakeven", version, about)]
struct Cli {
    /// 온디맨드 시간당 요금 (할인 적용 전)
    #[arg(long)]
    on_demand: Option<f64>,

    /// RI 실효 시간당 요금 (--upfront 사용 시 시간당 약정분)
    #[arg(long)]
    ri: Option<f64>,

    /// 선결제 금액. 1년으로 상각해 RI 요금에 더한다.
    #[arg(long)]
    upfront: Option<f64>,

    /// 예상 구매일 (yyyy-mm-dd)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// 온디맨드 요금 할인 배수 (설정 파일 값을 덮어씀)
    #[arg(long)]
    discount: Option<f64>,

    /// 언어 (auto/ko/en)
    #[arg(long, short = 'L', env = "RI_BREAKEVEN_LANG")]
    lang: Option<String>,

    /// 설정 파일 경로
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 계산 근거(시간 수, 연간 약정액 등)도 출력
    #[arg(long)]
    details: bool,

    /// 요금표 안내 문구 생략
    #[arg(long)]
    no_intro: bool,

    /// 디버그 로그 출력 (RUST_LOG가 우선)
    #[arg(long, short)]
    verbose: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    breakeven::parse_purchase_date(s).map_err(|e| e.to_string())
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 계산기를 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(if cli.verbose { "debug" } else { "warn" });

    let mut tr = Translator::new(&i18n::resolve_language(cli.lang.as_deref(), None));
    match try_run(&cli, &mut tr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {}", tr.t(keys::ERROR_PREFIX), describe_error(&tr, &err));
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: &Cli, tr: &mut Translator) -> Result<(), AppError> {
    let cfg = config::load_or_default(&cli.config)?;
    *tr = Translator::new(&i18n::resolve_language(
        cli.lang.as_deref(),
        Some(cfg.language.as_str()),
    ));
    debug!(lang = tr.language().as_code(), "language resolved");

    let options = RunOptions {
        on_demand_hourly: cli.on_demand,
        ri_hourly: cli.ri,
        upfront: cli.upfront,
        purchase_date: cli.date,
        discount: cli.discount,
        details: cli.details,
        show_intro: !cli.no_intro,
    };
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
    app::run(&cfg, tr, &options, &mut prompter)?;
    Ok(())
}
