//! 손익분기 계산 로직을 라이브러리로 분리하여 대화형 CLI 없이도 호출할 수 있게 한다.

pub mod app;
pub mod breakeven;
pub mod config;
pub mod i18n;
pub mod logging;
pub mod pricing;
pub mod ui_cli;
