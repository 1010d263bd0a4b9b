use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 로그 구독자를 초기화한다. 결과 출력과 섞이지 않도록 stderr로 보낸다.
///
/// `RUST_LOG`가 있으면 그 필터를 따르고, 없으면 `default_directive`를 쓴다.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // 테스트 등에서 이미 설정되어 있으면 그대로 둔다.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
