use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_QUESTION_CNTR: CounterVec = register_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions handed out by the quiz picker",
        &["category"]
    )
    .unwrap();
}

pub const SERVER_LOG_FILTER: &str = "info,tower_http=debug";
pub const CLI_LOG_FILTER: &str = "warn,cli=info,trivia_api=info";

/// `LOG_LEVEL` overrides `default_filter`; `INCLUDE_SPAN_EVENTS=true` adds span enter/exit events.
pub fn init_tracing(default_filter: &str) {
    let mut fmt_layer = fmt::layer().with_target(true);
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
