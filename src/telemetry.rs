use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_QUESTION_CNTR: CounterVec = register_counter_vec!(
        "quiz_questions_served_total",
        "Number of quiz questions served to players",
        &["category"]
    )
    .unwrap();
}

pub fn init_tracing() {
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer())
        .init();
}
