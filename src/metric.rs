use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("pet_medical_statds")
        .with_description("Pet medical records statistics")
        .with_unit("attempt")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

pub fn incr_medical_action_statds(action: &str) {
    incr_statds("medical_action".to_string(), action.into())
}

pub fn incr_rejection_statds(reason: &str) {
    incr_statds("rejection".to_string(), reason.into())
}
