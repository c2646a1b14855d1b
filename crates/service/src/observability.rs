use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

// Prometheus metrics (default registry)
pub static STORE_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "restaurant_store_operations_total",
        "Store operations by entity and operation",
        &["entity", "operation"]
    )
    .expect("register store_operations_total")
});

pub static STORE_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "restaurant_store_errors_total",
        "Failed store operations by error kind",
        &["kind"]
    )
    .expect("register store_errors_total")
});

pub static STORE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "restaurant_store_duration_seconds",
        "Store operation duration in seconds",
        &["entity"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("register store_duration")
});

pub static AI_FALLBACKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "restaurant_ai_fallbacks_total",
        "Assistant answers replaced by the deterministic fallback",
        &["capability"]
    )
    .expect("register ai_fallbacks_total")
});

/// Text exposition of the default registry.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        STORE_OPERATIONS_TOTAL.with_label_values(&["menu", "create"]).inc();
        AI_FALLBACKS_TOTAL.with_label_values(&["chat"]).inc();
        let text = encode_metrics().expect("encode");
        assert!(text.contains("restaurant_store_operations_total"));
        assert!(text.contains("restaurant_ai_fallbacks_total"));
    }
}
