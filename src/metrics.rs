//! Prometheus counters for certificate issuance.

use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

lazy_static! {
    pub static ref CERTIFICATES_ISSUED: IntCounter = register_int_counter!(
        "certificates_issued_total",
        "Certificates rendered and delivered to the user"
    )
    .expect("Failed to register certificates_issued_total");
    pub static ref CERTIFICATE_FAILURES: IntCounterVec = register_int_counter_vec!(
        "certificate_failures_total",
        "Certificate flows that ended in an error, by failure kind",
        &["kind"]
    )
    .expect("Failed to register certificate_failures_total");
}

pub fn record_issued() {
    CERTIFICATES_ISSUED.inc();
}

pub fn record_failure(kind: &str) {
    CERTIFICATE_FAILURES.with_label_values(&[kind]).inc();
}

/// All registered metrics in the Prometheus text exposition format.
pub fn render() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        log::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}
