use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("life-audit-api"));

// --- LLM metrics ---

pub static GEN_AI_TOKEN_USAGE: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("gen_ai.client.token.usage")
        .with_description("Number of tokens used per LLM call")
        .with_unit("{token}")
        .build()
});

pub static GEN_AI_OPERATION_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("gen_ai.client.operation.duration")
        .with_description("Duration of LLM operations in seconds")
        .with_unit("s")
        .build()
});

pub static GEN_AI_RETRY_COUNT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("gen_ai.client.retry.count")
        .with_description("Number of LLM call retries")
        .with_unit("{retry}")
        .build()
});

pub static GEN_AI_ERROR_COUNT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("gen_ai.client.error.count")
        .with_description("Number of LLM call errors")
        .with_unit("{error}")
        .build()
});

// --- Domain metrics ---

pub static SESSIONS_STARTED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("audit.sessions.started")
        .with_description("Total audit sessions started")
        .build()
});

pub static RESPONSES_SAVED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("audit.responses.saved")
        .with_description("Total domain responses saved")
        .build()
});

pub static REPORTS_GENERATED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("audit.reports.generated")
        .with_description("Total reports generated successfully")
        .build()
});

pub static GENERATION_FAILURES: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("audit.reports.failed")
        .with_description("Total failed generation attempts")
        .build()
});

pub static REPORT_GENERATION_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("audit.report.generation.duration")
        .with_description("End-to-end report generation duration in seconds")
        .with_unit("s")
        .build()
});

pub static STUCK_SESSIONS_SWEPT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("audit.sessions.swept")
        .with_description("Sessions re-armed after getting stuck in generating")
        .build()
});

pub static RATE_LIMIT_DENIED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("rate_limit.denied")
        .with_description("Requests denied by the rate governor")
        .build()
});

pub static USERS_REGISTERED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("users.registered")
        .with_description("Total users registered")
        .build()
});

pub static REPORTS_EMAILED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("audit.reports.emailed")
        .with_description("Total reports delivered by email")
        .build()
});

// --- HTTP metrics ---

pub static HTTP_REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("http.requests.total")
        .with_description("Total number of HTTP requests")
        .with_unit("{request}")
        .build()
});

pub static HTTP_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("http.request.duration")
        .with_description("HTTP request duration in milliseconds")
        .with_unit("ms")
        .with_boundaries(vec![
            1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0,
            30000.0, 60000.0, 120000.0,
        ])
        .build()
});
