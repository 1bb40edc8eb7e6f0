use crate::cascade::CascadeReport;

lazy_static! {

    pub static ref HANDLER_SECS: prometheus::HistogramVec = register_histogram_vec!(
        "tuiter_handler_secs",
        "Seconds taken for each response, partitioned by endpoint name",
        &["endpoint_name"],
        vec![0.01, 0.1, 0.5, 1.0, 4.0] // Prometheus buckets
    )
    .expect("couldn't make HANDLER_SECS");

    pub static ref RESPONSES: prometheus::IntCounterVec = register_int_counter_vec!(
        "tuiter_responses",
        "How many responses of Ok/Err per endpoint",
        &["endpoint_name", "result"]
    )
    .expect("couldn't make RESPONSES");

    pub static ref HTTP_RESPONSES: prometheus::IntCounterVec = register_int_counter_vec!(
        "tuiter_http_responses",
        "Count of each HTTP status code served by tuiter responses",
        &["status"]
    )
    .expect("couldn't make HTTP_RESPONSES");

    pub static ref CASCADE_REMOVED: prometheus::IntCounterVec = register_int_counter_vec!(
        "tuiter_cascade_removed",
        "Records removed by cascading deletes, partitioned by the deleted root entity and collection",
        &["root", "collection"]
    )
    .expect("couldn't make CASCADE_REMOVED");
}

/// Count what a completed cascade removed.
pub fn record_cascade(root: &str, removed: &CascadeReport) {
    let counts = [
        ("follows", removed.follows),
        ("bookmarks", removed.bookmarks),
        ("likes", removed.likes),
        ("posts", removed.posts),
    ];
    for &(collection, count) in counts.iter() {
        CASCADE_REMOVED
            .with_label_values(&[root, collection])
            .inc_by(count as _);
    }
}

pub mod endpoint {
    use actix_web::{http, HttpRequest, HttpResponse};
    use prometheus::Encoder;

    pub async fn gather(_req: HttpRequest) -> HttpResponse {
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = vec![];
        let metric_families = prometheus::gather();
        match encoder.encode(&metric_families, &mut buffer) {
            Ok(()) => HttpResponse::build(http::StatusCode::OK).body(buffer),
            Err(e) => {
                let message = format!("{:?}", e);
                HttpResponse::build(http::StatusCode::INTERNAL_SERVER_ERROR).body(message)
            }
        }
    }
}
