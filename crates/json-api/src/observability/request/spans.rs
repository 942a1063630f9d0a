//! HTTP span helpers.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = normalise_path_for_span_name(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

/// Route template for a concrete path: UUID segments become `{uuid}` so
/// metrics and span names stay low-cardinality.
fn normalise_path_for_span_name(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_templated() {
        let names = request_span_name(
            "GET",
            "/catalog/categories/0192f1a4-7c3e-7000-8000-000000000001/products",
        );

        assert_eq!(names.otel_path, "/catalog/categories/{uuid}/products");
        assert_eq!(
            names.otel_span_name,
            "GET /catalog/categories/{uuid}/products"
        );
    }

    #[test]
    fn root_and_plain_paths_are_unchanged() {
        assert_eq!(request_span_name("GET", "/").otel_path, "/");
        assert_eq!(
            request_span_name("POST", "/recommendations").otel_span_name,
            "POST /recommendations"
        );
    }
}
