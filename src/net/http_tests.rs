//! Tests for HTTP request/response value types.

use super::{HttpRequest, HttpResponse};

fn test_url() -> url::Url {
    url::Url::parse("https://gateway.example.com/v1/notify").unwrap()
}

mod request_builders {
    use super::*;

    #[test]
    fn get_uses_get_method() {
        let request = HttpRequest::get(test_url());

        assert_eq!(request.method, http::Method::GET);
        assert!(request.body.is_none());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn post_uses_post_method() {
        let request = HttpRequest::post(test_url());

        assert_eq!(request.method, http::Method::POST);
    }

    #[test]
    fn with_header_appends_values() {
        let request = HttpRequest::get(test_url())
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/plain"),
            );

        let values: Vec<_> = request.headers.get_all(http::header::ACCEPT).iter().collect();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn with_json_sets_body_and_content_type() {
        let payload = serde_json::json!({"accounts": ["eip155:1:0xABC"]});
        let request = HttpRequest::post(test_url()).with_json(&payload).unwrap();

        assert_eq!(
            request.headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value =
            serde_json::from_slice(&request.body.unwrap()).unwrap();
        assert_eq!(body["accounts"][0], "eip155:1:0xABC");
    }
}

mod response_accessors {
    use super::*;

    #[test]
    fn is_success_for_2xx() {
        let response = HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), vec![]);
        assert!(response.is_success());

        let response = HttpResponse::new(
            http::StatusCode::INTERNAL_SERVER_ERROR,
            http::HeaderMap::new(),
            vec![],
        );
        assert!(!response.is_success());
    }

    #[test]
    fn body_text_requires_utf8() {
        let response = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            b"hello".to_vec(),
        );
        assert_eq!(response.body_text(), Some("hello"));

        let response =
            HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), vec![0xff, 0xfe]);
        assert!(response.body_text().is_none());
    }

    #[test]
    fn json_decodes_typed_body() {
        let response = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            br#"["eip155:1:0xABC","eip155:1:0xDEF"]"#.to_vec(),
        );

        let subscribers: Vec<String> = response.json().unwrap();
        assert_eq!(subscribers.len(), 2);
    }

    #[test]
    fn json_rejects_malformed_body() {
        let response = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            b"<html>gateway timeout</html>".to_vec(),
        );

        let decoded: Result<Vec<String>, _> = response.json();
        assert!(decoded.is_err());
    }
}
