//! Edge case tests for fif-net
//!
//! Request building, response decoding, transport plumbing.

use fif_net::*;

// ============================================================================
// REQUEST BUILDER TESTS
// ============================================================================

#[test]
fn test_request_get_defaults() {
    let req = Request::parse_get("https://example.com/data.json").unwrap();
    assert_eq!(req.url.as_str(), "https://example.com/data.json");
    assert!(req.headers.is_empty());
}

#[test]
fn test_request_with_headers() {
    let req = Request::parse_get("https://example.com").unwrap()
        .with_header("Accept", "application/json")
        .with_header("Accept", "text/plain");

    assert_eq!(req.headers.len(), 1);
    assert_eq!(req.headers.get("Accept").unwrap(), "text/plain");
}

#[test]
fn test_query_pairs_preserve_order() {
    let req = Request::parse_get("https://example.com/s").unwrap()
        .with_query(vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]);
    assert_eq!(req.url.query(), Some("a=1&b=2"));
}

#[test]
fn test_empty_query_value_still_sent() {
    let req = Request::parse_get("https://example.com/s").unwrap()
        .with_query([("q", "")]);
    assert_eq!(req.url.query(), Some("q="));
}

// ============================================================================
// RESPONSE TESTS
// ============================================================================

#[test]
fn test_response_text() {
    let resp = FetchResponse::from(Response::new(200, "héllo"));
    assert_eq!(resp.text().unwrap(), "héllo");
    assert_eq!(resp.bytes().len(), "héllo".len());
}

#[test]
fn test_response_invalid_utf8() {
    let resp = FetchResponse::from(Response::new(200, vec![0xff, 0xfe]));
    assert!(matches!(resp.text(), Err(NetError::Decode(_))));
}

#[test]
fn test_status_boundaries() {
    assert!(FetchResponse::from(Response::new(200, "")).ok());
    assert!(FetchResponse::from(Response::new(299, "")).ok());
    assert!(!FetchResponse::from(Response::new(300, "")).ok());
    assert!(!FetchResponse::from(Response::new(199, "")).ok());
}

// ============================================================================
// TRANSPORT TESTS
// ============================================================================

#[test]
fn test_transport_is_object_safe() {
    let transport: Box<dyn Transport> = Box::new(
        MemoryTransport::new().route("https://api.test/x", Response::json("[]")),
    );
    let req = Request::parse_get("https://api.test/x").unwrap();
    let resp = smol::block_on(transport.send(req)).unwrap();
    assert_eq!(resp.json::<Vec<serde_json::Value>>().unwrap().len(), 0);
}

#[test]
fn test_http_transport_builds() {
    assert!(HttpTransport::new().is_ok());
}
