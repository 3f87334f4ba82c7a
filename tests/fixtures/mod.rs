//! QR payload fixtures shared by the integration and E2E suites

/// A payload to encode and the redirect the service should derive from it.
#[derive(Debug, Clone)]
pub struct QrPayloadFixture {
    pub payload: &'static str,
    pub expected_redirect: Option<&'static str>,
    pub description: &'static str,
}

pub const PAYLOAD_FIXTURES: &[QrPayloadFixture] = &[
    QrPayloadFixture {
        payload: "www.example.com/page",
        expected_redirect: Some("https://www.example.com/page"),
        description: "bare www address gets an https scheme",
    },
    QrPayloadFixture {
        payload: "https://example.com",
        expected_redirect: Some("https://example.com"),
        description: "https URL is returned as-is",
    },
    QrPayloadFixture {
        payload: "http://example.org/menu?table=12",
        expected_redirect: Some("http://example.org/menu?table=12"),
        description: "http URL with query string",
    },
    QrPayloadFixture {
        payload: "hello world",
        expected_redirect: None,
        description: "plain text",
    },
    QrPayloadFixture {
        payload: "WIFI:S:cafe;T:WPA;P:espresso;;",
        expected_redirect: None,
        description: "wifi credentials are not a URL",
    },
];
