use std::time::Duration;

use campus_engine::{
    decode_page, login, Credentials, PageSource, PortalClient, PortalConfig, PortalError,
};
use encoding_rs::EUC_KR;
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> PortalConfig {
    PortalConfig {
        base_url: server.uri(),
        ..PortalConfig::default()
    }
}

fn credentials() -> Credentials {
    Credentials {
        username: "student".to_string(),
        password: "pw".to_string(),
    }
}

#[tokio::test]
async fn client_fetches_and_queries_a_utf8_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><h1 class=\"title\">공지 사항</h1></body></html>",
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let client = PortalClient::new(&config_for(&server)).expect("client");
    let url = format!("{}/doc", server.uri());
    let page = client.fetch_page(&url).await.expect("fetch ok");

    assert_eq!(page.url(), url);
    assert_eq!(page.first_text("h1.title"), Some("공지 사항".to_string()));
}

#[tokio::test]
async fn client_reports_http_status_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = PortalClient::new(&config_for(&server)).expect("client");
    let err = client
        .fetch_page(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err, PortalError::HttpStatus(404));
}

#[tokio::test]
async fn client_times_out_on_slow_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let config = PortalConfig {
        request_timeout: Duration::from_millis(50),
        ..config_for(&server)
    };
    let client = PortalClient::new(&config).expect("client");
    let err = client
        .fetch_page(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err, PortalError::Timeout);
}

#[tokio::test]
async fn client_rejects_oversized_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(vec![b'x'; 64], "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let config = PortalConfig {
        max_bytes: 16,
        ..config_for(&server)
    };
    let client = PortalClient::new(&config).expect("client");
    let err = client
        .fetch_page(&format!("{}/large", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err, PortalError::TooLarge { max_bytes: 16 });
}

#[tokio::test]
async fn euc_kr_pages_decode_via_the_charset_header() {
    let html = "<html><body><p>과제 마감이 다가오고 있습니다</p></body></html>";
    let (bytes, _, _) = EUC_KR.encode(html);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/legacy"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(bytes.into_owned(), "text/html; charset=euc-kr"),
        )
        .mount(&server)
        .await;

    let client = PortalClient::new(&config_for(&server)).expect("client");
    let page = client
        .fetch_page(&format!("{}/legacy", server.uri()))
        .await
        .expect("fetch ok");

    assert!(page.text().contains("과제 마감"));
}

#[test]
fn decoding_detects_euc_kr_without_a_charset_header() {
    let html =
        "<html><body><p>이번 주에 제출해야 하는 과제와 시청해야 하는 강의 영상 목록입니다</p></body></html>";
    let (bytes, _, _) = EUC_KR.encode(html);

    let decoded = decode_page(&bytes, None).expect("decode ok");
    assert_eq!(decoded.encoding_label, "EUC-KR");
    assert!(decoded.text.contains("강의 영상"));
}

#[test]
fn decoding_honours_a_utf8_bom() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("<html><body>ok</body></html>".as_bytes());

    let decoded = decode_page(&bytes, Some("text/html; charset=euc-kr")).expect("decode ok");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[tokio::test]
async fn login_follows_the_redirect_off_the_login_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .and(body_string_contains("username=student"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body>대시보드</body></html>",
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = PortalClient::new(&config).expect("client");

    login(&client, &config, &credentials()).await.expect("login ok");
}

#[tokio::test]
async fn login_rejection_carries_the_portal_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><div id=\"loginerrormessage\">아이디 또는 비밀번호가 잘못 입력되었습니다.</div></body></html>",
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = PortalClient::new(&config).expect("client");

    let err = login(&client, &config, &credentials()).await.unwrap_err();
    match err {
        PortalError::LoginRejected(message) => {
            assert!(message.contains("잘못 입력"));
        }
        other => panic!("expected LoginRejected, got {other:?}"),
    }
}
