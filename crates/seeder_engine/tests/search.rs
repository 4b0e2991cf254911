use std::sync::Arc;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use seeder_core::{Query, QueryGenerator};
use seeder_engine::{
    FailureKind, FetchSettings, HtmlSearchClient, ReqwestFetcher, SearchBackend, SearchError,
    SearchSettings,
};
use url::Url;
use wiremock::matchers::{method, path, query_param_contains};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query() -> Query {
    QueryGenerator::with_rng("pdf", 10, StdRng::seed_from_u64(1)).next_query()
}

fn client(endpoint: String) -> HtmlSearchClient {
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap());
    let settings = SearchSettings {
        endpoint,
        ..SearchSettings::default()
    };
    HtmlSearchClient::new(fetcher, settings)
}

#[test]
fn query_url_is_form_encoded() {
    let client = client("https://search.example/search".to_string());
    let query = query();
    let url = client.query_url(&query).unwrap();

    let expected = format!(
        "https://search.example/search?q=filetype%3Apdf+{}",
        query.token()
    );
    assert_eq!(url.as_str(), expected);
}

#[test]
fn invalid_endpoint_is_reported() {
    let client = client("no scheme here".to_string());
    assert!(matches!(
        client.query_url(&query()),
        Err(SearchError::InvalidEndpoint { .. })
    ));
}

#[test]
fn backend_owned_hosts_are_recognised() {
    let client = client("https://www.google.co.uk/search".to_string());
    let owned = [
        "https://www.google.co.uk/preferences",
        "https://google.com/intl/en/about",
        "http://webcache.googleusercontent.com/search?q=cache:x",
        "https://webcache.googleusercontent.com/search?q=cache:y",
        "https://policies.google.com/privacy",
        "https://support.google.com/websearch",
        "https://maps.google.co.uk/maps",
        "https://WWW.GOOGLE.DE/",
    ];
    for link in owned {
        assert!(client.is_backend_owned(&Url::parse(link).unwrap()), "{link}");
    }
    let foreign = [
        "https://example.com/paper.pdf",
        "https://notgoogle.com/a.pdf",
        "https://docs.example.org/google.pdf",
    ];
    for link in foreign {
        assert!(!client.is_backend_owned(&Url::parse(link).unwrap()), "{link}");
    }
}

#[tokio::test]
async fn search_extracts_and_filters_links() {
    let server = MockServer::start().await;
    let page = r#"
        <html><body>
            <a href="https://www.google.co.uk/preferences">Settings</a>
            <a href="https://webcache.googleusercontent.com/search?q=cache:abc">Cached</a>
            <a href="https://papers.example/one.pdf">One</a>
            <a href="/local/two.pdf">Two</a>
            <a href="https://papers.example/one.pdf#page=3">One again</a>
            <a href="https://support.google.com/websearch">Help</a>
        </body></html>
    "#;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param_contains("q", "filetype:pdf "))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html; charset=utf-8"))
        .mount(&server)
        .await;

    let client = client(format!("{}/search", server.uri()));
    let links: Vec<String> = client
        .search(&query())
        .await
        .unwrap()
        .into_iter()
        .map(String::from)
        .collect();

    assert_eq!(
        links,
        vec![
            "https://papers.example/one.pdf".to_string(),
            format!("{}/local/two.pdf", server.uri()),
        ]
    );
}

#[tokio::test]
async fn page_without_links_is_empty_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html><p>no results</p></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let links = client(format!("{}/search", server.uri()))
        .search(&query())
        .await
        .unwrap();
    assert!(links.is_empty());
}

#[tokio::test]
async fn backend_error_is_a_single_search_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client(format!("{}/search", server.uri()))
        .search(&query())
        .await
        .unwrap_err();
    match err {
        SearchError::Fetch(fetch) => assert_eq!(fetch.kind, FailureKind::HttpStatus(429)),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn stray_bytes_do_not_hide_links() {
    let server = MockServer::start().await;
    let mut page = b"<html><body><p>caf".to_vec();
    page.push(0xe9);
    page.extend_from_slice(br#"</p><a href="https://papers.example/one.pdf">One</a>"#);
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html; charset=UTF-8"))
        .mount(&server)
        .await;

    let links = client(format!("{}/search", server.uri()))
        .search(&query())
        .await
        .unwrap();
    assert_eq!(links, vec![Url::parse("https://papers.example/one.pdf").unwrap()]);
}
