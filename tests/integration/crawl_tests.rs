//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use doc_harvest::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use doc_harvest::crawler::{crawl, crawl_site, CrawlReport, CrawlSettings, CrawlTarget};
use doc_harvest::output::{COMBINED_CONTEXT_FILE, PAGE_SEPARATOR};
use doc_harvest::state::PageOutcome;
use doc_harvest::HarvestError;
use std::fs;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Wraps a body fragment in a minimal documentation page
fn page(title: &str, main: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body>
        <nav><a href="/docs/nav-only">Nav</a></nav>
        <main><h1>{title}</h1>{main}</main>
        <footer>Footer text</footer>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn settings(workers: usize) -> CrawlSettings {
    CrawlSettings {
        workers,
        user_agent: UserAgentConfig {
            crawler_name: "TestHarvester".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: None,
        },
        request_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
    }
}

async fn run(server: &MockServer, out: &Path, workers: usize) -> Result<CrawlReport, HarvestError> {
    let target = CrawlTarget::new(&format!("{}/docs", server.uri()), out).unwrap();
    crawl_site(target, settings(workers)).await
}

/// Sorted names of the page files in a directory
fn page_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".md"))
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_cycle_yields_one_file_per_page() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    mount_page(
        &server,
        "/docs",
        page("Home", r#"<p>Welcome</p><a href="/docs/a">A</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/docs/a",
        page("Page A", r#"<p>Alpha</p><a href="/docs/b">B</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/docs/b",
        page("Page B", r#"<p>Beta</p><a href="/docs/a">back to A</a><a href="/docs">home</a>"#),
    )
    .await;

    let report = run(&server, out.path(), 1).await.unwrap();

    assert_eq!(page_files(out.path()), vec!["_a.md", "_b.md", "index.md"]);
    assert_eq!(report.pages_written(), 3);
    assert_eq!(report.pages_failed(), 0);

    let a = fs::read_to_string(out.path().join("_a.md")).unwrap();
    assert!(a.starts_with("---\ntitle: Page A\nurl: "));
    assert!(a.contains(&format!("url: {}/docs/a\n", server.uri())));
    assert!(a.contains("parsed_at: "));
    assert!(a.contains("Alpha"));
    assert!(!a.contains("Footer text"));
}

#[tokio::test]
async fn test_output_directory_cleared_between_runs() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("stale.md"), "from an earlier run").unwrap();

    mount_page(&server, "/docs", page("Home", "<p>Only page</p>")).await;

    run(&server, out.path(), 1).await.unwrap();
    assert_eq!(page_files(out.path()), vec!["index.md"]);

    let first = fs::read_to_string(out.path().join("index.md")).unwrap();
    run(&server, out.path(), 1).await.unwrap();
    let second = fs::read_to_string(out.path().join("index.md")).unwrap();

    assert_eq!(page_files(out.path()), vec!["index.md"]);
    // Only the timestamp line may differ between runs
    let strip = |s: &str| {
        s.lines()
            .filter(|l| !l.starts_with("parsed_at:"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(strip(&first), strip(&second));
}

#[tokio::test]
async fn test_off_site_and_ignored_links_never_fetched() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    mount_page(
        &server,
        "/docs",
        page(
            "Home",
            r##"<a href="/blog/post">Blog</a>
               <a href="https://elsewhere.example/docs">Elsewhere</a>
               <a href="/docs/logo.png">Logo</a>
               <a href="/docs/guide?utm_source=x">Tracked</a>
               <a href="mailto:team@example.com">Mail</a>
               <a href="javascript:void(0)">JS</a>
               <a href="#section">Anchor</a>
               <a href="/docs/real">Real</a>"##,
        ),
    )
    .await;
    mount_page(&server, "/docs/real", page("Real", "<p>Real page</p>")).await;

    for never in ["/blog/post", "/docs/logo.png", "/docs/guide", "/docs/nav-only"] {
        Mock::given(method("GET"))
            .and(path(never))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
    }

    let report = run(&server, out.path(), 1).await.unwrap();

    assert_eq!(page_files(out.path()), vec!["_real.md", "index.md"]);
    assert_eq!(report.links_followed, 1);
    assert!(report.links_rejected >= 7);
}

#[tokio::test]
async fn test_root_fetch_failure_is_fatal() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = run(&server, out.path(), 1).await;

    assert!(matches!(result, Err(HarvestError::RootFetch { .. })));
    assert!(page_files(out.path()).is_empty());
    assert!(!out.path().join(COMBINED_CONTEXT_FILE).exists());
}

#[tokio::test]
async fn test_failed_child_page_is_skipped() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    mount_page(
        &server,
        "/docs",
        page(
            "Home",
            r#"<a href="/docs/missing">Missing</a><a href="/docs/ok">Ok</a>"#,
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/docs/ok", page("Ok", "<p>Fine</p>")).await;

    let report = run(&server, out.path(), 1).await.unwrap();

    assert_eq!(page_files(out.path()), vec!["_ok.md", "index.md"]);
    assert_eq!(report.outcomes.get(&PageOutcome::HttpError), Some(&1));
    assert_eq!(report.pages_written(), 2);
}

#[tokio::test]
async fn test_slug_collision_keeps_later_page() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    mount_page(
        &server,
        "/docs",
        page(
            "Home",
            r#"<a href="/docs/a-b">dash</a><a href="/docs/a.b">dot</a>"#,
        ),
    )
    .await;
    mount_page(&server, "/docs/a-b", page("Dash", "<p>First body</p>")).await;
    mount_page(&server, "/docs/a.b", page("Dot", "<p>Second body</p>")).await;

    let report = run(&server, out.path(), 1).await.unwrap();

    assert_eq!(page_files(out.path()), vec!["_a_b.md", "index.md"]);
    let collided = fs::read_to_string(out.path().join("_a_b.md")).unwrap();
    assert!(collided.contains("Second body"));
    assert!(!collided.contains("First body"));
    assert_eq!(report.outcomes.get(&PageOutcome::Overwrote), Some(&1));
    assert_eq!(report.outcomes.get(&PageOutcome::Written), Some(&2));
}

#[tokio::test]
async fn test_write_failure_still_follows_links() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    // File name longer than the file system allows
    let long_path = format!("/docs/{}", "a".repeat(300));

    mount_page(
        &server,
        "/docs",
        page("Home", &format!(r#"<a href="{}">Long</a>"#, long_path)),
    )
    .await;
    mount_page(
        &server,
        &long_path,
        page("Long", r#"<a href="/docs/after">After</a>"#),
    )
    .await;
    mount_page(&server, "/docs/after", page("After", "<p>Reached</p>")).await;

    let report = run(&server, out.path(), 1).await.unwrap();

    assert_eq!(report.outcomes.get(&PageOutcome::WriteFailed), Some(&1));
    assert_eq!(page_files(out.path()), vec!["_after.md", "index.md"]);
    assert_eq!(report.pages_written(), 2);
    assert_eq!(report.pages_failed(), 1);
}

#[tokio::test]
async fn test_extraction_falls_back_to_body() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    mount_page(
        &server,
        "/docs",
        r#"<html><body>
            <header>Site header</header>
            <div><p>Loose body content</p></div>
            <script>var tracking = 1;</script>
        </body></html>"#
            .to_string(),
    )
    .await;

    run(&server, out.path(), 1).await.unwrap();

    let index = fs::read_to_string(out.path().join("index.md")).unwrap();
    assert!(index.contains("title: untitled\n"));
    assert!(index.contains("Loose body content"));
    assert!(!index.contains("Site header"));
    assert!(!index.contains("tracking"));
}

#[tokio::test]
async fn test_combined_corpus_contains_every_page() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    mount_page(
        &server,
        "/docs",
        page(
            "Home",
            r#"<a href="/docs/one">1</a><a href="/docs/two">2</a><a href="/docs/three">3</a>"#,
        ),
    )
    .await;
    for (at, title) in [("/docs/one", "One"), ("/docs/two", "Two"), ("/docs/three", "Three")] {
        mount_page(&server, at, page(title, &format!("<p>Body of {}</p>", title))).await;
    }

    let report = run(&server, out.path(), 1).await.unwrap();

    let corpus = fs::read_to_string(&report.corpus_path).unwrap();
    assert_eq!(report.corpus_bytes, corpus.len());
    assert_eq!(corpus.matches(PAGE_SEPARATOR).count(), 3);

    for name in page_files(out.path()) {
        let content = fs::read_to_string(out.path().join(&name)).unwrap();
        assert!(corpus.contains(&content), "{} missing from corpus", name);
    }
}

#[tokio::test]
async fn test_concurrent_workers_crawl_same_pages() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    let links: String = (0..8)
        .map(|i| format!(r#"<a href="/docs/p{i}">P{i}</a>"#))
        .collect();
    mount_page(&server, "/docs", page("Home", &links)).await;
    for i in 0..8 {
        Mock::given(method("GET"))
            .and(path(format!("/docs/p{i}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(page(&format!("P{i}"), r#"<a href="/docs">home</a>"#))
                    .set_delay(Duration::from_millis(20)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let report = run(&server, out.path(), 4).await.unwrap();

    assert_eq!(page_files(out.path()).len(), 9);
    assert_eq!(report.pages_written(), 9);
}

#[tokio::test]
async fn test_crawl_from_config() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();
    let out_dir = out.path().join("extracted_context");

    mount_page(&server, "/docs", page("Home", "<p>Configured</p>")).await;

    let config = Config {
        crawler: CrawlerConfig {
            root_url: format!("{}/docs", server.uri()),
            workers: 2,
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
        },
        user_agent: UserAgentConfig::default(),
        output: OutputConfig {
            directory: out_dir.to_string_lossy().into_owned(),
            preamble_path: None,
            context_path: None,
        },
    };

    let report = crawl(config).await.unwrap();

    assert_eq!(report.corpus_path, out_dir.join(COMBINED_CONTEXT_FILE));
    assert!(fs::read_to_string(&report.corpus_path)
        .unwrap()
        .contains("Configured"));
}
