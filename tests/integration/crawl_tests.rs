use crate::support::{bare_detail_page, detail_page, index_page, mount_page, test_config};
use realestate_crawler::config::{ExtractorConfig, FetchErrorPolicy, SiteConfig};
use realestate_crawler::crawler::{Coordinator, Fetcher, LinkDiscoverer, SiteLayout};
use realestate_crawler::url::ExclusionList;
use realestate_crawler::{CrawlPhase, CrawlerError, Residence};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Three chained index pages. Page 2 repeats project b; page 1 links an
/// excluded project; page 3 points its pagination back at page 2.
async fn mount_paginated_site(server: &MockServer, detail_visits: u64) {
    mount_page(
        server,
        "/residential/",
        index_page(
            &["/projects/a/", "/projects/b/", "/projects/falcon-city/"],
            Some("/residential/page/2/"),
        ),
        1,
    )
    .await;
    mount_page(
        server,
        "/residential/page/2/",
        index_page(&["/projects/b/", "/projects/c/"], Some("/residential/page/3/")),
        1,
    )
    .await;
    mount_page(
        server,
        "/residential/page/3/",
        index_page(&["/projects/d/"], Some("/residential/page/2/")),
        1,
    )
    .await;

    mount_page(
        server,
        "/projects/a/",
        detail_page("12 Acres", "248", "1800-102-9977"),
        detail_visits,
    )
    .await;
    mount_page(server, "/projects/b/", bare_detail_page(), detail_visits).await;
    mount_page(
        server,
        "/projects/c/",
        detail_page("4.5 Acres", "96", "080-4655 5555"),
        detail_visits,
    )
    .await;
    mount_page(
        server,
        "/projects/d/",
        detail_page("30 Acres", "1,200", "1800-313-0080"),
        detail_visits,
    )
    .await;
    mount_page(server, "/projects/falcon-city/", bare_detail_page(), 0).await;
}

fn layout() -> SiteLayout {
    SiteLayout::from_config(&ExtractorConfig::default()).expect("default layout")
}

#[tokio::test]
async fn test_discovery_dedups_excludes_and_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_paginated_site(&mock_server, 1).await;

    let config = test_config(vec![]);
    let fetcher = Fetcher::from_config(&config.crawler).expect("client");
    let layout = layout();
    let discoverer = LinkDiscoverer::new(&fetcher, &layout, FetchErrorPolicy::Abort);

    let urls = discoverer
        .discover(
            &format!("{}/residential/", base_url),
            &ExclusionList::new(vec!["falcon-city".to_string()]),
        )
        .await
        .expect("discovery failed");

    let expected: Vec<String> = ["a", "b", "c", "d"]
        .iter()
        .map(|p| format!("{}/projects/{}/", base_url, p))
        .collect();
    assert_eq!(urls, expected);

    for url in &urls {
        assert!(url.contains("projects/"));
        assert_eq!(urls.iter().filter(|u| *u == url).count(), 1);
    }

    // 3 index pages + 4 detail pages, each once
    assert_eq!(fetcher.counters().pages_fetched, 7);
}

#[tokio::test]
async fn test_discovery_without_following_detail_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_paginated_site(&mock_server, 0).await;

    let config = test_config(vec![]);
    let fetcher = Fetcher::from_config(&config.crawler).expect("client");
    let layout = layout();
    let discoverer = LinkDiscoverer::new(&fetcher, &layout, FetchErrorPolicy::Abort)
        .follow_detail_pages(false);

    let urls = discoverer
        .discover(
            &format!("{}/residential/", base_url),
            &ExclusionList::new(vec!["falcon-city".to_string()]),
        )
        .await
        .expect("discovery failed");

    assert_eq!(urls.len(), 4);
    assert_eq!(fetcher.counters().pages_fetched, 3);
}

#[tokio::test]
async fn test_pagination_chain_visits_each_page_once() {
    const PAGES: usize = 6;

    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for n in 1..=PAGES {
        // The last page links back to the first
        let next = if n == PAGES { 1 } else { n + 1 };
        let project = format!("/projects/p{}/", n);
        let next_url = format!("{}/listing/{}/", base_url, next);
        mount_page(
            &mock_server,
            &format!("/listing/{}/", n),
            index_page(&[project.as_str()], Some(next_url.as_str())),
            1,
        )
        .await;
    }

    let config = test_config(vec![]);
    let fetcher = Fetcher::from_config(&config.crawler).expect("client");
    let layout = layout();
    let discoverer = LinkDiscoverer::new(&fetcher, &layout, FetchErrorPolicy::Skip)
        .follow_detail_pages(false);

    let urls = discoverer
        .discover(&format!("{}/listing/1/", base_url), &ExclusionList::default())
        .await
        .expect("discovery failed");

    assert_eq!(urls.len(), PAGES);
    assert_eq!(fetcher.counters().pages_fetched, PAGES as u64);
}

#[tokio::test]
async fn test_detail_pages_can_reveal_more_projects() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/index/", index_page(&["/projects/main/"], None), 1).await;
    mount_page(
        &mock_server,
        "/projects/main/",
        r#"<html><body>
        <ul class="list-two-col">
            <li>Development Size: 1 Acre</li>
            <li>Number of Units: 10</li>
            <li>Contact No: 111</li>
        </ul>
        <aside><a href="/projects/sibling/">Sibling</a></aside>
        </body></html>"#
            .to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/projects/sibling/", bare_detail_page(), 1).await;

    let config = test_config(vec![]);
    let fetcher = Fetcher::from_config(&config.crawler).expect("client");
    let layout = layout();
    let discoverer = LinkDiscoverer::new(&fetcher, &layout, FetchErrorPolicy::Abort);

    let urls = discoverer
        .discover(&format!("{}/index/", base_url), &ExclusionList::default())
        .await
        .expect("discovery failed");

    assert_eq!(
        urls,
        vec![
            format!("{}/projects/main/", base_url),
            format!("{}/projects/sibling/", base_url),
        ]
    );
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    // Detail pages are rendered once during discovery and once for extraction
    mount_paginated_site(&mock_server, 2).await;

    let config = test_config(vec![SiteConfig::new(
        format!("{}/residential/", base_url),
        "Chennai",
        vec!["falcon-city".to_string()],
    )]);

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let records = coordinator.run().await.expect("Crawl failed");

    assert_eq!(coordinator.phase(), CrawlPhase::Done);
    assert_eq!(records.len(), 4);

    assert_eq!(
        records[0],
        Residence {
            name: "a".to_string(),
            url: format!("{}/projects/a/", base_url),
            city: "Chennai".to_string(),
            project_size: "12 Acres".to_string(),
            num_units: "248".to_string(),
            phone_no: "1800-102-9977".to_string(),
        }
    );

    // Missing block gives a sparse record, not an error
    assert_eq!(records[1].name, "b");
    assert!(records[1].is_sparse());

    assert_eq!(records[2].phone_no, "080-4655 5555");
    assert_eq!(records[3].num_units, "1,200");
    assert!(records.iter().all(|r| r.city == "Chennai"));

    let stats = coordinator.statistics(&records);
    assert_eq!(stats.total_records, 4);
    assert_eq!(stats.sparse_records, 1);
    assert_eq!(stats.records_skipped, 0);
}

#[tokio::test]
async fn test_records_grouped_by_site_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/kochi/",
        index_page(&["/projects/kochi-one/", "/projects/kochi-two/"], None),
        1,
    )
    .await;
    mount_page(&mock_server, "/chennai/", index_page(&["/projects/chennai-one/"], None), 1).await;
    for project in ["kochi-one", "kochi-two", "chennai-one"] {
        mount_page(
            &mock_server,
            &format!("/projects/{}/", project),
            detail_page("2 Acres", "20", "222"),
            1,
        )
        .await;
    }

    let mut config = test_config(vec![
        SiteConfig::new(format!("{}/kochi/", base_url), "Kochi", vec![]),
        SiteConfig::new(format!("{}/chennai/", base_url), "Chennai", vec![]),
    ]);
    config.crawler.follow_detail_pages = false;

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let records = coordinator.run().await.expect("Crawl failed");

    let summary: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.city.as_str(), r.name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Kochi", "kochi-one"),
            ("Kochi", "kochi-two"),
            ("Chennai", "chennai-one"),
        ]
    );
}

#[tokio::test]
async fn test_non_success_status_is_not_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/index/",
        index_page(&["/projects/gone/", "/projects/live/"], None),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/projects/gone/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/projects/live/", detail_page("3 Acres", "30", "333"), 1).await;

    let mut config = test_config(vec![SiteConfig::new(
        format!("{}/index/", base_url),
        "Kochi",
        vec![],
    )]);
    config.crawler.follow_detail_pages = false;
    config.crawler.on_fetch_error = FetchErrorPolicy::Abort;

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let records = coordinator.run().await.expect("404 must not abort the crawl");

    assert_eq!(records.len(), 2);
    assert!(records[0].is_sparse());
    assert_eq!(records[1].num_units, "30");
    assert_eq!(coordinator.fetcher().counters().non_success, 1);
}

/// Index page whose second project lives on a host that refuses connections
async fn mount_site_with_unreachable_project(mock_server: &MockServer) {
    mount_page(
        mock_server,
        "/index/",
        index_page(
            &["/projects/ok/", "http://127.0.0.1:9/projects/down/"],
            None,
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/projects/ok/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page("5 Acres", "50", "555")))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_skip_policy_drops_failed_records() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site_with_unreachable_project(&mock_server).await;

    let mut config = test_config(vec![SiteConfig::new(
        format!("{}/index/", base_url),
        "Bangalore",
        vec![],
    )]);
    config.crawler.on_fetch_error = FetchErrorPolicy::Skip;

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let records = coordinator.run().await.expect("skip policy must finish the run");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "ok");

    let stats = coordinator.statistics(&records);
    assert_eq!(stats.records_skipped, 1);
    // One failure while rendering during discovery, one during extraction
    assert_eq!(stats.fetch_failures, 2);
}

#[tokio::test]
async fn test_abort_policy_fails_the_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site_with_unreachable_project(&mock_server).await;

    let mut config = test_config(vec![SiteConfig::new(
        format!("{}/index/", base_url),
        "Bangalore",
        vec![],
    )]);
    config.crawler.on_fetch_error = FetchErrorPolicy::Abort;
    config.crawler.follow_detail_pages = false;

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let err = coordinator.run().await.expect_err("abort policy must fail");

    match err {
        CrawlerError::Fetch(fetch) => assert!(fetch.url().contains("/projects/down/")),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(coordinator.phase(), CrawlPhase::Failed);
}

#[tokio::test]
async fn test_requests_are_spaced_by_delay() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/index/",
        index_page(&["/projects/one/", "/projects/two/"], None),
        1,
    )
    .await;
    mount_page(&mock_server, "/projects/one/", bare_detail_page(), 1).await;
    mount_page(&mock_server, "/projects/two/", bare_detail_page(), 1).await;

    let delay = Duration::from_millis(200);
    let mut config = test_config(vec![SiteConfig::new(
        format!("{}/index/", base_url),
        "Kochi",
        vec![],
    )]);
    config.crawler.delay_ms = delay.as_millis() as u64;
    config.crawler.follow_detail_pages = false;

    let start = Instant::now();
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let records = coordinator.run().await.expect("Crawl failed");

    // Three requests to one host means at least two full delays
    assert_eq!(records.len(), 2);
    assert!(start.elapsed() >= delay * 2);
}

#[tokio::test]
async fn test_fragment_links_yield_one_record() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/index/",
        index_page(
            &["/projects/a/", "/projects/a/#amenities", "/projects/a/#location-map"],
            None,
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/projects/a/",
        detail_page("12 Acres", "248", "1800-102-9977"),
        1,
    )
    .await;

    let mut config = test_config(vec![SiteConfig::new(
        format!("{}/index/", base_url),
        "Bangalore",
        vec![],
    )]);
    config.crawler.follow_detail_pages = false;

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let records = coordinator.run().await.expect("Crawl failed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "a");
    assert_eq!(records[0].url, format!("{}/projects/a/", base_url));
    assert_eq!(records[0].num_units, "248");
}
