//! The crawl → extract → clean → summarize → validate → store pipeline.
//!
//! Sites are processed one after another, and so are the articles of a site.
//! Every stage returns a `Result`; a failed article is logged and skipped, a
//! failed homepage skips its site. Nothing that happens to a single item
//! stops the run.
//!
//! ```text
//! for each site:
//!     fetcher = make_fetcher()
//!     homepage → links (capped)
//!     for each link:
//!         fetch → extract → clean → summarize → validate → append
//!     fetcher.close()
//! ```

use crate::config::{CrawlSettings, Settings};
use crate::errors::{ArticleError, FetchError};
use crate::fetcher::PageFetcher;
use crate::models::{LinkCandidate, NewsRecord, RawArticle, SummarizedArticle};
use crate::outputs::RecordStore;
use crate::scrapers::cleaner::TextCleaner;
use crate::scrapers::content::extract_content;
use crate::scrapers::links::extract_links;
use crate::sites::Site;
use crate::summarizer::Summarizer;
use crate::utils::truncate_for_log;
use crate::validator::{SummaryLimits, validate};
use futures::stream::{self, StreamExt};
use scraper::Html;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Outcome of one site pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteReport {
    pub site: String,
    /// Link candidates kept after capping.
    pub links: usize,
    pub saved: usize,
    pub failed: usize,
    /// False when the site was skipped before its articles were read.
    pub completed: bool,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub sites: Vec<SiteReport>,
}

impl RunReport {
    pub fn saved(&self) -> usize {
        self.sites.iter().map(|s| s.saved).sum()
    }

    pub fn failed(&self) -> usize {
        self.sites.iter().map(|s| s.failed).sum()
    }
}

pub struct Pipeline<S, R> {
    crawl: CrawlSettings,
    limits: SummaryLimits,
    cleaner: TextCleaner,
    summarizer: S,
    store: R,
}

impl<S, R> Pipeline<S, R>
where
    S: Summarizer,
    R: RecordStore,
{
    pub fn new(settings: &Settings, summarizer: S, store: R) -> Self {
        Self {
            crawl: settings.crawl.clone(),
            limits: settings.limits,
            cleaner: TextCleaner::new(settings.locale),
            summarizer,
            store,
        }
    }

    /// Crawl every site once.
    ///
    /// # Arguments
    ///
    /// * `sites` - Validated sites, crawled in order
    /// * `make_fetcher` - Called at the start of each site pass; the fetcher
    ///   it returns is closed when the pass ends, whatever the outcome
    ///
    /// # Returns
    ///
    /// A [`RunReport`] with one [`SiteReport`] per site. Failures never
    /// abort the run: a site whose fetcher or homepage fails is reported as
    /// not completed, a failed article is counted and skipped.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let pipeline = Pipeline::new(&settings, summarizer, FileStore::new(&settings.output_dir));
    /// let report = pipeline.run(&sites, HttpFetcher::new).await;
    /// info!(saved = report.saved(), "done");
    /// ```
    #[instrument(level = "info", skip_all, fields(sites = sites.len(), provider = self.summarizer.name()))]
    pub async fn run<F, M>(&self, sites: &[Site], make_fetcher: M) -> RunReport
    where
        F: PageFetcher,
        M: Fn(&CrawlSettings) -> Result<F, FetchError>,
    {
        let t0 = Instant::now();
        let mut report = RunReport::default();

        for site in sites {
            report.sites.push(self.crawl_site(site, &make_fetcher).await);
        }

        info!(
            saved = report.saved(),
            failed = report.failed(),
            elapsed_ms = t0.elapsed().as_millis(),
            "Crawl finished"
        );
        report
    }

    #[instrument(level = "info", skip_all, fields(site = %site.name))]
    async fn crawl_site<F, M>(&self, site: &Site, make_fetcher: &M) -> SiteReport
    where
        F: PageFetcher,
        M: Fn(&CrawlSettings) -> Result<F, FetchError>,
    {
        let mut report = SiteReport {
            site: site.name.clone(),
            ..SiteReport::default()
        };

        if self.crawl.max_depth == 0 {
            warn!("Crawl depth is 0; skipping site");
            return report;
        }

        let fetcher = match make_fetcher(&self.crawl) {
            Ok(f) => f,
            Err(e) => {
                error!(error = %e, "Could not create page fetcher; skipping site");
                return report;
            }
        };

        let links = match self.index_site(&fetcher, site).await {
            Ok(links) => links,
            Err(e) => {
                error!(url = %site.base_url, error = %e, "Homepage fetch failed; skipping site");
                fetcher.close();
                return report;
            }
        };
        report.links = links.len();

        if self.crawl.max_depth < 2 {
            info!(links = links.len(), "Crawl depth below 2; not reading articles");
            fetcher.close();
            report.completed = true;
            return report;
        }

        let outcomes: Vec<Result<NewsRecord, ArticleError>> = stream::iter(links)
            .then(|link| self.process_article(&fetcher, site, link))
            .collect()
            .await;
        fetcher.close();

        for outcome in outcomes {
            match outcome {
                Ok(_) => report.saved += 1,
                Err(_) => report.failed += 1,
            }
        }
        report.completed = true;

        info!(
            links = report.links,
            saved = report.saved,
            failed = report.failed,
            "Site done"
        );
        report
    }

    /// Fetch the homepage and return at most `max_articles_per_site` links.
    async fn index_site<F: PageFetcher>(
        &self,
        fetcher: &F,
        site: &Site,
    ) -> Result<Vec<LinkCandidate>, FetchError> {
        let body = self.fetch_paced(fetcher, site.base_url.as_str()).await?;

        let mut links = {
            let document = Html::parse_document(&body);
            extract_links(&document, &site.selectors, &site.base_url)
        };
        if links.is_empty() {
            warn!("No links found on homepage");
        }
        links.truncate(self.crawl.max_articles_per_site);
        info!(count = links.len(), "Indexed homepage");
        Ok(links)
    }

    #[instrument(level = "info", skip_all, fields(url = %link.url))]
    async fn process_article<F: PageFetcher>(
        &self,
        fetcher: &F,
        site: &Site,
        link: LinkCandidate,
    ) -> Result<NewsRecord, ArticleError> {
        let result = self.summarize_and_store(fetcher, site, link).await;
        match &result {
            Ok(record) => debug!(summary_title = %record.summary.title, "Article stored"),
            Err(e @ (ArticleError::Summarize(_) | ArticleError::Store(_))) => {
                error!(error = %e, "Article skipped")
            }
            Err(e) => warn!(error = %e, "Article skipped"),
        }
        result
    }

    async fn summarize_and_store<F: PageFetcher>(
        &self,
        fetcher: &F,
        site: &Site,
        link: LinkCandidate,
    ) -> Result<NewsRecord, ArticleError> {
        let body = self.fetch_paced(fetcher, &link.url).await?;
        let article = read_article(&body, site, link);

        let content = self.cleaner.clean(&article.content);
        if article.title.trim().is_empty() || content.is_empty() {
            return Err(ArticleError::ExtractionEmpty);
        }
        debug!(
            raw_chars = article.content.chars().count(),
            clean_chars = content.chars().count(),
            preview = %truncate_for_log(&content, 80),
            "Extracted article"
        );

        let mut summary = self.summarizer.summarize(&article.title, &content).await?;
        if !validate(&mut summary, &self.limits) {
            return Err(ArticleError::Rejected);
        }

        let record = self
            .store
            .append(SummarizedArticle {
                title: article.title,
                url: article.url,
                content,
                source: article.source,
                summary,
            })
            .await?;
        Ok(record)
    }

    /// Fetch a page, then wait the configured delay whatever the outcome.
    async fn fetch_paced<F: PageFetcher>(&self, fetcher: &F, url: &str) -> Result<String, FetchError> {
        let page = fetcher.fetch(url).await;
        if !self.crawl.delay.is_zero() {
            tokio::time::sleep(self.crawl.delay).await;
        }
        page
    }
}

fn read_article(body: &str, site: &Site, link: LinkCandidate) -> RawArticle {
    let document = Html::parse_document(body);
    RawArticle {
        content: extract_content(&document, site.selectors.content.as_ref()),
        title: link.title,
        url: link.url,
        source: site.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SummarizeError;
    use crate::models::SummaryCandidate;
    use crate::outputs::{FileStore, RecordQuery};
    use crate::sites::parse_sites;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;
    use std::time::Duration;

    const SITE_YAML: &str = r#"
- name: 测试新闻
  url: https://news.test
  article_selector:
    list: ".item"
    title: "a"
    link: "a"
    content: ".body"
"#;

    const HOMEPAGE: &str = r#"<html><body>
        <div class="item"><a href="/a/1.html">第一条新闻</a></div>
        <div class="item"><a href="/a/2.html">第二条新闻</a></div>
        <div class="item"><a href="/a/3.html">第三条新闻</a></div>
    </body></html>"#;

    #[derive(Clone, Default)]
    struct FakeWeb {
        pages: Rc<HashMap<String, String>>,
        requests: Rc<RefCell<Vec<String>>>,
        closed: Rc<Cell<usize>>,
    }

    impl FakeWeb {
        fn with_pages(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: Rc::new(
                    pages
                        .iter()
                        .map(|(u, b)| (u.to_string(), b.to_string()))
                        .collect(),
                ),
                ..Self::default()
            }
        }

        fn article_site() -> Self {
            Self::with_pages(&[
                ("https://news.test/", HOMEPAGE),
                (
                    "https://news.test/a/1.html",
                    r#"<div class="body"><p>央行今日宣布下调基准利率。</p><p>责任编辑：张三</p></div>"#,
                ),
                (
                    "https://news.test/a/2.html",
                    r#"<div class="body"><p>股市今日普遍上涨。</p></div>"#,
                ),
                ("https://news.test/a/3.html", r#"<div class="body">  </div>"#),
            ])
        }
    }

    impl PageFetcher for FakeWeb {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }

        fn close(self) {
            self.closed.set(self.closed.get() + 1);
        }
    }

    struct Echo {
        calls: Cell<usize>,
    }

    impl Summarizer for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn summarize(&self, title: &str, content: &str) -> Result<SummaryCandidate, SummarizeError> {
            self.calls.set(self.calls.get() + 1);
            Ok(SummaryCandidate {
                title: format!("摘要：{title}"),
                content: content.repeat(100),
            })
        }
    }

    struct NoCredentials;

    impl Summarizer for NoCredentials {
        fn name(&self) -> &str {
            "none"
        }

        async fn summarize(&self, _: &str, _: &str) -> Result<SummaryCandidate, SummarizeError> {
            Err(SummarizeError::MissingCredentials)
        }
    }

    struct Blank;

    impl Summarizer for Blank {
        fn name(&self) -> &str {
            "blank"
        }

        async fn summarize(&self, title: &str, _: &str) -> Result<SummaryCandidate, SummarizeError> {
            Ok(SummaryCandidate {
                title: title.to_string(),
                content: "   ".to_string(),
            })
        }
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.crawl.delay = Duration::ZERO;
        settings
    }

    fn sites() -> Vec<Site> {
        parse_sites(SITE_YAML).unwrap()
    }

    fn echo() -> Echo {
        Echo { calls: Cell::new(0) }
    }

    #[tokio::test]
    async fn test_full_pass_stores_valid_articles() {
        let tmp = tempfile::tempdir().unwrap();
        let web = FakeWeb::article_site();
        let pipeline = Pipeline::new(&settings(), echo(), FileStore::new(tmp.path()));

        let report = pipeline.run(&sites(), |_| Ok(web.clone())).await;

        assert_eq!(report.sites.len(), 1);
        let site = &report.sites[0];
        assert_eq!(site.links, 3);
        assert_eq!(site.saved, 2);
        assert_eq!(site.failed, 1);
        assert!(site.completed);
        assert_eq!(web.closed.get(), 1);
        assert_eq!(pipeline.summarizer.calls.get(), 2);

        let records = FileStore::new(tmp.path())
            .load(&RecordQuery::for_source("测试新闻"))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "https://news.test/a/1.html");
        assert_eq!(records[0].title, "第一条新闻");
        assert_eq!(records[0].content, "央行今日宣布下调基准利率。");
        assert_eq!(records[0].summary.title, "摘要：第一条新闻");
        assert!(records[0].summary.content.chars().count() <= 500);
    }

    #[tokio::test]
    async fn test_article_cap_limits_fetches() {
        let tmp = tempfile::tempdir().unwrap();
        let web = FakeWeb::article_site();
        let mut settings = settings();
        settings.crawl.max_articles_per_site = 1;
        let pipeline = Pipeline::new(&settings, echo(), FileStore::new(tmp.path()));

        let report = pipeline.run(&sites(), |_| Ok(web.clone())).await;

        assert_eq!(report.saved(), 1);
        assert_eq!(
            *web.requests.borrow(),
            vec!["https://news.test/", "https://news.test/a/1.html"]
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_store_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let web = FakeWeb::article_site();
        let pipeline = Pipeline::new(&settings(), NoCredentials, FileStore::new(tmp.path()));

        let report = pipeline.run(&sites(), |_| Ok(web.clone())).await;

        assert_eq!(report.saved(), 0);
        assert_eq!(report.failed(), 3);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_summaries_are_not_stored() {
        let tmp = tempfile::tempdir().unwrap();
        let web = FakeWeb::article_site();
        let pipeline = Pipeline::new(&settings(), Blank, FileStore::new(tmp.path()));

        let report = pipeline.run(&sites(), |_| Ok(web.clone())).await;

        assert_eq!(report.saved(), 0);
        assert!(
            FileStore::new(tmp.path())
                .load(&RecordQuery::default())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_homepage_failure_skips_site_and_closes_fetcher() {
        let tmp = tempfile::tempdir().unwrap();
        let web = FakeWeb::with_pages(&[]);
        let pipeline = Pipeline::new(&settings(), echo(), FileStore::new(tmp.path()));

        let report = pipeline.run(&sites(), |_| Ok(web.clone())).await;

        assert!(!report.sites[0].completed);
        assert_eq!(web.requests.borrow().len(), 1);
        assert_eq!(web.closed.get(), 1);
        assert_eq!(pipeline.summarizer.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_fetcher_construction_failure_skips_site() {
        let tmp = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(&settings(), echo(), FileStore::new(tmp.path()));

        let report = pipeline
            .run(&sites(), |_| -> Result<FakeWeb, FetchError> {
                Err(FetchError::Status {
                    url: "https://news.test/".to_string(),
                    status: 0,
                })
            })
            .await;

        assert_eq!(report.sites[0], SiteReport {
            site: "测试新闻".to_string(),
            ..SiteReport::default()
        });
    }

    #[tokio::test]
    async fn test_depth_one_indexes_without_reading_articles() {
        let tmp = tempfile::tempdir().unwrap();
        let web = FakeWeb::article_site();
        let mut settings = settings();
        settings.crawl.max_depth = 1;
        let pipeline = Pipeline::new(&settings, echo(), FileStore::new(tmp.path()));

        let report = pipeline.run(&sites(), |_| Ok(web.clone())).await;

        assert_eq!(report.sites[0].links, 3);
        assert_eq!(report.saved(), 0);
        assert_eq!(*web.requests.borrow(), vec!["https://news.test/"]);
        assert_eq!(web.closed.get(), 1);
    }

    #[tokio::test]
    async fn test_depth_zero_skips_sites() {
        let tmp = tempfile::tempdir().unwrap();
        let web = FakeWeb::article_site();
        let mut settings = settings();
        settings.crawl.max_depth = 0;
        let pipeline = Pipeline::new(&settings, echo(), FileStore::new(tmp.path()));

        pipeline.run(&sites(), |_| Ok(web.clone())).await;

        assert!(web.requests.borrow().is_empty());
    }
}
