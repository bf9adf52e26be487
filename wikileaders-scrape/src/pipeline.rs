//! The scraping pipeline.
//!
//! 1. [`ScrapePipeline::open_session`] acquires a credential and lists countries.
//! 2. [`ScrapePipeline::populate`] builds the dataset skeleton, one country at a time.
//! 3. [`ScrapePipeline::enrich`] fetches every page concurrently and fills in
//!    paragraphs as pages arrive over a bounded channel.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use wikileaders_core::{ContentLayout, Country, Dataset, DatasetSummary, FetchedDocument};
use wikileaders_fetch::{
    CredentialHandle, CredentialManager, DocumentFetcher, MetadataClient, SessionContext,
};

use crate::error::ScrapeError;
use crate::extract::{PageExtraction, ParagraphExtractor};
use crate::normalize::TextNormalizer;

// ============================================================================
// Session
// ============================================================================

/// An authenticated session: the credential handle and the supported countries.
#[derive(Debug, Clone)]
pub struct Session {
    /// Current credential.
    pub handle: CredentialHandle,
    /// Countries the API supports, in API order.
    pub countries: Vec<Country>,
}

// ============================================================================
// Report
// ============================================================================

/// Pages handled per container rung.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutCounts {
    /// Left-to-right container.
    pub forward: usize,
    /// Right-to-left container.
    pub reverse: usize,
    /// Whole-document fallback.
    pub whole_document: usize,
}

impl LayoutCounts {
    fn record(&mut self, layout: ContentLayout) {
        match layout {
            ContentLayout::Forward => self.forward += 1,
            ContentLayout::Reverse => self.reverse += 1,
            ContentLayout::WholeDocument => self.whole_document += 1,
        }
    }
}

/// Outcome of an enrichment pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeReport {
    /// When fetching started.
    pub started_at: DateTime<Utc>,
    /// When the last page was processed.
    pub finished_at: DateTime<Utc>,
    /// Pages requested.
    pub requested: usize,
    /// Record counts after the pass.
    pub summary: DatasetSummary,
    /// Container rungs used.
    pub layouts: LayoutCounts,
}

impl ScrapeReport {
    /// Wall-clock duration of the pass.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Drives metadata retrieval, page fetching, extraction and normalization.
#[derive(Debug, Clone)]
pub struct ScrapePipeline {
    credentials: CredentialManager,
    metadata: MetadataClient,
    fetcher: DocumentFetcher,
    extractor: ParagraphExtractor,
    normalizer: TextNormalizer,
    channel_capacity: usize,
}

impl ScrapePipeline {
    /// Builds a pipeline over a session context.
    pub fn new(ctx: &SessionContext) -> Result<Self, ScrapeError> {
        Ok(Self {
            credentials: ctx.credential_manager(),
            metadata: ctx.metadata_client(),
            fetcher: ctx.document_fetcher(),
            extractor: ParagraphExtractor::new()?,
            normalizer: TextNormalizer::new(),
            channel_capacity: ctx.settings.channel_capacity,
        })
    }

    /// Acquires a credential and lists the supported countries.
    #[instrument(skip(self))]
    pub async fn open_session(&self) -> Result<Session, ScrapeError> {
        let credential = self.credentials.acquire().await?;
        let countries = self.metadata.list_countries(&credential).await?;
        Ok(Session {
            handle: CredentialHandle::new(credential),
            countries,
        })
    }

    /// Retrieves the leaders of each country, sequentially.
    ///
    /// A country whose listing fails is left out of the dataset; fatal
    /// errors (forbidden, aborted) end the run.
    #[instrument(skip_all, fields(countries = countries.len()))]
    pub async fn populate(
        &self,
        countries: &[Country],
        handle: &CredentialHandle,
    ) -> Result<Dataset, ScrapeError> {
        let mut dataset = Dataset::new();

        for country in countries {
            if dataset.contains(country) {
                continue;
            }
            match self.metadata.list_leaders(country, handle).await {
                Ok(leaders) => dataset.insert_country(country.clone(), leaders)?,
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => warn!(country = %country, error = %e, "Skipping country"),
            }
        }

        info!(
            countries = dataset.len(),
            leaders = dataset.summary().leaders,
            "Dataset populated"
        );
        Ok(dataset)
    }

    /// Extracts and normalizes the lead paragraph of one page.
    pub fn process(&self, document: &FetchedDocument) -> PageExtraction {
        let mut page = self.extractor.extract(document.body());
        page.extraction = page
            .extraction
            .map_text(|text| self.normalizer.normalize(&text));
        page
    }

    /// Fetches every pending page and stores its paragraph.
    ///
    /// Pages are fetched concurrently and processed one at a time in
    /// completion order. A page that cannot be retrieved marks only its own
    /// record as failed.
    #[instrument(skip_all)]
    pub async fn enrich(&self, dataset: &mut Dataset) -> Result<ScrapeReport, ScrapeError> {
        let started_at = Utc::now();
        let jobs = dataset.pending_documents();
        let requested = jobs.len();
        info!(
            pages = requested,
            concurrency = self.fetcher.concurrency(),
            "Fetching pages"
        );

        let mut layouts = LayoutCounts::default();
        let mut outcomes = self.fetcher.spawn(jobs, self.channel_capacity);

        while let Some(outcome) = outcomes.recv().await {
            match outcome.result {
                Ok(document) => {
                    let page = self.process(&document);
                    layouts.record(page.layout);
                    let paragraph = page
                        .extraction
                        .into_paragraph()
                        .filter(|text| !text.is_empty());
                    if paragraph.is_none() {
                        info!(slot = %outcome.slot, url = document.url(), "Nothing found");
                    }
                    dataset.set_paragraph(document.slot(), paragraph)?;
                }
                Err(e) => {
                    warn!(slot = %outcome.slot, url = %outcome.url, error = %e, "Page fetch failed");
                    dataset.mark_failed(&outcome.slot, e.to_string())?;
                }
            }
        }

        let summary = dataset.summary();
        info!(
            extracted = summary.extracted,
            not_found = summary.not_found,
            failed = summary.failed,
            "Enrichment finished"
        );

        Ok(ScrapeReport {
            started_at,
            finished_at: Utc::now(),
            requested,
            summary,
            layouts,
        })
    }

    /// Populates and enriches a dataset for `countries`.
    pub async fn run(
        &self,
        countries: &[Country],
        handle: &CredentialHandle,
    ) -> Result<(Dataset, ScrapeReport), ScrapeError> {
        let mut dataset = self.populate(countries, handle).await?;
        let report = self.enrich(&mut dataset).await?;
        Ok((dataset, report))
    }
}
