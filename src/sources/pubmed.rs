//! PubMed research source implementation using E-utilities API.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::EutilsConfig;
use crate::models::{AuthorRecord, PaperRecord, SearchQuery};
use crate::sources::{Source, SourceError};
use crate::utils::{parse_document, HttpClient, XmlElement};

/// PubMed source
///
/// Uses NCBI E-utilities: `esearch` (JSON) for PMIDs, then one `efetch`
/// (XML) request for the records.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: Arc<HttpClient>,
    config: EutilsConfig,
}

impl PubMedSource {
    /// Create a new PubMed source against the public NCBI endpoint
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(EutilsConfig::default())
    }

    /// Create a source from endpoint settings
    pub fn from_config(config: EutilsConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: Arc::new(HttpClient::from_config(&config)?),
            config,
        })
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>, config: EutilsConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), name)
    }

    /// Parameters shared by every request
    fn base_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("db", self.config.database.clone())];
        if let Some(tool) = &self.config.tool {
            params.push(("tool", tool.clone()));
        }
        if let Some(email) = &self.config.email {
            params.push(("email", email.clone()));
        }
        params
    }

    /// Build E-utilities search URL
    fn build_search_url(&self, query: &SearchQuery) -> String {
        let mut params = self.base_params();
        params.push(("term", query.query.clone()));
        params.push(("retmode", "json".to_string()));
        params.push(("retmax", query.max_results.to_string()));

        format!("{}?{}", self.endpoint("esearch.fcgi"), encode_params(&params))
    }

    /// Build E-utilities fetch URL for specific PubMed IDs
    fn build_fetch_url(&self, ids: &[String]) -> String {
        let mut params = self.base_params();
        params.push(("id", ids.join(",")));
        params.push(("retmode", "xml".to_string()));

        format!("{}?{}", self.endpoint("efetch.fcgi"), encode_params(&params))
    }

    async fn get_text(&self, url: &str, action: &str) -> Result<String, SourceError> {
        tracing::debug!(%url, "PubMed request");

        let response = self
            .client
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to {}: {}", action, e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "PubMed API returned status: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))
    }

    /// Parse E-utilities search response JSON
    fn parse_search_response(json: &str) -> Result<Vec<String>, SourceError> {
        #[derive(Debug, Deserialize)]
        struct ESearchResponse {
            esearchresult: Option<ESearchResult>,
            error: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct ESearchResult {
            idlist: Option<Vec<String>>,
            #[serde(rename = "ERROR")]
            error: Option<String>,
        }

        let response: ESearchResponse = serde_json::from_str(json)?;

        if let Some(error) = response.error {
            return Err(SourceError::Api(error));
        }

        let result = response.esearchresult.ok_or_else(|| {
            SourceError::Parse("PubMed search response has no esearchresult".to_string())
        })?;

        if let Some(error) = result.error {
            return Err(SourceError::Api(error));
        }

        result
            .idlist
            .ok_or_else(|| SourceError::Parse("PubMed search response has no idlist".to_string()))
    }

    /// Parse E-utilities fetch response XML
    fn parse_fetch_response(xml: &str) -> Result<Vec<PaperRecord>, SourceError> {
        let root = parse_document(xml)?;

        if let Some(error) = root.child_text("ERROR") {
            return Err(SourceError::Api(error));
        }

        let papers: Vec<PaperRecord> = root
            .find_all("PubmedArticle")
            .into_iter()
            .map(parse_article)
            .collect();

        Ok(papers)
    }
}

fn encode_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_article(article: &XmlElement) -> PaperRecord {
    let pmid = article.find_text("PMID").and_then(non_empty);
    if pmid.is_none() {
        tracing::warn!("PubMed record without PMID");
    }

    let title = article.find_text("ArticleTitle").and_then(non_empty);

    // The first Year under any PubDate wins; MedlineDate ("1998 Dec-1999 Jan")
    // covers records without a single year.
    let pub_dates = article.find_all("PubDate");
    let published_date = pub_dates
        .iter()
        .find_map(|pd| pd.child_text("Year"))
        .and_then(non_empty)
        .or_else(|| {
            pub_dates
                .iter()
                .find_map(|pd| pd.child_text("MedlineDate"))
                .and_then(non_empty)
        });

    let authors = article
        .find_all("Author")
        .into_iter()
        .map(parse_author)
        .collect();

    PaperRecord {
        pmid,
        title,
        published_date,
        authors,
    }
}

fn parse_author(author: &XmlElement) -> AuthorRecord {
    let last = author.child_text("LastName").unwrap_or_default();
    let first = author.child_text("ForeName").unwrap_or_default();
    // Affiliation sits under AffiliationInfo in current records, directly
    // under Author in older ones
    let affiliation = author.find_text("Affiliation").unwrap_or_default();

    AuthorRecord::new(&first, &last, affiliation)
}

#[async_trait]
impl Source for PubMedSource {
    async fn search_ids(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError> {
        if query.max_results == 0 {
            return Err(SourceError::InvalidRequest(
                "max_results must be at least 1".to_string(),
            ));
        }

        let url = self.build_search_url(query);
        let json = self.get_text(&url, "search PubMed").await?;
        let ids = Self::parse_search_response(&json)?;

        tracing::debug!(count = ids.len(), query = %query.query, "PubMed esearch returned PMIDs");
        Ok(ids)
    }

    async fn fetch_papers(&self, ids: &[String]) -> Result<Vec<PaperRecord>, SourceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.build_fetch_url(ids);
        let xml = self.get_text(&url, "fetch PubMed details").await?;
        let papers = Self::parse_fetch_response(&xml)?;

        tracing::debug!(
            requested = ids.len(),
            parsed = papers.len(),
            "PubMed efetch returned records"
        );
        Ok(papers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FETCH_XML: &str = r#"<?xml version="1.0" ?>
<!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2024//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">38000001</PMID>
      <Article PubModel="Print">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <PubDate><Year>2023</Year><Month>Nov</Month></PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>Targeting <i>KRAS</i> in lung cancer.</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Smith</LastName>
            <ForeName>Jane</ForeName>
            <AffiliationInfo>
              <Affiliation>Department of Oncology, Harvard University, Boston, MA.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Lee</LastName>
            <ForeName>Ann</ForeName>
            <AffiliationInfo>
              <Affiliation>Genentech Inc, South San Francisco, CA, USA. lee.ann@gene.com.</Affiliation>
            </AffiliationInfo>
            <AffiliationInfo>
              <Affiliation>Second affiliation, ignored.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <CollectiveName>KRAS Study Group</CollectiveName>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <PMID Version="1">38000002</PMID>
      <Article>
        <Journal>
          <JournalIssue>
            <PubDate><MedlineDate>1998 Dec-1999 Jan</MedlineDate></PubDate>
          </JournalIssue>
        </Journal>
        <AuthorList>
          <Author>
            <LastName>Old</LastName>
            <Affiliation>Acme Labs Ltd</Affiliation>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn test_build_search_url() {
        let source = PubMedSource::new().unwrap();
        let query = SearchQuery::new("machine learning").max_results(10);
        let url = source.build_search_url(&query);

        assert!(url.starts_with("https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi?"));
        assert!(url.contains("db=pubmed"));
        assert!(url.contains("term=machine%20learning"));
        assert!(url.contains("retmax=10"));
        assert!(url.contains("retmode=json"));
        assert!(!url.contains("tool="));
    }

    #[test]
    fn test_build_search_url_with_identification() {
        let config = EutilsConfig {
            base_url: "http://localhost:8080/".to_string(),
            tool: Some("industry-papers".to_string()),
            email: Some("me@example.org".to_string()),
            ..Default::default()
        };
        let source = PubMedSource::from_config(config).unwrap();
        let url = source.build_search_url(&SearchQuery::new("x"));

        assert!(url.starts_with("http://localhost:8080/esearch.fcgi?"));
        assert!(url.contains("tool=industry-papers"));
        assert!(url.contains("email=me%40example.org"));
    }

    #[test]
    fn test_build_fetch_url() {
        let client = Arc::new(HttpClient::new().unwrap());
        let source = PubMedSource::with_client(client, EutilsConfig::default());
        let url = source.build_fetch_url(&["1".to_string(), "2".to_string()]);

        assert!(url.contains("efetch.fcgi?"));
        assert!(url.contains("id=1%2C2"));
        assert!(url.contains("retmode=xml"));
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{"header":{"type":"esearch"},"esearchresult":{"count":"3","retmax":"3","idlist":["3","1","2"]}}"#;
        let ids = PubMedSource::parse_search_response(json).unwrap();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_parse_search_response_empty() {
        let json = r#"{"esearchresult":{"count":"0","idlist":[]}}"#;
        assert!(PubMedSource::parse_search_response(json).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_response_errors() {
        assert!(matches!(
            PubMedSource::parse_search_response("not json"),
            Err(SourceError::Parse(_))
        ));
        assert!(matches!(
            PubMedSource::parse_search_response(r#"{"header":{}}"#),
            Err(SourceError::Parse(_))
        ));
        assert!(matches!(
            PubMedSource::parse_search_response(r#"{"esearchresult":{"count":"0"}}"#),
            Err(SourceError::Parse(_))
        ));
        assert!(matches!(
            PubMedSource::parse_search_response(r#"{"esearchresult":{"ERROR":"Invalid query"}}"#),
            Err(SourceError::Api(ref m)) if m == "Invalid query"
        ));
        assert!(matches!(
            PubMedSource::parse_search_response(r#"{"error":"API rate limit exceeded"}"#),
            Err(SourceError::Api(_))
        ));
    }

    #[test]
    fn test_parse_fetch_response() {
        let papers = PubMedSource::parse_fetch_response(FETCH_XML).unwrap();
        assert_eq!(papers.len(), 2);

        let first = &papers[0];
        assert_eq!(first.pmid.as_deref(), Some("38000001"));
        assert_eq!(first.title.as_deref(), Some("Targeting KRAS in lung cancer."));
        assert_eq!(first.published_date.as_deref(), Some("2023"));
        assert_eq!(first.authors.len(), 3);
        assert_eq!(first.authors[0].name, "Jane Smith");
        assert_eq!(
            first.authors[1].affiliation,
            "Genentech Inc, South San Francisco, CA, USA. lee.ann@gene.com."
        );
        assert_eq!(first.authors[1].email, "lee.ann@gene.com.");
        assert_eq!(first.authors[2].name, "");
        assert_eq!(first.authors[2].affiliation, "");
        assert_eq!(first.authors[2].email, "");

        let second = &papers[1];
        assert_eq!(second.title, None);
        assert_eq!(second.published_date.as_deref(), Some("1998 Dec-1999 Jan"));
        assert_eq!(second.authors[0].name, "Old");
        assert_eq!(second.authors[0].affiliation, "Acme Labs Ltd");
    }

    #[test]
    fn test_parse_fetch_response_missing_fields() {
        let xml = "<PubmedArticleSet><PubmedArticle><MedlineCitation/></PubmedArticle></PubmedArticleSet>";
        let papers = PubMedSource::parse_fetch_response(xml).unwrap();
        assert_eq!(papers, vec![PaperRecord::default()]);
    }

    #[test]
    fn test_parse_fetch_response_date_fallback_and_nested_affiliation() {
        let xml = r#"<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>5</PMID>
      <Article>
        <Journal><JournalIssue><PubDate><Year></Year><MedlineDate>2001 Spring</MedlineDate></PubDate></JournalIssue></Journal>
        <AuthorList>
          <Author>
            <LastName>Deep</LastName><ForeName>Dana</ForeName>
            <Foo><Bar><Affiliation>Novartis Pharma AG, Basel. dana@novartis.com</Affiliation></Bar></Foo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;
        let papers = PubMedSource::parse_fetch_response(xml).unwrap();

        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].published_date.as_deref(), Some("2001 Spring"));
        assert_eq!(papers[0].authors[0].name, "Dana Deep");
        assert_eq!(
            papers[0].authors[0].affiliation,
            "Novartis Pharma AG, Basel. dana@novartis.com"
        );
        assert_eq!(papers[0].authors[0].email, "dana@novartis.com");
    }

    #[test]
    fn test_parse_fetch_response_empty_set() {
        let papers = PubMedSource::parse_fetch_response("<PubmedArticleSet></PubmedArticleSet>").unwrap();
        assert!(papers.is_empty());
    }

    #[test]
    fn test_parse_fetch_response_errors() {
        assert!(matches!(
            PubMedSource::parse_fetch_response("<PubmedArticleSet><PubmedArticle>"),
            Err(SourceError::Parse(_))
        ));
        assert!(matches!(
            PubMedSource::parse_fetch_response(""),
            Err(SourceError::Parse(_))
        ));
        assert!(matches!(
            PubMedSource::parse_fetch_response("<eFetchResult><ERROR>Empty id list</ERROR></eFetchResult>"),
            Err(SourceError::Api(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_empty_ids_skips_request() {
        // Unroutable base URL: any request would fail
        let config = EutilsConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let source = PubMedSource::from_config(config).unwrap();
        assert!(source.fetch_papers(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_zero_max_results() {
        let source = PubMedSource::new().unwrap();
        let query = SearchQuery::new("cancer").max_results(0);
        assert!(matches!(
            source.search_ids(&query).await,
            Err(SourceError::InvalidRequest(_))
        ));
    }
}
