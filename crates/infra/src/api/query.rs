//! Resource URLs with query parameters

use giniapi_domain::{Config, ListOptions, SearchOptions, UploadOptions};
use url::Url;

use super::errors::ApiError;

fn api_url(config: &Config, path: &str) -> Result<Url, ApiError> {
    let raw = config.api_url(path);
    Url::parse(&raw).map_err(|err| ApiError::InvalidUrl { url: raw, reason: err.to_string() })
}

/// `{api}/documents`, with `filename` and `doctype` when given.
pub fn upload_url(config: &Config, options: &UploadOptions) -> Result<Url, ApiError> {
    let mut url = api_url(config, "documents")?;
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(name) = options.file_name.as_deref().filter(|v| !v.is_empty()) {
            pairs.append_pair("filename", name);
        }
        if let Some(doc_type) = options.doc_type_hint.as_deref().filter(|v| !v.is_empty()) {
            pairs.append_pair("doctype", doc_type);
        }
    }
    // An empty `?` is left behind when nothing was appended.
    if url.query() == Some("") {
        url.set_query(None);
    }
    Ok(url)
}

/// `{api}/documents?limit=&offset=`
pub fn list_url(config: &Config, options: &ListOptions) -> Result<Url, ApiError> {
    let mut url = api_url(config, "documents")?;
    url.query_pairs_mut()
        .append_pair("limit", &options.limit.to_string())
        .append_pair("offset", &options.offset.to_string());
    Ok(url)
}

/// `{api}/search?q=&type=&limit=&offset=`
pub fn search_url(config: &Config, options: &SearchOptions) -> Result<Url, ApiError> {
    let mut url = api_url(config, "search")?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("q", &options.query);
        if let Some(doc_type) = options.doc_type.as_deref().filter(|v| !v.is_empty()) {
            pairs.append_pair("type", doc_type);
        }
        pairs
            .append_pair("limit", &options.limit.to_string())
            .append_pair("offset", &options.offset.to_string());
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use giniapi_domain::AuthStrategy;

    use super::*;

    fn config() -> Config {
        let mut config = Config::new("id", "secret", AuthStrategy::BasicAuth)
            .with_endpoints("https://api.example.com/", "https://user.example.com");
        config.apply_defaults();
        config
    }

    #[test]
    fn upload_url_without_options_has_no_query() {
        let url = upload_url(&config(), &UploadOptions::default()).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/documents");
    }

    #[test]
    fn upload_url_encodes_file_name_and_doctype() {
        let options = UploadOptions {
            file_name: Some("scan 1.pdf".into()),
            doc_type_hint: Some("Invoice".into()),
            user_identifier: "user-1".into(),
        };
        let url = upload_url(&config(), &options).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/documents?filename=scan+1.pdf&doctype=Invoice"
        );
    }

    #[test]
    fn list_url_carries_paging() {
        let options = ListOptions { limit: 5, offset: 10, user_identifier: String::new() };
        let url = list_url(&config(), &options).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/documents?limit=5&offset=10");
    }

    #[test]
    fn search_url_skips_missing_type() {
        let url = search_url(&config(), &SearchOptions::new("Miete & Strom")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/search?q=Miete+%26+Strom&limit=20&offset=0"
        );

        let options = SearchOptions { doc_type: Some("Invoice".into()), ..SearchOptions::new("x") };
        let url = search_url(&config(), &options).unwrap();
        assert_eq!(url.query(), Some("q=x&type=Invoice&limit=20&offset=0"));
    }
}
