use base64::Engine as _;
use log::{debug, info};

use crate::{
    context::Context,
    error::{Result, SyncError},
};

mod data;

pub(crate) use data::FileDescriptor;
use data::EmbeddedContent;

/// Fetch-by-URL. The only way the sync pipeline talks to the network.
pub(crate) trait Fetch {
    fn get(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP fetcher with a per-request timeout.
pub(crate) struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(ctx: &Context) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(ctx.user_agent.clone())
            .timeout(ctx.request_timeout)
            .build()
            .map_err(|e| SyncError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

fn request_error(url: &str, e: reqwest::Error) -> SyncError {
    if e.is_timeout() {
        SyncError::Timeout {
            url: url.to_string(),
        }
    } else {
        SyncError::network(url, e)
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<String> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::network(url, format!("server returned {status}")));
        }

        response.text().map_err(|e| request_error(url, e))
    }
}

/// Lists the files of the posts directory.
pub(crate) fn list_posts(fetcher: &dyn Fetch, listing_url: &str) -> Result<Vec<FileDescriptor>> {
    let body = fetcher.get(listing_url)?;
    let files: Vec<FileDescriptor> = serde_json::from_str(&body)
        .map_err(|e| SyncError::format(format!("listing of {listing_url}: {e}")))?;

    info!("Found {} files in {listing_url}", files.len());
    debug!(
        "Files: {}",
        files
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(files)
}

fn decode_embedded(embedded: EmbeddedContent) -> Result<String> {
    match embedded.encoding.as_deref() {
        None | Some("base64") => {}
        Some(other) => {
            return Err(SyncError::format(format!(
                "unsupported content encoding {other:?}"
            )))
        }
    }

    // the API wraps the payload every 60 columns
    let compact: String = embedded
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| SyncError::format(format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes).map_err(|e| SyncError::format(format!("content is not UTF-8: {e}")))
}

/// Downloads one post. Accepts both a raw body and an embedded base64 object.
pub(crate) fn fetch_document(fetcher: &dyn Fetch, download_url: &str) -> Result<String> {
    let body = fetcher.get(download_url)?;
    match serde_json::from_str::<EmbeddedContent>(&body) {
        Ok(embedded) => decode_embedded(embedded),
        Err(_) => Ok(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, sync::mpsc, thread, time::Duration};

    struct StaticFetcher(HashMap<&'static str, &'static str>);

    impl Fetch for StaticFetcher {
        fn get(&self, url: &str) -> Result<String> {
            self.0
                .get(url)
                .map(|s| s.to_string())
                .ok_or_else(|| SyncError::network(url, "server returned 404 Not Found"))
        }
    }

    fn fetcher(pairs: &[(&'static str, &'static str)]) -> StaticFetcher {
        StaticFetcher(pairs.iter().copied().collect())
    }

    #[test]
    fn test_list_posts() {
        let f = fetcher(&[(
            "listing",
            r#"[
                {"name": "2024-03-05-my-post.md", "download_url": "https://raw.example/a.md", "type": "file"},
                {"name": "drafts", "download_url": null, "type": "dir"}
            ]"#,
        )]);
        let files = list_posts(&f, "listing").unwrap();
        assert_eq!(
            files,
            vec![
                FileDescriptor {
                    name: "2024-03-05-my-post.md".to_string(),
                    download_url: Some("https://raw.example/a.md".to_string()),
                },
                FileDescriptor {
                    name: "drafts".to_string(),
                    download_url: None,
                },
            ]
        );
    }

    #[test]
    fn test_list_posts_invalid_json() {
        let f = fetcher(&[("listing", "<html>rate limited</html>")]);
        assert!(matches!(
            list_posts(&f, "listing"),
            Err(SyncError::Format(_))
        ));

        let f = fetcher(&[("listing", r#"{"message": "Not Found"}"#)]);
        assert!(matches!(
            list_posts(&f, "listing"),
            Err(SyncError::Format(_))
        ));
    }

    #[test]
    fn test_list_posts_network_error() {
        let f = fetcher(&[]);
        assert!(matches!(
            list_posts(&f, "listing"),
            Err(SyncError::Network { .. })
        ));
    }

    #[test]
    fn test_fetch_raw_document() {
        let raw = "---\ntitle: Raw\n---\nbody\n";
        let f = fetcher(&[("a.md", raw)]);
        assert_eq!(fetch_document(&f, "a.md").unwrap(), raw);
    }

    #[test]
    fn test_fetch_embedded_document() {
        // "---\ntitle: Hi\n---\nbody\n", wrapped like the API does
        let f = fetcher(&[(
            "a.md",
            r#"{"name": "a.md", "content": "LS0tCnRpdGxlOiBIaQot\nLS0KYm9keQo=\n", "encoding": "base64"}"#,
        )]);
        assert_eq!(
            fetch_document(&f, "a.md").unwrap(),
            "---\ntitle: Hi\n---\nbody\n"
        );
    }

    #[test]
    fn test_fetch_embedded_document_rejects_bad_payload() {
        let f = fetcher(&[
            ("bad64", r#"{"content": "!!not base64!!", "encoding": "base64"}"#),
            ("other", r#"{"content": "abc", "encoding": "utf-16"}"#),
        ]);
        assert!(matches!(
            fetch_document(&f, "bad64"),
            Err(SyncError::Format(_))
        ));
        assert!(matches!(
            fetch_document(&f, "other"),
            Err(SyncError::Format(_))
        ));
    }

    fn serve_once<F>(respond: F) -> (String, thread::JoinHandle<()>)
    where
        F: FnOnce(tiny_http::Request) + Send + 'static,
    {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let handle = thread::spawn(move || {
            if let Ok(request) = server.recv() {
                respond(request);
            }
        });
        (format!("http://127.0.0.1:{port}/post.md"), handle)
    }

    #[test]
    fn test_http_fetcher_success() {
        let (tx, rx) = mpsc::channel();
        let (url, handle) = serve_once(move |request| {
            let agent = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("User-Agent"))
                .map(|h| h.value.as_str().to_string());
            tx.send(agent).unwrap();
            let _ = request.respond(tiny_http::Response::from_string("# Hello\n"));
        });

        let fetcher = HttpFetcher::new(&Context::default()).unwrap();
        assert_eq!(fetcher.get(&url).unwrap(), "# Hello\n");
        assert_eq!(
            rx.recv().unwrap().as_deref(),
            Some("GitHub-Action-README-Update")
        );
        handle.join().unwrap();
    }

    #[test]
    fn test_http_fetcher_status_error() {
        let (url, handle) = serve_once(|request| {
            let _ = request.respond(tiny_http::Response::from_string("nope").with_status_code(404));
        });

        let fetcher = HttpFetcher::new(&Context::default()).unwrap();
        match fetcher.get(&url) {
            Err(SyncError::Network { reason, .. }) => assert!(reason.contains("404")),
            other => panic!("unexpected result: {other:?}"),
        }
        handle.join().unwrap();
    }

    #[test]
    fn test_http_fetcher_timeout() {
        let (url, handle) = serve_once(|request| {
            thread::sleep(Duration::from_millis(800));
            let _ = request.respond(tiny_http::Response::from_string("too late"));
        });

        let ctx = Context {
            request_timeout: Duration::from_millis(100),
            ..Default::default()
        };
        let fetcher = HttpFetcher::new(&ctx).unwrap();
        assert!(matches!(fetcher.get(&url), Err(SyncError::Timeout { .. })));
        handle.join().unwrap();
    }
}
