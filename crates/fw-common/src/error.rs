use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Convenient Result alias.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
///
/// Client-side problems (`InvalidFilename`, `NotFound`) become 404 pages.
/// Everything else is a server fault and becomes a 500 page.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Filename doesn't match verification pattern")]
    InvalidFilename { file: String },

    #[error("Can't find file with rewritten name: {resolved}")]
    NotFound { file: String, resolved: String },

    #[error("{path} not usable ({detail}). Firmware version on server unknown")]
    ServerMisconfigured { path: String, detail: String },

    #[error("Checksum file {path} contains no digest")]
    MalformedChecksumFile { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidFilename { .. } | Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ServerMisconfigured { .. } | Self::MalformedChecksumFile { .. } | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The filename the client asked for, when the error is tied to one.
    pub fn requested_file(&self) -> Option<&str> {
        match self {
            Self::InvalidFilename { file } | Self::NotFound { file, .. } => Some(file),
            _ => None,
        }
    }

    /// Render the error page. 404 pages carry the diagnostic reason only
    /// when `expose_reason` is set; 500 pages never carry internals.
    pub fn page(&self, expose_reason: bool) -> Response {
        let status = self.status_code();
        let body = if status == StatusCode::NOT_FOUND {
            let reason = expose_reason.then(|| self.to_string());
            not_found_page(self.requested_file().unwrap_or_default(), reason.as_deref())
        } else {
            internal_error_page()
        };

        let mut response = (status, Html(body)).into_response();
        response.headers_mut().insert(
            axum::http::header::CACHE_CONTROL,
            axum::http::HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.page(true)
    }
}

fn not_found_page(file: &str, reason: Option<&str>) -> String {
    let reason = reason
        .map(|r| format!("<p>Reason: {}.</p>\n", escape_html(r)))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE HTML PUBLIC \"-//IETF//DTD HTML 2.0//EN\">\n\
         <html><head>\n\
         <title>404 Not Found</title>\n\
         </head><body>\n\
         <h1>Not Found</h1>\n\
         <p>The requested file {} was not found on this server.</p>\n\
         {}</body></html>\n",
        escape_html(file),
        reason
    )
}

fn internal_error_page() -> String {
    "<!DOCTYPE HTML PUBLIC \"-//IETF//DTD HTML 2.0//EN\">\n\
     <html><head>\n\
     <title>500 Internal Server Error</title>\n\
     </head><body>\n\
     <h1>Internal Server Error</h1>\n\
     <p>The server is unable to serve this firmware right now.</p>\n\
     </body></html>\n"
        .to_string()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn not_found_page_names_file_and_reason() {
        let err = AppError::NotFound {
            file: "openwrt-x.bin".into(),
            resolved: "node/current/fff-1.0-x-sysupgrade.bin".into(),
        };
        let response = err.page(true);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_string(response).await;
        assert!(body.contains("<title>404 Not Found</title>"));
        assert!(body.contains("The requested file openwrt-x.bin was not found"));
        assert!(body.contains(
            "<p>Reason: Can't find file with rewritten name: node/current/fff-1.0-x-sysupgrade.bin.</p>"
        ));
    }

    #[tokio::test]
    async fn reason_is_hidden_when_not_exposed() {
        let err = AppError::NotFound {
            file: "openwrt-x.bin".into(),
            resolved: "node/current/secret-path".into(),
        };
        let body = body_string(err.page(false)).await;
        assert!(!body.contains("Reason"));
        assert!(!body.contains("secret-path"));
    }

    #[tokio::test]
    async fn requested_name_is_escaped() {
        let err = AppError::InvalidFilename {
            file: "<script>alert(1)</script>".into(),
        };
        let body = body_string(err.into_response()).await;
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>"));
    }

    #[tokio::test]
    async fn server_faults_are_500_without_details() {
        let err = AppError::ServerMisconfigured {
            path: "node/current/release.nfo".into(),
            detail: "No such file or directory".into(),
        };
        let response = err.page(true);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_string(response).await;
        assert!(body.contains("500 Internal Server Error"));
        assert!(!body.contains("release.nfo"));
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            AppError::InvalidFilename { file: String::new() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::MalformedChecksumFile { path: "x".into() }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
