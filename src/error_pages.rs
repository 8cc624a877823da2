use askama::Template;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};

use crate::state::AppState;
use crate::VERSION;

/// Message attached to an error response, shown on the rendered page.
#[derive(Clone)]
pub struct ErrorMessage(pub String);

#[derive(Template)]
#[template(path = "pages/error.html")]
struct ErrorPageTemplate {
    title: String,
    version: &'static str,
    store_kind: &'static str,
    status_code: u16,
    status_text: &'static str,
    message: String,
}

/// Heading and fallback text for an error status.
struct ErrorCopy {
    heading: &'static str,
    fallback: Option<&'static str>,
}

impl ErrorCopy {
    fn for_status(status: StatusCode) -> Self {
        let (heading, fallback) = match status {
            StatusCode::BAD_REQUEST => ("Invalid Input", Some("Check the form and try again.")),
            StatusCode::NOT_FOUND => ("Not Found", Some("That entry or page does not exist.")),
            StatusCode::METHOD_NOT_ALLOWED => ("Not Allowed", Some("This action is not supported.")),
            StatusCode::CONFLICT => ("Already Done", Some("This month was already updated.")),
            StatusCode::UNPROCESSABLE_ENTITY => ("Invalid Input", Some("The form is incomplete.")),
            StatusCode::INTERNAL_SERVER_ERROR => ("Server Error", Some("Something went wrong.")),
            _ => ("Error", None),
        };
        Self { heading, fallback }
    }

    fn message(&self, status: StatusCode) -> String {
        match self.fallback {
            Some(text) => text.to_string(),
            None => format!("Request failed with status {}.", status.as_u16()),
        }
    }
}

/// JSON endpoints and the health probe keep their own bodies.
fn keeps_body(path: &str) -> bool {
    path.starts_with("/api/") || path == "/health"
}

/// Turns 4xx/5xx responses of HTML routes into a rendered error page.
pub async fn error_page_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let method = request.method().clone();
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let message = response.extensions().get::<ErrorMessage>().map(|m| m.0.clone());
    tracing::warn!(%status, %method, %path, message = message.as_deref().unwrap_or(""), "Request failed");

    if keeps_body(&path) {
        return response;
    }

    let copy = ErrorCopy::for_status(status);
    let template = ErrorPageTemplate {
        title: copy.heading.to_string(),
        version: VERSION,
        store_kind: state.store.kind().as_str(),
        status_code: status.as_u16(),
        status_text: copy.heading,
        message: message.unwrap_or_else(|| copy.message(status)),
    };

    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (status, copy.heading).into_response()
        }
    }
}

pub async fn fallback_handler() -> Response {
    let mut response = StatusCode::NOT_FOUND.into_response();
    response
        .extensions_mut()
        .insert(ErrorMessage("No page lives at this address.".into()));
    response
}
