use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::filters::QueryParams;

pub const API_BASE: &str = "/api";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded {status}")]
    Status { status: u16, message: Option<String> },
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for the blocking alert: the server's own error when it sent one,
    /// otherwise the caller's generic message.
    pub fn alert_text(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => format!("خطأ: {}", message),
            _ => fallback.to_string(),
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Every backend call goes through here so the bearer header is never
/// forgotten. No retries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiClient {
    token: Option<String>,
}

impl ApiClient {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    fn url(path: &str) -> String {
        format!("{}{}", API_BASE, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<T, ApiError> {
        let mut builder = self.authorize(Request::get(&Self::url(path)));
        if !query.is_empty() {
            builder = builder.query(query.iter());
        }
        let resp = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorize(Request::post(&Self::url(path)))
            .json(body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }

    /// For calls where any 2xx counts as done: the body comes back as raw
    /// text, empty when it cannot be read.
    pub async fn post_text<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ApiError> {
        let request = self
            .authorize(Request::post(&Self::url(path)))
            .json(body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_text(resp).await
    }

    pub async fn put_text<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ApiError> {
        let request = self
            .authorize(Request::put(&Self::url(path)))
            .json(body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_text(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let resp = self
            .authorize(Request::delete(&Self::url(path)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if resp.ok() {
            Ok(())
        } else {
            Err(status_error(resp).await)
        }
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    if !resp.ok() {
        return Err(status_error(resp).await);
    }
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

async fn read_text(resp: Response) -> Result<String, ApiError> {
    if !resp.ok() {
        return Err(status_error(resp).await);
    }
    Ok(resp.text().await.unwrap_or_default())
}

async fn status_error(resp: Response) -> ApiError {
    let status = resp.status();
    let message = match resp.json::<serde_json::Value>().await {
        Ok(body) => error_field(&body),
        Err(_) => None,
    };
    ApiError::Status { status, message }
}

/// The `message` of a success reply, when the body is JSON and carries a
/// non-blank one.
pub fn reply_message(body: &str) -> Option<String> {
    let body: serde_json::Value = serde_json::from_str(body).ok()?;
    body.get("message")?
        .as_str()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn error_field(body: &serde_json::Value) -> Option<String> {
    body.get("error")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_text_prefers_the_server_error() {
        let err = ApiError::Status {
            status: 400,
            message: Some("المبلغ غير صالح".to_string()),
        };
        assert_eq!(err.alert_text("حدث خطأ"), "خطأ: المبلغ غير صالح");
        assert_eq!(err.server_message(), Some("المبلغ غير صالح"));
    }

    #[test]
    fn alert_text_falls_back_without_a_server_error() {
        let status = ApiError::Status {
            status: 500,
            message: None,
        };
        let network = ApiError::Network("offline".to_string());
        assert_eq!(status.alert_text("حدث خطأ"), "حدث خطأ");
        assert_eq!(network.alert_text("حدث خطأ"), "حدث خطأ");
    }

    #[test]
    fn expired_token_gets_the_generic_alert() {
        let expired = ApiError::Status {
            status: 401,
            message: None,
        };
        assert_eq!(
            expired.alert_text("حدث خطأ أثناء تحميل البيانات"),
            "حدث خطأ أثناء تحميل البيانات"
        );
        assert_eq!(expired.server_message(), None);
        assert_eq!(expired.to_string(), "server responded 401");
    }

    #[test]
    fn success_replies_need_no_json_body() {
        assert_eq!(
            reply_message(r#"{"message": "تم الدفع"}"#),
            Some("تم الدفع".to_string())
        );
        assert_eq!(reply_message(r#"{"message": " "}"#), None);
        assert_eq!(reply_message("{}"), None);
        assert_eq!(reply_message(""), None);
        assert_eq!(reply_message("OK"), None);
    }

    #[test]
    fn error_field_reads_only_strings() {
        let body = serde_json::json!({ "error": "Unauthorized" });
        assert_eq!(error_field(&body), Some("Unauthorized".to_string()));
        assert_eq!(error_field(&serde_json::json!({ "error": 42 })), None);
        assert_eq!(error_field(&serde_json::json!({})), None);
    }
}
