use serde::{Deserialize, Serialize};

/// HTTP заголовок ответа внешнего сервиса
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

/// Ответ HTTP outcall'а
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponsePayload {
    pub status: u16,
    pub headers: Vec<HttpHeader>,
    pub body: Vec<u8>,
}

impl HttpResponsePayload {
    /// Санитизация ответа: заголовки отбрасываются, статус и тело сохраняются
    pub fn sanitized(self) -> Self {
        Self {
            status: self.status,
            headers: Vec::new(),
            body: self.body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Вход transform-колбэка
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformArgs {
    pub response: HttpResponsePayload,
    #[serde(default)]
    pub context: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_drops_headers() {
        let response = HttpResponsePayload {
            status: 200,
            headers: vec![HttpHeader {
                name: "set-cookie".to_string(),
                value: "x".to_string(),
            }],
            body: b"{}".to_vec(),
        };
        let clean = response.sanitized();
        assert!(clean.headers.is_empty());
        assert_eq!(clean.body, b"{}");
        assert!(clean.is_success());
    }
}
