use crate::errors::{DomainError, DomainResult};
use crate::time::Time;
use crate::EntityId;
use serde::{Deserialize, Serialize};

/// Нормализация ссылки: обрезка пробелов и https:// по умолчанию
pub fn normalize_link(raw: &str) -> Option<String> {
    let link = raw.trim();
    if link.is_empty() {
        return None;
    }
    if link.starts_with("http://") || link.starts_with("https://") {
        Some(link.to_string())
    } else {
        Some(format!("https://{link}"))
    }
}

/// План со свободными заметками и списком ссылок
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: EntityId,
    pub title: String,
    pub notes: String,
    pub links: Vec<String>,
    pub timestamp: Time,
}

impl Plan {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into().trim().to_string(),
            notes: String::new(),
            links: Vec::new(),
            timestamp: 0,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::EmptyField("Plan title"));
        }
        Ok(())
    }

    /// Нормализовать все ссылки; пустые строки недопустимы
    pub fn normalized_links(&self) -> DomainResult<Vec<String>> {
        self.links
            .iter()
            .map(|link| normalize_link(link).ok_or_else(|| DomainError::InvalidLink(link.clone())))
            .collect()
    }
}
