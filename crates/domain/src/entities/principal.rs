use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Текстовое представление анонимного principal'а
const ANONYMOUS_TEXT: &str = "2vxsx-fae";

/// Идентичность вызывающей стороны, выданная внешним identity provider'ом
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            return Self::anonymous();
        }
        Self(text.trim().to_string())
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_TEXT.to_string())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_TEXT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Роль в системе контроля доступа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

impl UserRole {
    /// Может ли роль вызывать пользовательские операции
    pub fn has_user_access(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::User)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
            UserRole::Guest => write!(f, "guest"),
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            "guest" => Ok(UserRole::Guest),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// Профиль пользователя
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_principal_is_anonymous() {
        assert!(Principal::new("   ").is_anonymous());
        assert!(!Principal::new("aaaaa-aa").is_anonymous());
    }

    #[test]
    fn test_role_parse_and_access() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("root".parse::<UserRole>().is_err());
        assert!(UserRole::User.has_user_access());
        assert!(!UserRole::Guest.has_user_access());
    }

    #[test]
    fn test_role_wire_format() {
        let json = serde_json::to_string(&UserRole::Guest).unwrap();
        assert_eq!(json, "\"guest\"");
    }
}
