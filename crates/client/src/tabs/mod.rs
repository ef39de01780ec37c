//! Логика форм и представлений по вкладкам дашборда, без привязки к UI

pub mod bets;
pub mod finances;
pub mod habits;
pub mod nns;
pub mod planning;
pub mod todo;

use thiserror::Error;

/// Ошибка заполнения формы; текст показывается пользователю как есть
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FormError(pub String);

impl FormError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type FormResult<T> = Result<T, FormError>;

/// Сумма в евро с двумя знаками
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-€{:.2}", amount.abs())
    } else {
        format!("€{:.2}", amount)
    }
}

/// Количество ICP с заданным числом знаков
pub fn format_icp(amount: f64, decimals: usize) -> String {
    format!("{:.*} ICP", decimals, amount)
}

/// Разобрать числовое поле формы
pub(crate) fn parse_number(raw: &str, field: &str) -> FormResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FormError::new(format!("{field} must be a number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "€0.00");
        assert_eq!(format_currency(1234.5), "€1234.50");
        assert_eq!(format_currency(-30.0), "-€30.00");
    }

    #[test]
    fn test_format_icp() {
        assert_eq!(format_icp(12.3456, 2), "12.35 ICP");
        assert_eq!(format_icp(0.5, 4), "0.5000 ICP");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 2.5 ", "Amount"), Ok(2.5));
        assert_eq!(
            parse_number("abc", "Amount"),
            Err(FormError::new("Amount must be a number"))
        );
    }
}
