use crate::errors::{DomainError, DomainResult};
use crate::time::Time;
use crate::EntityId;
use serde::{Deserialize, Serialize};

/// Допуск сравнения денежных сумм (полцента)
const CENT_TOLERANCE: f64 = 0.005;

/// Округление до центов
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ensure_amount(amount: f64) -> DomainResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DomainError::InvalidAmount(amount));
    }
    Ok(())
}

/// Счёт, по которому вносятся платежи
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub total_amount: f64,
    pub remaining_balance: f64,
    pub is_paid: bool,
    pub created_at: Time,
}

impl Bill {
    /// Новый неоплаченный счёт: остаток равен полной сумме
    pub fn new(title: impl Into<String>, total_amount: f64, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            total_amount,
            remaining_balance: total_amount,
            is_paid: false,
            created_at: 0,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::EmptyField("Title"));
        }
        ensure_amount(self.total_amount)
    }

    /// Уже выплаченная сумма
    pub fn paid_amount(&self) -> f64 {
        round_cents(self.total_amount - self.remaining_balance)
    }

    /// Процент погашения, 0 для нулевой суммы
    pub fn progress_percent(&self) -> f64 {
        if self.total_amount == 0.0 {
            return 0.0;
        }
        (self.total_amount - self.remaining_balance) / self.total_amount * 100.0
    }

    /// Применить платёж к остатку
    pub fn apply_payment(&mut self, amount: f64) -> DomainResult<()> {
        ensure_amount(amount)?;
        if amount > self.remaining_balance + CENT_TOLERANCE {
            return Err(DomainError::PaymentExceedsBalance {
                amount,
                remaining: self.remaining_balance,
            });
        }

        self.remaining_balance = round_cents((self.remaining_balance - amount).max(0.0));
        self.is_paid = self.remaining_balance <= CENT_TOLERANCE;
        Ok(())
    }

    /// Обновить заголовок/описание/сумму, сохранив уже выплаченное
    pub fn revise(&mut self, updated: &Bill) -> DomainResult<()> {
        updated.validate()?;
        let paid = self.paid_amount();

        self.title = updated.title.clone();
        self.description = updated.description.clone();
        self.total_amount = updated.total_amount;
        self.remaining_balance = round_cents((updated.total_amount - paid).max(0.0));
        self.is_paid = self.remaining_balance <= CENT_TOLERANCE;
        Ok(())
    }
}

/// Платёж по счёту
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: EntityId,
    pub bill_id: EntityId,
    pub amount: f64,
    pub timestamp: Time,
}

/// Сводка по всем счетам пользователя
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    pub num_bills: u64,
    pub num_paid: u64,
    pub num_unpaid: u64,
    pub total_owed: f64,
    pub total_paid: f64,
    pub total_remaining: f64,
}

impl BillSummary {
    pub fn from_bills(bills: &[Bill]) -> Self {
        let mut summary = bills.iter().fold(Self::default(), |mut acc, bill| {
            acc.num_bills += 1;
            if bill.is_paid {
                acc.num_paid += 1;
            } else {
                acc.num_unpaid += 1;
            }
            acc.total_owed += bill.total_amount;
            acc.total_paid += bill.total_amount - bill.remaining_balance;
            acc.total_remaining += bill.remaining_balance;
            acc
        });

        summary.total_owed = round_cents(summary.total_owed);
        summary.total_paid = round_cents(summary.total_paid);
        summary.total_remaining = round_cents(summary.total_remaining);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_payment_partial_and_full() {
        let mut bill = Bill::new("Rent", 100.0, "");
        bill.apply_payment(40.0).unwrap();
        assert_eq!(bill.remaining_balance, 60.0);
        assert!(!bill.is_paid);
        assert_eq!(bill.progress_percent(), 40.0);

        bill.apply_payment(60.0).unwrap();
        assert_eq!(bill.remaining_balance, 0.0);
        assert!(bill.is_paid);
    }

    #[test]
    fn test_overpayment_rejected() {
        let mut bill = Bill::new("Phone", 20.0, "");
        let err = bill.apply_payment(20.5).unwrap_err();
        assert!(matches!(err, DomainError::PaymentExceedsBalance { .. }));
        assert_eq!(bill.remaining_balance, 20.0);
    }

    #[test]
    fn test_non_positive_payment_rejected() {
        let mut bill = Bill::new("Phone", 20.0, "");
        assert_eq!(bill.apply_payment(0.0), Err(DomainError::InvalidAmount(0.0)));
        assert!(bill.apply_payment(f64::NAN).is_err());
    }

    #[test]
    fn test_float_residue_settles_bill() {
        let mut bill = Bill::new("Groceries", 0.3, "");
        bill.apply_payment(0.1).unwrap();
        bill.apply_payment(0.2).unwrap();
        assert!(bill.is_paid);
        assert_eq!(bill.remaining_balance, 0.0);
    }

    #[test]
    fn test_revise_keeps_paid_amount() {
        let mut bill = Bill::new("Card", 100.0, "old");
        bill.apply_payment(30.0).unwrap();

        let updated = Bill::new("Credit card", 150.0, "new");
        bill.revise(&updated).unwrap();
        assert_eq!(bill.title, "Credit card");
        assert_eq!(bill.remaining_balance, 120.0);
        assert!(!bill.is_paid);

        let shrunk = Bill::new("Credit card", 25.0, "new");
        bill.revise(&shrunk).unwrap();
        assert_eq!(bill.remaining_balance, 0.0);
        assert!(bill.is_paid);
    }

    #[test]
    fn test_progress_of_zero_total() {
        let bill = Bill {
            total_amount: 0.0,
            remaining_balance: 0.0,
            ..Bill::new("Free", 0.0, "")
        };
        assert_eq!(bill.progress_percent(), 0.0);
    }

    #[test]
    fn test_summary() {
        let mut paid = Bill::new("A", 50.0, "");
        paid.apply_payment(50.0).unwrap();
        let mut partial = Bill::new("B", 80.0, "");
        partial.apply_payment(20.0).unwrap();

        let summary = BillSummary::from_bills(&[paid, partial]);
        assert_eq!(summary.num_bills, 2);
        assert_eq!(summary.num_paid, 1);
        assert_eq!(summary.num_unpaid, 1);
        assert_eq!(summary.total_owed, 130.0);
        assert_eq!(summary.total_paid, 70.0);
        assert_eq!(summary.total_remaining, 60.0);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(Bill::new("A", 1.0, "")).unwrap();
        assert!(json.get("totalAmount").is_some());
        assert!(json.get("remainingBalance").is_some());
        assert!(json.get("isPaid").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
