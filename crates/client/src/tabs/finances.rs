use super::{format_currency, parse_number, FormError, FormResult};
use domain::{Bill, BillSummary, Payment};

/// Форма нового или редактируемого счёта
#[derive(Debug, Clone, Default)]
pub struct BillForm {
    pub title: String,
    pub amount: String,
    pub description: String,
}

impl BillForm {
    /// Форма редактирования, заполненная текущими значениями
    pub fn from_bill(bill: &Bill) -> Self {
        Self {
            title: bill.title.clone(),
            amount: format!("{:.2}", bill.total_amount),
            description: bill.description.clone(),
        }
    }

    pub fn to_bill(&self) -> FormResult<Bill> {
        if self.title.trim().is_empty() || self.amount.trim().is_empty() {
            return Err(FormError::new("Please fill in title and amount"));
        }
        let amount = parse_number(&self.amount, "Amount")?;
        if amount <= 0.0 {
            return Err(FormError::new("Amount must be greater than zero"));
        }

        Ok(Bill::new(
            self.title.trim(),
            amount,
            self.description.trim(),
        ))
    }
}

/// Форма платежа по выбранному счёту
#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    pub amount: String,
}

impl PaymentForm {
    pub fn to_payment(&self, bill: &Bill) -> FormResult<Payment> {
        if self.amount.trim().is_empty() {
            return Err(FormError::new("Please enter payment amount"));
        }
        let amount = parse_number(&self.amount, "Payment amount")?;
        if amount <= 0.0 {
            return Err(FormError::new("Payment amount must be greater than zero"));
        }
        if amount > bill.remaining_balance {
            return Err(FormError::new("Payment amount exceeds remaining balance"));
        }

        Ok(Payment {
            id: 0,
            bill_id: bill.id,
            amount,
            timestamp: 0,
        })
    }
}

/// Строка счёта для отображения
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    pub id: u64,
    pub title: String,
    pub total: String,
    pub paid: String,
    pub remaining: String,
    pub progress: u16,
    pub is_paid: bool,
}

impl From<&Bill> for BillRow {
    fn from(bill: &Bill) -> Self {
        Self {
            id: bill.id,
            title: bill.title.clone(),
            total: format_currency(bill.total_amount),
            paid: format_currency(bill.paid_amount()),
            remaining: format_currency(bill.remaining_balance),
            progress: bill.progress_percent().round().clamp(0.0, 100.0) as u16,
            is_paid: bill.is_paid,
        }
    }
}

/// Карточки сводки: всего, выплачено, осталось
pub fn summary_cards(summary: &BillSummary) -> [(&'static str, String); 3] {
    [
        ("Total Owed", format_currency(summary.total_owed)),
        ("Total Paid", format_currency(summary.total_paid)),
        ("Remaining", format_currency(summary.total_remaining)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill() -> Bill {
        Bill {
            id: 3,
            remaining_balance: 60.0,
            ..Bill::new("Phone", 100.0, "")
        }
    }

    #[test]
    fn test_bill_form_requires_title_and_amount() {
        let form = BillForm {
            title: "Rent".to_string(),
            ..BillForm::default()
        };
        assert_eq!(
            form.to_bill().unwrap_err().to_string(),
            "Please fill in title and amount"
        );

        let form = BillForm {
            title: " Rent ".to_string(),
            amount: "850".to_string(),
            description: String::new(),
        };
        let bill = form.to_bill().unwrap();
        assert_eq!(bill.title, "Rent");
        assert_eq!(bill.remaining_balance, 850.0);
    }

    #[test]
    fn test_payment_form_checks_remaining_balance() {
        let form = PaymentForm {
            amount: "60.01".to_string(),
        };
        assert_eq!(
            form.to_payment(&bill()).unwrap_err().to_string(),
            "Payment amount exceeds remaining balance"
        );

        let form = PaymentForm {
            amount: "60".to_string(),
        };
        let payment = form.to_payment(&bill()).unwrap();
        assert_eq!(payment.bill_id, 3);
    }

    #[test]
    fn test_bill_row() {
        let row = BillRow::from(&bill());
        assert_eq!(row.total, "€100.00");
        assert_eq!(row.paid, "€40.00");
        assert_eq!(row.remaining, "€60.00");
        assert_eq!(row.progress, 40);
    }
}
