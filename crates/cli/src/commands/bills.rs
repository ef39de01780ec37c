use crate::util;
use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use client::tabs::finances::{summary_cards, BillForm, BillRow, PaymentForm};
use client::tabs::format_currency;
use client::Dashboard;
use colored::*;
use domain::config::DashboardConfig;
use domain::{format_time, Bill, EntityId};
use prettytable::{row, Table};

#[derive(Debug, Args)]
pub struct BillsCommand {
    #[command(subcommand)]
    command: BillsSubcommand,
}

#[derive(Debug, Subcommand)]
enum BillsSubcommand {
    /// Все счета с остатком и прогрессом
    List,
    /// Добавить счёт
    Add {
        title: String,
        amount: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Изменить счёт; не указанные поля остаются прежними
    Edit {
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Внести платёж по счёту
    Pay { id: EntityId, amount: String },
    /// История платежей по счёту
    Payments { id: EntityId },
    /// Сводка: всего, выплачено, осталось
    Summary,
}

impl BillsCommand {
    pub async fn execute(self, config: &DashboardConfig) -> Result<()> {
        let dashboard = util::connect(config)?;

        match self.command {
            BillsSubcommand::List => {
                let bills = dashboard.bills().await?;
                if bills.is_empty() {
                    println!("No bills yet");
                    return Ok(());
                }

                let mut table = Table::new();
                table.add_row(row!["ID", "Title", "Total", "Paid", "Remaining", "Progress", "Status"]);
                for bill in &bills {
                    let view = BillRow::from(bill);
                    let status = if view.is_paid { "paid" } else { "open" };
                    table.add_row(row![
                        view.id,
                        view.title,
                        view.total,
                        view.paid,
                        view.remaining,
                        format!("{}%", view.progress),
                        status
                    ]);
                }
                table.printstd();
            }
            BillsSubcommand::Add {
                title,
                amount,
                description,
            } => {
                let bill = BillForm {
                    title,
                    amount,
                    description,
                }
                .to_bill()?;
                let created = dashboard.add_bill(bill).await?;
                util::success(format!(
                    "Bill #{} added: {} ({})",
                    created.id,
                    created.title.bold(),
                    format_currency(created.total_amount)
                ));
            }
            BillsSubcommand::Edit {
                id,
                title,
                amount,
                description,
            } => {
                let current = find_bill(&dashboard, id).await?;
                let mut form = BillForm::from_bill(&current);
                if let Some(title) = title {
                    form.title = title;
                }
                if let Some(amount) = amount {
                    form.amount = amount;
                }
                if let Some(description) = description {
                    form.description = description;
                }

                let saved = dashboard.edit_bill(id, form.to_bill()?).await?;
                util::success(format!(
                    "Bill #{} saved, remaining {}",
                    saved.id,
                    format_currency(saved.remaining_balance)
                ));
            }
            BillsSubcommand::Pay { id, amount } => {
                let bill = find_bill(&dashboard, id).await?;
                let payment = PaymentForm { amount }.to_payment(&bill)?;
                let recorded = dashboard.add_payment(payment).await?;
                util::success(format!(
                    "Payment of {} recorded for {}",
                    format_currency(recorded.amount),
                    bill.title.bold()
                ));
            }
            BillsSubcommand::Payments { id } => {
                let payments = dashboard.bill_payments(id).await?;
                if payments.is_empty() {
                    println!("No payments for bill #{id}");
                    return Ok(());
                }

                let mut table = Table::new();
                table.add_row(row!["ID", "Amount", "Date"]);
                for payment in &payments {
                    table.add_row(row![
                        payment.id,
                        format_currency(payment.amount),
                        format_time(payment.timestamp)
                    ]);
                }
                table.printstd();
            }
            BillsSubcommand::Summary => {
                let summary = dashboard.bill_summary().await?;
                util::heading(format!(
                    "{} bills: {} paid, {} unpaid",
                    summary.num_bills, summary.num_paid, summary.num_unpaid
                ));
                for (label, value) in summary_cards(&summary) {
                    println!("  {label:<11} {value}");
                }
            }
        }

        Ok(())
    }
}

async fn find_bill(dashboard: &Dashboard, id: EntityId) -> Result<Bill> {
    dashboard
        .bills()
        .await?
        .into_iter()
        .find(|bill| bill.id == id)
        .ok_or_else(|| anyhow!("Bill #{id} not found"))
}
