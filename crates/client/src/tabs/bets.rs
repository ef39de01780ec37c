use super::{format_currency, parse_number, FormError, FormResult};
use domain::{BetStats, HorseBet};

#[derive(Debug, Clone, Default)]
pub struct BetForm {
    pub horse_name: String,
    pub amount: String,
    pub odds: String,
    pub is_win: bool,
}

impl BetForm {
    pub fn to_bet(&self) -> FormResult<HorseBet> {
        if self.horse_name.trim().is_empty()
            || self.amount.trim().is_empty()
            || self.odds.trim().is_empty()
        {
            return Err(FormError::new("Please fill in all fields"));
        }

        Ok(HorseBet {
            id: 0,
            horse_name: self.horse_name.trim().to_string(),
            amount: parse_number(&self.amount, "Amount")?,
            odds: parse_number(&self.odds, "Odds")?,
            is_win: self.is_win,
            timestamp: 0,
        })
    }
}

/// Отображение статистики ставок
#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub total_bets: u64,
    pub record: String,
    pub total_amount: String,
    pub profit_loss: String,
    pub win_rate: String,
    pub in_profit: bool,
}

impl From<&BetStats> for StatsView {
    fn from(stats: &BetStats) -> Self {
        Self {
            total_bets: stats.total_bets,
            record: format!("{} / {}", stats.total_wins, stats.total_losses),
            total_amount: format_currency(stats.total_amount),
            profit_loss: format_currency(stats.profit_loss),
            win_rate: format!("{:.1}%", stats.win_rate()),
            in_profit: stats.profit_loss >= 0.0,
        }
    }
}
