use super::bill::round_cents;
use crate::errors::{DomainError, DomainResult};
use crate::time::Time;
use crate::EntityId;
use serde::{Deserialize, Serialize};

/// Ставка на скачках (десятичные коэффициенты)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseBet {
    pub id: EntityId,
    pub horse_name: String,
    pub amount: f64,
    pub odds: f64,
    pub is_win: bool,
    pub timestamp: Time,
}

impl HorseBet {
    pub fn validate(&self) -> DomainResult<()> {
        if self.horse_name.trim().is_empty() {
            return Err(DomainError::EmptyField("Horse name"));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(DomainError::InvalidAmount(self.amount));
        }
        if !self.odds.is_finite() || self.odds <= 0.0 {
            return Err(DomainError::InvalidOdds(self.odds));
        }
        Ok(())
    }

    /// Чистый результат ставки: выигрыш за вычетом ставки либо потеря ставки
    pub fn net_result(&self) -> f64 {
        if self.is_win {
            self.amount * self.odds - self.amount
        } else {
            -self.amount
        }
    }
}

/// Статистика ставок
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetStats {
    pub total_bets: u64,
    pub total_wins: u64,
    pub total_losses: u64,
    pub total_amount: f64,
    pub profit_loss: f64,
}

impl BetStats {
    pub fn from_bets(bets: &[HorseBet]) -> Self {
        let mut stats = bets.iter().fold(Self::default(), |mut acc, bet| {
            acc.total_bets += 1;
            if bet.is_win {
                acc.total_wins += 1;
            } else {
                acc.total_losses += 1;
            }
            acc.total_amount += bet.amount;
            acc.profit_loss += bet.net_result();
            acc
        });

        stats.total_amount = round_cents(stats.total_amount);
        stats.profit_loss = round_cents(stats.profit_loss);
        stats
    }

    /// Доля выигрышей в процентах
    pub fn win_rate(&self) -> f64 {
        if self.total_bets == 0 {
            return 0.0;
        }
        self.total_wins as f64 / self.total_bets as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bet(amount: f64, odds: f64, is_win: bool) -> HorseBet {
        HorseBet {
            id: 0,
            horse_name: "Seabiscuit".to_string(),
            amount,
            odds,
            is_win,
            timestamp: 0,
        }
    }

    #[test]
    fn test_stats_profit_loss() {
        let stats = BetStats::from_bets(&[bet(10.0, 3.0, true), bet(5.0, 2.0, false)]);
        assert_eq!(stats.total_bets, 2);
        assert_eq!(stats.total_wins, 1);
        assert_eq!(stats.total_losses, 1);
        assert_eq!(stats.total_amount, 15.0);
        // +20 за выигрыш, -5 за проигрыш
        assert_eq!(stats.profit_loss, 15.0);
        assert_eq!(stats.win_rate(), 50.0);
    }

    #[test]
    fn test_empty_stats() {
        let stats = BetStats::from_bets(&[]);
        assert_eq!(stats, BetStats::default());
        assert_eq!(stats.win_rate(), 0.0);
    }

    #[test]
    fn test_validation() {
        assert!(bet(10.0, 2.0, false).validate().is_ok());
        assert!(bet(-1.0, 2.0, false).validate().is_err());
        assert_eq!(
            bet(1.0, 0.0, false).validate(),
            Err(DomainError::InvalidOdds(0.0))
        );
    }
}
