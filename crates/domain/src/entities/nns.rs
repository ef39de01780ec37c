use crate::errors::{DomainError, DomainResult};
use crate::time::Time;
use serde::{Deserialize, Serialize};

/// Застейканные ICP в NNS
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NnsState {
    #[serde(rename = "stakedICP")]
    pub staked_icp: f64,
    pub last_updated: Time,
}

impl NnsState {
    pub fn validate(&self) -> DomainResult<()> {
        if !self.staked_icp.is_finite() || self.staked_icp < 0.0 {
            return Err(DomainError::InvalidAmount(self.staked_icp));
        }
        Ok(())
    }
}

/// Накопленный maturity и дневная скорость
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NnsMaturity {
    pub earned: f64,
    pub earned_per_day: f64,
    pub last_updated: Time,
}

impl NnsMaturity {
    pub fn validate(&self) -> DomainResult<()> {
        for value in [self.earned, self.earned_per_day] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidAmount(value));
            }
        }
        Ok(())
    }

    /// Ожидаемый maturity через `days` дней при текущей скорости
    pub fn projected(&self, days: u32) -> f64 {
        self.earned + self.earned_per_day * f64::from(days)
    }
}

/// Состояние и maturity одним ответом
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullNnsData {
    pub nns_state: NnsState,
    pub maturity: NnsMaturity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(FullNnsData::default()).unwrap();
        assert!(json["nnsState"].get("stakedICP").is_some());
        assert!(json["maturity"].get("earnedPerDay").is_some());
    }

    #[test]
    fn test_projection_and_validation() {
        let maturity = NnsMaturity {
            earned: 1.5,
            earned_per_day: 0.25,
            last_updated: 0,
        };
        assert_eq!(maturity.projected(4), 2.5);
        assert!(maturity.validate().is_ok());

        let negative = NnsState {
            staked_icp: -1.0,
            last_updated: 0,
        };
        assert!(negative.validate().is_err());
    }
}
