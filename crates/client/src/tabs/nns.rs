use super::{format_icp, parse_number, FormError, FormResult};
use domain::{format_time, FullNnsData, NnsMaturity, NnsState};

/// Дней в прогнозе maturity
pub const PROJECTION_DAYS: u32 = 30;

#[derive(Debug, Clone, Default)]
pub struct StakeForm {
    pub staked_icp: String,
}

impl StakeForm {
    pub fn to_state(&self) -> FormResult<NnsState> {
        if self.staked_icp.trim().is_empty() {
            return Err(FormError::new("Please enter staked ICP amount"));
        }
        Ok(NnsState {
            staked_icp: parse_number(&self.staked_icp, "Staked ICP")?,
            last_updated: 0,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MaturityForm {
    pub earned: String,
    pub earned_per_day: String,
}

impl MaturityForm {
    pub fn to_maturity(&self) -> FormResult<NnsMaturity> {
        if self.earned.trim().is_empty() || self.earned_per_day.trim().is_empty() {
            return Err(FormError::new("Please fill in all fields"));
        }
        Ok(NnsMaturity {
            earned: parse_number(&self.earned, "Earned")?,
            earned_per_day: parse_number(&self.earned_per_day, "Earned per day")?,
            last_updated: 0,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NnsView {
    pub staked: String,
    pub staked_updated: String,
    pub earned: String,
    pub earned_per_day: String,
    pub projected: String,
    pub maturity_updated: String,
}

impl From<&FullNnsData> for NnsView {
    fn from(data: &FullNnsData) -> Self {
        Self {
            staked: format_icp(data.nns_state.staked_icp, 2),
            staked_updated: format_time(data.nns_state.last_updated),
            earned: format_icp(data.maturity.earned, 2),
            earned_per_day: format_icp(data.maturity.earned_per_day, 4),
            projected: format_icp(data.maturity.projected(PROJECTION_DAYS), 2),
            maturity_updated: format_time(data.maturity.last_updated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stake_form() {
        assert_eq!(
            StakeForm::default().to_state().unwrap_err().to_string(),
            "Please enter staked ICP amount"
        );
        let form = StakeForm {
            staked_icp: "120.5".to_string(),
        };
        assert_eq!(form.to_state().unwrap().staked_icp, 120.5);
    }

    #[test]
    fn test_maturity_form_requires_both_fields() {
        let form = MaturityForm {
            earned: "3".to_string(),
            ..MaturityForm::default()
        };
        assert!(form.to_maturity().is_err());
    }

    #[test]
    fn test_view_of_empty_data() {
        let view = NnsView::from(&FullNnsData::default());
        assert_eq!(view.staked, "0.00 ICP");
        assert_eq!(view.earned_per_day, "0.0000 ICP");
        assert_eq!(view.staked_updated, "Never");
    }
}
