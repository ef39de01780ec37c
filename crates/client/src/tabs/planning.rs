use super::{FormError, FormResult};
use domain::{normalize_link, EntityId, Plan, Time};

/// Новый план по заголовку
pub fn new_plan(title: &str) -> FormResult<Plan> {
    if title.trim().is_empty() {
        return Err(FormError::new("Please enter a plan title"));
    }
    Ok(Plan::new(title))
}

/// Редактор заметок и ссылок выбранного плана
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEditor {
    pub plan_id: EntityId,
    pub title: String,
    pub notes: String,
    pub links: Vec<String>,
    pub new_link: String,
    timestamp: Time,
}

impl PlanEditor {
    pub fn open(plan: &Plan) -> Self {
        Self {
            plan_id: plan.id,
            title: plan.title.clone(),
            notes: plan.notes.clone(),
            links: plan.links.clone(),
            new_link: String::new(),
            timestamp: plan.timestamp,
        }
    }

    /// Добавить ссылку из поля ввода; пустой ввод игнорируется
    pub fn add_link(&mut self) -> Option<&str> {
        let link = normalize_link(&self.new_link)?;
        self.new_link.clear();
        self.links.push(link);
        self.links.last().map(String::as_str)
    }

    pub fn remove_link(&mut self, index: usize) -> Option<String> {
        (index < self.links.len()).then(|| self.links.remove(index))
    }

    /// Отличается ли редактор от сохранённого плана
    pub fn is_dirty(&self, saved: &Plan) -> bool {
        self.notes != saved.notes || self.links != saved.links
    }

    /// План для `updatePlan`
    pub fn to_plan(&self) -> Plan {
        Plan {
            id: self.plan_id,
            title: self.title.clone(),
            notes: self.notes.clone(),
            links: self.links.clone(),
            timestamp: self.timestamp,
        }
    }
}
