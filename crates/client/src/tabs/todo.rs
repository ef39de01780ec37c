use super::{FormError, FormResult};
use domain::{Task, TaskPriority};

#[derive(Debug, Clone)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: TaskPriority,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: String::new(),
            priority: TaskPriority::Medium,
        }
    }
}

impl TaskForm {
    pub fn to_task(&self) -> FormResult<Task> {
        if self.title.trim().is_empty() || self.category.trim().is_empty() {
            return Err(FormError::new("Please fill in title and category"));
        }
        Ok(Task::new(
            self.title.trim(),
            self.description.trim(),
            self.category.trim(),
            self.priority,
        ))
    }
}

/// Активные и выполненные задачи, каждая группа по приоритету
pub fn split_tasks(tasks: &[Task]) -> (Vec<&Task>, Vec<&Task>) {
    let (mut active, mut completed): (Vec<&Task>, Vec<&Task>) =
        tasks.iter().partition(|task| !task.is_complete);
    active.sort_by_key(|task| (task.priority().level(), task.id));
    completed.sort_by_key(|task| (task.priority().level(), task.id));
    (active, completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_requires_title_and_category() {
        let form = TaskForm {
            title: "Taxes".to_string(),
            ..TaskForm::default()
        };
        assert_eq!(
            form.to_task().unwrap_err().to_string(),
            "Please fill in title and category"
        );
    }

    #[test]
    fn test_split_orders_by_priority() {
        let mut low = Task::new("Low", "", "Home", TaskPriority::Low);
        low.id = 1;
        let mut high = Task::new("High", "", "Work", TaskPriority::High);
        high.id = 2;
        let mut done = Task::new("Done", "", "Work", TaskPriority::Medium);
        done.id = 3;
        done.is_complete = true;

        let tasks = vec![low, high, done];
        let (active, completed) = split_tasks(&tasks);
        assert_eq!(
            active.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![2, 1]
        );
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].priority_label(), "Medium");
    }
}
