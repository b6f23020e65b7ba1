use crate::error::SubmitError;
use crate::form::TaskForm;
use crate::task::Task;

/// Tasks in insertion order, with the card selection.
#[derive(Debug, Default)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    pub selected_task: usize,
}

impl TaskList {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            selected_task: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Validates `form` and appends a new task.
    ///
    /// Incomplete input and an existing (name, due date) pair leave the list
    /// untouched.
    pub fn submit(&mut self, form: &TaskForm) -> Result<&Task, SubmitError> {
        let new_task = form.validate()?;
        if self
            .tasks
            .iter()
            .any(|t| t.same_as(&new_task.name, new_task.due_date))
        {
            return Err(SubmitError::Duplicate {
                name: new_task.name,
                due_date: new_task.due_date,
            });
        }

        self.tasks.push(Task {
            name: new_task.name,
            due_date: new_task.due_date,
        });
        let index = self.tasks.len() - 1;
        Ok(&self.tasks[index])
    }

    /// Removes the task at `index`, keeping the selection inside the list.
    pub fn remove(&mut self, index: usize) -> Option<Task> {
        if index >= self.tasks.len() {
            return None;
        }
        let task = self.tasks.remove(index);
        self.selected_task = self
            .selected_task
            .min(self.tasks.len().saturating_sub(1));
        Some(task)
    }

    pub fn remove_selected(&mut self) -> Option<Task> {
        self.remove(self.selected_task)
    }

    pub fn move_selection(&mut self, direction: isize) {
        if self.is_empty() {
            self.selected_task = 0;
            return;
        }
        let last = self.tasks.len() as isize - 1;
        self.selected_task = (self.selected_task as isize + direction).clamp(0, last) as usize;
    }

    #[cfg(test)]
    pub fn find_by_name(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }
}
