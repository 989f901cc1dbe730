//! Ordered task storage.
//!
//! Tasks live in a map keyed by their stable id; display and execution order
//! is a separate id sequence, so reordering never moves task data.

use std::collections::HashMap;

use super::{Task, TaskId};
use crate::error::ValidationError;

#[derive(Debug, Clone, Default)]
pub struct TaskList {
    arena: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.arena.get(&id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.arena.get_mut(&id)
    }

    /// Tasks in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> + '_ {
        self.order.iter().filter_map(|id| self.arena.get(id))
    }

    pub fn ids(&self) -> &[TaskId] {
        &self.order
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.order.iter().position(|&x| x == id)
    }

    /// First task in order that is neither completed nor skipped.
    pub fn first_pending(&self) -> Option<&Task> {
        self.iter().find(|task| task.is_pending())
    }

    /// First pending task whose name matches exactly.
    pub fn find_pending_by_name(&self, name: &str) -> Option<TaskId> {
        self.iter()
            .find(|task| task.is_pending() && task.name() == name)
            .map(Task::id)
    }

    /// Smallest id greater than every id in the list.
    pub fn next_id(&self) -> TaskId {
        self.arena.keys().max().map(|id| id + 1).unwrap_or(1)
    }

    pub fn push(&mut self, task: Task) -> Result<(), ValidationError> {
        let id = task.id();
        if self.arena.contains_key(&id) {
            return Err(ValidationError::DuplicateTaskId(id));
        }
        self.arena.insert(id, task);
        self.order.push(id);
        Ok(())
    }

    pub fn remove(&mut self, id: TaskId) -> Result<Task, ValidationError> {
        let task = self
            .arena
            .remove(&id)
            .ok_or(ValidationError::UnknownTaskId(id))?;
        self.order.retain(|&x| x != id);
        Ok(task)
    }

    /// Move a task to `index` in the execution order.
    pub fn move_to(&mut self, id: TaskId, index: usize) -> Result<(), ValidationError> {
        let from = self.position(id).ok_or(ValidationError::UnknownTaskId(id))?;
        if index >= self.order.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "tasks".into(),
                index,
                len: self.order.len(),
            });
        }
        let id = self.order.remove(from);
        self.order.insert(index, id);
        Ok(())
    }

    /// Swap with the previous task. The first task stays put.
    pub fn move_up(&mut self, id: TaskId) -> Result<(), ValidationError> {
        let from = self.position(id).ok_or(ValidationError::UnknownTaskId(id))?;
        if from > 0 {
            self.order.swap(from, from - 1);
        }
        Ok(())
    }

    /// Swap with the next task. The last task stays put.
    pub fn move_down(&mut self, id: TaskId) -> Result<(), ValidationError> {
        let from = self.position(id).ok_or(ValidationError::UnknownTaskId(id))?;
        if from + 1 < self.order.len() {
            self.order.swap(from, from + 1);
        }
        Ok(())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Task> + '_ {
        self.arena.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn morning() -> TaskList {
        let mut list = TaskList::new();
        list.push(Task::new(1, "Wash face")).unwrap();
        list.push(Task::new(2, "Brush teeth")).unwrap();
        list.push(Task::new(3, "Eat breakfast")).unwrap();
        list
    }

    fn names(list: &TaskList) -> Vec<&str> {
        list.iter().map(Task::name).collect()
    }

    #[test]
    fn keeps_insertion_order() {
        let list = morning();
        assert_eq!(names(&list), ["Wash face", "Brush teeth", "Eat breakfast"]);
        assert_eq!(list.next_id(), 4);
    }

    #[test]
    fn rejects_duplicate_id() {
        let mut list = morning();
        let err = list.push(Task::new(2, "Dress")).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateTaskId(2)));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn move_up_and_down_swap_neighbours() {
        let mut list = morning();
        list.move_up(2).unwrap();
        assert_eq!(names(&list), ["Brush teeth", "Wash face", "Eat breakfast"]);
        list.move_up(2).unwrap();
        assert_eq!(list.ids(), &[2, 1, 3]);
        list.move_down(3).unwrap();
        assert_eq!(list.ids(), &[2, 1, 3]);
        list.move_down(2).unwrap();
        assert_eq!(list.ids(), &[1, 2, 3]);
    }

    #[test]
    fn move_to_checks_bounds() {
        let mut list = morning();
        list.move_to(3, 0).unwrap();
        assert_eq!(list.ids(), &[3, 1, 2]);
        assert!(list.move_to(3, 3).is_err());
        assert!(list.move_to(9, 0).is_err());
    }

    #[test]
    fn first_pending_skips_finished_tasks() {
        let mut list = morning();
        list.get_mut(1).unwrap().complete(30);
        list.get_mut(2).unwrap().skip();
        assert_eq!(list.first_pending().map(Task::id), Some(3));
    }

    #[test]
    fn find_by_name_ignores_completed_duplicates() {
        let mut list = morning();
        list.push(Task::new(4, "Wash face")).unwrap();
        assert_eq!(list.find_pending_by_name("Wash face"), Some(1));
        list.get_mut(1).unwrap().complete(10);
        assert_eq!(list.find_pending_by_name("Wash face"), Some(4));
        assert_eq!(list.find_pending_by_name("wash face"), None);
    }

    #[test]
    fn remove_drops_from_order() {
        let mut list = morning();
        let removed = list.remove(2).unwrap();
        assert_eq!(removed.name(), "Brush teeth");
        assert_eq!(list.ids(), &[1, 3]);
        assert!(list.remove(2).is_err());
    }
}
