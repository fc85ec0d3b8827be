//! Deferred one-shot tasks on the simulation clock
//!
//! The only "async" primitive in the sim: a queue of {fire-at, action}
//! entries drained once per tick. Actions are plain data applied by the
//! tick function, never closures. Because tasks fire on *simulation* time,
//! pausing the sim clock freezes every pending delay with its remaining
//! time intact — resume never replays a wall-clock gap.

/// What to do when a task comes due
#[derive(Debug, Clone, PartialEq)]
pub enum TaskAction {
    /// Clear an attack's cooldown flag
    ResetCooldown { owner: u32, attack: usize },
    /// Resolve a telegraphed area attack (marker id into the telegraph list)
    ResolveTelegraph { marker: u32 },
    /// Fire one step of the boss's repeating attack pattern. Stale
    /// generations (pattern replaced by a phase change) are dropped unfired.
    BossPattern { generation: u32 },
}

#[derive(Debug, Clone)]
struct Task {
    fire_at_ms: f64,
    /// Insertion order, for deterministic tie-breaks
    seq: u64,
    action: TaskAction,
}

/// Pending deferred tasks
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    tasks: Vec<Task>,
    next_seq: u64,
}

impl TaskQueue {
    /// Schedule `action` to fire once the sim clock reaches `fire_at_ms`
    pub fn schedule(&mut self, fire_at_ms: f64, action: TaskAction) {
        self.tasks.push(Task {
            fire_at_ms,
            seq: self.next_seq,
            action,
        });
        self.next_seq += 1;
    }

    /// Remove and return every task due at `now_ms`, in (fire time,
    /// insertion) order
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<TaskAction> {
        let mut due: Vec<Task> = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].fire_at_ms <= now_ms {
                due.push(self.tasks.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| {
            a.fire_at_ms
                .partial_cmp(&b.fire_at_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        due.into_iter().map(|t| t.action).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_time_order() {
        let mut q = TaskQueue::default();
        q.schedule(
            300.0,
            TaskAction::ResetCooldown {
                owner: 1,
                attack: 0,
            },
        );
        q.schedule(100.0, TaskAction::ResolveTelegraph { marker: 7 });
        q.schedule(200.0, TaskAction::BossPattern { generation: 0 });

        let due = q.drain_due(250.0);
        assert_eq!(
            due,
            vec![
                TaskAction::ResolveTelegraph { marker: 7 },
                TaskAction::BossPattern { generation: 0 },
            ]
        );
        // The 300ms task is still pending
        assert_eq!(q.len(), 1);
        assert!(q.drain_due(300.0).len() == 1);
        assert!(q.is_empty());
    }

    #[test]
    fn test_ties_fire_in_insertion_order() {
        let mut q = TaskQueue::default();
        q.schedule(100.0, TaskAction::ResolveTelegraph { marker: 1 });
        q.schedule(100.0, TaskAction::ResolveTelegraph { marker: 2 });
        let due = q.drain_due(100.0);
        assert_eq!(
            due,
            vec![
                TaskAction::ResolveTelegraph { marker: 1 },
                TaskAction::ResolveTelegraph { marker: 2 },
            ]
        );
    }

    #[test]
    fn test_nothing_due_before_time() {
        let mut q = TaskQueue::default();
        q.schedule(500.0, TaskAction::BossPattern { generation: 1 });
        assert!(q.drain_due(499.9).is_empty());
        assert_eq!(q.len(), 1);
    }
}
