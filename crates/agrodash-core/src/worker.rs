//! Farm worker summaries.

use serde::{Deserialize, Serialize};

use crate::{FarmModule, WorkerId};

/// Workload summary of one farm worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSummary {
    /// Unique worker identifier.
    pub id: WorkerId,

    /// Full name.
    pub name: String,

    /// Job role (e.g., "Veterinaria", "Operario").
    pub role: String,

    /// Module the worker is assigned to.
    pub module: FarmModule,

    /// Tasks completed this period.
    pub tasks_completed: u32,

    /// Tasks still open.
    pub tasks_pending: u32,
}

impl WorkerSummary {
    /// Share of completed tasks, in percent.
    pub fn completion_pct(&self) -> f64 {
        let total = self.tasks_completed + self.tasks_pending;
        if total == 0 {
            return 0.0;
        }
        f64::from(self.tasks_completed) / f64::from(total) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_pct() {
        let worker = WorkerSummary {
            id: WorkerId::new("w-1"),
            name: "Ana".to_string(),
            role: "Operaria".to_string(),
            module: FarmModule::Avicultura,
            tasks_completed: 3,
            tasks_pending: 1,
        };
        assert_eq!(worker.completion_pct(), 75.0);
    }
}
