//! Builder for version 1 jobspecs.

use crate::JobSpec;
use crate::JobSpecError;
use crate::Resource;
use crate::Result;
use crate::Task;
use crate::TaskCount;
use crate::resource;

/// The jobspec schema version produced by [`JobSpecV1`].
pub const VERSION: u64 = 1;

/// The label of the slot tasks are bound to.
pub const TASK_SLOT_LABEL: &str = "task";

/// Parameters for the minimum legal version 1 jobspec.
///
/// Build with [`JobSpecV1::builder`] and convert with
/// [`JobSpecV1::into_jobspec`]; use the [`JobSpec`] setters to assign
/// additional properties afterwards.
///
/// When `num_nodes` is given and `num_tasks` does not divide evenly across
/// the nodes, every node still receives `ceil(num_tasks / num_nodes)` slots
/// and the task count becomes a total, so some slots go unused.
#[derive(Debug, Clone, bon::Builder)]
pub struct JobSpecV1 {
    /// The command to run for every task.
    command: Vec<String>,
    /// The number of tasks.
    #[builder(default = 1)]
    num_tasks: u64,
    /// The number of cores for each task.
    #[builder(default = 1)]
    cores_per_task: u64,
    /// The number of GPUs for each task, if any.
    gpus_per_task: Option<u64>,
    /// The number of nodes to spread the tasks across, if constrained.
    num_nodes: Option<u64>,
}

impl JobSpecV1 {
    /// Validates the parameters.
    fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(JobSpecError::InvalidJobSpecParameters(msg.into()));

        if self.command.is_empty() {
            return invalid("command must be a non-empty list");
        }

        if self.num_tasks < 1 {
            return invalid("task count must be an integer >= 1");
        }

        if self.cores_per_task < 1 {
            return invalid("cores per task must be an integer >= 1");
        }

        if self.gpus_per_task.is_some_and(|n| n < 1) {
            return invalid("gpus per task must be an integer >= 1");
        }

        if let Some(num_nodes) = self.num_nodes {
            if num_nodes < 1 {
                return invalid("node count must be an integer >= 1 (if set)");
            }

            if num_nodes > self.num_tasks {
                return invalid("node count must not be greater than task count");
            }
        }

        Ok(())
    }

    /// Builds the jobspec.
    ///
    /// All parameters are validated before any part of the tree is created.
    pub fn into_jobspec(self) -> Result<JobSpec> {
        self.validate()?;

        let mut children = vec![Resource::new(
            resource::CORE,
            self.cores_per_task,
            Vec::new(),
        )?];
        if let Some(gpus) = self.gpus_per_task {
            children.push(Resource::new(resource::GPU, gpus, Vec::new())?);
        }

        let (root, count) = match self.num_nodes {
            Some(num_nodes) => {
                let slots_per_node = self.num_tasks.div_ceil(num_nodes);
                let count = if self.num_tasks % num_nodes == 0 {
                    TaskCount::PerSlot(1)
                } else {
                    TaskCount::Total(self.num_tasks)
                };
                let slot = Resource::slot(TASK_SLOT_LABEL, slots_per_node, children)?;
                (Resource::new(resource::NODE, num_nodes, vec![slot])?, count)
            }
            None => (
                Resource::slot(TASK_SLOT_LABEL, self.num_tasks, children)?,
                TaskCount::PerSlot(1),
            ),
        };

        let mut jobspec = JobSpec::new(
            VERSION,
            vec![root],
            vec![Task::new(self.command, TASK_SLOT_LABEL, count)],
        );
        jobspec.set_duration(0.0)?;
        Ok(jobspec)
    }
}

impl TryFrom<JobSpecV1> for JobSpec {
    type Error = JobSpecError;

    fn try_from(value: JobSpecV1) -> Result<Self> {
        value.into_jobspec()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn command() -> Vec<String> {
        vec!["hostname".to_string()]
    }

    #[test]
    fn minimal() {
        let jobspec = JobSpecV1::builder()
            .command(command())
            .build()
            .into_jobspec()
            .unwrap();
        jobspec.validate().unwrap();
        assert_eq!(
            serde_json::to_value(&jobspec).unwrap(),
            json!({
                "version": 1,
                "resources": [{
                    "type": "slot",
                    "count": 1,
                    "with": [{ "type": "core", "count": 1 }],
                    "label": "task",
                }],
                "tasks": [{
                    "command": ["hostname"],
                    "slot": "task",
                    "count": { "per_slot": 1 },
                }],
                "attributes": { "system": { "duration": 0.0 } },
            })
        );
    }

    #[test]
    fn total_cores_without_nodes() {
        for (tasks, cores) in [(1, 1), (4, 2), (7, 3), (16, 8)] {
            let jobspec = JobSpec::try_from(
                JobSpecV1::builder()
                    .command(command())
                    .num_tasks(tasks)
                    .cores_per_task(cores)
                    .build(),
            )
            .unwrap();
            assert_eq!(jobspec.total_cores().unwrap(), tasks * cores);
            assert_eq!(jobspec.total_nodes().unwrap(), 0);
            assert_eq!(jobspec.tasks()[0].count(), TaskCount::PerSlot(1));
        }
    }

    #[test]
    fn gpus() {
        let jobspec = JobSpecV1::builder()
            .command(command())
            .num_tasks(2)
            .gpus_per_task(2)
            .build()
            .into_jobspec()
            .unwrap();
        assert_eq!(jobspec.count_resources_of_type(resource::GPU).unwrap(), 4);
        assert_eq!(jobspec.resources()[0].with().len(), 2);
    }

    #[test]
    fn even_nodes() {
        let jobspec = JobSpecV1::builder()
            .command(command())
            .num_tasks(4)
            .num_nodes(2)
            .build()
            .into_jobspec()
            .unwrap();
        let node = &jobspec.resources()[0];
        assert_eq!(node.ty(), Some(resource::NODE));
        assert_eq!(node.count(), Some(2));
        assert_eq!(node.with()[0].count(), Some(2));
        assert_eq!(jobspec.tasks()[0].count(), TaskCount::PerSlot(1));
        assert_eq!(jobspec.total_nodes().unwrap(), 2);
        assert_eq!(jobspec.total_cores().unwrap(), 4);
    }

    #[test]
    fn uneven_nodes_waste_slots() {
        let jobspec = JobSpecV1::builder()
            .command(command())
            .num_tasks(5)
            .num_nodes(2)
            .build()
            .into_jobspec()
            .unwrap();
        let slot = &jobspec.resources()[0].with()[0];
        assert_eq!(slot.label(), Some(TASK_SLOT_LABEL));
        assert_eq!(slot.count(), Some(3));
        assert_eq!(jobspec.tasks()[0].count(), TaskCount::Total(5));
        // Six slots are allocated for five tasks.
        assert_eq!(jobspec.count_resources_of_type(resource::SLOT).unwrap(), 6);
    }

    #[test]
    fn invalid_parameters() {
        let cases = [
            JobSpecV1::builder().command(Vec::new()).build(),
            JobSpecV1::builder().command(command()).num_tasks(0).build(),
            JobSpecV1::builder()
                .command(command())
                .cores_per_task(0)
                .build(),
            JobSpecV1::builder()
                .command(command())
                .gpus_per_task(0)
                .build(),
            JobSpecV1::builder()
                .command(command())
                .num_nodes(0)
                .build(),
            JobSpecV1::builder()
                .command(command())
                .num_tasks(2)
                .num_nodes(3)
                .build(),
        ];

        for params in cases {
            assert!(matches!(
                params.into_jobspec(),
                Err(JobSpecError::InvalidJobSpecParameters(_))
            ));
        }
    }
}
