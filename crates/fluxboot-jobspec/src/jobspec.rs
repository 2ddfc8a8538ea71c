//! The jobspec document: resources, tasks, and attributes.

use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::trace;

use crate::DurationValue;
use crate::JobSpecError;
use crate::Resource;
use crate::Result;
use crate::resource;
use crate::tree;

/// The attribute path of the job duration.
const DURATION_ATTRIBUTE: &str = "system.duration";

/// The attribute path of the job working directory.
const CWD_ATTRIBUTE: &str = "system.cwd";

/// The attribute path of the job environment.
const ENVIRONMENT_ATTRIBUTE: &str = "system.environment";

/// The attribute path prefix of shell options.
const SHELL_OPTIONS_ATTRIBUTE: &str = "system.shell.options";

/// The attribute path of the user's requested shell.
const USER_SHELL_ATTRIBUTE: &str = "user.shell";

/// Represents how many tasks to launch for a task descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCount {
    /// Launch this many tasks in every slot.
    PerSlot(u64),
    /// Launch this many tasks in total, distributed across slots.
    Total(u64),
}

/// Represents a task descriptor: a command bound to a slot label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// The command to run.
    command: Vec<String>,
    /// The label of the slot the task runs in.
    slot: String,
    /// How many tasks to launch.
    count: TaskCount,
    /// Any other keys present on the task.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Task {
    /// Creates a new task descriptor.
    pub fn new(command: Vec<String>, slot: impl Into<String>, count: TaskCount) -> Self {
        Self {
            command,
            slot: slot.into(),
            count,
            extra: Map::new(),
        }
    }

    /// Gets the command of the task.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Gets the slot label the task is bound to.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Gets the task count specification.
    pub fn count(&self) -> TaskCount {
        self.count
    }
}

/// Represents a jobspec.
///
/// A jobspec is either parsed from text (see [`JobSpec::parse`]) or produced
/// by a versioned builder such as [`JobSpecV1`](crate::JobSpecV1). It owns its
/// resource tree exclusively; mutation happens through the setters below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// The jobspec schema version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u64>,
    /// The root resources.
    #[serde(default)]
    resources: Vec<Resource>,
    /// The task descriptors.
    #[serde(default)]
    tasks: Vec<Task>,
    /// The nested job attributes.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    attributes: Map<String, Value>,
    /// Any other top-level keys.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl JobSpec {
    /// Creates a jobspec from its parts.
    pub fn new(version: u64, resources: Vec<Resource>, tasks: Vec<Task>) -> Self {
        Self {
            version: Some(version),
            resources,
            tasks,
            attributes: Map::new(),
            extra: Map::new(),
        }
    }

    /// Parses a jobspec from YAML (or JSON) text.
    ///
    /// The text is first read into a generic value and then decoded, so task
    /// counts use the mapping form (`{per_slot: 1}`) in both YAML and JSON.
    ///
    /// Parsing is structural only; use [`JobSpec::validate`] to check that the
    /// resource tree and task bindings are complete.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_yaml_ng::from_str(text)?;
        let jobspec: Self = serde_json::from_value(value).map_err(JobSpecError::Decode)?;
        trace!(?jobspec, "parsed jobspec");
        Ok(jobspec)
    }

    /// Serializes the jobspec to its canonical JSON text.
    ///
    /// The result can be parsed again with [`JobSpec::parse`].
    pub fn dumps(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Gets the schema version, if present.
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// Gets the root resources.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Gets the task descriptors.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Gets the job attributes.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Gets the attribute at the given dotted path, if present.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        tree::get(&self.attributes, key)
    }

    /// Gets the job duration in seconds, if present.
    ///
    /// A duration of zero means no limit was set.
    pub fn duration(&self) -> Option<f64> {
        self.attribute(DURATION_ATTRIBUTE).and_then(Value::as_f64)
    }

    /// Gets the shell the user requested the job to run under, if any.
    pub fn user_shell(&self) -> Option<&str> {
        self.attribute(USER_SHELL_ATTRIBUTE).and_then(Value::as_str)
    }

    /// Sets the job duration.
    ///
    /// The duration may be a number of seconds or a Flux standard duration
    /// string. A duration of zero is interpreted as "not set". On error the
    /// existing duration is left unchanged.
    pub fn set_duration<'a>(&mut self, duration: impl Into<DurationValue<'a>>) -> Result<()> {
        let seconds = duration.into().seconds()?;
        tree::set(&mut self.attributes, DURATION_ATTRIBUTE, Value::from(seconds))
    }

    /// Sets the working directory of the job.
    pub fn set_working_directory(&mut self, cwd: impl Into<String>) -> Result<()> {
        tree::set(&mut self.attributes, CWD_ATTRIBUTE, Value::String(cwd.into()))
    }

    /// Sets the entire environment of the job.
    pub fn set_environment<K, V>(
        &mut self,
        environment: impl IntoIterator<Item = (K, V)>,
    ) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let environment = environment
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        tree::set(
            &mut self.attributes,
            ENVIRONMENT_ATTRIBUTE,
            Value::Object(environment),
        )
    }

    /// Sets a job attribute at the given dotted path (relative to
    /// `attributes`).
    pub fn set_attribute(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        tree::set(&mut self.attributes, key, value.into())
    }

    /// Sets a job shell option.
    pub fn set_shell_option(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.set_attribute(&format!("{SHELL_OPTIONS_ATTRIBUTE}.{name}"), value)
    }

    /// Counts the instances of the given resource type across the whole
    /// resource tree.
    ///
    /// Fails if any visited resource is missing its type or count.
    pub fn count_resources_of_type(&self, ty: &str) -> Result<u64> {
        self.resources.iter().try_fold(0u64, |total, r| {
            total.checked_add(r.count_of_type(ty)?).ok_or_else(|| {
                JobSpecError::MalformedJobSpec(format!("count of `{ty}` resources overflows"))
            })
        })
    }

    /// Gets the total number of nodes requested.
    pub fn total_nodes(&self) -> Result<u64> {
        self.count_resources_of_type(resource::NODE)
    }

    /// Gets the total number of cores requested.
    pub fn total_cores(&self) -> Result<u64> {
        self.count_resources_of_type(resource::CORE)
    }

    /// Validates the jobspec.
    ///
    /// Every resource must have a type and a positive count, every slot must
    /// be labeled, and every task must have a command and reference a slot
    /// label present in the resource tree.
    pub fn validate(&self) -> Result<()> {
        if self.resources.is_empty() {
            return Err(JobSpecError::MalformedJobSpec(
                "jobspec has no resources".into(),
            ));
        }

        self.resources.iter().try_for_each(Resource::validate)?;

        for task in &self.tasks {
            if task.command.is_empty() {
                return Err(JobSpecError::MalformedJobSpec(
                    "task command must not be empty".into(),
                ));
            }

            if !self.resources.iter().any(|r| r.contains_slot(&task.slot)) {
                return Err(JobSpecError::MalformedJobSpec(format!(
                    "task references unknown slot `{slot}`",
                    slot = task.slot
                )));
            }
        }

        Ok(())
    }
}

impl FromStr for JobSpec {
    type Err = JobSpecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
