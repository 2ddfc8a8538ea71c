//! Mapping of jobspecs to resource manager arguments.
//!
//! Each backend declares an ordered table of [`ArgMapping`]s. Every mapping
//! reads the jobspec and either produces an [`Argument`] or `None` when it
//! does not apply to the job. Adding a mapping to a backend means adding one
//! entry to its table.

use std::fmt;

use fluxboot_jobspec::JobSpec;
use tracing::trace;

use crate::Result;

/// Represents a single resource manager argument: a flag and its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument(Vec<String>);

impl Argument {
    /// Creates an argument from its words (e.g. `["-N", "2"]`).
    pub fn new<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Self(words.into_iter().map(Into::into).collect())
    }

    /// Gets the words of the argument.
    pub fn words(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// A function mapping a jobspec to an argument.
pub type MapFn = fn(&JobSpec) -> Result<Option<Argument>>;

/// A named argument mapping.
#[derive(Debug, Clone, Copy)]
pub struct ArgMapping {
    /// The name of the mapping, used for tracing.
    pub name: &'static str,
    /// The mapping function.
    pub map: MapFn,
}

impl ArgMapping {
    /// Creates a new argument mapping.
    pub const fn new(name: &'static str, map: MapFn) -> Self {
        Self { name, map }
    }
}

/// Invokes each mapping in order, collecting the arguments that apply.
pub fn collect_args(jobspec: &JobSpec, mappings: &[ArgMapping]) -> Result<Vec<Argument>> {
    let mut args = Vec::with_capacity(mappings.len());
    for mapping in mappings {
        match (mapping.map)(jobspec)? {
            Some(arg) => {
                trace!(mapping = mapping.name, %arg, "mapped argument");
                args.push(arg);
            }
            None => trace!(mapping = mapping.name, "mapping does not apply"),
        }
    }

    Ok(args)
}

#[cfg(test)]
mod test {
    use fluxboot_jobspec::JobSpecV1;
    use pretty_assertions::assert_eq;

    use super::*;

    fn tasks(jobspec: &JobSpec) -> Result<Option<Argument>> {
        Ok(Some(Argument::new([
            "-n".to_string(),
            jobspec.tasks().len().to_string(),
        ])))
    }

    fn never(_: &JobSpec) -> Result<Option<Argument>> {
        Ok(None)
    }

    fn cores(jobspec: &JobSpec) -> Result<Option<Argument>> {
        Ok(Some(Argument::new([format!(
            "--cores={}",
            jobspec.total_cores()?
        )])))
    }

    #[test]
    fn collects_in_order() {
        let jobspec = JobSpecV1::builder()
            .command(vec!["true".to_string()])
            .num_tasks(3)
            .build()
            .into_jobspec()
            .unwrap();
        let args = collect_args(
            &jobspec,
            &[
                ArgMapping::new("cores", cores),
                ArgMapping::new("never", never),
                ArgMapping::new("tasks", tasks),
            ],
        )
        .unwrap();
        assert_eq!(
            args.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ["--cores=3", "-n 1"]
        );
        assert!(collect_args(&jobspec, &[]).unwrap().is_empty());
    }
}
