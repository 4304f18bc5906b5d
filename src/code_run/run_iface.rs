use std::path::Path;

use crate::{
    models::{app_state::StageResult, options::NormalizedOptions, scenario::StageKind},
    utils::execution::Deadline,
};

/// What a pipeline step needs to run against one generated project.
pub struct RunContext<'a> {
    pub root: &'a Path,
    pub runner: &'a str,
    pub options: &'a NormalizedOptions,
    pub deadline: &'a Deadline,
}

/// Trait that all verification steps must adhere to.
pub trait CodeRunTrait {
    fn stage(&self) -> StageKind;
    fn applies(&self, options: &NormalizedOptions) -> bool;
    fn run(&self, ctx: &RunContext) -> StageResult;
}
