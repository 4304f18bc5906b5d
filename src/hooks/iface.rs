use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{
    path::PathBuf,
    sync::{Arc, RwLock},
};

use crate::{
    models::{
        app_state::{AppState, ScenarioResult},
        args::AppArgs,
        config::Config,
    },
    utils::errors::{EmptyResult, ResultTrait, ResultWithError},
};

/// Defines the types of hooks available in the system.
/// VerifySystem: For verifying system prerequisites and dependencies.
/// BeforeAll: Runs once before any project is generated or verified.
/// AfterGenerate: Runs after files were written and registered.
/// AfterAll: Runs once at the end, even when something failed.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HookType {
    VerifySystem,
    BeforeAll,
    AfterGenerate,
    AfterAll,
}

impl HookType {
    pub fn pre_hooks() -> Vec<HookType> {
        vec![Self::VerifySystem, Self::BeforeAll]
    }

    pub fn post_hooks() -> Vec<HookType> {
        vec![Self::AfterAll]
    }
}

/// Context passed to all hooks during execution providing access to CLI args,
/// configuration, and shared mutable application state.
pub struct HookContext<'a> {
    pub args: &'a AppArgs,
    pub config: &'a Config,
    pub state: Arc<RwLock<AppState>>,
}

impl<'a> HookContext<'a> {
    pub fn new(args: &'a AppArgs, config: &'a Config, state: AppState) -> Self {
        Self {
            args,
            config,
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn read_state(&self) -> ResultWithError<std::sync::RwLockReadGuard<'_, AppState>> {
        self.state
            .read()
            .auto_err("Failed to acquire read lock for state")
    }

    pub fn workspace_root(&self) -> ResultWithError<PathBuf> {
        Ok(self.read_state()?.workspace_root.clone())
    }

    pub fn record(&self, result: ScenarioResult) -> EmptyResult {
        let mut state = self
            .state
            .write()
            .auto_err("Failed to acquire write lock")?;
        state.results.scenarios.push(result);
        Ok(())
    }
}

/// Trait that all hook implementations must adhere to.
pub trait Hook {
    fn get_type(&self) -> HookType;

    /// Whether the hook still runs after an earlier failure.
    fn continue_on_error(&self) -> bool {
        false
    }

    fn run(&self, ctx: &HookContext) -> EmptyResult;
}

pub trait HookListExt {
    fn hooks_of_type(&self, hook_type: HookType) -> Vec<&dyn Hook>;

    /// Runs every hook of `hook_type`, skipping those that do not continue
    /// on error when `has_error` is set.
    fn run_hooks_of_type(
        &self,
        ctx: &HookContext,
        hook_type: HookType,
        has_error: bool,
    ) -> EmptyResult {
        for hook in self.hooks_of_type(hook_type) {
            if hook.continue_on_error() || !has_error {
                hook.run(ctx)?;
            }
        }
        Ok(())
    }
}

impl HookListExt for [Box<dyn Hook>] {
    fn hooks_of_type(&self, hook_type: HookType) -> Vec<&dyn Hook> {
        self.iter()
            .filter(|hook| hook.get_type() == hook_type)
            .map(|hook| hook.as_ref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting<'a> {
        hook_type: HookType,
        continue_on_error: bool,
        calls: &'a AtomicUsize,
    }

    impl Hook for Counting<'_> {
        fn get_type(&self) -> HookType {
            self.hook_type
        }

        fn continue_on_error(&self) -> bool {
            self.continue_on_error
        }

        fn run(&self, _ctx: &HookContext) -> EmptyResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn only_continuing_hooks_run_after_errors() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let hooks: Vec<Box<dyn Hook>> = vec![
            Box::new(Counting {
                hook_type: HookType::AfterAll,
                continue_on_error: true,
                calls: &CALLS,
            }),
            Box::new(Counting {
                hook_type: HookType::AfterAll,
                continue_on_error: false,
                calls: &CALLS,
            }),
            Box::new(Counting {
                hook_type: HookType::BeforeAll,
                continue_on_error: true,
                calls: &CALLS,
            }),
        ];

        let args = AppArgs::parse_from(["appforge", "schema"]);
        let config = Config::default();
        let ctx = HookContext::new(&args, &config, AppState::default());

        hooks.run_hooks_of_type(&ctx, HookType::AfterAll, true).unwrap();
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);

        hooks.run_hooks_of_type(&ctx, HookType::AfterAll, false).unwrap();
        assert_eq!(CALLS.load(Ordering::SeqCst), 3);
    }
}
