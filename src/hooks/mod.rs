pub mod check_dependency;
pub mod custom;
pub mod iface;

use crate::{
    hooks::{check_dependency::HookCheckDependency, custom::HookCustom, iface::Hook},
    models::config::Config,
};

/// Built-in hooks followed by the ones declared in the config.
pub fn load_hooks(config: &Config) -> Vec<Box<dyn Hook>> {
    let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(HookCheckDependency::new())];

    hooks.extend(
        config
            .hooks
            .iter()
            .map(|hook| Box::new(HookCustom::new(hook.clone())) as Box<dyn Hook>),
    );

    hooks
}
