use std::{fs, path::Path, process::Stdio};

use tracing::{error, info};

use crate::{
    code_gen::{
        capacitor::GenCapacitor, cypress::GenCypress, gen_iface::CodeGenTrait, ionic::GenIonic,
        jest::GenJest, lint::GenLint, project::ProjectDefinition, react::GenReact,
    },
    hooks::iface::{Hook, HookContext, HookListExt as _, HookType},
    models::{
        config::Config,
        file_set::FileSet,
        options::{ApplicationOptions, NormalizedOptions},
        workspace::Workspace,
    },
    utils::{
        errors::{EmptyResult, ResultTrait as _, ResultWithError},
        shlex::ShlexUtils,
    },
};

/// How generated files reach the workspace.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteMode {
    /// List the files without writing anything
    pub dry_run: bool,
    /// Replace an existing project without asking
    pub overwrite: bool,
}

/// Asks whether an existing project may be replaced.
type ConfirmFn = fn(&str) -> ResultWithError<bool>;

/// Main controller to run the code generation logic.
pub struct CodeGen<'a> {
    config: &'a Config,
    hooks: &'a [Box<dyn Hook>],
    confirm: ConfirmFn,
}

impl<'a> CodeGen<'a> {
    pub fn new(config: &'a Config, hooks: &'a [Box<dyn Hook>]) -> Self {
        Self {
            config,
            hooks,
            confirm: Self::prompt_overwrite,
        }
    }

    #[cfg(test)]
    fn with_confirm(mut self, confirm: ConfirmFn) -> Self {
        self.confirm = confirm;
        self
    }

    fn get_generators() -> Vec<Box<dyn CodeGenTrait>> {
        vec![
            Box::new(GenReact),
            Box::new(GenIonic),
            Box::new(GenLint),
            Box::new(GenJest),
            Box::new(GenCypress),
            Box::new(GenCapacitor),
        ]
    }

    /// The complete file set for `options`. Identical options always give
    /// identical files.
    pub fn generate(options: &NormalizedOptions) -> ResultWithError<FileSet> {
        let mut files = FileSet::new();
        for generator in Self::get_generators()
            .into_iter()
            .filter(|generator| generator.applies(options))
        {
            generator
                .run(options, &mut files)
                .auto_err(format!("Generator {} failed", generator.name()))?;
        }
        Ok(files)
    }

    /// Normalizes `options`, then writes and registers the project in the
    /// workspace held by `ctx`.
    pub fn execute(
        &self,
        ctx: &HookContext,
        options: &ApplicationOptions,
        mode: WriteMode,
    ) -> ResultWithError<NormalizedOptions> {
        let normalized = options.normalize(&self.config.workspace.apps_dir)?;
        info!(
            "Code generation started for {} in {}",
            normalized.project_name, normalized.project_root
        );

        let files = Self::generate(&normalized)?;
        if files.is_empty() {
            return Err(format!("No files generated for {}", normalized.project_name).into());
        }
        if mode.dry_run {
            for path in files.paths() {
                let size = files.get(path).map_or(0, |content| content.as_bytes().len());
                println!("CREATE {path} ({size} bytes)");
            }
            info!("Dry run, {} files not written", files.len());
            return Ok(normalized);
        }

        let root = ctx.workspace_root()?;
        let workspace = Workspace::open(&root)?;
        self.check_conflicts(&workspace, &normalized, mode.overwrite)?;

        files.write_to(&root)?;
        workspace.register(&ProjectDefinition::registrations(&normalized))?;
        info!("✅ Wrote {} files", files.len());

        if !normalized.options.skip_format {
            self.run_formatter(&root, &normalized);
        }

        self.hooks
            .run_hooks_of_type(ctx, HookType::AfterGenerate, false)?;

        info!("Code generation finished");
        Ok(normalized)
    }

    fn check_conflicts(
        &self,
        workspace: &Workspace,
        options: &NormalizedOptions,
        overwrite: bool,
    ) -> EmptyResult {
        let mut existing = Vec::new();
        for (name, root) in Self::project_roots(options) {
            if workspace.project_exists(name)? || workspace.root().join(root).exists() {
                existing.push((name, root));
            }
        }
        if existing.is_empty() {
            return Ok(());
        }

        let names = existing
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ");
        if !overwrite
            && !(self.confirm)(&format!("Project {names} already exists. Overwrite it?"))?
        {
            error!("Generation cancelled, {} already exists", names);
            return Err(format!("Project {names} already exists, pass --yes to overwrite").into());
        }

        info!("Overwriting {}", names);
        for (_, root) in existing {
            let path = workspace.root().join(root);
            if path.exists() {
                fs::remove_dir_all(&path)
                    .auto_err(format!("Could not remove {}", path.display()))?;
            }
        }
        Ok(())
    }

    fn prompt_overwrite(question: &str) -> ResultWithError<bool> {
        let res = inquire::Select::new(question, vec!["Yes", "No"])
            .prompt()
            .auto_err("Could not ask for confirmation, pass --yes to overwrite")?;
        Ok(res == "Yes")
    }

    fn project_roots(options: &NormalizedOptions) -> Vec<(&str, &str)> {
        let mut roots = vec![(options.project_name.as_str(), options.project_root.as_str())];
        if options.has_cypress() {
            roots.push((
                options.e2e_project_name.as_str(),
                options.e2e_root.as_str(),
            ));
        }
        roots
    }

    /// Formatting is best effort, a missing formatter never fails generation.
    fn run_formatter(&self, root: &Path, options: &NormalizedOptions) {
        let Some(formatter) = &self.config.runner.formatter else {
            return;
        };
        let roots: Vec<_> = Self::project_roots(options)
            .into_iter()
            .map(|(_, root)| root)
            .collect();
        info!("Running {} on {}", formatter, roots.join(" "));

        let mut cmd = match ShlexUtils::parse_command(formatter) {
            Ok(cmd) => cmd,
            Err(e) => {
                error!("❌ Invalid formatter command: {}", e);
                return;
            }
        };
        let status = cmd
            .args(&roots)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status();

        match status {
            Ok(s) if s.success() => info!("✅ Formatting completed successfully."),
            Ok(s) => error!("❌ Formatting failed with status: {}", s),
            Err(e) => error!("❌ Failed to run formatter: {}", e),
        }
    }
}
