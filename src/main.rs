use clap::Parser as _;
use tracing::info;

use crate::{
    code_gen::code_gen::{CodeGen, WriteMode},
    code_run::{
        run::CodeRun,
        suite::{Suite, SuiteOptions},
    },
    hooks::iface::HookContext,
    models::{
        app_state::AppState,
        args::{AppArgs, Command},
        config::Config,
        options::ApplicationOptions,
    },
    schemas::schema_gen::SchemaGen,
    utils::{dir::DirUtils, errors::EmptyResult, logger::LoggerUtils},
};

mod code_gen;
mod code_run;
mod hooks;
#[cfg(target_os = "linux")]
mod linux;
mod models;
mod schemas;
mod utils;

fn main() -> EmptyResult {
    let args = AppArgs::parse();

    LoggerUtils::init(args.verbose);

    let version = env!("CARGO_PKG_VERSION");
    info!("🔧 appforge, Version: {version}");

    #[cfg(target_os = "linux")]
    {
        use crate::utils::command::CommandUtils;
        CommandUtils::set_death_signal();
    }

    let cwd = match &args.cwd {
        Some(dir) => DirUtils::resolve(dir)?,
        None => DirUtils::curr_dir()?,
    };
    let config = Config::from_dir(&cwd)?;
    let hooks = hooks::load_hooks(&config);
    let state = AppState {
        workspace_root: cwd.clone(),
        ..Default::default()
    };

    match &args.command {
        Command::Gen {
            options,
            dry_run,
            yes,
        } => {
            let ctx = HookContext::new(&args, &config, state);
            let options: ApplicationOptions = options.clone().into();
            CodeGen::new(&config, &hooks).execute(
                &ctx,
                &options,
                WriteMode {
                    dry_run: *dry_run,
                    overwrite: *yes,
                },
            )?;
        }
        Command::Verify {
            options,
            files_only,
        } => {
            let ctx = HookContext::new(&args, &config, state);
            let options: ApplicationOptions = options.clone().into();
            CodeRun::new(&config, &hooks).execute(&ctx, &options, *files_only)?;
        }
        Command::Suite {
            workspace,
            filter,
            generate_only,
            report,
        } => {
            let options = SuiteOptions {
                workspace: cwd.join(workspace),
                filter: filter.clone(),
                generate_only: *generate_only,
                report: report.as_ref().map(|path| cwd.join(path)),
            };
            Suite::new(&args, &config, &hooks).execute(&cwd, &options)?;
        }
        Command::Schema { out } => {
            SchemaGen::new(cwd.join(out)).execute()?;
        }
    }

    Ok(())
}
