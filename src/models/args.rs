use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::options::{ApplicationOptions, E2eTestRunner, Linter, Style, UnitTestRunner};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "appforge",
    version,
    about = "Scaffold Ionic React applications into an Nx workspace and verify them.",
    long_about = r#"
appforge generates a mobile-capable Ionic React application, together with its
Cypress e2e project, into an Nx workspace. The generated file set depends only
on the project name and options, so the same request always yields the same
files.

It also carries the verification harness for the generator: every generated
project is checked for the expected files and then built, linted, unit-tested
and e2e-tested through the workspace task runner.

Common use cases include:
  • Generating an application: appforge gen my-app --style scss
  • Verifying an existing project: appforge verify my-app --style scss
  • Running the full option matrix in a scratch workspace: appforge suite
  • Exporting JSON Schemas for the options and config files: appforge schema
"#
)]
pub struct AppArgs {
    /// Workspace root, defaults to the current directory
    #[arg(short = 'C', long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging when RUST_LOG is not set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate an application and its e2e project
    Gen {
        #[command(flatten)]
        options: OptionArgs,

        /// Print the files that would be written without touching the workspace
        #[arg(long)]
        dry_run: bool,

        /// Overwrite an existing project without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Check the files of a generated project and run build, lint, test and e2e
    Verify {
        #[command(flatten)]
        options: OptionArgs,

        /// Only check generated files and workspace tags
        #[arg(long)]
        files_only: bool,
    },
    /// Generate and verify every scenario in a scratch workspace
    Suite {
        /// Scratch workspace directory
        #[arg(long, default_value = "tmp/appforge-e2e/proj")]
        workspace: PathBuf,

        /// Only run scenarios whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Generate and check files but do not run the task runner
        #[arg(long)]
        generate_only: bool,

        /// Write a JSON report of all scenario results
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Write JSON Schemas for the options, config and scenario formats
    Schema {
        /// Output directory
        #[arg(long, default_value = "schemas")]
        out: PathBuf,
    },
}

/// Generator options as command line flags.
///
/// Boolean flags accept both `--js` and `--js false`.
#[derive(Args, Debug, Clone)]
pub struct OptionArgs {
    /// Name of the application
    pub name: String,

    #[arg(long, value_enum, default_value_t = Style::Css)]
    pub style: Style,

    #[arg(long, value_enum, default_value_t = UnitTestRunner::Jest)]
    pub unit_test_runner: UnitTestRunner,

    #[arg(long, value_enum, default_value_t = E2eTestRunner::Cypress)]
    pub e2e_test_runner: E2eTestRunner,

    #[arg(long, value_enum, default_value_t = Linter::Eslint)]
    pub linter: Linter,

    /// Generate JavaScript instead of TypeScript
    #[arg(long, num_args = 0..=1, default_value_t = false, default_missing_value = "true")]
    pub js: bool,

    /// Add Capacitor native-shell integration
    #[arg(long, num_args = 0..=1, default_value_t = false, default_missing_value = "true")]
    pub capacitor: bool,

    /// Skip formatting the generated files
    #[arg(long, num_args = 0..=1, default_value_t = false, default_missing_value = "true")]
    pub skip_format: bool,

    /// Subdirectory of the apps directory to place the project in
    #[arg(long)]
    pub directory: Option<String>,

    /// Comma-separated tags to record in nx.json
    #[arg(long)]
    pub tags: Option<String>,

    /// Use PascalCase file names
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub pascal_case_files: Option<bool>,

    /// Generate class components instead of function components
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub class_component: Option<bool>,
}

impl From<OptionArgs> for ApplicationOptions {
    fn from(args: OptionArgs) -> Self {
        Self {
            name: args.name,
            style: args.style,
            unit_test_runner: args.unit_test_runner,
            e2e_test_runner: args.e2e_test_runner,
            linter: args.linter,
            js: args.js,
            capacitor: args.capacitor,
            skip_format: args.skip_format,
            directory: args.directory,
            tags: args.tags,
            pascal_case_files: args.pascal_case_files,
            class_component: args.class_component,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gen_options(argv: &[&str]) -> ApplicationOptions {
        let args = AppArgs::try_parse_from(argv).unwrap();
        match args.command {
            Command::Gen { options, .. } => options.into(),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_explicit_flag_values() {
        let options = gen_options(&[
            "appforge",
            "gen",
            "ionic-react1",
            "--style",
            "@emotion/styled",
            "--unit-test-runner",
            "none",
            "--linter",
            "eslint",
            "--js",
            "false",
            "--capacitor",
            "true",
            "--pascal-case-files",
            "true",
        ]);

        assert_eq!(options.name, "ionic-react1");
        assert_eq!(options.style, Style::EmotionStyled);
        assert_eq!(options.unit_test_runner, UnitTestRunner::None);
        assert!(!options.js);
        assert!(options.capacitor);
        assert_eq!(options.pascal_case_files, Some(true));
        assert_eq!(options.class_component, None);
    }

    #[test]
    fn bare_boolean_flags_mean_true() {
        let options = gen_options(&["appforge", "gen", "demo", "--js", "--class-component"]);
        assert!(options.js);
        assert_eq!(options.class_component, Some(true));
        assert_eq!(options.style, Style::Css);
    }

    #[test]
    fn suite_has_scratch_workspace_default() {
        let args = AppArgs::try_parse_from(["appforge", "suite", "--filter", "style"]).unwrap();
        match args.command {
            Command::Suite {
                workspace, filter, ..
            } => {
                assert_eq!(workspace, PathBuf::from("tmp/appforge-e2e/proj"));
                assert_eq!(filter.as_deref(), Some("style"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
