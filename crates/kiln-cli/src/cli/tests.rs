#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Task};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_task_is_help() {
        let cli = Cli::try_parse_from(["kiln"]).unwrap();
        assert_eq!(cli.task, Task::Help);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parses_every_task_name() {
        for task in Task::all() {
            let cli = Cli::try_parse_from(["kiln", task.name()]).unwrap();
            assert_eq!(cli.task, *task);
        }
    }

    #[test]
    fn test_unknown_task_is_rejected() {
        assert!(Cli::try_parse_from(["kiln", "deploy"]).is_err());
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from([
            "kiln",
            "build",
            "-v",
            "--no-color",
            "--config",
            "site/kiln.toml",
            "--cwd",
            "site",
        ])
        .unwrap();

        assert_eq!(cli.task, Task::Build);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("site/kiln.toml")));
        assert_eq!(cli.cwd, Some(PathBuf::from("site")));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["kiln", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_build_tasks_map_to_targets() {
        assert_eq!(Task::Build.target(), Some("build"));
        assert_eq!(Task::BuildCssDevelopment.target(), Some("build-css-development"));
        assert_eq!(Task::Watch.target(), None);
        assert_eq!(Task::Help.target(), None);

        for task in Task::all() {
            if let Some(target) = task.target() {
                assert_eq!(target, task.name());
            }
        }
    }
}
