use super::*;

#[test]
fn parses_run_without_flags() {
    let cli = Cli::try_parse_from(["advhouse", "run"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Run {
            project: None,
            dry_run: false
        }
    ));
}

#[test]
fn parses_run_with_project_filter() {
    let cli = Cli::try_parse_from(["advhouse", "run", "--project", "login2"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Run {
            project: Some(ref p),
            dry_run: false
        } if p == "login2"
    ));
}

#[test]
fn parses_run_dry_run() {
    let cli = Cli::try_parse_from(["advhouse", "run", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Run { dry_run: true, .. }
    ));
}

#[test]
fn parses_projects_command() {
    let cli = Cli::try_parse_from(["advhouse", "projects"]).unwrap();
    assert!(matches!(cli.command, Commands::Projects));
}

#[test]
fn missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["advhouse"]).is_err());
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(Cli::try_parse_from(["advhouse", "run", "--since", "2024-01-01"]).is_err());
}
