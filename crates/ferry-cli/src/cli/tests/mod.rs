use super::*;


fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

fn parse_command(args: &[&str]) -> CliCommand {
    parse(args).command
}

#[test]
fn cli_parse_quiet_is_global() {
    let cli = parse(&["ferry", "fetch", "arrets", "--quiet"]);
    assert!(cli.quiet);
    let cli = parse(&["ferry", "-q", "fetch", "arrets"]);
    assert!(cli.quiet);
    let cli = parse(&["ferry", "fetch", "arrets"]);
    assert!(!cli.quiet);
}

#[test]
fn cli_parse_requires_subcommand() {
    assert!(Cli::try_parse_from(["ferry"]).is_err());
    assert!(Cli::try_parse_from(["ferry", "sync"]).is_err());
}
