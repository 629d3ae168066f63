use clap::Command;
use serde_json::json;

/// Machine-readable description of the CLI surface, for front ends that
/// drive the executable over stdio.
pub fn describe_cli_api(cmd: &Command) -> serde_json::Value {
    json!({
        "name": cmd.get_name(),
        "about": cmd.get_about().map(|s| s.to_string()),
        "version": cmd.get_version(),
        "args": cmd.get_arguments().map(|arg| {
            json!({
                "name": arg.get_id().as_str(),
                "long": arg.get_long(),
                "short": arg.get_short().map(|c| c.to_string()),
                "help": arg.get_help().map(|s| s.to_string()),
                "required": arg.is_required_set(),
            })
        }).collect::<Vec<_>>(),
        "subcommands": cmd.get_subcommands().map(describe_cli_api).collect::<Vec<_>>(),
    })
}
