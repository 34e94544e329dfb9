//! Helper types and functions for the edgefed command line executables.

pub mod messages;

/// Command tree dumped as JSON to document a binary.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandTree {
    /// Name of the command.
    pub name: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    /// Long flags and positional arguments, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Subcommands.
    pub commands: Vec<CommandTree>,
}

impl From<&clap::Command> for CommandTree {
    fn from(value: &clap::Command) -> Self {
        let args = value
            .get_arguments()
            .filter(|a| !matches!(a.get_id().as_str(), "help" | "version"))
            .map(|a| match a.get_long() {
                Some(long) => format!("--{}", long),
                None => a.get_id().to_string(),
            })
            .collect();
        CommandTree {
            name: value.get_name().to_string(),
            about: value.get_about().map(|s| s.to_string()),
            args,
            commands: value.get_subcommands().map(|c| c.into()).collect(),
        }
    }
}
