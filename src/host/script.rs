//! Script-command backed host calls.
//!
//! Some host operations are only reachable through the host's scripting
//! language. [`ScriptBuilder`] assembles those commands and
//! [`ScriptCommandExecutor`] runs them through any script runner closure.

use std::fmt::Write as _;

use crate::errors::Result;
use crate::host::{CommandExecutor, GroupId};
use crate::settings::{DEFAULT_SHADING_COMMAND, Settings};

/// Accumulates script statements.
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    script: String,
}

/// Quotes `s` as a script string literal.
fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

impl ScriptBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `procedure("texture");`
    pub fn create_shading_group(&mut self, procedure: &str, texture_name: &str) -> &mut Self {
        let _ = writeln!(self.script, "{procedure}({});", quoted(texture_name));
        self
    }

    /// `addAttr -e -enumName "a=1:b=2" node.attr;`
    ///
    /// An empty option list produces a single blank entry, which the host
    /// accepts where a truly empty enum string is rejected.
    pub fn set_enum_options(&mut self, node: &str, attribute: &str, options: &[(i16, &str)]) -> &mut Self {
        let enum_string = if options.is_empty() {
            " ".to_string()
        } else {
            options
                .iter()
                .map(|(i, name)| format!("{}={i}", name.replace([':', '='], "_")))
                .collect::<Vec<_>>()
                .join(":")
        };
        let _ = writeln!(
            self.script,
            "addAttr -e -enumName {} {node}.{attribute};",
            quoted(&enum_string)
        );
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.script
    }

    /// Returns the script and resets the builder.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.script)
    }
}

/// [`CommandExecutor`] that issues shading commands through a script runner.
///
/// The runner receives the full command text and returns the command's
/// string result (the created group name).
pub struct ScriptCommandExecutor<F>
where
    F: FnMut(&str) -> Result<String>,
{
    procedure: String,
    runner: F,
}

impl<F> ScriptCommandExecutor<F>
where
    F: FnMut(&str) -> Result<String>,
{
    pub fn new(runner: F) -> Self {
        Self::with_procedure(DEFAULT_SHADING_COMMAND, runner)
    }

    pub fn with_procedure(procedure: impl Into<String>, runner: F) -> Self {
        Self {
            procedure: procedure.into(),
            runner,
        }
    }

    /// Uses the shading procedure configured in `settings`.
    pub fn from_settings(settings: &Settings, runner: F) -> Self {
        Self::with_procedure(settings.shading_command.clone(), runner)
    }
}

impl<F> CommandExecutor for ScriptCommandExecutor<F>
where
    F: FnMut(&str) -> Result<String>,
{
    fn create_shading_group(&mut self, texture_name: &str) -> Result<GroupId> {
        let mut builder = ScriptBuilder::new();
        builder.create_shading_group(&self.procedure, texture_name);
        let cmd = builder.take();
        let result = (self.runner)(cmd.trim_end())?;
        log::trace!("script cmd '{}' executed, result = '{result}'", cmd.trim_end());
        Ok(result)
    }
}
