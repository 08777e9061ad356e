use std::collections::{BTreeMap, HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, error};

use super::{Command, commands::ExampleCog};

/// A named group of commands compiled into the bot.
pub trait Cog: Send + Sync {
    fn name(&self) -> &'static str;
    fn commands(&self) -> Vec<Command>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CogError {
    #[error("command `{command}` is already registered by cog `{owner}`")]
    DuplicateCommand { command: String, owner: String },
    #[error("a cog with this name was already registered")]
    DuplicateCog,
    #[error("cog provides no commands")]
    Empty,
}

/// Outcome of loading every registered cog.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CogReport {
    pub loaded: Vec<&'static str>,
    pub errors: BTreeMap<&'static str, CogError>,
}

#[derive(Default)]
pub struct CogRegistry {
    cogs: Vec<Box<dyn Cog>>,
}

impl CogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every cog that ships with the bot.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.add(ExampleCog);
        registry
    }

    pub fn add(&mut self, cog: impl Cog + 'static) -> &mut Self {
        self.cogs.push(Box::new(cog));
        self
    }

    /// Collects the commands of every cog in registration order. A cog that
    /// clashes with one loaded before it is skipped whole.
    pub fn load(self) -> (Vec<Command>, CogReport) {
        let mut commands = Vec::new();
        let mut report = CogReport::default();
        // lowercase command name -> owning cog
        let mut owners: HashMap<String, &'static str> = HashMap::new();
        let mut cog_names: HashSet<&'static str> = HashSet::new();

        for cog in self.cogs {
            let name = cog.name();
            if !cog_names.insert(name) {
                error!("Failed to load cog {}: duplicate cog name", name);
                report.errors.entry(name).or_insert(CogError::DuplicateCog);
                continue;
            }

            let cog_commands = cog.commands();
            if cog_commands.is_empty() {
                error!("Failed to load cog {}: no commands", name);
                report.errors.insert(name, CogError::Empty);
                continue;
            }

            let mut seen: HashMap<String, &'static str> = HashMap::new();
            let clash = cog_commands.iter().find_map(|cmd| {
                let key = cmd.name.to_lowercase();
                if let Some(owner) = owners.get(&key).or_else(|| seen.get(&key)) {
                    return Some(CogError::DuplicateCommand {
                        command: cmd.name.clone(),
                        owner: (*owner).to_owned(),
                    });
                }
                seen.insert(key, name);
                None
            });

            if let Some(e) = clash {
                error!("Failed to load cog {}: {}", name, e);
                report.errors.insert(name, e);
                continue;
            }

            debug!("Loaded cog {} ({} commands)", name, cog_commands.len());
            owners.extend(seen);
            commands.extend(cog_commands);
            report.loaded.push(name);
        }

        (commands, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::commands::hello;

    struct NamedCog {
        name: &'static str,
        commands: &'static [&'static str],
    }

    impl Cog for NamedCog {
        fn name(&self) -> &'static str {
            self.name
        }

        fn commands(&self) -> Vec<Command> {
            self.commands
                .iter()
                .map(|name| {
                    let mut cmd = hello();
                    cmd.name = (*name).to_owned();
                    cmd
                })
                .collect()
        }
    }

    fn cog(name: &'static str, commands: &'static [&'static str]) -> NamedCog {
        NamedCog { name, commands }
    }

    fn names(commands: &[Command]) -> Vec<&str> {
        commands.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn defaults_load_example_cog() {
        let (commands, report) = CogRegistry::with_defaults().load();
        assert_eq!(names(&commands), ["hello"]);
        assert_eq!(report.loaded, ["example"]);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn keeps_registration_order() {
        let mut registry = CogRegistry::new();
        registry
            .add(cog("b", &["two", "three"]))
            .add(cog("a", &["one"]));

        let (commands, report) = registry.load();
        assert_eq!(names(&commands), ["two", "three", "one"]);
        assert_eq!(report.loaded, ["b", "a"]);
    }

    #[test]
    fn rejects_cog_with_clashing_command() {
        let mut registry = CogRegistry::new();
        registry
            .add(cog("first", &["ping"]))
            .add(cog("second", &["pong", "PING"]))
            .add(cog("third", &["pong"]));

        let (commands, report) = registry.load();
        assert_eq!(names(&commands), ["ping", "pong"]);
        assert_eq!(report.loaded, ["first", "third"]);
        assert_eq!(
            report.errors.get("second"),
            Some(&CogError::DuplicateCommand {
                command: "PING".to_owned(),
                owner: "first".to_owned(),
            })
        );
    }

    #[test]
    fn rejects_command_repeated_within_a_cog() {
        let mut registry = CogRegistry::new();
        registry.add(cog("twice", &["echo", "echo"]));

        let (commands, report) = registry.load();
        assert!(commands.is_empty());
        assert!(matches!(
            report.errors.get("twice"),
            Some(CogError::DuplicateCommand { owner, .. }) if owner == "twice"
        ));
    }

    #[test]
    fn rejects_duplicate_and_empty_cogs() {
        let mut registry = CogRegistry::new();
        registry
            .add(cog("example", &["a"]))
            .add(cog("example", &["b"]))
            .add(cog("hollow", &[]));

        let (commands, report) = registry.load();
        assert_eq!(names(&commands), ["a"]);
        assert_eq!(report.errors.get("example"), Some(&CogError::DuplicateCog));
        assert_eq!(report.errors.get("hollow"), Some(&CogError::Empty));
    }

    #[test]
    fn name_of_failed_cog_stays_taken() {
        let mut registry = CogRegistry::new();
        registry
            .add(cog("x", &[]))
            .add(cog("x", &["later"]));

        let (commands, report) = registry.load();
        assert!(commands.is_empty());
        assert!(report.loaded.is_empty());
        assert_eq!(report.errors.get("x"), Some(&CogError::Empty));
    }
}
