//! # Service specification.
//!
//! Defines [`ServiceSpec`] — the immutable description of one supervised
//! service: the command to launch, how to recognise that it is ready, and
//! which other services must be running first.
//!
//! A spec is registered once, before [`Supervisor::init`](crate::Supervisor::init),
//! and never mutated afterwards; runners share it by reference.

use regex::Regex;

/// # Immutable description of one supervised service.
///
/// Bundles together:
/// - the service name (opaque identifier, string equality)
/// - the command and its arguments
/// - an optional readiness pattern matched against stdout lines
/// - the names of required services
///
/// ## Readiness
/// With a pattern, the service counts as running the first time a stdout
/// line matches. Without one, it counts as running right after a successful
/// spawn.
///
/// ## Example
/// ```rust
/// use depvisor::ServiceSpec;
/// use regex::Regex;
///
/// let spec = ServiceSpec::new("api", "./api-server")
///     .with_args(["--port", "8080"])
///     .with_running_pattern(Regex::new("listening").unwrap())
///     .with_requirements(["db", "cache"]);
///
/// assert_eq!(spec.name(), "api");
/// assert_eq!(spec.requirements(), ["db", "cache"]);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    /// Unique service name.
    name: String,
    /// Program to execute.
    command: String,
    /// Arguments passed to the program, in order.
    args: Vec<String>,
    /// Readiness pattern; `None` means ready-on-spawn.
    running_pattern: Option<Regex>,
    /// Services that must be running before this one starts.
    requirements: Vec<String>,
}

impl ServiceSpec {
    /// Creates a spec with no arguments, no pattern, and no requirements.
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            running_pattern: None,
            requirements: Vec::new(),
        }
    }

    /// Sets the command arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the readiness pattern matched against stdout lines.
    pub fn with_running_pattern(mut self, pattern: Regex) -> Self {
        self.running_pattern = Some(pattern);
        self
    }

    /// Sets the required services.
    pub fn with_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the service name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the program to execute.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the command arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the readiness pattern, if configured.
    pub fn running_pattern(&self) -> Option<&Regex> {
        self.running_pattern.as_ref()
    }

    /// Returns the names of required services.
    pub fn requirements(&self) -> &[String] {
        &self.requirements
    }
}
