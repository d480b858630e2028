/// Configuration for a [`Subject`](crate::Subject).
///
/// Use the builder methods to customize, or [`Default`] for sensible defaults.
///
/// # Examples
///
/// ```rust
/// use typebus::Config;
///
/// let config = Config::default()
///     .with_name("ui-events")         // Shows up in log fields
///     .with_initial_capacity(32)      // Preallocate the subscriber list
///     .with_max_publish_depth(16);    // Limit publish-from-inside-a-sink nesting
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Name of the subject, attached to every log event it emits.
    /// Default: "subject"
    name: String,

    /// Number of subscribers the registry preallocates room for.
    /// Default: 8
    initial_capacity: usize,

    /// How many `publish` calls may be nested inside delivery callbacks
    /// before the innermost one is refused.
    /// Default: 64
    max_publish_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            name: "subject".to_string(),
            initial_capacity: 8,
            max_publish_depth: 64,
        }
    }
}

impl Config {
    /// Set the subject name used in log fields.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the subject name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set how many subscribers the registry preallocates room for.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Returns the initial registry capacity.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Set the maximum nesting of `publish` calls.
    ///
    /// A publish issued from inside a delivery callback counts as one level
    /// deeper than the publish that invoked the callback. The top-level call
    /// is depth 1, so a limit of 1 forbids publishing from inside sinks.
    /// A limit of 0 refuses every publish.
    pub fn with_max_publish_depth(mut self, depth: usize) -> Self {
        self.max_publish_depth = depth;
        self
    }

    /// Returns the maximum nesting of `publish` calls.
    pub fn max_publish_depth(&self) -> usize {
        self.max_publish_depth
    }
}
