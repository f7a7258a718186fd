//! Registry configuration

/// What to do when a renderer is installed on an already live registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReinstallPolicy {
    /// Fail with [`RegistryError::AlreadyInstalled`](super::RegistryError::AlreadyInstalled)
    #[default]
    Reject,
    /// Keep the first renderer and drop the new one
    Ignore,
    /// Swap in the new renderer; earlier mappings are not redelivered
    Replace,
}

/// Registry configuration options
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Behavior of a second `install`
    pub reinstall_policy: ReinstallPolicy,

    /// Capacity reserved for mappings buffered before a renderer installs
    pub initial_buffer_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reinstall_policy: ReinstallPolicy::Reject,
            initial_buffer_capacity: 16,
        }
    }
}

impl RegistryConfig {
    /// Set the reinstall policy
    pub fn reinstall_policy(mut self, policy: ReinstallPolicy) -> Self {
        self.reinstall_policy = policy;
        self
    }

    /// Set the initial buffer capacity
    pub fn initial_buffer_capacity(mut self, capacity: usize) -> Self {
        self.initial_buffer_capacity = capacity;
        self
    }
}
