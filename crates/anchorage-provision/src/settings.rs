use anchorage_core::model::{IndexBuildParams, DEFAULT_MACHINE_TYPE};

use crate::config::{Config, ReusePolicy};
use crate::operation::OperationWaiter;

/// Knobs shared by the provisioners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSettings {
    pub waiter: OperationWaiter,
    pub build_params: IndexBuildParams,
    pub machine_type: String,
    pub reuse_policy: ReusePolicy,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            waiter: OperationWaiter::default(),
            build_params: IndexBuildParams::default(),
            machine_type: DEFAULT_MACHINE_TYPE.to_string(),
            reuse_policy: ReusePolicy::default(),
        }
    }
}

impl ProvisionSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            waiter: OperationWaiter::from_config(config),
            build_params: IndexBuildParams::default(),
            machine_type: config.machine_type.clone(),
            reuse_policy: config.reuse_policy,
        }
    }

    #[must_use]
    pub fn with_waiter(mut self, waiter: OperationWaiter) -> Self {
        self.waiter = waiter;
        self
    }

    #[must_use]
    pub fn with_reuse_policy(mut self, policy: ReusePolicy) -> Self {
        self.reuse_policy = policy;
        self
    }
}
