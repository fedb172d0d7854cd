use crate::errors::{ErrorCode, Result};
use crate::types::CallerId;

/// The two identities allowed to mutate component state.
///
/// The swap controller drives the hot path (pushes, notifications).
/// Governance configures, pauses and rotates the swap controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AccessControl {
    pub swap_controller: CallerId,
    pub governance: CallerId,
}

impl AccessControl {
    pub fn new(swap_controller: CallerId, governance: CallerId) -> Self {
        Self {
            swap_controller,
            governance,
        }
    }

    pub fn is_swap_controller(&self, caller: &CallerId) -> bool {
        self.swap_controller.eq(caller)
    }

    pub fn is_governance(&self, caller: &CallerId) -> bool {
        self.governance.eq(caller)
    }

    pub fn require_swap_controller(&self, caller: &CallerId) -> Result<()> {
        if !self.is_swap_controller(caller) {
            return Err(ErrorCode::Unauthorized);
        }
        Ok(())
    }

    pub fn require_governance(&self, caller: &CallerId) -> Result<()> {
        if !self.is_governance(caller) {
            return Err(ErrorCode::Unauthorized);
        }
        Ok(())
    }

    /// Setup calls (enable, initialize) may come from either identity.
    pub fn require_swap_controller_or_governance(&self, caller: &CallerId) -> Result<()> {
        if !self.is_swap_controller(caller) && !self.is_governance(caller) {
            return Err(ErrorCode::Unauthorized);
        }
        Ok(())
    }

    pub fn rotate_swap_controller(&mut self, caller: &CallerId, new_swap_controller: CallerId) -> Result<()> {
        self.require_governance(caller)?;
        self.swap_controller = new_swap_controller;
        Ok(())
    }
}
