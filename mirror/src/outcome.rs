use rp_error::Result;

/// Which halves of a two-phase schema operation took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncState {
    local_applied: bool,
    remote_applied: bool,
}

impl SyncState {
    pub fn new(local_applied: &bool, remote_applied: &bool) -> Self {
        Self {
            local_applied: *local_applied,
            remote_applied: *remote_applied,
        }
    }

    pub fn untouched() -> Self {
        Self::default()
    }

    pub fn applied() -> Self {
        Self::new(&true, &true)
    }

    pub fn local_applied(&self) -> &bool {
        &self.local_applied
    }

    pub fn remote_applied(&self) -> &bool {
        &self.remote_applied
    }

    /// Exactly one side changed, so descriptor and backend now disagree.
    pub fn is_drifted(&self) -> bool {
        self.local_applied != self.remote_applied
    }
}

/// Result of a two-phase operation together with the phases it got through.
///
/// No phase is ever rolled back, so a failed result may still carry a state
/// where one side was applied.
#[derive(Debug)]
pub struct Synced<T> {
    state: SyncState,
    result: Result<T>,
}

impl<T> Synced<T> {
    pub fn new(state: SyncState, result: Result<T>) -> Self {
        Self { state, result }
    }

    pub fn untouched(result: Result<T>) -> Self {
        Self::new(SyncState::untouched(), result)
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn result(&self) -> &Result<T> {
        &self.result
    }

    pub fn into_parts(self) -> (SyncState, Result<T>) {
        (self.state, self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::SyncState;

    #[test]
    fn drift_means_one_side_only() {
        assert!(!SyncState::untouched().is_drifted());
        assert!(!SyncState::applied().is_drifted());
        assert!(SyncState::new(&true, &false).is_drifted());
        assert!(SyncState::new(&false, &true).is_drifted());
    }
}
