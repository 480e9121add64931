// ---------------------------------------------------------------------------
// SessionLoader
// ---------------------------------------------------------------------------

/// Where the initial knowledge-base fetch stands for the active user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        user_id: String,
    },
    Loaded {
        user_id: String,
    },
}

/// Gate for the once-per-user initial fetch.
///
/// The invariant: fetch once per user session, refetch when the user
/// changes, and allow a retry after a failed attempt. Duplicate calls while
/// a fetch for the same user is in flight or already complete are refused.
#[derive(Debug, Clone, Default)]
pub struct SessionLoader {
    state: LoadState,
}

impl SessionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask to start a fetch for `user_id`. Returns true when the caller
    /// should actually go to the network; on true the loader moves to
    /// `Loading` for that user.
    pub fn begin(&mut self, user_id: &str) -> bool {
        match &self.state {
            LoadState::Loading { user_id: u } | LoadState::Loaded { user_id: u }
                if u == user_id =>
            {
                false
            }
            _ => {
                self.state = LoadState::Loading {
                    user_id: user_id.to_string(),
                };
                true
            }
        }
    }

    /// Record a successful fetch for `user_id`.
    pub fn complete(&mut self, user_id: &str) {
        self.state = LoadState::Loaded {
            user_id: user_id.to_string(),
        };
    }

    /// Record a failed fetch. Only resets when the failure belongs to the
    /// in-flight user, so a stale failure cannot clobber a newer load.
    pub fn fail(&mut self, user_id: &str) {
        if matches!(&self.state, LoadState::Loading { user_id: u } if u == user_id) {
            self.state = LoadState::Idle;
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
