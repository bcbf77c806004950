use fintrack_domain::{FinanceSnapshot, UserPatch, UserProfile};

pub struct UserService;

impl UserService {
    /// Merges `patch` into the profile and returns the updated copy.
    pub fn update(snapshot: &mut FinanceSnapshot, patch: UserPatch) -> UserProfile {
        patch.apply(&mut snapshot.user);
        snapshot.user.clone()
    }
}
