/// Proof that the evaluator decided to revoke a collaborator's access.
/// Only `enforcement::evaluate` mints one, and removal consumes it.
#[derive(Debug)]
pub struct RevocationToken(Seal);

impl RevocationToken {
    pub(super) fn new() -> Self {
        Self(Seal)
    }
}

/// Private field type: keeps `RevocationToken(..)` unconstructible elsewhere.
/// No `Clone`: one token backs exactly one removal call.
#[derive(Debug)]
struct Seal;
