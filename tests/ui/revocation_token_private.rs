// Revocation tokens can only come from the policy evaluator.

use collab_sentry::enforcement::capability::RevocationToken;

fn main() {
    let _token = RevocationToken::new();
}
