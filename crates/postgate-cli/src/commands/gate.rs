use postgate_core::SessionGate;

use super::AppContext;

/// Run the session gate; always navigates exactly once.
pub fn run(ctx: &mut AppContext) -> bool {
    SessionGate::redirect(ctx.store.as_ref(), &mut ctx.navigator);
    true
}
