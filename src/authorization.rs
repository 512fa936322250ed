//! # Authorization Gate
//!
//! A single predicate deciding whether an action may proceed. The gate only
//! answers yes or no; turning a denial into a response is the job of the
//! [`ErrorTranslator`](crate::rescue::ErrorTranslator).
//!
//! The decision is recomputed on every request and must not mutate anything.
//! For `create`, `list` and `new` there is no record yet, so only the action
//! is evaluated.

use crate::action::Action;
use crate::record::Record;

/// Decides allow/deny per action and optional target record.
pub trait AuthorizationGate<R: Record, C>: Send + Sync {
    fn authorized(&self, ctx: &C, action: Action, record: Option<&R>) -> bool;
}

/// The default gate: every action is allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl<R: Record, C> AuthorizationGate<R, C> for AllowAll {
    fn authorized(&self, _ctx: &C, _action: Action, _record: Option<&R>) -> bool {
        true
    }
}

impl<R, C, F> AuthorizationGate<R, C> for F
where
    R: Record,
    F: Fn(&C, Action, Option<&R>) -> bool + Send + Sync,
{
    fn authorized(&self, ctx: &C, action: Action, record: Option<&R>) -> bool {
        self(ctx, action, record)
    }
}
