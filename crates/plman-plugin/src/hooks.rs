//! Plugin lifecycle and action events.
//!
//! Listeners registered on the [`PluginManager`](crate::PluginManager)
//! receive a [`Hook`] for every lifecycle change and every dispatched
//! action. They run synchronously on the dispatching thread, after the
//! host lock has been released.

use serde::Serialize;

use plman_reconcile::ReconcileReport;

use crate::types::ActionKind;

/// Events the plugin emits.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Hook {
    /// The host started the plugin.
    OnStart,

    /// The host is stopping the plugin.
    OnStop,

    /// An action ran to completion.
    OnActionComplete {
        action: ActionKind,
        report: ReconcileReport,
    },

    /// An action stopped on an error.
    OnActionError { action: ActionKind, error: String },
}

impl Hook {
    /// Get the hook name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OnStart => "on_start",
            Self::OnStop => "on_stop",
            Self::OnActionComplete { .. } => "on_action_complete",
            Self::OnActionError { .. } => "on_action_error",
        }
    }

    /// Get the action this hook concerns, if any.
    pub fn action(&self) -> Option<ActionKind> {
        match self {
            Self::OnActionComplete { action, .. } | Self::OnActionError { action, .. } => {
                Some(*action)
            }
            Self::OnStart | Self::OnStop => None,
        }
    }
}

/// Receiver of plugin events.
pub trait HookListener {
    fn on_hook(&self, hook: &Hook);
}

impl<F: Fn(&Hook)> HookListener for F {
    fn on_hook(&self, hook: &Hook) {
        self(hook)
    }
}
