//! Action dispatch.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use plman_core::PlaylistHost;
use plman_reconcile::{Operation, ReconcileError, ReconcileReport, Reconciler};

use crate::actions::ActionTable;
use crate::config::{PluginDescriptor, PluginSettings};
use crate::hooks::{Hook, HookListener};
use crate::types::{ActionKind, PluginError, PluginResult};

const TARGET: &str = "plman::plugin";

/// Owns the plugin's settings and action table and runs actions against a
/// host.
///
/// The host is passed to every dispatch rather than stored, so one manager
/// can serve any [`PlaylistHost`].
pub struct PluginManager {
    descriptor: PluginDescriptor,
    settings: PluginSettings,
    actions: ActionTable,
    listeners: Vec<Box<dyn HookListener>>,
    started: bool,
}

impl PluginManager {
    /// Create a manager with the given settings.
    pub fn new(settings: PluginSettings) -> Self {
        let actions = ActionTable::from_settings(&settings);
        Self {
            descriptor: PluginDescriptor::default(),
            settings,
            actions,
            listeners: Vec::new(),
            started: false,
        }
    }

    /// Create a manager from the settings file at its default location.
    pub fn from_default_settings() -> PluginResult<Self> {
        Ok(Self::new(PluginSettings::load_default()?))
    }

    pub fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    /// Actions offered to the host, in menu order.
    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// Register an event listener.
    pub fn add_listener(&mut self, listener: impl HookListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Start the plugin. Starting twice is harmless.
    pub fn start(&mut self) -> PluginResult<()> {
        if !self.started {
            self.started = true;
            info!(target: TARGET, version = %self.descriptor.version, actions = self.actions.len(), "plugin started");
            self.emit(&Hook::OnStart);
        }
        Ok(())
    }

    /// Stop the plugin. Dispatch is refused until it is started again.
    pub fn stop(&mut self) -> PluginResult<()> {
        if self.started {
            self.emit(&Hook::OnStop);
            self.started = false;
            info!(target: TARGET, "plugin stopped");
        }
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Run the action registered under `name`.
    pub fn dispatch<H: PlaylistHost + ?Sized>(
        &self,
        host: &H,
        name: &str,
    ) -> PluginResult<ReconcileReport> {
        if !self.started {
            return Err(PluginError::NotStarted);
        }

        let kind = ActionKind::from_name(name).ok_or_else(|| PluginError::UnknownAction {
            name: name.to_string(),
        })?;
        if !self.actions.contains(name) {
            return Err(PluginError::ActionDisabled {
                name: name.to_string(),
            });
        }

        debug!(target: TARGET, action = %kind, "dispatching action");
        let result = self.run(host, kind);

        match &result {
            Ok(report) => self.emit(&Hook::OnActionComplete {
                action: kind,
                report: report.clone(),
            }),
            Err(err) => self.emit(&Hook::OnActionError {
                action: kind,
                error: err.to_string(),
            }),
        }
        result
    }

    /// Entry point for host menu callbacks.
    ///
    /// Returns 0 on success and -1 on failure; failures are logged and never
    /// propagate into the host.
    pub fn run_callback<H: PlaylistHost + ?Sized>(&self, host: &H, name: &str) -> i32 {
        match self.dispatch(host, name) {
            Ok(_) => 0,
            Err(err) => {
                warn!(target: TARGET, action = name, error = %err, "action failed");
                -1
            }
        }
    }

    fn run<H: PlaylistHost + ?Sized>(
        &self,
        host: &H,
        kind: ActionKind,
    ) -> PluginResult<ReconcileReport> {
        let reconciler = Reconciler::with_config(host, self.settings.reconcile.clone());

        match kind {
            ActionKind::RemoveDuplicates => Ok(reconciler.remove_duplicates()),
            ActionKind::RemoveVanished => Ok(reconciler.remove_vanished()),
            ActionKind::Sync => match reconciler.sync() {
                Err(ReconcileError::NoRootConfigured) => {
                    info!(target: TARGET, "no sync folder set, asking for one");
                    self.select_folder(host, &reconciler)
                }
                other => Ok(other?),
            },
            ActionKind::SelectFolder => self.select_folder(host, &reconciler),
            ActionKind::ResetFolder => Ok(reconciler.clear_root_association()),
        }
    }

    fn select_folder<H: PlaylistHost + ?Sized>(
        &self,
        host: &H,
        reconciler: &Reconciler<'_, H>,
    ) -> PluginResult<ReconcileReport> {
        let Ok(playlist) = reconciler.active_playlist() else {
            return Ok(ReconcileReport::inactive(Operation::SetRootAssociation));
        };

        let current: Option<PathBuf> = reconciler.root_association(&playlist);
        match host.choose_directory(current.as_deref()) {
            Some(folder) => Ok(reconciler.set_root_association(&playlist, &folder)),
            None => {
                debug!(target: TARGET, "folder selection cancelled");
                Ok(ReconcileReport::new(Operation::SetRootAssociation))
            }
        }
    }

    fn emit(&self, hook: &Hook) {
        for listener in &self.listeners {
            listener.on_hook(hook);
        }
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new(PluginSettings::default())
    }
}
