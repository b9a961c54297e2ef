//! Effect lifecycle: action dispatch, lifecycle events and the use sequence.

use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::host::HostHandle;
use crate::mesh::{EffectDescriptor, EffectInstance, MeshEffect};
use crate::registry::{PluginEntry, PluginStatus};
use crate::status::{Action, Status};

/// Lifecycle event for hooks.
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    /// An action was dispatched into a plugin.
    ActionDispatched {
        /// Plugin identifier.
        plugin: String,
        /// Dispatched action.
        action: Action,
        /// Status returned by the plugin.
        status: Status,
        /// Time spent in the plugin.
        elapsed: Duration,
        /// Completion time.
        at: Instant,
    },
    /// A plugin's load status changed.
    StatusChanged {
        /// Plugin identifier.
        plugin: String,
        /// Previous status.
        from: PluginStatus,
        /// New status.
        to: PluginStatus,
        /// Transition time.
        at: Instant,
    },
    /// An effect descriptor was freed.
    DescriptorReleased {
        /// Plugin identifier.
        plugin: String,
        /// Release time.
        at: Instant,
    },
    /// An effect instance was freed.
    InstanceReleased {
        /// Plugin identifier.
        plugin: String,
        /// Release time.
        at: Instant,
    },
}

impl LifecycleEvent {
    /// Get the plugin identifier.
    pub fn plugin_name(&self) -> &str {
        match self {
            Self::ActionDispatched { plugin, .. } => plugin,
            Self::StatusChanged { plugin, .. } => plugin,
            Self::DescriptorReleased { plugin, .. } => plugin,
            Self::InstanceReleased { plugin, .. } => plugin,
        }
    }

    /// Get the event timestamp.
    pub fn timestamp(&self) -> Instant {
        match self {
            Self::ActionDispatched { at, .. } => *at,
            Self::StatusChanged { at, .. } => *at,
            Self::DescriptorReleased { at, .. } => *at,
            Self::InstanceReleased { at, .. } => *at,
        }
    }

    /// Get the event name.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::ActionDispatched { .. } => "action_dispatched",
            Self::StatusChanged { .. } => "status_changed",
            Self::DescriptorReleased { .. } => "descriptor_released",
            Self::InstanceReleased { .. } => "instance_released",
        }
    }
}

/// Hooks for lifecycle events.
pub struct LifecycleHooks {
    handlers: Vec<Box<dyn Fn(&LifecycleEvent) + Send + Sync>>,
}

impl LifecycleHooks {
    /// Create new lifecycle hooks.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Add a lifecycle event handler.
    pub fn on_event<F>(&mut self, handler: F)
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Emit a lifecycle event.
    pub fn emit(&self, event: LifecycleEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }

    /// Emit an action dispatched event.
    pub fn emit_dispatched(&self, plugin: &str, action: Action, status: Status, elapsed: Duration) {
        self.emit(LifecycleEvent::ActionDispatched {
            plugin: plugin.to_string(),
            action,
            status,
            elapsed,
            at: Instant::now(),
        });
    }

    /// Emit a status changed event.
    pub fn emit_status_changed(&self, plugin: &str, from: PluginStatus, to: PluginStatus) {
        self.emit(LifecycleEvent::StatusChanged {
            plugin: plugin.to_string(),
            from,
            to,
            at: Instant::now(),
        });
    }

    /// Emit a descriptor released event.
    pub fn emit_descriptor_released(&self, plugin: &str) {
        self.emit(LifecycleEvent::DescriptorReleased {
            plugin: plugin.to_string(),
            at: Instant::now(),
        });
    }

    /// Emit an instance released event.
    pub fn emit_instance_released(&self, plugin: &str) {
        self.emit(LifecycleEvent::InstanceReleased {
            plugin: plugin.to_string(),
            at: Instant::now(),
        });
    }
}

impl Default for LifecycleHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}

/// Drives one plugin through its actions.
///
/// Every step that allocates a descriptor or instance also frees it on its
/// own failure path, so a failing step never leaks what it created.
///
/// Hooks are locked only while an event is emitted, and never while the
/// entry's state is locked, so handlers may call back into the runtime.
pub struct EffectLifecycle<'a> {
    entry: &'a PluginEntry,
    host: &'a HostHandle,
    hooks: &'a RwLock<LifecycleHooks>,
}

impl<'a> EffectLifecycle<'a> {
    /// Create a lifecycle driver for a registered plugin.
    pub fn new(
        entry: &'a PluginEntry,
        host: &'a HostHandle,
        hooks: &'a RwLock<LifecycleHooks>,
    ) -> Self {
        Self { entry, host, hooks }
    }

    /// Run the full use sequence.
    ///
    /// Loads the plugin if needed, describes it, creates an instance, hands
    /// the instance to `prepare`, cooks it, then destroys the instance and
    /// releases the descriptor. The first failure skips the remaining steps
    /// but not the teardown of what was already created.
    pub fn run<F>(&self, prepare: F) -> Result<()>
    where
        F: FnOnce(&mut EffectInstance) -> Result<()>,
    {
        self.ensure_loaded()?;

        let descriptor = self.describe()?;

        let mut instance = match self.create_instance(&descriptor) {
            Ok(instance) => instance,
            Err(e) => {
                self.release_descriptor(descriptor);
                return Err(e);
            }
        };

        let result = prepare(&mut instance)
            .map_err(|e| {
                tracing::warn!("Preparing {} failed: {}", self.entry.identifier(), e);
                e
            })
            .and_then(|()| self.cook(&mut instance));

        self.destroy_instance(instance);
        self.release_descriptor(descriptor);

        result
    }

    /// Run the load action once, unless it already ran.
    ///
    /// The entry's state stays locked while the plugin loads, so concurrent
    /// callers wait and then observe the outcome.
    pub fn ensure_loaded(&self) -> Result<()> {
        let identifier = self.entry.identifier();

        let (status, elapsed, next) = {
            let mut state = self.entry.lock_state();

            if state.unloaded {
                return Err(Error::PluginUnloaded(identifier.to_string()));
            }
            match state.status {
                PluginStatus::Ok => return Ok(()),
                PluginStatus::Error => {
                    tracing::warn!("Refusing plugin {}: it failed to load", identifier);
                    return Err(Error::PluginUnavailable(identifier.to_string()));
                }
                PluginStatus::NotLoaded => {}
            }

            self.entry.plugin().set_host(Some(self.host.clone()));
            let (status, elapsed) = self.invoke(Action::Load, None);
            let next = if Action::Load.is_failure(status) {
                self.entry.plugin().set_host(None);
                PluginStatus::Error
            } else {
                PluginStatus::Ok
            };
            state.status = next;

            (status, elapsed, next)
        };

        self.hooks
            .read()
            .emit_dispatched(identifier, Action::Load, status, elapsed);
        self.hooks
            .read()
            .emit_status_changed(identifier, PluginStatus::NotLoaded, next);

        if next == PluginStatus::Error {
            return Err(Error::action_failed(identifier, Action::Load, status));
        }

        tracing::info!("Loaded plugin {}", self.entry.info());
        Ok(())
    }

    /// Run the unload action and unbind the host.
    ///
    /// Later uses of the plugin are refused. Unloading twice is a no-op.
    pub fn unload(&self) -> Result<()> {
        let identifier = self.entry.identifier();

        let dispatched = {
            let mut state = self.entry.lock_state();

            if state.unloaded {
                return Ok(());
            }
            let dispatched = if state.status == PluginStatus::Ok {
                let outcome = self.invoke(Action::Unload, None);
                self.entry.plugin().set_host(None);
                tracing::info!("Unloaded plugin {}", identifier);
                Some(outcome)
            } else {
                tracing::debug!("Plugin {} is {}, skipping unload action", identifier, state.status);
                None
            };
            state.unloaded = true;

            dispatched
        };

        if let Some((status, elapsed)) = dispatched {
            self.hooks
                .read()
                .emit_dispatched(identifier, Action::Unload, status, elapsed);
        }
        Ok(())
    }

    /// Allocate a descriptor and run the describe action on it.
    pub fn describe(&self) -> Result<EffectDescriptor> {
        let mut descriptor = EffectDescriptor::new(self.host.clone());
        let status = self.dispatch(Action::Describe, Some(&mut *descriptor));

        if Action::Describe.is_failure(status) {
            self.release_descriptor(descriptor);
            return Err(Error::action_failed(
                self.entry.identifier(),
                Action::Describe,
                status,
            ));
        }

        Ok(descriptor)
    }

    /// Copy a descriptor into an instance and run the createInstance action.
    pub fn create_instance(&self, descriptor: &EffectDescriptor) -> Result<EffectInstance> {
        let mut instance = EffectInstance::from_descriptor(descriptor)?;
        let status = self.dispatch(Action::CreateInstance, Some(&mut *instance));

        if Action::CreateInstance.is_failure(status) {
            self.free_instance(instance);
            return Err(Error::action_failed(
                self.entry.identifier(),
                Action::CreateInstance,
                status,
            ));
        }

        Ok(instance)
    }

    /// Run the cook action on an instance.
    pub fn cook(&self, instance: &mut EffectInstance) -> Result<()> {
        let status = self.dispatch(Action::Cook, Some(&mut **instance));

        if Action::Cook.is_failure(status) {
            return Err(Error::action_failed(
                self.entry.identifier(),
                Action::Cook,
                status,
            ));
        }
        Ok(())
    }

    /// Run the destroyInstance action, then free the instance.
    pub fn destroy_instance(&self, mut instance: EffectInstance) {
        self.dispatch(Action::DestroyInstance, Some(&mut *instance));
        self.free_instance(instance);
    }

    /// Free a descriptor.
    pub fn release_descriptor(&self, descriptor: EffectDescriptor) {
        drop(descriptor);
        tracing::debug!("Released descriptor of {}", self.entry.identifier());
        self.hooks.read().emit_descriptor_released(self.entry.identifier());
    }

    fn free_instance(&self, instance: EffectInstance) {
        drop(instance);
        tracing::debug!("Released instance of {}", self.entry.identifier());
        self.hooks.read().emit_instance_released(self.entry.identifier());
    }

    fn dispatch(&self, action: Action, effect: Option<&mut MeshEffect>) -> Status {
        let (status, elapsed) = self.invoke(action, effect);
        self.hooks
            .read()
            .emit_dispatched(self.entry.identifier(), action, status, elapsed);
        status
    }

    // Calls into the plugin and logs the outcome without emitting an event.
    fn invoke(&self, action: Action, effect: Option<&mut MeshEffect>) -> (Status, Duration) {
        let identifier = self.entry.identifier();
        let start = Instant::now();
        let status = self.entry.plugin().main_entry(action, effect, None, None);
        let elapsed = start.elapsed();

        if action.is_failure(status) {
            tracing::warn!("{}: {} failed with {}", identifier, action, status);
        } else if status.is_error() {
            tracing::warn!("{}: {} returned {}, ignored", identifier, action, status);
        } else {
            tracing::debug!("{}: {} returned {} in {:?}", identifier, action, status, elapsed);
        }

        (status, elapsed)
    }
}

impl std::fmt::Debug for EffectLifecycle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectLifecycle")
            .field("plugin", &self.entry.identifier())
            .finish()
    }
}
