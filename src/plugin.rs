//! Extension points (C9, §4.9). `PluginHost` holds an ordered collection of
//! plugins invoked around each step, the same shape as the teacher's
//! `NodeManager` driving its ordered `Vec<(String, Box<dyn Node>)>`
//! (`nodes/node.rs`), reduced to the two hooks this engine's step loop
//! needs instead of a full telemetry-subscribing node graph.
use std::collections::HashMap;

use crate::error::EngineError;
use crate::rigid_body::RigidBody;

/// The mutable simulation state exposed to a plugin for the duration of a
/// single hook call.
pub struct PhysicsState<'a> {
    pub time_s: f64,
    pub body: &'a mut RigidBody,
}

pub trait Plugin: Send {
    fn name(&self) -> &str;
    fn version(&self) -> &str;

    fn initialize(&mut self, config: &HashMap<String, String>) -> Result<(), EngineError> {
        let _ = config;
        Ok(())
    }

    fn before_step(&mut self, state: &mut PhysicsState) -> Result<(), EngineError> {
        let _ = state;
        Ok(())
    }

    fn after_step(&mut self, state: &mut PhysicsState) -> Result<(), EngineError> {
        let _ = state;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

pub struct PluginHost {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Default for PluginHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginHost {
    pub fn new() -> Self {
        PluginHost { plugins: Vec::new() }
    }

    /// Register a plugin at the end of the invocation order. Plugins run
    /// in registration order for every hook (§4.9).
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn initialize_all(
        &mut self,
        configs: &HashMap<String, HashMap<String, String>>,
    ) -> Result<(), EngineError> {
        for plugin in &mut self.plugins {
            let empty = HashMap::new();
            let config = configs.get(plugin.name()).unwrap_or(&empty);
            plugin
                .initialize(config)
                .map_err(|e| wrap(plugin.name(), "initialize", e))?;
        }
        Ok(())
    }

    pub fn before_step_all(&mut self, state: &mut PhysicsState) -> Result<(), EngineError> {
        for plugin in &mut self.plugins {
            plugin
                .before_step(state)
                .map_err(|e| wrap(plugin.name(), "before_step", e))?;
        }
        Ok(())
    }

    pub fn after_step_all(&mut self, state: &mut PhysicsState) -> Result<(), EngineError> {
        for plugin in &mut self.plugins {
            plugin
                .after_step(state)
                .map_err(|e| wrap(plugin.name(), "after_step", e))?;
        }
        Ok(())
    }

    pub fn cleanup_all(&mut self) -> Result<(), EngineError> {
        for plugin in &mut self.plugins {
            plugin
                .cleanup()
                .map_err(|e| wrap(plugin.name(), "cleanup", e))?;
        }
        Ok(())
    }
}

fn wrap(plugin_name: &str, phase: &'static str, cause: EngineError) -> EngineError {
    EngineError::PluginError {
        plugin_name: plugin_name.to_string(),
        phase,
        cause: cause.to_string(),
    }
}
