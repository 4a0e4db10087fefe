use std::collections::HashMap;

use bevy::prelude::*;

use super::collaborators::{AnimationSignalError, AnimationSink, LedgeSignal};

/// Named boolean animation parameters for a character.
///
/// Gameplay code writes here; an animation driver reads the values and picks
/// clips or blend weights. Only declared names can be set.
#[derive(Component, Debug, Default, Clone)]
pub struct AnimationSignals {
    values: HashMap<String, bool>,
}

impl AnimationSignals {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: names.into_iter().map(|name| (name.into(), false)).collect(),
        }
    }

    /// Declares the signals the ledge controller drives
    pub fn ledge() -> Self {
        Self::new(LedgeSignal::ALL.map(LedgeSignal::name))
    }

    /// `None` if the signal isn't declared
    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    pub fn is_on(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }
}

impl AnimationSink for AnimationSignals {
    fn set_signal(&mut self, name: &str, value: bool) -> Result<(), AnimationSignalError> {
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| AnimationSignalError::UnknownSignal(name.to_string()))?;
        *slot = value;
        Ok(())
    }
}

impl AnimationSink for Mut<'_, AnimationSignals> {
    fn set_signal(&mut self, name: &str, value: bool) -> Result<(), AnimationSignalError> {
        // Only flag a change when a value actually flips
        if self.get(name) == Some(value) {
            return Ok(());
        }
        (**self).set_signal(name, value)
    }
}
