//! Operator registration and key bindings
//!
//! [`Addon`] owns the registered operators and the keymaps that trigger them.
//! `register` installs both tools into the "Node Editor" keymap, `unregister`
//! takes them out again.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::Settings;
use crate::error::Error;
use crate::ops::{self, BoxToggle, Context, Operator, OperatorReport, RotateImage};

pub const NODE_EDITOR_KEYMAP: &str = "Node Editor";
pub const NODE_EDITOR_SPACE: &str = "NODE_EDITOR";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeymapError {
    #[error("operator `{0}` is already registered")]
    AlreadyRegistered(String),

    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    #[error("invalid key chord `{0}`, expected something like `alt+q`")]
    BadChord(String),
}

/// A key plus modifiers, written `alt+q`, `ctrl+shift+r`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    /// Uppercase key
    pub key: char,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn alt(key: char) -> Self {
        Self {
            key: key.to_ascii_uppercase(),
            alt: true,
            ctrl: false,
            shift: false,
        }
    }
}

impl FromStr for KeyChord {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || KeymapError::BadChord(s.to_string());
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = parts.pop().ok_or_else(bad)?;

        let mut chars = key.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase(),
            _ => return Err(bad()),
        };

        let mut chord = KeyChord {
            key,
            alt: false,
            ctrl: false,
            shift: false,
        };
        for modifier in parts {
            match modifier.to_ascii_lowercase().as_str() {
                "alt" => chord.alt = true,
                "ctrl" => chord.ctrl = true,
                "shift" => chord.shift = true,
                _ => return Err(bad()),
            }
        }
        Ok(chord)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        write!(f, "{}", self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Press,
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMapItem {
    pub idname: String,
    pub chord: KeyChord,
    pub event: KeyEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    pub name: String,
    pub space_type: String,
    pub items: Vec<KeyMapItem>,
}

impl KeyMap {
    /// Remove the first item bound to `idname`
    fn remove_first(&mut self, idname: &str) -> Option<KeyMapItem> {
        let index = self.items.iter().position(|item| item.idname == idname)?;
        Some(self.items.remove(index))
    }
}

/// Registered operators and the keymaps that trigger them
#[derive(Default)]
pub struct Addon {
    operators: BTreeMap<&'static str, Box<dyn Operator>>,
    keymaps: Vec<KeyMap>,
}

impl Addon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_class(&mut self, op: Box<dyn Operator>) -> Result<(), KeymapError> {
        let idname = op.idname();
        if self.operators.contains_key(idname) {
            return Err(KeymapError::AlreadyRegistered(idname.to_string()));
        }
        log::debug!("Registered operator {}", idname);
        self.operators.insert(idname, op);
        Ok(())
    }

    pub fn unregister_class(&mut self, idname: &str) -> Result<(), KeymapError> {
        self.operators
            .remove(idname)
            .map(|_| ())
            .ok_or_else(|| KeymapError::UnknownOperator(idname.to_string()))
    }

    /// Get the keymap called `name`, creating it if needed
    pub fn keymap_mut(&mut self, name: &str, space_type: &str) -> &mut KeyMap {
        let index = match self.keymaps.iter().position(|km| km.name == name) {
            Some(index) => index,
            None => {
                self.keymaps.push(KeyMap {
                    name: name.to_string(),
                    space_type: space_type.to_string(),
                    items: Vec::new(),
                });
                self.keymaps.len() - 1
            }
        };
        &mut self.keymaps[index]
    }

    pub fn keymap(&self, name: &str) -> Option<&KeyMap> {
        self.keymaps.iter().find(|km| km.name == name)
    }

    pub fn operator(&self, idname: &str) -> Option<&dyn Operator> {
        self.operators.get(idname).map(|op| op.as_ref())
    }

    pub fn operators(&self) -> impl Iterator<Item = &dyn Operator> {
        self.operators.values().map(|op| op.as_ref())
    }

    /// Register both tools and bind them according to `settings.keymap`
    pub fn register(&mut self, settings: &Settings) -> Result<(), KeymapError> {
        // Parse first so a bad binding leaves nothing half-registered
        let mut bindings = Vec::new();
        for idname in [BoxToggle::IDNAME, RotateImage::IDNAME] {
            if let Some(chord) = settings.keymap.get(idname) {
                bindings.push((idname, chord.parse::<KeyChord>()?));
            }
        }

        self.register_class(Box::new(BoxToggle))?;
        self.register_class(Box::new(RotateImage))?;

        let keymap = self.keymap_mut(NODE_EDITOR_KEYMAP, NODE_EDITOR_SPACE);
        for (idname, chord) in bindings {
            log::debug!("⌨️  {} -> {}", chord, idname);
            keymap.items.push(KeyMapItem {
                idname: idname.to_string(),
                chord,
                event: KeyEvent::Press,
            });
        }
        Ok(())
    }

    /// Remove both tools and their first key binding each
    pub fn unregister(&mut self) -> Result<(), KeymapError> {
        self.unregister_class(BoxToggle::IDNAME)?;
        self.unregister_class(RotateImage::IDNAME)?;

        if let Some(index) = self
            .keymaps
            .iter()
            .position(|km| km.name == NODE_EDITOR_KEYMAP)
        {
            let keymap = &mut self.keymaps[index];
            keymap.remove_first(BoxToggle::IDNAME);
            keymap.remove_first(RotateImage::IDNAME);
        }
        Ok(())
    }

    /// Run a registered operator by name
    pub fn call(&self, idname: &str, ctx: &mut Context<'_>) -> Result<OperatorReport, Error> {
        let op = self
            .operator(idname)
            .ok_or_else(|| KeymapError::UnknownOperator(idname.to_string()))?;
        ops::invoke(op, ctx)
    }

    /// Run whatever is bound to `chord`. `None` when nothing is bound.
    pub fn dispatch(
        &self,
        chord: KeyChord,
        event: KeyEvent,
        ctx: &mut Context<'_>,
    ) -> Result<Option<OperatorReport>, Error> {
        let Some(item) = self
            .keymaps
            .iter()
            .flat_map(|km| km.items.iter())
            .find(|item| item.chord == chord && item.event == event)
        else {
            log::debug!("Nothing bound to {}", chord);
            return Ok(None);
        };

        self.call(&item.idname, ctx).map(Some)
    }
}
