// cvar.rs - dynamic variable tracking

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::common::com_printf;
use crate::q_shared::CVAR_NOSET;

/// A console variable.
#[derive(Clone, Debug)]
pub struct Cvar {
    pub name: String,
    pub string: String,
    pub flags: i32,
    pub modified: bool,
    pub value: f32,
}

impl Cvar {
    /// Integer view of the value, truncated like atoi on the string.
    pub fn integer(&self) -> i32 {
        self.value as i32
    }
}

fn parse_value(s: &str) -> f32 {
    s.trim().parse::<f32>().unwrap_or(0.0)
}

/// The cvar store. Lookup is O(1) by name.
#[derive(Default)]
pub struct CvarContext {
    pub cvar_vars: Vec<Cvar>,
    cvar_index: HashMap<String, usize>,
}

impl CvarContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_var(&self, name: &str) -> Option<&Cvar> {
        self.cvar_index.get(name).map(|&idx| &self.cvar_vars[idx])
    }

    /// Float value of a cvar, 0 if it does not exist.
    pub fn variable_value(&self, name: &str) -> f32 {
        self.find_var(name).map_or(0.0, |v| v.value)
    }

    /// Integer value of a cvar, 0 if it does not exist.
    pub fn variable_integer(&self, name: &str) -> i32 {
        self.find_var(name).map_or(0, Cvar::integer)
    }

    /// String value of a cvar, "" if it does not exist.
    pub fn variable_string(&self, name: &str) -> &str {
        self.find_var(name).map_or("", |v| v.string.as_str())
    }

    /// Get or create a cvar. An existing cvar keeps its value; `flags` are OR'd in.
    pub fn get(&mut self, name: &str, value: &str, flags: i32) -> usize {
        if let Some(&idx) = self.cvar_index.get(name) {
            self.cvar_vars[idx].flags |= flags;
            return idx;
        }

        let idx = self.cvar_vars.len();
        self.cvar_vars.push(Cvar {
            name: name.to_string(),
            string: value.to_string(),
            flags,
            modified: true,
            value: parse_value(value),
        });
        self.cvar_index.insert(name.to_string(), idx);
        idx
    }

    /// Set a cvar value. Refused for NOSET cvars.
    pub fn set(&mut self, name: &str, value: &str) -> usize {
        let Some(&idx) = self.cvar_index.get(name) else {
            return self.get(name, value, 0);
        };
        let var = &mut self.cvar_vars[idx];

        if var.flags & CVAR_NOSET != 0 {
            com_printf(&format!("{} is write protected.\n", name));
            return idx;
        }
        if var.string == value {
            return idx;
        }

        var.modified = true;
        var.string = value.to_string();
        var.value = parse_value(value);
        idx
    }
}

// ============================================================
// Global singleton
// ============================================================

static CVAR_CTX: Mutex<Option<CvarContext>> = Mutex::new(None);

pub fn cvar_init() {
    *CVAR_CTX.lock() = Some(CvarContext::new());
}

pub fn cvar_shutdown() {
    *CVAR_CTX.lock() = None;
}

pub fn cvar_variable_value(name: &str) -> f32 {
    CVAR_CTX.lock().as_ref().map_or(0.0, |c| c.variable_value(name))
}

/// Access the global cvar store with a closure. Returns None if not initialized.
pub fn with_cvar_ctx<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut CvarContext) -> R,
{
    CVAR_CTX.lock().as_mut().map(f)
}

// ============================================================
// Tests
// ============================================================
