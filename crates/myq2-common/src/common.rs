// common.rs - console print layer shared by client subsystems

use std::cell::RefCell;

use crate::q_shared::{ERR_DROP, ERR_FATAL};

pub const MAXPRINTMSG: usize = 4096;

/// `log` target used for everything routed through the console.
pub const CONSOLE_TARGET: &str = "console";

// ============================================================
// Redirect buffer for Com_Printf
// ============================================================

thread_local! {
    static RD_BUFFER: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Begin redirecting printf output on this thread into a buffer.
pub fn com_begin_redirect() {
    RD_BUFFER.with(|buf| *buf.borrow_mut() = Some(String::new()));
}

/// End redirect and return the captured output.
pub fn com_end_redirect() -> Option<String> {
    RD_BUFFER.with(|buf| buf.borrow_mut().take())
}

/// Appends to the redirect buffer. Returns false if no redirect is active.
fn redirect(msg: &str) -> bool {
    RD_BUFFER.with(|buf| match buf.borrow_mut().as_mut() {
        Some(s) => {
            if s.len() + msg.len() <= MAXPRINTMSG * 4 {
                s.push_str(msg);
            }
            true
        }
        None => false,
    })
}

// ============================================================
// Com_Printf / Com_DPrintf / Com_Error
// ============================================================

/// General-purpose print. Goes to the redirect buffer when one is active,
/// otherwise to the `log` facade at info level.
pub fn com_printf(msg: &str) {
    if redirect(msg) {
        return;
    }
    log::info!(target: CONSOLE_TARGET, "{}", msg.trim_end_matches('\n'));
}

/// Developer-only print, gated by the "developer" cvar.
pub fn com_dprintf(msg: &str) {
    if crate::cvar::cvar_variable_value("developer") == 0.0 {
        return;
    }
    if redirect(msg) {
        return;
    }
    log::debug!(target: CONSOLE_TARGET, "{}", msg.trim_end_matches('\n'));
}

/// Engine error handler.
/// - `ERR_FATAL`: logs and panics.
/// - `ERR_DROP`: goes to the redirect buffer if one is active, else logged.
///   The caller abandons the operation and reports it upward.
/// - anything else: logged as a plain message.
pub fn com_error(code: i32, msg: &str) {
    match code {
        ERR_FATAL => {
            log::error!(target: CONSOLE_TARGET, "{}", msg);
            panic!("Fatal error: {}", msg);
        }
        ERR_DROP => {
            if !redirect(&format!("ERROR: {}\n", msg)) {
                log::error!(target: CONSOLE_TARGET, "{}", msg);
            }
        }
        _ => com_printf(&format!("{}\n", msg)),
    }
}

// ============================================================
// Tests
// ============================================================
