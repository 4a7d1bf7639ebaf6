// q_shared.rs - foundational types and helpers shared by the engine crates

// ============================================================
// Basic types
// ============================================================

pub type Vec3 = [f32; 3];

/// Orthonormal basis: forward, right, up.
pub type Axis = [Vec3; 3];

pub const VEC3_ORIGIN: Vec3 = [0.0, 0.0, 0.0];

pub const AXIS_DEFAULT: Axis = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

// ============================================================
// Engine limits
// ============================================================

/// Max length of a quake game pathname, including the terminator slot.
pub const MAX_QPATH: usize = 64;

/// Entity numbers live in [0, MAX_GENTITIES).
pub const MAX_GENTITIES: usize = 1024;

// ============================================================
// Error codes (Com_Error)
// ============================================================

pub const ERR_FATAL: i32 = 0;
pub const ERR_DROP: i32 = 1;

// ============================================================
// Cvar flags
// ============================================================

pub const CVAR_ZERO: i32 = 0;
/// Written to config.cfg on exit.
pub const CVAR_ARCHIVE: i32 = 1;
/// Only settable from code, never from the console.
pub const CVAR_NOSET: i32 = 8;

// ============================================================
// MATHLIB - Vector operations
// ============================================================

#[inline]
pub fn vector_subtract(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn vector_clear(v: &mut Vec3) {
    *v = VEC3_ORIGIN;
}

#[inline]
pub fn vector_scale(v: &Vec3, scale: f32) -> Vec3 {
    [v[0] * scale, v[1] * scale, v[2] * scale]
}

// ============================================================
// Path / string utilities
// ============================================================

/// Byte offset of the extension dot, if the final path component has one.
fn extension_dot(path: &str) -> Option<usize> {
    let dot = path.rfind('.')?;
    match path.rfind('/') {
        Some(slash) if slash > dot => None,
        _ => Some(dot),
    }
}

/// Strip the file extension of the final path component.
pub fn com_strip_extension(input: &str) -> &str {
    match extension_dot(input) {
        Some(pos) => &input[..pos],
        None => input,
    }
}

/// Append `extension` if the path has no existing extension.
pub fn com_default_extension(path: &mut String, extension: &str) {
    if extension_dot(path).is_none() {
        path.push_str(extension);
    }
}

/// Copy at most `max - 1` bytes of `src`, never splitting a character.
pub fn q_strncpyz(src: &str, max: usize) -> &str {
    if src.len() < max {
        return src;
    }
    let mut end = max.saturating_sub(1);
    while end > 0 && !src.is_char_boundary(end) {
        end -= 1;
    }
    &src[..end]
}

// ============================================================
// Tests
// ============================================================
