// snd_listener.rs - listener pose/velocity and per-entity sound origins

use myq2_common::q_shared::{
    vector_clear, vector_scale, vector_subtract, Axis, Vec3, AXIS_DEFAULT, MAX_GENTITIES,
    VEC3_ORIGIN,
};

use crate::sound_types::SoundError;

/// Upper bound for `s_update_pitch` play scales.
pub const MAX_PLAY_SCALE: f32 = 5.0;

/// Validate an entity number against [0, MAX_GENTITIES).
pub fn check_entnum(func: &'static str, entnum: i32) -> Result<usize, SoundError> {
    if (0..MAX_GENTITIES as i32).contains(&entnum) {
        Ok(entnum as usize)
    } else {
        Err(SoundError::BadEntityNum { func, entnum })
    }
}

// ============================================================
// Listener
// ============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ListenerState {
    /// Entity the listener was last spatialized from. `None` until the first
    /// call, and again after a buffer clear.
    pub number: Option<i32>,
    pub origin: Vec3,
    pub axis: Axis,
    /// Units per second.
    pub velocity: Vec3,
    /// Accumulated time-dilation factor.
    pub play_scale: f32,
    pub had_spatialize: bool,
    pub under_water: bool,
}

impl Default for ListenerState {
    fn default() -> Self {
        Self {
            number: None,
            origin: VEC3_ORIGIN,
            axis: AXIS_DEFAULT,
            velocity: VEC3_ORIGIN,
            play_scale: 1.0,
            had_spatialize: false,
            under_water: false,
        }
    }
}

impl ListenerState {
    /// Entity used for listener-relative sounds.
    pub fn entity(&self) -> i32 {
        self.number.unwrap_or(0)
    }

    /// Move the listener. Velocity is only derived when the same entity was
    /// spatialized last time; a switch of entity (or a non-positive frame time)
    /// yields zero velocity instead of a spike.
    pub fn respatialize(
        &mut self,
        entnum: i32,
        head: &Vec3,
        axis: &Axis,
        inwater: bool,
        frametime_msec: i32,
        timescale: f32,
    ) {
        if self.number == Some(entnum) && frametime_msec > 0 {
            let delta = vector_subtract(head, &self.origin);
            self.velocity = vector_scale(&delta, 1000.0 / frametime_msec as f32);
        } else {
            vector_clear(&mut self.velocity);
        }

        self.number = Some(entnum);
        self.origin = *head;
        self.axis = *axis;
        self.had_spatialize = true;
        // Compounds if called more than once per frame.
        self.play_scale *= timescale;
        self.under_water = inwater;
    }

    /// Set the play scale directly. Clamped to `MAX_PLAY_SCALE`.
    pub fn set_play_scale(&mut self, scale: f32) {
        self.play_scale = scale.min(MAX_PLAY_SCALE);
    }

    /// Forget the current position, as on a level change or buffer clear.
    pub fn reset(&mut self) {
        self.play_scale = 1.0;
        self.number = None;
        vector_clear(&mut self.origin);
        vector_clear(&mut self.velocity);
    }
}

// ============================================================
// Entity position table
// ============================================================

/// Last known world position of every entity, for sounds that follow an entity.
#[derive(Debug, Clone)]
pub struct EntitySounds {
    origins: Box<[Vec3; MAX_GENTITIES]>,
}

impl Default for EntitySounds {
    fn default() -> Self {
        Self {
            origins: Box::new([VEC3_ORIGIN; MAX_GENTITIES]),
        }
    }
}

impl EntitySounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, entnum: i32, origin: &Vec3) -> Result<(), SoundError> {
        let idx = check_entnum("S_UpdateEntityPosition", entnum)?;
        self.origins[idx] = *origin;
        Ok(())
    }

    pub fn origin(&self, entnum: i32) -> Option<&Vec3> {
        usize::try_from(entnum).ok().and_then(|i| self.origins.get(i))
    }

    pub fn clear(&mut self) {
        self.origins.fill(VEC3_ORIGIN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn check_entnum_bounds() {
        assert_eq!(check_entnum("f", 0), Ok(0));
        assert_eq!(check_entnum("f", MAX_GENTITIES as i32 - 1), Ok(MAX_GENTITIES - 1));
        assert!(check_entnum("f", MAX_GENTITIES as i32).is_err());
        assert!(check_entnum("f", -1).is_err());
    }

    #[test]
    fn respatialize_same_entity_derives_velocity() {
        let mut l = ListenerState::default();
        l.respatialize(3, &[0.0, 0.0, 0.0], &AXIS_DEFAULT, false, 100, 1.0);
        l.respatialize(3, &[10.0, -5.0, 2.0], &AXIS_DEFAULT, false, 100, 1.0);
        assert_relative_eq!(l.velocity[0], 100.0, epsilon = 1e-3);
        assert_relative_eq!(l.velocity[1], -50.0, epsilon = 1e-3);
        assert_relative_eq!(l.velocity[2], 20.0, epsilon = 1e-3);
    }

    #[test]
    fn respatialize_first_call_has_no_velocity() {
        let mut l = ListenerState::default();
        l.respatialize(0, &[500.0, 0.0, 0.0], &AXIS_DEFAULT, false, 100, 1.0);
        assert_eq!(l.velocity, VEC3_ORIGIN);
        assert_eq!(l.number, Some(0));
    }

    #[test]
    fn respatialize_entity_switch_zeroes_velocity() {
        let mut l = ListenerState::default();
        l.respatialize(3, &[0.0, 0.0, 0.0], &AXIS_DEFAULT, false, 100, 1.0);
        l.respatialize(3, &[10.0, 0.0, 0.0], &AXIS_DEFAULT, false, 100, 1.0);
        l.respatialize(4, &[900.0, 0.0, 0.0], &AXIS_DEFAULT, false, 100, 1.0);
        assert_eq!(l.velocity, VEC3_ORIGIN);
        assert_eq!(l.origin, [900.0, 0.0, 0.0]);
    }

    #[test]
    fn respatialize_zero_frametime_has_no_velocity() {
        let mut l = ListenerState::default();
        l.respatialize(3, &[0.0, 0.0, 0.0], &AXIS_DEFAULT, false, 100, 1.0);
        l.respatialize(3, &[10.0, 0.0, 0.0], &AXIS_DEFAULT, false, 0, 1.0);
        assert_eq!(l.velocity, VEC3_ORIGIN);
    }

    #[test]
    fn respatialize_copies_pose_and_flags() {
        let mut l = ListenerState::default();
        let axis = [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        l.respatialize(1, &[1.0, 2.0, 3.0], &axis, true, 16, 1.0);
        assert_eq!(l.axis, axis);
        assert!(l.under_water);
        assert!(l.had_spatialize);
    }

    #[test]
    fn respatialize_play_scale_multiplies() {
        let mut l = ListenerState::default();
        l.respatialize(1, &VEC3_ORIGIN, &AXIS_DEFAULT, false, 16, 0.5);
        l.respatialize(1, &VEC3_ORIGIN, &AXIS_DEFAULT, false, 16, 0.5);
        assert_relative_eq!(l.play_scale, 0.25);
    }

    #[test]
    fn set_play_scale_clamps() {
        let mut l = ListenerState::default();
        l.set_play_scale(12.0);
        assert_eq!(l.play_scale, MAX_PLAY_SCALE);
        l.set_play_scale(0.5);
        assert_eq!(l.play_scale, 0.5);
    }

    #[test]
    fn reset_forgets_entity() {
        let mut l = ListenerState::default();
        l.respatialize(2, &[100.0, 0.0, 0.0], &AXIS_DEFAULT, false, 100, 2.0);
        l.reset();
        assert_eq!(l.number, None);
        assert_eq!(l.play_scale, 1.0);
        // same entity after a reset must not see a jump from the origin
        l.respatialize(2, &[100.0, 0.0, 0.0], &AXIS_DEFAULT, false, 100, 1.0);
        assert_eq!(l.velocity, VEC3_ORIGIN);
    }

    #[test]
    fn entity_sounds_update_and_read() {
        let mut ents = EntitySounds::new();
        ents.update(12, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ents.origin(12), Some(&[1.0, 2.0, 3.0]));
        assert_eq!(ents.origin(-1), None);
        assert_eq!(ents.origin(MAX_GENTITIES as i32), None);
    }

    #[test]
    fn entity_sounds_out_of_range_is_error() {
        let mut ents = EntitySounds::new();
        let err = ents.update(MAX_GENTITIES as i32, &[0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            SoundError::BadEntityNum { func: "S_UpdateEntityPosition", entnum: MAX_GENTITIES as i32 }
        );
        assert!(ents.update(-3, &[0.0; 3]).is_err());
    }

    #[test]
    fn entity_sounds_clear() {
        let mut ents = EntitySounds::new();
        ents.update(5, &[9.0, 9.0, 9.0]).unwrap();
        ents.clear();
        assert_eq!(ents.origin(5), Some(&VEC3_ORIGIN));
    }
}
