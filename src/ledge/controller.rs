use avian3d::prelude::LayerMask;
use bevy::prelude::*;

use super::anchor::LedgeSurface;
use super::collaborators::*;
use super::probe::RayProbe;
use crate::physics::GameLayer;

/// Per-character ledge tuning
#[derive(Component, Clone, Copy, Debug)]
pub struct LedgeConfig {
    /// How far ahead of the character the detection ray reaches
    pub reach_distance: f32,
    /// Layers that count as ledges
    pub ledge_layers: LayerMask,
    /// Horizontal distance travelled onto the ledge while climbing
    pub forward_climb_offset: f32,
    /// Climb animation length in seconds
    pub climb_duration: f32,
    /// Hits whose normal points further down than this are ignored
    pub min_normal_y: f32,
    /// No grab while rising at or above this speed (m/s)
    pub max_grab_vertical_speed: f32,
    /// Forward input above this starts the climb
    pub climb_threshold: f32,
    /// Backward input beyond this lets go of the ledge
    pub drop_threshold: f32,
    /// Seconds after letting go before another ledge can be grabbed
    pub regrab_cooldown: f32,
}

impl Default for LedgeConfig {
    fn default() -> Self {
        Self {
            reach_distance: 1.5,
            ledge_layers: GameLayer::Ledge.into(),
            forward_climb_offset: 0.5,
            climb_duration: 1.0,
            min_normal_y: -0.1,
            max_grab_vertical_speed: 1.0,
            climb_threshold: 0.1,
            drop_threshold: 0.1,
            regrab_cooldown: 0.25,
        }
    }
}

/// Which phase of a ledge interaction the character is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Grabbing,
    Climbing,
}

/// An in-flight climb from the hanging pose onto the ledge top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimbTransition {
    pub start: Vec3,
    pub end: Vec3,
    pub elapsed: f32,
    pub duration: f32,
}

impl ClimbTransition {
    pub fn new(start: Vec3, end: Vec3, duration: f32) -> Self {
        Self {
            start,
            end,
            elapsed: 0.0,
            duration,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advances by `dt` and returns the new position. Lands exactly on `end`
    /// once the duration has elapsed.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        self.elapsed += dt;
        if self.is_finished() {
            return self.end;
        }

        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.start.lerp(self.end, t)
    }
}

/// The controller's state. The held ledge lives inside the non-idle variants,
/// so there is never a current ledge while idle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LedgeState {
    #[default]
    Idle,
    Grabbing {
        ledge: LedgeSurface,
    },
    Climbing {
        ledge: LedgeSurface,
        climb: ClimbTransition,
    },
}

/// A state change reported by [`LedgeController::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgeTransition {
    Grabbed { ledge: Entity },
    ClimbStarted { ledge: Entity },
    ClimbFinished { ledge: Entity },
    Dropped { ledge: Entity },
}

/// Everything the controller touches during one tick.
///
/// Body and probe are required. A missing input source, locomotion or
/// animation sink turns the steps that would use it into no-ops.
pub struct LedgeContext<'a> {
    pub body: &'a mut dyn CharacterBody,
    pub probe: &'a dyn RayProbe,
    pub input: Option<&'a mut dyn MovementInput>,
    pub locomotion: Option<&'a mut dyn LocomotionGate>,
    pub animation: Option<&'a mut dyn AnimationSink>,
}

/// Ledge grab state machine for one character.
///
/// Call [`tick`](Self::tick) once per fixed step:
/// - **Idle**: airborne characters probe forward from head height; a valid
///   hit snaps them into the hanging pose.
/// - **Grabbing**: forward input climbs, backward input drops.
/// - **Climbing**: interpolates onto the ledge top, then hands control back
///   to locomotion.
#[derive(Component, Debug)]
pub struct LedgeController {
    state: LedgeState,
    since_release: f32,
    release_requested: bool,
}

impl Default for LedgeController {
    fn default() -> Self {
        Self {
            state: LedgeState::Idle,
            since_release: f32::INFINITY,
            release_requested: false,
        }
    }
}

impl LedgeController {
    pub fn state(&self) -> &LedgeState {
        &self.state
    }

    pub fn phase(&self) -> ControllerState {
        match self.state {
            LedgeState::Idle => ControllerState::Idle,
            LedgeState::Grabbing { .. } => ControllerState::Grabbing,
            LedgeState::Climbing { .. } => ControllerState::Climbing,
        }
    }

    pub fn current_ledge(&self) -> Option<&LedgeSurface> {
        match &self.state {
            LedgeState::Idle => None,
            LedgeState::Grabbing { ledge } | LedgeState::Climbing { ledge, .. } => Some(ledge),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, LedgeState::Idle)
    }

    pub fn tick(
        &mut self,
        dt: f32,
        config: &LedgeConfig,
        ctx: &mut LedgeContext,
    ) -> Option<LedgeTransition> {
        if std::mem::take(&mut self.release_requested) {
            if let Some(transition) = self.release(ctx) {
                return Some(transition);
            }
        }

        match self.state {
            LedgeState::Idle => {
                self.since_release += dt;
                self.detect(config, ctx)
            }
            LedgeState::Grabbing { ledge } => self.handle_hang_input(ledge, config, ctx),
            LedgeState::Climbing { ledge, climb } => self.advance_climb(ledge, climb, dt, ctx),
        }
    }

    /// Lets go of the ledge from outside the state machine (respawn,
    /// cutscene, ...). Only a hanging character can be released; a climb
    /// always runs to completion.
    pub fn release(&mut self, ctx: &mut LedgeContext) -> Option<LedgeTransition> {
        let LedgeState::Grabbing { ledge } = self.state else {
            return None;
        };
        self.finish(ctx);
        Some(LedgeTransition::Dropped {
            ledge: ledge.entity,
        })
    }

    /// Asks for [`release`](Self::release) on the next tick, for callers that
    /// don't have the collaborators at hand.
    pub fn request_release(&mut self) {
        self.release_requested = true;
    }

    fn detect(&mut self, config: &LedgeConfig, ctx: &mut LedgeContext) -> Option<LedgeTransition> {
        if ctx.body.is_grounded() || self.since_release < config.regrab_cooldown {
            return None;
        }

        let origin = ctx.body.position() + Vec3::Y * ctx.body.height();
        let direction = Dir3::new(ctx.body.forward()).ok()?;
        let hit = ctx
            .probe
            .probe(origin, direction, config.reach_distance, config.ledge_layers)?;

        // Geometry on the ledge layer without an anchor isn't grabbable
        let ledge = hit.surface?;

        if hit.normal.y < config.min_normal_y {
            return None;
        }

        // Still rising fast from a jump
        if ctx.body.vertical_velocity() >= config.max_grab_vertical_speed {
            return None;
        }

        self.grab(ledge, hit.point, hit.normal, ctx);
        debug!("grabbed ledge {:?} at {}", ledge.entity, ctx.body.position());
        Some(LedgeTransition::Grabbed {
            ledge: ledge.entity,
        })
    }

    fn grab(&mut self, ledge: LedgeSurface, point: Vec3, normal: Vec3, ctx: &mut LedgeContext) {
        if let Some(locomotion) = ctx.locomotion.as_deref_mut() {
            locomotion.set_enabled(false);
        }

        if let Some(input) = ctx.input.as_deref_mut() {
            input.clear_move();
            input.clear_jump();
            input.clear_sprint();
        }

        signal_best_effort(ctx.animation.as_deref_mut(), LedgeSignal::Hang, true);

        if let Some(rotation) = facing_away_from(normal) {
            ctx.body.set_rotation(rotation);
        }
        ctx.body.teleport(ledge.hang_position(point, normal));

        self.state = LedgeState::Grabbing { ledge };
    }

    fn handle_hang_input(
        &mut self,
        ledge: LedgeSurface,
        config: &LedgeConfig,
        ctx: &mut LedgeContext,
    ) -> Option<LedgeTransition> {
        let vertical = ctx
            .input
            .as_deref()
            .map_or(0.0, |input| input.move_vector().y);

        if vertical > config.climb_threshold {
            self.begin_climb(ledge, config, ctx);
            debug!("climbing ledge {:?}", ledge.entity);
            return Some(LedgeTransition::ClimbStarted {
                ledge: ledge.entity,
            });
        }

        if vertical < -config.drop_threshold {
            self.finish(ctx);
            debug!("dropped from ledge {:?}", ledge.entity);
            return Some(LedgeTransition::Dropped {
                ledge: ledge.entity,
            });
        }

        None
    }

    fn begin_climb(&mut self, ledge: LedgeSurface, config: &LedgeConfig, ctx: &mut LedgeContext) {
        let start = ctx.body.position();
        let mut end = start + ctx.body.forward() * config.forward_climb_offset;
        end.y = ledge.top;

        signal_best_effort(ctx.animation.as_deref_mut(), LedgeSignal::Hang, false);
        signal_best_effort(ctx.animation.as_deref_mut(), LedgeSignal::Climb, true);

        // The body passes through the ledge corner on the way up
        ctx.body.set_suspended(true);

        self.state = LedgeState::Climbing {
            ledge,
            climb: ClimbTransition::new(start, end, config.climb_duration),
        };
    }

    fn advance_climb(
        &mut self,
        ledge: LedgeSurface,
        mut climb: ClimbTransition,
        dt: f32,
        ctx: &mut LedgeContext,
    ) -> Option<LedgeTransition> {
        ctx.body.set_position(climb.advance(dt));

        if !climb.is_finished() {
            self.state = LedgeState::Climbing { ledge, climb };
            return None;
        }

        self.finish(ctx);
        debug!("finished climbing ledge {:?}", ledge.entity);
        Some(LedgeTransition::ClimbFinished {
            ledge: ledge.entity,
        })
    }

    /// Returns the character to regular locomotion. Safe to repeat.
    fn finish(&mut self, ctx: &mut LedgeContext) {
        self.state = LedgeState::Idle;
        self.since_release = 0.0;

        // Don't let the held climb/drop input leak into a jump on landing
        if let Some(input) = ctx.input.as_deref_mut() {
            input.clear_jump();
            input.clear_move();
        }

        ctx.body.set_suspended(false);

        if let Some(locomotion) = ctx.locomotion.as_deref_mut() {
            locomotion.set_enabled(true);
            locomotion.force_grounded();
        }

        for signal in LedgeSignal::ALL {
            signal_best_effort(ctx.animation.as_deref_mut(), signal, false);
        }
    }
}

/// Upright rotation facing into a wall with the given normal.
fn facing_away_from(normal: Vec3) -> Option<Quat> {
    let facing = Vec3::new(-normal.x, 0.0, -normal.z).try_normalize()?;
    Some(Quat::from_rotation_y(f32::atan2(-facing.x, -facing.z)))
}
