//! Flight phase rules (C8, §4.8): a `statig` state machine identical in
//! shape to the teacher's `FlightModeManager`/`FMMStateMachine`
//! (`gnc/src/components/fmm.rs`) — a marker struct driving a generated
//! `State`, entry actions publishing events — but built around this
//! engine's own phases and one-way trigger conditions rather than pin
//! reads and telemetry commands.
use statig::prelude::*;

use crate::events::FlightEvent;

#[derive(Debug, Clone, Copy)]
pub struct RulesContext {
    pub thrust_n: f64,
    pub weight_n: f64,
    pub rail_exited: bool,
    pub motor_burned_out: bool,
    pub velocity_y: f64,
    pub previous_velocity_y: f64,
    pub altitude_m: f64,
    pub main_deploy_altitude_m: f64,
    pub grounded: bool,
}

enum RulesEvent {
    Tick,
}

/// Mutable companion passed through `statig`'s context parameter: the
/// read-only per-step inputs plus the events an entry action emits and
/// whether `Landed` was reached this step (actions only see this struct,
/// not `FlightRules` itself).
struct RulesIo {
    ctx: RulesContext,
    emitted: Vec<FlightEvent>,
    landed: bool,
}

#[derive(Default)]
struct FlightRulesMachine;

#[state_machine(initial = "State::on_pad()")]
impl FlightRulesMachine {
    #[state]
    fn on_pad(context: &mut RulesIo, event: &RulesEvent) -> Response<State> {
        match event {
            RulesEvent::Tick if context.ctx.thrust_n > context.ctx.weight_n => {
                Transition(State::on_rail())
            }
            RulesEvent::Tick => Handled,
        }
    }

    #[action]
    fn enter_on_rail(context: &mut RulesIo) {
        context.emitted.push(FlightEvent::Liftoff);
    }

    #[state(entry_action = "enter_on_rail")]
    fn on_rail(context: &mut RulesIo, event: &RulesEvent) -> Response<State> {
        match event {
            RulesEvent::Tick if context.ctx.rail_exited => Transition(State::boost()),
            RulesEvent::Tick => Handled,
        }
    }

    #[action]
    fn enter_boost(context: &mut RulesIo) {
        context.emitted.push(FlightEvent::RailExit);
    }

    #[state(entry_action = "enter_boost")]
    fn boost(context: &mut RulesIo, event: &RulesEvent) -> Response<State> {
        match event {
            RulesEvent::Tick if context.ctx.motor_burned_out => Transition(State::coast()),
            RulesEvent::Tick => Handled,
        }
    }

    #[action]
    fn enter_coast(context: &mut RulesIo) {
        context.emitted.push(FlightEvent::Burnout);
    }

    #[state(entry_action = "enter_coast")]
    fn coast(context: &mut RulesIo, event: &RulesEvent) -> Response<State> {
        match event {
            RulesEvent::Tick
                if context.ctx.previous_velocity_y >= 0.0 && context.ctx.velocity_y < 0.0 =>
            {
                context.emitted.push(FlightEvent::Apogee);
                Transition(State::drogue_descent())
            }
            RulesEvent::Tick => Handled,
        }
    }

    #[action]
    fn enter_drogue_descent(context: &mut RulesIo) {
        context.emitted.push(FlightEvent::DrogueDeploy);
    }

    #[state(entry_action = "enter_drogue_descent")]
    fn drogue_descent(context: &mut RulesIo, event: &RulesEvent) -> Response<State> {
        match event {
            RulesEvent::Tick if context.ctx.grounded => Transition(State::landed()),
            RulesEvent::Tick if context.ctx.altitude_m < context.ctx.main_deploy_altitude_m => {
                Transition(State::main_descent())
            }
            RulesEvent::Tick => Handled,
        }
    }

    #[action]
    fn enter_main_descent(context: &mut RulesIo) {
        context.emitted.push(FlightEvent::MainDeploy);
    }

    #[state(entry_action = "enter_main_descent")]
    fn main_descent(context: &mut RulesIo, event: &RulesEvent) -> Response<State> {
        match event {
            RulesEvent::Tick if context.ctx.grounded => Transition(State::landed()),
            RulesEvent::Tick => Handled,
        }
    }

    #[action]
    fn enter_landed(context: &mut RulesIo) {
        context.emitted.push(FlightEvent::Touchdown);
        context.landed = true;
    }

    #[state(entry_action = "enter_landed")]
    fn landed(_context: &mut RulesIo, _event: &RulesEvent) -> Response<State> {
        Handled
    }
}

pub struct FlightRules {
    state_machine: StateMachine<FlightRulesMachine>,
    landed: bool,
}

impl Default for FlightRules {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightRules {
    pub fn new() -> Self {
        FlightRules {
            state_machine: FlightRulesMachine.state_machine(),
            landed: false,
        }
    }

    pub fn is_landed(&self) -> bool {
        self.landed
    }

    /// Advance the rules machine by one tick, returning any events it
    /// emitted crossing a phase boundary this step. At most one forward
    /// transition happens per tick; events are returned in the order they
    /// were emitted.
    pub fn step(&mut self, ctx: RulesContext) -> Vec<FlightEvent> {
        let mut io = RulesIo {
            ctx,
            emitted: Vec::new(),
            landed: false,
        };
        self.state_machine.handle_with_context(&RulesEvent::Tick, &mut io);
        if io.landed {
            self.landed = true;
        }
        io.emitted
    }
}
