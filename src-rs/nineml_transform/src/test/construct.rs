//! Prebuilt classes shared by the unit tests.

use nineml_expr::StandardBuiltins;
use nineml_ir::{
    AnalogReceivePort, AnalogReducePort, AnalogSendPort, Dimension, DimensionRegistry,
    DynamicsClass, OnCondition, OnEvent, Regime, StandardDimensions, StateVariable,
};

fn dimension(name: &str) -> Dimension {
    StandardDimensions
        .dimension(name)
        .unwrap_or_else(|| panic!("{name} should be a standard dimension"))
}

/// A leaky integrate-and-fire neuron with a single regime and no inputs.
pub fn leaky_integrate_and_fire() -> DynamicsClass {
    DynamicsClass::builder("LeakyIntegrateAndFire")
        .parameter("tau")
        .parameter("E_L")
        .parameter("R")
        .parameter("I_ext")
        .parameter("V_th")
        .parameter("V_reset")
        .analog_send_port(AnalogSendPort::new("V", dimension("voltage")))
        .event_send_port("spike")
        .state_variable(StateVariable::new("V", dimension("voltage")))
        .alias("V_inf := E_L + R * I_ext")
        .regime(
            Regime::builder("subthreshold")
                .time_derivative("dV/dt = (V_inf - V) / tau")
                .on_condition(
                    OnCondition::builder("V > V_th")
                        .assign("V = V_reset")
                        .emit("spike"),
                ),
        )
        .build(&StandardBuiltins)
        .expect("fixture should build")
}

/// A single parameter `P1` read through the alias `A1 := P1`.
pub fn parameter_alias() -> DynamicsClass {
    DynamicsClass::builder("ParameterAlias")
        .parameter("P1")
        .alias("A1 := P1")
        .build(&StandardBuiltins)
        .expect("fixture should build")
}

/// A sinusoidal drive depending on time and `pi`.
pub fn time_dependent_drive() -> DynamicsClass {
    DynamicsClass::builder("Drive")
        .alias("drive := amplitude * sin(2 * pi * omega * t)")
        .build(&StandardBuiltins)
        .expect("fixture should build")
}

/// A cell summing synaptic current through a reduce port, with a
/// refractory period after every spike.
pub fn leaky_cell() -> DynamicsClass {
    DynamicsClass::builder("LeakyCell")
        .analog_reduce_port(AnalogReducePort::new("I_syn", dimension("current"), "+"))
        .regime(
            Regime::builder("subthreshold")
                .time_derivative("dV/dt = (E - V) / tau + I_syn / C")
                .on_condition(
                    OnCondition::builder("V > theta")
                        .assign("V = E")
                        .assign("t_spike = t")
                        .emit("spike")
                        .to("refractory"),
                ),
        )
        .regime(
            Regime::builder("refractory")
                .on_condition(OnCondition::builder("t > t_spike + t_ref").to("subthreshold")),
        )
        .build(&StandardBuiltins)
        .expect("fixture should build")
}

/// A conductance that jumps on every input event and decays exponentially.
pub fn exponential_synapse() -> DynamicsClass {
    DynamicsClass::builder("Synapse")
        .analog_send_port(AnalogSendPort::new("I", dimension("current")))
        .alias("I := g * w")
        .regime(
            Regime::builder("default")
                .time_derivative("dg/dt = -g / tau_syn")
                .on_event(OnEvent::builder("input").assign("g = g + 1")),
        )
        .build(&StandardBuiltins)
        .expect("fixture should build")
}

/// A cell exciting itself through a synapse.
pub fn cell_and_synapse() -> DynamicsClass {
    DynamicsClass::builder("CellAndSynapse")
        .sub_node("cell", leaky_cell())
        .sub_node("syn", exponential_synapse())
        .port_connection(("syn.I", "cell.I_syn"))
        .port_connection(("cell.spike", "syn.input"))
        .build(&StandardBuiltins)
        .expect("fixture should build")
}

/// A decaying voltage exposed through an analog send port `V`.
pub fn voltage_source() -> DynamicsClass {
    DynamicsClass::builder("Source")
        .state_variable(StateVariable::new("V", dimension("voltage")))
        .analog_send_port(AnalogSendPort::new("V", dimension("voltage")))
        .regime(Regime::builder("default").time_derivative("dV/dt = -V / tau"))
        .build(&StandardBuiltins)
        .expect("fixture should build")
}

/// A class reading a single voltage input `V_in`.
pub fn voltage_probe() -> DynamicsClass {
    DynamicsClass::builder("Probe")
        .analog_receive_port(AnalogReceivePort::new("V_in", dimension("voltage")))
        .alias("reading := 2 * V_in")
        .build(&StandardBuiltins)
        .expect("fixture should build")
}
