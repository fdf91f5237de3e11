//! Element and attribute names of the serialized form.

pub const DYNAMICS: &str = "Dynamics";
pub const ANNOTATIONS: &str = "Annotations";

pub const PARAMETER: &str = "Parameter";
pub const ANALOG_SEND_PORT: &str = "AnalogSendPort";
pub const ANALOG_RECEIVE_PORT: &str = "AnalogReceivePort";
pub const ANALOG_REDUCE_PORT: &str = "AnalogReducePort";
pub const EVENT_SEND_PORT: &str = "EventSendPort";
pub const EVENT_RECEIVE_PORT: &str = "EventReceivePort";
pub const ALIAS: &str = "Alias";
pub const CONSTANT: &str = "Constant";
pub const RANDOM_VARIABLE: &str = "RandomVariable";
pub const DISTRIBUTION_PARAMETER: &str = "DistributionParameter";

pub const STATE_VARIABLE: &str = "StateVariable";
pub const REGIME: &str = "Regime";
pub const TIME_DERIVATIVE: &str = "TimeDerivative";
pub const ON_EVENT: &str = "OnEvent";
pub const ON_CONDITION: &str = "OnCondition";
pub const TRIGGER: &str = "Trigger";
pub const STATE_ASSIGNMENT: &str = "StateAssignment";
pub const OUTPUT_EVENT: &str = "OutputEvent";
pub const SUB_NODE: &str = "SubNode";
pub const PORT_CONNECTION: &str = "PortConnection";

pub const MATH_INLINE: &str = "MathInline";

pub mod attr {
    pub const NAME: &str = "name";
    pub const DIMENSION: &str = "dimension";
    pub const OPERATOR: &str = "operator";
    pub const UNITS: &str = "units";
    pub const VALUE: &str = "value";
    pub const DISTRIBUTION: &str = "distribution";
    pub const VARIABLE: &str = "variable";
    pub const SRC_PORT: &str = "src_port";
    pub const TARGET_REGIME: &str = "target_regime";
    pub const PORT: &str = "port";
    pub const NAMESPACE: &str = "namespace";
    pub const SEND_PORT: &str = "send_port";
    pub const RECEIVE_PORT: &str = "receive_port";
}
