#![cfg_attr(doc, doc = include_str!("../README.md"))]
//! Object model for NineML dynamics component classes

mod alias;
mod class;
mod connection;
mod dependency;
mod dimension;
mod error;
mod fold;
mod identifier;
mod index;
mod into_node;
mod parameter;
mod port;
mod regime;
mod state;
mod transition;
mod validate;
mod visit;


pub use alias::{Alias, Constant, RandomVariable};
pub use class::{DynamicsClass, DynamicsClassBuilder};
pub use connection::{PortAddress, PortConnection};
pub use dependency::Dependencies;
pub use dimension::{Dimension, DimensionRegistry, StandardDimensions};
pub use error::{
    ConnectionMismatch, InterfaceCategory, InterfaceDifference, InterfaceMismatch, IrError,
    ReferenceKind, UnresolvedReference,
};
pub use fold::{Fold, fold_class};
pub use identifier::Identifier;
pub use index::IndexBook;
pub use into_node::IntoNode;
pub use parameter::Parameter;
pub use port::{
    AnalogReducePort, AnalogReceivePort, AnalogSendPort, EventReceivePort, EventSendPort,
    PortKind, ReduceOp,
};
pub use regime::{Regime, RegimeBuilder};
pub use state::{StateVariable, TimeDerivative};
pub use transition::{
    OnCondition, OnConditionBuilder, OnEvent, OnEventBuilder, OutputEvent, StateAssignment,
    Transition, TransitionRef, Trigger,
};
pub use visit::{NodeKind, Visit, VisitMode, walk};
