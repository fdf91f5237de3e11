/// Conversion into a model node, accepting either an already constructed
/// node or the text it is written as.
///
/// Builders take `impl IntoNode<T>` so that callers can write
/// `.alias("I := g * (E - V)")` or pass a prebuilt [`crate::Alias`] alike.
/// A conversion failure is remembered by the builder and reported by its
/// `build` method.
pub trait IntoNode<T> {
    /// Performs the conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed into the node.
    fn into_node(self) -> Result<T, crate::IrError>;
}

macro_rules! into_node_identity {
    ($($node:ty),* $(,)?) => {
        $(
            impl IntoNode<$node> for $node {
                fn into_node(self) -> Result<$node, crate::IrError> {
                    Ok(self)
                }
            }
        )*
    };
}

impl<T> IntoNode<T> for Result<T, crate::IrError> {
    fn into_node(self) -> Self {
        self
    }
}

into_node_identity!(
    crate::Parameter,
    crate::AnalogSendPort,
    crate::AnalogReceivePort,
    crate::AnalogReducePort,
    crate::Constant,
    crate::RandomVariable,
    crate::StateVariable,
    crate::Alias,
    crate::TimeDerivative,
    crate::Trigger,
    crate::StateAssignment,
    crate::OutputEvent,
    crate::EventSendPort,
    crate::EventReceivePort,
    crate::PortConnection,
);
