// Edge styles for the relationship kinds drawn in architecture diagrams

/// Kind of drawn relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeStyle {
    /// Owner holds a reference to the target through a field
    Association,
    /// Edge runs contract -> implementer, hollow arrow drawn at the contract end
    Implementation,
}

impl EdgeStyle {
    /// DOT attributes for this style, in render order
    pub fn attributes(self) -> &'static [(&'static str, &'static str)] {
        match self {
            EdgeStyle::Association => &[("arrowhead", "vee"), ("style", "solid")],
            EdgeStyle::Implementation => &[
                ("arrowtail", "empty"),
                ("style", "dashed"),
                ("dir", "back"),
            ],
        }
    }
}
