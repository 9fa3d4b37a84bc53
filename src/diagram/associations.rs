// Association extraction
//
// Derives the edges one type implies: an association per non-primitive
// field (owner -> field type) and an implementation per contract
// (contract -> implementer). Multiplicity and cycles are kept as-is.

use crate::diagram::styles::EdgeStyle;
use crate::parser::TypeDescriptor;

/// An edge to be added to the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeIntent {
    pub from: String,
    pub to: String,
    pub style: EdgeStyle,
}

impl EdgeIntent {
    pub fn association(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            style: EdgeStyle::Association,
        }
    }

    pub fn implementation(contract: &str, implementer: &str) -> Self {
        Self {
            from: contract.to_string(),
            to: implementer.to_string(),
            style: EdgeStyle::Implementation,
        }
    }
}

/// Edges implied by one type: fields first, then contracts, each in
/// declaration order
pub fn associations(ty: &TypeDescriptor) -> Vec<EdgeIntent> {
    let fields = ty
        .fields
        .iter()
        .filter(|field| !field.primitive)
        .map(|field| EdgeIntent::association(&ty.name, &field.type_name));

    let contracts = ty
        .implements
        .iter()
        .map(|contract| EdgeIntent::implementation(contract, &ty.name));

    fields.chain(contracts).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_fields_are_skipped() {
        let ty = TypeDescriptor::new("a.b", "Counter")
            .with_primitive_field("count", "int")
            .with_primitive_field("enabled", "boolean");
        assert!(associations(&ty).is_empty());
    }

    #[test]
    fn test_one_association_per_field() {
        let ty = TypeDescriptor::new("a.b.domain", "Order")
            .with_field("buyer", "a.b.domain.Customer")
            .with_primitive_field("quantity", "int")
            .with_field("payer", "a.b.domain.Customer");

        let edges = associations(&ty);
        assert_eq!(
            edges,
            vec![
                EdgeIntent::association("a.b.domain.Order", "a.b.domain.Customer"),
                EdgeIntent::association("a.b.domain.Order", "a.b.domain.Customer"),
            ]
        );
    }

    #[test]
    fn test_implementation_points_from_contract() {
        let ty = TypeDescriptor::new("a.b.infra", "OrderRepository")
            .implementing("a.b.infra.Repository")
            .implementing("java.io.Serializable");

        let edges = associations(&ty);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].from, "a.b.infra.Repository");
        assert_eq!(edges[0].to, "a.b.infra.OrderRepository");
        assert_eq!(edges[0].style, EdgeStyle::Implementation);
        assert_eq!(edges[1].from, "java.io.Serializable");
    }

    #[test]
    fn test_fields_before_contracts() {
        let ty = TypeDescriptor::new("a", "Node")
            .implementing("a.Visitable")
            .with_field("next", "a.Node");

        let edges = associations(&ty);
        assert_eq!(edges[0].style, EdgeStyle::Association);
        // self reference is kept
        assert_eq!(edges[0].to, "a.Node");
        assert_eq!(edges[1].style, EdgeStyle::Implementation);
    }
}
