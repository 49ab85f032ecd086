//! Test data builders for creating graphs and templates

use pipeline_builder::pipeline::{
    Connection, ConnectionRecord, GraphModel, Node, NodeKind, NodeRecord, SocketName, Template,
};

/// Builder for graphs wired with same-named sockets
pub struct GraphBuilder {
    graph: GraphModel<'static>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: GraphModel::new(),
        }
    }

    pub fn node(mut self, id: &str, kind: NodeKind) -> Self {
        self.graph
            .add_node(Node::new(id, kind))
            .unwrap_or_else(|e| panic!("add_node({id}): {e}"));
        self
    }

    pub fn wire(mut self, source: &str, socket: SocketName, target: &str) -> Self {
        self.graph
            .add_connection(Connection::same_socket(source, socket, target))
            .unwrap_or_else(|e| panic!("wire({source}.{socket} -> {target}): {e}"));
        self
    }

    pub fn build(self) -> GraphModel<'static> {
        self.graph
    }
}

/// Builder for templates wired with same-named sockets
pub struct TemplateBuilder {
    template: Template,
}

impl TemplateBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            template: Template::new(name, ""),
        }
    }

    pub fn node(mut self, id: &str, kind: NodeKind) -> Self {
        self.template.nodes.push(NodeRecord::new(id, kind));
        self
    }

    pub fn raw_node(mut self, id: &str, kind: &str) -> Self {
        let mut record = NodeRecord::new(id, NodeKind::DataLoader);
        record.kind = kind.to_string();
        self.template.nodes.push(record);
        self
    }

    pub fn wire(mut self, source: &str, socket: SocketName, target: &str) -> Self {
        self.template
            .connections
            .push(ConnectionRecord::same_socket(source, socket, target));
        self
    }

    pub fn build(self) -> Template {
        self.template
    }
}

/// loader → split → classifier, enough to feed a model
pub fn training_prefix() -> GraphBuilder {
    GraphBuilder::new()
        .node("loader", NodeKind::DataLoader)
        .node("split", NodeKind::DataSplit)
        .node("classifier", NodeKind::Classifier)
        .wire("loader", SocketName::Data, "split")
        .wire("split", SocketName::XTrain, "classifier")
        .wire("split", SocketName::YTrain, "classifier")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_builder() {
        let graph = training_prefix().build();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.connection_count(), 3);
    }

    #[test]
    fn test_template_builder() {
        let template = TemplateBuilder::new("t")
            .node("a", NodeKind::DataLoader)
            .raw_node("b", "mystery")
            .build();
        assert_eq!(template.nodes[1].kind, "mystery");
    }
}
