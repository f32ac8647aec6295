use crate::scene::NodeId;

/// On-screen handles that take over an object's transform while attached.
pub trait Manipulator {
    fn attach(&mut self, node: NodeId);

    fn detach(&mut self);

    fn attached(&self) -> Option<NodeId>;
}
