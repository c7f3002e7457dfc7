use bt_model::{
    AccessKeyType, BehaviorTree, Composite, CompositeType, EditError, Leaf, Node, NodeKind,
    Parameter, ParameterSet, ParameterType, PriorityType, DEFAULT_STATE_NAME,
};

fn root(tree: &BehaviorTree) -> bt_model::NodeId {
    tree.states()[0]
}

#[test]
fn new_tree_has_a_default_state() {
    let tree = BehaviorTree::new("Soldier");
    assert_eq!(tree.states().len(), 1);
    assert_eq!(tree.default_state(), DEFAULT_STATE_NAME);
    let state = tree.node(root(&tree)).expect("state");
    assert!(state.is_state());
    assert_eq!(state.name(), DEFAULT_STATE_NAME);
}

#[test]
fn factory_default_names() {
    assert_eq!(Node::with_default_name(NodeKind::Action(Leaf::default())).name(), "NewAction");
    let limit = Node::access_limit_decorator("x", "Weapons", "Reload", AccessKeyType::CounterLimit);
    assert_eq!(Node::with_default_name(limit.kind().clone()).name(), "NewAccessLimitDecorator");
    let seq = Node::composite("x", CompositeType::Sequence);
    assert_eq!(Node::with_default_name(seq.kind().clone()).name(), "NewSequenceSelector");
    assert_eq!(Node::action("Shoot").weight(), 1.0);
}

#[test]
fn add_insert_move_and_remove_children() {
    let mut tree = BehaviorTree::new("T");
    let seq = tree.add_node(Node::composite("Attack", CompositeType::Sequence)).unwrap();
    let a = tree.add_node(Node::action("Aim")).unwrap();
    let b = tree.add_node(Node::action("Shoot")).unwrap();
    let c = tree.add_node(Node::action("Reload")).unwrap();

    tree.add_child(root(&tree), seq, None).expect("attach seq");
    tree.add_child(seq, a, None).expect("attach a");
    tree.add_child(seq, c, None).expect("attach c");
    tree.insert_child(seq, 1, b, None).expect("insert b");
    assert_eq!(tree.node(seq).unwrap().children().collect::<Vec<_>>(), vec![a, b, c]);

    tree.move_child(seq, 0, 2).expect("move");
    assert_eq!(tree.node(seq).unwrap().children().collect::<Vec<_>>(), vec![b, c, a]);

    tree.remove_child(seq, c).expect("remove");
    assert_eq!(tree.node(seq).unwrap().children().collect::<Vec<_>>(), vec![b, a]);
    assert_eq!(tree.extra_behaviors(), vec![c]);

    assert_eq!(
        tree.insert_child(seq, 5, c, None),
        Err(EditError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert!(matches!(tree.remove_child(seq, c), Err(EditError::NotAChild { .. })));
}

#[test]
fn cycles_are_rejected_and_tree_is_unchanged() {
    let mut tree = BehaviorTree::new("T");
    let outer = tree.add_node(Node::composite("Outer", CompositeType::Sequence)).unwrap();
    let inner = tree.add_node(Node::composite("Inner", CompositeType::Priority)).unwrap();
    let deco = tree.add_node(Node::decorator("Guard")).unwrap();
    tree.add_child(root(&tree), outer, None).unwrap();
    tree.add_child(outer, inner, None).unwrap();
    tree.add_child(inner, deco, None).unwrap();

    let before = tree.clone();
    assert_eq!(
        tree.add_child(outer, outer, None),
        Err(EditError::Cycle { parent: outer, child: outer })
    );
    assert_eq!(
        tree.add_child(deco, outer, None),
        Err(EditError::Cycle { parent: deco, child: outer })
    );
    assert!(matches!(tree.replace_child(inner, deco, outer), Err(EditError::Cycle { .. })));
    assert_eq!(tree.hierarchy(), before.hierarchy());
    assert_eq!(tree.node(deco).unwrap().child_count(), 0);
}

#[test]
fn leaves_states_and_occupied_decorators_refuse_children() {
    let mut tree = BehaviorTree::new("T");
    let action = tree.add_node(Node::action("Shoot")).unwrap();
    let deco = tree.add_node(Node::decorator("Guard")).unwrap();
    let x = tree.add_node(Node::action("X")).unwrap();
    let y = tree.add_node(Node::action("Y")).unwrap();
    let cs = tree.add_node(Node::change_state("Flee", "Default")).unwrap();

    assert_eq!(tree.add_child(action, x, None), Err(EditError::LeafNode("Shoot".into())));
    assert_eq!(tree.add_child(cs, x, None), Err(EditError::LeafNode("Flee".into())));
    let state = root(&tree);
    assert_eq!(tree.add_child(deco, state, None), Err(EditError::StateAsChild("Default".into())));

    tree.add_child(deco, x, None).unwrap();
    assert_eq!(tree.add_child(deco, y, None), Err(EditError::DecoratorOccupied("Guard".into())));
    tree.replace_child(deco, x, y).expect("replace keeps one child");
    assert_eq!(tree.node(deco).unwrap().children().collect::<Vec<_>>(), vec![y]);
}

#[test]
fn removing_the_default_state_falls_back_to_first() {
    let mut tree = BehaviorTree::new("T");
    let combat = tree.add_state("Combat").unwrap();
    let idle = tree.add_state("Idle").unwrap();
    tree.set_default_state("Idle").unwrap();

    tree.remove_state(idle).unwrap();
    assert_eq!(tree.default_state(), DEFAULT_STATE_NAME);

    let default = tree.state(DEFAULT_STATE_NAME).unwrap();
    tree.set_default_state("Combat").unwrap();
    tree.remove_state(combat).unwrap();
    assert_eq!(tree.default_state(), DEFAULT_STATE_NAME);

    assert_eq!(tree.remove_state(default), Err(EditError::LastState));
    assert_eq!(
        tree.set_default_state("Missing"),
        Err(EditError::UnknownState("Missing".into()))
    );
}

#[test]
fn state_names_are_unique_and_rename_follows_default() {
    let mut tree = BehaviorTree::new("T");
    assert_eq!(
        tree.add_state(DEFAULT_STATE_NAME),
        Err(EditError::DuplicateStateName(DEFAULT_STATE_NAME.into()))
    );
    let state = root(&tree);
    tree.rename(state, "Patrol").unwrap();
    assert_eq!(tree.default_state(), "Patrol");
    assert_eq!(tree.rename(state, "2fast"), Err(EditError::InvalidName("2fast".into())));
    assert_eq!(tree.rename(state, "has space"), Err(EditError::InvalidName("has space".into())));
}

#[test]
fn states_are_only_made_by_add_state() {
    let mut tree = BehaviorTree::new("T");
    let stray = Node::composite("Stray", CompositeType::State);
    assert_eq!(tree.add_node(stray), Err(EditError::StateNode("Stray".into())));
    assert_eq!(tree.len(), 1);

    let pick = tree.add_node(Node::composite("Pick", CompositeType::Priority)).unwrap();
    tree.add_child(root(&tree), pick, None).unwrap();
    let to_state = Composite::State {
        priority: PriorityType::HighestPriority,
    };
    assert_eq!(
        tree.set_composite(pick, to_state),
        Err(EditError::StateKindChange("Pick".into()))
    );
    assert_eq!(
        tree.set_composite(root(&tree), Composite::Sequence),
        Err(EditError::StateKindChange(DEFAULT_STATE_NAME.into()))
    );
    assert_eq!(tree.states().len(), 1);

    tree.set_composite(pick, Composite::Loop { loop_count: -1 }).unwrap();
    assert_eq!(tree.node(pick).unwrap().composite_type(), Some(CompositeType::Loop));
    let running = Composite::State {
        priority: PriorityType::RunningNode,
    };
    tree.set_composite(root(&tree), running).unwrap();
    let state = tree.node(root(&tree)).unwrap().as_composite().unwrap();
    assert_eq!(state.priority(), Some(PriorityType::RunningNode));

    let leaf = tree.add_node(Node::action("Act")).unwrap();
    assert_eq!(
        tree.set_composite(leaf, Composite::Sequence),
        Err(EditError::NotAComposite("Act".into()))
    );
}

#[test]
fn weights_must_be_positive() {
    let mut tree = BehaviorTree::new("T");
    let a = tree.add_node(Node::action("A")).unwrap();
    assert_eq!(tree.set_weight(a, 0.0), Err(EditError::InvalidWeight(0.0)));
    assert!(tree.set_weight(a, -2.0).is_err());
    tree.set_weight(a, 2.5).unwrap();
    assert_eq!(tree.node(a).unwrap().weight(), 2.5);
}

#[test]
fn delete_only_detached_nodes() {
    let mut tree = BehaviorTree::new("T");
    let seq = tree.add_node(Node::composite("Seq", CompositeType::Sequence)).unwrap();
    let a = tree.add_node(Node::action("A")).unwrap();
    let loose = tree.add_node(Node::composite("Loose", CompositeType::Random)).unwrap();
    tree.add_child(root(&tree), seq, None).unwrap();
    tree.add_child(seq, a, None).unwrap();
    tree.add_child(loose, a, None).unwrap();

    assert!(tree.is_in_hierarchy(a));
    assert_eq!(tree.delete_node(a), Err(EditError::InHierarchy("A".into())));
    assert_eq!(tree.extra_behaviors(), vec![loose]);

    tree.remove_child(seq, a).unwrap();
    let deleted = tree.delete_node(a).expect("detached");
    assert_eq!(deleted.name(), "A");
    assert_eq!(tree.node(loose).unwrap().child_count(), 0);
    assert!(tree.node(a).is_none());
}

#[test]
fn parameter_edits_rematch_every_edge() {
    let mut tree = BehaviorTree::new("T");
    let seq = tree.add_node(Node::composite("Seq", CompositeType::Sequence)).unwrap();
    let defs: ParameterSet = [Parameter::new("count", ParameterType::Int, "3")]
        .into_iter()
        .collect();
    let shoot = tree.add_node(Node::action("Shoot").with_parameters(defs)).unwrap();
    tree.add_child(root(&tree), seq, None).unwrap();
    tree.add_child(seq, shoot, None).unwrap();

    assert_eq!(tree.edge(seq, 0).unwrap().bindings().to_string(), "(count = 3)");

    tree.set_binding(seq, 0, "count", "5").unwrap();
    tree.add_parameter(shoot, Parameter::of_type("loud", ParameterType::Bool)).unwrap();
    assert_eq!(tree.edge(seq, 0).unwrap().bindings().to_string(), "(count = 5, loud = false)");

    tree.remove_parameter(shoot, "count").unwrap();
    assert_eq!(tree.edge(seq, 0).unwrap().bindings().to_string(), "(loud = false)");

    tree.set_parameter_default(shoot, "loud", "true").unwrap();
    assert_eq!(tree.edge(seq, 0).unwrap().bindings().to_string(), "(loud = false)");
    assert_eq!(
        tree.set_binding(seq, 0, "count", "1"),
        Err(EditError::UnknownParameter("count".into()))
    );
    assert_eq!(
        tree.add_parameter(seq, Parameter::of_type("x", ParameterType::Int)),
        Err(EditError::NoParameters("Seq".into()))
    );
}
