//! Property-based tests for transition chains, guard selection and completion.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated topologies.

use parking_lot::Mutex;
use proptest::prelude::*;
use statechart::builder::{ModelBuilder, TransitionBuilder};
use statechart::core::{Node, RegionId, TransitionId, VertexId};
use statechart::engine::{AmbiguityPolicy, EngineConfig, Instance};
use statechart::model::Model;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Extra states hung off existing ones: `(owner index, use second region)`.
type Shape = Vec<(usize, bool)>;

prop_compose! {
    fn arbitrary_shape()(
        extra in prop::collection::vec((0usize..64, any::<bool>()), 0..24)
    ) -> Shape {
        extra
    }
}

struct Tree {
    builder: ModelBuilder<()>,
    states: Vec<VertexId>,
    regions: Vec<RegionId>,
    firsts: HashMap<RegionId, VertexId>,
    second: HashMap<VertexId, RegionId>,
}

impl Tree {
    fn default_region(&mut self, owner: VertexId) -> RegionId {
        let region = self.builder.default_region(owner).unwrap();
        if !self.regions.contains(&region) {
            self.regions.push(region);
        }
        region
    }

    fn second_region(&mut self, owner: VertexId) -> RegionId {
        if let Some(region) = self.second.get(&owner) {
            return *region;
        }
        self.default_region(owner);
        let region = self.builder.region("second", owner).unwrap();
        self.regions.push(region);
        self.second.insert(owner, region);
        region
    }

    fn add_state(&mut self, name: String, region: RegionId) -> VertexId {
        let state = self.builder.state(name, region).unwrap();
        self.firsts.entry(region).or_insert(state);
        self.states.push(state);
        state
    }
}

/// A chain nested four states deep below the root plus the extra states of
/// `shape`, with one transition between two of the states.
fn build(shape: &Shape, source: usize, target: usize) -> (Model<()>, TransitionId) {
    let mut builder = ModelBuilder::new();
    let root = builder.root("root");
    let mut tree = Tree {
        builder,
        states: vec![root],
        regions: Vec::new(),
        firsts: HashMap::new(),
        second: HashMap::new(),
    };

    let mut parent = root;
    for depth in 0..4 {
        let region = tree.default_region(parent);
        parent = tree.add_state(format!("chain{}", depth), region);
    }

    for (index, (at, orthogonal)) in shape.iter().enumerate() {
        let owner = tree.states[at % tree.states.len()];
        let region = if *orthogonal {
            tree.second_region(owner)
        } else {
            tree.default_region(owner)
        };
        tree.add_state(format!("extra{}", index), region);
    }

    // A region that only exists as the companion of a second region has no
    // state of its own yet.
    for region in tree.regions.clone() {
        let first = match tree.firsts.get(&region) {
            Some(first) => *first,
            None => tree.builder.final_state("end", region).unwrap(),
        };
        tree.builder.initial(region, first).unwrap();
    }

    let source = tree.states[source % tree.states.len()];
    let target = tree.states[target % tree.states.len()];
    let id = tree
        .builder
        .transition(TransitionBuilder::new().from(source).to(target))
        .unwrap();

    (tree.builder.build().unwrap(), id)
}

fn parent(model: &Model<()>, vertex: VertexId) -> Option<RegionId> {
    model.vertex(vertex).and_then(|v| v.parent())
}

/// Three states in a ring stepped by message `n` from state `n`, where every
/// guard counts how often it runs.
fn pipeline(calls: &Arc<AtomicUsize>) -> (Arc<Model<u8>>, VertexId) {
    let mut builder: ModelBuilder<u8> = ModelBuilder::new();
    let machine = builder.root("machine");
    let top = builder.default_region(machine).unwrap();
    let states: Vec<VertexId> = (0..3)
        .map(|index| builder.state(format!("stage{}", index), top).unwrap())
        .collect();
    builder.initial(top, states[0]).unwrap();
    for (index, from) in states.iter().enumerate() {
        for (step, to) in states.iter().enumerate() {
            let calls = calls.clone();
            let expected = (index + step) as u8 % 4;
            let guard = move |m: &u8| {
                calls.fetch_add(1, Ordering::SeqCst);
                *m == expected
            };
            builder
                .transition(TransitionBuilder::new().from(*from).to(*to).when(guard))
                .unwrap();
        }
    }
    (Arc::new(builder.build().unwrap()), machine)
}

proptest! {
    #[test]
    fn guard_policy_does_not_change_committed_configuration(
        messages in prop::collection::vec(0u8..4, 0..16)
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let (model, machine) = pipeline(&calls);

        let mut outcomes = Vec::new();
        for policy in [AmbiguityPolicy::Reject, AmbiguityPolicy::FirstDeclared] {
            let config = EngineConfig::builder().ambiguity(policy).build();
            let instance = Instance::with_config(model.clone(), machine, config).unwrap();
            instance.initialise().unwrap();
            let mut consumed = Vec::new();
            for message in &messages {
                consumed.push(instance.process(message).unwrap());
            }
            let configuration = instance.configuration();
            outcomes.push((consumed, configuration.active_vertices(), configuration.revision()));
        }

        prop_assert_eq!(&outcomes[0], &outcomes[1]);
        prop_assert!(calls.load(Ordering::SeqCst) >= 2 * messages.len());
    }

    #[test]
    fn exit_path_climbs_from_source(
        shape in arbitrary_shape(),
        source in any::<usize>(),
        target in any::<usize>(),
    ) {
        let (model, id) = build(&shape, source, target);
        let transition = model.transition(id).unwrap();
        let exit = transition.exit_path();

        prop_assert!(!exit.is_empty());
        prop_assert_eq!(exit[0], transition.source());
        for pair in exit.windows(2) {
            prop_assert_eq!(model.owner_of(pair[0]), Some(pair[1]));
        }
    }

    #[test]
    fn enter_path_descends_to_target(
        shape in arbitrary_shape(),
        source in any::<usize>(),
        target in any::<usize>(),
    ) {
        let (model, id) = build(&shape, source, target);
        let transition = model.transition(id).unwrap();
        let enter = transition.enter_path();

        prop_assert!(!enter.is_empty());
        prop_assert_eq!(enter.last().copied(), transition.target());
        for pair in enter.windows(2) {
            prop_assert_eq!(model.owner_of(pair[1]), Some(pair[0]));
        }
    }

    #[test]
    fn exit_and_enter_meet_below_the_lca(
        shape in arbitrary_shape(),
        source in any::<usize>(),
        target in any::<usize>(),
    ) {
        let (model, id) = build(&shape, source, target);
        let transition = model.transition(id).unwrap();
        let exited = *transition.exit_path().last().unwrap();
        let entered = transition.enter_path()[0];

        prop_assert_eq!(parent(&model, exited), transition.lca());
        prop_assert_eq!(parent(&model, entered), transition.lca());

        if let Some(lca) = transition.lca() {
            let owner = model.region(lca).unwrap().owner();
            let target = transition.target().unwrap();
            prop_assert!(model.contains(owner, transition.source()));
            prop_assert!(model.contains(owner, target));
            prop_assert!(model.ancestors(target).unwrap().contains(&Node::Region(lca)));
        }
    }

    #[test]
    fn forks_are_off_path_regions_of_entered_states(
        shape in arbitrary_shape(),
        source in any::<usize>(),
        target in any::<usize>(),
    ) {
        let (model, id) = build(&shape, source, target);
        let transition = model.transition(id).unwrap();
        let target_chain = model.ancestors(transition.target().unwrap()).unwrap();

        for fork in transition.forks() {
            let owner = model.region(*fork).unwrap().owner();
            prop_assert!(transition.enter_path().contains(&owner));
            prop_assert!(!target_chain.contains(&Node::Region(*fork)));
        }
    }

    #[test]
    fn join_fires_once_in_any_order(
        order in (2usize..6).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let fired = Arc::new(Mutex::new(0));
        let mut builder: ModelBuilder<usize> = ModelBuilder::new();
        let machine = builder.root("machine");
        let top = builder.default_region(machine).unwrap();
        let join = builder.state("join", top).unwrap();
        let done = builder.state("done", top).unwrap();
        builder.initial(top, join).unwrap();
        for index in 0..order.len() {
            let region = builder.region(format!("branch{}", index), join).unwrap();
            let waiting = builder.state("waiting", region).unwrap();
            let finished = builder.final_state("finished", region).unwrap();
            builder.initial(region, waiting).unwrap();
            builder
                .transition(
                    TransitionBuilder::new()
                        .from(waiting)
                        .to(finished)
                        .when(move |m: &usize| *m == index),
                )
                .unwrap();
        }
        builder
            .transition(TransitionBuilder::completion().from(join).to(done))
            .unwrap();
        let counter = fired.clone();
        builder
            .on_entry(done, move || {
                *counter.lock() += 1;
                Ok(())
            })
            .unwrap();

        let instance = Instance::new(Arc::new(builder.build().unwrap()), machine).unwrap();
        instance.initialise().unwrap();
        for message in &order {
            prop_assert!(instance.process(message).unwrap());
        }

        prop_assert!(instance.is_active(done));
        prop_assert_eq!(*fired.lock(), 1);
    }
}
