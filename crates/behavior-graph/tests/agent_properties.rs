use std::sync::Arc;

use behavior_graph::builder::{condition_fn, constant, random, success_check};
use behavior_graph::{
    Agent, AgentConfig, AgentPhase, Combine, Evaluation, Graph, Idle, Instant, NodeId, Outcome,
    Pcg32, RandomSource, RepeatMode, State, StateContext,
};

/// Host that records every hook call as `"<node>:<hook>"`.
#[derive(Default)]
struct Journal {
    entries: Vec<String>,
}

impl Journal {
    fn count(&self, entry: &str) -> usize {
        self.entries.iter().filter(|e| *e == entry).count()
    }
}

struct Recorder {
    name: &'static str,
    end_on_begin: Option<Outcome>,
}

impl Recorder {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            end_on_begin: None,
        }
    }

    fn ending(name: &'static str, outcome: Outcome) -> Self {
        Self {
            name,
            end_on_begin: Some(outcome),
        }
    }

    fn log(&self, ctx: &mut StateContext<'_, Journal>, hook: &str) {
        ctx.host_mut().entries.push(format!("{}:{}", self.name, hook));
    }
}

impl State<Journal> for Recorder {
    fn on_begin(&self, ctx: &mut StateContext<'_, Journal>) {
        self.log(ctx, "begin");
        if let Some(outcome) = self.end_on_begin {
            ctx.end(outcome);
        }
    }

    fn on_end(&self, ctx: &mut StateContext<'_, Journal>) {
        self.log(ctx, "end");
    }

    fn on_pause(&self, ctx: &mut StateContext<'_, Journal>) {
        self.log(ctx, "pause");
    }

    fn on_resume(&self, ctx: &mut StateContext<'_, Journal>) {
        self.log(ctx, "resume");
    }
}

#[test]
fn run_once_entry_waits_forever_without_viable_transitions() {
    let mut graph = Graph::new("zero");
    let e = graph.add_node("e", Recorder::new("e"), RepeatMode::RunOnce);
    let other = graph.add_node("other", Idle, RepeatMode::RunOnce);
    graph.set_entry(Some(e)).unwrap();
    graph
        .connect(e, other, Combine::Sum, vec![constant(0.0)])
        .unwrap();

    let mut journal = Journal::default();
    let mut agent = Agent::with_graph(Arc::new(graph));
    agent.tick(&mut journal);
    agent.end_current(Outcome::Succeeded, &mut journal);

    for _ in 0..50 {
        agent.tick(&mut journal);
        assert_eq!(agent.current(), Some(e));
        assert!(agent.is_waiting());
    }
    assert_eq!(agent.phase(), AgentPhase::Waiting);
    assert_eq!(journal.count("e:begin"), 1);
    assert_eq!(journal.count("e:end"), 1);
}

#[test]
fn loop_node_begins_once_per_tick() {
    let mut graph = Graph::new("loop");
    let l = graph.add_node(
        "l",
        Recorder::ending("l", Outcome::Succeeded),
        RepeatMode::Loop,
    );
    graph.set_entry(Some(l)).unwrap();

    let mut journal = Journal::default();
    let mut agent = Agent::with_graph(Arc::new(graph));

    // The first tick both enters the node and, since it ends on entry,
    // loops it once.
    agent.tick(&mut journal);
    let baseline = journal.count("l:begin");
    assert_eq!(baseline, 2);

    for n in 1..=20 {
        agent.tick(&mut journal);
        assert_eq!(journal.count("l:begin"), baseline + n);
        assert_eq!(agent.current(), Some(l));
        assert!(!agent.is_waiting());
    }
}

#[test]
fn restart_graph_returns_to_entry_next_tick() {
    let mut graph = Graph::new("restart");
    let entry = graph.add_node("entry", Recorder::new("entry"), RepeatMode::RunOnce);
    let leaf = graph.add_node("leaf", Recorder::new("leaf"), RepeatMode::RestartGraph);
    graph.set_entry(Some(entry)).unwrap();
    graph.connect(entry, leaf, Combine::Sum, Vec::new()).unwrap();

    let mut journal = Journal::default();
    let mut agent = Agent::with_graph(Arc::new(graph));
    agent.tick(&mut journal);
    agent.end_current(Outcome::Succeeded, &mut journal);
    agent.tick(&mut journal);
    assert_eq!(agent.current(), Some(leaf));

    agent.end_current(Outcome::Succeeded, &mut journal);
    agent.tick(&mut journal);
    assert_eq!(agent.current(), Some(entry));
    assert!(!agent.is_ended());
    assert_eq!(journal.count("entry:begin"), 2);
}

#[test]
fn stale_end_is_ignored() {
    let mut graph = Graph::new("stale");
    let a = graph.add_node("a", Recorder::new("a"), RepeatMode::RunOnce);
    let b = graph.add_node("b", Recorder::new("b"), RepeatMode::RunOnce);
    graph.set_entry(Some(a)).unwrap();
    graph.connect(a, b, Combine::Sum, Vec::new()).unwrap();

    let mut journal = Journal::default();
    let mut agent = Agent::with_graph(Arc::new(graph));
    agent.tick(&mut journal);
    agent.end(Some(a), Outcome::Failed, &mut journal);
    agent.tick(&mut journal);
    assert_eq!(agent.current(), Some(b));

    // A late completion from `a` must not touch `b`.
    agent.end(Some(a), Outcome::Succeeded, &mut journal);
    assert_eq!(agent.outcome(), Outcome::Failed);
    assert!(!agent.is_ended());
    assert_eq!(journal.count("b:end"), 0);

    agent.end(Some(b), Outcome::Succeeded, &mut journal);
    assert!(agent.is_ended());
    assert_eq!(agent.outcome(), Outcome::Succeeded);
    assert_eq!(journal.count("b:end"), 1);
}

#[test]
fn unconditional_transition_then_loop_node_waits_for_end() {
    let mut graph = Graph::new("scenario");
    let a = graph.add_node("a", Recorder::new("a"), RepeatMode::RunOnce);
    let b = graph.add_node("b", Recorder::new("b"), RepeatMode::Loop);
    graph.set_entry(Some(a)).unwrap();
    graph.connect(a, b, Combine::Sum, Vec::new()).unwrap();

    let mut journal = Journal::default();
    let mut agent = Agent::with_graph(Arc::new(graph));

    agent.tick(&mut journal);
    assert_eq!(agent.current(), Some(a));
    assert_eq!(journal.count("a:begin"), 1);

    agent.end_current(Outcome::Succeeded, &mut journal);
    agent.tick(&mut journal);
    assert_eq!(agent.current(), Some(b));
    assert_eq!(journal.count("b:begin"), 1);

    for _ in 3..=30 {
        agent.tick(&mut journal);
        assert_eq!(agent.current(), Some(b));
        assert!(!agent.is_waiting());
    }
    assert_eq!(journal.count("b:begin"), 1);
}

#[test]
fn pause_and_resume_fire_hooks_once() {
    let mut graph = Graph::new("pause");
    let c = graph.add_node("c", Recorder::new("c"), RepeatMode::RunOnce);
    let d = graph.add_node("d", Recorder::new("d"), RepeatMode::RunOnce);
    graph.set_entry(Some(c)).unwrap();
    graph.connect(c, d, Combine::Sum, Vec::new()).unwrap();

    let mut journal = Journal::default();
    let mut agent = Agent::with_graph(Arc::new(graph));
    agent.tick(&mut journal);
    agent.end_current(Outcome::Succeeded, &mut journal);

    agent.pause(&mut journal);
    agent.pause(&mut journal);
    assert!(agent.is_paused());
    assert_eq!(agent.phase(), AgentPhase::Paused);
    assert_eq!(journal.count("c:pause"), 1);

    for _ in 0..5 {
        agent.tick(&mut journal);
        assert_eq!(agent.current(), Some(c));
    }

    agent.resume(&mut journal);
    agent.resume(&mut journal);
    assert_eq!(journal.count("c:resume"), 1);
    assert!(agent.is_ended());

    agent.tick(&mut journal);
    assert_eq!(agent.current(), Some(d));
}

#[test]
fn stop_clears_progress_but_keeps_graph() {
    let mut graph = Graph::new("stop");
    let a = graph.add_node("a", Recorder::new("a"), RepeatMode::RunOnce);
    graph.set_entry(Some(a)).unwrap();

    let mut journal = Journal::default();
    let mut agent = Agent::with_graph(Arc::new(graph));
    agent.tick(&mut journal);
    agent.end_current(Outcome::Succeeded, &mut journal);
    agent.stop(&mut journal);

    assert_eq!(agent.current(), None);
    assert!(!agent.is_ended());
    assert!(agent.graph().is_some());
    assert_eq!(agent.phase(), AgentPhase::Stopped);
    assert_eq!(journal.count("a:pause"), 1);

    agent.restart(&mut journal);
    agent.tick(&mut journal);
    assert_eq!(agent.current(), Some(a));
    assert_eq!(journal.count("a:begin"), 2);
}

#[test]
fn any_node_interrupts_every_state() {
    let mut graph = Graph::new("interrupt");
    let any = graph.add_node("any", Idle, RepeatMode::RunOnce);
    let a = graph.add_node("a", Recorder::new("a"), RepeatMode::RunOnce);
    let b = graph.add_node("b", Recorder::new("b"), RepeatMode::RunOnce);
    let flee = graph.add_node("flee", Recorder::new("flee"), RepeatMode::RunOnce);
    graph.set_entry(Some(a)).unwrap();
    graph.set_any(Some(any)).unwrap();
    graph
        .connect(a, b, Combine::Sum, vec![constant(1.0)])
        .unwrap();
    graph
        .connect(any, flee, Combine::Sum, vec![constant(5.0)])
        .unwrap();

    let mut journal = Journal::default();
    let mut agent = Agent::with_graph(Arc::new(graph));
    agent.tick(&mut journal);
    agent.end_current(Outcome::Succeeded, &mut journal);
    agent.tick(&mut journal);
    assert_eq!(agent.current(), Some(flee));
}

#[test]
fn one_transition_per_tick_through_instant_states() {
    let mut graph = Graph::new("chain");
    let ids: Vec<NodeId> = (0..4)
        .map(|i| {
            graph.add_node(
                format!("n{i}"),
                Instant(Outcome::Succeeded),
                RepeatMode::RunOnce,
            )
        })
        .collect();
    graph.set_entry(Some(ids[0])).unwrap();
    for pair in ids.windows(2) {
        graph.connect(pair[0], pair[1], Combine::Sum, Vec::new()).unwrap();
    }

    let mut agent = Agent::with_graph(Arc::new(graph));
    // Entering the entry node is not a transition, so the first tick also
    // takes the first hop.
    agent.tick(&mut ());
    assert_eq!(agent.current(), Some(ids[1]));
    agent.tick(&mut ());
    assert_eq!(agent.current(), Some(ids[2]));
    agent.tick(&mut ());
    assert_eq!(agent.current(), Some(ids[3]));
    agent.tick(&mut ());
    assert_eq!(agent.current(), Some(ids[3]));
    assert!(agent.is_waiting());
}

#[test]
fn random_conditions_follow_the_agent_seed() {
    let build = || {
        let mut graph = Graph::<()>::new("dice");
        let hub = graph.add_node("hub", Instant(Outcome::Succeeded), RepeatMode::RunOnce);
        let left = graph.add_node("left", Instant(Outcome::Succeeded), RepeatMode::RestartGraph);
        let right = graph.add_node("right", Instant(Outcome::Succeeded), RepeatMode::RestartGraph);
        graph.set_entry(Some(hub)).unwrap();
        graph
            .connect(hub, left, Combine::Sum, vec![random(0.0, 1.0)])
            .unwrap();
        graph
            .connect(hub, right, Combine::Sum, vec![random(0.0, 1.0)])
            .unwrap();
        Arc::new(graph)
    };

    let walk = |seed: u64| {
        let graph = build();
        let mut agent = Agent::new(&AgentConfig::with_seed(seed));
        agent.restore(&Default::default(), graph);
        (0..40)
            .map(|_| {
                agent.tick(&mut ());
                agent.current_node().map(|n| n.name().to_owned())
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(walk(9), walk(9));

    let visited = walk(9);
    assert!(visited.iter().any(|n| n.as_deref() == Some("left")));
    assert!(visited.iter().any(|n| n.as_deref() == Some("right")));
}

#[test]
fn custom_random_source_is_used() {
    struct Fixed(u32);
    impl RandomSource for Fixed {
        fn next_u32(&mut self) -> u32 {
            self.0
        }
    }

    let mut graph = Graph::<()>::new("fixed");
    let a = graph.add_node("a", Instant(Outcome::Succeeded), RepeatMode::RunOnce);
    let b = graph.add_node("b", Idle, RepeatMode::RunOnce);
    graph.set_entry(Some(a)).unwrap();
    // A zero draw maps to `min`, which never clears the 0 threshold here.
    graph
        .connect(a, b, Combine::Sum, vec![random(0.0, 1.0)])
        .unwrap();

    let mut agent = Agent::with_graph(Arc::new(graph)).with_random_source(Fixed(0));
    for _ in 0..5 {
        agent.tick(&mut ());
    }
    assert_eq!(agent.current(), Some(a));
    assert!(agent.is_waiting());

    let mut seeded = Pcg32::new(1);
    assert!(seeded.next_f32() < 1.0);
}

#[test]
fn outcome_routes_to_success_or_recovery() {
    let run = |outcome: Outcome| {
        let mut graph = Graph::new("attempt");
        let attempt = graph.add_node("try", Recorder::ending("try", outcome), RepeatMode::RunOnce);
        let done = graph.add_node("done", Recorder::new("done"), RepeatMode::RunOnce);
        let recover = graph.add_node("recover", Recorder::new("recover"), RepeatMode::RunOnce);
        graph.set_entry(Some(attempt)).unwrap();
        graph
            .connect(attempt, done, Combine::Sum, vec![success_check(1.0)])
            .unwrap();
        graph
            .connect(
                attempt,
                recover,
                Combine::Sum,
                vec![condition_fn(|eval: &mut Evaluation<'_, Journal>| {
                    let tried = eval.host().count("try:begin") > 0;
                    if tried && eval.outcome().is_failure() { 1.0 } else { 0.0 }
                })],
            )
            .unwrap();

        let mut journal = Journal::default();
        let mut agent = Agent::with_graph(Arc::new(graph));
        agent.tick(&mut journal);
        agent.current_node().map(|n| n.name().to_owned())
    };

    assert_eq!(run(Outcome::Succeeded).as_deref(), Some("done"));
    assert_eq!(run(Outcome::Failed).as_deref(), Some("recover"));
}
