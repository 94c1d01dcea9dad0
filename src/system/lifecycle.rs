//! Whole-subtree terminate / suspend / resume.
//!
//! Each operation rebuilds the tree from a fresh query, so it acts on the
//! hierarchy as it is now, not as the last refresh saw it. Signals go out in
//! a fixed order; failures on descendants are recorded and skipped, and the
//! outcome is decided by the root signal alone.

use std::sync::Arc;

use serde::Serialize;

use super::signal::{CascadeSignal, SignalResult, Signaller};
use super::source::ProcessSource;
use super::tree::{ProcessTree, build_tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleAction {
    Terminate,
    Suspend,
    Resume,
}

impl LifecycleAction {
    pub fn signal(self) -> CascadeSignal {
        match self {
            LifecycleAction::Terminate => CascadeSignal::Kill,
            LifecycleAction::Suspend => CascadeSignal::Stop,
            LifecycleAction::Resume => CascadeSignal::Continue,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            LifecycleAction::Terminate => "kill",
            LifecycleAction::Suspend => "pause",
            LifecycleAction::Resume => "resume",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            LifecycleAction::Terminate => "Killed",
            LifecycleAction::Suspend => "Paused",
            LifecycleAction::Resume => "Resumed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Root,
    Descendant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub pid: u32,
    pub target: Target,
}

/// Signal order for `action` over `root` and its pre-order `descendants`:
/// terminate goes deepest-first then root, suspend goes forward then root,
/// resume goes root first then forward.
pub fn plan(action: LifecycleAction, root: u32, descendants: &[u32]) -> Vec<Step> {
    let root_step = Step {
        pid: root,
        target: Target::Root,
    };
    let descendant = |&pid: &u32| Step {
        pid,
        target: Target::Descendant,
    };

    let mut steps = Vec::with_capacity(descendants.len() + 1);
    match action {
        LifecycleAction::Terminate => {
            steps.extend(descendants.iter().rev().map(descendant));
            steps.push(root_step);
        }
        LifecycleAction::Suspend => {
            steps.extend(descendants.iter().map(descendant));
            steps.push(root_step);
        }
        LifecycleAction::Resume => {
            steps.push(root_step);
            steps.extend(descendants.iter().map(descendant));
        }
    }
    steps
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub pid: u32,
    pub target: Target,
    pub result: SignalResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeState {
    Pending,
    Signalling { attempted: usize },
    Done { root_delivered: bool },
}

#[derive(Debug, Clone)]
pub struct CascadeReport {
    pub action: LifecycleAction,
    pub root: u32,
    pub attempts: Vec<Attempt>,
    pub root_delivered: bool,
}

impl CascadeReport {
    pub fn failed_descendants(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.target == Target::Descendant && !a.result.is_delivered())
            .count()
    }
}

/// One signal per `advance`; the root attempt always happens regardless of
/// how the descendants went.
#[derive(Debug, Clone)]
pub struct Cascade {
    action: LifecycleAction,
    root: u32,
    steps: Vec<Step>,
    attempts: Vec<Attempt>,
    root_delivered: Option<bool>,
    state: CascadeState,
}

impl Cascade {
    pub fn new(action: LifecycleAction, root: u32, tree: &ProcessTree) -> Self {
        let descendants = tree.descendants_of(root);
        Self {
            action,
            root,
            steps: plan(action, root, &descendants),
            attempts: Vec::new(),
            root_delivered: None,
            state: CascadeState::Pending,
        }
    }

    pub fn state(&self) -> CascadeState {
        self.state
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn advance(&mut self, signaller: &dyn Signaller) -> CascadeState {
        if let CascadeState::Done { .. } = self.state {
            return self.state;
        }

        let index = self.attempts.len();
        if let Some(&step) = self.steps.get(index) {
            let result = signaller.send(step.pid, self.action.signal());
            match (&result, step.target) {
                (SignalResult::Delivered, _) => {}
                (_, Target::Root) => tracing::warn!(
                    pid = step.pid,
                    signal = self.action.signal().name(),
                    ?result,
                    "root signal not delivered"
                ),
                (_, Target::Descendant) => tracing::debug!(
                    pid = step.pid,
                    signal = self.action.signal().name(),
                    ?result,
                    "descendant signal not delivered"
                ),
            }
            if step.target == Target::Root {
                self.root_delivered = Some(result.is_delivered());
            }
            self.attempts.push(Attempt {
                pid: step.pid,
                target: step.target,
                result,
            });
        }

        self.state = if self.attempts.len() >= self.steps.len() {
            CascadeState::Done {
                root_delivered: self.root_delivered.unwrap_or(false),
            }
        } else {
            CascadeState::Signalling {
                attempted: self.attempts.len(),
            }
        };
        self.state
    }

    pub fn run(mut self, signaller: &dyn Signaller) -> CascadeReport {
        while !matches!(self.advance(signaller), CascadeState::Done { .. }) {}

        let report = CascadeReport {
            action: self.action,
            root: self.root,
            root_delivered: self.root_delivered.unwrap_or(false),
            attempts: self.attempts,
        };
        tracing::info!(
            action = report.action.verb(),
            root = report.root,
            signalled = report.attempts.len(),
            failed_descendants = report.failed_descendants(),
            root_delivered = report.root_delivered,
            "cascade finished"
        );
        report
    }
}

#[derive(Clone)]
pub struct LifecycleController {
    source: Arc<dyn ProcessSource>,
    signaller: Arc<dyn Signaller>,
}

impl LifecycleController {
    pub fn new(source: Arc<dyn ProcessSource>, signaller: Arc<dyn Signaller>) -> Self {
        Self { source, signaller }
    }

    pub fn execute(&self, action: LifecycleAction, pid: u32) -> CascadeReport {
        let tree = build_tree(self.source.parent_links());
        Cascade::new(action, pid, &tree).run(self.signaller.as_ref())
    }

    pub fn terminate(&self, pid: u32) -> bool {
        self.execute(LifecycleAction::Terminate, pid).root_delivered
    }

    pub fn suspend(&self, pid: u32) -> bool {
        self.execute(LifecycleAction::Suspend, pid).root_delivered
    }

    pub fn resume(&self, pid: u32) -> bool {
        self.execute(LifecycleAction::Resume, pid).root_delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(u32, CascadeSignal)>>,
        missing: Vec<u32>,
    }

    impl Signaller for Recorder {
        fn send(&self, pid: u32, signal: CascadeSignal) -> SignalResult {
            self.calls.lock().unwrap().push((pid, signal));
            if self.missing.contains(&pid) {
                SignalResult::NotFound
            } else {
                SignalResult::Delivered
            }
        }
    }

    fn pids(steps: &[Step]) -> Vec<u32> {
        steps.iter().map(|s| s.pid).collect()
    }

    #[test]
    fn plans_follow_cascade_order() {
        let d = [11, 12, 13];
        assert_eq!(pids(&plan(LifecycleAction::Terminate, 10, &d)), vec![13, 12, 11, 10]);
        assert_eq!(pids(&plan(LifecycleAction::Suspend, 10, &d)), vec![11, 12, 13, 10]);
        assert_eq!(pids(&plan(LifecycleAction::Resume, 10, &d)), vec![10, 11, 12, 13]);
    }

    #[test]
    fn lone_root_is_single_step() {
        let steps = plan(LifecycleAction::Terminate, 7, &[]);
        assert_eq!(
            steps,
            vec![Step {
                pid: 7,
                target: Target::Root
            }]
        );
    }

    #[test]
    fn state_machine_walks_every_step() {
        let tree = build_tree([(11, 10), (12, 11)]);
        let signaller = Recorder::default();
        let mut cascade = Cascade::new(LifecycleAction::Suspend, 10, &tree);

        assert_eq!(cascade.state(), CascadeState::Pending);
        assert_eq!(cascade.advance(&signaller), CascadeState::Signalling { attempted: 1 });
        assert_eq!(cascade.advance(&signaller), CascadeState::Signalling { attempted: 2 });
        assert_eq!(
            cascade.advance(&signaller),
            CascadeState::Done {
                root_delivered: true
            }
        );
        // Further advances are no-ops.
        cascade.advance(&signaller);
        assert_eq!(signaller.calls.lock().unwrap().len(), 3);
    }

    #[test]
    fn descendant_failures_do_not_decide_outcome() {
        let tree = build_tree([(11, 10), (12, 11)]);
        let signaller = Recorder {
            missing: vec![11, 12],
            ..Recorder::default()
        };
        let report = Cascade::new(LifecycleAction::Terminate, 10, &tree).run(&signaller);
        assert!(report.root_delivered);
        assert_eq!(report.failed_descendants(), 2);
        assert_eq!(report.attempts.last().map(|a| a.pid), Some(10));
    }

    #[test]
    fn root_failure_is_reported_after_descendants() {
        let tree = build_tree([(11, 10)]);
        let signaller = Recorder {
            missing: vec![10],
            ..Recorder::default()
        };
        let report = Cascade::new(LifecycleAction::Resume, 10, &tree).run(&signaller);
        assert!(!report.root_delivered);
        assert_eq!(
            *signaller.calls.lock().unwrap(),
            vec![(10, CascadeSignal::Continue), (11, CascadeSignal::Continue)]
        );
    }
}
