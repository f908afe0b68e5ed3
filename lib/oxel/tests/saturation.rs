//! Properties of the concurrent saturation.
#![expect(clippy::unwrap_used)]

use oxel::indexing::{ClassId, OntologyIndex};
use oxel::saturation::{
    ClassExpressionSaturationFactory, ContextCompletion, RuleDeapplication, SaturationJob,
    SaturationState,
};
use oxel::{Axiom, ClassExpression, InterruptMonitor, NeverInterrupted, ObjectProperty, Ontology, OwlClass};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

fn class(name: &str) -> OwlClass {
    OwlClass::from_iri(format!("http://example.com/{name}")).unwrap()
}

fn property(name: &str) -> ObjectProperty {
    ObjectProperty::from_iri(format!("http://example.com/{name}")).unwrap()
}

fn some(property_name: &str, filler: impl Into<ClassExpression>) -> ClassExpression {
    ClassExpression::some_values_from(property(property_name), filler.into())
}

fn and(a: impl Into<ClassExpression>, b: impl Into<ClassExpression>) -> ClassExpression {
    ClassExpression::intersection([a.into(), b.into()])
}

/// Saturates every named class and returns the state.
fn saturate_all(index: &Arc<OntologyIndex>, workers: usize) -> SaturationState {
    let state = SaturationState::new(Arc::clone(index));
    let (factory, _) = ClassExpressionSaturationFactory::new(&state, workers);
    for root in index.named_classes() {
        factory.submit(SaturationJob::new(*root));
    }
    factory.wait_completion(&NeverInterrupted).unwrap();
    state
}

fn subsumers(state: &SaturationState, class: &OwlClass) -> Vec<ClassId> {
    let id = state.index().class_id(class).unwrap();
    state.context(id).unwrap().subsumers()
}

fn has_subsumer(state: &SaturationState, sub: &OwlClass, sup: &OwlClass) -> bool {
    let index = state.index();
    let sup = index.class_id(sup).unwrap();
    subsumers(state, sub).contains(&sup)
}

fn named_subsumers(state: &SaturationState) -> Vec<(ClassId, Vec<ClassId>, bool)> {
    state
        .index()
        .named_classes()
        .iter()
        .map(|root| {
            let context = state.context(*root).unwrap();
            (*root, context.subsumers(), context.is_inconsistent())
        })
        .collect()
}

/// Ontology of `size` classes with random told subsumptions, conjunctions and existentials.
fn random_ontology(seed: u64, size: usize) -> Ontology {
    let mut rng = StdRng::seed_from_u64(seed);
    let name = |i: usize| class(&format!("C{i}"));
    let mut ontology = Ontology::default();
    ontology.add_axiom(Axiom::sub_object_property_of(property("r"), property("s")));
    ontology.add_axiom(Axiom::sub_property_chain_of(
        [property("s"), property("s")],
        property("t"),
    ));
    for i in 0..size {
        let a = rng.gen_range(0..size);
        let b = rng.gen_range(0..size);
        let c = rng.gen_range(0..size);
        let axiom = match rng.gen_range(0..5) {
            0 => Axiom::subclass_of(name(i), name(a)),
            1 => Axiom::subclass_of(name(i), some("r", name(a))),
            2 => Axiom::subclass_of(and(name(a), name(b)), name(c)),
            3 => Axiom::subclass_of(some("s", name(a)), name(b)),
            _ => Axiom::subclass_of(some("t", name(a)), name(c)),
        };
        ontology.add_axiom(axiom);
    }
    ontology
}

/// Interrupts with a fixed probability on each check.
struct RandomInterrupter {
    rng: Mutex<StdRng>,
    chance: f64,
}

impl RandomInterrupter {
    fn new(seed: u64, chance: f64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            chance,
        }
    }
}

impl InterruptMonitor for RandomInterrupter {
    fn is_interrupted(&self) -> bool {
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_bool(self.chance)
    }
}

#[test]
fn test_conjunction_is_composed() {
    let ontology: Ontology = [
        Axiom::subclass_of(class("A"), class("B")),
        Axiom::subclass_of(class("A"), class("C")),
        Axiom::subclass_of(and(class("B"), class("C")), class("D")),
    ]
    .into_iter()
    .collect();
    let state = saturate_all(&Arc::new(OntologyIndex::new(&ontology).unwrap()), 2);
    assert!(has_subsumer(&state, &class("A"), &class("D")));
    assert!(!has_subsumer(&state, &class("B"), &class("D")));
}

#[test]
fn test_existential_through_sub_property() {
    let ontology: Ontology = [
        Axiom::equivalent_classes([class("B").into(), class("C").into()]),
        Axiom::subclass_of(class("A"), some("r", class("B"))),
        Axiom::sub_object_property_of(property("r"), property("s")),
        Axiom::subclass_of(some("s", class("C")), class("D")),
    ]
    .into_iter()
    .collect();
    let state = saturate_all(&Arc::new(OntologyIndex::new(&ontology).unwrap()), 4);
    assert!(has_subsumer(&state, &class("A"), &class("D")));
    assert!(!has_subsumer(&state, &class("B"), &class("D")));
}

#[test]
fn test_property_chain() {
    let ontology: Ontology = [
        Axiom::subclass_of(class("A"), some("r", class("B"))),
        Axiom::subclass_of(class("B"), some("s", class("C"))),
        Axiom::sub_property_chain_of([property("r"), property("s")], property("t")),
        Axiom::subclass_of(some("t", class("C")), class("D")),
    ]
    .into_iter()
    .collect();
    let state = saturate_all(&Arc::new(OntologyIndex::new(&ontology).unwrap()), 2);
    assert!(has_subsumer(&state, &class("A"), &class("D")));
    assert!(!has_subsumer(&state, &class("B"), &class("D")));
}

#[test]
fn test_transitive_property() {
    let ontology: Ontology = [
        Axiom::TransitiveObjectProperty(property("partOf")),
        Axiom::subclass_of(class("Finger"), some("partOf", class("Hand"))),
        Axiom::subclass_of(class("Hand"), some("partOf", class("Arm"))),
        Axiom::subclass_of(class("Arm"), some("partOf", class("Body"))),
        Axiom::equivalent_classes([
            class("BodyPart").into(),
            some("partOf", class("Body")),
        ]),
    ]
    .into_iter()
    .collect();
    let state = saturate_all(&Arc::new(OntologyIndex::new(&ontology).unwrap()), 3);
    for part in ["Finger", "Hand", "Arm"] {
        assert!(has_subsumer(&state, &class(part), &class("BodyPart")), "{part}");
    }
    assert!(!has_subsumer(&state, &class("Body"), &class("BodyPart")));
}

#[test]
fn test_unsatisfiable_filler_propagates_back() {
    let ontology: Ontology = [
        Axiom::subclass_of(class("A"), some("r", class("B"))),
        Axiom::subclass_of(class("B"), OwlClass::nothing()),
        Axiom::subclass_of(class("C"), class("A")),
    ]
    .into_iter()
    .collect();
    let state = saturate_all(&Arc::new(OntologyIndex::new(&ontology).unwrap()), 2);
    let index = state.index();
    for name in ["A", "B", "C"] {
        let id = index.class_id(&class(name)).unwrap();
        assert!(state.context(id).unwrap().is_inconsistent(), "{name}");
    }
    let thing = state.context(index.owl_thing()).unwrap();
    assert!(!thing.is_inconsistent());
}

#[test]
fn test_disjoint_classes() {
    let ontology: Ontology = [
        Axiom::disjoint_classes([class("A").into(), class("B").into()]),
        Axiom::subclass_of(class("C"), and(class("A"), class("B"))),
        Axiom::subclass_of(class("D"), class("A")),
    ]
    .into_iter()
    .collect();
    let state = saturate_all(&Arc::new(OntologyIndex::new(&ontology).unwrap()), 2);
    let index = state.index();
    let c = index.class_id(&class("C")).unwrap();
    let d = index.class_id(&class("D")).unwrap();
    assert!(state.context(c).unwrap().is_inconsistent());
    assert!(!state.context(d).unwrap().is_inconsistent());
}

#[test]
fn test_single_and_multiple_workers_agree() {
    for seed in 0..5 {
        let index = Arc::new(OntologyIndex::new(&random_ontology(seed, 60)).unwrap());
        let sequential = named_subsumers(&saturate_all(&index, 1));
        for workers in [2, 4, 8] {
            assert_eq!(
                named_subsumers(&saturate_all(&index, workers)),
                sequential,
                "seed {seed} with {workers} workers"
            );
        }
    }
}

#[test]
fn test_saturation_matches_local_closure() {
    let index = Arc::new(OntologyIndex::new(&random_ontology(42, 80)).unwrap());
    let state = saturate_all(&index, 4);
    assert!(ContextCompletion::new(&index).verify(&state).is_empty());
    assert!(state.contexts().iter().all(|c| c.is_saturated()));
}

#[test]
fn test_random_interruptions_reach_the_same_fixpoint() {
    let index = Arc::new(OntologyIndex::new(&random_ontology(7, 60)).unwrap());
    let expected = named_subsumers(&saturate_all(&index, 1));
    for workers in [1, 3] {
        let state = SaturationState::new(Arc::clone(&index));
        let (factory, finished) = ClassExpressionSaturationFactory::new(&state, workers);
        for root in index.named_classes() {
            factory.submit(SaturationJob::new(*root));
        }
        let monitor = RandomInterrupter::new(workers as u64, 0.3);
        let mut interruptions = 0;
        let mut reported = BTreeMap::<ClassId, usize>::new();
        loop {
            let result = factory.wait_completion(&monitor);
            for job in finished.try_iter() {
                assert!(job.output().unwrap().is_saturated());
                *reported.entry(job.root()).or_default() += 1;
            }
            if result.is_ok() {
                break;
            }
            interruptions += 1;
        }
        assert!(interruptions > 0);
        assert_eq!(named_subsumers(&state), expected, "{workers} workers");
        assert_eq!(reported.len(), index.named_classes().len());
        assert!(reported.values().all(|count| *count == 1), "{reported:?}");
        assert!(state.contexts().iter().all(|context| context.is_saturated()));
    }
}

#[test]
fn test_every_submitted_job_is_reported() {
    let index = Arc::new(OntologyIndex::new(&random_ontology(3, 30)).unwrap());
    let state = SaturationState::new(Arc::clone(&index));
    let (factory, finished) = ClassExpressionSaturationFactory::new(&state, 4);
    let a = index.named_classes()[2];
    for _ in 0..3 {
        factory.submit(SaturationJob::new(a));
    }
    for root in index.named_classes() {
        factory.submit(SaturationJob::new(*root));
    }
    factory.wait_completion(&NeverInterrupted).unwrap();
    let jobs: Vec<_> = finished.try_iter().collect();
    assert_eq!(jobs.len(), index.named_classes().len() + 3);
    let outputs: Vec<_> = jobs
        .iter()
        .filter(|job| job.root() == a)
        .map(|job| job.output().unwrap())
        .collect();
    assert_eq!(outputs.len(), 4);
    assert!(outputs.iter().all(|output| Arc::ptr_eq(output, outputs[0])));
    for job in jobs {
        let output = job.output().unwrap();
        assert_eq!(output.root(), job.root());
        assert!(output.is_saturated());
    }
}

/// Records the largest number of contexts not yet known to be saturated.
struct BacklogMonitor<'a> {
    state: &'a SaturationState,
    max_backlog: AtomicUsize,
}

impl InterruptMonitor for BacklogMonitor<'_> {
    fn is_interrupted(&self) -> bool {
        let created = self.state.contexts_created();
        let backlog = created.saturating_sub(self.state.contexts_saturated());
        self.max_backlog.fetch_max(backlog, Ordering::Relaxed);
        false
    }
}

#[test]
fn test_many_jobs_stay_under_the_admission_threshold() {
    let jobs = 3000;
    let ontology: Ontology = (0..jobs)
        .flat_map(|i| {
            [
                Axiom::subclass_of(class(&format!("C{i}")), some("r", class(&format!("F{i}")))),
                Axiom::subclass_of(class(&format!("F{i}")), class("G")),
            ]
        })
        .collect();
    let index = Arc::new(OntologyIndex::new(&ontology).unwrap());
    let workers = 4;
    let state = SaturationState::new(Arc::clone(&index));
    let (factory, finished) = ClassExpressionSaturationFactory::new(&state, workers);
    let roots: Vec<_> = (0..jobs)
        .map(|i| index.class_id(&class(&format!("C{i}"))).unwrap())
        .collect();
    for root in &roots {
        factory.submit(SaturationJob::new(*root));
    }
    let monitor = BacklogMonitor {
        state: &state,
        max_backlog: AtomicUsize::new(0),
    };
    factory.wait_completion(&monitor).unwrap();

    let mut reported: Vec<_> = finished.try_iter().map(|job| job.root()).collect();
    reported.sort_unstable();
    let mut expected = roots.clone();
    expected.sort_unstable();
    assert_eq!(reported, expected);
    let contexts = state.contexts();
    assert_eq!(contexts.len(), 2 * jobs);
    assert!(contexts.iter().all(|context| context.is_saturated()));
    assert_eq!(state.contexts_saturated(), state.contexts_created());
    // Jobs are admitted under the threshold and create two contexts each, which
    // other workers may add while a worker checks the threshold
    let threshold = 64 + 32 * workers;
    assert!(monitor.max_backlog.load(Ordering::Relaxed) <= threshold + 4 * workers);
}

#[test]
fn test_reflexive_property() {
    let ontology: Ontology = [
        Axiom::ReflexiveObjectProperty(property("r")),
        Axiom::subclass_of(class("A"), class("B")),
        Axiom::subclass_of(some("r", class("B")), class("C")),
        Axiom::subclass_of(some("s", class("A")), class("D")),
    ]
    .into_iter()
    .collect();
    let index = Arc::new(OntologyIndex::new(&ontology).unwrap());
    for workers in [1, 2] {
        let state = saturate_all(&index, workers);
        assert!(has_subsumer(&state, &class("A"), &class("C")));
        assert!(has_subsumer(&state, &class("B"), &class("C")));
        assert!(!has_subsumer(&state, &class("A"), &class("D")));
        assert!(ContextCompletion::new(&index).verify(&state).is_empty());
    }
}

#[test]
fn test_saturated_contexts_are_frozen() {
    let ontology: Ontology = [
        Axiom::subclass_of(class("B"), some("r", class("A"))),
        Axiom::subclass_of(some("r", class("A")), class("C")),
        Axiom::subclass_of(class("A"), class("D")),
    ]
    .into_iter()
    .collect();
    let index = Arc::new(OntologyIndex::new(&ontology).unwrap());
    let state = SaturationState::new(Arc::clone(&index));
    let a = index.class_id(&class("A")).unwrap();
    let b = index.class_id(&class("B")).unwrap();

    let (factory, _) = ClassExpressionSaturationFactory::new(&state, 2);
    factory.submit(SaturationJob::new(a));
    factory.wait_completion(&NeverInterrupted).unwrap();
    let before = state.context(a).unwrap().subsumers();
    assert!(state.context(a).unwrap().is_saturated());

    let (factory, _) = ClassExpressionSaturationFactory::new(&state, 2);
    factory.submit(SaturationJob::new(b));
    factory.wait_completion(&NeverInterrupted).unwrap();
    assert_eq!(state.context(a).unwrap().subsumers(), before);
    assert!(has_subsumer(&state, &class("B"), &class("C")));
    assert!(state.context(a).unwrap().read().backward_link_count() > 0);
}

#[test]
fn test_deapplication_and_resaturation() {
    let index = Arc::new(OntologyIndex::new(&random_ontology(11, 50)).unwrap());
    let state = saturate_all(&index, 2);
    let expected = named_subsumers(&state);
    let roots: Vec<_> = index.named_classes().iter().copied().step_by(7).collect();

    let deapplication = RuleDeapplication::new(&state);
    let modified = deapplication.deapply(roots, &NeverInterrupted).unwrap();
    assert!(!modified.is_empty());
    assert!(modified.iter().all(|c| !c.is_saturated()));

    deapplication
        .resaturate(&modified, 3, &NeverInterrupted)
        .unwrap();
    assert_eq!(named_subsumers(&state), expected);
}

#[test]
fn test_statistics_are_counted() {
    let index = Arc::new(OntologyIndex::new(&random_ontology(5, 40)).unwrap());
    let state = saturate_all(&index, 2);
    let snapshot = state.statistics().snapshot();
    assert_eq!(snapshot.contexts_created, state.context_count() as u64);
    assert_eq!(snapshot.jobs_finished, index.named_classes().len() as u64);
    assert!(snapshot.total_used() <= snapshot.total_produced());
    assert!(snapshot.rules_applied > 0);
}
