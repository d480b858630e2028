use std::rc::Rc;

use typebus::{
    Error, Route, Router, Source, Subject,
    monitors::DeliveryStats,
    testing::{Journal, JournalEntry, Probe},
};

#[derive(Debug, Clone, PartialEq)]
struct Temperature(i32);

#[derive(Debug, Clone, PartialEq)]
struct Shutdown;

#[test]
fn probes_only_see_their_own_type() {
    let subject = Subject::new();
    let temps = Probe::<Temperature>::new();
    let stops = Probe::<Shutdown>::new();
    subject.subscribe(Rc::new(temps.clone()));
    subject.subscribe(Rc::new(stops.clone()));

    subject.publish(&Temperature(20)).unwrap();
    subject.publish(&Temperature(21)).unwrap();
    subject.publish(&Shutdown).unwrap();

    assert_eq!(temps.received(), vec![Temperature(20), Temperature(21)]);
    assert_eq!(stops.count(), 1);
}

#[test]
fn journal_orders_deliveries_across_sinks() {
    let subject = Subject::new();
    let journal = Journal::new();
    subject.subscribe(journal.sink("audit"));
    subject.subscribe(journal.typed_sink::<Temperature>("thermostat"));
    subject.subscribe(journal.typed_sink::<Shutdown>("power"));

    subject.publish(&Temperature(5)).unwrap();
    subject.publish(&Shutdown).unwrap();

    assert_eq!(
        journal.sinks(),
        vec!["audit", "thermostat", "audit", "power"]
    );
    assert_eq!(
        journal.entries()[1],
        JournalEntry {
            sink: "thermostat".into(),
            message: std::any::type_name::<Temperature>(),
            route: Route::Exact,
        }
    );
}

#[test]
fn failing_sink_hides_everything_after_it() {
    let subject = Subject::new();
    let journal = Journal::new();
    let stats = DeliveryStats::new();
    subject.monitors().add(stats.clone());

    subject.subscribe(journal.sink("first"));
    subject.subscribe(journal.failing_sink("broken", Error::sink("offline")));
    subject.subscribe(journal.sink("never"));

    let result = subject.publish(&Shutdown);

    assert_eq!(result, Err(Error::sink("offline")));
    assert_eq!(journal.sinks(), vec!["first", "broken"]);
    assert_eq!(stats.delivered::<Shutdown>(), 1);
    assert_eq!(stats.failed::<Shutdown>(), 1);
}

#[test]
fn forwarding_subject_relays_to_its_own_subscribers() {
    let upstream = Subject::new();
    let downstream = Subject::new();
    let temps = Probe::<Temperature>::new();
    downstream.subscribe(Rc::new(temps.clone()));

    let router = Router::new().on(|_: &Temperature| Ok(()));
    upstream.subscribe(Rc::new(router));
    let relay = upstream.subscribe(Rc::new(downstream.clone()));

    upstream.publish(&Temperature(30)).unwrap();
    relay.dispose();
    upstream.publish(&Temperature(31)).unwrap();

    assert_eq!(temps.received(), vec![Temperature(30)]);
}
