//! Integration Tests for the Reactive System
//!
//! These tests verify that signals, stores, and effects work together
//! through the public API only.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use rivulet_core::reactive::{ReactiveContext, Runtime};
use rivulet_core::{
    create_effect, create_signal, create_store, Computation, Config, Effect, FailurePolicy,
    ReadSignal, Signal, Store, WriteSignal,
};

/// Creating a signal, tracking it in an effect, and writing it.
#[test]
fn effect_records_initial_and_updated_value() {
    let (get, set) = create_signal(3);
    let results = Arc::new(Mutex::new(Vec::new()));

    create_effect({
        let results = results.clone();
        move || results.lock().push(get.get())
    });
    assert_eq!(*results.lock(), vec![3]);

    set.set(5);
    assert_eq!(*results.lock(), vec![3, 5]);
}

/// Repeated reads within one run still produce one re-run per write.
#[test]
fn one_rerun_per_write_despite_repeated_reads() {
    let signal = Signal::new(1);
    let runs = Arc::new(AtomicI32::new(0));

    let _effect = Effect::new({
        let signal = signal.clone();
        let runs = runs.clone();
        move || {
            let _ = signal.get() + signal.get() + signal.get();
            runs.fetch_add(1, Ordering::SeqCst);
        }
    });

    signal.set(2);
    signal.set(3);
    assert_eq!(runs.load(Ordering::SeqCst), 3);
}

/// A cell the effect never read does not re-run it.
#[test]
fn unread_cell_does_not_notify() {
    let read = Signal::new(0);
    let unread = Signal::new(0);
    let runs = Arc::new(AtomicI32::new(0));

    let _effect = Effect::new({
        let read = read.clone();
        let runs = runs.clone();
        move || {
            read.get();
            runs.fetch_add(1, Ordering::SeqCst);
        }
    });

    unread.set(10);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(unread.subscriber_count(), 0);
}

/// Reads made outside `Runtime::run_tracked`, or inside `Runtime::untracked`,
/// never subscribe anything.
#[test]
fn reads_outside_tracked_runs_never_subscribe() {
    let signal = Signal::new(0);
    let store = create_store([("a", 1), ("b", 2)]);

    signal.get();
    signal.with(|_| ());
    store.get("a");
    store.keys();
    store.len();
    store.contains_key("b");

    assert!(!Runtime::is_tracking());
    assert_eq!(ReactiveContext::depth(), 0);
    assert_eq!(signal.subscriber_count(), 0);
    assert_eq!(store.subscriber_count(), 0);

    let computation = {
        let signal = signal.clone();
        let store = store.clone();
        Computation::new(move || {
            Runtime::untracked(|| {
                signal.get();
                store.get("a");
            });
        })
    };
    Runtime::run_tracked(&computation);

    assert_eq!(ReactiveContext::depth(), 0);
    assert_eq!(signal.subscriber_count(), 0);
    assert_eq!(store.subscriber_count(), 0);
}

/// Running the same computation twice leaves one registration.
#[test]
fn re_registration_is_idempotent() {
    let signal = Signal::new(0);
    let runs = Arc::new(AtomicI32::new(0));

    let computation = {
        let signal = signal.clone();
        let runs = runs.clone();
        Computation::new(move || {
            signal.get();
            runs.fetch_add(1, Ordering::SeqCst);
        })
    };

    Runtime::run_tracked(&computation);
    Runtime::run_tracked(&computation);
    assert_eq!(signal.subscriber_count(), 1);

    signal.set(1);
    assert_eq!(runs.load(Ordering::SeqCst), 3);
}

/// Reading one key of a store subscribes to writes on every key.
#[test]
fn store_tracks_whole_bag() {
    let profiles = create_store([("one", "one".to_string()), ("two", "two".to_string())]);
    let seen = Arc::new(Mutex::new(Vec::new()));

    create_effect({
        let profiles = profiles.clone();
        let seen = seen.clone();
        move || seen.lock().push(profiles.get("one"))
    });

    profiles.set("two", "z".to_string());

    assert_eq!(
        *seen.lock(),
        vec![Some("one".to_string()), Some("one".to_string())]
    );
}

/// Observers run in the order they first subscribed.
#[test]
fn fan_out_follows_subscription_order() {
    let signal = Signal::new(0);
    let order = Arc::new(Mutex::new(Vec::new()));

    for name in ["F1", "F2"] {
        let signal = signal.clone();
        let order = order.clone();
        create_effect(move || {
            signal.get();
            order.lock().push(name);
        });
    }
    order.lock().clear();

    signal.set(1);
    assert_eq!(*order.lock(), vec!["F1", "F2"]);
}

/// Signals built with equal initial values stay independent.
#[test]
fn independent_signals_do_not_cross_notify() {
    let a = Signal::new(0);
    let b = Signal::new(0);
    let a_runs = Arc::new(AtomicI32::new(0));
    let b_runs = Arc::new(AtomicI32::new(0));

    let _ea = Effect::new({
        let a = a.clone();
        let a_runs = a_runs.clone();
        move || {
            a.get();
            a_runs.fetch_add(1, Ordering::SeqCst);
        }
    });
    let _eb = Effect::new({
        let b = b.clone();
        let b_runs = b_runs.clone();
        move || {
            b.get();
            b_runs.fetch_add(1, Ordering::SeqCst);
        }
    });

    a.set(1);
    assert_eq!(a_runs.load(Ordering::SeqCst), 2);
    assert_eq!(b_runs.load(Ordering::SeqCst), 1);
}

/// An effect created inside another effect gets its own reads, and the
/// outer effect keeps the reads made after the inner one returns.
#[test]
fn nested_effects_attribute_reads_to_innermost() {
    let outer_signal = Signal::new(0);
    let inner_signal = Signal::new(0);
    let outer_runs = Arc::new(AtomicI32::new(0));
    let inner_runs = Arc::new(AtomicI32::new(0));

    let _outer = Effect::new({
        let outer_signal = outer_signal.clone();
        let inner_signal = inner_signal.clone();
        let outer_runs = outer_runs.clone();
        let inner_runs = inner_runs.clone();
        move || {
            outer_runs.fetch_add(1, Ordering::SeqCst);
            if outer_runs.load(Ordering::SeqCst) == 1 {
                let inner_signal = inner_signal.clone();
                let inner_runs = inner_runs.clone();
                create_effect(move || {
                    inner_signal.get();
                    inner_runs.fetch_add(1, Ordering::SeqCst);
                });
            }
            outer_signal.get();
        }
    });

    assert_eq!(inner_signal.subscriber_count(), 1);
    assert_eq!(outer_signal.subscriber_count(), 1);

    inner_signal.set(1);
    assert_eq!(inner_runs.load(Ordering::SeqCst), 2);
    assert_eq!(outer_runs.load(Ordering::SeqCst), 1);

    outer_signal.set(1);
    assert_eq!(outer_runs.load(Ordering::SeqCst), 2);
    assert_eq!(inner_runs.load(Ordering::SeqCst), 2);
}

/// A write made from inside a tracked run does not attribute the notified
/// observer's reads to the writer.
#[test]
fn write_inside_run_keeps_attribution() {
    let source = Signal::new(0);
    let trigger = Signal::new(0);

    let _reader = Effect::new({
        let source = source.clone();
        move || {
            source.get();
        }
    });

    let writer = Effect::new({
        let source = source.clone();
        let trigger = trigger.clone();
        move || {
            let value = trigger.get();
            source.set(value);
        }
    });

    // Only the reader observes `source`.
    assert_eq!(source.subscriber_count(), 1);
    assert_eq!(trigger.subscriber_count(), 1);

    trigger.set(7);
    assert_eq!(source.get_untracked(), 7);
    assert_eq!(source.subscriber_count(), 1);
    assert_eq!(writer.run_count(), 2);
}

/// The tracking marker is restored after an observer panics.
#[test]
fn panicking_observer_leaves_context_clean() {
    let signal = Signal::new(0);
    let _effect = Effect::new({
        let signal = signal.clone();
        move || {
            if signal.get() == 1 {
                panic!("render failed");
            }
        }
    });

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| signal.set(1)));
    assert!(result.is_err());
    assert!(!Runtime::is_tracking());
    assert_eq!(ReactiveContext::depth(), 0);
    assert_eq!(signal.get_untracked(), 1);
}

/// Under the isolate policy every observer runs even if one panics.
#[test]
fn isolate_policy_notifies_everyone() {
    let previous =
        Runtime::set_config(Config::default().with_failure_policy(FailurePolicy::Isolate));

    let signal = Signal::new(0);
    let reached = Arc::new(AtomicI32::new(0));

    let _failing = Effect::new({
        let signal = signal.clone();
        move || {
            if signal.get() > 0 {
                panic!("first observer fails");
            }
        }
    });
    let _after = Effect::new({
        let signal = signal.clone();
        let reached = reached.clone();
        move || {
            signal.get();
            reached.fetch_add(1, Ordering::SeqCst);
        }
    });

    signal.set(1);
    assert_eq!(reached.load(Ordering::SeqCst), 2);

    Runtime::set_config(previous);
}

// ----------------------------------------------------------------------------
// Console components
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Profile {
    id: String,
}

struct Component {
    global_count: ReadSignal<i32>,
    profiles: Store<&'static str, Profile>,
    local_count: ReadSignal<i32>,
    set_local_count: WriteSignal<i32>,
}

impl Component {
    fn new(global_count: ReadSignal<i32>) -> Arc<Self> {
        let profiles = create_store([
            ("one", Profile { id: "one".into() }),
            ("two", Profile { id: "two".into() }),
        ]);
        let (local_count, set_local_count) = create_signal(30);
        Arc::new(Self {
            global_count,
            profiles,
            local_count,
            set_local_count,
        })
    }

    fn render(&self) -> String {
        let profile_id = self.profiles.get("one").map(|p| p.id).unwrap_or_default();
        format!(
            "The global count is {}, local count is {} and profiles.one.id is {}",
            self.global_count.get(),
            self.local_count.get(),
            profile_id
        )
    }

    fn handle_click(&self) {
        self.profiles.set("one", Profile { id: "newOne".into() });
    }
}

/// Two components sharing a global counter, driven through a click, a
/// local update, and a global update.
#[test]
fn component_scenario_renders_in_order() {
    let (global_count, set_global_count) = create_signal(3);
    let first = Component::new(global_count.clone());
    let second = Component::new(global_count);
    let output = Arc::new(Mutex::new(Vec::new()));

    for (label, component) in [("Comp #1", &first), ("Comp #2", &second)] {
        let component = Arc::clone(component);
        let output = output.clone();
        create_effect(move || output.lock().push(format!("{label}: {}", component.render())));
    }

    first.handle_click();
    first.set_local_count.set(50);
    set_global_count.set(5);

    assert_eq!(
        *output.lock(),
        vec![
            "Comp #1: The global count is 3, local count is 30 and profiles.one.id is one",
            "Comp #2: The global count is 3, local count is 30 and profiles.one.id is one",
            "Comp #1: The global count is 3, local count is 30 and profiles.one.id is newOne",
            "Comp #1: The global count is 3, local count is 50 and profiles.one.id is newOne",
            "Comp #1: The global count is 5, local count is 50 and profiles.one.id is newOne",
            "Comp #2: The global count is 5, local count is 30 and profiles.one.id is one",
        ]
    );
}
