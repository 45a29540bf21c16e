#![forbid(unsafe_code)]

//! End-to-end semantics of the observable containers through the public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_core::Error;
use trellis_reactive::{
    Channel, Dispatcher, ObservableRecord, PropertyChanged, PropertyDefined, PropertyDeleted,
};

#[test]
fn define_change_delete_lifecycle() {
    let record: ObservableRecord<String, i32> = ObservableRecord::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = Rc::clone(&log);
    let defined = Channel::observer(move |change: &PropertyDefined<String, i32>, _| {
        l.borrow_mut().push(format!("defined {}={}", change.key, change.value));
    });
    record.on_defined().subscribe(&defined);

    let l = Rc::clone(&log);
    let changed = Channel::observer(move |change: &PropertyChanged<String, i32>, _| {
        l.borrow_mut().push(format!(
            "changed {}: {} -> {}",
            change.key, change.old_value, change.new_value
        ));
    });
    record.on_changed().subscribe(&changed);

    let l = Rc::clone(&log);
    let deleted = Channel::observer(move |change: &PropertyDeleted<String, i32>, _| {
        l.borrow_mut().push(format!("deleted {}={}", change.key, change.value));
    });
    record.on_deleted().subscribe(&deleted);

    record.set("x".to_string(), 1);
    record.set("x".to_string(), 1); // equal write: silent
    record.set("x".to_string(), 2);
    record.remove(&"x".to_string());

    assert_eq!(
        *log.borrow(),
        vec![
            "defined x=1".to_string(),
            "changed x: 1 -> 2".to_string(),
            "deleted x=2".to_string(),
        ]
    );
}

#[test]
fn one_record_per_mutation_across_channels() {
    let record: ObservableRecord<String, i32> = ObservableRecord::new();
    let total = Rc::new(Cell::new(0));

    let t = Rc::clone(&total);
    let defined = Channel::observer(move |_: &PropertyDefined<String, i32>, _| {
        t.set(t.get() + 1);
    });
    record.on_defined().subscribe(&defined);

    let t = Rc::clone(&total);
    let changed = Channel::observer(move |_: &PropertyChanged<String, i32>, _| {
        t.set(t.get() + 1);
    });
    record.on_changed().subscribe(&changed);

    record.set("a".to_string(), 1); // defined
    record.set("b".to_string(), 2); // defined
    record.set("a".to_string(), 3); // changed
    record.set("a".to_string(), 3); // silent

    assert_eq!(total.get(), 3);
}

#[test]
fn dispatcher_rejects_channel_from_another_hub() {
    let subject_a = Dispatcher::new(0_i32);
    let subject_b = Dispatcher::new(0_i32);
    let channel_of_b = subject_b.create_channel::<String>();

    let err = subject_a
        .notify(&channel_of_b, &"stray".to_string())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));

    // The rightful owner still delivers.
    let seen = Rc::new(Cell::new(false));
    let s = Rc::clone(&seen);
    let obs = Channel::observer(move |_: &String, _: &i32| s.set(true));
    channel_of_b.subscribe(&obs);
    subject_b.notify(&channel_of_b, &"ok".to_string()).unwrap();
    assert!(seen.get());
}

#[test]
fn observer_subscribing_another_observer_mid_delivery() {
    let record: ObservableRecord<String, i32> = ObservableRecord::new();
    record.set("x".to_string(), 0);

    let late_calls = Rc::new(Cell::new(0));
    let late = {
        let c = Rc::clone(&late_calls);
        Channel::observer(move |_: &PropertyChanged<String, i32>, _| c.set(c.get() + 1))
    };

    let channel = record.on_changed().clone();
    let late_clone = Rc::clone(&late);
    let recruiter = Channel::observer(move |_: &PropertyChanged<String, i32>, _| {
        channel.subscribe(&late_clone);
    });
    record.on_changed().subscribe(&recruiter);

    record.set("x".to_string(), 1);
    assert_eq!(late_calls.get(), 0, "no in-flight delivery to new subscriber");

    record.set("x".to_string(), 2);
    assert_eq!(late_calls.get(), 1);
}
