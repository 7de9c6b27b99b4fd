use photo_edit::EventStream;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn delivery_follows_subscription_order() {
    let stream: EventStream<i32> = EventStream::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&order);
    let _a = stream.subscribe(move |value: &i32| first.borrow_mut().push(("a", *value)));
    let second = Rc::clone(&order);
    let _b = stream.subscribe(move |value: &i32| second.borrow_mut().push(("b", *value)));

    stream.fire(&7);
    stream.fire(&8);

    assert_eq!(
        *order.borrow(),
        vec![("a", 7), ("b", 7), ("a", 8), ("b", 8)]
    );
}

#[test]
fn cloned_handles_share_the_subscriber_list() {
    let stream: EventStream<u8> = EventStream::new();
    let clone = stream.clone();

    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let _sub = clone.subscribe(move |_| *sink.borrow_mut() += 1);

    stream.fire(&0);
    assert_eq!(*count.borrow(), 1);
    assert_eq!(stream.subscriber_count(), 1);
}

#[test]
fn dropping_a_subscription_stops_delivery() {
    let stream: EventStream<u8> = EventStream::new();
    let count = Rc::new(RefCell::new(0));

    let sink = Rc::clone(&count);
    let kept = Rc::clone(&count);
    let sub = stream.subscribe(move |_| *sink.borrow_mut() += 1);
    let _kept = stream.subscribe(move |_| *kept.borrow_mut() += 10);

    stream.fire(&0);
    drop(sub);
    stream.fire(&0);

    assert_eq!(*count.borrow(), 21);
    assert_eq!(stream.subscriber_count(), 1);
}

#[test]
fn firing_with_no_subscribers_is_a_no_op() {
    let stream: EventStream<String> = EventStream::new();
    stream.fire(&"nobody home".to_owned());
    assert_eq!(stream.subscriber_count(), 0);
}
