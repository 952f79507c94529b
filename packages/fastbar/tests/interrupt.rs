//! The interrupt request is process-wide, so everything that depends on it
//! is in one test
use std::sync::Arc;

mod common;

#[test]
fn test_interrupt_request_stops_traversals() {
    let (renderer, _) = common::terminal();
    let iter = fastbar::progress().renderer(renderer).wrap(0..10).unwrap();
    let bar = Arc::clone(iter.bar());
    let mut seen = vec![];
    for i in iter {
        seen.push(i);
        if i == 2 {
            fastbar::__request_interrupt();
        }
    }
    assert_eq!(seen, vec![0, 1, 2]);
    assert!(fastbar::ctrlc_requested());
    assert!(bar.is_interrupted());
    assert!(!bar.is_active());

    // the outer loop stops too, and the master bar still ends
    let (renderer, surface) = common::rich();
    let mut epochs = fastbar::master().renderer(renderer).wrap(0..3).unwrap();
    let mb = Arc::clone(epochs.bar());
    assert!(epochs.next().is_none());
    assert!(mb.primary().is_interrupted());
    assert!(surface.last_markup().starts_with("Total time: "));
    drop(epochs);

    fastbar::reset_ctrlc();
    assert!(!fastbar::ctrlc_requested());
    let (renderer, _) = common::terminal();
    assert_eq!(fastbar::progress().renderer(renderer).wrap(0..10).unwrap().count(), 10);
}
