use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex};

use common::Event;
use fastbar::Config;

mod common;

#[test]
fn test_terminal_bar_full_run() {
    let (renderer, output) = common::terminal();
    let mut seen = vec![];
    for i in fastbar::progress().renderer(renderer).wrap(0..5).unwrap() {
        seen.push(i);
    }
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    let text = output.text();
    let lines = text.split_terminator('\r').filter(|x| !x.is_empty()).collect::<Vec<_>>();
    assert!(lines[0].starts_with(" |"));
    assert!(lines[0].ends_with("| 0.00% [0/5 00:00<00:00]"));
    let last = lines.last().unwrap();
    assert!(last.starts_with(" |\u{2588}"));
    assert!(last.contains("| 100.00% [5/5 00:00<00:00]"), "{last}");
    // kept: not erased
    assert!(!last.trim().is_empty());
}

#[test]
fn test_terminal_bar_not_kept_is_erased() {
    let (renderer, output) = common::terminal();
    let iter = fastbar::progress()
        .renderer(renderer)
        .leave(false)
        .wrap(vec!["a", "b"])
        .unwrap();
    assert_eq!(iter.count(), 2);
    let text = output.text();
    let last = text
        .split_terminator('\r')
        .filter(|x| !x.is_empty())
        .last()
        .unwrap()
        .to_string();
    assert!(last.chars().all(|c| c == ' '));
    let longest = text
        .split_terminator('\r')
        .map(|x| x.chars().count())
        .max()
        .unwrap();
    assert_eq!(last.len(), longest);
}

#[test]
fn test_no_bar_prints_nothing() {
    let (renderer, output) = common::terminal_with(Config {
        no_bar: true,
        ..Config::default()
    });
    let total: i32 = fastbar::progress().renderer(renderer).wrap(1..=4).unwrap().sum();
    assert_eq!(total, 10);
    assert_eq!(output.text(), "");
}

#[test]
fn test_comment_in_label() {
    let (renderer, output) = common::terminal();
    let iter = fastbar::progress()
        .renderer(renderer)
        .comment("loss 0.5")
        .wrap(0..1)
        .unwrap();
    let bar = Arc::clone(iter.bar());
    for _ in iter {
        bar.set_comment("loss 0.25");
    }
    let text = output.text();
    assert!(text.contains("| 0.00% [0/1 00:00<00:00 loss 0.5]\r"));
    assert!(text.contains("| 100.00% [1/1 00:00<00:00 loss 0.25]\r"));
}

#[test]
fn test_empty_input_warns_once() {
    common::capture_logs();
    let (renderer, output) = common::terminal();
    let iter = fastbar::progress()
        .renderer(renderer)
        .wrap(Vec::<u32>::new())
        .unwrap();
    let bar = Arc::clone(iter.bar());
    assert_eq!(iter.count(), 0);
    assert!(!bar.is_active());
    assert!(!bar.is_interrupted());
    // running the same bar again does not warn again
    assert_eq!(bar.traverse(Vec::<u32>::new()).count(), 0);

    let warnings = common::logs()
        .into_iter()
        .filter(|(level, _)| *level == log::Level::Warn)
        .collect::<Vec<_>>();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].1, "generator is empty");
    assert!(output.text().contains("| 100% [0/0]\r"));
}

#[test]
fn test_end_twice_is_end_once() {
    let (renderer, output) = common::terminal();
    let bar = fastbar::progress()
        .renderer(renderer)
        .leave(false)
        .total(10)
        .spawn()
        .unwrap();
    fastbar::progress!(bar = 3);
    bar.end();
    let after_first = output.text();
    bar.end();
    assert_eq!(output.text(), after_first);
    assert!(!bar.is_active());
}

#[test]
fn test_manual_bar() {
    let (renderer, output) = common::terminal();
    let bar = fastbar::progress()
        .renderer(renderer)
        .total(4)
        .spawn()
        .unwrap();
    assert!(bar.is_active());
    for i in 0..4 {
        fastbar::progress!(bar += 1, "step {i}");
    }
    assert!(!bar.is_active());
    assert_eq!(bar.position(), 4);
    assert!(output.text().contains("| 100.00% [4/4 00:00<00:00 step 3]\r"));
}

#[test]
fn test_panic_cleans_up_before_unwinding_ends() {
    let erased_while_panicking = Arc::new(Mutex::new(false));
    let config = {
        let erased_while_panicking = Arc::clone(&erased_while_panicking);
        Config {
            interactive: true,
            flush: false,
            writer: Arc::new(move |text, _| {
                if std::thread::panicking() && text.trim().is_empty() {
                    *erased_while_panicking.lock().unwrap() = true;
                }
            }),
            ..Config::default()
        }
    };
    let iter = fastbar::progress()
        .renderer(fastbar::Renderer::terminal(config))
        .leave(false)
        .wrap(0..10)
        .unwrap();
    let bar = Arc::clone(iter.bar());
    let result = catch_unwind(AssertUnwindSafe(|| {
        for i in iter {
            if i == 3 {
                panic!("boom at {i}");
            }
        }
    }));
    let payload = result.unwrap_err();
    assert_eq!(payload.downcast_ref::<String>().unwrap(), "boom at 3");
    assert!(bar.is_interrupted());
    assert!(!bar.is_active());
    assert!(*erased_while_panicking.lock().unwrap());
}

fn parse_all(lines: Vec<&str>, renderer: fastbar::Renderer) -> fastbar::Result<Vec<i32>> {
    let mut out = vec![];
    for line in fastbar::progress().renderer(renderer).try_wrap(lines.into_iter().map(str::parse::<i32>))? {
        out.push(line?);
    }
    Ok(out)
}

#[test]
fn test_error_is_preserved() {
    let (renderer, _) = common::terminal();
    let result = parse_all(vec!["1", "2", "x", "4"], renderer);
    let error = result.unwrap_err();
    assert!(error.downcast_ref::<std::num::ParseIntError>().is_some());

    let (renderer, _) = common::terminal();
    assert_eq!(parse_all(vec!["1", "2"], renderer).unwrap(), vec![1, 2]);
}

#[test]
fn test_break_interrupts_and_keeps_line() {
    let (renderer, output) = common::terminal();
    let iter = fastbar::progress().renderer(renderer).wrap(0..10).unwrap();
    let bar = Arc::clone(iter.bar());
    for i in iter {
        if i == 5 {
            break;
        }
    }
    assert!(bar.is_interrupted());
    assert_eq!(bar.position(), 5);
    // kept bar: the last drawn line stays
    assert!(output.text().ends_with("\r"));
    assert!(!output.text().trim_end_matches('\r').ends_with(' '));
}

#[test]
fn test_save_file() {
    let dir = std::env::temp_dir().join(format!("fastbar-test-save-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bars.txt");
    let (renderer, output) = common::terminal_with(Config {
        save_path: Some(path.clone()),
        ..Config::default()
    });
    for _ in fastbar::progress().renderer(renderer).wrap(0..3).unwrap() {}
    assert_eq!(std::fs::read_to_string(&path).unwrap(), output.text());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_save_file_kept_when_config_changes() {
    let dir = std::env::temp_dir().join(format!("fastbar-test-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bars.txt");
    std::fs::write(&path, "from an earlier process\n").unwrap();
    // the only test in this file that uses the process-wide config
    fastbar::set_config(Config {
        interactive: true,
        flush: false,
        writer: Arc::new(|_, _| {}),
        save_path: Some(path.clone()),
        save_append: false,
        ..Config::default()
    });
    for _ in fastbar::progress().wrap(0..3).unwrap() {}
    fastbar::update_config(|c| c.max_width = 80);
    for _ in fastbar::progress().wrap(0..2).unwrap() {}
    fastbar::set_config(Config::default());

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(!saved.contains("earlier process"));
    assert!(saved.contains("[3/3 "), "{saved}");
    assert!(saved.contains("[2/2 "), "{saved}");
    assert!(saved.find("[3/3 ") < saved.find("[2/2 "));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_rich_bar_updated_in_place() {
    let (renderer, surface) = common::rich();
    let iter = fastbar::progress().renderer(renderer).wrap(0..3).unwrap();
    assert!(surface.events().is_empty());
    assert_eq!(iter.count(), 3);

    let events = surface.events();
    assert!(matches!(&events[0], Event::Display(0, m) if m.contains("[0/3 ")));
    assert!(events[1..].iter().all(|e| matches!(e, Event::Update(0, _))));
    assert!(surface.last_markup().contains("100.00% [3/3 "));
    assert!(surface.last_markup().contains("<progress value='3' class='' max='3'"));
}

#[test]
fn test_rich_bar_interrupted_then_cleared() {
    let (renderer, surface) = common::rich();
    let iter = fastbar::progress()
        .renderer(renderer)
        .leave(false)
        .wrap(0..10)
        .unwrap();
    for i in iter {
        if i == 4 {
            break;
        }
    }
    let events = surface.events();
    let n = events.len();
    assert_eq!(events[n - 1], Event::Clear(0));
    match &events[n - 2] {
        Event::Update(0, markup) => {
            assert!(markup.contains("class='progress-bar-interrupted'"));
            assert!(markup.contains("Interrupted"));
        }
        other => panic!("expected the interrupted bar, got {other:?}"),
    }
}

#[test]
fn test_rich_bar_kept_after_interrupt() {
    let (renderer, surface) = common::rich();
    let iter = fastbar::progress()
        .renderer(renderer)
        .leave(true)
        .wrap(0..10)
        .unwrap();
    for i in iter {
        if i == 4 {
            break;
        }
    }
    let events = surface.events();
    assert!(events.iter().all(|e| !matches!(e, Event::Clear(_))));
    assert!(surface.last_markup().contains("progress-bar-interrupted"));
}
