//! Integration tests for the modal engine
//!
//! Each test drives a fresh engine through a key trace and checks the
//! resulting snapshot, the way a host would.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use modal_core::{
    EditorCore, EditorMode, EditorSnapshot, EngineConfig, Key, KeyEvent, Position, MAX_COUNT,
};
use sha2::{Digest, Sha256};

fn run(content: &str, trace: &str) -> EditorCore {
    let mut editor = EditorCore::with_content(content);
    editor.apply_keys(trace).unwrap();
    editor
}

fn digest(snapshot: &EditorSnapshot) -> Vec<u8> {
    let json = serde_json::to_vec(snapshot).unwrap();
    Sha256::digest(&json).to_vec()
}

fn assert_cursor_in_bounds(editor: &EditorCore) {
    let cursor = editor.cursor();
    let buffer = editor.buffer();
    assert!(cursor.line < buffer.line_count(), "line out of range");
    let len = buffer.line_length(cursor.line);
    match editor.mode() {
        EditorMode::Insert => assert!(cursor.col <= len),
        _ => assert!(cursor.col <= len.saturating_sub(1)),
    }
}

#[test]
fn test_cursor_stays_in_bounds() {
    // Mix of motions and edits that shrink and grow lines
    let traces = [
        "$jjjkkk",
        "Gddddddddp",
        "5x$x0X",
        "A tail<Esc>0D",
        "vjjd",
        "Vjjjc<Esc>",
        "3J$",
        "/zz<CR>n",
        ":99<CR>$",
        "wwwwwwwwwwbbbbbbbbbb",
        "eeeeeeeeee",
        "ci\"<Esc>$",
    ];

    for trace in traces {
        let mut editor = EditorCore::with_content("short\na much longer line\n\"q\"\nx");
        for mut event in input_types::parse_keys(trace).unwrap() {
            editor.handle_key(&mut event);
            assert_cursor_in_bounds(&editor);
        }
    }
}

#[test]
fn test_huge_counts_stay_bounded() {
    const HUGE: &str = "99999999999999999999";
    let content = "short\na much longer line\n\"q\"\nx";
    let commands = [
        "yy{n}p", "x{n}P", "{n}w", "{n}b", "{n}e", "/a<CR>{n}n", "/a<CR>{n}N", "{n}N", "{n}j",
        "{n}x", "{n}dd", "{n}J", "{n}fa", "v{n}l", "V{n}j", "{n}cw<Esc>",
    ];

    for command in commands {
        let trace = command.replace("{n}", HUGE);
        let mut editor = EditorCore::with_content(content);
        for mut event in input_types::parse_keys(&trace).unwrap() {
            editor.handle_key(&mut event);
            assert_cursor_in_bounds(&editor);
            assert!(editor.command_buffer().len() <= MAX_COUNT.to_string().len() + 2);
        }
        assert!(
            editor.buffer().line_count() <= 4 * (MAX_COUNT + 1),
            "after {trace}"
        );
    }
}

#[test]
fn test_digit_after_operator_prefix_clears_pending_keys() {
    let content = "one two three four";
    for prefix in ["d", "c", "y", "g", "di", "3d"] {
        let mut editor = EditorCore::with_content(content);
        editor.apply_keys(prefix).unwrap();
        editor.apply_key(Key::Char('2'));
        assert_eq!(editor.command_buffer(), "", "after {prefix}2");

        // The next motion runs once, with nothing deleted or yanked
        editor.apply_key(Key::Char('w'));
        assert_eq!(editor.cursor(), Position::new(0, 4), "after {prefix}2w");
        assert_eq!(editor.buffer().lines(), [content]);
        assert!(editor.registers().get('"').is_none());
        assert_eq!(editor.mode(), EditorMode::Normal);
    }

    // r and f still take the digit as their argument
    let editor = run("a1b2", "f2");
    assert_eq!(editor.cursor(), Position::new(0, 3));
    let editor = run("ab", "r9");
    assert_eq!(editor.buffer().lines(), ["9b"]);
}

#[test]
fn test_visual_motions_extend_selection() {
    let content = "alpha\nbeta, gamma\ndelta\nepsilon";
    for (trace, end) in [
        ("Gvgg", Position::new(0, 0)),
        ("jvf,", Position::new(1, 4)),
        ("j$vFa", Position::new(1, 7)),
        ("v2j", Position::new(2, 0)),
        ("v2e", Position::new(1, 3)),
    ] {
        let editor = run(content, trace);
        let selection = editor.selection().unwrap();
        assert_eq!(editor.cursor(), end, "after {trace}");
        assert_eq!(selection.end, end, "after {trace}");
    }
}

#[test]
fn test_buffer_never_empty() {
    let editor = run("one\ntwo\nthree", "dddddddddd");
    assert_eq!(editor.buffer().lines(), [""]);

    let editor = run("only", "Vd");
    assert_eq!(editor.buffer().line_count(), 1);

    let mut editor = EditorCore::new();
    editor.load_content("");
    assert_eq!(editor.buffer().line_count(), 1);
}

#[test]
fn test_selection_only_in_visual_mode() {
    let mut editor = EditorCore::with_content("select me");
    for key in "vlly".chars() {
        editor.apply_key(Key::Char(key));
        let snapshot = editor.snapshot();
        assert_eq!(
            snapshot.selection.is_some(),
            snapshot.mode == EditorMode::Visual
        );
    }
}

#[test]
fn test_visual_delete_ignores_selection_direction() {
    // Same span selected left-to-right and right-to-left
    let forward = run("abcdefgh\nijkl", "lvjd");
    let backward = run("abcdefgh\nijkl", "jlvkd");

    assert_eq!(forward.buffer().lines(), ["akl"]);
    assert_eq!(forward.buffer().lines(), backward.buffer().lines());
    assert_eq!(forward.registers().get('"'), backward.registers().get('"'));
    assert_eq!(forward.cursor(), backward.cursor());
}

#[test]
fn test_delete_line_then_paste_round_trip() {
    let editor = run("alpha\nbeta\ngamma", "jddP");
    assert_eq!(editor.buffer().as_string(), "alpha\nbeta\ngamma");

    let editor = run("alpha\nbeta\ngamma", "Gddp");
    assert_eq!(editor.buffer().as_string(), "alpha\nbeta\ngamma");
}

#[test]
fn test_line_yank_is_newline_terminated() {
    let editor = run("a\nb\nc", "2yy");
    assert_eq!(editor.registers().get('"'), Some("a\nb\n"));
    assert_eq!(editor.message(), "2 lines yanked");
}

#[test]
fn test_count_multiplies_motion() {
    let editor = run("0123456789", "4l2l");
    assert_eq!(editor.cursor(), Position::new(0, 6));

    let editor = run("a\nb\nc\nd\ne", "3j");
    assert_eq!(editor.cursor(), Position::new(3, 0));
}

#[test]
fn test_escape_always_returns_to_normal() {
    for setup in ["i", "a", "o", "v", "V", ":", "/", "d", "3", "ci"] {
        let mut editor = EditorCore::with_content("some text");
        editor.apply_keys(setup).unwrap();
        editor.apply_key(Key::Escape);
        let snapshot = editor.snapshot();
        assert_eq!(snapshot.mode, EditorMode::Normal, "after {setup}");
        assert_eq!(snapshot.command_buffer, "", "after {setup}");
        assert!(snapshot.selection.is_none());
    }
}

#[test]
fn test_prefix_decays_on_logical_clock() {
    let config = EngineConfig {
        prefix_timeout_ms: 250,
        ..EngineConfig::default()
    };
    let mut editor = EditorCore::with_config(config);
    editor.load_content("keep\nlines");

    editor.apply_key(Key::Char('d'));
    assert!(!editor.tick(Duration::from_millis(249)));
    assert_eq!(editor.command_buffer(), "d");
    assert!(editor.tick(Duration::from_millis(250)));
    assert_eq!(editor.command_buffer(), "");

    // The second d starts a new prefix instead of completing dd
    editor.apply_key(Key::Char('d'));
    assert_eq!(editor.buffer().line_count(), 2);
}

#[test]
fn test_expired_prefix_is_dropped_before_next_key() {
    let mut editor = EditorCore::with_content("one\ntwo");
    editor.apply_key(Key::Char('y'));
    editor.advance(Duration::from_secs(5));
    editor.apply_key(Key::Char('y'));
    assert!(editor.registers().get('"').is_none());
}

#[test]
fn test_same_trace_same_state() {
    let content = "fn main() {\n    let x = \"value\";\n}\n";
    let trace = "jwci\"other<Esc>yyGp:%s/x/y/g<CR>/main<CR>v$y";

    let first = run(content, trace).snapshot();
    let second = run(content, trace).snapshot();
    assert_eq!(first, second);
    assert_eq!(digest(&first), digest(&second));
}

#[test]
fn test_snapshot_json_shape() {
    let editor = run("abc", "yyvl");
    let json = serde_json::to_value(editor.snapshot()).unwrap();
    assert_eq!(json["mode"], "Visual");
    assert_eq!(json["cursor"]["col"], 1);
    assert_eq!(json["registers"]["\""], "abc\n");
    assert_eq!(json["selection"]["kind"], "Char");
}

#[test]
fn test_hook_sees_every_consumed_key() {
    let modes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&modes);

    let mut editor = EditorCore::new();
    editor.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.mode));
    editor.apply_keys("ix<Esc>:<Esc>").unwrap();

    assert_eq!(
        *modes.borrow(),
        vec![
            EditorMode::Insert,
            EditorMode::Insert,
            EditorMode::Normal,
            EditorMode::Command,
            EditorMode::Normal,
        ]
    );
}

#[test]
fn test_unconsumed_key_keeps_default_action() {
    let mut editor = EditorCore::new();
    let mut event = KeyEvent::ctrl('v');
    assert!(!editor.handle_key(&mut event));
    assert!(!event.is_default_prevented());

    let mut event = KeyEvent::char('i');
    assert!(editor.handle_key(&mut event));
    assert!(event.is_default_prevented());
}

#[test]
fn test_tutorial_session() {
    let mut editor = EditorCore::with_content("The quick brown fox\njumps over the dog");

    editor.apply_keys("wcwslow<Esc>").unwrap();
    assert_eq!(editor.buffer().line(0), Some("The slow brown fox"));

    editor.apply_keys("j/the<CR>ilazy <Esc>").unwrap();
    assert_eq!(editor.buffer().line(1), Some("jumps over lazy the dog"));

    editor.apply_keys("ggJ").unwrap();
    assert_eq!(
        editor.buffer().as_string(),
        "The slow brown fox jumps over lazy the dog"
    );

    editor.apply_keys(":w<CR>").unwrap();
    assert_eq!(editor.message(), "File written (simulated)");
}
