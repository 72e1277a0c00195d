use bash_syntax::{parse, Command, Cond, File, Loop, Mode, Node, Stmt, Token, Word, WordPart};
use proptest::prelude::*;

const MAX_INPUT_BYTES: usize = 256;

/// Walk every node span in a file, asserting `pos <= end` and that both lie
/// within the source bounds. Words with no parts (possible only for empty
/// here-doc bodies) carry no span and are skipped.
fn check_spans(f: &File, len: usize) {
    for s in &f.stmts {
        check_stmt(s, len);
    }
}

fn check_span(n: &dyn Node, len: usize) {
    let (pos, end) = (n.pos(), n.end());
    assert!(pos >= 1, "pos {} must be positive", pos);
    assert!(pos <= end, "pos {} > end {}", pos, end);
    assert!(end <= len + 1, "end {} out of bounds for len {}", end, len);
}

fn check_word(w: &Word, len: usize) {
    if w.parts.is_empty() {
        return;
    }
    check_span(w, len);
    for p in &w.parts {
        check_span(p, len);
        match p {
            WordPart::Quoted(q) => {
                for inner in &q.parts {
                    check_span(inner, len);
                }
            }
            WordPart::CmdSubst(cs) => {
                for s in &cs.stmts {
                    check_stmt(s, len);
                }
            }
            WordPart::ProcSubst(ps) => {
                for s in &ps.stmts {
                    check_stmt(s, len);
                }
            }
            WordPart::ArrayExpr(ae) => {
                for w in &ae.list {
                    check_word(w, len);
                }
            }
            _ => {}
        }
    }
}

fn check_cond(c: &Cond, len: usize) {
    if let Cond::Stmt(sc) = c {
        for s in &sc.stmts {
            check_stmt(s, len);
        }
    }
}

fn check_stmt(s: &Stmt, len: usize) {
    check_span(s, len);
    for a in &s.assigns {
        check_span(a, len);
        check_word(&a.value, len);
    }
    for r in &s.redirs {
        let r = r.borrow();
        check_span(&*r, len);
        check_word(&r.word, len);
        if let Some(h) = &r.hdoc {
            check_word(h, len);
        }
    }
    match &s.cmd {
        None => {}
        Some(Command::Call(c)) => {
            for w in &c.args {
                check_word(w, len);
            }
        }
        Some(Command::Binary(b)) => {
            check_stmt(&b.x, len);
            check_stmt(&b.y, len);
        }
        Some(Command::Subshell(x)) => {
            check_span(x, len);
            for s in &x.stmts {
                check_stmt(s, len);
            }
        }
        Some(Command::Block(x)) => {
            check_span(x, len);
            for s in &x.stmts {
                check_stmt(s, len);
            }
        }
        Some(Command::If(x)) => {
            check_span(x, len);
            if let Some(c) = &x.cond {
                check_cond(c, len);
            }
            for s in x.then_stmts.iter().chain(&x.else_stmts) {
                check_stmt(s, len);
            }
            for e in &x.elifs {
                if let Some(c) = &e.cond {
                    check_cond(c, len);
                }
                for s in &e.then_stmts {
                    check_stmt(s, len);
                }
            }
        }
        Some(Command::While(x)) => {
            check_span(x, len);
            if let Some(c) = &x.cond {
                check_cond(c, len);
            }
            for s in &x.do_stmts {
                check_stmt(s, len);
            }
        }
        Some(Command::Until(x)) => {
            check_span(x, len);
            if let Some(c) = &x.cond {
                check_cond(c, len);
            }
            for s in &x.do_stmts {
                check_stmt(s, len);
            }
        }
        Some(Command::For(x)) => {
            check_span(x, len);
            if let Loop::WordIter(wi) = &x.loop_ {
                for w in &wi.list {
                    check_word(w, len);
                }
            }
            for s in &x.do_stmts {
                check_stmt(s, len);
            }
        }
        Some(Command::Case(x)) => {
            check_span(x, len);
            check_word(&x.word, len);
            for pl in &x.list {
                for w in &pl.patterns {
                    check_word(w, len);
                }
                for s in &pl.stmts {
                    check_stmt(s, len);
                }
            }
        }
        Some(Command::Decl(x)) => {
            check_span(x, len);
            for a in &x.assigns {
                check_word(&a.value, len);
            }
        }
        Some(Command::Eval(x)) => {
            if let Some(s) = &x.stmt {
                check_stmt(s, len);
            }
        }
        Some(Command::Let(x)) => check_span(x, len),
        Some(Command::FuncDecl(x)) => {
            check_span(&**x, len);
            if let Some(b) = &x.body {
                check_stmt(b, len);
            }
        }
    }
}

proptest! {
    #[test]
    fn parse_handles_arbitrary_bytes_without_panicking(
        bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_INPUT_BYTES)
    ) {
        let input = String::from_utf8_lossy(&bytes).into_owned();
        let _ = parse(&input, "fuzz.sh", Mode::default());
        let _ = parse(&input, "fuzz.sh", Mode::POSIX_CONFORMANT | Mode::PARSE_COMMENTS);
    }

    #[test]
    fn errors_are_a_deterministic_fixpoint(
        bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_INPUT_BYTES)
    ) {
        let input = String::from_utf8_lossy(&bytes).into_owned();
        let a = parse(&input, "f.sh", Mode::default());
        let b = parse(&input, "f.sh", Mode::default());
        match (a, b) {
            (Err(ea), Err(eb)) => {
                prop_assert_eq!(ea.line, eb.line);
                prop_assert_eq!(ea.column, eb.column);
                prop_assert_eq!(ea.text, eb.text);
            }
            (Ok(_), Ok(_)) => {}
            _ => prop_assert!(false, "parse determinism violated"),
        }
    }

    #[test]
    fn node_positions_are_monotonic_on_success(
        bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_INPUT_BYTES)
    ) {
        let input = String::from_utf8_lossy(&bytes).into_owned();
        if let Ok(f) = parse(&input, "f.sh", Mode::default()) {
            check_spans(&f, input.len());
            let positions: Vec<_> = f.stmts.iter().map(Node::pos).collect();
            for pair in positions.windows(2) {
                prop_assert!(pair[0] < pair[1], "statement positions not increasing");
            }
        }
    }

    #[test]
    fn line_registry_is_consistent(
        bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_INPUT_BYTES)
    ) {
        let input = String::from_utf8_lossy(&bytes).into_owned();
        if let Ok(f) = parse(&input, "f.sh", Mode::default()) {
            let src = input.as_bytes();
            prop_assert_eq!(f.lines[0], 1);
            for pair in f.lines.windows(2) {
                prop_assert!(pair[0] < pair[1], "line starts not increasing");
            }
            for &o in &f.lines {
                prop_assert!(
                    o == 1 || src[o - 2] == b'\n',
                    "line start {} not preceded by a newline",
                    o
                );
            }
        }
    }

    #[test]
    fn posix_accepting_implies_bash_accepting(
        bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_INPUT_BYTES)
    ) {
        let input = String::from_utf8_lossy(&bytes).into_owned();
        if parse(&input, "f.sh", Mode::POSIX_CONFORMANT).is_ok() {
            prop_assert!(parse(&input, "f.sh", Mode::default()).is_ok());
        }
    }
}

#[test]
fn heredocs_complete_on_success() {
    let cases: &[(&str, &[&str])] = &[
        ("cat <<EOF\nbody\nEOF\n", &["body\n"]),
        ("cat <<EOF\n\nhi\nEOF\n", &["\nhi\n"]),
        ("cat <<-X\n\tindented\n\tX\n", &["\tindented\n"]),
        ("cat <<A <<B\n1\nA\n2\nB\n", &["1\n", "2\n"]),
        ("cat <<A <<B\n1\nA\n\n2\nB\n", &["1\n", "\n2\n"]),
        ("cat <<EOF && echo after\nbody\nEOF\n", &["body\n"]),
    ];
    for (src, want) in cases {
        let f = parse(src, "", Mode::default()).expect(src);
        let mut bodies = Vec::new();
        for s in &f.stmts {
            collect_heredoc_bodies(s, &mut bodies);
        }
        assert_eq!(&bodies, want, "source {:?}", src);
    }
}

/// Collect every finalized here-doc body in statement order, reconstructing
/// its text from the literal parts.
fn collect_heredoc_bodies(s: &Stmt, out: &mut Vec<String>) {
    for r in &s.redirs {
        let r = r.borrow();
        if matches!(r.op, Token::DLess | Token::DLessDash) {
            let body = r.hdoc.as_ref().expect("pending heredoc without a body");
            let mut text = String::new();
            for p in &body.parts {
                match p {
                    WordPart::Lit(l) => text.push_str(&l.value),
                    other => panic!("unexpected heredoc part {:?}", other),
                }
            }
            out.push(text);
        }
    }
    if let Some(Command::Binary(b)) = &s.cmd {
        collect_heredoc_bodies(&b.x, out);
        collect_heredoc_bodies(&b.y, out);
    }
}

#[test]
fn position_translation_matches_lines() {
    let src = "first\nsecond line\nthird\n";
    let f = parse(src, "", Mode::default()).unwrap();
    for (offset, b) in src.bytes().enumerate() {
        if b == b'\n' {
            continue;
        }
        let pos = offset + 1;
        let line = src[..offset].bytes().filter(|&b| b == b'\n').count() + 1;
        let p = f.position(pos);
        assert_eq!(p.line, line, "offset {}", pos);
    }
}
