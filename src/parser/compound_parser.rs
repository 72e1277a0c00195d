//! Compound Commands
//!
//! Subshells, blocks, if/while/until/for, case, declare/local, eval, let and
//! function declarations. Reserved words are literal words matched by value;
//! each clause requires its closing word and reports the opening position
//! when it is missing.

use crate::ast::types::{
    Assign, Block, CaseClause, Cond, CStyleCond, CStyleLoop, DeclClause, Elif, EvalClause,
    ForClause, FuncDecl, IfClause, LetClause, Lit, Loop, Node, PatternList, Pos, StmtCond,
    Subshell, UntilClause, WhileClause, WordIter,
};
use crate::parser::parser::Parser;
use crate::parser::types::stop_token;
use crate::token::Token;

impl Parser {
    pub(crate) fn subshell(&mut self) -> Subshell {
        let lparen = self.pos;
        let old = self.quote;
        self.quote = Token::RParen;
        self.next();
        let stmts = self.stmts(&[]);
        self.quote = old;
        let rparen = self.matched(lparen, Token::LParen, Token::RParen);
        if stmts.is_empty() {
            self.pos_err(
                lparen,
                "a subshell must contain at least one statement".to_string(),
            );
        }
        Subshell {
            lparen,
            rparen,
            stmts,
        }
    }

    pub(crate) fn block(&mut self) -> Block {
        let lbrace = self.pos;
        self.next();
        let stmts = self.stmts(&["}"]);
        let rbrace = self.pos;
        if !self.got_rsrv("}") {
            let tok = self.tok;
            self.pos_err(
                lbrace,
                format!("reached {} without matching word {{ with }}", tok),
            );
        }
        Block {
            lbrace,
            rbrace,
            stmts,
        }
    }

    pub(crate) fn if_clause(&mut self) -> IfClause {
        let if_pos = self.pos;
        self.next();
        let cond = self.cond("if", if_pos, "then");
        let then = self.follow_rsrv(if_pos, "if [stmts]", "then");
        let then_stmts = self.follow_stmts("then", then, &["fi", "elif", "else"]);
        let mut elifs = Vec::new();
        let mut elif_pos = self.pos;
        while self.got_rsrv("elif") {
            let cond = self.cond("elif", elif_pos, "then");
            let then = self.follow_rsrv(elif_pos, "elif [stmts]", "then");
            let then_stmts = self.follow_stmts("then", then, &["fi", "elif", "else"]);
            elifs.push(Elif {
                elif: elif_pos,
                then,
                cond,
                then_stmts,
            });
            elif_pos = self.pos;
        }
        let mut else_pos = 0;
        let mut else_stmts = Vec::new();
        let epos = self.pos;
        if self.got_rsrv("else") {
            else_pos = epos;
            else_stmts = self.follow_stmts("else", else_pos, &["fi"]);
        }
        let fi = self.stmt_end(if_pos, "if", "fi");
        IfClause {
            if_pos,
            then,
            fi,
            cond,
            then_stmts,
            elifs,
            else_pos,
            else_stmts,
        }
    }

    /// A condition is either `((…))` or a statement list ending at the
    /// given stop word.
    fn cond(&mut self, left: &str, lpos: Pos, stop: &str) -> Option<Cond> {
        if self.tok == Token::DLParen {
            let lparen = self.pos;
            let old = self.quote;
            self.quote = Token::DRParen;
            self.next();
            let x = self.arithm_expr("((", lparen, 0, false);
            let rparen = self.arithm_end(lparen, old);
            self.got_same_line(Token::Semi);
            return Some(Cond::CStyle(CStyleCond { lparen, rparen, x }));
        }
        let stmts = self.follow_stmts(left, lpos, &[stop]);
        if stmts.is_empty() {
            return None;
        }
        Some(Cond::Stmt(StmtCond { stmts }))
    }

    pub(crate) fn while_clause(&mut self) -> WhileClause {
        let while_pos = self.pos;
        self.next();
        let cond = self.cond("while", while_pos, "do");
        let do_pos = self.follow_rsrv(while_pos, "while [stmts]", "do");
        let do_stmts = self.follow_stmts("do", do_pos, &["done"]);
        let done = self.stmt_end(while_pos, "while", "done");
        WhileClause {
            while_pos,
            do_pos,
            done,
            cond,
            do_stmts,
        }
    }

    pub(crate) fn until_clause(&mut self) -> UntilClause {
        let until = self.pos;
        self.next();
        let cond = self.cond("until", until, "do");
        let do_pos = self.follow_rsrv(until, "until [stmts]", "do");
        let do_stmts = self.follow_stmts("do", do_pos, &["done"]);
        let done = self.stmt_end(until, "until", "done");
        UntilClause {
            until,
            do_pos,
            done,
            cond,
            do_stmts,
        }
    }

    pub(crate) fn for_clause(&mut self) -> ForClause {
        let for_pos = self.pos;
        self.next();
        let loop_ = self.loop_clause(for_pos);
        let do_pos = self.follow_rsrv(for_pos, "for foo [in words]", "do");
        let do_stmts = self.follow_stmts("do", do_pos, &["done"]);
        let done = self.stmt_end(for_pos, "for", "done");
        ForClause {
            for_pos,
            do_pos,
            done,
            loop_,
            do_stmts,
        }
    }

    fn loop_clause(&mut self, for_pos: Pos) -> Loop {
        if self.tok == Token::DLParen {
            let lparen = self.pos;
            let old = self.quote;
            self.quote = Token::DRParen;
            self.next();
            let init = self.arithm_expr("((", lparen, 0, false);
            let mut sc_pos = self.pos;
            self.follow(sc_pos, "expression", Token::Semi);
            let cond = self.arithm_expr(";", sc_pos, 0, false);
            sc_pos = self.pos;
            self.follow(sc_pos, "expression", Token::Semi);
            let post = self.arithm_expr(";", sc_pos, 0, false);
            let rparen = self.arithm_end(lparen, old);
            self.got_same_line(Token::Semi);
            return Loop::CStyle(CStyleLoop {
                lparen,
                rparen,
                init,
                cond,
                post,
            });
        }
        let mut wi = WordIter::default();
        if !self.got_lit(&mut wi.name) {
            self.follow_err(for_pos, "for", "a literal");
        }
        if self.got_rsrv("in") {
            while !self.newline && self.tok != Token::Eof && self.tok != Token::Semi {
                let (w, ok) = self.got_word();
                if !ok {
                    self.cur_err("word list can only contain words".to_string());
                    break;
                }
                wi.list.push(w);
            }
            self.got_same_line(Token::Semi);
        } else if !self.got_same_line(Token::Semi) && !self.newline {
            self.follow_err(for_pos, "for foo", "\"in\", ; or a newline");
        }
        Loop::WordIter(wi)
    }

    pub(crate) fn case_clause(&mut self) -> CaseClause {
        let case = self.pos;
        self.next();
        let word = self.follow_word("case", case);
        self.follow_rsrv(case, "case x", "in");
        let list = self.pat_lists();
        let esac = self.stmt_end(case, "case", "esac");
        CaseClause {
            case,
            esac,
            word,
            list,
        }
    }

    fn pat_lists(&mut self) -> Vec<PatternList> {
        let mut pls = Vec::new();
        if self.got_same_line(Token::Semi) {
            return pls;
        }
        while self.tok != Token::Eof && !(self.tok == Token::LitWord && self.val == "esac") {
            let mut pl = PatternList {
                op: Token::DSemi,
                op_pos: 0,
                patterns: Vec::new(),
                stmts: Vec::new(),
            };
            self.got(Token::LParen);
            while self.tok != Token::Eof {
                let (w, ok) = self.got_word();
                if !ok {
                    self.cur_err("case patterns must consist of words".to_string());
                    break;
                }
                pl.patterns.push(w);
                if self.tok == Token::RParen {
                    break;
                }
                if !self.got(Token::Or) {
                    self.cur_err("case patterns must be separated with |".to_string());
                    break;
                }
            }
            let old = self.quote;
            self.quote = Token::DSemi;
            self.next();
            pl.stmts = self.stmts(&["esac"]);
            self.quote = old;
            pl.op_pos = self.pos;
            if !matches!(self.tok, Token::DSemi | Token::SemiAnd | Token::DSemiAnd) {
                pls.push(pl);
                break;
            }
            if self.posix_mode() && matches!(self.tok, Token::SemiAnd | Token::DSemiAnd) {
                let pos = self.pos;
                self.posix_err(pos);
            }
            pl.op = self.tok;
            self.next();
            pls.push(pl);
        }
        pls
    }

    pub(crate) fn decl_clause(&mut self, local: bool) -> DeclClause {
        let declare = self.pos;
        if self.posix_mode() {
            self.posix_err(declare);
        }
        self.next();
        let mut opts = Vec::new();
        while self.tok == Token::LitWord && self.val.starts_with('-') {
            let w = self.get_word();
            opts.push(w);
        }
        let mut assigns = Vec::new();
        while !self.newline && !stop_token(self.tok) {
            if let Some(a) = self.get_assign() {
                assigns.push(a);
            } else {
                let (w, ok) = self.got_word();
                if !ok {
                    let pos = self.pos;
                    self.follow_err(pos, "declare", "words");
                    break;
                }
                assigns.push(Assign {
                    value: w,
                    ..Assign::default()
                });
            }
        }
        DeclClause {
            declare,
            local,
            opts,
            assigns,
        }
    }

    pub(crate) fn eval_clause(&mut self) -> EvalClause {
        let eval = self.pos;
        self.next();
        let stmt = self.get_stmt(false).map(|(s, _)| Box::new(s));
        EvalClause { eval, stmt }
    }

    /// `let` parses compact-mode arithmetic expressions until the end of the
    /// line; whitespace separates expressions.
    pub(crate) fn let_clause(&mut self) -> LetClause {
        let let_pos = self.pos;
        if self.posix_mode() {
            self.posix_err(let_pos);
        }
        let old = self.quote;
        self.quote = Token::DRParen;
        self.next();
        self.stop_newline = true;
        let mut exprs = Vec::new();
        while !self.newline && !stop_token(self.tok) && self.tok != Token::Stopped {
            match self.arithm_expr("let", let_pos, 0, true) {
                Some(x) => exprs.push(x),
                None => {
                    let pos = self.pos;
                    self.follow_err(pos, "let", "arithmetic expressions");
                    break;
                }
            }
        }
        if exprs.is_empty() {
            self.pos_err(
                let_pos,
                "let clause requires at least one expression".to_string(),
            );
        }
        self.stop_newline = false;
        self.quote = old;
        self.got(Token::Stopped);
        LetClause { let_pos, exprs }
    }

    pub(crate) fn bash_func_decl(&mut self) -> FuncDecl {
        let fpos = self.pos;
        if self.posix_mode() {
            self.posix_err(fpos);
        }
        self.next();
        if self.tok != Token::LitWord {
            let w = self.follow_word("function", fpos);
            if self.err.is_none() {
                let raw = self.word_src(&w);
                let wpos = w.pos();
                self.pos_err(wpos, format!("invalid func name: {:?}", raw));
            }
        }
        let name = Lit {
            value_pos: self.pos,
            value: self.val.clone(),
        };
        self.next();
        if self.got_same_line(Token::LParen) {
            let name_pos = name.value_pos;
            self.follow(name_pos, "foo(", Token::RParen);
        }
        self.func_decl(name, fpos)
    }

    pub(crate) fn func_decl(&mut self, name: Lit, pos: Pos) -> FuncDecl {
        let bash_style = pos != name.value_pos;
        let body = self.get_stmt(false).map(|(s, _)| s);
        let fd = FuncDecl {
            position: pos,
            bash_style,
            name,
            body,
        };
        if fd.body.is_none() {
            self.follow_err(pos, "foo()", "a statement");
        }
        fd
    }
}
