//! A small shared tokenizer. Both front-ends lex the same way: identifiers,
//! string/template literals, numbers, and punctuation. Neither language's
//! full grammar is implemented — only enough to recognize the constructs
//! the dataflow engine and the code-scan layer care about. Anything else
//! degrades gracefully into an opaque token rather than failing the parse.

#[derive(Debug, Clone, PartialEq)]
pub enum TokKind {
    Ident(String),
    Str(String),
    /// Raw text between backticks, not yet scanned for `${...}` spans.
    Template(String),
    Num(String),
    Punct(String),
    Eof,
}

#[derive(Debug, Clone)]
pub struct Tok {
    pub kind: TokKind,
    pub line: usize,
    pub col: usize,
    pub text: String,
}

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    /// `base_line` is the 1-indexed line the slice starts on, so tokens
    /// carry positions relative to the whole file, not the slice.
    pub fn new(src: &'a str, base_line: usize) -> Self {
        Self { src: src.as_bytes(), pos: 0, line: base_line, line_start: 0 }
    }

    fn col(&self) -> usize {
        self.pos - self.line_start
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(b)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_byte() {
                Some(b) if b.is_ascii_whitespace() => {
                    self.bump();
                }
                Some(b'/') if self.src.get(self.pos + 1) == Some(&b'/') => {
                    while let Some(b) = self.peek_byte() {
                        if b == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some(b'/') if self.src.get(self.pos + 1) == Some(&b'*') => {
                    self.bump();
                    self.bump();
                    while self.peek_byte().is_some() {
                        if self.peek_byte() == Some(b'*') && self.src.get(self.pos + 1) == Some(&b'/') {
                            self.bump();
                            self.bump();
                            break;
                        }
                        self.bump();
                    }
                }
                Some(b'#') => {
                    while let Some(b) = self.peek_byte() {
                        if b == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_string(&mut self, quote: u8) -> String {
        let mut out = String::new();
        self.bump(); // opening quote
        while let Some(b) = self.peek_byte() {
            if b == quote {
                self.bump();
                break;
            }
            if b == b'\\' {
                self.bump();
                if let Some(escaped) = self.bump() {
                    out.push(escaped as char);
                }
                continue;
            }
            out.push(b as char);
            self.bump();
        }
        out
    }

    fn read_template(&mut self) -> String {
        let mut out = String::new();
        self.bump(); // opening backtick
        let mut depth = 0i32;
        while let Some(b) = self.peek_byte() {
            if b == b'`' && depth == 0 {
                self.bump();
                break;
            }
            if b == b'$' && self.src.get(self.pos + 1) == Some(&b'{') {
                depth += 1;
                out.push('$');
                out.push('{');
                self.bump();
                self.bump();
                continue;
            }
            if b == b'}' && depth > 0 {
                depth -= 1;
            }
            if b == b'{' && depth > 0 {
                depth += 1;
            }
            out.push(b as char);
            self.bump();
        }
        out
    }

    pub fn next(&mut self) -> Tok {
        self.skip_trivia();
        let line = self.line;
        let col = self.col();
        let start = self.pos;

        let b = match self.peek_byte() {
            None => return Tok { kind: TokKind::Eof, line, col, text: String::new() },
            Some(b) => b,
        };

        if b.is_ascii_alphabetic() || b == b'_' || b == b'$' {
            // Language string-prefix forms: f"...", r"...", b"...", rb"...".
            if matches!(b, b'f' | b'r' | b'b' | b'u')
                && matches!(self.src.get(self.pos + 1), Some(b'"') | Some(b'\''))
            {
                self.bump();
                let quote = self.peek_byte().unwrap();
                let value = self.read_string(quote);
                return Tok { kind: TokKind::Str(value), line, col, text: self.slice(start) };
            }
            while let Some(b) = self.peek_byte() {
                if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' {
                    self.bump();
                } else {
                    break;
                }
            }
            let text = self.slice(start);
            return Tok { kind: TokKind::Ident(text.clone()), line, col, text };
        }

        if b.is_ascii_digit() {
            while let Some(b) = self.peek_byte() {
                if b.is_ascii_digit() || b == b'.' || b == b'_' {
                    self.bump();
                } else {
                    break;
                }
            }
            let text = self.slice(start);
            return Tok { kind: TokKind::Num(text.clone()), line, col, text };
        }

        if b == b'"' || b == b'\'' {
            let value = self.read_string(b);
            return Tok { kind: TokKind::Str(value), line, col, text: self.slice(start) };
        }

        if b == b'`' {
            let raw = self.read_template();
            return Tok { kind: TokKind::Template(raw), line, col, text: self.slice(start) };
        }

        // Multi-char punctuation first.
        for punct in ["=>", "==", "===", "!=", "!==", "&&", "||", "...", "+="] {
            if self.src[self.pos..].starts_with(punct.as_bytes()) {
                for _ in 0..punct.len() {
                    self.bump();
                }
                return Tok { kind: TokKind::Punct(punct.to_string()), line, col, text: punct.to_string() };
            }
        }

        self.bump();
        let text = (b as char).to_string();
        Tok { kind: TokKind::Punct(text.clone()), line, col, text }
    }

    fn slice(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.src[start..self.pos]).to_string()
    }

    /// Tokenize the rest of the source into a flat stream ending in `Eof`.
    pub fn tokenize_all(mut self) -> Vec<Tok> {
        let mut out = Vec::new();
        loop {
            let tok = self.next();
            let is_eof = tok.kind == TokKind::Eof;
            out.push(tok);
            if is_eof {
                break;
            }
        }
        out
    }
}

impl PartialEq for TokKind {
    fn eq(&self, other: &Self) -> bool {
        matches!((self, other), (TokKind::Eof, TokKind::Eof))
            || matches!((self, other), (TokKind::Ident(a), TokKind::Ident(b)) if a == b)
            || matches!((self, other), (TokKind::Punct(a), TokKind::Punct(b)) if a == b)
    }
}

/// Find every `${...}` interpolation span inside template-literal raw text
/// (already stripped of the surrounding backticks) and return the source
/// text of each interpolated expression, in order.
pub fn template_interpolations(raw: &str) -> Vec<String> {
    let bytes = raw.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{') {
            let start = i + 2;
            let mut depth = 1i32;
            let mut j = start;
            while j < bytes.len() && depth > 0 {
                match bytes[j] {
                    b'{' => depth += 1,
                    b'}' => depth -= 1,
                    _ => {}
                }
                if depth == 0 {
                    break;
                }
                j += 1;
            }
            out.push(String::from_utf8_lossy(&bytes[start..j]).to_string());
            i = j + 1;
        } else {
            i += 1;
        }
    }
    out
}
